// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Read-only data providers: the "dex".
//!
//! The engine never owns game data. Species, moves, items, abilities, types,
//! learnsets, tier tables, the alias table and mod overlays are all loaded
//! once, frozen, and shared behind an `Arc`. A hot-swapped mod is a new
//! `Dex`, never an in-place patch; live caches in resolvers stay valid for
//! their whole lifetime because nothing under them can move.
//!
//! Deserialization is serde/JSON so tests and embedding applications can
//! feed synthetic tables without any file-format machinery.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DexSearchError;
use crate::types::Id;

/// Base stat spread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub spa: u16,
    pub spd: u16,
    pub spe: u16,
}

impl Stats {
    pub fn bst(&self) -> u32 {
        u32::from(self.hp)
            + u32::from(self.atk)
            + u32::from(self.def)
            + u32::from(self.spa)
            + u32::from(self.spd)
            + u32::from(self.spe)
    }

    /// Best single stat, used by the "best stat total" style comparators.
    pub fn best(&self) -> u16 {
        [self.hp, self.atk, self.def, self.spa, self.spd, self.spe]
            .into_iter()
            .max()
            .unwrap_or(0)
    }
}

/// Availability marker for entries that are not standard play material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nonstandard {
    Past,
    Future,
    Cap,
    Lgpe,
    Gigantamax,
    Custom,
}

/// One species table entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Species {
    pub name: String,
    /// Generation this species was introduced in.
    pub gen: u8,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    #[serde(rename = "baseStats")]
    pub base_stats: Stats,
    pub tier: String,
    #[serde(rename = "eggGroups")]
    pub egg_groups: Vec<String>,
    pub prevo: Option<Id>,
    pub evos: Vec<Id>,
    /// Base forme id for alternate formes ("venusaurmega" → "venusaur").
    #[serde(rename = "baseSpecies")]
    pub base_species: Option<Id>,
    /// Forme that this one can only exist as mid-battle ("Mega", "Gmax", …).
    #[serde(rename = "battleOnly")]
    pub battle_only: Option<Id>,
    /// Out-of-battle forme change source ("Zamazenta-Crowned" → "Zamazenta").
    #[serde(rename = "changesFrom")]
    pub changes_from: Option<Id>,
    pub forme: Option<String>,
    #[serde(rename = "isNonstandard")]
    pub nonstandard: Option<Nonstandard>,
}

impl Species {
    /// The learnset chain starts at the species itself unless it is a
    /// cosmetic/battle forme, in which case it starts at the forme source.
    pub fn is_gmax(&self) -> bool {
        matches!(self.forme.as_deref(), Some("Gmax"))
            || self.nonstandard == Some(Nonstandard::Gigantamax)
    }

    pub fn is_nfe(&self) -> bool {
        !self.evos.is_empty()
    }
}

/// Damage category of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl Default for MoveCategory {
    fn default() -> Self {
        MoveCategory::Status
    }
}

/// Behavior flags the usefulness heuristic cares about.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveFlags {
    /// Must recharge the turn after use (Hyper Beam and friends).
    pub recharge: bool,
    /// Two-turn charge move (Solar Beam and friends).
    pub charge: bool,
    /// Cannot be copied by Sketch.
    #[serde(rename = "nosketch")]
    pub no_sketch: bool,
}

/// One move table entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveData {
    pub name: String,
    pub gen: u8,
    #[serde(rename = "type")]
    pub move_type: String,
    pub category: MoveCategory,
    #[serde(rename = "basePower")]
    pub base_power: u16,
    /// `None` means the move cannot miss.
    pub accuracy: Option<u8>,
    pub pp: u8,
    pub priority: i8,
    pub flags: MoveFlags,
    #[serde(rename = "isNonstandard")]
    pub nonstandard: Option<Nonstandard>,
}

/// One item table entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemData {
    pub name: String,
    pub gen: u8,
    pub desc: String,
    #[serde(rename = "isNonstandard")]
    pub nonstandard: Option<Nonstandard>,
}

/// One ability table entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityData {
    pub name: String,
    pub gen: u8,
    #[serde(rename = "isNonstandard")]
    pub nonstandard: Option<Nonstandard>,
}

/// One elemental type table entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeData {
    pub name: String,
    /// Generation the type was introduced in (Dark/Steel = 2, Fairy = 6).
    pub gen: u8,
}

/// A row of a precomputed tier table: either a section divider or a species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TierRow {
    Header { header: String },
    Entry(Id),
}

/// A flattened, display-ordered tier listing with named boundary offsets.
///
/// `sections` maps a tier name ("OU", "UU", "Uber", …) to the row offset
/// where that tier's pool begins. A format's legal pool is the slice from
/// its boundary to the next numerically greater boundary (or end of table).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierTable {
    pub rows: Vec<TierRow>,
    pub sections: BTreeMap<String, usize>,
}

impl TierTable {
    /// Resolve the half-open row range for a named boundary. Unknown names
    /// fall back to the full table.
    pub fn slice_range(&self, tier: &str) -> (usize, usize) {
        let Some(&start) = self.sections.get(tier) else {
            return (0, self.rows.len());
        };
        let end = self
            .sections
            .values()
            .copied()
            .filter(|&off| off > start)
            .min()
            .unwrap_or(self.rows.len());
        // Externally-authored offsets may overrun the row list.
        let start = start.min(self.rows.len());
        (start, end.min(self.rows.len()).max(start))
    }
}

/// The in-progress build a move search can be scoped to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PokemonSet {
    pub species: Id,
    pub ability: Option<String>,
    pub item: Option<String>,
    pub moves: Vec<Id>,
    pub level: Option<u8>,
}

/// Typed plugin hook for per-mod move-usefulness overrides. Invoked after
/// the built-in heuristic; a `Some` return wins. Never evaluated from a
/// string.
pub type UsefulnessHook =
    fn(&Id, &Species, &[Id], Option<&PokemonSet>, &Dex) -> Option<bool>;

/// A named ruleset overlay substituting or augmenting canonical tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModData {
    pub species: HashMap<Id, Species>,
    pub moves: HashMap<Id, MoveData>,
    pub items: HashMap<Id, ItemData>,
    pub abilities: HashMap<Id, AbilityData>,
    /// Species removed from the format's base pool.
    pub banlist: Vec<Id>,
    /// Species restored to the pool even though the tier slice excludes them.
    pub unbanlist: Vec<Id>,
    /// Unconditional usefulness overrides, keyed by move id.
    #[serde(rename = "uselessMoves")]
    pub useless_moves: HashMap<Id, bool>,
    /// Tier reassignments, keyed by species id (exact id, totem-stripped id
    /// or base-species id; see `PokemonSearch::tier_of` for precedence).
    #[serde(rename = "tierOverrides")]
    pub tier_overrides: HashMap<Id, String>,
    /// Learnset additions, keyed by learnset id then move id.
    #[serde(rename = "learnsetAdditions")]
    pub learnset_additions: HashMap<Id, HashMap<Id, String>>,
    #[serde(skip)]
    pub usefulness_hook: Option<UsefulnessHook>,
}

/// All provider tables, deserialized once and then frozen.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DexTables {
    pub species: HashMap<Id, Species>,
    pub moves: HashMap<Id, MoveData>,
    pub items: HashMap<Id, ItemData>,
    pub abilities: HashMap<Id, AbilityData>,
    pub types: HashMap<Id, TypeData>,
    /// learnset id → move id → generation-marker string. Markers are the
    /// digits `1`–`9` plus `g` (Let's Go) and `b` (BDSP).
    pub learnsets: HashMap<Id, HashMap<Id, String>>,
    /// Direct query remappings, independent of the index's alias entries.
    pub aliases: HashMap<Id, String>,
    /// Tier tables keyed by table kind: "singles", "doubles", "letsgo",
    /// "bdsp", "natdex", "stadium", …
    pub tiers: HashMap<String, TierTable>,
    pub mods: HashMap<String, ModData>,
}

/// Shared, read-only handle to the provider tables.
///
/// Cloning is an `Arc` bump, so every resolver can hold its own handle and
/// a context switch never copies a table.
#[derive(Debug, Clone, Default)]
pub struct Dex {
    inner: Arc<DexTables>,
}

impl Dex {
    pub fn new(tables: DexTables) -> Self {
        tracing::debug!(
            species = tables.species.len(),
            moves = tables.moves.len(),
            items = tables.items.len(),
            abilities = tables.abilities.len(),
            "dex loaded"
        );
        Dex { inner: Arc::new(tables) }
    }

    pub fn from_json(json: &str) -> Result<Self, DexSearchError> {
        Ok(Dex::new(serde_json::from_str(json)?))
    }

    pub fn tables(&self) -> &DexTables {
        &self.inner
    }

    pub fn species(&self, id: &str) -> Option<&Species> {
        self.inner.species.get(id)
    }

    pub fn move_data(&self, id: &str) -> Option<&MoveData> {
        self.inner.moves.get(id)
    }

    pub fn item(&self, id: &str) -> Option<&ItemData> {
        self.inner.items.get(id)
    }

    pub fn ability(&self, id: &str) -> Option<&AbilityData> {
        self.inner.abilities.get(id)
    }

    pub fn type_data(&self, id: &str) -> Option<&TypeData> {
        self.inner.types.get(id)
    }

    pub fn learnset(&self, learnset_id: &str) -> Option<&HashMap<Id, String>> {
        self.inner.learnsets.get(learnset_id)
    }

    pub fn alias(&self, query: &str) -> Option<&str> {
        self.inner.aliases.get(query).map(String::as_str)
    }

    pub fn tier_table(&self, kind: &str) -> Option<&TierTable> {
        self.inner.tiers.get(kind)
    }

    pub fn game_mod(&self, id: &str) -> Option<&ModData> {
        self.inner.mods.get(id)
    }

    /// Display name for an id, searching every table.
    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.species(id)
            .map(|s| s.name.as_str())
            .or_else(|| self.move_data(id).map(|m| m.name.as_str()))
            .or_else(|| self.item(id).map(|i| i.name.as_str()))
            .or_else(|| self.ability(id).map(|a| a.name.as_str()))
            .or_else(|| self.type_data(id).map(|t| t.name.as_str()))
    }

    /// Follow the learnset chain one hop: battle-only forme → forme-change
    /// source → base species → prevolution. Returns `None` at the chain end.
    pub fn next_learnset_id(&self, current: &Id) -> Option<Id> {
        let species = self.species(current)?;
        if let Some(source) = &species.battle_only {
            if source != current {
                return Some(source.clone());
            }
        }
        if let Some(source) = &species.changes_from {
            if source != current {
                return Some(source.clone());
            }
        }
        if let Some(base) = &species.base_species {
            if base != current {
                return Some(base.clone());
            }
        }
        species.prevo.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_range_inner_section() {
        let table = TierTable {
            rows: (0..10).map(|i| TierRow::Entry(Id::raw(format!("mon{i}")))).collect(),
            sections: BTreeMap::from([
                ("OU".to_string(), 0),
                ("UU".to_string(), 5),
                ("Uber".to_string(), 8),
            ]),
        };
        assert_eq!(table.slice_range("OU"), (0, 5));
        assert_eq!(table.slice_range("UU"), (5, 8));
        assert_eq!(table.slice_range("Uber"), (8, 10));
    }

    #[test]
    fn test_slice_range_tolerates_offsets_past_the_rows() {
        let table = TierTable {
            rows: vec![TierRow::Entry(Id::raw("a"))],
            sections: BTreeMap::from([
                ("OU".to_string(), 5),
                ("UU".to_string(), 9),
            ]),
        };
        assert_eq!(table.slice_range("OU"), (1, 1));
        assert_eq!(table.slice_range("UU"), (1, 1));
    }

    #[test]
    fn test_pokemon_set_default_is_empty() {
        let set = PokemonSet::default();
        assert!(set.species.is_empty());
        assert!(set.moves.is_empty());
        assert!(set.item.is_none());
    }

    #[test]
    fn test_slice_range_unknown_tier_is_full_table() {
        let table = TierTable {
            rows: vec![TierRow::Entry(Id::raw("a"))],
            sections: BTreeMap::new(),
        };
        assert_eq!(table.slice_range("OU"), (0, 1));
    }

    #[test]
    fn test_learnset_chain_prefers_battle_only() {
        let mut tables = DexTables::default();
        tables.species.insert(
            Id::raw("charizardmegax"),
            Species {
                name: "Charizard-Mega-X".into(),
                base_species: Some(Id::raw("charizard")),
                battle_only: Some(Id::raw("charizard")),
                ..Default::default()
            },
        );
        tables.species.insert(
            Id::raw("charizard"),
            Species { name: "Charizard".into(), prevo: Some(Id::raw("charmeleon")), ..Default::default() },
        );
        let dex = Dex::new(tables);
        assert_eq!(
            dex.next_learnset_id(&Id::raw("charizardmegax")),
            Some(Id::raw("charizard"))
        );
        assert_eq!(
            dex.next_learnset_id(&Id::raw("charizard")),
            Some(Id::raw("charmeleon"))
        );
        assert_eq!(dex.next_learnset_id(&Id::raw("charmeleon")), None);
    }

    #[test]
    fn test_from_json_minimal() {
        let dex = Dex::from_json(
            r#"{
                "species": {
                    "pikachu": {"name": "Pikachu", "gen": 1, "types": ["Electric"], "tier": "OU"}
                },
                "aliases": {"zard": "Charizard"}
            }"#,
        )
        .unwrap();
        assert_eq!(dex.species("pikachu").unwrap().name, "Pikachu");
        assert_eq!(dex.alias("zard"), Some("Charizard"));
        assert!(dex.species("missing").is_none());
    }

    #[test]
    fn test_tier_row_untagged_deserialization() {
        let rows: Vec<TierRow> =
            serde_json::from_str(r#"[{"header": "OU"}, "pikachu"]"#).unwrap();
        assert_eq!(rows[0], TierRow::Header { header: "OU".into() });
        assert_eq!(rows[1], TierRow::Entry(Id::raw("pikachu")));
    }
}
