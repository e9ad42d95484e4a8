// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! "Is this move worth showing?" — the usable/useless split.
//!
//! A species' full learnset is long and most of it is chaff. This module
//! decides, per move and per context, whether a move belongs in the main
//! listing or the "usually useless" trailer. Pure function of its inputs:
//! no caches here (callers memoize), no side effects, deterministic.
//!
//! Priority ladder:
//! 1. per-mod unconditional override table
//! 2. generation-1 curated rules (incl. redundancy with known moves)
//! 3. Let's Go / Metronome format allow lists
//! 4. per-move synergy switch (ability/item prerequisites, redundancy,
//!    stat thresholds)
//! 5. generic category rules (status allow-list, weak-move allow-list,
//!    recharge/charge handling, strong-move deny-list)
//! 6. per-mod typed hook, overriding the built-in verdict when it returns
//!    `Some`

use crate::dex::{Dex, MoveCategory, PokemonSet, Species};
use crate::types::Id;

use super::format::{FormatContext, FormatType};
use super::MergedTable;

/// Damaging moves below this base power must earn their slot via
/// [`GOOD_WEAK_MOVES`].
pub const WEAK_POWER_THRESHOLD: u16 = 50;

/// Status moves shown in the main listing. Everything not here trails.
pub const GOOD_STATUS_MOVES: &[&str] = &[
    "acidarmor", "agility", "aromatherapy", "auroraveil", "autotomize", "banefulbunker",
    "batonpass", "bellydrum", "bulkup", "calmmind", "coil", "cottonguard", "courtchange",
    "curse", "defog", "destinybond", "detect", "disable", "dragondance", "encore",
    "filletaway", "glare", "haze", "healbell", "healingwish", "healorder", "heartswap",
    "irondefense", "leechseed", "lightscreen", "lovelykiss", "magiccoat", "memento",
    "milkdrink", "moonlight", "morningsun", "nastyplot", "naturesmadness", "painsplit",
    "partingshot", "perishsong", "protect", "quiverdance", "raindance", "recover",
    "reflect", "rest", "roar", "roost", "sandstorm", "shellsmash", "shiftgear",
    "slackoff", "sleeppowder", "sleeptalk", "snowscape", "softboiled", "spikes",
    "spore", "stealthrock", "stickyweb", "strengthsap", "substitute", "sunnyday",
    "swordsdance", "synthesis", "tailwind", "taunt", "thunderwave", "toxic",
    "toxicspikes", "transform", "trick", "whirlwind", "willowisp", "wish", "yawn",
];

/// Weak damaging moves worth showing anyway (utility riders, multi-hit,
/// priority, fixed damage).
pub const GOOD_WEAK_MOVES: &[&str] = &[
    "accelerock", "aquajet", "avalanche", "bonemerang", "bulletpunch", "bulletseed",
    "ceaselessedge", "circlethrow", "clearsmog", "dragondarts", "dragontail",
    "endeavor", "facade", "firefang", "flipturn", "freezedry", "grassknot",
    "gyroball", "iceshard", "iciclespear", "knockoff", "lowkick", "machpunch",
    "mortalspin", "nightshade", "nuzzle", "pikapapow", "populationbomb", "pursuit",
    "quickattack", "rapidspin", "rockblast", "ruination", "saltcure", "scorchingsands",
    "seismictoss", "shadowsneak", "storedpower", "suckerpunch", "superfang",
    "surgingstrikes", "tailslap", "uturn", "voltswitch", "watershuriken",
    "weatherball",
];

/// Strong damaging moves that still trail: over-penalized drawbacks or
/// strictly-better alternatives exist.
pub const BAD_STRONG_MOVES: &[&str] = &[
    "belch", "burnup", "crushclaw", "dragonrush", "dreameater", "eggbomb",
    "firepledge", "flyingpress", "grasspledge", "hyperbeam", "hyperfang",
    "hyperspacehole", "jawlock", "landswrath", "megakick", "megapunch",
    "muddywater", "nightdaze", "pollenpuff", "rockclimb", "selfdestruct",
    "skyuppercut", "slam", "strength", "submission", "synchronoise",
    "takedown", "thrash", "uproar", "waterpledge",
];

/// Gen 1 has its own meta: no items, no abilities, different mechanics.
const GEN1_GOOD_MOVES: &[&str] = &[
    "bind", "counter", "hyperbeam", "lowkick", "nightshade", "psywave",
    "seismictoss", "sonicboom", "twineedle", "wrap",
];

/// Gen 1 moves made redundant by a strictly better known move.
const GEN1_REDUNDANT: &[(&str, &str)] = &[
    ("bubblebeam", "surf"),
    ("doubleedge", "bodyslam"),
    ("megadrain", "razorleaf"),
    ("slash", "bodyslam"),
    ("thunderbolt", "thunder"),
];

/// Let's Go keeps a tiny curated pool of non-damaging moves worth a slot.
const LETSGO_GOOD_MOVES: &[&str] = &[
    "agility", "calmmind", "lightscreen", "protect", "reflect", "rest",
    "substitute", "swordsdance", "thunderwave", "toxic",
];

fn known(known_moves: &[Id], id: &str) -> bool {
    known_moves.iter().any(|m| m.as_str() == id)
}

fn knows_any(known_moves: &[Id], ids: &[&str]) -> bool {
    ids.iter().any(|id| known(known_moves, id))
}

fn has_ability(species: &Species, set: Option<&PokemonSet>, ability: &str) -> bool {
    if let Some(chosen) = set.and_then(|s| s.ability.as_deref()) {
        return chosen.eq_ignore_ascii_case(ability);
    }
    species.abilities.iter().any(|a| a.eq_ignore_ascii_case(ability))
}

fn item_is(set: Option<&PokemonSet>, item: &str) -> bool {
    set.and_then(|s| s.item.as_deref())
        .is_some_and(|i| i.eq_ignore_ascii_case(item))
}

/// Decide whether `move_id` belongs in the main listing for this context.
pub fn move_is_useful(
    dex: &Dex,
    ctx: &FormatContext,
    move_id: &Id,
    species: &Species,
    known_moves: &[Id],
    set: Option<&PokemonSet>,
) -> bool {
    let game_mod = ctx.mod_id.as_deref().and_then(|m| dex.game_mod(m));

    // 1. Unconditional per-mod override.
    if let Some(&useless) = game_mod.and_then(|m| m.useless_moves.get(move_id.as_str())) {
        return !useless;
    }

    let builtin = builtin_verdict(dex, ctx, move_id, species, known_moves, set);

    // 6. Typed per-mod hook wins over the built-in verdict when defined.
    if let Some(hook) = game_mod.and_then(|m| m.usefulness_hook) {
        return hook(move_id, species, known_moves, set, dex).unwrap_or(builtin);
    }
    builtin
}

fn builtin_verdict(
    dex: &Dex,
    ctx: &FormatContext,
    move_id: &Id,
    species: &Species,
    known_moves: &[Id],
    set: Option<&PokemonSet>,
) -> bool {
    let game_mod = ctx.mod_id.as_deref().and_then(|m| dex.game_mod(m));
    let moves = MergedTable::new(&dex.tables().moves, game_mod.map(|m| &m.moves));
    let Some(data) = moves.get(move_id) else {
        return false;
    };
    let id = move_id.as_str();

    // 2. Gen 1 curated rules.
    if ctx.gen == 1 {
        if GEN1_GOOD_MOVES.contains(&id) {
            return true;
        }
        for (redundant, better) in GEN1_REDUNDANT {
            if id == *redundant && known(known_moves, better) {
                return false;
            }
        }
    }

    // 3. Format allow lists.
    if ctx.format_type == FormatType::Metronome {
        return id == "metronome";
    }
    if ctx.format_type == FormatType::LetsGo {
        return data.base_power >= WEAK_POWER_THRESHOLD || LETSGO_GOOD_MOVES.contains(&id);
    }

    // 4. Per-move synergy switch.
    if let Some(verdict) = synergy_verdict(ctx, id, data.category, species, known_moves, set) {
        return verdict;
    }

    // 5. Generic category rules.
    if data.category == MoveCategory::Status {
        return GOOD_STATUS_MOVES.contains(&id);
    }
    if data.flags.recharge {
        return false;
    }
    if data.flags.charge {
        // A two-turn move is only plausible when the one-turn item is.
        return set.is_none() || item_is(set, "Power Herb");
    }
    if data.base_power < WEAK_POWER_THRESHOLD {
        return GOOD_WEAK_MOVES.contains(&id);
    }
    !BAD_STRONG_MOVES.contains(&id)
}

/// Game-specific synergy rules, keyed by move id. `None` falls through to
/// the generic rules.
fn synergy_verdict(
    ctx: &FormatContext,
    id: &str,
    category: MoveCategory,
    species: &Species,
    known_moves: &[Id],
    set: Option<&PokemonSet>,
) -> Option<bool> {
    let stats = &species.base_stats;
    match id {
        "aerialace" => Some(has_ability(species, set, "Technician")),
        "ancientpower" => {
            Some(has_ability(species, set, "Serene Grace") || ctx.format_type == FormatType::NatDex)
        }
        "counter" => Some(stats.hp >= 65),
        "dreameater" => Some(knows_any(known_moves, &["hypnosis", "sleeppowder", "spore", "darkvoid"])),
        "drainingkiss" => Some(has_ability(species, set, "Triage")),
        "electroball" => Some(stats.spe >= 100),
        "facade" => {
            Some(item_is(set, "Flame Orb") || item_is(set, "Toxic Orb") || stats.spe >= 60)
        }
        "flail" | "reversal" => Some(known(known_moves, "endure")),
        "focuspunch" => Some(known(known_moves, "substitute")),
        "gyroball" => Some(stats.spe <= 60),
        "hex" => Some(knows_any(known_moves, &["willowisp", "toxic", "thunderwave", "nuzzle"])),
        "hiddenpower" => Some(false), // the pseudo-move itself; sub-types stand alone
        "skillswap" => Some(has_ability(species, set, "Truant") || has_ability(species, set, "Slow Start")),
        "sleeptalk" => Some(known(known_moves, "rest")),
        "smackdown" => Some(knows_any(known_moves, &["earthquake", "highhorsepower"])),
        "solarbeam" | "solarblade" => {
            if known(known_moves, "sunnyday") || has_ability(species, set, "Drought") {
                Some(true)
            } else {
                None // fall through to the charge-move rule
            }
        }
        "steelbeam" => Some(category == MoveCategory::Special && stats.spa >= stats.atk),
        "stompingtantrum" => Some(!known(known_moves, "earthquake")),
        "storedpower" => {
            Some(knows_any(known_moves, &["calmmind", "quiverdance", "nastyplot", "irondefense"]))
        }
        "terrainpulse" => Some(species.abilities.iter().any(|a| a.ends_with("Surge"))),
        "trickroom" => Some(stats.spe <= 100),
        "weatherball" => Some(knows_any(known_moves, &["sunnyday", "raindance"])
            || has_ability(species, set, "Drought")
            || has_ability(species, set, "Drizzle")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::{DexTables, ModData, MoveData, MoveFlags};
    use crate::typed::format::FormatContext;
    use std::collections::HashMap;

    fn dex_with(moves: Vec<(&str, MoveData)>) -> Dex {
        let mut tables = DexTables::default();
        for (id, data) in moves {
            tables.moves.insert(Id::raw(id), data);
        }
        Dex::new(tables)
    }

    fn damaging(power: u16) -> MoveData {
        MoveData {
            category: MoveCategory::Physical,
            base_power: power,
            ..Default::default()
        }
    }

    fn check(dex: &Dex, ctx: &FormatContext, id: &str, known: &[Id]) -> bool {
        move_is_useful(dex, ctx, &Id::raw(id), &Species::default(), known, None)
    }

    #[test]
    fn test_recharge_moves_are_never_useful() {
        let dex = dex_with(vec![(
            "hyperbeam",
            MoveData {
                base_power: 150,
                flags: MoveFlags { recharge: true, ..Default::default() },
                ..damaging(150)
            },
        )]);
        assert!(!check(&dex, &FormatContext::default(), "hyperbeam", &[]));
    }

    #[test]
    fn test_gen1_exempts_hyperbeam() {
        let dex = dex_with(vec![(
            "hyperbeam",
            MoveData {
                flags: MoveFlags { recharge: true, ..Default::default() },
                ..damaging(150)
            },
        )]);
        let ctx = FormatContext { gen: 1, ..Default::default() };
        assert!(check(&dex, &ctx, "hyperbeam", &[]));
    }

    #[test]
    fn test_status_moves_need_allow_list() {
        let dex = dex_with(vec![
            ("protect", MoveData::default()),
            ("splash", MoveData::default()),
        ]);
        let ctx = FormatContext::default();
        assert!(check(&dex, &ctx, "protect", &[]));
        assert!(!check(&dex, &ctx, "splash", &[]));
    }

    #[test]
    fn test_weak_moves_need_allow_list() {
        let dex = dex_with(vec![
            ("knockoff", damaging(65)),
            ("quickattack", damaging(40)),
            ("tackle", damaging(40)),
        ]);
        let ctx = FormatContext::default();
        assert!(check(&dex, &ctx, "quickattack", &[]));
        assert!(!check(&dex, &ctx, "tackle", &[]));
    }

    #[test]
    fn test_synergy_sleeptalk_requires_rest() {
        let dex = dex_with(vec![("sleeptalk", MoveData::default())]);
        let ctx = FormatContext::default();
        assert!(!check(&dex, &ctx, "sleeptalk", &[]));
        assert!(check(&dex, &ctx, "sleeptalk", &[Id::raw("rest")]));
    }

    #[test]
    fn test_facade_needs_a_status_orb_or_speed() {
        let dex = dex_with(vec![("facade", damaging(70))]);
        let ctx = FormatContext::default();
        let slow = Species::default();
        assert!(!move_is_useful(&dex, &ctx, &Id::raw("facade"), &slow, &[], None));
        let set = PokemonSet { item: Some("Toxic Orb".to_string()), ..Default::default() };
        assert!(move_is_useful(&dex, &ctx, &Id::raw("facade"), &slow, &[], Some(&set)));
    }

    #[test]
    fn test_mod_override_beats_everything() {
        let mut tables = DexTables::default();
        tables.moves.insert(Id::raw("splash"), MoveData::default());
        let mut game_mod = ModData::default();
        game_mod.useless_moves = HashMap::from([(Id::raw("splash"), false)]);
        tables.mods.insert("buffmod".to_string(), game_mod);
        let dex = Dex::new(tables);
        let ctx = FormatContext { mod_id: Some("buffmod".to_string()), ..Default::default() };
        assert!(check(&dex, &ctx, "splash", &[]));
    }

    #[test]
    fn test_hook_overrides_builtin() {
        fn deny_all(
            _: &Id,
            _: &Species,
            _: &[Id],
            _: Option<&PokemonSet>,
            _: &Dex,
        ) -> Option<bool> {
            Some(false)
        }
        let mut tables = DexTables::default();
        tables.moves.insert(Id::raw("protect"), MoveData::default());
        let mut game_mod = ModData::default();
        game_mod.usefulness_hook = Some(deny_all);
        tables.mods.insert("nomod".to_string(), game_mod);
        let dex = Dex::new(tables);
        let ctx = FormatContext { mod_id: Some("nomod".to_string()), ..Default::default() };
        assert!(!check(&dex, &ctx, "protect", &[]));
    }

    #[test]
    fn test_metronome_format_collapses() {
        let dex = dex_with(vec![
            ("metronome", MoveData::default()),
            ("protect", MoveData::default()),
        ]);
        let ctx = FormatContext { format_type: FormatType::Metronome, ..Default::default() };
        assert!(check(&dex, &ctx, "metronome", &[]));
        assert!(!check(&dex, &ctx, "protect", &[]));
    }
}
