// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Species search: tier-sliced legality and stat sorting.
//!
//! The legal pool for a format is a contiguous slice of a precomputed tier
//! table, resolved in two steps: the format variant picks which table
//! ("singles", "doubles", "letsgo", …) and the residual format string picks
//! the boundary name within it. Mod banlists/unbanlists then adjust the
//! slice, and Gigantamax formes drop out everywhere below Anything Goes.

use std::collections::{HashMap, HashSet};

use crate::dex::{Dex, Nonstandard, Species, TierRow};
use crate::error::DexSearchError;
use crate::types::{sanitize_rows, Filter, Id, ResultRow, SearchType, SortCol};
use crate::utils::to_id;

use super::format::{FormatContext, FormatType};
use super::moves::can_learn;
use super::{sort_rows_by_name, BaseCache, MergedTable, TypedSearch, ILLEGAL_REASON};

/// Cosmetic duplicate kept in the data tables for completeness but never
/// shown in listings.
const PRESENTATION_DUPLICATE: &str = "pichuspikyeared";

/// Boundary names tried against the residual format string, highest tier
/// first so "uberuu" style strings cannot resolve to the wrong slice.
const TIER_BOUNDARIES: &[(&str, &str)] = &[
    ("anythinggoes", "AG"),
    ("ag", "AG"),
    ("uber", "Uber"),
    ("zu", "ZU"),
    ("pu", "PU"),
    ("nu", "NU"),
    ("ru", "RU"),
    ("uu", "UU"),
    ("littlecup", "LC"),
    ("lc", "LC"),
    ("nfe", "NFE"),
];

pub struct PokemonSearch {
    dex: Dex,
    ctx: FormatContext,
    cache: Option<BaseCache>,
}

impl PokemonSearch {
    pub fn new(dex: Dex, ctx: FormatContext) -> Self {
        PokemonSearch { dex, ctx, cache: None }
    }

    fn species_table(&self) -> MergedTable<'_, Species> {
        let overlay = self
            .ctx
            .mod_id
            .as_deref()
            .and_then(|m| self.dex.game_mod(m))
            .map(|m| &m.species);
        MergedTable::new(&self.dex.tables().species, overlay)
    }

    /// Which precomputed tier table the resolved variant reads from.
    fn tier_table_kind(&self) -> &'static str {
        match self.ctx.format_type {
            FormatType::LetsGo => "letsgo",
            FormatType::Bdsp => "bdsp",
            FormatType::BdspDoubles => "bdspdoubles",
            FormatType::NatDex | FormatType::SvDlc1NatDex => "natdex",
            FormatType::Stadium => "stadium",
            FormatType::SsPreDlc => "sspredlc",
            FormatType::SsDlc1 => "ssdlc1",
            FormatType::SsDlc1Doubles => "ssdlc1doubles",
            FormatType::SvDlc1 => "svdlc1",
            FormatType::Doubles => "doubles",
            _ => "singles",
        }
    }

    /// Boundary name within the active table. Doubles variants prefer the
    /// `D`-prefixed boundary ("DOU", "DUber") when the table has one.
    fn tier_boundary(&self, sections: &std::collections::BTreeMap<String, usize>) -> String {
        let name = TIER_BOUNDARIES
            .iter()
            .find(|(needle, _)| self.ctx.format.contains(needle))
            .map_or("OU", |(_, boundary)| *boundary);
        if self.ctx.format_type.is_doubles() {
            let doubled = format!("D{name}");
            if sections.contains_key(&doubled) {
                return doubled;
            }
        }
        name.to_string()
    }
}

impl TypedSearch for PokemonSearch {
    fn search_type(&self) -> SearchType {
        SearchType::Pokemon
    }

    fn ctx(&self) -> &FormatContext {
        &self.ctx
    }

    fn dex(&self) -> &Dex {
        &self.dex
    }

    fn cache_slot(&mut self) -> &mut Option<BaseCache> {
        &mut self.cache
    }

    fn compute_base(&self) -> BaseCache {
        let species = self.species_table();
        let Some(table) = self.dex.tier_table(self.tier_table_kind()) else {
            // No tier data for this variant: everything is legal.
            return BaseCache { rows: self.default_results(), illegal: HashMap::new() };
        };

        let boundary = self.tier_boundary(&table.sections);
        let (start, end) = table.slice_range(&boundary);
        let game_mod = self.ctx.mod_id.as_deref().and_then(|m| self.dex.game_mod(m));
        let banned: HashSet<&str> = game_mod
            .map(|m| m.banlist.iter().map(Id::as_str).collect())
            .unwrap_or_default();

        let mut rows: Vec<ResultRow> = Vec::with_capacity(end - start);
        for row in &table.rows[start..end] {
            match row {
                TierRow::Header { header } => rows.push(ResultRow::header(header.clone())),
                TierRow::Entry(id) => {
                    if banned.contains(id.as_str()) {
                        continue;
                    }
                    if boundary != "AG" && species.get(id).map_or(false, Species::is_gmax) {
                        continue;
                    }
                    rows.push(ResultRow::hit(SearchType::Pokemon, id.clone()));
                }
            }
        }
        if let Some(game_mod) = game_mod {
            for id in &game_mod.unbanlist {
                if species.contains(id) && !rows.iter().any(|r| r.hit_id() == Some(id)) {
                    rows.push(ResultRow::hit(SearchType::Pokemon, id.clone()));
                }
            }
        }
        let rows = sanitize_rows(rows);

        let legal: HashSet<&str> = rows
            .iter()
            .filter_map(|r| r.hit_id().map(Id::as_str))
            .collect();
        let mut illegal = HashMap::new();
        for id in species.ids() {
            if !legal.contains(id.as_str()) && id.as_str() != PRESENTATION_DUPLICATE {
                illegal.insert(id.clone(), ILLEGAL_REASON.to_string());
            }
        }
        tracing::debug!(
            table = self.tier_table_kind(),
            boundary = %boundary,
            legal = legal.len(),
            illegal = illegal.len(),
            "species base results computed"
        );
        BaseCache { rows, illegal }
    }

    /// Generation-grouped full listing, with CAP and glitch entries in their
    /// own trailing sections.
    fn default_results(&self) -> Vec<ResultRow> {
        let species = self.species_table();
        let mut by_gen: Vec<Vec<ResultRow>> = vec![Vec::new(); 9];
        let mut cap: Vec<ResultRow> = Vec::new();
        let mut glitch: Vec<ResultRow> = Vec::new();

        for id in species.ids() {
            if id.as_str() == PRESENTATION_DUPLICATE {
                continue;
            }
            let Some(data) = species.get(id) else { continue };
            let row = ResultRow::hit(SearchType::Pokemon, id.clone());
            match data.nonstandard {
                Some(Nonstandard::Cap) => cap.push(row),
                Some(Nonstandard::Custom) => glitch.push(row),
                Some(Nonstandard::Future | Nonstandard::Gigantamax) => {}
                _ => {
                    let gen = data.gen.clamp(1, 9) as usize;
                    by_gen[gen - 1].push(row);
                }
            }
        }

        let mut out = Vec::new();
        for (i, group) in by_gen.into_iter().enumerate() {
            if group.is_empty() {
                continue;
            }
            out.push(ResultRow::header(format!("Gen {}", i + 1)));
            out.extend(sort_rows_by_name(&self.dex, group, false));
        }
        if !cap.is_empty() {
            out.push(ResultRow::header("CAP"));
            out.extend(sort_rows_by_name(&self.dex, cap, false));
        }
        if !glitch.is_empty() {
            out.push(ResultRow::header("Glitch"));
            out.extend(sort_rows_by_name(&self.dex, glitch, false));
        }
        out
    }

    fn matches_filters(&self, id: &Id, filters: &[Filter]) -> bool {
        let species = self.species_table();
        let Some(data) = species.get(id) else { return false };
        filters.iter().all(|filter| match filter.search_type {
            SearchType::Type => data
                .types
                .iter()
                .any(|t| to_id(t) == filter.value.as_str()),
            SearchType::Ability => data
                .abilities
                .iter()
                .any(|a| to_id(a) == filter.value.as_str()),
            SearchType::EggGroup => data
                .egg_groups
                .iter()
                .any(|g| to_id(g) == filter.value.as_str()),
            SearchType::Tier => to_id(&self.tier_of(id)) == filter.value.as_str(),
            SearchType::Move => can_learn(&self.dex, &self.ctx, id, &filter.value),
            _ => true,
        })
    }

    fn sort(
        &self,
        mut rows: Vec<ResultRow>,
        col: SortCol,
        reverse: bool,
    ) -> Result<Vec<ResultRow>, DexSearchError> {
        let species = self.species_table();
        let stat_key = |id: &Id| -> Option<u32> {
            let stats = &species.get(id)?.base_stats;
            Some(match col {
                SortCol::Hp => u32::from(stats.hp),
                SortCol::Atk => u32::from(stats.atk),
                SortCol::Def => u32::from(stats.def),
                SortCol::SpA => u32::from(stats.spa),
                SortCol::SpD => u32::from(stats.spd),
                SortCol::Spe => u32::from(stats.spe),
                SortCol::Bst => stats.bst(),
                _ => return None,
            })
        };
        match col {
            SortCol::Name => Ok(sort_rows_by_name(&self.dex, rows, reverse)),
            SortCol::Hp
            | SortCol::Atk
            | SortCol::Def
            | SortCol::SpA
            | SortCol::SpD
            | SortCol::Spe
            | SortCol::Bst => {
                let row_key = |row: &ResultRow| row.hit_id().and_then(stat_key).unwrap_or(0);
                if reverse {
                    // Reversed comparator, not a reversed vector: ties must
                    // keep their incoming order in both directions.
                    rows.sort_by(|a, b| row_key(b).cmp(&row_key(a)));
                } else {
                    rows.sort_by_key(row_key);
                }
                Ok(rows)
            }
            _ => Err(DexSearchError::UnsupportedSort { search_type: SearchType::Pokemon, col }),
        }
    }

    /// Tier lookup with mod override precedence: exact id, then the id with
    /// a `totem` suffix stripped, then the base species, then the species
    /// table entry itself.
    fn tier_of(&self, id: &str) -> String {
        let species = self.species_table();
        if let Some(game_mod) = self.ctx.mod_id.as_deref().and_then(|m| self.dex.game_mod(m)) {
            if let Some(tier) = game_mod.tier_overrides.get(id) {
                return tier.clone();
            }
            if let Some(stripped) = id.strip_suffix("totem") {
                if let Some(tier) = game_mod.tier_overrides.get(stripped) {
                    return tier.clone();
                }
            }
            if let Some(base) = species.get(id).and_then(|s| s.base_species.as_ref()) {
                if let Some(tier) = game_mod.tier_overrides.get(base.as_str()) {
                    return tier.clone();
                }
            }
        }
        species.get(id).map(|s| s.tier.clone()).unwrap_or_default()
    }
}
