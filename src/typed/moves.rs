// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Move search: the learnset walk and the "worth showing" split.
//!
//! A species' available moves come from walking its learnset chain — the
//! species itself, then battle-only/forme-change sources, then the
//! prevolution line — admitting each move whose learnset annotation matches
//! the resolved generation and game variant. On top of the walk sit the
//! format unions: Sketch drags in everything sketchable, hackmons formats
//! drag in everything, STAB formats add every same-type move, and Metronome
//! collapses the whole thing to one move.

use std::collections::BTreeSet;

use crate::dex::{Dex, MoveCategory, MoveData, Nonstandard, Species};
use crate::error::DexSearchError;
use crate::types::{Filter, Id, ResultRow, SearchType, SortCol};

use super::format::{FormatContext, FormatType};
use super::move_utility::move_is_useful;
use super::{sort_rows_by_name, BaseCache, MergedTable, TypedSearch, ILLEGAL_REASON};

/// Longest learnset chain we are willing to follow. Real chains are three
/// or four hops; anything longer is a data cycle.
const MAX_CHAIN_HOPS: usize = 8;

/// Display power for variable-power moves, so power sorting puts them where
/// players expect them instead of at zero.
const MOVE_POWER_OVERRIDES: &[(&str, u16)] = &[
    ("crushgrip", 120),
    ("dragonenergy", 150),
    ("electroball", 150),
    ("eruption", 150),
    ("flail", 200),
    ("frustration", 102),
    ("grassknot", 120),
    ("gyroball", 150),
    ("heatcrash", 120),
    ("heavyslam", 120),
    ("lowkick", 120),
    ("magnitude", 70),
    ("return", 102),
    ("reversal", 200),
    ("waterspout", 150),
];

pub struct MoveSearch {
    dex: Dex,
    ctx: FormatContext,
    cache: Option<BaseCache>,
}

impl MoveSearch {
    pub fn new(dex: Dex, ctx: FormatContext) -> Self {
        MoveSearch { dex, ctx, cache: None }
    }

    fn moves_table(&self) -> MergedTable<'_, MoveData> {
        let overlay = self
            .ctx
            .mod_id
            .as_deref()
            .and_then(|m| self.dex.game_mod(m))
            .map(|m| &m.moves);
        MergedTable::new(&self.dex.tables().moves, overlay)
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

    /// Whether a move is part of the active variant's pool at all.
    fn move_visible(&self, data: &MoveData) -> bool {
        match data.nonstandard {
            None => true,
            Some(Nonstandard::Past) => matches!(
                self.ctx.format_type,
                FormatType::NatDex | FormatType::SvDlc1NatDex
            ),
            Some(Nonstandard::Lgpe) => self.ctx.format_type == FormatType::LetsGo,
            Some(
                Nonstandard::Cap
                | Nonstandard::Future
                | Nonstandard::Custom
                | Nonstandard::Gigantamax,
            ) => false,
        }
    }

    /// The raw learnset-walk pool for the context species.
    fn collect_learned(&self, species_id: &Id) -> BTreeSet<Id> {
        let moves = self.moves_table();
        let game_mod = self.ctx.mod_id.as_deref().and_then(|m| self.dex.game_mod(m));
        let mut pool = BTreeSet::new();
        let mut current = species_id.clone();
        let mut visited: Vec<Id> = Vec::new();

        while visited.len() < MAX_CHAIN_HOPS && !visited.contains(&current) {
            visited.push(current.clone());
            let canonical = self.dex.learnset(&current);
            let additions = game_mod.and_then(|m| m.learnset_additions.get(current.as_str()));
            for learnset in canonical.into_iter().chain(additions) {
                for (move_id, code) in learnset {
                    let Some(data) = moves.get(move_id) else { continue };
                    if !self.move_visible(data) {
                        continue;
                    }
                    if code_admits(&self.ctx, code, data.gen) {
                        pool.insert(move_id.clone());
                    }
                }
            }
            match self.dex.next_learnset_id(&current) {
                Some(next) => current = next,
                None => break,
            }
        }
        pool
    }

    fn expand_hidden_power(&self, pool: &mut BTreeSet<Id>) {
        if !pool.remove("hiddenpower") {
            return;
        }
        let moves = self.moves_table();
        for (type_id, type_data) in &self.dex.tables().types {
            if type_data.gen > self.ctx.gen {
                continue;
            }
            if type_id.as_str() == "normal" || type_id.as_str() == "fairy" {
                continue;
            }
            let concrete = Id::raw(format!("hiddenpower{type_id}"));
            if moves.contains(&concrete) {
                pool.insert(concrete);
            }
        }
    }

    fn apply_format_unions(&self, species: &Species, pool: &mut BTreeSet<Id>) {
        let moves = self.moves_table();
        if self.ctx.format_type == FormatType::Metronome {
            pool.clear();
            if moves.contains("metronome") {
                pool.insert(Id::raw("metronome"));
            }
            return;
        }
        let everything = self.ctx.format.contains("hackmons") || self.ctx.format == "bh";
        let sketch = pool.contains("sketch");
        let stab = self.ctx.format.contains("stabmons");
        if everything || sketch {
            for id in moves.ids() {
                let Some(data) = moves.get(id) else { continue };
                if !self.move_visible(data) {
                    continue;
                }
                if sketch && !everything && data.flags.no_sketch {
                    continue;
                }
                pool.insert(id.clone());
            }
        }
        if stab {
            for id in moves.ids() {
                let Some(data) = moves.get(id) else { continue };
                if !self.move_visible(data) {
                    continue;
                }
                let same_type = species.types.iter().any(|t| {
                    t.eq_ignore_ascii_case(&data.move_type)
                        && self
                            .dex
                            .type_data(&crate::utils::to_id(t))
                            .map_or(true, |td| td.gen <= self.ctx.gen)
                });
                if same_type {
                    pool.insert(id.clone());
                }
            }
        }
    }

    fn display_power(&self, id: &str, data: &MoveData) -> u16 {
        MOVE_POWER_OVERRIDES
            .iter()
            .find(|(overridden, _)| *overridden == id)
            .map_or(data.base_power, |(_, power)| *power)
    }
}

/// Whether a learnset annotation admits the move in this context.
fn code_admits(ctx: &FormatContext, code: &str, move_gen: u8) -> bool {
    let marker = match ctx.format_type {
        FormatType::LetsGo => 'g',
        FormatType::Bdsp | FormatType::BdspDoubles => 'b',
        _ => char::from_digit(u32::from(ctx.gen), 10).unwrap_or('9'),
    };
    if code.contains(marker) {
        return true;
    }
    // Tradebacks: a move learned one generation later is admissible when the
    // move itself originates no later than the active generation.
    if ctx.format.contains("tradebacks") {
        if let Some(next) = char::from_digit(u32::from(ctx.gen) + 1, 10) {
            return code.contains(next) && move_gen <= ctx.gen;
        }
    }
    false
}

/// Whether `species_id` can learn `move_id` in this context. Used both by
/// the species search's move filter and the move search's species filter.
pub(crate) fn can_learn(dex: &Dex, ctx: &FormatContext, species_id: &str, move_id: &str) -> bool {
    let game_mod = ctx.mod_id.as_deref().and_then(|m| dex.game_mod(m));
    let move_gen = dex.move_data(move_id).map_or(0, |m| m.gen);
    let mut current = Id::raw(species_id);
    let mut visited: Vec<Id> = Vec::new();
    while visited.len() < MAX_CHAIN_HOPS && !visited.contains(&current) {
        visited.push(current.clone());
        let canonical = dex.learnset(&current);
        let additions = game_mod.and_then(|m| m.learnset_additions.get(current.as_str()));
        for learnset in canonical.into_iter().chain(additions) {
            if let Some(code) = learnset.get(move_id) {
                if code_admits(ctx, code, move_gen) {
                    return true;
                }
            }
        }
        match dex.next_learnset_id(&current) {
            Some(next) => current = next,
            None => break,
        }
    }
    false
}

impl TypedSearch for MoveSearch {
    fn search_type(&self) -> SearchType {
        SearchType::Move
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
        let species_id = self.ctx.species.clone();
        let Some(species_id) = species_id else {
            return BaseCache { rows: self.default_results(), illegal: Default::default() };
        };
        let Some(species) = self.species_table().get(&species_id).cloned() else {
            return BaseCache { rows: self.default_results(), illegal: Default::default() };
        };

        let mut pool = self.collect_learned(&species_id);
        self.apply_format_unions(&species, &mut pool);
        self.expand_hidden_power(&mut pool);

        let known: Vec<Id> = pool.iter().cloned().collect();
        let mut usable: Vec<ResultRow> = Vec::new();
        let mut useless: Vec<ResultRow> = Vec::new();
        for id in &pool {
            let row = ResultRow::hit(SearchType::Move, id.clone());
            if move_is_useful(&self.dex, &self.ctx, id, &species, &known, self.ctx.set.as_ref()) {
                usable.push(row);
            } else {
                useless.push(row);
            }
        }
        let usable = sort_rows_by_name(&self.dex, usable, false);
        let useless = sort_rows_by_name(&self.dex, useless, false);

        let mut rows = Vec::with_capacity(usable.len() + useless.len() + 2);
        rows.push(ResultRow::header("Moves"));
        rows.extend(usable);
        if !useless.is_empty() {
            rows.push(ResultRow::header("Usually useless moves"));
            rows.extend(useless);
        }

        let mut illegal = std::collections::HashMap::new();
        for id in self.moves_table().ids() {
            if !pool.contains(id) {
                illegal.insert(id.clone(), ILLEGAL_REASON.to_string());
            }
        }
        tracing::debug!(
            species = %species_id,
            pool = pool.len(),
            illegal = illegal.len(),
            "move base results computed"
        );
        BaseCache { rows, illegal }
    }

    fn default_results(&self) -> Vec<ResultRow> {
        let moves = self.moves_table();
        let rows: Vec<ResultRow> = moves
            .ids()
            .into_iter()
            .filter(|id| moves.get(id).is_some_and(|m| self.move_visible(m)))
            .map(|id| ResultRow::hit(SearchType::Move, id.clone()))
            .collect();
        let mut out = vec![ResultRow::header("Moves")];
        out.extend(sort_rows_by_name(&self.dex, rows, false));
        out
    }

    fn matches_filters(&self, id: &Id, filters: &[Filter]) -> bool {
        let moves = self.moves_table();
        let Some(data) = moves.get(id) else { return false };
        filters.iter().all(|filter| match filter.search_type {
            SearchType::Type => crate::utils::to_id(&data.move_type) == filter.value.as_str(),
            SearchType::Category => {
                let label = match data.category {
                    MoveCategory::Physical => "physical",
                    MoveCategory::Special => "special",
                    MoveCategory::Status => "status",
                };
                label == filter.value.as_str()
            }
            SearchType::Pokemon => can_learn(&self.dex, &self.ctx, &filter.value, id),
            _ => true,
        })
    }

    fn sort(
        &self,
        mut rows: Vec<ResultRow>,
        col: SortCol,
        reverse: bool,
    ) -> Result<Vec<ResultRow>, DexSearchError> {
        let moves = self.moves_table();
        let key = |id: &Id| -> Option<i64> {
            let data = moves.get(id)?;
            Some(match col {
                SortCol::Power => i64::from(self.display_power(id, data)),
                // A move that cannot miss sorts above perfect accuracy.
                SortCol::Accuracy => data.accuracy.map_or(101, i64::from),
                SortCol::Pp => i64::from(data.pp),
                _ => return None,
            })
        };
        match col {
            SortCol::Name => Ok(sort_rows_by_name(&self.dex, rows, reverse)),
            SortCol::Power | SortCol::Accuracy | SortCol::Pp => {
                let row_key = |row: &ResultRow| row.hit_id().and_then(key).unwrap_or(i64::MIN);
                if reverse {
                    rows.sort_by(|a, b| row_key(b).cmp(&row_key(a)));
                } else {
                    rows.sort_by_key(row_key);
                }
                Ok(rows)
            }
            _ => Err(DexSearchError::UnsupportedSort { search_type: SearchType::Move, col }),
        }
    }
}
