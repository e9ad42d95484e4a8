// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ability search. Scoped to a species it lists only that species' ability
//! slots; unscoped it is a plain generation-gated listing.

use std::collections::HashMap;

use crate::dex::{AbilityData, Dex, Nonstandard, Species};
use crate::types::{Id, ResultRow, SearchType};
use crate::utils::to_id;

use super::format::{FormatContext, FormatType};
use super::{sort_rows_by_name, BaseCache, MergedTable, TypedSearch, ILLEGAL_REASON};

pub struct AbilitySearch {
    dex: Dex,
    ctx: FormatContext,
    cache: Option<BaseCache>,
}

impl AbilitySearch {
    pub fn new(dex: Dex, ctx: FormatContext) -> Self {
        AbilitySearch { dex, ctx, cache: None }
    }

    fn abilities_table(&self) -> MergedTable<'_, AbilityData> {
        let overlay = self
            .ctx
            .mod_id
            .as_deref()
            .and_then(|m| self.dex.game_mod(m))
            .map(|m| &m.abilities);
        MergedTable::new(&self.dex.tables().abilities, overlay)
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

    fn ability_visible(&self, data: &AbilityData) -> bool {
        if data.gen > self.ctx.gen {
            return false;
        }
        match data.nonstandard {
            None => true,
            Some(Nonstandard::Past) => matches!(
                self.ctx.format_type,
                FormatType::NatDex | FormatType::SvDlc1NatDex
            ),
            Some(_) => false,
        }
    }
}

impl TypedSearch for AbilitySearch {
    fn search_type(&self) -> SearchType {
        SearchType::Ability
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
        let abilities = self.abilities_table();
        let own: Vec<Id> = self
            .ctx
            .species
            .as_ref()
            .and_then(|id| self.species_table().get(id))
            .map(|s| s.abilities.iter().map(|a| Id::raw(to_id(a))).collect())
            .unwrap_or_default();

        if own.is_empty() {
            // Unscoped: everything visible in this generation.
            let mut illegal = HashMap::new();
            let mut rows = Vec::new();
            for id in abilities.ids() {
                let Some(data) = abilities.get(id) else { continue };
                if self.ability_visible(data) {
                    rows.push(ResultRow::hit(SearchType::Ability, id.clone()));
                } else {
                    illegal.insert(id.clone(), ILLEGAL_REASON.to_string());
                }
            }
            let mut out = vec![ResultRow::header("Abilities")];
            out.extend(sort_rows_by_name(&self.dex, rows, false));
            return BaseCache { rows: out, illegal };
        }

        let mut rows = vec![ResultRow::header("Abilities")];
        let own_rows: Vec<ResultRow> = own
            .iter()
            .filter(|id| abilities.contains(id))
            .map(|id| ResultRow::hit(SearchType::Ability, id.clone()))
            .collect();
        rows.extend(sort_rows_by_name(&self.dex, own_rows, false));

        let mut illegal = HashMap::new();
        for id in abilities.ids() {
            if !own.iter().any(|o| o == id) {
                illegal.insert(id.clone(), ILLEGAL_REASON.to_string());
            }
        }
        BaseCache { rows: crate::types::sanitize_rows(rows), illegal }
    }

    fn default_results(&self) -> Vec<ResultRow> {
        let abilities = self.abilities_table();
        let rows: Vec<ResultRow> = abilities
            .ids()
            .into_iter()
            .map(|id| ResultRow::hit(SearchType::Ability, id.clone()))
            .collect();
        let mut out = vec![ResultRow::header("Abilities")];
        out.extend(sort_rows_by_name(&self.dex, rows, false));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::DexTables;
    use crate::typed::format::resolve_format;

    fn fixture() -> Dex {
        let mut tables = DexTables::default();
        tables.abilities.insert(
            Id::raw("static"),
            AbilityData { name: "Static".into(), gen: 3, ..Default::default() },
        );
        tables.abilities.insert(
            Id::raw("lightningrod"),
            AbilityData { name: "Lightning Rod".into(), gen: 3, ..Default::default() },
        );
        tables.abilities.insert(
            Id::raw("intimidate"),
            AbilityData { name: "Intimidate".into(), gen: 3, ..Default::default() },
        );
        tables.species.insert(
            Id::raw("pikachu"),
            Species {
                name: "Pikachu".into(),
                abilities: vec!["Static".into(), "Lightning Rod".into()],
                ..Default::default()
            },
        );
        Dex::new(tables)
    }

    #[test]
    fn test_scoped_to_species_slots() {
        let dex = fixture();
        let mut ctx = resolve_format(&dex, "gen9ou");
        ctx.species = Some(Id::raw("pikachu"));
        let mut s = AbilitySearch::new(dex, ctx);
        let ids: Vec<&str> = s
            .base_results()
            .iter()
            .filter_map(|r| r.hit_id().map(Id::as_str))
            .collect();
        assert_eq!(ids, vec!["lightningrod", "static"]);
        assert!(s.illegal_reason("intimidate").is_some());
        assert!(s.illegal_reason("static").is_none());
    }

    #[test]
    fn test_unscoped_lists_everything() {
        let dex = fixture();
        let ctx = resolve_format(&dex, "gen9ou");
        let mut s = AbilitySearch::new(dex, ctx);
        let hits = s.base_results().iter().filter(|r| r.hit_id().is_some()).count();
        assert_eq!(hits, 3);
    }
}
