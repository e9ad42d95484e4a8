// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Item search. Items have no per-species legality; the only questions are
//! generation availability and nonstandard status.

use std::collections::HashMap;

use crate::dex::{Dex, ItemData, Nonstandard};
use crate::types::{Id, ResultRow, SearchType};

use super::format::{FormatContext, FormatType};
use super::{sort_rows_by_name, BaseCache, MergedTable, TypedSearch, ILLEGAL_REASON};

pub struct ItemSearch {
    dex: Dex,
    ctx: FormatContext,
    cache: Option<BaseCache>,
}

impl ItemSearch {
    pub fn new(dex: Dex, ctx: FormatContext) -> Self {
        ItemSearch { dex, ctx, cache: None }
    }

    fn items_table(&self) -> MergedTable<'_, ItemData> {
        let overlay = self
            .ctx
            .mod_id
            .as_deref()
            .and_then(|m| self.dex.game_mod(m))
            .map(|m| &m.items);
        MergedTable::new(&self.dex.tables().items, overlay)
    }

    fn item_visible(&self, data: &ItemData) -> bool {
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

impl TypedSearch for ItemSearch {
    fn search_type(&self) -> SearchType {
        SearchType::Item
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
        let items = self.items_table();
        // Let's Go has no held items at all.
        let none_allowed = self.ctx.format_type == FormatType::LetsGo;
        let mut rows: Vec<ResultRow> = Vec::new();
        let mut illegal = HashMap::new();
        for id in items.ids() {
            let Some(data) = items.get(id) else { continue };
            if !none_allowed && self.item_visible(data) {
                rows.push(ResultRow::hit(SearchType::Item, id.clone()));
            } else {
                illegal.insert(id.clone(), ILLEGAL_REASON.to_string());
            }
        }
        let mut out = vec![ResultRow::header("Items")];
        out.extend(sort_rows_by_name(&self.dex, rows, false));
        BaseCache { rows: crate::types::sanitize_rows(out), illegal }
    }

    fn default_results(&self) -> Vec<ResultRow> {
        let items = self.items_table();
        let rows: Vec<ResultRow> = items
            .ids()
            .into_iter()
            .map(|id| ResultRow::hit(SearchType::Item, id.clone()))
            .collect();
        let mut out = vec![ResultRow::header("Items")];
        out.extend(sort_rows_by_name(&self.dex, rows, false));
        out
    }
}
