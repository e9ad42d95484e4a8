// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search orchestrator: one stateful session over the index and the
//! active category resolver.
//!
//! A `DexSearch` owns the query lifecycle: text queries run the multi-pass
//! index scan (see `scan`), empty queries delegate to the resolver's
//! structural path, and accumulated filters and sort state apply to both.
//! Rebinding the category or format throws the resolver away; the index and
//! the dex handle are shared and survive every rebind.

mod scan;

use std::sync::Arc;

use crate::dex::Dex;
use crate::error::DexSearchError;
use crate::index::SearchIndex;
use crate::typed::{make_typed_search, SearchContext, TypedSearch};
use crate::types::{Filter, ResultRow, SearchType, SortCol};
use crate::utils::to_id;

/// Result-set size under which an exact cross-category hit also expands
/// into a filtered listing inline.
pub const INSTAFILTER_THRESHOLD: usize = 20;

pub struct DexSearch {
    dex: Dex,
    index: Arc<SearchIndex>,
    typed: Box<dyn TypedSearch>,
    search_type: SearchType,
    format: String,
    context: SearchContext,
    query: String,
    filters: Option<Vec<Filter>>,
    sort_col: Option<SortCol>,
    reverse_sort: bool,
    results: Option<Vec<ResultRow>>,
    exact_match: bool,
    /// Overridable per session; tests shrink it to exercise the expansion.
    pub instafilter_threshold: usize,
}

impl DexSearch {
    pub fn new(
        dex: Dex,
        index: Arc<SearchIndex>,
        search_type: SearchType,
        format: &str,
        context: SearchContext,
    ) -> Self {
        let typed = make_typed_search(&dex, search_type, format, context.clone());
        DexSearch {
            dex,
            index,
            typed,
            search_type,
            format: format.to_string(),
            context,
            query: String::new(),
            filters: None,
            sort_col: None,
            reverse_sort: false,
            results: None,
            exact_match: false,
            instafilter_threshold: INSTAFILTER_THRESHOLD,
        }
    }

    pub fn search_type(&self) -> SearchType {
        self.search_type
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filters(&self) -> &[Filter] {
        self.filters.as_deref().unwrap_or(&[])
    }

    pub fn sort_col(&self) -> Option<SortCol> {
        self.sort_col
    }

    /// Rebind the session to a category/format/context. The result cache is
    /// always dropped; filters and sort state survive only when the category
    /// itself is unchanged.
    pub fn set_type(&mut self, search_type: SearchType, format: &str, context: SearchContext) {
        let type_changed = search_type != self.search_type;
        self.search_type = search_type;
        self.format = format.to_string();
        self.context = context.clone();
        self.typed = make_typed_search(&self.dex, search_type, format, context);
        self.results = None;
        self.query.clear();
        self.exact_match = false;
        if type_changed {
            self.filters = None;
            self.sort_col = None;
            self.reverse_sort = false;
        }
    }

    /// Run a query. Returns `Ok(false)` when the normalized query equals the
    /// cached one and the cached results are still valid.
    pub fn find(&mut self, query: &str) -> Result<bool, DexSearchError> {
        let query = to_id(query);
        if query == self.query && self.results.is_some() {
            return Ok(false);
        }
        self.query = query;
        if self.query.is_empty() {
            self.exact_match = false;
            let rows = self.typed.get_results(
                self.filters.as_deref(),
                self.sort_col,
                self.reverse_sort,
            )?;
            self.results = Some(rows);
            return Ok(true);
        }
        let rows = self.text_search()?;
        self.results = Some(rows);
        Ok(true)
    }

    pub fn results(&self) -> &[ResultRow] {
        self.results.as_deref().unwrap_or(&[])
    }

    pub fn exact_match(&self) -> bool {
        self.exact_match
    }

    /// Whether `kind` filters are accepted by the active category.
    fn filter_kind_allowed(active: SearchType, kind: SearchType) -> bool {
        match active {
            SearchType::Pokemon => matches!(
                kind,
                SearchType::Type
                    | SearchType::Move
                    | SearchType::Ability
                    | SearchType::EggGroup
                    | SearchType::Tier
            ),
            SearchType::Move => matches!(
                kind,
                SearchType::Type | SearchType::Category | SearchType::Pokemon
            ),
            _ => false,
        }
    }

    /// Accumulate a structural filter. Idempotent; rejects kinds the active
    /// category does not filter by.
    pub fn add_filter(&mut self, filter: Filter) -> bool {
        if !Self::filter_kind_allowed(self.search_type, filter.search_type) {
            return false;
        }
        let filters = self.filters.get_or_insert_with(Vec::new);
        if !filters.contains(&filter) {
            filters.push(filter);
            self.results = None;
        }
        true
    }

    /// Remove a specific filter, or the most recent one when `None`. An
    /// emptied list collapses back to the no-filters state.
    pub fn remove_filter(&mut self, filter: Option<&Filter>) -> bool {
        let Some(filters) = self.filters.as_mut() else { return false };
        let removed = match filter {
            Some(target) => {
                let before = filters.len();
                filters.retain(|f| f != target);
                filters.len() != before
            }
            None => filters.pop().is_some(),
        };
        if filters.is_empty() {
            self.filters = None;
        }
        if removed {
            self.results = None;
        }
        removed
    }

    /// Cycle a sort column: off → ascending → descending → off. Selecting a
    /// different column restarts the cycle on that column.
    pub fn toggle_sort(&mut self, col: SortCol) {
        match self.sort_col {
            Some(active) if active == col => {
                if self.reverse_sort {
                    self.sort_col = None;
                    self.reverse_sort = false;
                } else {
                    self.reverse_sort = true;
                }
            }
            _ => {
                self.sort_col = Some(col);
                self.reverse_sort = false;
            }
        }
        self.results = None;
    }

    pub fn illegal_reason(&mut self, id: &str) -> Option<String> {
        self.typed.illegal_reason(id)
    }

    /// UI affordance label for a cross-category hit: entries of the active
    /// category navigate, entries of another category filter.
    pub fn filter_label(&self, kind: SearchType) -> Option<&'static str> {
        if kind == self.search_type {
            None
        } else {
            Some("Filter")
        }
    }
}
