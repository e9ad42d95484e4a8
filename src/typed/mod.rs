// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Typed search: one resolver per searchable category.
//!
//! A resolver owns everything context-dependent about a category: the merged
//! (mod-aware) table, the legality-filtered base listing for the resolved
//! format, the structural filter predicates and the sort comparators. The
//! orchestrator constructs one resolver per `(category, format, species)`
//! context and throws it away on any context change; within one context the
//! expensive base/illegal computation happens once and is memoized.

pub mod ability;
pub mod format;
pub mod item;
pub mod misc;
pub mod move_utility;
pub mod moves;
pub mod pokemon;

use std::collections::HashMap;

use crate::dex::{Dex, PokemonSet};
use crate::error::DexSearchError;
use crate::types::{Filter, Id, ResultRow, SearchType, SortCol, sanitize_rows};

use format::{resolve_format, FormatContext};

/// The reason string every illegal entry currently carries.
pub const ILLEGAL_REASON: &str = "Illegal";

/// Species/build context a search can be scoped to.
#[derive(Debug, Clone, Default)]
pub enum SearchContext {
    #[default]
    None,
    Species(Id),
    Set(PokemonSet),
}

/// Memoized output of the first base-results computation.
#[derive(Debug, Clone, Default)]
pub struct BaseCache {
    pub rows: Vec<ResultRow>,
    /// Everything in the raw category table that is *not* in `rows`, tagged
    /// with a human-readable reason.
    pub illegal: HashMap<Id, String>,
}

/// Canonical-over-overlay table view implementing the merge precedence: an
/// id present in both keeps the canonical entry; the overlay only
/// contributes ids the canonical table lacks.
pub struct MergedTable<'a, T> {
    canonical: &'a HashMap<Id, T>,
    overlay: Option<&'a HashMap<Id, T>>,
}

impl<'a, T> MergedTable<'a, T> {
    pub fn new(canonical: &'a HashMap<Id, T>, overlay: Option<&'a HashMap<Id, T>>) -> Self {
        MergedTable { canonical, overlay }
    }

    pub fn get(&self, id: &str) -> Option<&'a T> {
        self.canonical
            .get(id)
            .or_else(|| self.overlay.and_then(|o| o.get(id)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Keyed union: every canonical id, then overlay-only ids.
    pub fn ids(&self) -> Vec<&'a Id> {
        let mut ids: Vec<&'a Id> = self.canonical.keys().collect();
        if let Some(overlay) = self.overlay {
            ids.extend(overlay.keys().filter(|k| !self.canonical.contains_key(k.as_str())));
        }
        ids
    }
}

/// Per-category resolver contract.
///
/// `base` / `base_results` / `illegal_reason` are provided and memoize via
/// [`TypedSearch::cache_slot`]; implementors supply the computation and the
/// category-specific predicates.
pub trait TypedSearch {
    fn search_type(&self) -> SearchType;
    fn ctx(&self) -> &FormatContext;
    fn dex(&self) -> &Dex;
    fn cache_slot(&mut self) -> &mut Option<BaseCache>;

    /// The format/context-aware listing plus the illegal complement.
    /// Called at most once per resolver instance.
    fn compute_base(&self) -> BaseCache;

    /// The full, unfiltered, headered category listing.
    fn default_results(&self) -> Vec<ResultRow>;

    /// Category-specific filter predicate for a single entry id. Unknown
    /// filter kinds fall through as accepting.
    fn matches_filters(&self, _id: &Id, _filters: &[Filter]) -> bool {
        true
    }

    /// Stable comparator keyed by a named column. Unsupported columns are a
    /// usage error, not a silent no-op.
    fn sort(
        &self,
        rows: Vec<ResultRow>,
        col: SortCol,
        reverse: bool,
    ) -> Result<Vec<ResultRow>, DexSearchError> {
        match col {
            SortCol::Name => Ok(sort_rows_by_name(self.dex(), rows, reverse)),
            _ => Err(DexSearchError::UnsupportedSort { search_type: self.search_type(), col }),
        }
    }

    /// Context-aware tier lookup. Categories without tiers return empty.
    fn tier_of(&self, _id: &str) -> String {
        String::new()
    }

    // ---- provided, memoizing ----

    fn base(&mut self) -> &BaseCache {
        if self.cache_slot().is_none() {
            let computed = self.compute_base();
            *self.cache_slot() = Some(computed);
        }
        self.cache_slot().as_ref().expect("just populated")
    }

    fn base_results(&mut self) -> &[ResultRow] {
        &self.base().rows
    }

    fn illegal_reason(&mut self, id: &str) -> Option<String> {
        self.base();
        self.cache_slot()
            .as_ref()
            .and_then(|cache| cache.illegal.get(id).cloned())
    }

    /// The structural (non-text) query path: base results narrowed by
    /// filters, optionally re-sorted under a sort-picker sentinel row.
    fn get_results(
        &mut self,
        filters: Option<&[Filter]>,
        sort: Option<SortCol>,
        reverse: bool,
    ) -> Result<Vec<ResultRow>, DexSearchError> {
        let rows = self.base().rows.clone();
        let filters = filters.unwrap_or(&[]);

        if let Some(col) = sort {
            // Sorted view: headers drop out, the picker sentinel leads.
            let hits: Vec<ResultRow> = rows
                .into_iter()
                .filter(|row| {
                    row.hit_id().is_some_and(|id| {
                        filters.is_empty() || self.matches_filters(id, filters)
                    })
                })
                .collect();
            let mut sorted = self.sort(hits, col, reverse)?;
            sorted.insert(0, ResultRow::SortPicker(self.search_type()));
            return Ok(sorted);
        }

        if filters.is_empty() {
            return Ok(sanitize_rows(rows));
        }
        let filtered = rows
            .into_iter()
            .filter(|row| match row.hit_id() {
                Some(id) => self.matches_filters(id, filters),
                None => true, // keep headers; sanitize strips the empty ones
            })
            .collect();
        Ok(sanitize_rows(filtered))
    }
}

/// Alphabetical sort by display name, stable, with ids missing from every
/// table ordered by their id.
pub(crate) fn sort_rows_by_name(dex: &Dex, mut rows: Vec<ResultRow>, reverse: bool) -> Vec<ResultRow> {
    rows.sort_by(|a, b| {
        let name = |row: &ResultRow| {
            row.hit_id()
                .map(|id| dex.display_name(id).unwrap_or(id.as_str()).to_ascii_lowercase())
                .unwrap_or_default()
        };
        name(a).cmp(&name(b))
    });
    if reverse {
        rows.reverse();
    }
    rows
}

/// Construct the resolver for a category in a resolved context.
pub fn make_typed_search(
    dex: &Dex,
    search_type: SearchType,
    format: &str,
    context: SearchContext,
) -> Box<dyn TypedSearch> {
    let mut ctx = resolve_format(dex, format);
    match context {
        SearchContext::None => {}
        SearchContext::Species(id) => ctx.species = Some(id),
        SearchContext::Set(set) => {
            ctx.species = Some(set.species.clone());
            ctx.set = Some(set);
        }
    }
    tracing::debug!(
        ?search_type,
        gen = ctx.gen,
        format_type = ?ctx.format_type,
        mod_id = ctx.mod_id.as_deref().unwrap_or(""),
        "typed search constructed"
    );
    match search_type {
        SearchType::Pokemon => Box::new(pokemon::PokemonSearch::new(dex.clone(), ctx)),
        SearchType::Move => Box::new(moves::MoveSearch::new(dex.clone(), ctx)),
        SearchType::Item => Box::new(item::ItemSearch::new(dex.clone(), ctx)),
        SearchType::Ability => Box::new(ability::AbilitySearch::new(dex.clone(), ctx)),
        other => Box::new(misc::ListSearch::new(dex.clone(), ctx, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::Species;

    #[test]
    fn test_merged_table_precedence() {
        let mut canonical = HashMap::new();
        canonical.insert(
            Id::raw("pikachu"),
            Species { name: "Pikachu".into(), ..Default::default() },
        );
        let mut overlay = HashMap::new();
        // Overlay redefines a known id (must lose) and adds a new one (must win).
        overlay.insert(
            Id::raw("pikachu"),
            Species { name: "Overlay Pikachu".into(), ..Default::default() },
        );
        overlay.insert(
            Id::raw("newmon"),
            Species { name: "Newmon".into(), ..Default::default() },
        );
        let merged = MergedTable::new(&canonical, Some(&overlay));
        assert_eq!(merged.get("pikachu").unwrap().name, "Pikachu");
        assert_eq!(merged.get("newmon").unwrap().name, "Newmon");
        assert_eq!(merged.ids().len(), 2);
    }

    #[test]
    fn test_merged_table_no_overlay() {
        let canonical: HashMap<Id, Species> = HashMap::new();
        let merged = MergedTable::new(&canonical, None);
        assert!(!merged.contains("anything"));
        assert!(merged.ids().is_empty());
    }
}
