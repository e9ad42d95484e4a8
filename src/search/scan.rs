// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The multi-pass index scan behind a text query.
//!
//! A query becomes a queue of passes over the sorted index: an alias-table
//! pass when the query remaps (prepended, so the target leads), the normal
//! literal pass, and an alias-entry pass for multi-character queries. Every
//! pass is the same prefix scan: `closest_index`, then walk forward while
//! keys keep the prefix. When no pass admits anything the query degrades to
//! a shrinking-prefix fuzzy pass capped at two hits, and as a last resort
//! the two alphabetical neighbors of the query position.
//!
//! Hits route into per-category buckets; hits of the active category that
//! the resolver marks illegal divert to the shared bucket 0 and surface
//! under their own header. An exact cross-category hit of a filterable kind
//! becomes the instafilter candidate and, when the active listing is short,
//! expands into an inline filtered listing.

use std::collections::HashSet;

use crate::index::resolve_entry_id;
use crate::types::{sanitize_rows, Filter, Id, ResultRow, SearchType};
use crate::utils::to_id;

use super::DexSearch;
use crate::error::DexSearchError;

/// Bucket 0 is the shared illegal bucket; categories use `bucket_priority`.
const BUCKET_COUNT: usize = SearchType::ALL.len() + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassKind {
    /// Literal entries matching the query prefix.
    Normal,
    /// Alias index entries only (later-word matches).
    Alias,
    /// Literal entries, stop after the first admission.
    Exact,
    /// Shrunk-prefix degradation, stop after two admissions.
    Fuzzy,
}

struct SearchPass {
    kind: PassKind,
    start: usize,
    query: String,
    /// Alias-table passes count as exact regardless of key equality.
    force_exact: bool,
}

#[derive(Default)]
struct ScanState {
    buckets: Vec<Vec<ResultRow>>,
    seen: Vec<HashSet<Id>>,
    /// Promoted exact type hit, shown above everything.
    topbuf: Vec<ResultRow>,
    exact: bool,
    /// Best (lowest bucket priority) exact filterable cross-category hit.
    instafilter: Option<(usize, Filter)>,
}

impl ScanState {
    fn new() -> Self {
        ScanState {
            buckets: vec![Vec::new(); BUCKET_COUNT],
            seen: vec![HashSet::new(); BUCKET_COUNT],
            ..ScanState::default()
        }
    }

    fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum::<usize>() + self.topbuf.len()
    }
}

/// Which foreign categories an active category surfaces inline.
fn cross_category_allowed(active: SearchType, other: SearchType) -> bool {
    if active == other {
        return true;
    }
    match active {
        SearchType::Pokemon => matches!(
            other,
            SearchType::Type
                | SearchType::Tier
                | SearchType::Move
                | SearchType::Ability
                | SearchType::EggGroup
                | SearchType::Article
        ),
        SearchType::Move => matches!(
            other,
            SearchType::Type | SearchType::Category | SearchType::Pokemon
        ),
        SearchType::Ability => matches!(other, SearchType::Pokemon),
        _ => false,
    }
}

impl DexSearch {
    pub(super) fn text_search(&mut self) -> Result<Vec<ResultRow>, DexSearchError> {
        let mut query = self.query.clone();

        // "firetype" is "fire" restricted to type entries, provided the
        // stripped remainder really is a type.
        let mut type_only = false;
        if let Some(stripped) = query.strip_suffix("type") {
            if !stripped.is_empty() {
                let i = self.index.closest_index(stripped);
                let is_type = self.index.entry(i).map_or(false, |e| {
                    e.key == stripped && e.search_type == SearchType::Type
                });
                if is_type {
                    query = stripped.to_string();
                    type_only = true;
                }
            }
        }

        // Snapshot the illegal key set up front; the scan loop must not
        // re-enter the resolver.
        self.typed.base();
        let illegal_keys: HashSet<Id> = self
            .typed
            .cache_slot()
            .as_ref()
            .map(|cache| cache.illegal.keys().cloned().collect())
            .unwrap_or_default();

        let single_char = query.chars().count() == 1;

        let mut passes: Vec<SearchPass> = vec![SearchPass {
            kind: PassKind::Normal,
            start: self.index.closest_index(&query),
            query: query.clone(),
            force_exact: false,
        }];
        if query.len() > 1 {
            passes.push(SearchPass {
                kind: PassKind::Alias,
                start: self.index.closest_index(&query),
                query: query.clone(),
                force_exact: false,
            });
        }
        if let Some(target) = self.dex.alias(&query) {
            let target = to_id(target);
            let start = self.index.closest_index(&target);
            let concrete = self
                .index
                .entry(start)
                .map_or(false, |e| e.key == target && !e.is_alias());
            passes.insert(
                0,
                SearchPass {
                    kind: if concrete { PassKind::Exact } else { PassKind::Normal },
                    start,
                    query: target,
                    force_exact: true,
                },
            );
        }

        let mut state = ScanState::new();
        for pass in &passes {
            self.run_pass(pass, &mut state, type_only, single_char, &illegal_keys);
        }

        // Degradation: nothing matched the full query as a prefix.
        let mut fuzzy_used = false;
        if state.total() == 0 {
            let mut len = query.len().saturating_sub(1);
            while len >= 1 {
                let prefix = &query[..len];
                let start = self.index.closest_index(prefix);
                if self.index.entry(start).map_or(false, |e| e.key.starts_with(prefix)) {
                    let pass = SearchPass {
                        kind: PassKind::Fuzzy,
                        start,
                        query: prefix.to_string(),
                        force_exact: false,
                    };
                    self.run_pass(&pass, &mut state, type_only, single_char, &illegal_keys);
                    fuzzy_used = true;
                    break;
                }
                len -= 1;
            }
        }
        if state.total() == 0 && !self.index.is_empty() {
            // Last resort: the alphabetical neighbors of the query position.
            let at = self.index.closest_index(&query);
            for i in [at.saturating_sub(1), at] {
                let pass = SearchPass {
                    kind: PassKind::Fuzzy,
                    start: i,
                    query: self.index.entry(i).map_or_else(String::new, |e| e.key.clone()),
                    force_exact: false,
                };
                self.run_pass(&pass, &mut state, type_only, single_char, &illegal_keys);
            }
            fuzzy_used = true;
        }

        self.exact_match = state.exact;
        tracing::debug!(
            query = %query,
            passes = passes.len(),
            hits = state.total(),
            exact = state.exact,
            fuzzy = fuzzy_used,
            "text search scanned"
        );
        self.assemble(state, fuzzy_used, &illegal_keys)
    }

    fn run_pass(
        &self,
        pass: &SearchPass,
        state: &mut ScanState,
        type_only: bool,
        single_char: bool,
        illegal: &HashSet<Id>,
    ) {
        if pass.query.is_empty() {
            return;
        }
        let match_len = pass.query.chars().count();
        let mut admitted = 0usize;
        let mut i = pass.start;
        while let Some(entry) = self.index.entry(i) {
            if !entry.key.starts_with(pass.query.as_str()) {
                break;
            }
            let wanted = match pass.kind {
                PassKind::Alias => entry.is_alias(),
                _ => !entry.is_alias(),
            };
            if !wanted
                || (type_only && entry.search_type != SearchType::Type)
                || (single_char && entry.search_type != self.search_type)
                || !cross_category_allowed(self.search_type, entry.search_type)
            {
                i += 1;
                continue;
            }
            let Some(id) = resolve_entry_id(&self.index, i) else {
                i += 1;
                continue;
            };
            if !self.entry_exists(entry.search_type, &id) {
                i += 1;
                continue;
            }

            let span = match entry.alias_of {
                Some(origin) => self.index.display_span(
                    origin as usize,
                    usize::from(entry.alias_offset),
                    match_len,
                ),
                None => self.index.display_span(i, 0, match_len),
            };
            let key_exact = entry.key == pass.query;
            let is_top = key_exact
                && entry.search_type == SearchType::Type
                && self.search_type != SearchType::Type;
            let dest = if entry.search_type == self.search_type && illegal.contains(id.as_str())
            {
                0
            } else {
                entry.search_type.bucket_priority()
            };
            let dedup_bucket = if is_top { entry.search_type.bucket_priority() } else { dest };
            if state.seen[dedup_bucket].insert(id.clone()) {
                let row = ResultRow::Hit {
                    search_type: entry.search_type,
                    id: id.clone(),
                    span: Some(span),
                };
                if is_top {
                    state.topbuf.push(row);
                } else {
                    state.buckets[dest].push(row);
                }
                admitted += 1;
                // A fuzzy pass's query is a shrunken prefix (or a neighbor's
                // own key), so key equality there says nothing about the
                // user's query.
                let genuine = pass.kind != PassKind::Fuzzy;
                if genuine && (key_exact || pass.force_exact) {
                    state.exact = true;
                }
                if genuine
                    && key_exact
                    && Self::filter_kind_allowed(self.search_type, entry.search_type)
                {
                    let priority = entry.search_type.bucket_priority();
                    let better = state
                        .instafilter
                        .as_ref()
                        .map_or(true, |(best, _)| priority < *best);
                    if better {
                        state.instafilter =
                            Some((priority, Filter { search_type: entry.search_type, value: id }));
                    }
                }
            }
            match pass.kind {
                PassKind::Exact if admitted >= 1 => break,
                PassKind::Fuzzy if admitted >= 2 => break,
                _ => {}
            }
            i += 1;
        }
    }

    /// Whether the id behind an index entry is still present in the loaded
    /// tables. Presentation-only categories always exist.
    fn entry_exists(&self, kind: SearchType, id: &str) -> bool {
        match kind {
            SearchType::Pokemon => self.dex.species(id).is_some(),
            SearchType::Move => self.dex.move_data(id).is_some(),
            SearchType::Item => self.dex.item(id).is_some(),
            SearchType::Ability => self.dex.ability(id).is_some(),
            SearchType::Type => self.dex.type_data(id).is_some(),
            _ => true,
        }
    }

    fn assemble(
        &mut self,
        mut state: ScanState,
        fuzzy_used: bool,
        illegal_keys: &HashSet<Id>,
    ) -> Result<Vec<ResultRow>, DexSearchError> {
        let active_bucket = self.search_type.bucket_priority();
        let total = state.total();

        let mut out: Vec<ResultRow> = Vec::with_capacity(total + 8);
        if fuzzy_used && total > 0 {
            out.push(ResultRow::Html(
                "No exact match found. The closest matches alphabetically are:".to_string(),
            ));
        }
        out.append(&mut state.topbuf);
        if !state.buckets[active_bucket].is_empty() {
            out.push(ResultRow::header(self.search_type.label()));
            out.append(&mut state.buckets[active_bucket]);
        }
        if !state.buckets[0].is_empty() {
            out.push(ResultRow::header("Illegal results"));
            out.append(&mut state.buckets[0]);
        }
        for kind in SearchType::ALL {
            if kind == self.search_type {
                continue;
            }
            let bucket = kind.bucket_priority();
            if !state.buckets[bucket].is_empty() {
                out.push(ResultRow::header(kind.label()));
                out.append(&mut state.buckets[bucket]);
            }
        }

        if let Some((_, filter)) = state.instafilter {
            if total < self.instafilter_threshold {
                let label = self
                    .dex
                    .display_name(&filter.value)
                    .unwrap_or(filter.value.as_str())
                    .to_string();
                out.push(ResultRow::header(format!(
                    "{} {}",
                    label,
                    self.search_type.label()
                )));
                let filters = [filter];
                let rows = self.typed.get_results(Some(&filters), None, false)?;
                out.extend(rows.into_iter().filter(|r| r.hit_id().is_some()));
                // Illegal entries matching the filter tag along at the end.
                let mut blocked: Vec<ResultRow> = illegal_keys
                    .iter()
                    .filter(|id| self.typed.matches_filters(id, &filters))
                    .map(|id| ResultRow::hit(self.search_type, id.clone()))
                    .collect();
                blocked.sort_by(|a, b| {
                    a.hit_id().map(Id::as_str).cmp(&b.hit_id().map(Id::as_str))
                });
                out.extend(blocked);
            }
        }
        Ok(sanitize_rows(out))
    }
}
