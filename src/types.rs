// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Core vocabulary of the query engine.
//!
//! Everything the engine hands back to a caller is a flat `Vec<ResultRow>`:
//! hits, headers, the sort-picker sentinel, and the occasional literal HTML
//! line. Keeping presentation rows in-band means bucket ordering, header
//! grouping and legality segregation are all just list concatenation.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::to_id;

/// A normalized identifier: lowercase ASCII alphanumerics only.
///
/// Every table key, index key and query is an `Id`. Construct with
/// [`Id::of`] to normalize arbitrary display text, or [`Id::raw`] when the
/// input is already normalized (e.g. deserialized table keys).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Normalize arbitrary text into an identifier.
    pub fn of(value: &str) -> Self {
        Id(to_id(value))
    }

    /// Wrap an already-normalized string without re-normalizing.
    pub fn raw(value: impl Into<String>) -> Self {
        Id(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for Id {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::of(value)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Id::of(&value)
    }
}

/// Searchable category tag.
///
/// The first nine are the regular dex categories; the last four exist only
/// for the card-game sub-mode and never appear outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Pokemon,
    Type,
    Tier,
    Move,
    Item,
    Ability,
    #[serde(rename = "egggroup")]
    EggGroup,
    Category,
    Article,
    #[serde(rename = "type2")]
    TypeTwo,
    Attribute,
    Typing,
    Level,
}

impl SearchType {
    /// Plural display label used for section headers.
    pub fn label(self) -> &'static str {
        match self {
            SearchType::Pokemon => "Pokémon",
            SearchType::Type => "Types",
            SearchType::Tier => "Tiers",
            SearchType::Move => "Moves",
            SearchType::Item => "Items",
            SearchType::Ability => "Abilities",
            SearchType::EggGroup => "Egg groups",
            SearchType::Category => "Categories",
            SearchType::Article => "Articles",
            SearchType::TypeTwo => "Types",
            SearchType::Attribute => "Attributes",
            SearchType::Typing => "Typings",
            SearchType::Level => "Levels",
        }
    }

    /// All search types, in bucket priority order. The position here decides
    /// the order non-primary buckets are emitted in, and breaks ties when
    /// choosing the instafilter candidate.
    pub const ALL: [SearchType; 13] = [
        SearchType::Pokemon,
        SearchType::Type,
        SearchType::Tier,
        SearchType::Move,
        SearchType::Item,
        SearchType::Ability,
        SearchType::EggGroup,
        SearchType::Category,
        SearchType::Article,
        SearchType::TypeTwo,
        SearchType::Attribute,
        SearchType::Typing,
        SearchType::Level,
    ];

    /// Bucket priority: lower is emitted earlier. Bucket 0 is reserved for
    /// the shared (legal-vs-illegal bookkeeping) bucket, so priorities start
    /// at 1.
    pub fn bucket_priority(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(Self::ALL.len()) + 1
    }
}

/// Sortable columns. Stats and BST apply to species search; power, accuracy
/// and PP apply to move search; name applies everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCol {
    Name,
    Hp,
    Atk,
    Def,
    SpA,
    SpD,
    Spe,
    Bst,
    Power,
    Accuracy,
    Pp,
}

impl fmt::Display for SortCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortCol::Name => "name",
            SortCol::Hp => "hp",
            SortCol::Atk => "atk",
            SortCol::Def => "def",
            SortCol::SpA => "spa",
            SortCol::SpD => "spd",
            SortCol::Spe => "spe",
            SortCol::Bst => "bst",
            SortCol::Power => "power",
            SortCol::Accuracy => "accuracy",
            SortCol::Pp => "pp",
        };
        f.write_str(s)
    }
}

/// A structural constraint accumulated by the orchestrator: "only entries
/// admitting `value` as a `search_type` attribute".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub search_type: SearchType,
    pub value: Id,
}

impl Filter {
    pub fn new(search_type: SearchType, value: impl Into<Id>) -> Self {
        Filter { search_type, value: value.into() }
    }
}

/// One row of engine output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultRow {
    /// A normal hit, optionally carrying a highlight span in display
    /// coordinates (half-open, `[start, end)`).
    Hit {
        search_type: SearchType,
        id: Id,
        span: Option<(u16, u16)>,
    },
    /// Sentinel: "insert the active sort-column picker here".
    SortPicker(SearchType),
    /// Section divider. Purely presentational but load-bearing for grouping.
    Header(String),
    /// Escape hatch for a literal informational line.
    Html(String),
}

impl ResultRow {
    pub fn hit(search_type: SearchType, id: impl Into<Id>) -> Self {
        ResultRow::Hit { search_type, id: id.into(), span: None }
    }

    pub fn header(label: impl Into<String>) -> Self {
        ResultRow::Header(label.into())
    }

    pub fn is_header(&self) -> bool {
        matches!(self, ResultRow::Header(_))
    }

    /// The hit id, if this row is a hit.
    pub fn hit_id(&self) -> Option<&Id> {
        match self {
            ResultRow::Hit { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// Enforce the header invariants on a finished row list: no consecutive
/// duplicate headers, and no header immediately followed by another header
/// or by end-of-list.
pub fn sanitize_rows(rows: Vec<ResultRow>) -> Vec<ResultRow> {
    let mut out: Vec<ResultRow> = Vec::with_capacity(rows.len());
    for row in rows {
        if row.is_header() {
            match out.last() {
                // A header directly on top of another header replaces it.
                Some(prev) if prev.is_header() => {
                    out.pop();
                }
                _ => {}
            }
            // Consecutive duplicate headers are illegal in final output.
            if let (ResultRow::Header(label), Some(ResultRow::Header(prev))) =
                (&row, out.last())
            {
                if label == prev {
                    continue;
                }
            }
        }
        out.push(row);
    }
    if out.last().is_some_and(ResultRow::is_header) {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_normalizes() {
        assert_eq!(Id::of("Mr. Mime").as_str(), "mrmime");
        assert_eq!(Id::from("Flabébé").as_str(), "flabebe");
    }

    #[test]
    fn test_id_borrows_as_str() {
        let mut map = std::collections::HashMap::new();
        map.insert(Id::raw("pikachu"), 25);
        assert_eq!(map.get("pikachu"), Some(&25));
    }

    #[test]
    fn test_bucket_priority_order() {
        assert_eq!(SearchType::Pokemon.bucket_priority(), 1);
        assert!(SearchType::Type.bucket_priority() < SearchType::Move.bucket_priority());
        assert!(SearchType::Ability.bucket_priority() < SearchType::Category.bucket_priority());
    }

    #[test]
    fn test_sanitize_drops_trailing_header() {
        let rows = vec![
            ResultRow::header("Moves"),
            ResultRow::hit(SearchType::Move, "tackle"),
            ResultRow::header("Empty section"),
        ];
        let out = sanitize_rows(rows);
        assert_eq!(out.len(), 2);
        assert!(!out.last().unwrap().is_header());
    }

    #[test]
    fn test_sanitize_collapses_stacked_headers() {
        let rows = vec![
            ResultRow::header("A"),
            ResultRow::header("B"),
            ResultRow::hit(SearchType::Item, "leftovers"),
        ];
        let out = sanitize_rows(rows);
        assert_eq!(out, vec![
            ResultRow::header("B"),
            ResultRow::hit(SearchType::Item, "leftovers"),
        ]);
    }

    #[test]
    fn test_sanitize_empty() {
        assert!(sanitize_rows(vec![]).is_empty());
        assert!(sanitize_rows(vec![ResultRow::header("X")]).is_empty());
    }
}
