// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The precomputed sorted search index.
//!
//! One flat array of `(key, category)` entries, sorted ascending by key, plus
//! a parallel offset table that maps normalized-key positions back to display
//! positions for names that lost punctuation during normalization. Prefix
//! lookup is `partition_point` + forward scan, the same shape as a suffix
//! array probe; there is no tree and no allocation on the lookup path.
//!
//! Alias entries point at the entry they were derived from ("mime" →
//! "mrmime") and carry the character offset where the aliased suffix starts.
//! Construction guarantees that alias entries sharing a key sort after the
//! non-alias entries for that key, so a scan sees literal matches first.

use std::collections::HashMap;

use crate::dex::Dex;
use crate::types::{Id, SearchType};
use crate::utils::to_id;

/// One index tuple. Non-alias entries have `alias_of == None` and an
/// `alias_offset` of zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Normalized key this entry sorts and matches under.
    pub key: String,
    pub search_type: SearchType,
    /// Position of the originating entry, for alias entries.
    pub alias_of: Option<u32>,
    /// Character offset into the origin key where the alias suffix begins.
    pub alias_offset: u16,
}

impl IndexEntry {
    pub fn new(key: impl Into<String>, search_type: SearchType) -> Self {
        IndexEntry { key: key.into(), search_type, alias_of: None, alias_offset: 0 }
    }

    pub fn is_alias(&self) -> bool {
        self.alias_of.is_some()
    }
}

/// Immutable sorted index plus the parallel display-offset table.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
    /// Per-entry correction string; char at position `p` encodes how many
    /// display characters were stripped before normalized position `p`
    /// (`0`-`9`, then `a`-`z` for 10–35). Empty string = no corrections.
    offsets: Vec<String>,
}

impl SearchIndex {
    /// Build from raw entries. Sorts by `(key, alias-ness)` so the ordering
    /// invariants hold regardless of input order. `offsets` may be shorter
    /// than `entries`; missing tails are treated as "no correction".
    pub fn new(mut entries: Vec<IndexEntry>, mut offsets: Vec<String>) -> Self {
        offsets.resize(entries.len(), String::new());
        // Keep offset strings glued to their entries through the sort.
        let mut zipped: Vec<(IndexEntry, String)> =
            entries.drain(..).zip(offsets).collect();
        zipped.sort_by(|(a, _), (b, _)| {
            a.key.cmp(&b.key).then_with(|| a.is_alias().cmp(&b.is_alias()))
        });
        let (entries, offsets) = zipped.into_iter().unzip();
        SearchIndex { entries, offsets }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, i: usize) -> Option<&IndexEntry> {
        self.entries.get(i)
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Position of the first entry whose key is `>= query`. Ties prefer the
    /// first occurrence of an exact match; saturates at `len()`; an empty
    /// index yields 0.
    pub fn closest_index(&self, query: &str) -> usize {
        self.entries.partition_point(|e| e.key.as_str() < query)
    }

    /// Whether the entry at `i` is an exact match for `query`.
    pub fn exact_match_at(&self, i: usize, query: &str) -> bool {
        self.entries.get(i).is_some_and(|e| e.key == query)
    }

    /// Translate a normalized-key match of `len` characters starting at
    /// `start` into display coordinates for entry `i`.
    pub fn display_span(&self, i: usize, start: usize, len: usize) -> (u16, u16) {
        if len == 0 {
            return (start as u16, start as u16);
        }
        let start_disp = start + self.correction(i, start);
        let last = start + len - 1;
        let end_disp = last + self.correction(i, last) + 1;
        (start_disp as u16, end_disp as u16)
    }

    fn correction(&self, i: usize, pos: usize) -> usize {
        let Some(encoded) = self.offsets.get(i) else { return 0 };
        match encoded.as_bytes().get(pos) {
            Some(b @ b'0'..=b'9') => usize::from(b - b'0'),
            Some(b @ b'a'..=b'z') => usize::from(b - b'a') + 10,
            _ => 0,
        }
    }
}

/// Encode the normalized-position → stripped-character-count correction
/// string for a display name. Returns an empty string when the name survives
/// normalization intact.
fn encode_offsets(display: &str) -> String {
    let mut encoded = String::new();
    let mut stripped = 0usize;
    let mut any = false;
    for c in display.chars() {
        if to_id(&c.to_string()).is_empty() {
            stripped += 1;
        } else {
            let digit = match stripped.min(35) {
                d @ 0..=9 => (b'0' + d as u8) as char,
                d => (b'a' + (d - 10) as u8) as char,
            };
            if stripped > 0 {
                any = true;
            }
            encoded.push(digit);
        }
    }
    if any { encoded } else { String::new() }
}

/// Construct the full sorted index from loaded tables: one entry per
/// species/move/item/ability/type, plus tier names, egg groups and damage
/// categories, plus alias entries for every later word of a multi-word name.
pub fn build_search_index(dex: &Dex) -> SearchIndex {
    struct Raw {
        key: String,
        search_type: SearchType,
        origin: Option<(String, SearchType)>,
        alias_offset: u16,
        offsets: String,
    }

    let mut raw: Vec<Raw> = Vec::new();
    let push_name = |name: &str, search_type: SearchType, raw: &mut Vec<Raw>| {
        let key = to_id(name);
        if key.is_empty() {
            return;
        }
        raw.push(Raw {
            key: key.clone(),
            search_type,
            origin: None,
            alias_offset: 0,
            offsets: encode_offsets(name),
        });
        // Alias entries for each later word: "Mr. Mime" gains "mime" at
        // offset 2 into "mrmime".
        let words: Vec<&str> = name
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        if words.len() > 1 {
            let mut offset = 0usize;
            for (w, word) in words.iter().enumerate() {
                let word_key = to_id(word);
                if w > 0 && !word_key.is_empty() {
                    let suffix: String = words[w..].iter().map(|x| to_id(x)).collect();
                    raw.push(Raw {
                        key: suffix,
                        search_type,
                        origin: Some((key.clone(), search_type)),
                        alias_offset: offset as u16,
                        offsets: String::new(),
                    });
                }
                offset += word_key.chars().count();
            }
        }
    };

    let tables = dex.tables();
    for species in tables.species.values() {
        push_name(&species.name, SearchType::Pokemon, &mut raw);
    }
    for mv in tables.moves.values() {
        push_name(&mv.name, SearchType::Move, &mut raw);
    }
    for item in tables.items.values() {
        push_name(&item.name, SearchType::Item, &mut raw);
    }
    for ability in tables.abilities.values() {
        push_name(&ability.name, SearchType::Ability, &mut raw);
    }
    for ty in tables.types.values() {
        push_name(&ty.name, SearchType::Type, &mut raw);
    }
    for cat in ["Physical", "Special", "Status"] {
        push_name(cat, SearchType::Category, &mut raw);
    }
    let mut egg_groups: Vec<&str> = tables
        .species
        .values()
        .flat_map(|s| s.egg_groups.iter().map(String::as_str))
        .collect();
    egg_groups.sort_unstable();
    egg_groups.dedup();
    for group in egg_groups {
        push_name(group, SearchType::EggGroup, &mut raw);
    }
    let mut tier_names: Vec<&str> = tables
        .tiers
        .values()
        .flat_map(|t| t.sections.keys().map(String::as_str))
        .collect();
    tier_names.sort_unstable();
    tier_names.dedup();
    for tier in tier_names {
        push_name(tier, SearchType::Tier, &mut raw);
    }

    // Non-alias entries before alias entries on equal keys, then resolve the
    // alias back-pointers against final positions.
    raw.sort_by(|a, b| {
        a.key
            .cmp(&b.key)
            .then_with(|| a.origin.is_some().cmp(&b.origin.is_some()))
    });
    let mut positions: HashMap<(&str, SearchType), u32> = HashMap::new();
    for (i, entry) in raw.iter().enumerate() {
        if entry.origin.is_none() {
            positions
                .entry((entry.key.as_str(), entry.search_type))
                .or_insert(i as u32);
        }
    }
    let mut entries = Vec::with_capacity(raw.len());
    let mut offsets = Vec::with_capacity(raw.len());
    for entry in &raw {
        let alias_of = entry
            .origin
            .as_ref()
            .and_then(|(key, ty)| positions.get(&(key.as_str(), *ty)).copied());
        if entry.origin.is_some() && alias_of.is_none() {
            continue; // orphaned alias, origin never made it in
        }
        entries.push(IndexEntry {
            key: entry.key.clone(),
            search_type: entry.search_type,
            alias_of,
            alias_offset: entry.alias_offset,
        });
        offsets.push(entry.offsets.clone());
    }
    tracing::debug!(entries = entries.len(), "search index built");
    SearchIndex { entries, offsets }
}

/// Resolve an alias entry to the id it stands for; non-alias entries resolve
/// to their own key.
pub fn resolve_entry_id(index: &SearchIndex, i: usize) -> Option<Id> {
    let entry = index.entry(i)?;
    match entry.alias_of {
        Some(origin) => index.entry(origin as usize).map(|e| Id::raw(e.key.clone())),
        None => Some(Id::raw(entry.key.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_index(keys: &[&str]) -> SearchIndex {
        SearchIndex::new(
            keys.iter().map(|k| IndexEntry::new(*k, SearchType::Pokemon)).collect(),
            vec![],
        )
    }

    #[test]
    fn test_closest_index_five_element() {
        let index = synthetic_index(&["aa", "ab", "ac", "ba", "bb"]);
        assert_eq!(index.closest_index("a"), 0);
        assert_eq!(index.closest_index("b"), 3);
        assert_eq!(index.closest_index("ab"), 1);
        assert_eq!(index.closest_index("zz"), 5);
    }

    #[test]
    fn test_closest_index_duplicate_keys_first_occurrence() {
        let index = synthetic_index(&["aa", "ab", "ab", "ab", "ac"]);
        assert_eq!(index.closest_index("ab"), 1);
        assert!(index.exact_match_at(1, "ab"));
    }

    #[test]
    fn test_closest_index_empty_index() {
        let index = synthetic_index(&[]);
        assert_eq!(index.closest_index("anything"), 0);
        assert!(!index.exact_match_at(0, "anything"));
    }

    #[test]
    fn test_alias_sorts_after_literal_on_same_key() {
        let mut alias = IndexEntry::new("mime", SearchType::Pokemon);
        alias.alias_of = Some(0);
        let index = SearchIndex::new(
            vec![alias, IndexEntry::new("mime", SearchType::Pokemon)],
            vec![],
        );
        assert!(!index.entry(0).unwrap().is_alias());
        assert!(index.entry(1).unwrap().is_alias());
    }

    #[test]
    fn test_encode_offsets() {
        // "Mr. Mime" → "mrmime": positions 2.. gained 2 stripped chars.
        assert_eq!(encode_offsets("Mr. Mime"), "002222");
        assert_eq!(encode_offsets("Tackle"), "");
    }

    #[test]
    fn test_display_span_with_corrections() {
        let index = SearchIndex::new(
            vec![IndexEntry::new("mrmime", SearchType::Pokemon)],
            vec!["002222".to_string()],
        );
        // Matching "mrmi" (4 normalized chars): display span covers
        // "Mr. Mi" = [0, 6).
        assert_eq!(index.display_span(0, 0, 4), (0, 6));
        // Zero-length match degrades gracefully.
        assert_eq!(index.display_span(0, 3, 0), (3, 3));
    }
}
