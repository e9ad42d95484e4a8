// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! End-to-end orchestrator behavior over the shared synthetic dex.

use std::sync::Arc;

use dexsearch::testing::{fixture_dex, fixture_index};
use dexsearch::{DexSearch, Filter, ResultRow, SearchContext, SearchType, SortCol};

fn session(search_type: SearchType, format: &str) -> DexSearch {
    let dex = fixture_dex();
    let index = Arc::new(fixture_index());
    DexSearch::new(dex, index, search_type, format, SearchContext::None)
}

fn hit_ids(rows: &[ResultRow]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.hit_id().map(|id| id.to_string()))
        .collect()
}

fn headers(rows: &[ResultRow]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| match r {
            ResultRow::Header(label) => Some(label.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_repeat_query_is_a_no_op() {
    let mut s = session(SearchType::Pokemon, "gen9ou");
    assert!(s.find("pika").unwrap());
    let first = s.results().to_vec();
    assert!(!s.find("pika").unwrap());
    assert_eq!(s.results(), &first[..]);
    // A different query recomputes.
    assert!(s.find("char").unwrap());
}

#[test]
fn test_exact_match_and_prefix() {
    let mut s = session(SearchType::Pokemon, "gen9ou");
    s.find("charizard").unwrap();
    assert!(s.exact_match());
    assert!(hit_ids(s.results()).contains(&"charizard".to_string()));

    s.find("chari").unwrap();
    assert!(!s.exact_match());
    assert!(hit_ids(s.results()).contains(&"charizard".to_string()));
}

#[test]
fn test_literal_sorts_before_alias_within_bucket() {
    // "mime" matches "mimejr" literally and "mrmime" through the later-word
    // alias; in gen9ou both are illegal so both land in the same bucket.
    let mut s = session(SearchType::Pokemon, "gen9ou");
    s.find("mime").unwrap();
    let ids = hit_ids(s.results());
    let jr = ids.iter().position(|id| id == "mimejr").expect("mimejr admitted");
    let mime = ids.iter().position(|id| id == "mrmime").expect("mrmime admitted");
    assert!(jr < mime, "literal match must precede alias match: {ids:?}");
}

#[test]
fn test_legal_results_precede_illegal() {
    let mut s = session(SearchType::Pokemon, "gen9uu");
    s.find("mi").unwrap();
    let rows = s.results();
    let labels = headers(rows);
    let active = labels.iter().position(|l| l == "Pokémon").expect("active header");
    let illegal = labels.iter().position(|l| l == "Illegal results").expect("illegal header");
    assert!(active < illegal);
    let ids = hit_ids(rows);
    // mrmime is UU (legal), mimejr is LC and missingno is glitch (illegal).
    assert!(ids.iter().position(|i| i == "mrmime").unwrap()
        < ids.iter().position(|i| i == "mimejr").unwrap());
    assert_eq!(s.illegal_reason("mimejr").as_deref(), Some("Illegal"));
    assert_eq!(s.illegal_reason("mrmime"), None);
}

#[test]
fn test_fuzzy_degradation_caps_at_two_and_marks_output() {
    let mut s = session(SearchType::Pokemon, "gen9ou");
    s.find("pikachuuu").unwrap();
    assert!(!s.exact_match());
    assert!(matches!(s.results().first(), Some(ResultRow::Html(_))));
    let hits = s.results().iter().filter(|r| r.hit_id().is_some()).count();
    assert!(hits >= 1 && hits <= 2, "fuzzy admits at most two hits, got {hits}");
}

#[test]
fn test_neighbor_fallback_never_claims_an_exact_match() {
    // "leftovers" is an item, invisible to a Pokémon search, so the query
    // degrades to the alphabetical-neighbor fallback. The neighbor pass
    // queries each landed entry by its own key; that trivial equality must
    // not flip the exact flag or seed a filtered expansion.
    let mut s = session(SearchType::Pokemon, "gen9ou");
    s.find("leftovers").unwrap();
    assert!(!s.exact_match());
    for label in headers(s.results()) {
        assert!(
            !label.ends_with(" Pokémon"),
            "fallback neighbors must not expand a filter listing: {label:?}"
        );
    }
}

#[test]
fn test_alias_table_forces_exact() {
    let mut s = session(SearchType::Pokemon, "gen9ou");
    s.find("zard").unwrap();
    assert!(s.exact_match());
    assert_eq!(hit_ids(s.results()).first().map(String::as_str), Some("charizard"));
}

#[test]
fn test_single_char_restricts_to_active_category() {
    let mut s = session(SearchType::Pokemon, "gen9lc");
    s.find("p").unwrap();
    for row in s.results() {
        if let ResultRow::Hit { search_type, .. } = row {
            assert_eq!(*search_type, SearchType::Pokemon);
        }
    }
    assert!(hit_ids(s.results()).contains(&"pichu".to_string()));
}

#[test]
fn test_cross_category_buckets_in_priority_order() {
    let mut s = session(SearchType::Pokemon, "gen9ou");
    s.find("dra").unwrap();
    let rows = s.results();
    let ids = hit_ids(rows);
    assert!(ids.contains(&"dragapult".to_string()));
    assert!(ids.contains(&"dragondance".to_string()));
    // The active Pokémon bucket precedes the Moves bucket.
    let labels = headers(rows);
    let active = labels.iter().position(|l| l == "Pokémon").unwrap();
    let moves = labels.iter().position(|l| l == "Moves").unwrap();
    assert!(active < moves);
}

#[test]
fn test_item_search_stays_in_category() {
    let mut s = session(SearchType::Item, "gen9ou");
    s.find("le").unwrap();
    for row in s.results() {
        if let ResultRow::Hit { search_type, .. } = row {
            assert_eq!(*search_type, SearchType::Item);
        }
    }
    assert!(hit_ids(s.results()).contains(&"leftovers".to_string()));
}

#[test]
fn test_filter_round_trip() {
    let mut s = session(SearchType::Pokemon, "gen9ou");
    s.find("").unwrap();
    let unfiltered = hit_ids(s.results());

    assert!(s.add_filter(Filter::new(SearchType::Type, "dragon")));
    s.find("").unwrap();
    let filtered = hit_ids(s.results());
    assert_eq!(filtered, vec!["dragapult", "garchomp"]);

    assert!(s.remove_filter(None));
    assert!(s.filters().is_empty());
    s.find("").unwrap();
    assert_eq!(hit_ids(s.results()), unfiltered);
}

#[test]
fn test_filter_whitelist_and_idempotence() {
    let mut s = session(SearchType::Pokemon, "gen9ou");
    // Items are not a species filter axis.
    assert!(!s.add_filter(Filter::new(SearchType::Item, "leftovers")));
    let filter = Filter::new(SearchType::Type, "dragon");
    assert!(s.add_filter(filter.clone()));
    assert!(s.add_filter(filter.clone()));
    assert_eq!(s.filters().len(), 1);
    assert!(s.remove_filter(Some(&filter)));
    assert!(!s.remove_filter(Some(&filter)));
}

#[test]
fn test_instafilter_expands_exact_type_hit() {
    let mut s = session(SearchType::Pokemon, "gen9ou");
    s.find("dragon").unwrap();
    let rows = s.results();
    // Promoted exact type hit leads the output.
    match rows.first() {
        Some(ResultRow::Hit { search_type, id, .. }) => {
            assert_eq!(*search_type, SearchType::Type);
            assert_eq!(id.as_str(), "dragon");
        }
        other => panic!("expected promoted type hit, got {other:?}"),
    }
    assert!(headers(rows).contains(&"Dragon Pokémon".to_string()));
    let ids = hit_ids(rows);
    // Expansion lists the legal dragons and trails the illegal ones.
    assert!(ids.contains(&"garchomp".to_string()));
    assert!(ids.contains(&"rayquaza".to_string()));
}

#[test]
fn test_type_suffix_narrows_to_type_entries() {
    let mut s = session(SearchType::Pokemon, "gen9ou");
    s.find("electrictype").unwrap();
    let rows = s.results();
    match rows.first() {
        Some(ResultRow::Hit { search_type, id, .. }) => {
            assert_eq!(*search_type, SearchType::Type);
            assert_eq!(id.as_str(), "electric");
        }
        other => panic!("expected type hit first, got {other:?}"),
    }
    // Expansion still fires off the exact type match.
    assert!(headers(rows).contains(&"Electric Pokémon".to_string()));
}

#[test]
fn test_set_type_clears_state_selectively() {
    let mut s = session(SearchType::Pokemon, "gen9ou");
    assert!(s.add_filter(Filter::new(SearchType::Type, "dragon")));
    s.find("dra").unwrap();

    // Same category, new format: filters survive, results drop.
    s.set_type(SearchType::Pokemon, "gen9uu", SearchContext::None);
    assert_eq!(s.filters().len(), 1);
    assert!(s.results().is_empty());

    // New category: filters and sort reset.
    s.toggle_sort(SortCol::Bst);
    s.set_type(SearchType::Move, "gen9ou", SearchContext::None);
    assert!(s.filters().is_empty());
    assert!(s.sort_col().is_none());
}

#[test]
fn test_sort_toggle_cycle() {
    let mut s = session(SearchType::Pokemon, "gen9ou");
    s.toggle_sort(SortCol::Spe);
    s.find("").unwrap();
    assert!(matches!(s.results().first(), Some(ResultRow::SortPicker(SearchType::Pokemon))));
    assert_eq!(hit_ids(s.results()), vec!["charizard", "garchomp", "dragapult"]);

    s.toggle_sort(SortCol::Spe);
    s.find("").unwrap();
    assert_eq!(hit_ids(s.results()), vec!["dragapult", "garchomp", "charizard"]);

    s.toggle_sort(SortCol::Spe);
    s.find("").unwrap();
    assert!(s.sort_col().is_none());
    assert!(!matches!(s.results().first(), Some(ResultRow::SortPicker(_))));
}

#[test]
fn test_unsupported_sort_surfaces_as_error() {
    let mut s = session(SearchType::Pokemon, "gen9ou");
    s.toggle_sort(SortCol::Power);
    assert!(s.find("").is_err());
}

#[test]
fn test_filter_label() {
    let s = session(SearchType::Pokemon, "gen9ou");
    assert_eq!(s.filter_label(SearchType::Pokemon), None);
    assert_eq!(s.filter_label(SearchType::Move), Some("Filter"));
}
