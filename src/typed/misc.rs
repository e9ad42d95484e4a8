// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! List-style categories: types, damage categories, egg groups, tiers,
//! articles, and the card-mode auxiliaries. None of these have per-entry
//! legality; the listing is the whole story.

use std::collections::{BTreeSet, HashMap};

use crate::dex::Dex;
use crate::types::{Id, ResultRow, SearchType};
use crate::utils::to_id;

use super::format::FormatContext;
use super::{sort_rows_by_name, BaseCache, TypedSearch};

/// Card-mode attribute values; fixed vocabulary, not table data.
const ATTRIBUTES: &[&str] = &["colorless", "darkness", "dragon", "fairy", "fighting", "fire", "grass", "lightning", "metal", "psychic", "water"];

/// Card-mode level values.
const LEVELS: &[&str] = &["basic", "stage1", "stage2", "levelx", "ex", "gx", "v", "vmax"];

pub struct ListSearch {
    dex: Dex,
    ctx: FormatContext,
    search_type: SearchType,
    cache: Option<BaseCache>,
}

impl ListSearch {
    pub fn new(dex: Dex, ctx: FormatContext, search_type: SearchType) -> Self {
        ListSearch { dex, ctx, search_type, cache: None }
    }

    fn listing(&self) -> Vec<ResultRow> {
        let hit = |id: Id| ResultRow::hit(self.search_type, id);
        match self.search_type {
            SearchType::Type | SearchType::TypeTwo | SearchType::Typing => {
                let rows: Vec<ResultRow> = self
                    .dex
                    .tables()
                    .types
                    .iter()
                    .filter(|(_, data)| data.gen <= self.ctx.gen)
                    .map(|(id, _)| hit(id.clone()))
                    .collect();
                sort_rows_by_name(&self.dex, rows, false)
            }
            SearchType::Category => ["physical", "special", "status"]
                .into_iter()
                .map(|c| hit(Id::raw(c)))
                .collect(),
            SearchType::EggGroup => {
                let groups: BTreeSet<String> = self
                    .dex
                    .tables()
                    .species
                    .values()
                    .flat_map(|s| s.egg_groups.iter().map(|g| to_id(g)))
                    .collect();
                groups.into_iter().map(|g| hit(Id::raw(g))).collect()
            }
            SearchType::Tier => {
                // Section names of the singles table, in display order.
                let Some(table) = self.dex.tier_table("singles") else {
                    return Vec::new();
                };
                let mut sections: Vec<(&usize, &String)> =
                    table.sections.iter().map(|(name, off)| (off, name)).collect();
                sections.sort();
                sections
                    .into_iter()
                    .map(|(_, name)| hit(Id::raw(to_id(name))))
                    .collect()
            }
            SearchType::Attribute => ATTRIBUTES.iter().map(|a| hit(Id::raw(*a))).collect(),
            SearchType::Level => LEVELS.iter().map(|l| hit(Id::raw(*l))).collect(),
            // Articles live outside the dex tables entirely.
            _ => Vec::new(),
        }
    }
}

impl TypedSearch for ListSearch {
    fn search_type(&self) -> SearchType {
        self.search_type
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
        let rows = self.default_results();
        BaseCache { rows, illegal: HashMap::new() }
    }

    fn default_results(&self) -> Vec<ResultRow> {
        let listing = self.listing();
        if listing.is_empty() {
            return Vec::new();
        }
        let mut out = vec![ResultRow::header(self.search_type.label())];
        out.extend(listing);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::{DexTables, Species, TierRow, TierTable, TypeData};
    use crate::typed::format::resolve_format;
    use std::collections::BTreeMap;

    fn fixture() -> Dex {
        let mut tables = DexTables::default();
        for (id, name, gen) in [("fire", "Fire", 1), ("steel", "Steel", 2), ("fairy", "Fairy", 6)] {
            tables.types.insert(Id::raw(id), TypeData { name: name.into(), gen });
        }
        tables.species.insert(
            Id::raw("pikachu"),
            Species {
                name: "Pikachu".into(),
                egg_groups: vec!["Field".into(), "Fairy".into()],
                ..Default::default()
            },
        );
        tables.tiers.insert(
            "singles".to_string(),
            TierTable {
                rows: vec![TierRow::Entry(Id::raw("pikachu"))],
                sections: BTreeMap::from([("Uber".to_string(), 0), ("OU".to_string(), 1)]),
            },
        );
        Dex::new(tables)
    }

    #[test]
    fn test_type_listing_respects_generation() {
        let dex = fixture();
        let mut s = ListSearch::new(dex.clone(), resolve_format(&dex, "gen1ou"), SearchType::Type);
        let ids: Vec<&str> = s
            .base_results()
            .iter()
            .filter_map(|r| r.hit_id().map(Id::as_str))
            .collect();
        assert_eq!(ids, vec!["fire"]);
    }

    #[test]
    fn test_tier_listing_in_table_order() {
        let dex = fixture();
        let mut s = ListSearch::new(dex.clone(), resolve_format(&dex, "gen9ou"), SearchType::Tier);
        let ids: Vec<&str> = s
            .base_results()
            .iter()
            .filter_map(|r| r.hit_id().map(Id::as_str))
            .collect();
        assert_eq!(ids, vec!["uber", "ou"]);
    }

    #[test]
    fn test_egg_groups_deduplicated_sorted() {
        let dex = fixture();
        let mut s =
            ListSearch::new(dex.clone(), resolve_format(&dex, "gen9ou"), SearchType::EggGroup);
        let ids: Vec<&str> = s
            .base_results()
            .iter()
            .filter_map(|r| r.hit_id().map(Id::as_str))
            .collect();
        assert_eq!(ids, vec!["fairy", "field"]);
    }
}
