// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! An embeddable dex query engine: incremental text search over a sorted
//! name index, plus per-category structural search with format-aware
//! legality.
//!
//! # Architecture
//!
//! Three layers, bottom to top:
//!
//! * **Providers** ([`dex`]): frozen game-data tables behind an `Arc`.
//!   Species, moves, items, abilities, types, learnsets, tier tables,
//!   aliases and mod overlays; loaded once, never mutated.
//! * **Index** ([`index`]): one flat sorted array of normalized names with
//!   alias entries for later words of multi-word names. Lookup is binary
//!   search plus a forward prefix scan.
//! * **Search** ([`search`], [`typed`]): a stateful session orchestrating
//!   multi-pass text scans, bucketed cross-category results, legality
//!   segregation, structural filters and column sorts. Per-category logic
//!   lives in one resolver per category behind the [`typed::TypedSearch`]
//!   trait.
//!
//! Output is always a flat `Vec<`[`types::ResultRow`]`>` mixing hits with
//! in-band headers, so callers render result lists without any layout
//! logic of their own.
//!
//! ```
//! use dexsearch::{Dex, DexSearch, SearchContext, SearchType};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), dexsearch::DexSearchError> {
//! let dex = Dex::from_json(
//!     r#"{"species": {"pikachu": {"name": "Pikachu", "gen": 1, "tier": "OU"}}}"#,
//! )?;
//! let index = Arc::new(dexsearch::build_search_index(&dex));
//! let mut search = DexSearch::new(
//!     dex,
//!     index,
//!     SearchType::Pokemon,
//!     "gen9ou",
//!     SearchContext::None,
//! );
//! search.find("pika")?;
//! for row in search.results() {
//!     println!("{row:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod dex;
pub mod error;
pub mod index;
pub mod search;
#[doc(hidden)]
pub mod testing;
pub mod typed;
pub mod types;
pub mod utils;

pub use dex::{Dex, DexTables, ModData, PokemonSet, Species};
pub use error::DexSearchError;
pub use index::{build_search_index, SearchIndex};
pub use search::{DexSearch, INSTAFILTER_THRESHOLD};
pub use typed::{make_typed_search, SearchContext, TypedSearch};
pub use types::{Filter, Id, ResultRow, SearchType, SortCol};
