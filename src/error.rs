// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy.
//!
//! Only configuration/usage mistakes surface as errors. Missing or partial
//! data is tolerated (the entry is excluded from results), and algorithmic
//! edge cases degrade to empty lists, so neither shows up here.

use thiserror::Error;

use crate::types::{SearchType, SortCol};

#[derive(Debug, Error)]
pub enum DexSearchError {
    /// A sort was requested on a column the active category cannot sort by.
    /// Silently returning unsorted rows would corrupt caller UI state, so
    /// this fails fast instead.
    #[error("unsupported sort column `{col}` for {search_type:?} search")]
    UnsupportedSort { search_type: SearchType, col: SortCol },

    /// Provider data failed to deserialize.
    #[error("malformed dex data: {0}")]
    MalformedData(#[from] serde_json::Error),
}
