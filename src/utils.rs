// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Identifier normalization and small string helpers.
//!
//! Everything searchable lives under a normalized identifier: lowercase
//! alphanumerics only, diacritics stripped. "Mr. Mime" and "mr mime" and
//! "MRMIME" all land on `mrmime`, so the sorted index needs exactly one
//! entry per thing and the binary search never cares about punctuation.

use unicode_normalization::UnicodeNormalization;

/// Normalize a display name or user query into identifier form.
///
/// 1. NFD normalize (decompose characters into base + combining marks)
/// 2. Drop combining marks (category Mn = Mark, Nonspacing)
/// 3. Lowercase
/// 4. Keep only ASCII alphanumerics
///
/// Examples:
/// - "Flabébé" → `flabebe`
/// - "Farfetch'd" → `farfetchd`
/// - "10,000,000 Volt Thunderbolt" → `10000000voltthunderbolt`
pub fn to_id(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Check if a character is a combining mark (diacritic).
///
/// Combining marks have Unicode category "Mn" (Mark, Nonspacing).
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

/// Capitalize the first character of an identifier, for display fallbacks
/// when a table has no proper name for an id.
pub fn capitalize_id(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
