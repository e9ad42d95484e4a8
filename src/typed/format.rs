// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Format-string resolution.
//!
//! A format string like `gen8bdspou` or `gen9natdexdoubles` has to become a
//! concrete rule context before any legality question can be answered. The
//! old way to do this is one long chain of `starts_with` rewrites; here the
//! precedence is an ordered table of named `(predicate, transform)` rules so
//! each rule is independently testable and the priority is explicit. The
//! first matching rule wins.
//!
//! Several near-duplicate DLC rules (`ssdlc1`/`sspredlc`/`svdlc1`) look
//! collapsible but intentionally diverge per generation; they stay separate
//! entries on purpose.

use crate::dex::{Dex, PokemonSet};
use crate::types::Id;
use crate::utils::to_id;

/// The newest generation the engine assumes when a format names none.
pub const CURRENT_GEN: u8 = 9;

/// Resolved variant of the active ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatType {
    #[default]
    Singles,
    Doubles,
    /// Battle-Stadium-style singles (flat rules, species clause).
    Bss,
    LetsGo,
    Bdsp,
    BdspDoubles,
    NatDex,
    Nfe,
    Lc,
    /// Historical console Stadium emulation.
    Stadium,
    Metronome,
    /// Gen 8 before any DLC: Isle of Armor cut-off.
    SsPreDlc,
    /// Gen 8 with only the first DLC.
    SsDlc1,
    SsDlc1Doubles,
    /// Gen 9 with only the first DLC.
    SvDlc1,
    SvDlc1NatDex,
}

impl FormatType {
    /// Whether the resolved variant plays with doubles mechanics.
    pub fn is_doubles(self) -> bool {
        matches!(
            self,
            FormatType::Doubles | FormatType::BdspDoubles | FormatType::SsDlc1Doubles
        )
    }
}

/// Everything a category resolver needs to know about its context. Fixed at
/// resolver construction; a context change constructs a new resolver.
#[derive(Debug, Clone, Default)]
pub struct FormatContext {
    pub gen: u8,
    pub format_type: FormatType,
    pub mod_id: Option<String>,
    /// Normalized format string with the generation prefix and mod suffix
    /// stripped; what the tier-boundary detection keys off.
    pub format: String,
    pub species: Option<Id>,
    pub set: Option<PokemonSet>,
}

/// One named resolution rule. `applies` inspects the residual format string
/// and the already-extracted generation; `apply` commits the transform.
pub struct FormatRule {
    pub name: &'static str,
    pub applies: fn(format: &str, gen: u8) -> bool,
    pub apply: fn(ctx: &mut FormatContext),
}

/// Ordered by priority; the first matching rule wins. Compound variants sit
/// above the plain variants they would otherwise be shadowed by.
pub const FORMAT_RULES: &[FormatRule] = &[
    FormatRule {
        name: "ss-dlc1-doubles",
        applies: |f, gen| gen == 8 && f.contains("dlc1") && f.contains("doubles"),
        apply: |ctx| ctx.format_type = FormatType::SsDlc1Doubles,
    },
    FormatRule {
        name: "ss-dlc1",
        applies: |f, gen| gen == 8 && f.contains("dlc1"),
        apply: |ctx| ctx.format_type = FormatType::SsDlc1,
    },
    FormatRule {
        name: "ss-predlc",
        applies: |f, gen| gen == 8 && f.contains("predlc"),
        apply: |ctx| ctx.format_type = FormatType::SsPreDlc,
    },
    FormatRule {
        name: "sv-dlc1-natdex",
        applies: |f, gen| gen == 9 && f.contains("dlc1") && f.contains("natdex"),
        apply: |ctx| ctx.format_type = FormatType::SvDlc1NatDex,
    },
    FormatRule {
        name: "sv-dlc1",
        applies: |f, gen| gen == 9 && f.contains("dlc1"),
        apply: |ctx| ctx.format_type = FormatType::SvDlc1,
    },
    FormatRule {
        name: "letsgo",
        applies: |f, _| f.contains("letsgo"),
        apply: |ctx| {
            ctx.gen = 7;
            ctx.format_type = FormatType::LetsGo;
        },
    },
    FormatRule {
        name: "bdsp-doubles",
        applies: |f, _| f.contains("bdsp") && f.contains("doubles"),
        apply: |ctx| {
            ctx.gen = 8;
            ctx.format_type = FormatType::BdspDoubles;
        },
    },
    FormatRule {
        name: "bdsp",
        applies: |f, _| f.contains("bdsp"),
        apply: |ctx| {
            ctx.gen = 8;
            ctx.format_type = FormatType::Bdsp;
        },
    },
    FormatRule {
        name: "metronome",
        applies: |f, _| f.contains("metronome"),
        apply: |ctx| ctx.format_type = FormatType::Metronome,
    },
    FormatRule {
        name: "natdex",
        applies: |f, _| f.contains("natdex") || f.contains("nationaldex"),
        apply: |ctx| ctx.format_type = FormatType::NatDex,
    },
    FormatRule {
        name: "stadium",
        applies: |f, _| f.contains("stadium") && !f.contains("battlestadium"),
        apply: |ctx| ctx.format_type = FormatType::Stadium,
    },
    FormatRule {
        name: "battle-stadium-singles",
        applies: |f, _| f.contains("battlestadiumsingles") || f.contains("bss"),
        apply: |ctx| ctx.format_type = FormatType::Bss,
    },
    FormatRule {
        name: "vgc",
        applies: |f, _| f.contains("vgc") || f.contains("battlestadiumdoubles"),
        apply: |ctx| ctx.format_type = FormatType::Doubles,
    },
    FormatRule {
        name: "doubles",
        applies: |f, _| f.contains("doubles"),
        apply: |ctx| ctx.format_type = FormatType::Doubles,
    },
    FormatRule {
        name: "nfe",
        applies: |f, _| f.ends_with("nfe"),
        apply: |ctx| ctx.format_type = FormatType::Nfe,
    },
    FormatRule {
        name: "littlecup",
        applies: |f, _| f.starts_with("lc") || f.contains("littlecup"),
        apply: |ctx| ctx.format_type = FormatType::Lc,
    },
];

/// Resolve a raw format string into a rule context.
///
/// Steps, in order: normalize; extract a `gen<N>` prefix (defaulting to
/// [`CURRENT_GEN`]); strip a trailing mod id known to the dex; then walk
/// [`FORMAT_RULES`] top to bottom and apply the first match.
pub fn resolve_format(dex: &Dex, format: &str) -> FormatContext {
    let mut normalized = to_id(format);
    let mut ctx = FormatContext { gen: CURRENT_GEN, ..FormatContext::default() };

    if let Some(rest) = normalized.strip_prefix("gen") {
        if let Some(digit) = rest.chars().next().and_then(|c| c.to_digit(10)) {
            if (1..=9).contains(&digit) {
                ctx.gen = digit as u8;
                normalized = rest[1..].to_string();
            }
        }
    }

    for mod_id in dex.tables().mods.keys() {
        if !mod_id.is_empty() && normalized.ends_with(mod_id.as_str()) {
            ctx.mod_id = Some(mod_id.clone());
            normalized.truncate(normalized.len() - mod_id.len());
            break;
        }
    }

    for rule in FORMAT_RULES {
        if (rule.applies)(&normalized, ctx.gen) {
            tracing::trace!(rule = rule.name, format = %normalized, "format rule matched");
            (rule.apply)(&mut ctx);
            break;
        }
    }

    ctx.format = normalized;
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(format: &str) -> FormatContext {
        resolve_format(&Dex::default(), format)
    }

    #[test]
    fn test_gen_prefix_extraction() {
        assert_eq!(ctx("gen9ou").gen, 9);
        assert_eq!(ctx("gen1ou").gen, 1);
        assert_eq!(ctx("ou").gen, CURRENT_GEN);
        assert_eq!(ctx("gen9ou").format, "ou");
    }

    #[test]
    fn test_letsgo_forces_gen7() {
        let ctx = ctx("gen8letsgoou");
        assert_eq!(ctx.format_type, FormatType::LetsGo);
        assert_eq!(ctx.gen, 7);
    }

    #[test]
    fn test_bdsp_compound_before_plain() {
        assert_eq!(ctx("gen8bdspdoublesou").format_type, FormatType::BdspDoubles);
        assert_eq!(ctx("gen8bdspou").format_type, FormatType::Bdsp);
    }

    #[test]
    fn test_dlc_rules_diverge_per_generation() {
        assert_eq!(ctx("gen8dlc1ou").format_type, FormatType::SsDlc1);
        assert_eq!(ctx("gen8dlc1doublesou").format_type, FormatType::SsDlc1Doubles);
        assert_eq!(ctx("gen9dlc1ou").format_type, FormatType::SvDlc1);
        assert_eq!(ctx("gen9natdexdlc1ou").format_type, FormatType::SvDlc1NatDex);
        // A dlc1 tag in an unrelated generation resolves to nothing special.
        assert_eq!(ctx("gen7dlc1ou").format_type, FormatType::Singles);
    }

    #[test]
    fn test_natdex_and_doubles() {
        assert_eq!(ctx("gen9nationaldexou").format_type, FormatType::NatDex);
        assert_eq!(ctx("gen9doublesou").format_type, FormatType::Doubles);
        assert!(ctx("gen9doublesou").format_type.is_doubles());
    }

    #[test]
    fn test_stadium_and_battle_stadium_disambiguation() {
        assert_eq!(ctx("gen1stadiumou").format_type, FormatType::Stadium);
        assert_eq!(ctx("gen9battlestadiumsingles").format_type, FormatType::Bss);
        assert_eq!(ctx("gen9vgc2024").format_type, FormatType::Doubles);
    }

    #[test]
    fn test_nfe_and_lc() {
        assert_eq!(ctx("gen9nfe").format_type, FormatType::Nfe);
        assert_eq!(ctx("gen9lc").format_type, FormatType::Lc);
        assert_eq!(ctx("gen9littlecup").format_type, FormatType::Lc);
        // "lc" must not fire on substrings of unrelated formats.
        assert_eq!(ctx("gen9balancedhackmons").format_type, FormatType::Singles);
    }

    #[test]
    fn test_mod_suffix_stripping() {
        use crate::dex::{DexTables, ModData};
        let mut tables = DexTables::default();
        tables.mods.insert("radred".to_string(), ModData::default());
        let dex = Dex::new(tables);
        let ctx = resolve_format(&dex, "gen8ouradred");
        assert_eq!(ctx.mod_id.as_deref(), Some("radred"));
        assert_eq!(ctx.format, "ou");
    }

    #[test]
    fn test_metronome() {
        assert_eq!(ctx("gen9metronomebattle").format_type, FormatType::Metronome);
    }
}
