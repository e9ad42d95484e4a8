// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Shared synthetic fixtures for unit and integration tests.
//!
//! A miniature but internally consistent dex: a real tier table with
//! sections, multi-word names that generate alias entries, a full evolution
//! line, learnsets with per-generation markers, and one mod overlay.

#![doc(hidden)]
#![allow(clippy::missing_panics_doc)]

use std::collections::{BTreeMap, HashMap};

use crate::dex::{
    Dex, DexTables, ItemData, ModData, MoveCategory, MoveData, MoveFlags, Nonstandard, Species,
    Stats, TierRow, TierTable, TypeData,
};
use crate::index::{build_search_index, SearchIndex};
use crate::types::Id;

fn species(
    name: &str,
    gen: u8,
    tier: &str,
    types: &[&str],
    spe: u16,
    egg_groups: &[&str],
) -> Species {
    Species {
        name: name.into(),
        gen,
        tier: tier.into(),
        types: types.iter().map(|t| (*t).to_string()).collect(),
        base_stats: Stats { hp: 70, atk: 80, def: 70, spa: 80, spd: 70, spe },
        egg_groups: egg_groups.iter().map(|g| (*g).to_string()).collect(),
        ..Default::default()
    }
}

fn move_data(name: &str, gen: u8, move_type: &str, category: MoveCategory, power: u16) -> MoveData {
    MoveData {
        name: name.into(),
        gen,
        move_type: move_type.into(),
        category,
        base_power: power,
        accuracy: Some(100),
        pp: 15,
        ..Default::default()
    }
}

fn learnset(moves: &[(&str, &str)]) -> HashMap<Id, String> {
    moves
        .iter()
        .map(|(id, code)| (Id::raw(*id), (*code).to_string()))
        .collect()
}

/// The full synthetic dex every integration test runs against.
pub fn fixture_dex() -> Dex {
    let mut t = DexTables::default();

    // -- species ----------------------------------------------------------
    t.species.insert(
        Id::raw("pichu"),
        Species {
            evos: vec![Id::raw("pikachu")],
            ..species("Pichu", 2, "LC", &["Electric"], 60, &["Undiscovered"])
        },
    );
    t.species.insert(
        Id::raw("pikachu"),
        Species {
            prevo: Some(Id::raw("pichu")),
            evos: vec![Id::raw("raichu")],
            abilities: vec!["Static".into(), "Lightning Rod".into()],
            ..species("Pikachu", 1, "UU", &["Electric"], 90, &["Field", "Fairy"])
        },
    );
    t.species.insert(
        Id::raw("raichu"),
        Species {
            prevo: Some(Id::raw("pikachu")),
            abilities: vec!["Static".into()],
            ..species("Raichu", 1, "UU", &["Electric"], 110, &["Field", "Fairy"])
        },
    );
    t.species.insert(
        Id::raw("mewtwo"),
        species("Mewtwo", 1, "Uber", &["Psychic"], 130, &["Undiscovered"]),
    );
    t.species.insert(
        Id::raw("rayquaza"),
        species("Rayquaza", 3, "Uber", &["Dragon", "Flying"], 95, &["Undiscovered"]),
    );
    t.species.insert(
        Id::raw("charizard"),
        species("Charizard", 1, "OU", &["Fire", "Flying"], 100, &["Monster", "Dragon"]),
    );
    t.species.insert(
        Id::raw("garchomp"),
        species("Garchomp", 4, "OU", &["Dragon", "Ground"], 102, &["Monster", "Dragon"]),
    );
    t.species.insert(
        Id::raw("dragapult"),
        species("Dragapult", 8, "OU", &["Dragon", "Ghost"], 142, &["Amorphous", "Dragon"]),
    );
    t.species.insert(
        Id::raw("electrode"),
        species("Electrode", 1, "UU", &["Electric"], 150, &["Mineral"]),
    );
    t.species.insert(
        Id::raw("snorlax"),
        species("Snorlax", 1, "UU", &["Normal"], 30, &["Monster"]),
    );
    t.species.insert(
        Id::raw("mrmime"),
        species("Mr. Mime", 1, "UU", &["Psychic", "Fairy"], 90, &["Human-Like"]),
    );
    t.species.insert(
        Id::raw("mimejr"),
        Species {
            evos: vec![Id::raw("mrmime")],
            ..species("Mime Jr.", 4, "LC", &["Psychic", "Fairy"], 60, &["Undiscovered"])
        },
    );
    t.species.insert(
        Id::raw("missingno"),
        Species {
            nonstandard: Some(Nonstandard::Custom),
            ..species("MissingNo.", 1, "Illegal", &["Normal"], 29, &[])
        },
    );

    // -- tier table -------------------------------------------------------
    let entry = |id: &str| TierRow::Entry(Id::raw(id));
    let header = |label: &str| TierRow::Header { header: label.to_string() };
    t.tiers.insert(
        "singles".to_string(),
        TierTable {
            rows: vec![
                header("AG"),
                header("Uber"),
                entry("mewtwo"),
                entry("rayquaza"),
                header("OU"),
                entry("charizard"),
                entry("dragapult"),
                entry("garchomp"),
                header("UU"),
                entry("electrode"),
                entry("mrmime"),
                entry("pikachu"),
                entry("raichu"),
                entry("snorlax"),
                header("LC"),
                entry("mimejr"),
                entry("pichu"),
            ],
            sections: BTreeMap::from([
                ("AG".to_string(), 0),
                ("Uber".to_string(), 1),
                ("OU".to_string(), 4),
                ("UU".to_string(), 8),
                ("LC".to_string(), 14),
            ]),
        },
    );

    // -- moves ------------------------------------------------------------
    t.moves.insert(
        Id::raw("tackle"),
        move_data("Tackle", 1, "Normal", MoveCategory::Physical, 40),
    );
    t.moves.insert(
        Id::raw("thunderbolt"),
        move_data("Thunderbolt", 1, "Electric", MoveCategory::Special, 90),
    );
    t.moves.insert(
        Id::raw("hyperbeam"),
        MoveData {
            flags: MoveFlags { recharge: true, ..Default::default() },
            ..move_data("Hyper Beam", 1, "Normal", MoveCategory::Special, 150)
        },
    );
    t.moves.insert(
        Id::raw("solarbeam"),
        MoveData {
            flags: MoveFlags { charge: true, ..Default::default() },
            ..move_data("Solar Beam", 1, "Grass", MoveCategory::Special, 120)
        },
    );
    t.moves.insert(
        Id::raw("earthquake"),
        move_data("Earthquake", 1, "Ground", MoveCategory::Physical, 100),
    );
    t.moves.insert(
        Id::raw("shadowball"),
        move_data("Shadow Ball", 2, "Ghost", MoveCategory::Special, 80),
    );
    t.moves.insert(
        Id::raw("voltswitch"),
        move_data("Volt Switch", 5, "Electric", MoveCategory::Special, 70),
    );
    t.moves.insert(
        Id::raw("protect"),
        move_data("Protect", 2, "Normal", MoveCategory::Status, 0),
    );
    t.moves.insert(
        Id::raw("rest"),
        move_data("Rest", 1, "Psychic", MoveCategory::Status, 0),
    );
    t.moves.insert(
        Id::raw("sleeptalk"),
        move_data("Sleep Talk", 2, "Normal", MoveCategory::Status, 0),
    );
    t.moves.insert(
        Id::raw("dragondance"),
        move_data("Dragon Dance", 3, "Dragon", MoveCategory::Status, 0),
    );
    t.moves.insert(
        Id::raw("willowisp"),
        move_data("Will-O-Wisp", 3, "Fire", MoveCategory::Status, 0),
    );

    // -- learnsets --------------------------------------------------------
    t.learnsets.insert(
        Id::raw("pichu"),
        learnset(&[("tackle", "23456789"), ("thunderbolt", "23456789")]),
    );
    t.learnsets.insert(
        Id::raw("pikachu"),
        learnset(&[
            ("tackle", "123456789"),
            ("thunderbolt", "123456789"),
            ("voltswitch", "56789"),
            ("protect", "23456789"),
        ]),
    );
    t.learnsets.insert(
        Id::raw("raichu"),
        learnset(&[("hyperbeam", "123456789")]),
    );
    t.learnsets.insert(
        Id::raw("snorlax"),
        learnset(&[
            ("tackle", "123456789"),
            ("hyperbeam", "3456789"),
            ("rest", "123456789"),
            ("sleeptalk", "3456789"),
        ]),
    );
    t.learnsets.insert(
        Id::raw("garchomp"),
        learnset(&[("earthquake", "456789"), ("dragondance", "6789")]),
    );
    t.learnsets.insert(
        Id::raw("charizard"),
        learnset(&[("earthquake", "123456789"), ("solarbeam", "123456789")]),
    );
    t.learnsets.insert(
        Id::raw("mrmime"),
        learnset(&[("protect", "23456789"), ("shadowball", "23456789")]),
    );
    t.learnsets.insert(
        Id::raw("dragapult"),
        learnset(&[("shadowball", "89"), ("dragondance", "89"), ("willowisp", "89")]),
    );

    // -- items, abilities, types ------------------------------------------
    t.items.insert(
        Id::raw("leftovers"),
        ItemData { name: "Leftovers".into(), gen: 2, ..Default::default() },
    );
    t.items.insert(
        Id::raw("choicescarf"),
        ItemData { name: "Choice Scarf".into(), gen: 4, ..Default::default() },
    );
    t.items.insert(
        Id::raw("powerherb"),
        ItemData { name: "Power Herb".into(), gen: 4, ..Default::default() },
    );
    for (id, name, gen) in [
        ("static", "Static", 3),
        ("lightningrod", "Lightning Rod", 3),
        ("levitate", "Levitate", 3),
        ("intimidate", "Intimidate", 3),
    ] {
        t.abilities.insert(
            Id::raw(id),
            crate::dex::AbilityData { name: name.into(), gen, ..Default::default() },
        );
    }
    for (id, name, gen) in [
        ("normal", "Normal", 1),
        ("fire", "Fire", 1),
        ("water", "Water", 1),
        ("grass", "Grass", 1),
        ("electric", "Electric", 1),
        ("psychic", "Psychic", 1),
        ("ground", "Ground", 1),
        ("ghost", "Ghost", 1),
        ("dragon", "Dragon", 1),
        ("flying", "Flying", 1),
        ("steel", "Steel", 2),
        ("fairy", "Fairy", 6),
    ] {
        t.types.insert(Id::raw(id), TypeData { name: name.into(), gen });
    }

    // -- aliases and mods -------------------------------------------------
    t.aliases.insert(Id::raw("zard"), "Charizard".to_string());
    t.aliases.insert(Id::raw("eq"), "Earthquake".to_string());
    t.mods.insert(
        "testmod".to_string(),
        ModData {
            banlist: vec![Id::raw("dragapult")],
            unbanlist: vec![Id::raw("mewtwo")],
            useless_moves: HashMap::from([(Id::raw("protect"), true)]),
            ..Default::default()
        },
    );

    Dex::new(t)
}

/// Index built over [`fixture_dex`].
pub fn fixture_index() -> SearchIndex {
    build_search_index(&fixture_dex())
}
