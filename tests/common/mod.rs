//! Shared fixtures for integration tests.

#![allow(dead_code)]

use onepiecedle::game::arc::ARC_ORDER;
use onepiecedle::game::entity::{DevilFruitType, Entity, Gender, Haki, HakiSet};
use onepiecedle::Roster;
use proptest::prelude::*;

pub fn entity(id: &str, name: &str) -> Entity {
    Entity {
        id: id.into(),
        name: name.into(),
        aliases: Vec::new(),
        image_ref: format!("/characters/{id}.png"),
        gender: Gender::Male,
        affiliation_primary: "Straw Hat Pirates".into(),
        devil_fruit_type: DevilFruitType::None,
        haki: HakiSet::EMPTY,
        bounty: None,
        height_cm: None,
        origin: "East Blue".into(),
        first_arc: "Romance Dawn".into(),
    }
}

/// The bundled character file.
pub fn bundled_roster() -> Roster {
    let json = include_str!("../../data/characters.json");
    Roster::from_json_strict(json).expect("bundled roster is valid")
}

pub fn arb_haki() -> impl Strategy<Value = HakiSet> {
    prop::collection::vec(prop::sample::select(Haki::ALL.to_vec()), 0..=3).prop_map(HakiSet::from_flags)
}

pub fn arb_entity() -> impl Strategy<Value = Entity> {
    (
        "[a-z]{1,12}",
        prop::sample::select(Gender::ALL.to_vec()),
        prop::sample::select(DevilFruitType::ALL.to_vec()),
        arb_haki(),
        prop::option::of(0u64..5_000_000_000),
        prop::option::of(50u32..1000),
        prop::sample::select(ARC_ORDER.to_vec()),
        prop::sample::select(vec!["East Blue", "Grand Line", "North Blue"]),
    )
        .prop_map(|(id, gender, fruit, haki, bounty, height, arc, origin)| Entity {
            gender,
            devil_fruit_type: fruit,
            haki,
            bounty,
            height_cm: height,
            first_arc: arc.to_string(),
            origin: origin.to_string(),
            ..entity(&id, &id.to_uppercase())
        })
}

/// Roster with distinct ids.
pub fn arb_roster(max: usize) -> impl Strategy<Value = Vec<Entity>> {
    prop::collection::btree_map("[a-z]{1,8}", arb_entity(), 1..max).prop_map(|m| {
        m.into_iter()
            .map(|(id, mut e)| {
                e.id = id;
                e
            })
            .collect()
    })
}
