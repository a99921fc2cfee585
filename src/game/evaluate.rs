//! Guess Evaluation
//!
//! Compares a guessed entity against the target across every category.
//! Pure: no clock, no storage, no logging.

use serde::{Deserialize, Serialize};

use crate::game::category::{CategoryResult, TileStatus, CATEGORY_ORDER};
use crate::game::entity::Entity;

/// Evaluated guess. Created once, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessResult {
    /// Guessed entity id
    #[serde(rename = "characterId", alias = "entityId")]
    pub entity_id: String,
    /// Guessed entity name
    #[serde(rename = "characterName", alias = "entityName")]
    pub entity_name: String,
    /// Guessed entity portrait
    #[serde(rename = "imageUrl", alias = "imageRef")]
    pub image_ref: String,
    /// One result per category, in evaluation order
    pub categories: Vec<CategoryResult>,
    /// True iff every category is correct
    pub is_correct: bool,
}

impl GuessResult {
    /// Statuses in category order.
    pub fn statuses(&self) -> impl Iterator<Item = TileStatus> + '_ {
        self.categories.iter().map(|c| c.status)
    }
}

/// Evaluate a guess against the target.
pub fn evaluate_guess(guess: &Entity, target: &Entity) -> GuessResult {
    let categories: Vec<CategoryResult> = CATEGORY_ORDER
        .iter()
        .map(|key| CategoryResult {
            key: *key,
            label: key.label().to_owned(),
            status: key.compare(guess, target),
            value: key.value_of(guess),
            display_value: key.display(guess),
        })
        .collect();

    let is_correct = categories.iter().all(|c| c.status == TileStatus::Correct);

    GuessResult {
        entity_id: guess.id.clone(),
        entity_name: guess.name.clone(),
        image_ref: guess.image_ref.clone(),
        categories,
        is_correct,
    }
}

/// Check if a guess wins the round.
#[inline]
pub fn is_winning_guess(result: &GuessResult) -> bool {
    result.is_correct
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::category::CategoryKey;
    use crate::game::entity::{fixtures, Haki, HakiSet};

    fn status_of(result: &GuessResult, key: CategoryKey) -> TileStatus {
        result
            .categories
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.status)
            .expect("category present")
    }

    #[test]
    fn test_reflexive_guess_is_correct() {
        for entity in fixtures::roster() {
            let result = evaluate_guess(&entity, &entity);
            assert!(result.is_correct);
            assert!(is_winning_guess(&result));
            assert!(result.statuses().all(|s| s == TileStatus::Correct));
        }
    }

    #[test]
    fn test_categories_in_fixed_order() {
        let result = evaluate_guess(&fixtures::nami(), &fixtures::luffy());
        let keys: Vec<_> = result.categories.iter().map(|c| c.key).collect();
        assert_eq!(keys, CATEGORY_ORDER.to_vec());
    }

    #[test]
    fn test_nami_against_luffy() {
        let result = evaluate_guess(&fixtures::nami(), &fixtures::luffy());

        assert!(!result.is_correct);
        assert_eq!(result.entity_id, "nami");
        assert_eq!(result.entity_name, "Nami");
        assert_eq!(status_of(&result, CategoryKey::Gender), TileStatus::Wrong);
        assert_eq!(status_of(&result, CategoryKey::Affiliation), TileStatus::Correct);
        assert_eq!(status_of(&result, CategoryKey::DevilFruit), TileStatus::Wrong);
        assert_eq!(status_of(&result, CategoryKey::Haki), TileStatus::Wrong);
        assert_eq!(status_of(&result, CategoryKey::Bounty), TileStatus::Higher);
        assert_eq!(status_of(&result, CategoryKey::Height), TileStatus::Higher);
        assert_eq!(status_of(&result, CategoryKey::Origin), TileStatus::Correct);
        // Orange Town comes after Romance Dawn
        assert_eq!(status_of(&result, CategoryKey::FirstArc), TileStatus::Lower);
    }

    #[test]
    fn test_partial_haki_blocks_win() {
        let target = fixtures::zoro();
        let mut guess = target.clone();
        guess.id = "zoro-alt".into();
        guess.haki = HakiSet::from_flags([Haki::Observation]);

        let result = evaluate_guess(&guess, &target);
        assert_eq!(status_of(&result, CategoryKey::Haki), TileStatus::Partial);
        assert!(!result.is_correct);
    }

    #[test]
    fn test_unknown_bounty_display() {
        let target = fixtures::luffy();
        let mut guess = fixtures::zoro();
        guess.bounty = None;

        let result = evaluate_guess(&guess, &target);
        let bounty = &result.categories[4];
        assert_eq!(bounty.key, CategoryKey::Bounty);
        assert_eq!(bounty.status, TileStatus::Unknown);
        assert_eq!(bounty.display_value, "?");
    }

    #[test]
    fn test_both_unknown_bounty_is_correct() {
        let mut target = fixtures::luffy();
        target.bounty = None;
        let mut guess = fixtures::zoro();
        guess.bounty = None;

        let result = evaluate_guess(&guess, &target);
        assert_eq!(status_of(&result, CategoryKey::Bounty), TileStatus::Correct);
        assert_eq!(result.categories[4].display_value, "?");
    }

    #[test]
    fn test_unrecognized_arc_only_affects_its_tile() {
        let target = fixtures::luffy();
        let mut guess = fixtures::luffy();
        guess.first_arc = "Film Red".into();

        let result = evaluate_guess(&guess, &target);
        assert_eq!(status_of(&result, CategoryKey::FirstArc), TileStatus::Unknown);
        assert_eq!(result.categories[7].display_value, "?");
        assert_eq!(status_of(&result, CategoryKey::Gender), TileStatus::Correct);
        assert!(!result.is_correct);
    }

    #[test]
    fn test_guess_result_json_shape() {
        let result = evaluate_guess(&fixtures::nami(), &fixtures::nami());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["characterId"], "nami");
        assert_eq!(json["isCorrect"], true);
        assert_eq!(json["categories"].as_array().map(Vec::len), Some(8));

        let back: GuessResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
