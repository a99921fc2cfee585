//! Guess Categories
//!
//! The fixed, ordered list of compared attributes, one comparator per
//! attribute kind, and the display formatting for each tile.

use serde::{Deserialize, Serialize};

use crate::game::arc::{canonical_arc, compare_arcs};
use crate::game::entity::{Entity, Haki, HakiSet};

// =============================================================================
// TILE STATUS
// =============================================================================

/// Outcome of comparing one attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileStatus {
    /// Exact match
    Correct,
    /// Some overlap, not equal
    Partial,
    /// No match
    Wrong,
    /// The answer is larger / later than the guess
    Higher,
    /// The answer is smaller / earlier than the guess
    Lower,
    /// Cannot be compared
    Unknown,
}

// =============================================================================
// CATEGORY KEYS
// =============================================================================

/// A compared attribute. Declaration order is evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKey {
    /// Gender
    #[serde(rename = "gender")]
    Gender,
    /// Primary affiliation
    #[serde(rename = "affiliationPrimary")]
    Affiliation,
    /// Devil Fruit type
    #[serde(rename = "devilFruitType")]
    DevilFruit,
    /// Haki flags
    #[serde(rename = "haki")]
    Haki,
    /// Last bounty
    #[serde(rename = "bounty")]
    Bounty,
    /// Height
    #[serde(rename = "heightCm")]
    Height,
    /// Origin
    #[serde(rename = "origin")]
    Origin,
    /// Arc of first appearance
    #[serde(rename = "firstArc")]
    FirstArc,
}

/// Categories in evaluation order. The portrait is not a compared category.
pub const CATEGORY_ORDER: [CategoryKey; 8] = [
    CategoryKey::Gender,
    CategoryKey::Affiliation,
    CategoryKey::DevilFruit,
    CategoryKey::Haki,
    CategoryKey::Bounty,
    CategoryKey::Height,
    CategoryKey::Origin,
    CategoryKey::FirstArc,
];

impl CategoryKey {
    /// Column header.
    pub fn label(self) -> &'static str {
        match self {
            CategoryKey::Gender => "Gender",
            CategoryKey::Affiliation => "Affiliation",
            CategoryKey::DevilFruit => "Devil Fruit",
            CategoryKey::Haki => "Haki",
            CategoryKey::Bounty => "Bounty",
            CategoryKey::Height => "Height",
            CategoryKey::Origin => "Origin",
            CategoryKey::FirstArc => "First Arc",
        }
    }

    /// Raw value of this attribute on an entity.
    pub fn value_of(self, entity: &Entity) -> CategoryValue {
        match self {
            CategoryKey::Gender => CategoryValue::Text(entity.gender.as_str().to_owned()),
            CategoryKey::Affiliation => CategoryValue::Text(entity.affiliation_primary.clone()),
            CategoryKey::DevilFruit => CategoryValue::Text(entity.devil_fruit_type.as_str().to_owned()),
            CategoryKey::Haki => CategoryValue::Flags(entity.haki.into()),
            CategoryKey::Bounty => CategoryValue::Number(entity.bounty),
            CategoryKey::Height => CategoryValue::Number(entity.height_cm.map(u64::from)),
            CategoryKey::Origin => CategoryValue::Text(entity.origin.clone()),
            CategoryKey::FirstArc => CategoryValue::Text(entity.first_arc.clone()),
        }
    }

    /// Compare this attribute of a guess against the target.
    pub fn compare(self, guess: &Entity, target: &Entity) -> TileStatus {
        match self {
            CategoryKey::Gender => compare_eq(&guess.gender, &target.gender),
            CategoryKey::Affiliation => compare_eq(&guess.affiliation_primary, &target.affiliation_primary),
            CategoryKey::DevilFruit => compare_eq(&guess.devil_fruit_type, &target.devil_fruit_type),
            CategoryKey::Haki => compare_haki(guess.haki, target.haki),
            CategoryKey::Bounty => compare_number(guess.bounty, target.bounty),
            CategoryKey::Height => compare_number(guess.height_cm, target.height_cm),
            CategoryKey::Origin => compare_eq(&guess.origin, &target.origin),
            CategoryKey::FirstArc => {
                compare_arcs(Some(guess.first_arc.as_str()), Some(target.first_arc.as_str()))
            }
        }
    }

    /// Tile text for this attribute of an entity.
    pub fn display(self, entity: &Entity) -> String {
        match self {
            CategoryKey::Gender => entity.gender.to_string(),
            CategoryKey::Affiliation => entity.affiliation_primary.clone(),
            CategoryKey::DevilFruit => entity.devil_fruit_type.to_string(),
            CategoryKey::Haki => format_haki(entity.haki),
            CategoryKey::Bounty => format_bounty(entity.bounty),
            CategoryKey::Height => format_height(entity.height_cm),
            CategoryKey::Origin => entity.origin.clone(),
            CategoryKey::FirstArc => format_arc(&entity.first_arc),
        }
    }
}

/// Column headers in evaluation order.
pub fn category_labels() -> Vec<&'static str> {
    CATEGORY_ORDER.iter().map(|c| c.label()).collect()
}

// =============================================================================
// RESULTS
// =============================================================================

/// Raw attribute value, kept for redisplay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryValue {
    /// Categorical text
    Text(String),
    /// Nullable number
    Number(Option<u64>),
    /// Haki letters
    Flags(Vec<Haki>),
}

/// One compared attribute of a guess.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResult {
    /// Attribute key
    pub key: CategoryKey,
    /// Column header
    pub label: String,
    /// Comparison outcome
    pub status: TileStatus,
    /// The guess's raw value
    pub value: CategoryValue,
    /// Tile text
    pub display_value: String,
}

// =============================================================================
// COMPARATORS
// =============================================================================

/// Plain equality: equal ⇒ correct, else wrong.
pub fn compare_eq<T: PartialEq + ?Sized>(guess: &T, target: &T) -> TileStatus {
    if guess == target {
        TileStatus::Correct
    } else {
        TileStatus::Wrong
    }
}

/// Set overlap: equal sets (including both empty) ⇒ correct, any shared
/// flag ⇒ partial, disjoint ⇒ wrong.
pub fn compare_haki(guess: HakiSet, target: HakiSet) -> TileStatus {
    if guess == target {
        TileStatus::Correct
    } else if guess.intersects(target) {
        TileStatus::Partial
    } else {
        TileStatus::Wrong
    }
}

/// Ordering with unknowns.
///
/// Both unknown ⇒ correct; one unknown ⇒ unknown; otherwise the arrow
/// points from the guess toward the answer.
pub fn compare_number<T: Ord>(guess: Option<T>, target: Option<T>) -> TileStatus {
    match (guess, target) {
        (None, None) => TileStatus::Correct,
        (None, _) | (_, None) => TileStatus::Unknown,
        (Some(g), Some(t)) if g == t => TileStatus::Correct,
        (Some(g), Some(t)) if g < t => TileStatus::Higher,
        _ => TileStatus::Lower,
    }
}

// =============================================================================
// FORMATTING
// =============================================================================

/// Bounty tile: `?`, `None`, `1.5B`, `366M`, `50K`, or the raw number.
///
/// Billions keep one decimal; millions and thousands round to integers.
pub fn format_bounty(value: Option<u64>) -> String {
    match value {
        None => "?".to_owned(),
        Some(0) => "None".to_owned(),
        Some(v) if v >= 1_000_000_000 => format!("{}B", to_fixed(v as f64 / 1e9, 1)),
        Some(v) if v >= 1_000_000 => format!("{}M", to_fixed(v as f64 / 1e6, 0)),
        Some(v) if v >= 1_000 => format!("{}K", to_fixed(v as f64 / 1e3, 0)),
        Some(v) => v.to_string(),
    }
}

/// Height tile: `?` or `<n>cm`.
pub fn format_height(value: Option<u32>) -> String {
    match value {
        None => "?".to_owned(),
        Some(cm) => format!("{cm}cm"),
    }
}

/// Haki tile: `None` or comma-joined initials in the order the record lists them.
pub fn format_haki(haki: HakiSet) -> String {
    if haki.is_empty() {
        return "None".to_owned();
    }
    haki.iter().map(Haki::letter).collect::<Vec<_>>().join(", ")
}

/// Arc tile: the stored label, or `?` if it does not resolve.
pub fn format_arc(label: &str) -> String {
    match canonical_arc(label) {
        Some(_) => label.to_owned(),
        None => "?".to_owned(),
    }
}

/// Fixed-point decimal rendering of a non-negative float.
///
/// Picks the integer `n` closest to `x * 10^digits` using the exact binary
/// value of `x`, rounding exact ties upward.
fn to_fixed(x: f64, digits: u32) -> String {
    let scale = 10u128.pow(digits);
    let bits = x.to_bits();
    let exp_bits = ((bits >> 52) & 0x7ff) as i32;
    let frac = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if exp_bits == 0 {
        (frac, -1074)
    } else {
        (frac | (1u64 << 52), exp_bits - 1075)
    };

    let scaled = u128::from(mantissa) * scale;
    let n = if exponent >= 0 {
        scaled << exponent
    } else {
        let shift = exponent.unsigned_abs();
        if shift >= 127 {
            0
        } else {
            let q = scaled >> shift;
            let rem = scaled - (q << shift);
            if rem >= 1u128 << (shift - 1) {
                q + 1
            } else {
                q
            }
        }
    };

    if digits == 0 {
        n.to_string()
    } else {
        format!("{}.{:0width$}", n / scale, n % scale, width = digits as usize)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::fixtures;

    fn flags(list: &[Haki]) -> HakiSet {
        HakiSet::from_flags(list.iter().copied())
    }

    #[test]
    fn test_category_order_and_labels() {
        assert_eq!(
            category_labels(),
            vec!["Gender", "Affiliation", "Devil Fruit", "Haki", "Bounty", "Height", "Origin", "First Arc"]
        );
    }

    #[test]
    fn test_compare_eq() {
        assert_eq!(compare_eq("East Blue", "East Blue"), TileStatus::Correct);
        assert_eq!(compare_eq("East Blue", "Grand Line"), TileStatus::Wrong);
        assert_eq!(compare_eq("", ""), TileStatus::Correct);
    }

    #[test]
    fn test_compare_haki() {
        use Haki::*;
        assert_eq!(compare_haki(flags(&[]), flags(&[])), TileStatus::Correct);
        assert_eq!(compare_haki(flags(&[Observation, Armament]), flags(&[Armament, Observation])), TileStatus::Correct);
        assert_eq!(compare_haki(flags(&[Observation]), flags(&[Observation, Armament])), TileStatus::Partial);
        assert_eq!(compare_haki(flags(&[Observation]), flags(&[Armament, Conqueror])), TileStatus::Wrong);
        assert_eq!(compare_haki(flags(&[]), flags(&[Conqueror])), TileStatus::Wrong);
        assert_eq!(compare_haki(flags(&[Conqueror]), flags(&[])), TileStatus::Wrong);
    }

    #[test]
    fn test_compare_number() {
        assert_eq!(compare_number::<u64>(None, None), TileStatus::Correct);
        assert_eq!(compare_number(None, Some(3_000_000_000u64)), TileStatus::Unknown);
        assert_eq!(compare_number(Some(5u64), None), TileStatus::Unknown);
        assert_eq!(compare_number(Some(1_032_000_000u64), Some(3_000_000_000)), TileStatus::Higher);
        assert_eq!(compare_number(Some(3_000_000_000u64), Some(1_032_000_000)), TileStatus::Lower);
        assert_eq!(compare_number(Some(0u64), Some(0)), TileStatus::Correct);
    }

    #[test]
    fn test_format_bounty() {
        assert_eq!(format_bounty(None), "?");
        assert_eq!(format_bounty(Some(0)), "None");
        assert_eq!(format_bounty(Some(3_000_000_000)), "3.0B");
        assert_eq!(format_bounty(Some(1_111_000_000)), "1.1B");
        assert_eq!(format_bounty(Some(1_032_000_000)), "1.0B");
        assert_eq!(format_bounty(Some(366_000_000)), "366M");
        assert_eq!(format_bounty(Some(1_500_000)), "2M");
        assert_eq!(format_bounty(Some(50_000)), "50K");
        assert_eq!(format_bounty(Some(999)), "999");
    }

    #[test]
    fn test_to_fixed_ties() {
        // Exact binary ties round up
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(1.25, 1), "1.3");
        // 1.15 is stored just below the tie
        assert_eq!(to_fixed(1.15, 1), "1.1");
        // 1.05 is stored just above the tie
        assert_eq!(to_fixed(1.05, 1), "1.1");
        assert_eq!(to_fixed(0.0, 1), "0.0");
    }

    #[test]
    fn test_format_height_and_haki() {
        assert_eq!(format_height(None), "?");
        assert_eq!(format_height(Some(174)), "174cm");
        assert_eq!(format_haki(HakiSet::EMPTY), "None");
        assert_eq!(format_haki(flags(&[Haki::Conqueror, Haki::Observation])), "C, O");
        assert_eq!(format_haki(flags(&[Haki::Armament, Haki::Observation])), "A, O");

        let decoded: HakiSet = serde_json::from_str(r#"["A","O"]"#).unwrap();
        assert_eq!(format_haki(decoded), "A, O");
        assert_eq!(compare_haki(decoded, flags(&[Haki::Observation, Haki::Armament])), TileStatus::Correct);
    }

    #[test]
    fn test_format_arc() {
        assert_eq!(format_arc("Romance Dawn"), "Romance Dawn");
        assert_eq!(format_arc("wano"), "wano");
        assert_eq!(format_arc("Somewhere Else"), "?");
    }

    #[test]
    fn test_value_of() {
        let luffy = fixtures::luffy();
        assert_eq!(CategoryKey::Bounty.value_of(&luffy), CategoryValue::Number(Some(3_000_000_000)));
        assert_eq!(CategoryKey::Gender.value_of(&luffy), CategoryValue::Text("Male".into()));
        assert_eq!(CategoryKey::Haki.value_of(&luffy), CategoryValue::Flags(Haki::ALL.to_vec()));
    }

    #[test]
    fn test_result_json_shape() {
        let result = CategoryResult {
            key: CategoryKey::Height,
            label: "Height".into(),
            status: TileStatus::Higher,
            value: CategoryValue::Number(None),
            display_value: "?".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["key"], "heightCm");
        assert_eq!(json["status"], "higher");
        assert!(json["value"].is_null());
        assert_eq!(json["displayValue"], "?");
    }
}
