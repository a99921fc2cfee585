//! Guessable Characters
//!
//! The immutable entity record plus its categorical vocabularies.
//! Field names serialize in camelCase to match the roster data files.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// =============================================================================
// VOCABULARIES
// =============================================================================

/// Character gender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Not known
    Unknown,
    /// Anything else
    Other,
}

impl Gender {
    /// All valid values.
    pub const ALL: [Gender; 4] = [Gender::Male, Gender::Female, Gender::Unknown, Gender::Other];

    /// Display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => "Unknown",
            Gender::Other => "Other",
        }
    }

    /// Parse an exact display name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == s)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Devil Fruit classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DevilFruitType {
    /// Paramecia
    Paramecia,
    /// Zoan
    Zoan,
    /// Logia
    Logia,
    /// No Devil Fruit
    None,
}

impl DevilFruitType {
    /// All valid values.
    pub const ALL: [DevilFruitType; 4] = [
        DevilFruitType::Paramecia,
        DevilFruitType::Zoan,
        DevilFruitType::Logia,
        DevilFruitType::None,
    ];

    /// Display name.
    pub fn as_str(self) -> &'static str {
        match self {
            DevilFruitType::Paramecia => "Paramecia",
            DevilFruitType::Zoan => "Zoan",
            DevilFruitType::Logia => "Logia",
            DevilFruitType::None => "None",
        }
    }

    /// Parse an exact display name.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == s)
    }
}

impl fmt::Display for DevilFruitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Haki type, stored as its initial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Haki {
    /// Observation Haki
    #[serde(rename = "O")]
    Observation = 0,
    /// Armament Haki
    #[serde(rename = "A")]
    Armament = 1,
    /// Conqueror's Haki
    #[serde(rename = "C")]
    Conqueror = 2,
}

impl Haki {
    /// All haki in canonical order.
    pub const ALL: [Haki; 3] = [Haki::Observation, Haki::Armament, Haki::Conqueror];

    /// Single-letter code.
    pub fn letter(self) -> &'static str {
        match self {
            Haki::Observation => "O",
            Haki::Armament => "A",
            Haki::Conqueror => "C",
        }
    }

    /// Parse a single-letter code.
    pub fn from_letter(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.letter() == s)
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

// =============================================================================
// HAKI SET
// =============================================================================

/// Set of haki flags. Equality and overlap ignore order, but the order
/// flags were listed in is kept for display. Duplicates are rejected on
/// decode.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Haki>", into = "Vec<Haki>")]
pub struct HakiSet {
    bits: u8,
    order: [Haki; 3],
    len: u8,
}

impl HakiSet {
    /// The empty set.
    pub const EMPTY: HakiSet = HakiSet { bits: 0, order: Haki::ALL, len: 0 };

    /// Build from flags, ignoring repeats.
    pub fn from_flags<I: IntoIterator<Item = Haki>>(flags: I) -> Self {
        let mut set = Self::EMPTY;
        for h in flags {
            set.insert(h);
        }
        set
    }

    /// Insert a flag at the end. Returns false if it was already present.
    pub fn insert(&mut self, haki: Haki) -> bool {
        if self.contains(haki) {
            return false;
        }
        self.order[usize::from(self.len)] = haki;
        self.len += 1;
        self.bits |= haki.bit();
        true
    }

    /// Membership test.
    #[inline]
    pub fn contains(self, haki: Haki) -> bool {
        self.bits & haki.bit() != 0
    }

    /// Number of flags set.
    pub fn len(self) -> usize {
        usize::from(self.len)
    }

    /// True if no flags are set.
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// True if the sets share at least one flag.
    pub fn intersects(self, other: HakiSet) -> bool {
        self.bits & other.bits != 0
    }

    /// Flags in insertion order.
    pub fn iter(self) -> impl Iterator<Item = Haki> {
        self.order.into_iter().take(self.len())
    }
}

impl Default for HakiSet {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl PartialEq for HakiSet {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl Eq for HakiSet {}

impl Hash for HakiSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

/// Duplicate flag found while decoding a haki list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate haki flag: {0}")]
pub struct DuplicateHaki(pub &'static str);

impl TryFrom<Vec<Haki>> for HakiSet {
    type Error = DuplicateHaki;

    fn try_from(flags: Vec<Haki>) -> Result<Self, Self::Error> {
        let mut set = HakiSet::EMPTY;
        for h in flags {
            if !set.insert(h) {
                return Err(DuplicateHaki(h.letter()));
            }
        }
        Ok(set)
    }
}

impl From<HakiSet> for Vec<Haki> {
    fn from(set: HakiSet) -> Self {
        set.iter().collect()
    }
}

// =============================================================================
// ENTITY
// =============================================================================

/// A guessable character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Stable unique key
    pub id: String,

    /// Display name
    pub name: String,

    /// Alternate names, in order
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Portrait reference
    #[serde(rename = "imageUrl", alias = "imageRef")]
    pub image_ref: String,

    /// Gender
    pub gender: Gender,

    /// Primary affiliation (open vocabulary)
    pub affiliation_primary: String,

    /// Devil Fruit type
    pub devil_fruit_type: DevilFruitType,

    /// Haki flags
    pub haki: HakiSet,

    /// Last known bounty in berries
    pub bounty: Option<u64>,

    /// Height in centimetres
    pub height_cm: Option<u32>,

    /// Place of origin (open vocabulary)
    pub origin: String,

    /// Arc of first appearance
    pub first_arc: String,
}

impl Entity {
    /// Name followed by all aliases.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

// =============================================================================
// TEST FIXTURES
// =============================================================================


// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haki_set_ops() {
        let mut set = HakiSet::EMPTY;
        assert!(set.is_empty());
        assert!(set.insert(Haki::Armament));
        assert!(!set.insert(Haki::Armament));
        assert!(set.contains(Haki::Armament));
        assert!(!set.contains(Haki::Conqueror));
        assert_eq!(set.len(), 1);

        let other = HakiSet::from_flags([Haki::Armament, Haki::Conqueror]);
        assert!(set.intersects(other));
        assert!(!set.intersects(HakiSet::from_flags([Haki::Observation])));
    }

    #[test]
    fn test_haki_set_keeps_listed_order() {
        let set = HakiSet::from_flags([Haki::Conqueror, Haki::Observation, Haki::Conqueror]);
        let flags: Vec<_> = set.iter().collect();
        assert_eq!(flags, vec![Haki::Conqueror, Haki::Observation]);
        assert_eq!(set, HakiSet::from_flags([Haki::Observation, Haki::Conqueror]));
    }

    #[test]
    fn test_haki_set_serde() {
        let set: HakiSet = serde_json::from_str(r#"["C","O"]"#).unwrap();
        assert_eq!(set, HakiSet::from_flags([Haki::Observation, Haki::Conqueror]));
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["C","O"]"#);

        assert!(serde_json::from_str::<HakiSet>(r#"["O","O"]"#).is_err());
        assert!(serde_json::from_str::<HakiSet>(r#"["X"]"#).is_err());
    }

    #[test]
    fn test_vocabulary_parsing() {
        assert_eq!(Gender::parse("Female"), Some(Gender::Female));
        assert_eq!(Gender::parse("female"), None);
        assert_eq!(DevilFruitType::parse("Logia"), Some(DevilFruitType::Logia));
        assert_eq!(DevilFruitType::parse("Mythical"), None);
        assert_eq!(Haki::from_letter("C"), Some(Haki::Conqueror));
        assert_eq!(Haki::from_letter("Z"), None);
    }

    #[test]
    fn test_entity_json_shape() {
        let json = serde_json::to_value(fixtures::nami()).unwrap();
        assert_eq!(json["imageUrl"], "/characters/nami.png");
        assert_eq!(json["affiliationPrimary"], "Straw Hat Pirates");
        assert_eq!(json["devilFruitType"], "None");
        assert_eq!(json["haki"], serde_json::json!([]));
        assert_eq!(json["heightCm"], 170);
        assert_eq!(json["firstArc"], "Orange Town");
    }

    #[test]
    fn test_all_names() {
        let names: Vec<_> = fixtures::luffy().all_names().map(str::to_owned).collect();
        assert_eq!(names, vec!["Monkey D. Luffy", "Luffy", "Straw Hat"]);
    }
}
