//! Roster Loading
//!
//! Decodes the character data file into validated [`Entity`] records.
//! Invalid records are dropped (lenient) or reject the whole file
//! (strict); either way nothing unvalidated reaches selection or
//! evaluation.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::game::arc::arc_index;
use crate::game::entity::Entity;

/// Fields every record must carry, even when the value is `null`.
pub const REQUIRED_FIELDS: [&str; 12] = [
    "id",
    "name",
    "aliases",
    "imageUrl",
    "gender",
    "affiliationPrimary",
    "devilFruitType",
    "haki",
    "bounty",
    "heightCm",
    "origin",
    "firstArc",
];

/// Alternate keys that satisfy a required field, as `(field, alternate)`.
pub const FIELD_ALTERNATES: [(&str, &str); 1] = [("imageUrl", "imageRef")];

/// Placeholder arc for characters whose debut is not yet classified.
pub const UNKNOWN_ARC: &str = "?";

/// A record that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// Position in the source array
    pub index: usize,
    /// Record id, when one could be read
    pub id: Option<String>,
    /// Everything wrong with the record
    pub reasons: Vec<String>,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "record {} ({}): {}", self.index, id, self.reasons.join("; ")),
            None => write!(f, "record {}: {}", self.index, self.reasons.join("; ")),
        }
    }
}

/// Roster loading errors.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// File could not be read.
    #[error("failed to read roster: {0}")]
    Io(#[from] std::io::Error),

    /// Not valid JSON.
    #[error("malformed roster JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Top level is not an array.
    #[error("roster must be a JSON array")]
    NotAnArray,

    /// Nothing survived validation.
    #[error("roster has no valid records")]
    Empty,

    /// Two records share an id.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// Strict load found invalid records.
    #[error("{} invalid record(s)", .0.len())]
    Invalid(Vec<RecordError>),
}

/// Validated, ordered set of entities. Order is significant for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    entities: Vec<Entity>,
}

impl Roster {
    /// Build from already-typed entities, checking the record rules.
    pub fn new(entities: Vec<Entity>) -> Result<Self, RosterError> {
        let mut bad = Vec::new();
        for (index, entity) in entities.iter().enumerate() {
            let reasons = entity_problems(entity);
            if !reasons.is_empty() {
                bad.push(RecordError { index, id: Some(entity.id.clone()), reasons });
            }
        }
        if !bad.is_empty() {
            return Err(RosterError::Invalid(bad));
        }
        Self::finish(entities)
    }

    /// Decode a JSON array, dropping invalid records.
    ///
    /// Returns the roster plus one [`RecordError`] per dropped record.
    pub fn from_json(json: &str) -> Result<(Self, Vec<RecordError>), RosterError> {
        let records = match serde_json::from_str::<Value>(json)? {
            Value::Array(records) => records,
            _ => return Err(RosterError::NotAnArray),
        };

        let mut entities = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            match decode_record(index, record) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!("Dropping {}", e);
                    rejected.push(e);
                }
            }
        }

        let roster = Self::finish(entities)?;
        debug!("Loaded {} entities ({} dropped)", roster.len(), rejected.len());
        Ok((roster, rejected))
    }

    /// Decode a JSON array, failing if any record is invalid.
    pub fn from_json_strict(json: &str) -> Result<Self, RosterError> {
        let (roster, rejected) = Self::from_json(json)?;
        if rejected.is_empty() {
            Ok(roster)
        } else {
            Err(RosterError::Invalid(rejected))
        }
    }

    /// Read and decode a roster file, dropping invalid records.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, Vec<RecordError>), RosterError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn finish(entities: Vec<Entity>) -> Result<Self, RosterError> {
        if entities.is_empty() {
            return Err(RosterError::Empty);
        }
        let mut seen = BTreeSet::new();
        for entity in &entities {
            if !seen.insert(entity.id.as_str()) {
                return Err(RosterError::DuplicateId(entity.id.clone()));
            }
        }
        Ok(Self { entities })
    }

    /// Entities in roster order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Look up an entity by id.
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Always false for a constructed roster.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate in roster order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }
}

impl AsRef<[Entity]> for Roster {
    fn as_ref(&self) -> &[Entity] {
        &self.entities
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

fn decode_record(index: usize, record: Value) -> Result<Entity, RecordError> {
    let Value::Object(fields) = &record else {
        return Err(RecordError { index, id: None, reasons: vec!["not an object".into()] });
    };

    let id = fields.get("id").and_then(Value::as_str).map(str::to_owned);
    let mut reasons: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|f| !has_field(fields, f))
        .map(|f| format!("missing field `{f}`"))
        .collect();

    if reasons.is_empty() {
        match serde_json::from_value::<Entity>(record) {
            Ok(entity) => {
                reasons = entity_problems(&entity);
                if reasons.is_empty() {
                    return Ok(entity);
                }
            }
            Err(e) => reasons.push(e.to_string()),
        }
    }

    Err(RecordError { index, id, reasons })
}

fn has_field(fields: &serde_json::Map<String, Value>, field: &str) -> bool {
    fields.contains_key(field)
        || FIELD_ALTERNATES
            .iter()
            .any(|(name, alt)| *name == field && fields.contains_key(*alt))
}

/// Rules serde cannot express on its own.
fn entity_problems(entity: &Entity) -> Vec<String> {
    let mut reasons = Vec::new();
    if entity.id.trim().is_empty() {
        reasons.push("empty id".to_owned());
    }
    if entity.name.trim().is_empty() {
        reasons.push("empty name".to_owned());
    }
    if entity.image_ref.trim().is_empty() {
        reasons.push("empty imageUrl".to_owned());
    }
    if entity.first_arc != UNKNOWN_ARC && arc_index(&entity.first_arc).is_none() {
        reasons.push(format!("unrecognized firstArc `{}`", entity.first_arc));
    }
    reasons
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::fixtures;

    fn record(id: &str) -> Value {
        let mut entity = fixtures::nami();
        entity.id = id.into();
        serde_json::to_value(entity).unwrap()
    }

    fn json_of(records: Vec<Value>) -> String {
        Value::Array(records).to_string()
    }

    #[test]
    fn test_loads_valid_roster() {
        let json = serde_json::to_string(&fixtures::roster()).unwrap();
        let (roster, rejected) = Roster::from_json(&json).unwrap();
        assert!(rejected.is_empty());
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.entities()[0].id, "luffy");
        assert_eq!(roster.get("zoro").map(|e| e.name.as_str()), Some("Roronoa Zoro"));
        assert!(roster.get("usopp").is_none());
    }

    #[test]
    fn test_drops_invalid_records() {
        let mut bad_gender = record("bad-gender");
        bad_gender["gender"] = "Robot".into();
        let mut bad_arc = record("bad-arc");
        bad_arc["firstArc"] = "Film Red".into();
        let mut empty_name = record("empty-name");
        empty_name["name"] = "".into();
        let mut dup_haki = record("dup-haki");
        dup_haki["haki"] = serde_json::json!(["O", "O"]);

        let json = json_of(vec![record("ok"), bad_gender, bad_arc, empty_name, dup_haki]);
        let (roster, rejected) = Roster::from_json(&json).unwrap();

        assert_eq!(roster.len(), 1);
        let ids: Vec<_> = rejected.iter().map(|r| r.id.clone().unwrap()).collect();
        assert_eq!(ids, vec!["bad-gender", "bad-arc", "empty-name", "dup-haki"]);
        assert_eq!(rejected[1].index, 2);
        assert!(rejected[1].reasons[0].contains("Film Red"));
    }

    #[test]
    fn test_unknown_arc_placeholder_is_accepted() {
        let mut rec = record("mystery");
        rec["firstArc"] = UNKNOWN_ARC.into();
        let (roster, rejected) = Roster::from_json(&json_of(vec![rec])).unwrap();
        assert!(rejected.is_empty());
        assert_eq!(roster.entities()[0].first_arc, "?");
    }

    #[test]
    fn test_null_numbers_must_be_explicit() {
        let mut explicit = record("explicit");
        explicit["bounty"] = Value::Null;
        let mut missing = record("missing");
        missing.as_object_mut().unwrap().remove("heightCm");

        let (roster, rejected) = Roster::from_json(&json_of(vec![explicit, missing])).unwrap();
        assert_eq!(roster.entities()[0].bounty, None);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].reasons, vec!["missing field `heightCm`"]);
    }

    #[test]
    fn test_image_ref_key_is_accepted() {
        let mut renamed = record("renamed");
        let image = renamed.as_object_mut().unwrap().remove("imageUrl").unwrap();
        renamed["imageRef"] = image;
        let mut neither = record("neither");
        neither.as_object_mut().unwrap().remove("imageUrl");

        let (roster, rejected) = Roster::from_json(&json_of(vec![renamed, neither])).unwrap();
        assert_eq!(roster.entities()[0].id, "renamed");
        assert_eq!(roster.entities()[0].image_ref, "/characters/nami.png");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].reasons, vec!["missing field `imageUrl`"]);
    }

    #[test]
    fn test_non_object_record() {
        let (_, rejected) = Roster::from_json(&json_of(vec![record("ok"), Value::from(5)])).unwrap();
        assert_eq!(rejected[0].id, None);
        assert_eq!(rejected[0].to_string(), "record 1: not an object");
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(Roster::from_json("{oops"), Err(RosterError::Json(_))));
        assert!(matches!(Roster::from_json(r#"{"id":"x"}"#), Err(RosterError::NotAnArray)));
        assert!(matches!(Roster::from_json("[]"), Err(RosterError::Empty)));

        let json = json_of(vec![record("same"), record("same")]);
        assert!(matches!(Roster::from_json(&json), Err(RosterError::DuplicateId(id)) if id == "same"));
    }

    #[test]
    fn test_strict_load() {
        let mut bad = record("bad");
        bad["devilFruitType"] = "Mythical".into();
        let json = json_of(vec![record("ok"), bad]);
        match Roster::from_json_strict(&json) {
            Err(RosterError::Invalid(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert!(Roster::from_json_strict(&json_of(vec![record("ok")])).is_ok());
    }

    #[test]
    fn test_new_checks_rules() {
        assert!(Roster::new(fixtures::roster()).is_ok());
        let mut bad = fixtures::zoro();
        bad.image_ref.clear();
        assert!(matches!(Roster::new(vec![bad]), Err(RosterError::Invalid(_))));
        assert!(matches!(Roster::new(Vec::new()), Err(RosterError::Empty)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("characters.json");
        std::fs::write(&path, serde_json::to_string(&fixtures::roster()).unwrap()).unwrap();
        let (roster, _) = Roster::load(&path).unwrap();
        assert_eq!(roster.len(), 3);
        assert!(matches!(Roster::load(dir.path().join("nope.json")), Err(RosterError::Io(_))));
    }
}
