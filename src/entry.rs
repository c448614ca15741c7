// 📜 Entry - one row of the results archive
// Source data is loosely typed: every field tolerates the wrong JSON type
// and reads it as missing instead of failing the whole snapshot.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::places::is_finals_place;

/// Competition level as found in the data file: a number, or text that
/// usually contains one ("Niveau 11 - Supérieur")
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LevelValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for LevelValue {
    fn from(n: i64) -> Self {
        LevelValue::Int(n)
    }
}

impl From<&str> for LevelValue {
    fn from(s: &str) -> Self {
        LevelValue::Text(s.to_string())
    }
}

// Accepted keys per field: the French key written by the converter first,
// then the English spellings
const YEAR_KEYS: &[&str] = &["annee", "year"];
const PLACE_KEYS: &[&str] = &["ville", "place"];
const CANDIDATE_KEYS: &[&str] = &["candidat", "candidateName", "candidate"];
const LEVEL_KEYS: &[&str] = &["niveau", "level"];
const DISTINCTION_KEYS: &[&str] = &["distinction", "distinctionText"];
const TEACHER_KEYS: &[&str] = &["professeur", "teacherName", "teacher"];
const RANK_KEYS: &[&str] = &["rang", "rank"];
const FINAL_KEYS: &[&str] = &["finale", "finalFlag"];

/// One result record
///
/// Serialized with the French keys the converter writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entry {
    #[serde(rename = "annee", skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,

    #[serde(rename = "ville", skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,

    #[serde(rename = "candidat", skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,

    #[serde(rename = "niveau", skip_serializing_if = "Option::is_none")]
    pub level: Option<LevelValue>,

    #[serde(rename = "distinction", skip_serializing_if = "Option::is_none")]
    pub distinction_text: Option<String>,

    #[serde(rename = "professeur", skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,

    /// Rank column of the spreadsheet, kept for display only
    #[serde(rename = "rang", skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,

    #[serde(rename = "finale")]
    pub final_flag: bool,

    /// Position in the loaded collection, stamped by the loader
    #[serde(skip)]
    pub original_index: usize,
}

impl Entry {
    /// Build an entry from one element of the `entries` array
    ///
    /// Fields are read one by one, so a bad field only loses itself.
    /// Anything that is not an object becomes an empty entry, which matches
    /// no query but still occupies its index.
    pub fn from_value(value: Value, original_index: usize) -> Entry {
        let row = match value {
            Value::Object(row) => row,
            other => {
                warn!(index = original_index, kind = json_kind(&other), "entry is not an object");
                return Entry {
                    original_index,
                    ..Entry::default()
                };
            }
        };

        Entry {
            year: field(&row, YEAR_KEYS).and_then(read_int),
            place: field(&row, PLACE_KEYS).and_then(read_text),
            candidate_name: field(&row, CANDIDATE_KEYS).and_then(read_text),
            level: field(&row, LEVEL_KEYS).and_then(read_level),
            distinction_text: field(&row, DISTINCTION_KEYS).and_then(read_text),
            teacher_name: field(&row, TEACHER_KEYS).and_then(read_text),
            rank: field(&row, RANK_KEYS).and_then(read_int),
            final_flag: field(&row, FINAL_KEYS).map(read_flag).unwrap_or(false),
            original_index,
        }
    }

    /// True when the entry belongs to the national finals group
    ///
    /// The explicit flag and the place spelling are independent signals;
    /// either one is enough.
    pub fn is_finals(&self) -> bool {
        self.final_flag || self.place.as_deref().map(is_finals_place).unwrap_or(false)
    }

    pub fn place_text(&self) -> &str {
        self.place.as_deref().unwrap_or("")
    }

    pub fn candidate(&self) -> &str {
        self.candidate_name.as_deref().unwrap_or("")
    }

    pub fn teacher(&self) -> &str {
        self.teacher_name.as_deref().unwrap_or("")
    }

    pub fn distinction(&self) -> &str {
        self.distinction_text.as_deref().unwrap_or("")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// LENIENT FIELD READERS
// ============================================================================

/// First key of `keys` present in the row
fn field<'a>(row: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| row.get(*key))
}

fn read_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        _ => None,
    }
}

fn read_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn read_level(value: &Value) -> Option<LevelValue> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(LevelValue::Int(i)),
            None => n.as_f64().map(LevelValue::Float),
        },
        Value::String(s) => Some(LevelValue::Text(s.clone())),
        _ => None,
    }
}

/// Truthiness of the finals flag: `true`, non-zero numbers, non-empty text
fn read_flag(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
