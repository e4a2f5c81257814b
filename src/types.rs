//! Core types for the student records store.

use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Date format used for persisted and entered birth dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date format used for display (`dd/mm/yyyy`).
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Grade point average on a 0.0 to 4.0 scale.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Gpa(f64);

impl Gpa {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 4.0;

    /// Create a GPA, rejecting non-finite or out-of-range values.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::InvalidGpa(value.to_string()));
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::GpaOutOfRange(value));
        }
        Ok(Gpa(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for Gpa {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| ValidationError::InvalidGpa(trimmed.to_string()))?;
        Gpa::new(value)
    }
}

impl fmt::Debug for Gpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gpa({})", self.0)
    }
}

impl fmt::Display for Gpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Gpa {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

/// Persisted GPA values may be numbers or numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawGpa {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Gpa {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match RawGpa::deserialize(deserializer)? {
            RawGpa::Number(value) => Gpa::new(value),
            RawGpa::Text(text) => text.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// Parse a `YYYY-MM-DD` birth date.
pub fn parse_birth_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

/// A single student record.
///
/// Serialized with the camelCase field names of the persisted blob.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Unique identifier, immutable once stored.
    pub student_id: String,

    pub full_name: String,

    /// Birth date, persisted as `YYYY-MM-DD`.
    pub birth_date: NaiveDate,

    /// Class label (e.g. "CNTT-K15").
    pub class_name: String,

    pub gpa: Gpa,
}

impl Student {
    pub fn new(
        student_id: impl Into<String>,
        full_name: impl Into<String>,
        birth_date: NaiveDate,
        class_name: impl Into<String>,
        gpa: Gpa,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            full_name: full_name.into(),
            birth_date,
            class_name: class_name.into(),
            gpa,
        }
    }

    /// Replace every mutable field. The identifier is left untouched.
    pub(crate) fn apply(&mut self, update: StudentUpdate) {
        self.full_name = update.full_name;
        self.birth_date = update.birth_date;
        self.class_name = update.class_name;
        self.gpa = update.gpa;
    }

    /// Birth date as `dd/mm/yyyy`.
    pub fn formatted_birth_date(&self) -> String {
        self.birth_date.format(DISPLAY_DATE_FORMAT).to_string()
    }

    /// GPA with two decimals.
    pub fn formatted_gpa(&self) -> String {
        format!("{:.2}", self.gpa.value())
    }

    /// Case-insensitive substring match against name or identifier.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.full_name.to_lowercase().contains(needle)
            || self.student_id.to_lowercase().contains(needle)
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Birth date: {}, Class: {}, GPA: {}",
            self.student_id, self.full_name, self.birth_date, self.class_name, self.gpa
        )
    }
}

/// The mutable fields of a student, used by `RecordStore::update`.
#[derive(Clone, Debug, PartialEq)]
pub struct StudentUpdate {
    pub full_name: String,
    pub birth_date: NaiveDate,
    pub class_name: String,
    pub gpa: Gpa,
}

impl From<&Student> for StudentUpdate {
    fn from(student: &Student) -> Self {
        Self {
            full_name: student.full_name.clone(),
            birth_date: student.birth_date,
            class_name: student.class_name.clone(),
            gpa: student.gpa,
        }
    }
}

/// Field a listing can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Lexicographic by identifier.
    StudentId,
    /// Numeric by GPA.
    Gpa,
}

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Asc
    }
}
