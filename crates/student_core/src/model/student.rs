//! Student domain model.
//!
//! # Responsibility
//! - Define the single record type managed by the registry.
//! - Provide boundary validation for name and email shape.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one on first save.
//! - Once assigned, `id` never changes for the lifetime of the record.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
});

/// Store-assigned identifier of a persisted student.
pub type StudentId = i64;

/// Closed gender enumeration, serialized in upper case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Returns the stable storage/wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Other => "OTHER",
        }
    }

    /// Parses a storage/wire label. Matching is exact.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "MALE" => Some(Self::Male),
            "FEMALE" => Some(Self::Female),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boundary validation failures for student payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    /// Name is empty after trim.
    BlankName,
    /// Email does not look like `local@domain.tld`.
    InvalidEmail(String),
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "name must not be blank"),
            Self::InvalidEmail(email) => write!(f, "email `{email}` is not a valid address"),
        }
    }
}

impl Error for StudentValidationError {}

/// A student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// `None` before the first save.
    #[serde(default)]
    pub id: Option<StudentId>,
    pub name: String,
    pub email: String,
    pub gender: Gender,
}

impl Student {
    /// Creates an unsaved student with no identifier.
    pub fn new(name: impl Into<String>, email: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            gender,
        }
    }

    /// Returns a copy of this record carrying `id`.
    pub fn with_id(mut self, id: StudentId) -> Self {
        self.id = Some(id);
        self
    }

    /// Trims surrounding whitespace from `name` and `email`.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self
    }

    /// Checks the boundary shape of this record.
    ///
    /// Uniqueness is not checked here; that is the service's job.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        if self.name.trim().is_empty() {
            return Err(StudentValidationError::BlankName);
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(StudentValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }

    /// Returns whether the store has assigned an identifier.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
