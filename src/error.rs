use thiserror::Error;

use crate::assignment::Field;

/// Why a single assignment entry was rejected. None of these end the session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Unknown category '{0}': must be 'Formative' or 'Summative'")]
    UnknownCategory(String),

    #[error("Invalid {field} '{input}': please enter a number")]
    NotANumber { field: Field, input: String },

    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: Field,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Weight {weight} exceeds remaining capacity: must be between 0 and {remaining}")]
    CapacityExceeded { weight: f64, remaining: f64 },
}

impl EntryError {
    /// The field the rejection is about.
    pub fn field(&self) -> Field {
        match self {
            EntryError::EmptyName => Field::Name,
            EntryError::UnknownCategory(_) => Field::Category,
            EntryError::NotANumber { field, .. } | EntryError::OutOfRange { field, .. } => *field,
            EntryError::CapacityExceeded { .. } => Field::Weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("pass threshold must be between 0 and 100 (got {0})")]
    Threshold(f64),

    #[error("gpa scale must be a positive number (got {0})")]
    Scale(f64),
}
