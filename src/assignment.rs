use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::EntryError;

/// Lowest and highest grade accepted for a single assignment.
pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 100.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
pub enum Category {
    Formative,
    Summative,
}

impl FromStr for Category {
    type Err = EntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "formative" | "f" => Ok(Category::Formative),
            "summative" | "s" => Ok(Category::Summative),
            _ => Err(EntryError::UnknownCategory(s.trim().to_string())),
        }
    }
}

/// The four inputs that make up an assignment, in the order they are asked for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum Field {
    Name,
    Category,
    Weight,
    Grade,
}

/// A recorded assignment. Only constructed by the session after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    pub category: Category,
    pub weight: f64,
    pub grade: f64,
}

impl Assignment {
    /// Weighted points this assignment adds to its category total.
    pub fn contribution(&self) -> f64 {
        self.grade * self.weight / 100.0
    }
}

pub fn parse_name(raw: &str) -> Result<String, EntryError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(EntryError::EmptyName);
    }
    Ok(name.to_string())
}

fn parse_number(field: Field, raw: &str) -> Result<f64, EntryError> {
    // f64::from_str accepts "nan" and "inf", neither of which is a usable mark
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(EntryError::NotANumber {
            field,
            input: raw.trim().to_string(),
        }),
    }
}

/// Parse a weight and check it against the capacity left in the session.
pub fn parse_weight(raw: &str, remaining: f64) -> Result<f64, EntryError> {
    let weight = parse_number(Field::Weight, raw)?;
    check_weight(weight, remaining)?;
    Ok(weight)
}

pub fn parse_grade(raw: &str) -> Result<f64, EntryError> {
    let grade = parse_number(Field::Grade, raw)?;
    check_grade(grade)?;
    Ok(grade)
}

pub(crate) fn check_weight(weight: f64, remaining: f64) -> Result<(), EntryError> {
    if !weight.is_finite() {
        return Err(EntryError::NotANumber {
            field: Field::Weight,
            input: weight.to_string(),
        });
    }
    if weight < 0.0 {
        return Err(EntryError::OutOfRange {
            field: Field::Weight,
            value: weight,
            min: 0.0,
            max: remaining,
        });
    }
    if weight > remaining + crate::session::WEIGHT_EPSILON {
        return Err(EntryError::CapacityExceeded { weight, remaining });
    }
    Ok(())
}

pub(crate) fn check_grade(grade: f64) -> Result<(), EntryError> {
    if !grade.is_finite() {
        return Err(EntryError::NotANumber {
            field: Field::Grade,
            input: grade.to_string(),
        });
    }
    if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
        return Err(EntryError::OutOfRange {
            field: Field::Grade,
            value: grade,
            min: MIN_GRADE,
            max: MAX_GRADE,
        });
    }
    Ok(())
}
