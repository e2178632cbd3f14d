//! Field-level validation for the user form. Everything here is pure: the same
//! input always yields the same errors, in field order `name`, `age`.

use super::types::Age;
use std::fmt;
use thiserror::Error;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;
const AGE_MIN: f64 = 0.0;
const AGE_MAX: f64 = 150.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Age,
}

impl fmt::Display for Field {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => formatter.write_str("name"),
            Self::Age => formatter.write_str("age"),
        }
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum NameViolation {
    #[error("Name is required")]
    Required,
    #[error("Name must be at least 2 characters")]
    TooShort,
    #[error("Name must be less than 50 characters")]
    TooLong,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AgeViolation {
    #[error("Age is required")]
    Required,
    #[error("Age must be a number")]
    NotANumber,
    #[error("Age must be between 0 and 150")]
    OutOfRange,
    #[error("Age must be an integer")]
    NotInteger,
}

/// One failing rule for one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.field, self.message)
    }
}

/// Age as handed to the validator: raw form text or an already numeric value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AgeInput<'a> {
    Text(&'a str),
    Number(f64),
}

impl<'a> From<&'a str> for AgeInput<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for AgeInput<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for AgeInput<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for AgeInput<'_> {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl<'a> From<&'a Age> for AgeInput<'a> {
    fn from(age: &'a Age) -> Self {
        match age {
            Age::Years(years) => Self::from(*years),
            Age::Text(text) => Self::Text(text),
        }
    }
}

/// Checks a name: required, then 2 to 50 characters (untrimmed length).
#[must_use]
pub fn validate_name(name: &str) -> Option<NameViolation> {
    if name.trim().is_empty() {
        return Some(NameViolation::Required);
    }

    let length = name.chars().count();
    if length < NAME_MIN_CHARS {
        Some(NameViolation::TooShort)
    } else if length > NAME_MAX_CHARS {
        Some(NameViolation::TooLong)
    } else {
        None
    }
}

/// Parses surrounding-whitespace-tolerant plain decimal text: an optional
/// `-`, digits and an optional fractional part. Signs like `+`, exponents and
/// `inf`/`NaN` are not accepted.
fn parse_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let digits_only = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
    if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) {
        return None;
    }
    if unsigned.ends_with('.') {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

/// Checks an age: required, numeric, within [0, 150], integral, in that order.
///
/// Only empty text and `NaN` count as missing; whitespace-only text is not a number.
#[must_use]
pub fn validate_age<'a>(age: impl Into<AgeInput<'a>>) -> Option<AgeViolation> {
    let value = match age.into() {
        AgeInput::Text("") => return Some(AgeViolation::Required),
        AgeInput::Text(text) => match parse_decimal(text) {
            Some(value) => value,
            None => return Some(AgeViolation::NotANumber),
        },
        AgeInput::Number(value) if value.is_nan() => return Some(AgeViolation::Required),
        AgeInput::Number(value) => value,
    };

    if !(AGE_MIN..=AGE_MAX).contains(&value) {
        Some(AgeViolation::OutOfRange)
    } else if value.fract() != 0.0 {
        Some(AgeViolation::NotInteger)
    } else {
        None
    }
}

/// Runs both field checks and collects the failures, `name` first.
#[must_use]
pub fn validate_form<'a>(name: &str, age: impl Into<AgeInput<'a>>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(violation) = validate_name(name) {
        errors.push(ValidationError {
            field: Field::Name,
            message: violation.to_string(),
        });
    }

    if let Some(violation) = validate_age(age) {
        errors.push(ValidationError {
            field: Field::Age,
            message: violation.to_string(),
        });
    }

    errors
}

/// Parses form text into whole years, or `None` if it would fail validation.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_age(text: &str) -> Option<i64> {
    if validate_age(text).is_some() {
        return None;
    }
    // In range and integral, so the cast is exact.
    parse_decimal(text).map(|value| value as i64)
}
