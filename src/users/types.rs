use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A row of the users table as exchanged with the API.
///
/// `id` is absent for records that have not been saved yet and is never sent
/// in that case.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub age: Age,
}

/// Age as stored server-side (a number) or as typed into a form (text).
///
/// Whole JSON floats such as `30.0` decode to [`Age::Years`]; any other
/// non-integer number is kept as text so validation can still reject it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Age {
    Years(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AgeWire {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<AgeWire> for Age {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn from(wire: AgeWire) -> Self {
        match wire {
            AgeWire::Integer(years) => Self::Years(years),
            AgeWire::Float(value)
                if value.fract() == 0.0 && value.abs() < i64::MAX as f64 =>
            {
                Self::Years(value as i64)
            }
            AgeWire::Float(value) => Self::Text(value.to_string()),
            AgeWire::Text(text) => Self::Text(text),
        }
    }
}

impl<'de> Deserialize<'de> for Age {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        AgeWire::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for Age {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years(years) => write!(formatter, "{years}"),
            Self::Text(text) => formatter.write_str(text),
        }
    }
}

/// In-progress form values, not yet persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub age: String,
}

impl Draft {
    #[must_use]
    pub fn new(name: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: age.into(),
        }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.age.is_empty()
    }

    /// Converts a validated draft into a record carrying `id`.
    ///
    /// Returns `None` if the age is not a whole number in range; callers are
    /// expected to run `validate_form` first.
    #[must_use]
    pub fn to_user(&self, id: Option<i64>) -> Option<User> {
        let years = super::validate::parse_age(&self.age)?;

        Some(User {
            id,
            name: self.name.clone(),
            age: Age::Years(years),
        })
    }
}

impl From<&User> for Draft {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            age: user.age.to_string(),
        }
    }
}

/// Which operation the front-end is currently presenting. The absence of a
/// dialog is modelled as `Option::None` on the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogMode {
    Add,
    Update,
    Delete,
}
