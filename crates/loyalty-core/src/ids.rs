//! Identifier types for the loyalty ledger.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An account identifier.
///
/// The `ffid` is opaque: any non-empty string is accepted. It doubles as the
/// key of the account blob and of the account's table row.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ffid(String);

impl Ffid {
    /// Create a new `Ffid`.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if `value` is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(value))
    }

    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ffid {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for Ffid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ffid({})", self.0)
    }
}

impl fmt::Display for Ffid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ffid {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Ffid> for String {
    fn from(id: Ffid) -> Self {
        id.0
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The identifier was empty.
    #[error("ffid must not be empty")]
    Empty,
}
