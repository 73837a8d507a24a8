//! Positional argument checks.
//!
//! Every operation receives an ordered list of strings. The count is checked
//! up front, before any field is read or any store is touched.

use std::fmt;

use crate::error::{LedgerError, Result};

/// Accepted number of positional arguments for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exactly(usize),

    /// This many arguments or more; extras are ignored.
    AtLeast(usize),
}

impl Arity {
    /// Whether `got` arguments satisfy this arity.
    #[must_use]
    pub const fn accepts(self, got: usize) -> bool {
        match self {
            Self::Exactly(n) => got == n,
            Self::AtLeast(n) => got >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Check that `args` satisfies `arity` for `function`.
///
/// # Errors
///
/// Returns `LedgerError::InvalidArgumentCount` if the count does not match.
pub fn check_arity(function: &str, args: &[String], arity: Arity) -> Result<()> {
    if arity.accepts(args.len()) {
        Ok(())
    } else {
        Err(LedgerError::InvalidArgumentCount {
            function: function.to_string(),
            expected: arity,
            got: args.len(),
        })
    }
}
