//! Point arithmetic for balance adjustments.
//!
//! Amounts and balances travel as decimal strings. Parsing is strict: a value
//! that is not a non-negative integer is an error, never zero.

use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerError, Result};

/// Direction of a point adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Credit points to the balance.
    Add,

    /// Debit points from the balance.
    Delete,
}

impl Operator {
    /// Apply `amount` to `balance` in this direction.
    ///
    /// # Errors
    ///
    /// - `LedgerError::InsufficientBalance` if a debit exceeds `balance`.
    /// - `LedgerError::BalanceOverflow` if a credit overflows `u64`.
    pub fn apply(self, balance: u64, amount: u64) -> Result<u64> {
        match self {
            Self::Add => balance
                .checked_add(amount)
                .ok_or(LedgerError::BalanceOverflow { balance, amount }),
            Self::Delete => {
                if amount > balance {
                    return Err(LedgerError::InsufficientBalance {
                        balance,
                        required: amount,
                    });
                }
                Ok(balance - amount)
            }
        }
    }
}

impl FromStr for Operator {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Add" => Ok(Self::Add),
            "Delete" => Ok(Self::Delete),
            other => Err(LedgerError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("Add"),
            Self::Delete => f.write_str("Delete"),
        }
    }
}

/// Parse an adjustment amount.
///
/// # Errors
///
/// Returns `LedgerError::InvalidAmount` unless `raw` is a non-negative integer.
pub fn parse_amount(raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| LedgerError::InvalidAmount(raw.to_string()))
}

/// Parse a stored or registered balance.
///
/// # Errors
///
/// Returns `LedgerError::InvalidBalance` unless `raw` is a non-negative integer.
pub fn parse_balance(raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| LedgerError::InvalidBalance(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn operator_names_are_case_sensitive() {
        assert_eq!("Add".parse::<Operator>().unwrap(), Operator::Add);
        assert_eq!("Delete".parse::<Operator>().unwrap(), Operator::Delete);

        let err = "add".parse::<Operator>().unwrap_err();
        assert!(matches!(err, LedgerError::UnknownOperator(op) if op == "add"));
        assert!("Subtract".parse::<Operator>().is_err());
        assert!("".parse::<Operator>().is_err());
    }

    #[test]
    fn add_and_delete() {
        assert_eq!(Operator::Add.apply(100, 50).unwrap(), 150);
        assert_eq!(Operator::Delete.apply(150, 150).unwrap(), 0);
        assert_eq!(Operator::Delete.apply(150, 0).unwrap(), 150);
    }

    #[test]
    fn delete_more_than_balance_fails() {
        let err = Operator::Delete.apply(150, 200).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientBalance {
                balance: 150,
                required: 200
            }
        ));
    }

    #[test]
    fn add_overflow_fails() {
        let err = Operator::Add.apply(u64::MAX, 1).unwrap_err();
        assert!(matches!(err, LedgerError::BalanceOverflow { .. }));
    }

    #[test]
    fn parsing_is_strict() {
        assert_eq!(parse_amount("50").unwrap(), 50);
        assert!(matches!(parse_amount("-5"), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(parse_amount("ten"), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(parse_amount(""), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(parse_amount(" 5"), Err(LedgerError::InvalidAmount(_))));

        assert_eq!(parse_balance("0").unwrap(), 0);
        assert!(matches!(parse_balance("1.5"), Err(LedgerError::InvalidBalance(_))));
    }

    proptest! {
        /// A debit either leaves a non-negative remainder or is refused
        /// with the balance untouched.
        #[test]
        fn delete_never_goes_negative(balance in 0u64..1_000_000, amount in 0u64..2_000_000) {
            match Operator::Delete.apply(balance, amount) {
                Ok(after) => prop_assert_eq!(after, balance - amount),
                Err(LedgerError::InsufficientBalance { balance: b, required }) => {
                    prop_assert_eq!(b, balance);
                    prop_assert_eq!(required, amount);
                    prop_assert!(amount > balance);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }
    }
}
