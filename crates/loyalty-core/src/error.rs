//! Error types for the loyalty ledger.

use crate::args::Arity;
use crate::ids::IdError;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur in ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Too few (or too many) positional arguments for an operation.
    #[error("incorrect number of arguments for {function}: expected {expected}, got {got}")]
    InvalidArgumentCount {
        /// The operation that was invoked.
        function: String,
        /// The accepted argument count.
        expected: Arity,
        /// The number of arguments supplied.
        got: usize,
    },

    /// Invalid account identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Record or row not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Table insert collided with an existing key.
    #[error("duplicate key: row with key {key} already exists")]
    DuplicateKey {
        /// The colliding key.
        key: String,
    },

    /// Reading from a backing store failed.
    #[error("store read failed: {0}")]
    StoreRead(String),

    /// Writing to a backing store failed.
    #[error("store write failed: {0}")]
    StoreWrite(String),

    /// Debit larger than the current balance.
    #[error("points not sufficient to spend: balance={balance}, required={required}")]
    InsufficientBalance {
        /// Current balance in points.
        balance: u64,
        /// Requested debit in points.
        required: u64,
    },

    /// Credit would overflow the balance.
    #[error("balance overflow: balance={balance}, amount={amount}")]
    BalanceOverflow {
        /// Current balance in points.
        balance: u64,
        /// Requested credit in points.
        amount: u64,
    },

    /// Unrecognized dispatch name.
    #[error("received unknown function {entry}: {function}")]
    UnknownOperation {
        /// Entry point the name was sent to (`invoke` or `query`).
        entry: &'static str,
        /// The unrecognized function name.
        function: String,
    },

    /// Point operator other than `Add` or `Delete`.
    #[error("unknown operator {0:?}: expected \"Add\" or \"Delete\"")]
    UnknownOperator(String),

    /// Amount argument is not a non-negative integer.
    #[error("invalid amount {0:?}: expected a non-negative integer")]
    InvalidAmount(String),

    /// Stored or supplied balance is not a non-negative integer.
    #[error("invalid balance {0:?}: expected a non-negative integer")]
    InvalidBalance(String),

    /// Stored bytes do not have the expected record shape.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Record could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    /// Stable machine-readable code for this error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgumentCount { .. } => "invalid_argument_count",
            Self::InvalidId(_) => "invalid_id",
            Self::NotFound(_) => "not_found",
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::StoreRead(_) => "store_read_error",
            Self::StoreWrite(_) => "store_write_error",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::BalanceOverflow { .. } => "balance_overflow",
            Self::UnknownOperation { .. } => "unknown_operation",
            Self::UnknownOperator(_) => "unknown_operator",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::InvalidBalance(_) => "invalid_balance",
            Self::Deserialization(_) => "deserialization_error",
            Self::Serialization(_) => "serialization_error",
        }
    }
}
