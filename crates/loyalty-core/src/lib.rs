//! Core types and utilities for the loyalty ledger.
//!
//! This crate provides the foundational types shared by the storage layer,
//! the ledger, and the HTTP host:
//!
//! - **Identifiers**: `Ffid`
//! - **Accounts**: `Account`, the 13-field user registration record
//! - **Points**: `Operator`, amount and balance parsing
//! - **Arguments**: `Arity` and positional argument checks
//!
//! # Point Unit
//!
//! Balances are whole, non-negative points held as `u64`. Both storage
//! representations keep them as decimal strings (`"150"`), so every read
//! parses and every write formats.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod args;
pub mod error;
pub mod ids;
pub mod points;

pub use account::{Account, FIELD_COUNT};
pub use args::{check_arity, Arity};
pub use error::{LedgerError, Result};
pub use ids::{Ffid, IdError};
pub use points::{parse_amount, parse_balance, Operator};
