//! Function-name dispatch.
//!
//! Callers address the ledger by function name with positional string
//! arguments. Names are matched exactly, including case.

use std::fmt;
use std::str::FromStr;

use loyalty_core::{LedgerError, Result};

use crate::ledger::AccountLedger;

/// Functions that may mutate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvokeFunction {
    /// Ensure `UserTable` exists.
    Init,
    /// Register an account on the blob path.
    RegisterUser,
    /// Register an account on the table path.
    RegisterUserDetails,
    /// Credit or debit a blob balance.
    AddDeletePoints,
}

impl InvokeFunction {
    /// Every invoke function.
    pub const ALL: [Self; 4] = [
        Self::Init,
        Self::RegisterUser,
        Self::RegisterUserDetails,
        Self::AddDeletePoints,
    ];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::RegisterUser => "RegisterUser",
            Self::RegisterUserDetails => "RegisterUserDetails",
            Self::AddDeletePoints => "AddDeletePoints",
        }
    }
}

impl FromStr for InvokeFunction {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| LedgerError::UnknownOperation {
                entry: "invoke",
                function: s.to_string(),
            })
    }
}

impl fmt::Display for InvokeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFunction {
    /// Raw blob bytes.
    GetUser,
    /// Blob balance string.
    GetPoints,
    /// Table row as account JSON.
    GetUserDetails,
    /// Number of table rows.
    GetUserCount,
}

impl QueryFunction {
    /// Every query function.
    pub const ALL: [Self; 4] = [
        Self::GetUser,
        Self::GetPoints,
        Self::GetUserDetails,
        Self::GetUserCount,
    ];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetUser => "getUser",
            Self::GetPoints => "getPoints",
            Self::GetUserDetails => "GetUserDetails",
            Self::GetUserCount => "GetUserCount",
        }
    }
}

impl FromStr for QueryFunction {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| LedgerError::UnknownOperation {
                entry: "query",
                function: s.to_string(),
            })
    }
}

impl fmt::Display for QueryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AccountLedger {
    /// Run a mutating function by name.
    ///
    /// Registrations and `Init` return empty bytes; `AddDeletePoints`
    /// returns the new balance as a decimal string.
    ///
    /// # Errors
    ///
    /// `LedgerError::UnknownOperation` for an unrecognized name, otherwise
    /// whatever the named operation returns.
    pub fn invoke(&self, function: &str, args: &[String]) -> Result<Vec<u8>> {
        let function: InvokeFunction = function.parse()?;
        tracing::debug!(%function, args = args.len(), "Invoke");

        match function {
            InvokeFunction::Init => {
                self.init()?;
                Ok(Vec::new())
            }
            InvokeFunction::RegisterUser => {
                self.register_user(args)?;
                Ok(Vec::new())
            }
            InvokeFunction::RegisterUserDetails => {
                self.register_user_details(args)?;
                Ok(Vec::new())
            }
            InvokeFunction::AddDeletePoints => {
                let balance = self.add_delete_points(args)?;
                Ok(balance.to_string().into_bytes())
            }
        }
    }

    /// Run a read-only function by name.
    ///
    /// # Errors
    ///
    /// `LedgerError::UnknownOperation` for an unrecognized name, otherwise
    /// whatever the named operation returns.
    pub fn query(&self, function: &str, args: &[String]) -> Result<Vec<u8>> {
        let function: QueryFunction = function.parse()?;
        tracing::debug!(%function, args = args.len(), "Query");

        match function {
            QueryFunction::GetUser => self.get_user(args),
            QueryFunction::GetPoints => self.get_points(args),
            QueryFunction::GetUserDetails => self.get_user_details(args),
            QueryFunction::GetUserCount => serde_json::to_vec(&self.get_user_count()?)
                .map_err(|e| LedgerError::Serialization(e.to_string())),
        }
    }
}
