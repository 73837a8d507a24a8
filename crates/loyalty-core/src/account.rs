//! Account record for the loyalty ledger.
//!
//! An `Account` is the user registration record: an identifier, eleven
//! profile fields, and the point balance. The JSON form uses the historical
//! field names (`DOB`, `createdby`, `totalPoints`) and is the storage format
//! of the key-value path, so field order and names must not change.

use serde::{Deserialize, Serialize};

use crate::args::{check_arity, Arity};
use crate::error::{LedgerError, Result};
use crate::ids::Ffid;
use crate::points::parse_balance;

/// Number of positional fields in a registration.
pub const FIELD_COUNT: usize = 13;

/// A user registration record with its point balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The account identifier (storage key).
    pub ffid: Ffid,

    /// First name.
    pub firstname: String,

    /// Last name.
    pub lastname: String,

    /// Date of birth, free-form.
    #[serde(rename = "DOB")]
    pub dob: String,

    /// Email address.
    pub email: String,

    /// Postal address.
    pub address: String,

    /// Country.
    pub country: String,

    /// City.
    pub city: String,

    /// Postal code.
    pub zip: String,

    /// Identifier of whoever created the record.
    #[serde(rename = "createdby")]
    pub created_by: String,

    /// Title (Mr, Ms, ...).
    pub title: String,

    /// Gender.
    pub gender: String,

    /// Point balance as a decimal string.
    #[serde(rename = "totalPoints")]
    pub total_points: String,
}

impl Account {
    /// Bind a registration's positional arguments into an account.
    ///
    /// Arguments are, in order: `ffid, firstname, lastname, DOB, email,
    /// address, country, city, zip, createdBy, title, gender, totalPoints`.
    /// Trailing arguments beyond the thirteenth are ignored. The balance is
    /// stored in canonical decimal form, so `"+0100"` is kept as `"100"`.
    ///
    /// # Errors
    ///
    /// - `LedgerError::InvalidArgumentCount` if fewer than 13 arguments are given.
    /// - `LedgerError::InvalidId` if `ffid` is empty.
    /// - `LedgerError::InvalidBalance` if `totalPoints` is not a non-negative integer.
    pub fn from_args(function: &str, args: &[String]) -> Result<Self> {
        check_arity(function, args, Arity::AtLeast(FIELD_COUNT))?;

        let fields: [String; FIELD_COUNT] = args[..FIELD_COUNT]
            .to_vec()
            .try_into()
            .map_err(|_| LedgerError::InvalidArgumentCount {
                function: function.to_string(),
                expected: Arity::AtLeast(FIELD_COUNT),
                got: args.len(),
            })?;

        let mut account = Self::from_fields(fields)?;
        let points = parse_balance(&account.total_points)?;
        account.set_points(points);
        Ok(account)
    }

    /// Build an account from its fields in column order.
    ///
    /// Only the identifier is checked; the balance is taken as-is.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidId` if the first field is empty.
    pub fn from_fields(fields: [String; FIELD_COUNT]) -> Result<Self> {
        let [
            ffid,
            firstname,
            lastname,
            dob,
            email,
            address,
            country,
            city,
            zip,
            created_by,
            title,
            gender,
            total_points,
        ] = fields;

        Ok(Self {
            ffid: Ffid::new(ffid)?,
            firstname,
            lastname,
            dob,
            email,
            address,
            country,
            city,
            zip,
            created_by,
            title,
            gender,
            total_points,
        })
    }

    /// Split the account into its fields in column order.
    #[must_use]
    pub fn into_fields(self) -> [String; FIELD_COUNT] {
        [
            self.ffid.into(),
            self.firstname,
            self.lastname,
            self.dob,
            self.email,
            self.address,
            self.country,
            self.city,
            self.zip,
            self.created_by,
            self.title,
            self.gender,
            self.total_points,
        ]
    }

    /// Current balance.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidBalance` if the stored value is not a
    /// non-negative integer.
    pub fn points(&self) -> Result<u64> {
        parse_balance(&self.total_points)
    }

    /// Replace the balance.
    pub fn set_points(&mut self, points: u64) {
        self.total_points = points.to_string();
    }

    /// Encode the account as its JSON storage form.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    /// Decode an account from its JSON storage form.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Deserialization` if `bytes` is not an account record.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| LedgerError::Deserialization(e.to_string()))
    }
}
