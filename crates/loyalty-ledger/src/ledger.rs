//! The account ledger.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use loyalty_core::{
    check_arity, parse_amount, Account, Arity, Ffid, LedgerError, Operator, Result,
};
use loyalty_store::{IndexedTable, KeyValueStore};

use crate::migrate::ensure_schema;
use crate::repository::{AccountRepository, BlobRepository, TableRepository};

/// Result of counting table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResult {
    /// Number of non-empty rows.
    pub count: u64,
}

/// Account registration and point-balance operations.
///
/// The ledger owns no state beyond its store handles; every call reads what
/// it needs, validates, and writes back. Read-modify-write sequences are not
/// isolated from concurrent callers: two adjustments racing on one account
/// resolve however the underlying store orders their writes.
#[derive(Clone)]
pub struct AccountLedger {
    state: Arc<dyn KeyValueStore>,
    tables: Arc<dyn IndexedTable>,
    blobs: BlobRepository,
    rows: TableRepository,
}

impl AccountLedger {
    /// Create a ledger over a key-value store and a table store.
    ///
    /// The two may be the same backend.
    #[must_use]
    pub fn new(state: Arc<dyn KeyValueStore>, tables: Arc<dyn IndexedTable>) -> Self {
        Self {
            blobs: BlobRepository::new(state.clone()),
            rows: TableRepository::new(tables.clone()),
            state,
            tables,
        }
    }

    /// Ensure `UserTable` exists. Safe to call repeatedly.
    ///
    /// Returns `true` if this call created the table.
    ///
    /// # Errors
    ///
    /// Returns a store error if the check or the creation fails.
    pub fn init(&self) -> Result<bool> {
        ensure_schema(self.tables.as_ref(), self.state.as_ref())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Register an account on the blob path, overwriting any existing blob.
    ///
    /// # Errors
    ///
    /// Binding errors from `Account::from_args`, or `LedgerError::StoreWrite`.
    pub fn register_user(&self, args: &[String]) -> Result<Account> {
        let account = Account::from_args("RegisterUser", args)?;
        self.blobs.register(&account)?;

        tracing::info!(ffid = %account.ffid, points = %account.total_points, "Account registered");
        Ok(account)
    }

    /// Register an account on the table path.
    ///
    /// # Errors
    ///
    /// Binding errors from `Account::from_args`, `LedgerError::DuplicateKey`
    /// if the row exists, or `LedgerError::StoreWrite`.
    pub fn register_user_details(&self, args: &[String]) -> Result<Account> {
        let account = Account::from_args("RegisterUserDetails", args)?;

        if let Err(e) = self.rows.register(&account) {
            if matches!(e, LedgerError::DuplicateKey { .. }) {
                tracing::warn!(ffid = %account.ffid, "Table registration rejected: key exists");
            }
            return Err(e);
        }

        tracing::info!(ffid = %account.ffid, "Account row registered");
        Ok(account)
    }

    /// Adjust a balance from positional `(ffid, operator, amount)` arguments.
    ///
    /// # Errors
    ///
    /// `LedgerError::InvalidArgumentCount` for fewer than 3 arguments, plus
    /// everything `adjust_points` returns.
    pub fn add_delete_points(&self, args: &[String]) -> Result<u64> {
        check_arity("AddDeletePoints", args, Arity::AtLeast(3))?;

        let ffid = Ffid::new(args[0].as_str())?;
        let operator: Operator = args[1].parse()?;
        let amount = parse_amount(&args[2])?;

        self.adjust_points(&ffid, operator, amount)
    }

    /// Apply `operator` with `amount` to the blob balance of `ffid`.
    ///
    /// Returns the new balance. Nothing is written unless the whole
    /// adjustment succeeds.
    ///
    /// # Errors
    ///
    /// - `LedgerError::NotFound` if there is no blob for `ffid`.
    /// - `LedgerError::Deserialization` if the blob is not an account.
    /// - `LedgerError::InvalidBalance` if the stored balance does not parse.
    /// - `LedgerError::InsufficientBalance` if a debit exceeds the balance.
    /// - `LedgerError::BalanceOverflow` if a credit overflows.
    /// - `LedgerError::StoreRead` / `LedgerError::StoreWrite` on store failure.
    pub fn adjust_points(&self, ffid: &Ffid, operator: Operator, amount: u64) -> Result<u64> {
        let mut account = self.blobs.find(ffid)?;
        let balance = account.points()?;

        let updated = match operator.apply(balance, amount) {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!(
                    ffid = %ffid,
                    operator = %operator,
                    amount,
                    balance,
                    error = %e,
                    "Point adjustment rejected"
                );
                return Err(e);
            }
        };

        account.set_points(updated);
        self.blobs.save(&account)?;

        tracing::info!(
            ffid = %ffid,
            operator = %operator,
            amount,
            balance = updated,
            "Points adjusted"
        );
        Ok(updated)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The stored blob for `args[0]`, verbatim.
    ///
    /// # Errors
    ///
    /// `LedgerError::InvalidArgumentCount`, `LedgerError::NotFound`, or
    /// `LedgerError::StoreRead`.
    pub fn get_user(&self, args: &[String]) -> Result<Vec<u8>> {
        check_arity("getUser", args, Arity::AtLeast(1))?;
        let ffid = Ffid::new(args[0].as_str())?;

        tracing::debug!(ffid = %ffid, "Reading account blob");
        self.blobs.raw(&ffid)
    }

    /// The balance string stored in the blob for `args[0]`.
    ///
    /// # Errors
    ///
    /// `LedgerError::InvalidArgumentCount`, `LedgerError::NotFound`,
    /// `LedgerError::Deserialization`, or `LedgerError::StoreRead`.
    pub fn get_points(&self, args: &[String]) -> Result<Vec<u8>> {
        check_arity("getPoints", args, Arity::AtLeast(1))?;
        let ffid = Ffid::new(args[0].as_str())?;

        let account = self.blobs.find(&ffid)?;
        Ok(account.total_points.into_bytes())
    }

    /// The table row for `args[0]`, as account JSON.
    ///
    /// # Errors
    ///
    /// `LedgerError::InvalidArgumentCount` unless exactly one argument is
    /// given, `LedgerError::NotFound`, `LedgerError::Deserialization`, or
    /// `LedgerError::StoreRead`.
    pub fn get_user_details(&self, args: &[String]) -> Result<Vec<u8>> {
        check_arity("GetUserDetails", args, Arity::Exactly(1))?;
        let ffid = Ffid::new(args[0].as_str())?;

        tracing::debug!(ffid = %ffid, "Reading account row");
        self.rows.find(&ffid)?.to_json()
    }

    /// Count of registered table rows.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StoreRead` if the scan fails.
    pub fn get_user_count(&self) -> Result<CountResult> {
        let count = self.rows.count()?;
        tracing::debug!(count, "Counted account rows");
        Ok(CountResult { count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loyalty_store::{MemoryStore, Result as StoreResult, StoreError};
    use proptest::prelude::*;

    fn ledger() -> (AccountLedger, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let ledger = AccountLedger::new(store.clone(), store.clone());
        ledger.init().unwrap();
        (ledger, store)
    }

    fn registration(ffid: &str, points: &str) -> Vec<String> {
        [
            ffid, "Alan", "Turing", "1912-06-23", "alan@example.com", "Bletchley Park", "UK",
            "Milton Keynes", "MK3 6EB", "admin", "Dr", "M", points,
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn points(ledger: &AccountLedger, ffid: &str) -> String {
        String::from_utf8(ledger.get_points(&args(&[ffid])).unwrap()).unwrap()
    }

    #[test]
    fn register_then_get_points() {
        let (ledger, _store) = ledger();
        ledger.register_user(&registration("U1", "100")).unwrap();
        assert_eq!(points(&ledger, "U1"), "100");
    }

    #[test]
    fn registered_balance_is_canonical() {
        let (ledger, _store) = ledger();
        ledger.register_user(&registration("U1", "+0100")).unwrap();
        assert_eq!(points(&ledger, "U1"), "100");

        let stored = Account::from_json(&ledger.get_user(&args(&["U1"])).unwrap()).unwrap();
        assert_eq!(stored.total_points, "100");
    }

    #[test]
    fn add_then_overdraw() {
        let (ledger, _store) = ledger();
        ledger.register_user(&registration("U1", "100")).unwrap();

        let balance = ledger.add_delete_points(&args(&["U1", "Add", "50"])).unwrap();
        assert_eq!(balance, 150);
        assert_eq!(points(&ledger, "U1"), "150");

        let err = ledger
            .add_delete_points(&args(&["U1", "Delete", "200"]))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientBalance {
                balance: 150,
                required: 200
            }
        ));
        assert_eq!(points(&ledger, "U1"), "150");
    }

    #[test]
    fn delete_to_zero() {
        let (ledger, _store) = ledger();
        ledger.register_user(&registration("U1", "40")).unwrap();
        assert_eq!(
            ledger.add_delete_points(&args(&["U1", "Delete", "40"])).unwrap(),
            0
        );
        assert_eq!(points(&ledger, "U1"), "0");
    }

    #[test]
    fn rejected_adjustments_leave_blob_untouched() {
        let (ledger, store) = ledger();
        ledger.register_user(&registration("U1", "100")).unwrap();
        let before = store.get("U1").unwrap();

        let err = ledger.add_delete_points(&args(&["U1", "Subtract", "5"])).unwrap_err();
        assert!(matches!(err, LedgerError::UnknownOperator(_)));

        let err = ledger.add_delete_points(&args(&["U1", "Add", "five"])).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        let err = ledger.add_delete_points(&args(&["U1", "Add", "-5"])).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        assert_eq!(store.get("U1").unwrap(), before);
    }

    #[test]
    fn adjust_missing_account_is_not_found() {
        let (ledger, _store) = ledger();
        let err = ledger.add_delete_points(&args(&["ghost", "Add", "1"])).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[test]
    fn adjust_with_corrupt_balance_is_invalid_balance() {
        let (ledger, store) = ledger();
        let mut account = Account::from_args("RegisterUser", &registration("U1", "1")).unwrap();
        account.total_points = "lots".into();
        store.put("U1", &account.to_json().unwrap()).unwrap();

        let err = ledger.add_delete_points(&args(&["U1", "Add", "1"])).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidBalance(_)));
    }

    #[test]
    fn adjust_needs_three_arguments() {
        let (ledger, _store) = ledger();
        let err = ledger.add_delete_points(&args(&["U1", "Add"])).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgumentCount { got: 2, .. }));
    }

    #[test]
    fn blob_and_table_are_independent() {
        let (ledger, _store) = ledger();
        ledger.register_user(&registration("U1", "100")).unwrap();

        assert!(matches!(
            ledger.get_user_details(&args(&["U1"])),
            Err(LedgerError::NotFound(_))
        ));
        assert_eq!(ledger.get_user_count().unwrap().count, 0);

        ledger.register_user_details(&registration("U2", "5")).unwrap();
        assert!(matches!(
            ledger.get_user(&args(&["U2"])),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn get_user_returns_stored_bytes() {
        let (ledger, _store) = ledger();
        let account = ledger.register_user(&registration("U1", "100")).unwrap();
        assert_eq!(
            ledger.get_user(&args(&["U1"])).unwrap(),
            account.to_json().unwrap()
        );
    }

    #[test]
    fn table_details_and_count() {
        let (ledger, _store) = ledger();
        assert!(matches!(
            ledger.get_user_details(&args(&["U1"])),
            Err(LedgerError::NotFound(_))
        ));
        assert_eq!(ledger.get_user_count().unwrap(), CountResult { count: 0 });

        let account = ledger.register_user_details(&registration("U1", "100")).unwrap();
        ledger.register_user_details(&registration("U2", "0")).unwrap();

        let details = ledger.get_user_details(&args(&["U1"])).unwrap();
        assert_eq!(Account::from_json(&details).unwrap(), account);
        assert_eq!(ledger.get_user_count().unwrap().count, 2);

        let err = ledger
            .register_user_details(&registration("U1", "7"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateKey { .. }));
        assert_eq!(ledger.get_user_count().unwrap().count, 2);
    }

    #[test]
    fn get_user_details_wants_exactly_one_argument() {
        let (ledger, _store) = ledger();
        let err = ledger.get_user_details(&args(&["U1", "U2"])).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgumentCount { .. }));
    }

    /// A key-value store whose writes always fail.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
            self.0.get(key)
        }

        fn put(&self, _key: &str, _value: &[u8]) -> StoreResult<()> {
            Err(StoreError::Database("read-only".into()))
        }
    }

    #[test]
    fn store_write_failure_surfaces() {
        let tables = Arc::new(MemoryStore::new());
        let state = Arc::new(ReadOnlyStore(MemoryStore::new()));
        let ledger = AccountLedger::new(state, tables);

        let err = ledger.register_user(&registration("U1", "1")).unwrap_err();
        assert!(matches!(err, LedgerError::StoreWrite(msg) if msg.contains("read-only")));
    }

    proptest! {
        /// Balances follow valid Add/Delete sequences exactly and never go
        /// negative; refused debits leave the balance as it was.
        #[test]
        fn balance_tracks_adjustments(
            start in 0u64..10_000,
            steps in prop::collection::vec((any::<bool>(), 0u64..5_000), 1..20)
        ) {
            let (ledger, _store) = ledger();
            ledger.register_user(&registration("P", &start.to_string())).unwrap();
            let ffid = Ffid::new("P").unwrap();

            let mut expected = start;
            for (add, amount) in steps {
                let operator = if add { Operator::Add } else { Operator::Delete };
                match ledger.adjust_points(&ffid, operator, amount) {
                    Ok(balance) => {
                        expected = if add { expected + amount } else { expected - amount };
                        prop_assert_eq!(balance, expected);
                    }
                    Err(LedgerError::InsufficientBalance { balance, required }) => {
                        prop_assert!(!add);
                        prop_assert_eq!(balance, expected);
                        prop_assert!(required > expected);
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {other}"),
                }
                prop_assert_eq!(points(&ledger, "P"), expected.to_string());
            }
        }
    }
}
