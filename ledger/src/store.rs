//! Concurrent account store.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::info;

use lockstep_common::{AccountId, LedgerError, Result};

use crate::account::Account;

/// Live store entry: immutable id plus the lock-guarded balance cell.
///
/// The balance mutex is the per-account lock of the transfer protocol: every
/// mutation and every consistent read of a balance goes through it. Entries
/// are shared via `Arc` and mutated in place, never re-inserted.
pub(crate) struct AccountEntry {
    pub(crate) id: AccountId,
    pub(crate) balance: Mutex<Decimal>,
}

impl AccountEntry {
    fn new(account: Account) -> Self {
        Self {
            id: account.id,
            balance: Mutex::new(account.balance),
        }
    }

    /// Copy out a consistent snapshot.
    pub(crate) fn snapshot(&self) -> Account {
        Account {
            id: self.id.clone(),
            balance: *self.balance.lock(),
        }
    }
}

/// Thread-safe map of accounts by id.
///
/// Map-level operations are safe under concurrent access without any
/// external lock; balance mutation rights are per-entry (see
/// [`AccountEntry`]).
pub struct AccountStore {
    accounts: DashMap<AccountId, Arc<AccountEntry>>,
}

impl AccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Create an empty store with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            accounts: DashMap::with_capacity(capacity),
        }
    }

    /// Insert a new account.
    ///
    /// The check-and-insert is a single atomic operation on the map entry,
    /// so two concurrent creates with the same id cannot both succeed.
    pub fn create(&self, account: Account) -> Result<()> {
        match self.accounts.entry(account.id.clone()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateAccount(account.id)),
            Entry::Vacant(slot) => {
                info!(account = %account.id, balance = %account.balance, "Account created");
                slot.insert(Arc::new(AccountEntry::new(account)));
                Ok(())
            }
        }
    }

    /// Get a snapshot of an account.
    ///
    /// Takes the account's balance lock only for the duration of the copy.
    pub fn get(&self, id: &AccountId) -> Option<Account> {
        self.accounts.get(id).map(|entry| entry.snapshot())
    }

    /// Resolve the live entry for an id.
    pub(crate) fn entry(&self, id: &AccountId) -> Option<Arc<AccountEntry>> {
        self.accounts.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove all accounts.
    ///
    /// Intended for operational or test reset. A transfer that has already
    /// resolved its entries commits against them even if this runs
    /// concurrently; the ordering of a clear relative to in-flight transfers
    /// is undefined.
    pub fn clear(&self) {
        let cleared = self.accounts.len();
        self.accounts.clear();
        info!(accounts = cleared, "Account store cleared");
    }

    /// Number of accounts in the store.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of all balances.
    ///
    /// Computed without a global lock: exact when no transfers are in
    /// flight, weakly consistent otherwise.
    pub fn total_balance(&self) -> Decimal {
        self.accounts
            .iter()
            .map(|entry| *entry.balance.lock())
            .sum()
    }

    /// Get store statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            accounts: self.len(),
            total_balance: self.total_balance(),
        }
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Store statistics.
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub accounts: usize,
    pub total_balance: Decimal,
}

/// Shared account store.
pub type SharedAccountStore = Arc<AccountStore>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_account(id: &str, balance: Decimal) -> Account {
        Account::with_balance(AccountId::new(id), balance)
    }

    #[test]
    fn test_create_and_get() {
        let store = AccountStore::new();
        store.create(make_account("Id-123", dec!(1000))).unwrap();

        let account = store.get(&AccountId::new("Id-123")).unwrap();
        assert_eq!(account.balance, dec!(1000));
    }

    #[test]
    fn test_duplicate_create_rejected() {
        let store = AccountStore::new();
        store.create(make_account("Id-123", dec!(1000))).unwrap();

        let result = store.create(make_account("Id-123", dec!(500)));
        assert!(
            matches!(result, Err(LedgerError::DuplicateAccount(id)) if id.as_str() == "Id-123")
        );

        // First account's balance is untouched.
        let account = store.get(&AccountId::new("Id-123")).unwrap();
        assert_eq!(account.balance, dec!(1000));
    }

    #[test]
    fn test_get_unknown_returns_none() {
        let store = AccountStore::new();
        assert!(store.get(&AccountId::new("DoesNotExist")).is_none());
    }

    #[test]
    fn test_clear() {
        let store = AccountStore::new();
        store.create(make_account("1", dec!(1000))).unwrap();
        store.create(make_account("2", dec!(200))).unwrap();
        assert_eq!(store.len(), 2);

        store.clear();

        assert!(store.is_empty());
        assert!(store.get(&AccountId::new("1")).is_none());
    }

    #[test]
    fn test_total_balance_and_stats() {
        let store = AccountStore::new();
        store.create(make_account("1", dec!(1000))).unwrap();
        store.create(make_account("2", dec!(200.50))).unwrap();

        assert_eq!(store.total_balance(), dec!(1200.50));

        let stats = store.stats();
        assert_eq!(stats.accounts, 2);
        assert_eq!(stats.total_balance, dec!(1200.50));
    }

    #[test]
    fn test_concurrent_creates_have_single_winner() {
        let store = AccountStore::new();

        let successes: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let store = &store;
                    scope.spawn(move || {
                        store
                            .create(make_account("contended", Decimal::from(i * 100)))
                            .is_ok() as usize
                    })
                })
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).sum()
        });

        assert_eq!(successes, 1);
        assert_eq!(store.len(), 1);
    }
}
