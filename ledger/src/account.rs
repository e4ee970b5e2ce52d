//! Account entity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lockstep_common::AccountId;

/// A ledger account: caller-assigned identity plus current balance.
///
/// Values of this type are snapshots. The live balance is owned by the store
/// and mutated only by the transfer engine; [`crate::AccountStore::get`]
/// copies it out under the account's lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account identifier.
    pub id: AccountId,
    /// Current balance. Expected to be non-negative; the transfer path
    /// preserves non-negativity for any store populated with non-negative
    /// balances.
    pub balance: Decimal,
}

impl Account {
    /// Create a new account with a zero balance.
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            balance: Decimal::ZERO,
        }
    }

    /// Create a new account with an initial balance.
    pub fn with_balance(id: AccountId, balance: Decimal) -> Self {
        Self { id, balance }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_account_starts_at_zero() {
        let account = Account::new(AccountId::new("Id-123"));
        assert_eq!(account.balance, Decimal::ZERO);
    }

    #[test]
    fn test_with_balance() {
        let account = Account::with_balance(AccountId::new("Id-123"), dec!(1000));
        assert_eq!(account.id.as_str(), "Id-123");
        assert_eq!(account.balance, dec!(1000));
    }
}
