//! Transfer receipt for committed transfers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::identifiers::{AccountId, TransferId};

/// Record of a committed transfer.
///
/// Balances are the post-commit values snapshotted inside the transfer's
/// critical section, so a receipt is internally consistent even when other
/// transfers commit against the same accounts immediately afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Unique identifier of this transfer.
    pub id: TransferId,
    /// Source account.
    pub from: AccountId,
    /// Destination account.
    pub to: AccountId,
    /// Amount moved.
    pub amount: Decimal,
    /// Source balance after the transfer.
    pub from_balance: Decimal,
    /// Destination balance after the transfer.
    pub to_balance: Decimal,
    /// When the transfer committed.
    pub completed_at: DateTime<Utc>,
}

impl TransferReceipt {
    /// Create a receipt for a transfer that just committed.
    pub fn new(
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        from_balance: Decimal,
        to_balance: Decimal,
    ) -> Self {
        Self {
            id: TransferId::new(),
            from,
            to,
            amount,
            from_balance,
            to_balance,
            completed_at: Utc::now(),
        }
    }
}
