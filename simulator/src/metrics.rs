//! Simulation metrics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use lockstep_common::LedgerError;

/// Transfer outcome counters, shared across workers.
pub struct TransferMetrics {
    /// Transfers attempted.
    pub transfers_attempted: AtomicU64,
    /// Transfers committed.
    pub transfers_committed: AtomicU64,
    /// Transfers rejected for insufficient funds.
    pub rejected_insufficient_funds: AtomicU64,
    /// Transfers rejected for an unknown account.
    pub rejected_not_found: AtomicU64,
    /// Transfers rejected for a non-positive amount.
    pub rejected_invalid_amount: AtomicU64,
    /// Other failures (none are expected during a simulation).
    pub failed_other: AtomicU64,
    /// Notifications delivered.
    pub notifications_delivered: AtomicU64,
}

impl TransferMetrics {
    /// Create a new metrics instance.
    pub fn new() -> Self {
        Self {
            transfers_attempted: AtomicU64::new(0),
            transfers_committed: AtomicU64::new(0),
            rejected_insufficient_funds: AtomicU64::new(0),
            rejected_not_found: AtomicU64::new(0),
            rejected_invalid_amount: AtomicU64::new(0),
            failed_other: AtomicU64::new(0),
            notifications_delivered: AtomicU64::new(0),
        }
    }

    /// Record an attempted transfer.
    pub fn transfer_attempted(&self) {
        self.transfers_attempted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a committed transfer.
    pub fn transfer_committed(&self) {
        self.transfers_committed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected transfer, classified by error kind.
    pub fn transfer_rejected(&self, error: &LedgerError) {
        let counter = match error {
            LedgerError::InsufficientFunds { .. } => &self.rejected_insufficient_funds,
            LedgerError::AccountNotFound { .. } => &self.rejected_not_found,
            LedgerError::InvalidAmount(_) => &self.rejected_invalid_amount,
            _ => &self.failed_other,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a delivered notification.
    pub fn notification_delivered(&self) {
        self.notifications_delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            transfers_attempted: self.transfers_attempted.load(Ordering::Relaxed),
            transfers_committed: self.transfers_committed.load(Ordering::Relaxed),
            rejected_insufficient_funds: self.rejected_insufficient_funds.load(Ordering::Relaxed),
            rejected_not_found: self.rejected_not_found.load(Ordering::Relaxed),
            rejected_invalid_amount: self.rejected_invalid_amount.load(Ordering::Relaxed),
            failed_other: self.failed_other.load(Ordering::Relaxed),
            notifications_delivered: self.notifications_delivered.load(Ordering::Relaxed),
        }
    }
}

impl Default for TransferMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub transfers_attempted: u64,
    pub transfers_committed: u64,
    pub rejected_insufficient_funds: u64,
    pub rejected_not_found: u64,
    pub rejected_invalid_amount: u64,
    pub failed_other: u64,
    pub notifications_delivered: u64,
}

impl MetricsSnapshot {
    /// Fraction of attempted transfers that committed.
    pub fn success_rate(&self) -> f64 {
        if self.transfers_attempted == 0 {
            return 0.0;
        }
        self.transfers_committed as f64 / self.transfers_attempted as f64
    }
}

/// Shared metrics instance.
pub type SharedTransferMetrics = Arc<TransferMetrics>;

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_common::AccountId;
    use rust_decimal::Decimal;

    #[test]
    fn test_metrics_classification() {
        let metrics = TransferMetrics::new();

        metrics.transfer_attempted();
        metrics.transfer_committed();
        metrics.transfer_attempted();
        metrics.transfer_rejected(&LedgerError::InsufficientFunds {
            id: AccountId::new("A"),
            requested: Decimal::from(20),
            available: Decimal::from(10),
        });

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.transfers_attempted, 2);
        assert_eq!(snapshot.transfers_committed, 1);
        assert_eq!(snapshot.rejected_insufficient_funds, 1);
        assert_eq!(snapshot.success_rate(), 0.5);
    }
}
