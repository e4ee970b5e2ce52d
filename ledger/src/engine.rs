//! Transfer engine: validation chain and atomic two-account commit.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use lockstep_common::{AccountId, LedgerError, Result, TransferReceipt, TransferSide};

use crate::account::Account;
use crate::notification::NotificationPort;
use crate::store::{AccountEntry, SharedAccountStore};

/// Orchestrates transfers against an injected store.
///
/// The engine never creates or deletes accounts. It resolves entries from
/// the store and mutates their balances inside one critical section per
/// transfer.
pub struct TransferEngine {
    store: SharedAccountStore,
    notifier: Arc<dyn NotificationPort>,
}

impl TransferEngine {
    /// Create a new engine over the given store and notification port.
    pub fn new(store: SharedAccountStore, notifier: Arc<dyn NotificationPort>) -> Self {
        Self { store, notifier }
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// Validation order: amount, then source existence, then destination
    /// existence. The sufficiency check runs under the account locks, and
    /// both balance writes become visible together. Every failure leaves the
    /// ledger untouched.
    ///
    /// Notifications are dispatched after the locks are released, against
    /// the balances snapshotted at commit; a port failure is logged and does
    /// not fail or roll back the transfer.
    #[instrument(skip(self), fields(from = %from, to = %to, amount = %amount))]
    pub async fn transfer(
        &self,
        amount: Decimal,
        from: &AccountId,
        to: &AccountId,
    ) -> Result<TransferReceipt> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let from_entry = self
            .store
            .entry(from)
            .ok_or_else(|| LedgerError::AccountNotFound {
                id: from.clone(),
                side: TransferSide::Source,
            })?;
        let to_entry = self
            .store
            .entry(to)
            .ok_or_else(|| LedgerError::AccountNotFound {
                id: to.clone(),
                side: TransferSide::Destination,
            })?;

        let (from_balance, to_balance) = Self::commit(&from_entry, &to_entry, amount)?;

        let receipt =
            TransferReceipt::new(from.clone(), to.clone(), amount, from_balance, to_balance);

        info!(
            transfer_id = %receipt.id,
            from_balance = %from_balance,
            to_balance = %to_balance,
            "Transfer committed"
        );

        self.dispatch_notifications(&receipt).await;

        Ok(receipt)
    }

    // --- Private methods ---

    /// Run the critical section: lock in global id order, check funds,
    /// apply both mutations, snapshot both post-balances.
    fn commit(
        from: &AccountEntry,
        to: &AccountEntry,
        amount: Decimal,
    ) -> Result<(Decimal, Decimal)> {
        // A self-transfer nets to zero but must still clear the funds check,
        // and may take the (non-reentrant) lock only once.
        if from.id == to.id {
            let balance = from.balance.lock();
            if *balance < amount {
                return Err(LedgerError::InsufficientFunds {
                    id: from.id.clone(),
                    requested: amount,
                    available: *balance,
                });
            }
            return Ok((*balance, *balance));
        }

        // Always lock the lexicographically smaller id first so that
        // opposite-direction transfers over the same pair cannot deadlock.
        let (mut from_guard, mut to_guard) = if from.id < to.id {
            let from_guard = from.balance.lock();
            let to_guard = to.balance.lock();
            (from_guard, to_guard)
        } else {
            let to_guard = to.balance.lock();
            let from_guard = from.balance.lock();
            (from_guard, to_guard)
        };

        if *from_guard < amount {
            return Err(LedgerError::InsufficientFunds {
                id: from.id.clone(),
                requested: amount,
                available: *from_guard,
            });
        }

        // Compute both post-balances before writing either cell, so a failed
        // credit leaves no partial mutation behind.
        let debited = *from_guard - amount;
        let credited = to_guard.checked_add(amount).ok_or_else(|| {
            LedgerError::InvariantViolation(format!(
                "balance overflow crediting account {}",
                to.id
            ))
        })?;

        *from_guard = debited;
        *to_guard = credited;

        Ok((debited, credited))
    }

    /// Best-effort delivery: "sent" to the source, then "received" to the
    /// destination. Runs with no balance lock held.
    async fn dispatch_notifications(&self, receipt: &TransferReceipt) {
        let sender = Account::with_balance(receipt.from.clone(), receipt.from_balance);
        let sent = format!(
            "You transferred {} to account id {}.",
            receipt.amount, receipt.to
        );
        if let Err(error) = self.notifier.notify(&sender, &sent).await {
            warn!(account = %sender.id, error = %error, "Notification delivery failed");
        }

        let receiver = Account::with_balance(receipt.to.clone(), receipt.to_balance);
        let received = format!(
            "You received {} from account id {}.",
            receipt.amount, receipt.from
        );
        if let Err(error) = self.notifier.notify(&receiver, &received).await {
            warn!(account = %receiver.id, error = %error, "Notification delivery failed");
        }
    }
}
