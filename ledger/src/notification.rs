//! Transfer notification port and adapters.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::account::Account;

/// Error returned by a notification adapter when delivery fails.
///
/// Kept separate from [`lockstep_common::LedgerError`]: a failed delivery
/// never fails the transfer that triggered it.
#[derive(Debug, Error)]
#[error("Notification delivery failed: {0}")]
pub struct NotificationError(String);

impl NotificationError {
    /// Create a new delivery error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Capability used by the transfer engine to inform account holders of
/// completed transfers. The delivery mechanism lives outside the core; only
/// this invocation contract is part of it.
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Deliver a transfer message to the holder of `account`.
    async fn notify(&self, account: &Account, message: &str) -> Result<(), NotificationError>;
}

/// Default adapter that logs notifications instead of delivering them.
pub struct LoggingNotifier;

#[async_trait]
impl NotificationPort for LoggingNotifier {
    async fn notify(&self, account: &Account, message: &str) -> Result<(), NotificationError> {
        info!(account = %account.id, body = %message, "Transfer notification");
        Ok(())
    }
}

/// Recording adapter for tests; captures notifications in delivery order.
#[cfg(any(test, feature = "test-utils"))]
pub struct RecordingNotifier {
    notifications: parking_lot::Mutex<Vec<(lockstep_common::AccountId, String)>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingNotifier {
    /// Create a new recorder.
    pub fn new() -> Self {
        Self {
            notifications: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// All notifications recorded so far, in order.
    pub fn recorded(&self) -> Vec<(lockstep_common::AccountId, String)> {
        self.notifications.lock().clone()
    }

    /// Number of notifications recorded so far.
    pub fn count(&self) -> usize {
        self.notifications.lock().len()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl NotificationPort for RecordingNotifier {
    async fn notify(&self, account: &Account, message: &str) -> Result<(), NotificationError> {
        self.notifications
            .lock()
            .push((account.id.clone(), message.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_common::AccountId;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_logging_notifier_accepts_delivery() {
        let account = Account::with_balance(AccountId::new("1"), dec!(700));
        let result = LoggingNotifier.notify(&account, "hello").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_recording_notifier_keeps_order() {
        let recorder = RecordingNotifier::new();
        let a = Account::with_balance(AccountId::new("A"), dec!(1));
        let b = Account::with_balance(AccountId::new("B"), dec!(2));

        recorder.notify(&a, "first").await.unwrap();
        recorder.notify(&b, "second").await.unwrap();

        let recorded = recorder.recorded();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0], (AccountId::new("A"), "first".to_string()));
        assert_eq!(recorded[1], (AccountId::new("B"), "second".to_string()));
    }
}
