//! Error types for ledger operations.

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use crate::identifiers::AccountId;

/// Side of a transfer on which an account lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSide {
    /// The account money is drawn from.
    Source,
    /// The account money is paid to.
    Destination,
}

impl fmt::Display for TransferSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferSide::Source => write!(f, "source"),
            TransferSide::Destination => write!(f, "destination"),
        }
    }
}

/// Main error type for ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Creation attempted with an id that is already present.
    #[error("Account already exists: {0}")]
    DuplicateAccount(AccountId),

    /// Lookup or transfer referenced an unknown account id.
    #[error("Account not found: {id} ({side})")]
    AccountNotFound { id: AccountId, side: TransferSide },

    /// Transfer amount was zero or negative.
    #[error("Transfer amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// Source balance below the requested amount at commit time.
    #[error("Insufficient funds in account {id}: requested {requested}, available {available}")]
    InsufficientFunds {
        id: AccountId,
        requested: Decimal,
        available: Decimal,
    },

    /// Detected invariant breach; never a normal business outcome.
    #[error("Ledger invariant violated: {0}")]
    InvariantViolation(String),
}

impl LedgerError {
    /// Check if this error is an expected business outcome rather than a bug.
    pub fn is_business(&self) -> bool {
        !matches!(self, LedgerError::InvariantViolation(_))
    }

    /// Get a stable error code for surrounding service layers.
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            LedgerError::AccountNotFound { .. } => "ACCOUNT_NOT_FOUND",
            LedgerError::InvalidAmount(_) => "INVALID_AMOUNT",
            LedgerError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            LedgerError::InvariantViolation(_) => "INVARIANT_VIOLATION",
        }
    }
}

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        let err = LedgerError::DuplicateAccount(AccountId::new("Id-123"));
        assert_eq!(err.error_code(), "DUPLICATE_ACCOUNT");

        let err = LedgerError::InvalidAmount(dec!(-5));
        assert_eq!(err.error_code(), "INVALID_AMOUNT");
    }

    #[test]
    fn test_business_classification() {
        let business = LedgerError::InsufficientFunds {
            id: AccountId::new("4"),
            requested: dec!(20),
            available: dec!(10),
        };
        assert!(business.is_business());

        let violation = LedgerError::InvariantViolation("balance overflow".to_string());
        assert!(!violation.is_business());
    }

    #[test]
    fn test_not_found_display_names_side() {
        let err = LedgerError::AccountNotFound {
            id: AccountId::new("DoesNotExist"),
            side: TransferSide::Source,
        };
        assert_eq!(err.to_string(), "Account not found: DoesNotExist (source)");
    }

    #[test]
    fn test_insufficient_funds_display() {
        let err = LedgerError::InsufficientFunds {
            id: AccountId::new("4"),
            requested: dec!(20),
            available: dec!(10),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds in account 4: requested 20, available 10"
        );
    }
}
