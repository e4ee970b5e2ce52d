//! Lockstep Ledger
//!
//! Concurrent in-memory account store and transfer engine with deterministic
//! lock ordering.
//!
//! # Features
//!
//! - Atomic check-and-insert account creation
//! - Two-account transfers that commit atomically under ordered per-account locks
//! - Exact decimal balance arithmetic
//! - Best-effort transfer notifications through a pluggable port
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lockstep_ledger::{Account, AccountStore, LoggingNotifier, TransferEngine};
//! use rust_decimal_macros::dec;
//!
//! let store = Arc::new(AccountStore::new());
//! store.create(Account::with_balance("1".into(), dec!(1000)))?;
//! store.create(Account::with_balance("2".into(), dec!(200)))?;
//!
//! let engine = TransferEngine::new(Arc::clone(&store), Arc::new(LoggingNotifier));
//! let receipt = engine.transfer(dec!(300), &"1".into(), &"2".into()).await?;
//! assert_eq!(receipt.from_balance, dec!(700));
//! ```

pub mod account;
pub mod engine;
pub mod notification;
pub mod store;

pub use account::Account;
pub use engine::TransferEngine;
pub use notification::{LoggingNotifier, NotificationError, NotificationPort};
pub use store::{AccountStore, SharedAccountStore, StoreStats};
