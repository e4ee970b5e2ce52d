//! Lockstep Common Types
//!
//! Shared types used across the Lockstep ledger: identifiers, the transfer
//! receipt, and the error taxonomy.

pub mod error;
pub mod identifiers;
pub mod transfer;

pub use error::*;
pub use identifiers::*;
pub use transfer::*;
