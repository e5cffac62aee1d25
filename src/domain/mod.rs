//! Domain module
//!
//! Core domain types and business logic.

pub mod amount;
pub mod client;
pub mod error;
pub mod operation;
pub mod transaction;

pub use amount::{Amount, AmountError};
pub use client::{ClientAccount, Statement, STATEMENT_SIZE};
pub use error::DomainError;
pub use operation::Operation;
pub use transaction::{Description, NewTransaction, TransactionRecord};
