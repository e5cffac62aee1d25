//! Request Handlers module
//!
//! Handlers orchestrate the read and write paths over an injected store.

mod commands;
mod statement_handler;
mod transaction_handler;


pub use commands::*;
pub use statement_handler::StatementHandler;
pub use transaction_handler::TransactionHandler;
