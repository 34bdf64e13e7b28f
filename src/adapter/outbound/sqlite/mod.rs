//! SQLite persistence adapters.
//!
//! Provides the inventory ledger and demand calculation stores using
//! Diesel ORM over a pooled SQLite database.

pub mod database;
pub mod demand;
pub mod ledger;

pub use demand::SqliteDemandStore;
pub use ledger::SqliteLedger;
