//! SQLite database modules.
//!
//! Provides connection management, schema definitions, and Diesel row
//! types for the ledger and demand tables.

pub mod connection;
pub mod model;
pub mod schema;
