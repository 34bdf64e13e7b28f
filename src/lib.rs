//! Pantry - restaurant inventory ledger.
//!
//! Every stock movement is an append-only transaction; each item's
//! quantity is a snapshot kept equal to the sum of its transactions'
//! effects. On top of the ledger sit structured actions, rolling
//! ten-week analytics, demand calculations and an LLM-backed assistant.
//!
//! # Architecture
//!
//! - [`domain`] - Items, transactions, the effect table, actions, analytics
//!   bucketing and demand pricing. No I/O.
//! - [`port`] - Traits for the ledger and demand stores, LLM completion,
//!   action extraction and demand prediction.
//! - [`adapter`] - SQLite stores, OpenAI / Anthropic clients, the HTTP
//!   predictor and the clap CLI.
//! - [`application`] - Inventory, action, analytics, demand and assistant
//!   services.
//! - [`infrastructure`] - Configuration, logging and service wiring.
//!
//! # Example
//!
//! ```no_run
//! use pantry::domain::{NewItem, RawAction};
//! use pantry::infrastructure::bootstrap::Services;
//! use pantry::infrastructure::config::Config;
//! use serde_json::json;
//!
//! # fn main() -> pantry::error::Result<()> {
//! let services = Services::build(&Config::default(), "pantry.db")?;
//! services.inventory.create_item(&NewItem::named("Flour"))?;
//! let result = services.executor.execute(&RawAction::new(
//!     "record_transaction",
//!     json!({"name": "Flour", "transaction_type": "purchase", "quantity": 25, "cost": 50}),
//! ));
//! assert!(result.success);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
