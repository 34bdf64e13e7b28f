//! CLI module graph.

pub mod action;
pub mod analytics;
pub mod chat;
pub mod command;
pub mod config;
pub mod demand;
pub mod items;
pub mod output;
pub mod paths;
pub mod run;
pub mod stock;
pub mod transactions;

pub use command::Cli;
pub use run::execute;
