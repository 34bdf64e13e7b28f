//! Path utilities for pantry.
//!
//! All data lives under `~/.pantry/`:
//! - `~/.pantry/config.toml` - main configuration
//! - `~/.pantry/pantry.db` - inventory ledger

use std::path::PathBuf;

/// Returns the pantry home directory (`~/.pantry/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pantry")
}

/// Returns the default config file path (`~/.pantry/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default database path (`~/.pantry/pantry.db`).
pub fn default_database() -> PathBuf {
    home_dir().join("pantry.db")
}
