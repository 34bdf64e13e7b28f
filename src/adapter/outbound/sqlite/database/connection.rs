//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling, migration support, and connection
//! configuration for the ledger database.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// A connection checked out of a [`DbPool`].
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Default number of pooled connections.
const DEFAULT_POOL_SIZE: u32 = 5;

/// Create a connection pool for the given database URL.
///
/// Every `:memory:` connection is a separate database, so in-memory
/// pools should be created with [`create_pool_with_size`] and a size of 1.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    create_pool_with_size(database_url, DEFAULT_POOL_SIZE)
}

/// Create a connection pool with an explicit maximum size.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool_with_size(database_url: &str, max_size: u32) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Check out a connection with pragmas applied.
///
/// # Errors
/// Returns an error if no connection is available or a pragma fails.
pub fn checkout(pool: &DbPool) -> Result<DbConnection> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    configure_sqlite_connection(&mut conn)?;
    Ok(conn)
}

/// Run all pending database migrations.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Connection(e.to_string()))?;
    Ok(())
}

/// Configure SQLite connection pragmas used for ledger writes.
///
/// # Errors
/// Returns an error if a pragma fails to apply.
pub fn configure_sqlite_connection(conn: &mut SqliteConnection) -> Result<()> {
    diesel::sql_query("PRAGMA busy_timeout=5000")
        .execute(conn)
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

/// Enable write-ahead logging for a file database.
///
/// # Errors
/// Returns an error if the pragma fails.
pub fn enable_wal(pool: &DbPool) -> Result<()> {
    let mut conn = checkout(pool)?;
    diesel::sql_query("PRAGMA journal_mode=WAL")
        .execute(&mut conn)
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

/// Migrated in-memory database for unit tests.
#[cfg(test)]
pub(crate) fn memory_pool() -> DbPool {
    let pool = create_pool_with_size(":memory:", 1).expect("in-memory pool");
    run_migrations(&pool).expect("migrations");
    pool
}
