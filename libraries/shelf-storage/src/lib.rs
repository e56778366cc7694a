//! Shelf Storage
//!
//! `SQLite` catalog of audiobook and folder nodes for Audioshelf.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each concern owns its queries (`nodes`, `files`, `progress`)
//! - **Scan Sessions**: a whole library scan is one transaction ([`ScanSession`]) that
//!   snapshots playback progress, reconciles nodes and commits at the end
//! - **Path Keys**: nodes are keyed by their path relative to the library root
//!
//! # Example
//!
//! ```rust,no_run
//! use shelf_storage::CatalogStore;
//! use shelf_core::LibraryFilter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CatalogStore::open("sqlite://audiobooks.db").await?;
//!
//! for node in store.list_filtered(LibraryFilter::InProgress).await? {
//!     println!("{} ({}%)", node.path, node.progress.progress_percent);
//! }
//! # Ok(())
//! # }
//! ```

mod catalog;
mod error;

// Vertical slices
pub mod files;
pub mod nodes;
pub mod progress;
pub mod scan_session;

pub use catalog::CatalogStore;
pub use error::{Result, StorageError};
pub use progress::ProgressUpdate;
pub use scan_session::{ScanSession, UpsertOutcome};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(
    pool: &SqlitePool,
) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://audiobooks.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}
