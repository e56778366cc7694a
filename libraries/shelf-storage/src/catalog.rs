use crate::progress::{self, ProgressUpdate};
use crate::scan_session::ScanSession;
use crate::{create_pool, files, nodes, run_migrations, Result};
use shelf_core::{FileRecord, LibraryFilter, LibraryNode};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The persistent audiobook catalog
///
/// Cheap to clone; clones share the pool and the single-writer scan lock.
#[derive(Clone)]
pub struct CatalogStore {
    pool: SqlitePool,
    scan_lock: Arc<Mutex<()>>,
}

impl CatalogStore {
    /// Connect to `database_url` and bring the schema up to date
    pub async fn open(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing, migrated pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            scan_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // Scanning

    /// Start a scan session, waiting for any running scan to finish first
    pub async fn begin_scan_session(&self) -> Result<ScanSession> {
        let writer = Arc::clone(&self.scan_lock).lock_owned().await;
        ScanSession::begin(&self.pool, writer).await
    }

    // Nodes

    pub async fn get_node(&self, path: &str) -> Result<Option<LibraryNode>> {
        nodes::get_by_path(&self.pool, path).await
    }

    pub async fn list_children(&self, parent_path: &str) -> Result<Vec<LibraryNode>> {
        nodes::get_children(&self.pool, parent_path).await
    }

    pub async fn list_filtered(&self, filter: LibraryFilter) -> Result<Vec<LibraryNode>> {
        nodes::get_filtered(&self.pool, filter).await
    }

    pub async fn count_nodes(&self) -> Result<i64> {
        nodes::count(&self.pool).await
    }

    pub async fn set_expanded(&self, path: &str, is_expanded: bool) -> Result<()> {
        nodes::set_expanded(&self.pool, path, is_expanded).await
    }

    // Files

    pub async fn file_records(&self, audiobook_path: &str) -> Result<Vec<FileRecord>> {
        files::get_for_audiobook(&self.pool, audiobook_path).await
    }

    // Progress

    pub async fn save_progress(&self, path: &str, update: &ProgressUpdate) -> Result<()> {
        progress::save(&self.pool, path, update).await
    }

    pub async fn mark_completed(&self, path: &str) -> Result<()> {
        progress::mark_completed(&self.pool, path).await
    }

    pub async fn reset_progress(&self, path: &str) -> Result<()> {
        progress::reset(&self.pool, path).await
    }

    pub async fn set_playback_speed(&self, path: &str, speed: f64) -> Result<()> {
        progress::set_playback_speed(&self.pool, path, speed).await
    }
}
