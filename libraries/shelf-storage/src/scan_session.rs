//! Scan-time reconciliation
//!
//! A [`ScanSession`] is one transaction spanning a whole library scan. On begin it
//! copies the playback fields of every audiobook into a connection-local snapshot
//! table and marks every node unavailable; the scan then re-confirms what it finds.
//! Nothing is visible to other connections until [`ScanSession::end`] commits, and
//! dropping the session without ending it rolls the whole scan back.

use crate::files;
use crate::Result;
use shelf_core::{AudiobookRecord, FileRecord, PlaybackProgress};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tokio::sync::OwnedMutexGuard;
use tracing::debug;

/// How an audiobook upsert was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// Existing row updated; its playback fields were left alone
    Updated,
    /// New row seeded from the session's progress snapshot
    Restored,
    /// New row with default playback fields
    Inserted,
}

/// Single-writer unit of work for one library scan
pub struct ScanSession {
    tx: Transaction<'static, Sqlite>,
    snapshot_rows: i64,
    _writer: OwnedMutexGuard<()>,
}

impl ScanSession {
    /// Snapshot progress and mark every node unavailable
    pub(crate) async fn begin(pool: &SqlitePool, writer: OwnedMutexGuard<()>) -> Result<Self> {
        let mut tx = pool.begin().await?;

        sqlx::query("DROP TABLE IF EXISTS temp.scan_progress_snapshot")
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            CREATE TEMP TABLE scan_progress_snapshot AS
            SELECT path,
                   current_file_index,
                   current_position_seconds,
                   playback_speed,
                   listened_duration_seconds,
                   progress_percent,
                   is_started,
                   is_completed
            FROM library_nodes
            WHERE kind = 'audiobook'
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE library_nodes SET is_available = 0")
            .execute(&mut *tx)
            .await?;

        let snapshot_rows: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM temp.scan_progress_snapshot")
                .fetch_one(&mut *tx)
                .await?;
        debug!("Saved progress snapshot of {} audiobooks", snapshot_rows);

        Ok(Self {
            tx,
            snapshot_rows,
            _writer: writer,
        })
    }

    /// Number of audiobooks captured by the progress snapshot
    pub fn snapshot_rows(&self) -> i64 {
        self.snapshot_rows
    }

    /// Fingerprint stored for an audiobook, if the path is a known audiobook
    pub async fn stored_state_hash(&mut self, path: &str) -> Result<Option<String>> {
        let hash: Option<Option<String>> = sqlx::query_scalar(
            "SELECT state_hash FROM library_nodes WHERE path = ? AND kind = 'audiobook'",
        )
        .bind(path)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(hash.flatten())
    }

    /// Flip an existing node back to available; `false` if no such node exists
    pub async fn confirm_available(&mut self, path: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE library_nodes SET is_available = 1 WHERE path = ?")
            .bind(path)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert or update an audiobook's scan-derived fields
    ///
    /// An existing row keeps its playback fields. A new row takes them from the
    /// session snapshot when the path was captured there, else defaults.
    pub async fn upsert_audiobook(&mut self, record: &AudiobookRecord) -> Result<UpsertOutcome> {
        let updated = sqlx::query(
            r#"
            UPDATE library_nodes
            SET parent_path = ?,
                kind = 'audiobook',
                display_name = ?,
                author = ?,
                title = ?,
                narrator = ?,
                tag_author = ?,
                tag_title = ?,
                tag_narrator = ?,
                tag_year = ?,
                cover_path = ?,
                file_count = ?,
                total_duration_seconds = ?,
                state_hash = ?,
                is_available = 1
            WHERE path = ?
            "#,
        )
        .bind(&record.parent_path)
        .bind(&record.display_name)
        .bind(&record.author)
        .bind(&record.title)
        .bind(&record.narrator)
        .bind(&record.tag_author)
        .bind(&record.tag_title)
        .bind(&record.tag_narrator)
        .bind(&record.tag_year)
        .bind(&record.cover_path)
        .bind(record.file_count)
        .bind(record.total_duration_seconds)
        .bind(&record.state_hash)
        .bind(&record.path)
        .execute(&mut *self.tx)
        .await?;

        if updated.rows_affected() > 0 {
            return Ok(UpsertOutcome::Updated);
        }

        let restored = self.snapshot_progress(&record.path).await?;
        let outcome = if restored.is_some() {
            UpsertOutcome::Restored
        } else {
            UpsertOutcome::Inserted
        };
        let progress = restored.unwrap_or_default();

        sqlx::query(
            r#"
            INSERT INTO library_nodes
                (path, parent_path, kind, display_name,
                 author, title, narrator,
                 tag_author, tag_title, tag_narrator, tag_year,
                 cover_path, file_count, total_duration_seconds, state_hash,
                 current_file_index, current_position_seconds, playback_speed,
                 listened_duration_seconds, progress_percent, is_started, is_completed,
                 is_available)
            VALUES (?, ?, 'audiobook', ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)
            "#,
        )
        .bind(&record.path)
        .bind(&record.parent_path)
        .bind(&record.display_name)
        .bind(&record.author)
        .bind(&record.title)
        .bind(&record.narrator)
        .bind(&record.tag_author)
        .bind(&record.tag_title)
        .bind(&record.tag_narrator)
        .bind(&record.tag_year)
        .bind(&record.cover_path)
        .bind(record.file_count)
        .bind(record.total_duration_seconds)
        .bind(&record.state_hash)
        .bind(progress.current_file_index)
        .bind(progress.current_position_seconds)
        .bind(progress.playback_speed)
        .bind(progress.listened_duration_seconds)
        .bind(i64::from(progress.progress_percent))
        .bind(progress.is_started)
        .bind(progress.is_completed)
        .execute(&mut *self.tx)
        .await?;

        Ok(outcome)
    }

    async fn snapshot_progress(&mut self, path: &str) -> Result<Option<PlaybackProgress>> {
        let row = sqlx::query(
            r#"
            SELECT current_file_index, current_position_seconds, playback_speed,
                   listened_duration_seconds, progress_percent, is_started, is_completed
            FROM temp.scan_progress_snapshot
            WHERE path = ?
            "#,
        )
        .bind(path)
        .fetch_optional(&mut *self.tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let percent: i64 = row.try_get("progress_percent")?;
        Ok(Some(PlaybackProgress {
            current_file_index: row.try_get("current_file_index")?,
            current_position_seconds: row.try_get("current_position_seconds")?,
            playback_speed: row.try_get("playback_speed")?,
            listened_duration_seconds: row.try_get("listened_duration_seconds")?,
            progress_percent: percent.clamp(0, 100) as u8,
            is_started: row.try_get("is_started")?,
            is_completed: row.try_get("is_completed")?,
        }))
    }

    /// Replace an audiobook's file records
    pub async fn replace_file_records(
        &mut self,
        audiobook_path: &str,
        records: &[FileRecord],
    ) -> Result<()> {
        files::replace_for_audiobook(&mut self.tx, audiobook_path, records).await
    }

    /// Ensure a folder node exists and is available
    ///
    /// Inserts a defaulted folder row when the path is new; otherwise only flips the
    /// existing row (whatever its kind) back to available.
    pub async fn materialize_folder(&mut self, path: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO library_nodes (path, parent_path, kind, display_name, is_available)
            VALUES (?, ?, 'folder', ?, 1)
            ON CONFLICT(path) DO UPDATE SET is_available = 1
            "#,
        )
        .bind(path)
        .bind(shelf_core::types::parent_path_of(path))
        .bind(shelf_core::types::leaf_name_of(path))
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    /// Drop the snapshot and commit the scan
    pub async fn end(mut self) -> Result<()> {
        sqlx::query("DROP TABLE IF EXISTS temp.scan_progress_snapshot")
            .execute(&mut *self.tx)
            .await?;
        self.tx.commit().await?;
        Ok(())
    }
}
