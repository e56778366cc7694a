//! Playback progress writes
//!
//! These are user actions and are never issued by a scan.
//!
//! # Example
//!
//! ```rust,no_run
//! use shelf_storage::{progress, ProgressUpdate};
//!
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! progress::save(pool, "Tolkien/The Hobbit", &ProgressUpdate {
//!     current_file_index: 3,
//!     current_position_seconds: 812.5,
//!     playback_speed: 1.25,
//!     listened_duration_seconds: 5400.0,
//!     progress_percent: 42,
//! }).await?;
//!
//! progress::mark_completed(pool, "Tolkien/The Hobbit").await?;
//! # Ok(())
//! # }
//! ```

use crate::{Result, StorageError};
use sqlx::SqlitePool;

/// Playback position reported by a player
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub current_file_index: i64,
    pub current_position_seconds: f64,
    pub playback_speed: f64,
    pub listened_duration_seconds: f64,
    /// 0-100, larger values are clamped
    pub progress_percent: u8,
}

fn ensure_updated(rows_affected: u64, path: &str) -> Result<()> {
    if rows_affected == 0 {
        return Err(StorageError::not_found("Audiobook", path));
    }
    Ok(())
}

/// Save playback progress
///
/// An audiobook counts as started once any progress is recorded and stays started;
/// it is completed while the percentage is 100.
pub async fn save(pool: &SqlitePool, path: &str, update: &ProgressUpdate) -> Result<()> {
    let percent = i64::from(update.progress_percent.min(100));

    let result = sqlx::query(
        r#"
        UPDATE library_nodes
        SET current_file_index = ?,
            current_position_seconds = ?,
            playback_speed = ?,
            listened_duration_seconds = ?,
            progress_percent = ?,
            is_started = CASE WHEN is_started = 1 OR ? > 0 THEN 1 ELSE 0 END,
            is_completed = CASE WHEN ? >= 100 THEN 1 ELSE 0 END
        WHERE path = ? AND kind = 'audiobook'
        "#,
    )
    .bind(update.current_file_index)
    .bind(update.current_position_seconds)
    .bind(update.playback_speed)
    .bind(update.listened_duration_seconds)
    .bind(percent)
    .bind(percent)
    .bind(percent)
    .bind(path)
    .execute(pool)
    .await?;

    ensure_updated(result.rows_affected(), path)
}

/// Mark an audiobook as fully listened
pub async fn mark_completed(pool: &SqlitePool, path: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE library_nodes
        SET listened_duration_seconds = total_duration_seconds,
            progress_percent = 100,
            is_started = 1,
            is_completed = 1
        WHERE path = ? AND kind = 'audiobook'
        "#,
    )
    .bind(path)
    .execute(pool)
    .await?;

    ensure_updated(result.rows_affected(), path)
}

/// Reset an audiobook to not started
///
/// The playback speed is a listener preference and is kept.
pub async fn reset(pool: &SqlitePool, path: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE library_nodes
        SET current_file_index = 0,
            current_position_seconds = 0,
            listened_duration_seconds = 0,
            progress_percent = 0,
            is_started = 0,
            is_completed = 0
        WHERE path = ? AND kind = 'audiobook'
        "#,
    )
    .bind(path)
    .execute(pool)
    .await?;

    ensure_updated(result.rows_affected(), path)
}

/// Change only the playback speed
pub async fn set_playback_speed(pool: &SqlitePool, path: &str, speed: f64) -> Result<()> {
    let result = sqlx::query(
        "UPDATE library_nodes SET playback_speed = ? WHERE path = ? AND kind = 'audiobook'",
    )
    .bind(speed)
    .bind(path)
    .execute(pool)
    .await?;

    ensure_updated(result.rows_affected(), path)
}
