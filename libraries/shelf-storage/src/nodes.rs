//! Library node queries
//!
//! Read-side access to `library_nodes` plus the UI tree state. Scan-time writes live in
//! [`crate::scan_session`], playback writes in [`crate::progress`].

use crate::{Result, StorageError};
use shelf_core::{LibraryFilter, LibraryNode, NodeKind, PlaybackProgress};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Column list matching [`node_from_row`]
pub(crate) const NODE_COLUMNS: &str = "path, parent_path, kind, display_name, \
    author, title, narrator, tag_author, tag_title, tag_narrator, tag_year, \
    cover_path, file_count, total_duration_seconds, state_hash, \
    current_file_index, current_position_seconds, playback_speed, \
    listened_duration_seconds, progress_percent, is_started, is_completed, \
    is_expanded, is_available";

/// Folders first, then by display name
const NODE_ORDER: &str =
    "ORDER BY CASE kind WHEN 'folder' THEN 0 ELSE 1 END, display_name COLLATE NOCASE, path";

pub(crate) fn node_from_row(row: &SqliteRow) -> Result<LibraryNode> {
    let kind: String = row.try_get("kind")?;
    let kind = NodeKind::from_str(&kind)
        .ok_or_else(|| StorageError::InvalidData(format!("unknown node kind '{kind}'")))?;
    let progress_percent: i64 = row.try_get("progress_percent")?;

    Ok(LibraryNode {
        path: row.try_get("path")?,
        parent_path: row.try_get("parent_path")?,
        kind,
        display_name: row.try_get("display_name")?,
        author: row.try_get("author")?,
        title: row.try_get("title")?,
        narrator: row.try_get("narrator")?,
        tag_author: row.try_get("tag_author")?,
        tag_title: row.try_get("tag_title")?,
        tag_narrator: row.try_get("tag_narrator")?,
        tag_year: row.try_get("tag_year")?,
        cover_path: row.try_get("cover_path")?,
        file_count: row.try_get("file_count")?,
        total_duration_seconds: row.try_get("total_duration_seconds")?,
        state_hash: row.try_get("state_hash")?,
        progress: PlaybackProgress {
            current_file_index: row.try_get("current_file_index")?,
            current_position_seconds: row.try_get("current_position_seconds")?,
            playback_speed: row.try_get("playback_speed")?,
            listened_duration_seconds: row.try_get("listened_duration_seconds")?,
            progress_percent: progress_percent.clamp(0, 100) as u8,
            is_started: row.try_get("is_started")?,
            is_completed: row.try_get("is_completed")?,
        },
        is_expanded: row.try_get("is_expanded")?,
        is_available: row.try_get("is_available")?,
    })
}

/// Get a node by its relative path
pub async fn get_by_path(pool: &SqlitePool, path: &str) -> Result<Option<LibraryNode>> {
    let sql = format!("SELECT {NODE_COLUMNS} FROM library_nodes WHERE path = ?");
    let row = sqlx::query(&sql).bind(path).fetch_optional(pool).await?;
    row.as_ref().map(node_from_row).transpose()
}

/// Available direct children of `parent_path` (`""` for the root level)
pub async fn get_children(pool: &SqlitePool, parent_path: &str) -> Result<Vec<LibraryNode>> {
    let sql = format!(
        "SELECT {NODE_COLUMNS} FROM library_nodes \
         WHERE parent_path = ? AND is_available = 1 {NODE_ORDER}"
    );
    let rows = sqlx::query(&sql).bind(parent_path).fetch_all(pool).await?;
    rows.iter().map(node_from_row).collect()
}

/// Available nodes matching `filter`
///
/// For every filter other than [`LibraryFilter::All`], the matching audiobooks are
/// returned together with every ancestor up to the root, so the result always forms
/// a connected tree. An ancestor that is itself an audiobook is included whether or
/// not it matches.
pub async fn get_filtered(pool: &SqlitePool, filter: LibraryFilter) -> Result<Vec<LibraryNode>> {
    let condition = match filter {
        LibraryFilter::All => {
            let sql = format!(
                "SELECT {NODE_COLUMNS} FROM library_nodes WHERE is_available = 1 {NODE_ORDER}"
            );
            let rows = sqlx::query(&sql).fetch_all(pool).await?;
            return rows.iter().map(node_from_row).collect();
        }
        LibraryFilter::NotStarted => "is_started = 0",
        LibraryFilter::InProgress => "is_started = 1 AND is_completed = 0",
        LibraryFilter::Completed => "is_completed = 1",
    };

    let sql = format!(
        r#"
        WITH RECURSIVE
        matching AS (
            SELECT path, parent_path
            FROM library_nodes
            WHERE kind = 'audiobook' AND is_available = 1 AND {condition}
        ),
        ancestors(path, parent_path) AS (
            SELECT p.path, p.parent_path
            FROM library_nodes p
            WHERE p.path IN (SELECT parent_path FROM matching)
            UNION
            SELECT p.path, p.parent_path
            FROM library_nodes p
            INNER JOIN ancestors a ON p.path = a.parent_path
        )
        SELECT {NODE_COLUMNS}
        FROM library_nodes
        WHERE path IN (SELECT path FROM matching UNION SELECT path FROM ancestors)
        {NODE_ORDER}
        "#
    );

    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    rows.iter().map(node_from_row).collect()
}

/// Total number of nodes, available or not
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM library_nodes")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Persist the expanded/collapsed state of a node in the library tree
pub async fn set_expanded(pool: &SqlitePool, path: &str, is_expanded: bool) -> Result<()> {
    let result = sqlx::query("UPDATE library_nodes SET is_expanded = ? WHERE path = ?")
        .bind(is_expanded)
        .bind(path)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Library node", path));
    }
    Ok(())
}
