//! File records of audiobook nodes

use crate::Result;
use shelf_core::FileRecord;
use sqlx::{Row, SqliteConnection, SqlitePool};

/// File records of an audiobook in insertion order
pub async fn get_for_audiobook(pool: &SqlitePool, audiobook_path: &str) -> Result<Vec<FileRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT audiobook_path, file_path, file_name, track_number, duration_seconds,
               title, artist, album, genre, comment
        FROM file_records
        WHERE audiobook_path = ?
        ORDER BY id
        "#,
    )
    .bind(audiobook_path)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(FileRecord {
                audiobook_path: row.try_get("audiobook_path")?,
                file_path: row.try_get("file_path")?,
                file_name: row.try_get("file_name")?,
                track_number: row.try_get("track_number")?,
                duration_seconds: row.try_get("duration_seconds")?,
                title: row.try_get("title")?,
                artist: row.try_get("artist")?,
                album: row.try_get("album")?,
                genre: row.try_get("genre")?,
                comment: row.try_get("comment")?,
            })
        })
        .collect()
}

/// Replace all file records of an audiobook, keeping the given order
pub async fn replace_for_audiobook(
    conn: &mut SqliteConnection,
    audiobook_path: &str,
    files: &[FileRecord],
) -> Result<()> {
    sqlx::query("DELETE FROM file_records WHERE audiobook_path = ?")
        .bind(audiobook_path)
        .execute(&mut *conn)
        .await?;

    for file in files {
        sqlx::query(
            r#"
            INSERT INTO file_records
                (audiobook_path, file_path, file_name, track_number, duration_seconds,
                 title, artist, album, genre, comment)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(audiobook_path)
        .bind(&file.file_path)
        .bind(&file.file_name)
        .bind(file.track_number)
        .bind(file.duration_seconds)
        .bind(&file.title)
        .bind(&file.artist)
        .bind(&file.album)
        .bind(&file.genre)
        .bind(&file.comment)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}
