use serde::{Deserialize, Serialize};

/// One audio file belonging to an audiobook node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Owning audiobook path
    pub audiobook_path: String,

    /// File path relative to the library root
    pub file_path: String,

    pub file_name: String,

    pub track_number: i64,

    /// 0 when neither the decoder nor the external tool could measure it
    pub duration_seconds: f64,

    // Tag-derived fields
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub comment: String,
}
