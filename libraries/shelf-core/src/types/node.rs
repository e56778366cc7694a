//! Library node types
//!
//! A library node is one catalog row: either an audiobook folder (a directory that
//! directly holds audio files) or a folder materialized because it contains audiobooks.
//! Paths are relative to the library root and always use `/` as the separator.

use serde::{Deserialize, Serialize};

/// Kind of library node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Intermediate folder without audio files of its own
    Folder,
    /// Folder that directly contains audio files
    Audiobook,
}

impl NodeKind {
    /// Convert to string for database storage
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Audiobook => "audiobook",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "folder" => Some(Self::Folder),
            "audiobook" => Some(Self::Audiobook),
            _ => None,
        }
    }
}

/// One catalog row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryNode {
    /// Path relative to the library root (natural key)
    pub path: String,

    /// Parent path, empty for root-level nodes
    pub parent_path: String,

    pub kind: NodeKind,

    /// Folder name as found on disk
    pub display_name: String,

    // Heuristic-derived, user-facing fields
    pub author: String,
    pub title: String,
    pub narrator: String,

    // Raw tag-derived fields
    pub tag_author: String,
    pub tag_title: String,
    pub tag_narrator: String,
    pub tag_year: String,

    /// Resolved cover image location
    pub cover_path: Option<String>,

    /// Number of file records (0 for folders)
    pub file_count: i64,

    /// Sum of file durations (0 for folders)
    pub total_duration_seconds: f64,

    /// Fingerprint of the constituent audio files (None for folders)
    pub state_hash: Option<String>,

    /// Playback state owned by the user, never reset by a rescan
    pub progress: PlaybackProgress,

    /// UI tree state
    pub is_expanded: bool,

    /// Whether the node was confirmed present by the most recent scan
    pub is_available: bool,
}

impl LibraryNode {
    /// Create a folder node with defaulted fields
    pub fn folder(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            parent_path: parent_path_of(&path).to_string(),
            display_name: leaf_name_of(&path).to_string(),
            path,
            kind: NodeKind::Folder,
            author: String::new(),
            title: String::new(),
            narrator: String::new(),
            tag_author: String::new(),
            tag_title: String::new(),
            tag_narrator: String::new(),
            tag_year: String::new(),
            cover_path: None,
            file_count: 0,
            total_duration_seconds: 0.0,
            state_hash: None,
            progress: PlaybackProgress::default(),
            is_expanded: false,
            is_available: true,
        }
    }

    pub fn is_audiobook(&self) -> bool {
        self.kind == NodeKind::Audiobook
    }
}

/// User-owned playback state of an audiobook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackProgress {
    pub current_file_index: i64,
    pub current_position_seconds: f64,
    pub playback_speed: f64,
    pub listened_duration_seconds: f64,
    /// 0-100
    pub progress_percent: u8,
    pub is_started: bool,
    pub is_completed: bool,
}

impl Default for PlaybackProgress {
    fn default() -> Self {
        Self {
            current_file_index: 0,
            current_position_seconds: 0.0,
            playback_speed: 1.0,
            listened_duration_seconds: 0.0,
            progress_percent: 0,
            is_started: false,
            is_completed: false,
        }
    }
}

/// Scan-derived fields of an audiobook, as written by the scanner
///
/// Carries no progress fields: those are copied forward by the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudiobookRecord {
    pub path: String,
    pub parent_path: String,
    pub display_name: String,
    pub author: String,
    pub title: String,
    pub narrator: String,
    pub tag_author: String,
    pub tag_title: String,
    pub tag_narrator: String,
    pub tag_year: String,
    pub cover_path: Option<String>,
    pub file_count: i64,
    pub total_duration_seconds: f64,
    pub state_hash: String,
}

/// Parent of a relative library path (`""` for root-level paths)
pub fn parent_path_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Last segment of a relative library path
pub fn leaf_name_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_and_leaf_of_nested_path() {
        assert_eq!(parent_path_of("A/B/book"), "A/B");
        assert_eq!(leaf_name_of("A/B/book"), "book");
    }

    #[test]
    fn parent_of_root_level_path_is_empty() {
        assert_eq!(parent_path_of("book"), "");
        assert_eq!(leaf_name_of("book"), "book");
    }

    #[test]
    fn folder_node_defaults() {
        let node = LibraryNode::folder("A/B");
        assert_eq!(node.parent_path, "A");
        assert_eq!(node.display_name, "B");
        assert!(node.is_available);
        assert!(node.state_hash.is_none());
        assert_eq!(node.progress, PlaybackProgress::default());
    }

    #[test]
    fn node_kind_round_trips_through_storage_string() {
        for kind in [NodeKind::Folder, NodeKind::Audiobook] {
            assert_eq!(NodeKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(NodeKind::from_str("track"), None);
    }

    #[test]
    fn node_serializes_camel_case() {
        let json = serde_json::to_value(LibraryNode::folder("A")).unwrap();
        assert_eq!(json["displayName"], "A");
        assert_eq!(json["kind"], "folder");
        assert_eq!(json["progress"]["playbackSpeed"], 1.0);
    }
}
