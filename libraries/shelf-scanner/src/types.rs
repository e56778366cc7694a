//! Scanner types

use serde::{Deserialize, Serialize};
use shelf_core::types::DEFAULT_AUDIO_EXTENSIONS;
use shelf_storage::UpsertOutcome;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Scan configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extensions (without the dot) that count as audio files
    pub audio_extensions: Vec<String>,

    /// Whether to follow symbolic links while walking
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            audio_extensions: DEFAULT_AUDIO_EXTENSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            follow_links: false,
        }
    }
}

/// One audio file of a discovered folder
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFileEntry {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    /// Modification time in fractional seconds since the Unix epoch
    pub modified: f64,
}

/// A directory that directly contains at least one audio file
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredFolder {
    /// Absolute location on disk
    pub path: PathBuf,
    /// Library-relative path with `/` separators
    pub relative: String,
    /// Audio files, sorted by name
    pub audio_files: Vec<AudioFileEntry>,
}

impl DiscoveredFolder {
    /// Folder leaf name
    pub fn name(&self) -> &str {
        shelf_core::types::leaf_name_of(&self.relative)
    }
}

/// Summary of one scan
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    /// Audiobook folders discovered (the scan's headline count)
    pub folders_found: usize,
    /// Folders that went through full extraction
    pub extracted: usize,
    /// Folders skipped because their fingerprint matched
    pub unchanged: usize,
    /// Files whose duration could not be measured
    pub failed_files: usize,
    /// Ancestor folder nodes written
    pub folders_materialized: usize,
    /// Directories that could not be read
    pub skipped_dirs: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// Progress of a running scan
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Started { root: PathBuf },
    FoldersDiscovered { count: usize },
    DirectorySkipped { path: PathBuf, reason: String },
    Unchanged { path: String },
    Processed {
        path: String,
        files: usize,
        failed_files: usize,
        outcome: UpsertOutcome,
    },
    FoldersMaterialized { count: usize },
    Completed(ScanReport),
    Failed { error: String },
}

impl fmt::Display for ScanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started { root } => write!(f, "Scanning {}", root.display()),
            Self::FoldersDiscovered { count } => write!(f, "Found {} audiobook folders", count),
            Self::DirectorySkipped { path, reason } => {
                write!(f, "Skipped {}: {}", path.display(), reason)
            }
            Self::Unchanged { path } => write!(f, "Unchanged: {}", path),
            Self::Processed {
                path,
                files,
                failed_files,
                outcome,
            } => {
                let verb = match outcome {
                    UpsertOutcome::Updated => "Updated",
                    UpsertOutcome::Restored => "Restored",
                    UpsertOutcome::Inserted => "Added",
                };
                write!(f, "{} {} ({} files", verb, path, files)?;
                if *failed_files > 0 {
                    write!(f, ", {} without duration", failed_files)?;
                }
                write!(f, ")")
            }
            Self::FoldersMaterialized { count } => write!(f, "Created {} folder nodes", count),
            Self::Completed(report) => write!(
                f,
                "Scan complete: {} audiobooks ({} extracted, {} unchanged, {} failed files) in {:.1?}",
                report.folders_found,
                report.extracted,
                report.unchanged,
                report.failed_files,
                report.elapsed
            ),
            Self::Failed { error } => write!(f, "Scan failed: {}", error),
        }
    }
}
