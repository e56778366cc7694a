//! Audiobook folder discovery

use crate::fingerprint::epoch_seconds;
use crate::types::{AudioFileEntry, DiscoveredFolder, ScanConfig};
use crate::{Result, ScanError};
use shelf_core::types::has_extension;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Result of walking a library root
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Folders with audio files, in walk order (sorted by file name per level)
    pub folders: Vec<DiscoveredFolder>,
    /// Directories that could not be read, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

impl WalkOutcome {
    fn skip(&mut self, path: PathBuf, reason: String) {
        if !self.skipped.iter().any(|(seen, _)| *seen == path) {
            tracing::warn!("Skipping unreadable directory {}: {}", path.display(), reason);
            self.skipped.push((path, reason));
        }
    }
}

/// Finds every directory below a root that directly contains audio files
///
/// The root itself is never an audiobook. Unreadable directories are skipped and
/// reported; the walk carries on with their siblings.
pub struct FolderWalker {
    extensions: Vec<String>,
    follow_links: bool,
}

impl Default for FolderWalker {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

impl FolderWalker {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            extensions: config.audio_extensions.clone(),
            follow_links: config.follow_links,
        }
    }

    /// Walk `root`, returning audiobook folders and skipped directories
    pub fn discover(&self, root: &Path) -> Result<WalkOutcome> {
        if !root.exists() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut outcome = WalkOutcome::default();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name();

        for item in walker {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(root).to_path_buf();
                    outcome.skip(path, err.to_string());
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            match self.read_folder(root, entry.path()) {
                Ok(Some(folder)) => outcome.folders.push(folder),
                Ok(None) => {}
                Err(err) => outcome.skip(entry.path().to_path_buf(), err.to_string()),
            }
        }

        Ok(outcome)
    }

    fn read_folder(&self, root: &Path, dir: &Path) -> std::io::Result<Option<DiscoveredFolder>> {
        let mut audio_files = Vec::new();

        for item in fs::read_dir(dir)? {
            let Ok(item) = item else { continue };
            let path = item.path();
            if !has_extension(&path, &self.extensions) {
                continue;
            }

            let metadata = match fs::metadata(&path) {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(err) => {
                    tracing::debug!("Cannot stat {}: {}", path.display(), err);
                    continue;
                }
            };

            audio_files.push(AudioFileEntry {
                name: item.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                modified: metadata.modified().map(epoch_seconds).unwrap_or(0.0),
                path,
            });
        }

        if audio_files.is_empty() {
            return Ok(None);
        }
        audio_files.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Some(DiscoveredFolder {
            relative: relative_library_path(root, dir),
            path: dir.to_path_buf(),
            audio_files,
        }))
    }
}

/// Library-relative path of `dir` joined with `/` on every platform
pub fn relative_library_path(root: &Path, dir: &Path) -> String {
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
