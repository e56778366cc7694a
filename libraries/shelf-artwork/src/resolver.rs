//! Cover resolution for audiobook folders
//!
//! Lookup order:
//! 1. a file named like one of the configured cover names (case-insensitive)
//! 2. any file with an image extension
//! 3. a previously cached extraction for the same audiobook
//! 4. artwork embedded in one of the first audio files, written to the cache

use crate::extractor::ArtworkExtractor;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shelf_core::types::{has_extension, DEFAULT_AUDIO_EXTENSIONS};
use shelf_core::{CoverResolver, LEADING_FILE_SAMPLE};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Cover lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Canonical cover file names, in priority order
    pub names: Vec<String>,

    /// Extensions accepted for any-image fallback
    pub image_extensions: Vec<String>,

    /// Directory for extracted embedded artwork
    pub cache_dir: PathBuf,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            names: ["cover.jpg", "cover.png", "cover.jpeg", "folder.jpg", "folder.png"]
                .map(String::from)
                .to_vec(),
            image_extensions: ["jpg", "jpeg", "png", "bmp"].map(String::from).to_vec(),
            cache_dir: PathBuf::from("./data/extracted_covers"),
        }
    }
}

/// Cache file name for an audiobook's extracted cover
///
/// SHA-256 of the relative library path, so the name survives restarts.
pub fn cover_cache_name(stable_key: &str) -> String {
    let digest = Sha256::digest(stable_key.as_bytes());
    format!("{}.jpg", hex::encode(digest))
}

/// Filesystem-backed [`CoverResolver`]
pub struct FolderCoverResolver {
    config: CoverConfig,
    audio_extensions: Vec<String>,
    extractor: ArtworkExtractor,
}

impl FolderCoverResolver {
    pub fn new(config: CoverConfig) -> Self {
        Self {
            config,
            audio_extensions: DEFAULT_AUDIO_EXTENSIONS.iter().map(|s| (*s).to_string()).collect(),
            extractor: ArtworkExtractor::new(),
        }
    }

    /// Restrict embedded-art lookup to these audio extensions
    #[must_use]
    pub fn with_audio_extensions(mut self, extensions: Vec<String>) -> Self {
        self.audio_extensions = extensions;
        self
    }

    pub fn cache_path(&self, stable_key: &str) -> PathBuf {
        self.config.cache_dir.join(cover_cache_name(stable_key))
    }

    fn named_cover(&self, files: &[PathBuf]) -> Option<PathBuf> {
        self.config.names.iter().find_map(|name| {
            files
                .iter()
                .find(|file| {
                    file.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.eq_ignore_ascii_case(name))
                })
                .cloned()
        })
    }

    fn any_image(&self, files: &[PathBuf]) -> Option<PathBuf> {
        files
            .iter()
            .find(|file| has_extension(file, &self.config.image_extensions))
            .cloned()
    }

    fn extract_embedded(&self, files: &[PathBuf], cache_path: &Path) -> Option<PathBuf> {
        let audio_files = files
            .iter()
            .filter(|file| has_extension(file, &self.audio_extensions))
            .take(LEADING_FILE_SAMPLE);

        for file in audio_files {
            let artwork = match self.extractor.extract(file) {
                Ok(Some(artwork)) if !artwork.is_empty() => artwork,
                Ok(_) => continue,
                Err(e) => {
                    debug!("No embedded artwork in {}: {}", file.display(), e);
                    continue;
                }
            };

            if let Err(e) = artwork.write_jpeg(cache_path) {
                warn!("Failed to cache cover {}: {}", cache_path.display(), e);
                let _ = std::fs::remove_file(cache_path);
                return None;
            }
            return Some(cache_path.to_path_buf());
        }

        None
    }
}

/// Regular files directly in `folder`, sorted by name
fn list_files(folder: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        if entry.file_type().is_ok_and(|t| t.is_file()) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

impl CoverResolver for FolderCoverResolver {
    fn resolve_cover(&self, folder: &Path, stable_key: &str) -> Option<PathBuf> {
        let files = match list_files(folder) {
            Ok(files) => files,
            Err(e) => {
                warn!("Cannot list {} for covers: {}", folder.display(), e);
                return None;
            }
        };

        if let Some(cover) = self.named_cover(&files).or_else(|| self.any_image(&files)) {
            return Some(cover);
        }

        let cache_path = self.cache_path(stable_key);
        if cache_path.is_file() {
            return Some(cache_path);
        }

        self.extract_embedded(&files, &cache_path)
    }
}
