/// Collaborator traits for the Audioshelf scanner
use crate::error::Result;
use crate::types::{DecodedFile, DurationProbe, FileProbe, FileTags, FolderMetadata};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Number of leading files consulted for folder-level metadata and embedded artwork
pub const LEADING_FILE_SAMPLE: usize = 3;

/// In-process tag and duration decoder
///
/// Implementers read container-native tag entries. A failure sends the caller to its
/// external fallback.
pub trait MetadataDecoder: Send + Sync {
    /// Check if the decoder can open the given file
    fn supports(&self, path: &Path) -> bool;

    /// Read native tag entries and duration
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    fn decode(&self, path: &Path) -> Result<DecodedFile>;
}

/// Per-file tag and duration extraction used by the scanner
///
/// None of these methods fail: unreadable tags come back empty and unmeasurable
/// durations come back as [`DurationProbe::Failed`].
#[async_trait]
pub trait MetadataProbe: Send + Sync {
    /// Extract cleaned tags from one audio file
    async fn extract_file_tags(&self, path: &Path) -> FileTags;

    /// Measure one audio file's duration
    async fn probe_duration(&self, path: &Path) -> DurationProbe;

    /// Tags and duration of one file
    ///
    /// Implementations that decode both in one pass should override this.
    async fn probe_file(&self, path: &Path) -> FileProbe {
        FileProbe {
            tags: self.extract_file_tags(path).await,
            duration: self.probe_duration(path).await,
        }
    }

    /// Folder-level metadata that takes precedence over file tags
    ///
    /// Empty unless the implementation reads a folder-wide source such as a CUE sheet.
    async fn folder_seed(&self, _dir: &Path) -> FolderMetadata {
        FolderMetadata::default()
    }

    /// Merge tags of the leading files of an audiobook folder
    ///
    /// Starts from [`folder_seed`](Self::folder_seed), then takes the first non-empty
    /// value per field and stops as soon as every field is set.
    async fn extract_folder_metadata(&self, files: &[PathBuf]) -> FolderMetadata {
        let mut metadata = match files.first().and_then(|f| f.parent()) {
            Some(dir) => self.folder_seed(dir).await,
            None => FolderMetadata::default(),
        };
        for file in files.iter().take(LEADING_FILE_SAMPLE) {
            if metadata.is_complete() {
                break;
            }
            let tags = self.extract_file_tags(file).await;
            metadata.fill_from(&tags);
        }
        metadata
    }
}

/// Locates or extracts cover art for an audiobook folder
pub trait CoverResolver: Send + Sync {
    /// Resolve a cover image for `folder`
    ///
    /// `stable_key` is the audiobook's relative library path; extracted art is cached
    /// under a name derived from it.
    fn resolve_cover(&self, folder: &Path, stable_key: &str) -> Option<PathBuf>;
}
