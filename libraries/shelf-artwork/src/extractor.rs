use crate::error::{ArtworkError, Result};
use crate::types::ArtworkData;
use lofty::{PictureType, TaggedFileExt};
use std::path::Path;
use tracing::warn;

/// Maximum artwork size (5MB)
const MAX_ARTWORK_SIZE: usize = 5 * 1024 * 1024;

/// Extracts embedded artwork from audio files
#[derive(Debug, Default, Clone, Copy)]
pub struct ArtworkExtractor;

impl ArtworkExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract artwork from an audio file
    ///
    /// Returns `Ok(Some(artwork))` if artwork found, `Ok(None)` if no artwork,
    /// or `Err` if there was an error reading the file.
    pub fn extract(&self, path: &Path) -> Result<Option<ArtworkData>> {
        if !path.exists() {
            return Err(ArtworkError::FileNotFound(path.to_path_buf()));
        }

        let tagged_file = lofty::read_from_path(path)?;

        // Primary tag first, then any other tag carrying pictures
        let tag = tagged_file
            .primary_tag()
            .filter(|tag| !tag.pictures().is_empty())
            .or_else(|| tagged_file.tags().iter().find(|tag| !tag.pictures().is_empty()));

        let Some(tag) = tag else {
            return Ok(None);
        };

        // Prefer front cover, otherwise use first picture
        let pictures = tag.pictures();
        let Some(picture) = pictures
            .iter()
            .find(|p| matches!(p.pic_type(), PictureType::CoverFront))
            .or_else(|| pictures.first())
        else {
            return Ok(None);
        };

        let data = picture.data();
        if data.len() > MAX_ARTWORK_SIZE {
            warn!(
                "Artwork in {} is too large ({} bytes, max {} bytes), skipping",
                path.display(),
                data.len(),
                MAX_ARTWORK_SIZE
            );
            return Err(ArtworkError::TooLarge(data.len(), MAX_ARTWORK_SIZE));
        }

        let mime_type = picture
            .mime_type()
            .map_or_else(|| "image/jpeg".to_string(), |m| m.as_str().to_string());

        Ok(Some(ArtworkData::new(data.to_vec(), mime_type)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_nonexistent_file_returns_error() {
        let extractor = ArtworkExtractor::new();
        let result = extractor.extract(Path::new("/nonexistent/file.mp3"));
        assert!(matches!(result, Err(ArtworkError::FileNotFound(_))));
    }
}
