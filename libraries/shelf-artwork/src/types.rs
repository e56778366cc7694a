use crate::error::Result;
use image::codecs::jpeg::JpegEncoder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// JPEG quality for re-encoded covers
const JPEG_QUALITY: u8 = 85;

/// Artwork data extracted from an audio file
#[derive(Debug, Clone)]
pub struct ArtworkData {
    /// Raw image bytes
    pub data: Vec<u8>,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub mime_type: String,
}

impl ArtworkData {
    /// Create new artwork data
    pub fn new(data: Vec<u8>, mime_type: String) -> Self {
        Self { data, mime_type }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Labelled as JPEG and starting with the JPEG SOI marker
    pub fn is_jpeg(&self) -> bool {
        matches!(self.mime_type.as_str(), "image/jpeg" | "image/jpg")
            && self.data.starts_with(&[0xFF, 0xD8])
    }

    /// Write the artwork to `path` as a JPEG
    ///
    /// JPEG data is written as-is; any other format is decoded and re-encoded.
    pub fn write_jpeg(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if self.is_jpeg() {
            std::fs::write(path, &self.data)?;
            return Ok(());
        }

        let rgb = image::load_from_memory(&self.data)?.to_rgb8();
        let mut file = File::create(path)?;
        JpegEncoder::new_with_quality(&mut file, JPEG_QUALITY).encode_image(&rgb)?;
        file.flush()?;
        Ok(())
    }
}
