/// In-process decoder implementation using lofty
use crate::error::MetadataError;
use lofty::{AudioFile, TaggedFileExt};
use shelf_core::{DecodedFile, MetadataDecoder, TagField};
use std::path::Path;

/// Extensions lofty can open
const LOFTY_EXTENSIONS: &[&str] = &[
    "mp3", "aac", "m4a", "m4b", "mp4", "flac", "ogg", "opus", "oga", "ape", "wv", "mpc", "wav",
    "aiff",
];

/// Decoder backed by the lofty library
///
/// Reports tag entries under their container-native key names (`TPE1`, `©ART`,
/// `ARTIST`...), primary tag first.
pub struct LoftyDecoder;

impl LoftyDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    fn fields_from_tag(tag: &lofty::Tag, fields: &mut Vec<TagField>) {
        let tag_type = tag.tag_type();
        for item in tag.items() {
            let Some(value) = item.value().text() else {
                continue;
            };
            // unknown keys keep their raw name
            if let Some(key) = item.key().map_key(tag_type, true) {
                fields.push(TagField::new(key, value));
            }
        }
    }
}

impl Default for LoftyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataDecoder for LoftyDecoder {
    fn supports(&self, path: &Path) -> bool {
        shelf_core::types::has_extension(path, LOFTY_EXTENSIONS)
    }

    fn decode(&self, path: &Path) -> shelf_core::Result<DecodedFile> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()).into());
        }
        if !self.supports(path) {
            return Err(MetadataError::UnsupportedFormat(path.display().to_string()).into());
        }

        let tagged_file = lofty::read_from_path(path).map_err(MetadataError::from)?;

        let duration = tagged_file.properties().duration().as_secs_f64();
        let duration = (duration > 0.0).then_some(duration);

        let mut fields = Vec::new();
        let primary_type = tagged_file.primary_tag().map(lofty::Tag::tag_type);
        if let Some(primary) = tagged_file.primary_tag() {
            Self::fields_from_tag(primary, &mut fields);
        }
        for tag in tagged_file.tags() {
            if Some(tag.tag_type()) != primary_type {
                Self::fields_from_tag(tag, &mut fields);
            }
        }

        Ok(DecodedFile { fields, duration })
    }
}
