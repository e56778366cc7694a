//! Container kinds and their native tag keys
//!
//! Each container family names the same concept differently (`TPE1` vs `©ART` vs
//! `ARTIST`). The key tables below list, per field, the native names consulted in
//! priority order.

use crate::text::repair_encoding;
use shelf_core::{DecodedFile, FileTags};
use std::path::Path;

/// Tag container family, selected by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// ID3v2 (MP3, raw AAC)
    Id3,
    /// iTunes-style ilst atoms (M4A, M4B, MP4)
    Mp4,
    /// Vorbis comments (FLAC, Ogg, Opus)
    Vorbis,
    /// APEv2 (Monkey's Audio, WavPack, Musepack)
    Ape,
    /// RIFF INFO chunk (WAV)
    Riff,
}

/// Native key names per field, in priority order
#[derive(Debug)]
pub struct ContainerKeys {
    pub title: &'static [&'static str],
    pub author: &'static [&'static str],
    pub album: &'static [&'static str],
    pub year: &'static [&'static str],
    pub genre: &'static [&'static str],
    pub comment: &'static [&'static str],
    pub narrator: &'static [&'static str],
    pub track: &'static [&'static str],
}

const ID3_KEYS: ContainerKeys = ContainerKeys {
    title: &["TIT2"],
    author: &["TPE1"],
    album: &["TALB"],
    year: &["TDRC", "TYER"],
    genre: &["TCON"],
    comment: &["COMM"],
    narrator: &["TPE2", "TOPE", "TXXX:NARRATOR", "NARRATOR", "READER", "NARRATED BY"],
    track: &["TRCK"],
};

const MP4_KEYS: ContainerKeys = ContainerKeys {
    title: &["©nam"],
    // album atom stands in when the artist atom is empty
    author: &["©ART", "©alb"],
    album: &["©alb"],
    year: &["©day"],
    genre: &["©gen"],
    comment: &["©cmt"],
    narrator: &["©nrt", "©wrt", "aART"],
    track: &["trkn"],
};

const VORBIS_KEYS: ContainerKeys = ContainerKeys {
    title: &["TITLE"],
    author: &["ARTIST"],
    album: &["ALBUM"],
    year: &["DATE", "YEAR"],
    genre: &["GENRE"],
    comment: &["COMMENT", "DESCRIPTION"],
    narrator: &["NARRATOR", "COMPOSER", "PERFORMER"],
    track: &["TRACKNUMBER"],
};

const APE_KEYS: ContainerKeys = ContainerKeys {
    title: &["Title"],
    author: &["Artist"],
    album: &["Album"],
    year: &["Year"],
    genre: &["Genre"],
    comment: &["Comment"],
    narrator: &["Reader", "Narrator", "Composer"],
    track: &["Track"],
};

const RIFF_KEYS: ContainerKeys = ContainerKeys {
    title: &["INAM"],
    author: &["IART"],
    album: &["IPRD"],
    year: &["ICRD"],
    genre: &["IGNR"],
    comment: &["ICMT"],
    narrator: &[],
    track: &["IPRT", "ITRK"],
};

impl ContainerKind {
    /// Pick the container family for a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" | "aac" => Some(Self::Id3),
            "m4a" | "m4b" | "mp4" => Some(Self::Mp4),
            "flac" | "ogg" | "opus" | "oga" => Some(Self::Vorbis),
            "ape" | "wv" | "mpc" => Some(Self::Ape),
            "wav" => Some(Self::Riff),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn keys(&self) -> &'static ContainerKeys {
        match self {
            Self::Id3 => &ID3_KEYS,
            Self::Mp4 => &MP4_KEYS,
            Self::Vorbis => &VORBIS_KEYS,
            Self::Ape => &APE_KEYS,
            Self::Riff => &RIFF_KEYS,
        }
    }

    /// Map decoded native entries onto cleaned [`FileTags`]
    pub fn extract_tags(&self, decoded: &DecodedFile) -> FileTags {
        let keys = self.keys();
        let lookup = |candidates: &[&str]| -> String {
            candidates
                .iter()
                .filter_map(|key| decoded.field(key))
                .map(clean_tag_value)
                .find(|value| !value.is_empty())
                .unwrap_or_default()
        };

        FileTags {
            title: lookup(keys.title),
            author: lookup(keys.author),
            album: lookup(keys.album),
            year: lookup(keys.year),
            genre: lookup(keys.genre),
            comment: lookup(keys.comment),
            narrator: lookup(keys.narrator),
            track: keys
                .track
                .iter()
                .filter_map(|key| decoded.field(key))
                .find_map(parse_track_number),
        }
    }
}

/// Trim, repair encoding and blank out placeholder values
pub fn clean_tag_value(raw: &str) -> String {
    let repaired = repair_encoding(raw.trim());
    let value = repaired.trim();
    if ["none", "[none]", "unknown"]
        .iter()
        .any(|placeholder| value.eq_ignore_ascii_case(placeholder))
    {
        return String::new();
    }
    value.to_string()
}

/// Leading integer of a track value such as `3` or `3/12`
pub fn parse_track_number(raw: &str) -> Option<u32> {
    raw.split('/').next()?.trim().parse().ok()
}
