//! Folder fingerprints
//!
//! A fingerprint digests the identity of a folder's audio files (name, size and
//! modification time), never their content. Touching a file without changing it forces
//! a re-extract; in exchange no audio bytes are read for unchanged folders.

use crate::types::AudioFileEntry;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Compute the state hash of a folder's audio files
///
/// Entries are ordered by name first, so the caller's order does not matter.
pub fn compute_state_hash(files: &[AudioFileEntry]) -> String {
    let mut ordered: Vec<&AudioFileEntry> = files.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));

    let lines: Vec<String> = ordered
        .iter()
        .map(|f| format!("{}|{}|{}", f.name, f.size, f.modified))
        .collect();

    let mut hasher = Sha256::new();
    hasher.update(lines.join("\n").as_bytes());
    hex::encode(hasher.finalize())
}

/// Seconds since the Unix epoch, negative for earlier times
pub fn epoch_seconds(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs_f64(),
        Err(before) => -before.duration().as_secs_f64(),
    }
}
