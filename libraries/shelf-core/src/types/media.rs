use std::path::Path;

/// Audio extensions recognized when no configuration overrides them
pub const DEFAULT_AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "m4a", "m4b", "mp4", "ogg", "flac", "wav", "aac", "wma", "opus", "ape",
];

/// Check whether `path` has one of `extensions` (case-insensitive, without dots)
pub fn has_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|candidate| candidate.as_ref().eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
