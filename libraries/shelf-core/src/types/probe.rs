//! Probe result types
//!
//! Per-file failures travel as values, so the scanner can tally them without
//! unwinding through component boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::FileTags;

/// A raw container-native tag entry, e.g. `TPE1` or `©nrt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagField {
    pub key: String,
    pub value: String,
}

impl TagField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// What an in-process decoder reports for one file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedFile {
    /// Native tag entries in container order
    pub fields: Vec<TagField>,
    /// Duration in seconds, `None` when the container does not report one
    pub duration: Option<f64>,
}

impl DecodedFile {
    /// First non-empty value stored under `key` (case-insensitive)
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key.eq_ignore_ascii_case(key) && !f.value.trim().is_empty())
            .map(|f| f.value.as_str())
    }
}

/// Why a duration could not be measured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeFailure {
    /// The in-process decoder failed and no external tool is configured
    DecoderFailed(String),
    /// The external tool could not be started or exited unsuccessfully
    ToolFailed(String),
    /// The external tool did not finish within its time limit
    TimedOut,
    /// The tool ran but printed no usable duration
    Unparseable(String),
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecoderFailed(reason) => write!(f, "decoder failed: {reason}"),
            Self::ToolFailed(reason) => write!(f, "external probe failed: {reason}"),
            Self::TimedOut => f.write_str("external probe timed out"),
            Self::Unparseable(output) => write!(f, "unparseable probe output: {output:?}"),
        }
    }
}

/// Outcome of a duration probe
#[derive(Debug, Clone, PartialEq)]
pub enum DurationProbe {
    /// Measured by the in-process decoder
    Decoded(f64),
    /// Measured by the external tool
    External(f64),
    Failed(ProbeFailure),
}

impl DurationProbe {
    /// Duration in seconds, 0 for a failed probe
    pub fn seconds(&self) -> f64 {
        match self {
            Self::Decoded(secs) | Self::External(secs) => *secs,
            Self::Failed(_) => 0.0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Tags and duration of one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileProbe {
    pub tags: FileTags,
    pub duration: DurationProbe,
}
