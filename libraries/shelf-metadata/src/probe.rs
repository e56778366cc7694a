//! Metadata probe used by the library scanner
//!
//! Tags come from the in-process decoder. Durations come from the decoder first and
//! fall back to the external tool when the decoder fails, does not support the file,
//! or reports a zero length.

use crate::container::ContainerKind;
use crate::cue::read_cue_sheet;
use crate::external::ExternalProbe;
use crate::folder::find_cue_sheet;
use crate::reader::LoftyDecoder;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shelf_core::{
    DecodedFile, DurationProbe, FileProbe, FileTags, FolderMetadata, MetadataDecoder,
    MetadataProbe, ProbeFailure,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Duration probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// External probe executable; `None` disables the fallback
    pub ffprobe_path: Option<PathBuf>,

    /// Upper bound on a single external probe run
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: Some(PathBuf::from("ffprobe")),
            timeout_secs: 10,
        }
    }
}

/// [`MetadataProbe`] backed by a [`MetadataDecoder`] and an optional external tool
pub struct AudioProbe {
    decoder: Arc<dyn MetadataDecoder>,
    external: Option<ExternalProbe>,
}

impl AudioProbe {
    /// Probe using lofty and the configured external tool
    pub fn new(config: &ProbeConfig) -> Self {
        Self::with_decoder(Arc::new(LoftyDecoder::new()), config)
    }

    pub fn with_decoder(decoder: Arc<dyn MetadataDecoder>, config: &ProbeConfig) -> Self {
        let external = config
            .ffprobe_path
            .as_ref()
            .map(|program| ExternalProbe::new(program, Duration::from_secs(config.timeout_secs)));
        Self { decoder, external }
    }

    /// Run the blocking decoder off the async executor
    async fn decode(&self, path: &Path) -> Result<DecodedFile, String> {
        if !self.decoder.supports(path) {
            return Err(format!("no in-process decoder for {}", path.display()));
        }

        let decoder = Arc::clone(&self.decoder);
        let owned = path.to_path_buf();
        match tokio::task::spawn_blocking(move || decoder.decode(&owned)).await {
            Ok(Ok(decoded)) => Ok(decoded),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(format!("decoder task failed: {e}")),
        }
    }

    fn tags_from(path: &Path, decoded: Option<&DecodedFile>) -> FileTags {
        match (ContainerKind::from_path(path), decoded) {
            (Some(kind), Some(decoded)) => kind.extract_tags(decoded),
            _ => FileTags::default(),
        }
    }

    async fn duration_from(
        &self,
        path: &Path,
        decoded: &Result<DecodedFile, String>,
    ) -> DurationProbe {
        let reason = match decoded {
            Ok(DecodedFile {
                duration: Some(secs),
                ..
            }) if *secs > 0.0 => return DurationProbe::Decoded(*secs),
            Ok(_) => "decoder reported no duration".to_string(),
            Err(e) => e.clone(),
        };

        let Some(external) = &self.external else {
            return DurationProbe::Failed(ProbeFailure::DecoderFailed(reason));
        };

        debug!(
            "Falling back to {} for {}: {}",
            external.program().display(),
            path.display(),
            reason
        );
        match external.probe_duration(path).await {
            Ok(secs) => DurationProbe::External(secs),
            Err(failure) => {
                warn!("Could not measure duration of {}: {}", path.display(), failure);
                DurationProbe::Failed(failure)
            }
        }
    }
}

#[async_trait]
impl MetadataProbe for AudioProbe {
    async fn extract_file_tags(&self, path: &Path) -> FileTags {
        let decoded = self.decode(path).await;
        if let Err(e) = &decoded {
            debug!("No tags for {}: {}", path.display(), e);
        }
        Self::tags_from(path, decoded.as_ref().ok())
    }

    async fn probe_duration(&self, path: &Path) -> DurationProbe {
        let decoded = self.decode(path).await;
        self.duration_from(path, &decoded).await
    }

    async fn probe_file(&self, path: &Path) -> FileProbe {
        let decoded = self.decode(path).await;
        FileProbe {
            tags: Self::tags_from(path, decoded.as_ref().ok()),
            duration: self.duration_from(path, &decoded).await,
        }
    }

    async fn folder_seed(&self, dir: &Path) -> FolderMetadata {
        let mut metadata = FolderMetadata::default();
        let Some(sheet_path) = find_cue_sheet(dir).await else {
            return metadata;
        };
        match read_cue_sheet(&sheet_path).await {
            Ok(sheet) => {
                metadata.author = sheet.performer;
                metadata.title = sheet.title;
                metadata.year = sheet.date;
            }
            Err(e) => warn!("Failed to read {}: {}", sheet_path.display(), e),
        }
        metadata
    }
}
