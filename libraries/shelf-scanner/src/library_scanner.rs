//! Library scan orchestration
//!
//! One scan walks the root, re-confirms folders whose fingerprint is unchanged, fully
//! extracts the rest and finally materializes the folder nodes above every audiobook.
//! All writes go through a single [`ScanSession`], so a scan that fails midway leaves
//! the catalog as it was.

use crate::fingerprint::compute_state_hash;
use crate::types::{DiscoveredFolder, ScanConfig, ScanEvent, ScanReport};
use crate::walker::FolderWalker;
use crate::{Result, ScanError};
use shelf_core::types::parent_path_of;
use shelf_core::{
    AudiobookRecord, CoverResolver, DurationProbe, FileRecord, MetadataProbe, LEADING_FILE_SAMPLE,
};
use shelf_metadata::{merge_identity, parse_folder_name};
use shelf_storage::{CatalogStore, ScanSession, UpsertOutcome};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Buffered events before a slow consumer holds the scan back
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Scans an audiobook library into the catalog
pub struct LibraryScanner {
    store: CatalogStore,
    probe: Arc<dyn MetadataProbe>,
    covers: Arc<dyn CoverResolver>,
    config: ScanConfig,
    events: Option<mpsc::Sender<ScanEvent>>,
}

impl LibraryScanner {
    pub fn new(
        store: CatalogStore,
        probe: Arc<dyn MetadataProbe>,
        covers: Arc<dyn CoverResolver>,
    ) -> Self {
        Self {
            store,
            probe,
            covers,
            config: ScanConfig::default(),
            events: None,
        }
    }

    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Send progress events to `events` while scanning
    pub fn with_events(mut self, events: mpsc::Sender<ScanEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Scan `root` and return the number of audiobook folders found
    ///
    /// Any failure is logged, reported as [`ScanEvent::Failed`] and turned into `0`;
    /// the catalog is then left untouched.
    pub async fn scan_directory(&self, root: &Path) -> usize {
        match self.try_scan(root).await {
            Ok(report) => report.folders_found,
            Err(e) => {
                error!("Scan of {} failed: {}", root.display(), e);
                self.emit(ScanEvent::Failed {
                    error: e.to_string(),
                })
                .await;
                0
            }
        }
    }

    /// Run the scan on its own task
    ///
    /// Events stream through the returned handle until the scan ends.
    pub fn spawn(self, root: impl Into<PathBuf>) -> ScanHandle {
        let root = root.into();
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let scanner = self.with_events(tx);

        let task = tokio::spawn(async move { scanner.scan_directory(&root).await });

        ScanHandle { events: rx, task }
    }

    /// Scan `root`, returning the full report or the error that aborted the scan
    pub async fn try_scan(&self, root: &Path) -> Result<ScanReport> {
        let started = Instant::now();
        self.emit(ScanEvent::Started {
            root: root.to_path_buf(),
        })
        .await;

        // Fail before touching the catalog so a bad root never marks the library unavailable
        if !root.exists() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut session = self.store.begin_scan_session().await?;
        debug!(
            "Scan session open, {} audiobooks in progress snapshot",
            session.snapshot_rows()
        );

        let walker = FolderWalker::new(&self.config);
        let walk_root = root.to_path_buf();
        let outcome = tokio::task::spawn_blocking(move || walker.discover(&walk_root))
            .await
            .map_err(|e| ScanError::Worker(e.to_string()))??;

        let mut report = ScanReport {
            folders_found: outcome.folders.len(),
            ..ScanReport::default()
        };

        for (path, reason) in outcome.skipped {
            self.emit(ScanEvent::DirectorySkipped {
                path: path.clone(),
                reason,
            })
            .await;
            report.skipped_dirs.push(path);
        }
        self.emit(ScanEvent::FoldersDiscovered {
            count: report.folders_found,
        })
        .await;

        for folder in &outcome.folders {
            let state_hash = compute_state_hash(&folder.audio_files);

            let stored = session.stored_state_hash(&folder.relative).await?;
            if stored.as_deref() == Some(state_hash.as_str()) {
                session.confirm_available(&folder.relative).await?;
                report.unchanged += 1;
                self.emit(ScanEvent::Unchanged {
                    path: folder.relative.clone(),
                })
                .await;
                continue;
            }

            let (outcome, failed_files) = self.extract(&mut session, folder, state_hash).await?;
            report.extracted += 1;
            report.failed_files += failed_files;
            self.emit(ScanEvent::Processed {
                path: folder.relative.clone(),
                files: folder.audio_files.len(),
                failed_files,
                outcome,
            })
            .await;
        }

        report.folders_materialized =
            materialize_ancestors(&mut session, &outcome.folders).await?;
        self.emit(ScanEvent::FoldersMaterialized {
            count: report.folders_materialized,
        })
        .await;

        session.end().await?;

        report.elapsed = started.elapsed();
        self.emit(ScanEvent::Completed(report.clone())).await;
        Ok(report)
    }

    /// Full extraction of one changed or new folder
    ///
    /// Returns how the node was written and how many files have no duration.
    async fn extract(
        &self,
        session: &mut ScanSession,
        folder: &DiscoveredFolder,
        state_hash: String,
    ) -> Result<(UpsertOutcome, usize)> {
        let mut probes = Vec::with_capacity(folder.audio_files.len());
        for entry in &folder.audio_files {
            probes.push(self.probe.probe_file(&entry.path).await);
        }

        let mut tags = self.probe.folder_seed(&folder.path).await;
        for probe in probes.iter().take(LEADING_FILE_SAMPLE) {
            if tags.is_complete() {
                break;
            }
            tags.fill_from(&probe.tags);
        }
        let identity = merge_identity(&parse_folder_name(folder.name()), &tags);

        let mut files = Vec::with_capacity(folder.audio_files.len());
        let mut total_duration = 0.0;
        let mut failed_files = 0;
        let mut next_track: i64 = 1;

        for (entry, probe) in folder.audio_files.iter().zip(probes) {
            if let DurationProbe::Failed(reason) = &probe.duration {
                warn!("No duration for {}: {}", entry.path.display(), reason);
                failed_files += 1;
            }
            let duration = probe.duration.seconds();
            total_duration += duration;

            let track_number = match probe.tags.track {
                Some(track) => {
                    let track = i64::from(track);
                    next_track = next_track.max(track + 1);
                    track
                }
                None => {
                    next_track += 1;
                    next_track - 1
                }
            };

            files.push(FileRecord {
                audiobook_path: folder.relative.clone(),
                file_path: format!("{}/{}", folder.relative, entry.name),
                file_name: entry.name.clone(),
                track_number,
                duration_seconds: duration,
                title: probe.tags.title,
                artist: probe.tags.author,
                album: probe.tags.album,
                genre: probe.tags.genre,
                comment: probe.tags.comment,
            });
        }

        let cover_path = self.resolve_cover(folder).await;

        let record = AudiobookRecord {
            path: folder.relative.clone(),
            parent_path: parent_path_of(&folder.relative).to_string(),
            display_name: folder.name().to_string(),
            author: identity.author,
            title: identity.title,
            narrator: identity.narrator,
            tag_author: tags.author,
            tag_title: tags.title,
            tag_narrator: tags.narrator,
            tag_year: tags.year,
            cover_path: cover_path.map(|p| p.display().to_string()),
            file_count: files.len() as i64,
            total_duration_seconds: total_duration,
            state_hash,
        };

        let outcome = session.upsert_audiobook(&record).await?;
        session.replace_file_records(&folder.relative, &files).await?;

        Ok((outcome, failed_files))
    }

    async fn resolve_cover(&self, folder: &DiscoveredFolder) -> Option<PathBuf> {
        let covers = Arc::clone(&self.covers);
        let dir = folder.path.clone();
        let key = folder.relative.clone();

        match tokio::task::spawn_blocking(move || covers.resolve_cover(&dir, &key)).await {
            Ok(cover) => cover,
            Err(e) => {
                warn!("Cover lookup for {} failed: {}", folder.relative, e);
                None
            }
        }
    }

    async fn emit(&self, event: ScanEvent) {
        match &event {
            ScanEvent::Unchanged { .. } => debug!("{}", event),
            // Already logged where they happen
            ScanEvent::DirectorySkipped { .. } | ScanEvent::Failed { .. } => {}
            _ => info!("{}", event),
        }

        if let Some(events) = &self.events {
            // A dropped receiver only means nobody is listening any more
            let _ = events.send(event).await;
        }
    }
}

/// Ensure a folder node exists for every ancestor of every discovered audiobook
///
/// Walks each audiobook's ancestors bottom-up and stops at the first one already
/// handled during this scan, since everything above it was handled too.
async fn materialize_ancestors(
    session: &mut ScanSession,
    folders: &[DiscoveredFolder],
) -> Result<usize> {
    let mut materialized: HashSet<String> = HashSet::new();

    for folder in folders {
        let mut ancestor = parent_path_of(&folder.relative);
        while !ancestor.is_empty() {
            if !materialized.insert(ancestor.to_string()) {
                break;
            }
            session.materialize_folder(ancestor).await?;
            ancestor = parent_path_of(ancestor);
        }
    }

    Ok(materialized.len())
}

/// A scan running on its own task
pub struct ScanHandle {
    events: mpsc::Receiver<ScanEvent>,
    task: JoinHandle<usize>,
}

impl ScanHandle {
    /// Next progress event, or `None` once the scan has finished
    pub async fn next_event(&mut self) -> Option<ScanEvent> {
        self.events.recv().await
    }

    /// Wait for the scan and return its folder count
    ///
    /// Unread events are discarded. A worker that panicked or was cancelled counts as 0.
    pub async fn finish(self) -> usize {
        drop(self.events);
        match self.task.await {
            Ok(count) => count,
            Err(e) => {
                error!("Scan worker failed: {}", e);
                0
            }
        }
    }
}
