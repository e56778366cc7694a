//! Shelf Scanner
//!
//! Walks an audiobook library, fingerprints every audiobook folder and reconciles
//! the result into the catalog without touching recorded playback progress.
//!
//! # Architecture
//!
//! - [`walker`]: finds folders that directly contain audio files
//! - [`fingerprint`]: name/size/mtime digest used to skip unchanged folders
//! - [`library_scanner`]: the scan itself, one [`shelf_storage::ScanSession`] per run
//!
//! # Example
//!
//! ```rust,no_run
//! use shelf_artwork::{CoverConfig, FolderCoverResolver};
//! use shelf_metadata::{AudioProbe, ProbeConfig};
//! use shelf_scanner::LibraryScanner;
//! use shelf_storage::CatalogStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CatalogStore::open("sqlite://audiobooks.db").await?;
//! let scanner = LibraryScanner::new(
//!     store,
//!     Arc::new(AudioProbe::new(&ProbeConfig::default())),
//!     Arc::new(FolderCoverResolver::new(CoverConfig::default())),
//! );
//!
//! let mut handle = scanner.spawn("/books");
//! while let Some(event) = handle.next_event().await {
//!     println!("{event}");
//! }
//! println!("{} audiobook folders", handle.finish().await);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod fingerprint;
pub mod library_scanner;
mod types;
pub mod walker;

pub use error::{Result, ScanError};
pub use fingerprint::compute_state_hash;
pub use library_scanner::{LibraryScanner, ScanHandle};
pub use types::{AudioFileEntry, DiscoveredFolder, ScanConfig, ScanEvent, ScanReport};
pub use walker::{FolderWalker, WalkOutcome};
