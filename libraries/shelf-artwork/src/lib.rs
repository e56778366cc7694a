//! Shelf Artwork - cover art discovery for audiobook folders
//!
//! Finds a cover image for an audiobook folder, either as an image file next to the
//! audio files or as artwork embedded in the audio files' tags (ID3v2 APIC frames,
//! MP4 `covr` atoms, FLAC pictures, APE cover items). Embedded art is written as JPEG to a
//! cache directory under a name derived from the audiobook's relative path, so
//! repeated scans reuse the same file.
//!
//! # Example
//!
//! ```no_run
//! use shelf_artwork::{CoverConfig, FolderCoverResolver};
//! use shelf_core::CoverResolver;
//! use std::path::Path;
//!
//! let resolver = FolderCoverResolver::new(CoverConfig::default());
//! let folder = Path::new("/books/Tolkien - The Hobbit");
//!
//! match resolver.resolve_cover(folder, "Tolkien - The Hobbit") {
//!     Some(cover) => println!("Cover: {}", cover.display()),
//!     None => println!("No cover found"),
//! }
//! ```

mod error;
mod extractor;
mod resolver;
mod types;

// Re-export public API
pub use error::{ArtworkError, Result};
pub use extractor::ArtworkExtractor;
pub use resolver::{cover_cache_name, CoverConfig, FolderCoverResolver};
pub use types::ArtworkData;
