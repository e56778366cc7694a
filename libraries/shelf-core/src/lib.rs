//! Audioshelf Core
//!
//! Shared domain types, traits, and error handling for the Audioshelf catalog.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `LibraryNode`, `FileRecord`, `FileTags`, `FolderMetadata`, etc.
//! - **Collaborator Traits**: `MetadataDecoder`, `MetadataProbe`, `CoverResolver`
//! - **Error Handling**: Unified `ShelfError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use shelf_core::types::{LibraryNode, NodeKind};
//!
//! let folder = LibraryNode::folder("Tolkien/Middle-earth");
//! assert_eq!(folder.kind, NodeKind::Folder);
//! assert_eq!(folder.parent_path, "Tolkien");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Result, ShelfError};
pub use traits::{CoverResolver, MetadataDecoder, MetadataProbe, LEADING_FILE_SAMPLE};

pub use types::{
    AudiobookRecord, DecodedFile, DurationProbe, FileProbe, FileRecord, FileTags,
    FolderMetadata, LibraryFilter, LibraryNode, NodeKind, PlaybackProgress, ProbeFailure,
    TagField,
};
