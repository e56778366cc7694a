//! Audioshelf Metadata
//!
//! Tag extraction, duration probing and folder-name heuristics for audiobook folders.
//!
//! This crate provides:
//! - Folder-name parsing into author, title and narrator (`text::parse_folder_name`)
//! - Repair of Cyrillic text that was decoded with the wrong 8-bit code page
//! - Container-aware tag extraction on top of lofty (`LoftyDecoder`, `ContainerKind`)
//! - Duration probing with an external `ffprobe` fallback (`AudioProbe`)
//! - CUE sheet metadata for folders that ship one
//!
//! # Example
//!
//! ```rust,no_run
//! use shelf_core::MetadataProbe;
//! use shelf_metadata::{AudioProbe, ProbeConfig};
//! use std::path::Path;
//! # async fn example() {
//! let probe = AudioProbe::new(&ProbeConfig::default());
//! let tags = probe.extract_file_tags(Path::new("/books/Tolkien - Hobbit/01.mp3")).await;
//! let duration = probe.probe_duration(Path::new("/books/Tolkien - Hobbit/01.mp3")).await;
//! println!("{} ({}s)", tags.title, duration.seconds());
//! # }
//! ```

mod container;
mod cue;
mod error;
mod external;
mod folder;
mod probe;
mod reader;
pub mod text;

pub use container::{clean_tag_value, parse_track_number, ContainerKind, ContainerKeys};
pub use cue::{parse_cue_sheet, read_cue_sheet, CueSheet};
pub use error::{MetadataError, Result};
pub use external::{parse_duration_output, ExternalProbe};
pub use folder::{find_cue_sheet, merge_identity};
pub use probe::{AudioProbe, ProbeConfig};
pub use reader::LoftyDecoder;
pub use text::{parse_folder_name, repair_encoding, ParsedName};
