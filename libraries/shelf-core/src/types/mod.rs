mod file;
mod filter;
mod media;
mod node;
mod probe;
mod tags;

pub use file::FileRecord;
pub use filter::LibraryFilter;
pub use media::{has_extension, DEFAULT_AUDIO_EXTENSIONS};
pub use node::{
    leaf_name_of, parent_path_of, AudiobookRecord, LibraryNode, NodeKind, PlaybackProgress,
};
pub use probe::{DecodedFile, DurationProbe, FileProbe, ProbeFailure, TagField};
pub use tags::{FileTags, FolderMetadata};
