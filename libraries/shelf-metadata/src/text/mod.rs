//! Pure text heuristics applied to folder names and tag values

mod encoding;
mod folder_name;

pub use encoding::repair_encoding;
pub use folder_name::{
    is_technical_token, parse_folder_name, split_author_title, split_trailing_group,
    strip_narrator_prefix, strip_studio_suffix, ParsedName,
};
