//! Folder-level metadata helpers

use crate::text::ParsedName;
use shelf_core::FolderMetadata;
use std::path::{Path, PathBuf};

/// First `*.cue` file in `dir` by name, if any
pub async fn find_cue_sheet(dir: &Path) -> Option<PathBuf> {
    let mut entries = tokio::fs::read_dir(dir).await.ok()?;
    let mut sheets = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let is_cue = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("cue"));
        if is_cue && entry.file_type().await.is_ok_and(|t| t.is_file()) {
            sheets.push(path);
        }
    }
    sheets.sort();
    sheets.into_iter().next()
}

/// Combine folder-name fields with tag metadata
///
/// A non-empty folder-name field wins over the tag value. The year only ever comes
/// from tags.
pub fn merge_identity(name: &ParsedName, tags: &FolderMetadata) -> FolderMetadata {
    let pick = |from_name: &str, from_tags: &str| {
        if from_name.is_empty() {
            from_tags.to_string()
        } else {
            from_name.to_string()
        }
    };

    FolderMetadata {
        author: pick(&name.author, &tags.author),
        title: pick(&name.title, &tags.title),
        narrator: pick(&name.narrator, &tags.narrator),
        year: tags.year.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_name_fields_take_precedence() {
        let name = ParsedName {
            author: "Folder Author".into(),
            title: String::new(),
            narrator: "Folder Reader".into(),
        };
        let tags = FolderMetadata {
            author: "Tag Author".into(),
            title: "Tag Title".into(),
            narrator: "Tag Reader".into(),
            year: "2001".into(),
        };

        let merged = merge_identity(&name, &tags);
        assert_eq!(merged.author, "Folder Author");
        assert_eq!(merged.title, "Tag Title");
        assert_eq!(merged.narrator, "Folder Reader");
        assert_eq!(merged.year, "2001");
    }
}
