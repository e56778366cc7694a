use serde::{Deserialize, Serialize};

/// Tags read from a single audio file
///
/// Every string field is already cleaned and encoding-repaired. Missing tags are empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileTags {
    pub title: String,
    pub author: String,
    pub album: String,
    pub year: String,
    pub genre: String,
    pub comment: String,
    pub narrator: String,
    pub track: Option<u32>,
}

impl FileTags {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Audiobook-level metadata merged from a folder's files
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FolderMetadata {
    pub author: String,
    pub title: String,
    pub narrator: String,
    pub year: String,
}

impl FolderMetadata {
    /// True once every field holds a value
    pub fn is_complete(&self) -> bool {
        !self.author.is_empty()
            && !self.title.is_empty()
            && !self.narrator.is_empty()
            && !self.year.is_empty()
    }

    /// Fill still-empty fields from one file's tags
    ///
    /// The title falls back to the album tag when the file has no title of its own.
    pub fn fill_from(&mut self, tags: &FileTags) {
        fill(&mut self.author, &tags.author);
        if tags.title.is_empty() {
            fill(&mut self.title, &tags.album);
        } else {
            fill(&mut self.title, &tags.title);
        }
        fill(&mut self.narrator, &tags.narrator);
        fill(&mut self.year, &tags.year);
    }
}

fn fill(slot: &mut String, candidate: &str) {
    if slot.is_empty() && !candidate.is_empty() {
        candidate.clone_into(slot);
    }
}
