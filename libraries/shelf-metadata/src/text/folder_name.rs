//! Folder-name parsing
//!
//! Audiobook folders are usually named `Author - Title (narrator)` or
//! `Author - Title [narrator, year, bitrate]`. Parsing is an ordered set of small
//! rules, each usable on its own:
//!
//! 1. [`split_trailing_group`] cuts off the bracketed group at the end of the name.
//! 2. [`is_technical_token`] rejects groups that start with a year or format info.
//! 3. [`strip_narrator_prefix`] removes "читает" / "read by" style prefixes.
//! 4. [`strip_studio_suffix`] drops a trailing all-caps studio code such as `(STU)`.
//! 5. [`split_author_title`] splits the remainder on the first spaced dash.

use serde::{Deserialize, Serialize};

/// Keywords that mark a bracket segment as encoding or format info
const TECHNICAL_KEYWORDS: &[&str] = &["kbps", "mp3", "m4b", "flac", "ogg", "wav"];

/// Narrator prefixes, lowercase; each must be followed by whitespace
const NARRATOR_PREFIXES: &[&str] = &["читает", "чит.", "narrated by", "read by"];

/// Author, title and narrator derived from a folder name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedName {
    pub author: String,
    pub title: String,
    pub narrator: String,
}

/// Parse an audiobook folder name
///
/// Fields that cannot be derived are left empty; without a dash separator the whole
/// name (minus any trailing bracket group) becomes the title.
pub fn parse_folder_name(name: &str) -> ParsedName {
    let name = name.trim();

    let (head, narrator) = match split_trailing_group(name) {
        Some((head, group)) => (head, narrator_from_group(group)),
        None => (name, ""),
    };

    let (author, title) = split_author_title(head);

    ParsedName {
        author: author.to_string(),
        title: title.to_string(),
        narrator: narrator.to_string(),
    }
}

fn narrator_from_group(group: &str) -> &str {
    let first = group.split(',').next().unwrap_or_default().trim();
    if first.is_empty() || is_technical_token(first) {
        return "";
    }
    strip_studio_suffix(strip_narrator_prefix(first))
}

/// Split `name` into the text before its trailing bracket group and the group content
///
/// The last `)` or `]` is matched against its opening bracket, so nested groups such
/// as `[Narrator (STU)]` stay whole. Returns `None` when the name does not end in a
/// balanced, non-empty group.
pub fn split_trailing_group(name: &str) -> Option<(&str, &str)> {
    let trimmed = name.trim_end();
    let closer = trimmed.chars().next_back()?;
    if !matches!(closer, ')' | ']') {
        return None;
    }

    let mut depth = 0usize;
    for (idx, ch) in trimmed.char_indices().rev() {
        match ch {
            ')' | ']' => depth += 1,
            '(' | '[' => {
                depth -= 1;
                if depth == 0 {
                    let content = trimmed[idx + 1..trimmed.len() - closer.len_utf8()].trim();
                    if content.is_empty() {
                        return None;
                    }
                    return Some((trimmed[..idx].trim_end(), content));
                }
            }
            _ => {}
        }
    }

    None
}

/// Whether a bracket segment is a bare year or format/bitrate info rather than a name
pub fn is_technical_token(segment: &str) -> bool {
    let segment = segment.trim();
    if segment.len() == 4 && segment.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    let lower = segment.to_lowercase();
    TECHNICAL_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Remove a leading narrator prefix, compared case-insensitively
pub fn strip_narrator_prefix(segment: &str) -> &str {
    let segment = segment.trim();
    for prefix in NARRATOR_PREFIXES {
        let Some((end, _)) = segment.char_indices().nth(prefix.chars().count()) else {
            continue;
        };
        if segment[..end].to_lowercase() != *prefix {
            continue;
        }
        let rest = &segment[end..];
        if rest.starts_with(char::is_whitespace) {
            return rest.trim();
        }
    }
    segment
}

/// Remove a trailing `(XX)`..`(XXXXX)` group of uppercase Latin or Cyrillic letters
///
/// Any other parenthesized text (a pseudonym, say) is kept.
pub fn strip_studio_suffix(narrator: &str) -> &str {
    let trimmed = narrator.trim_end();
    let Some(body) = trimmed.strip_suffix(')') else {
        return trimmed;
    };
    let Some(open) = body.rfind('(') else {
        return trimmed;
    };

    let token = &body[open + 1..];
    let len = token.chars().count();
    if (2..=5).contains(&len) && token.chars().all(is_studio_letter) {
        body[..open].trim_end()
    } else {
        trimmed
    }
}

fn is_studio_letter(c: char) -> bool {
    c.is_ascii_uppercase() || ('А'..='Я').contains(&c)
}

/// Split on the first en dash, em dash or hyphen with whitespace on both sides
///
/// Returns `("", text)` when there is no such separator, so hyphenated names like
/// `Jean-Paul` are never split.
pub fn split_author_title(text: &str) -> (&str, &str) {
    let mut prev: Option<char> = None;
    for (idx, ch) in text.char_indices() {
        if matches!(ch, '-' | '–' | '—') && prev.is_some_and(char::is_whitespace) {
            let rest = &text[idx + ch.len_utf8()..];
            if rest.starts_with(char::is_whitespace) {
                return (text[..idx].trim(), rest.trim());
            }
        }
        prev = Some(ch);
    }
    ("", text.trim())
}
