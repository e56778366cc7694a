//! CUE sheet metadata
//!
//! Only the sheet-level `PERFORMER`, `TITLE` and `REM DATE` commands are read;
//! per-track commands after the first `TRACK` are ignored.

use crate::error::Result;
use encoding_rs::WINDOWS_1251;
use std::path::Path;

/// Sheet-level metadata of a CUE file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CueSheet {
    pub performer: String,
    pub title: String,
    pub date: String,
}

/// Read and parse a CUE file
pub async fn read_cue_sheet(path: &Path) -> Result<CueSheet> {
    let bytes = tokio::fs::read(path).await?;
    Ok(parse_cue_sheet(&bytes))
}

/// Parse CUE sheet bytes (UTF-8 with optional BOM, else Windows-1251)
pub fn parse_cue_sheet(bytes: &[u8]) -> CueSheet {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let content = match std::str::from_utf8(bytes) {
        Ok(text) => std::borrow::Cow::Borrowed(text),
        Err(_) => WINDOWS_1251.decode_without_bom_handling(bytes).0,
    };

    let mut sheet = CueSheet::default();
    for line in content.lines().map(str::trim) {
        if line.starts_with("TRACK ") {
            break;
        }
        if let Some(value) = line.strip_prefix("PERFORMER ") {
            sheet.performer = unquote(value);
        } else if let Some(value) = line.strip_prefix("TITLE ") {
            sheet.title = unquote(value);
        } else if let Some(value) = line.strip_prefix("REM DATE ") {
            sheet.date = unquote(value);
        }
    }
    sheet
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches('"').trim().to_string()
}
