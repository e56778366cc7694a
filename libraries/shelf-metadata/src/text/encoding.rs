//! Repair of text decoded with the wrong code page
//!
//! Tags written by old Windows tools often store Windows-1251 bytes in Latin-1 frames.
//! Read back as Latin-1 they show up as `Âîéíà` instead of `Война`.

use encoding_rs::WINDOWS_1251;
use std::borrow::Cow;

/// Re-decode Latin-1 mojibake as Windows-1251
///
/// Only applies when every character fits in one byte and at least one is in the
/// upper half; the result is kept only if it contains Cyrillic letters. Anything
/// else comes back unchanged.
pub fn repair_encoding(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| ('\u{80}'..='\u{FF}').contains(&c)) {
        return Cow::Borrowed(text);
    }
    if text.chars().any(|c| c > '\u{FF}') {
        return Cow::Borrowed(text);
    }

    let bytes: Vec<u8> = text.chars().map(|c| c as u8).collect();
    match WINDOWS_1251.decode_without_bom_handling_and_without_replacement(&bytes) {
        Some(fixed) if fixed.chars().any(is_cyrillic_letter) => Cow::Owned(fixed.into_owned()),
        _ => Cow::Borrowed(text),
    }
}

fn is_cyrillic_letter(c: char) -> bool {
    ('А'..='я').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_latin1_mojibake(original: &str) -> String {
        let (bytes, _, had_errors) = WINDOWS_1251.encode(original);
        assert!(!had_errors);
        bytes.iter().map(|&b| b as char).collect()
    }

    #[test]
    fn mojibake_round_trips_to_cyrillic() {
        let broken = as_latin1_mojibake("Война и мир");
        assert_ne!(broken, "Война и мир");
        assert_eq!(repair_encoding(&broken), "Война и мир");
    }

    #[test]
    fn correct_text_is_untouched() {
        assert!(matches!(repair_encoding("Война и мир"), Cow::Borrowed(_)));
        assert_eq!(repair_encoding("Plain ASCII"), "Plain ASCII");
    }

    #[test]
    fn no_cyrillic_result_keeps_original() {
        assert_eq!(repair_encoding("© 2020"), "© 2020");
    }
}
