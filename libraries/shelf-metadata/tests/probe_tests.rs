
use shelf_core::{DurationProbe, MetadataDecoder, MetadataProbe, ProbeFailure};
use shelf_metadata::{AudioProbe, LoftyDecoder, ProbeConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use test_helpers::{write_silent_wav, ScriptedDecoder};

fn no_fallback() -> ProbeConfig {
    ProbeConfig {
        ffprobe_path: None,
        timeout_secs: 1,
    }
}

#[test]
fn lofty_reads_wav_duration() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("01.wav");
    write_silent_wav(&path, 2);

    let decoded = LoftyDecoder::new().decode(&path).unwrap();
    let secs = decoded.duration.expect("WAV reports a duration");
    assert!((secs - 2.0).abs() < 0.01, "unexpected duration {secs}");
}

#[tokio::test]
async fn decoded_duration_skips_external_tool() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("01.wav");
    write_silent_wav(&path, 1);

    let probe = AudioProbe::with_decoder(
        Arc::new(LoftyDecoder::new()),
        &ProbeConfig {
            ffprobe_path: Some(PathBuf::from("/nonexistent/ffprobe")),
            timeout_secs: 1,
        },
    );

    match probe.probe_duration(&path).await {
        DurationProbe::Decoded(secs) => assert!((secs - 1.0).abs() < 0.01),
        other => panic!("expected decoded duration, got {other:?}"),
    }
}

#[tokio::test]
async fn decoder_failure_without_fallback_is_a_typed_failure() {
    let probe = AudioProbe::with_decoder(Arc::new(ScriptedDecoder::default()), &no_fallback());

    let result = probe.probe_duration(&PathBuf::from("/books/broken.mp3")).await;
    assert!(matches!(
        result,
        DurationProbe::Failed(ProbeFailure::DecoderFailed(_))
    ));
    assert_eq!(result.seconds(), 0.0);
}

#[tokio::test]
async fn zero_length_decode_falls_back_to_external_tool() {
    let decoder = ScriptedDecoder::default().with_file("01.mp3", &[], Some(0.0));
    let probe = AudioProbe::with_decoder(
        Arc::new(decoder),
        &ProbeConfig {
            ffprobe_path: Some(PathBuf::from("/nonexistent/ffprobe")),
            timeout_secs: 1,
        },
    );

    let result = probe.probe_duration(&PathBuf::from("/books/01.mp3")).await;
    assert!(matches!(
        result,
        DurationProbe::Failed(ProbeFailure::ToolFailed(_))
    ));
}

#[tokio::test]
async fn unreadable_file_yields_empty_tags() {
    let probe = AudioProbe::with_decoder(Arc::new(ScriptedDecoder::default()), &no_fallback());
    let tags = probe.extract_file_tags(&PathBuf::from("/books/missing.mp3")).await;
    assert!(tags.is_empty());
}

#[tokio::test]
async fn file_tags_are_repaired_and_cleaned() {
    let (encoded, _, _) = encoding_rs::WINDOWS_1251.encode("Лев Толстой");
    let mojibake: String = encoded.iter().map(|&b| b as char).collect();

    let decoder = ScriptedDecoder::default().with_file(
        "01.mp3",
        &[("TPE1", mojibake.as_str()), ("TCON", "Unknown"), ("TRCK", "4/20")],
        Some(60.0),
    );
    let probe = AudioProbe::with_decoder(Arc::new(decoder), &no_fallback());

    let file = probe.probe_file(&PathBuf::from("/books/01.mp3")).await;
    assert_eq!(file.tags.author, "Лев Толстой");
    assert_eq!(file.tags.genre, "");
    assert_eq!(file.tags.track, Some(4));
    assert_eq!(file.duration, DurationProbe::Decoded(60.0));
}

#[tokio::test]
async fn folder_metadata_merges_first_files_and_stops_early() {
    let temp = TempDir::new().unwrap();
    let files: Vec<PathBuf> = ["01.mp3", "02.mp3", "03.mp3", "04.mp3"]
        .iter()
        .map(|name| temp.path().join(name))
        .collect();

    let decoder = Arc::new(
        ScriptedDecoder::default()
            .with_file("01.mp3", &[("TPE1", "Author"), ("TALB", "Album Title")], None)
            .with_file("02.mp3", &[("TPE2", "Reader"), ("TDRC", "1999")], None)
            .with_file("03.mp3", &[("TPE1", "Other Author")], None)
            .with_file("04.mp3", &[("TPE1", "Never Read")], None),
    );
    let probe = AudioProbe::with_decoder(decoder.clone(), &no_fallback());

    let meta = probe.extract_folder_metadata(&files).await;
    assert_eq!(meta.author, "Author");
    assert_eq!(meta.title, "Album Title");
    assert_eq!(meta.narrator, "Reader");
    assert_eq!(meta.year, "1999");
    assert_eq!(decoder.calls(), 2);
}

#[tokio::test]
async fn cue_sheet_seeds_folder_metadata() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("book.cue"),
        "PERFORMER \"Cue Author\"\nTITLE \"Cue Title\"\nREM DATE 1937\nFILE \"01.mp3\" MP3\n  TRACK 01 AUDIO\n",
    )
    .unwrap();

    let decoder = ScriptedDecoder::default().with_file(
        "01.mp3",
        &[("TPE1", "Tag Author"), ("TPE2", "Tag Reader")],
        None,
    );
    let probe = AudioProbe::with_decoder(Arc::new(decoder), &no_fallback());

    let meta = probe
        .extract_folder_metadata(&[temp.path().join("01.mp3")])
        .await;
    assert_eq!(meta.author, "Cue Author");
    assert_eq!(meta.title, "Cue Title");
    assert_eq!(meta.year, "1937");
    assert_eq!(meta.narrator, "Tag Reader");
}
