//! Integration tests for the library scanner


use shelf_core::{FileTags, NodeKind};
use shelf_scanner::{ScanConfig, ScanEvent};
use shelf_storage::{ProgressUpdate, UpsertOutcome};
use std::fs;
use std::path::PathBuf;
use test_helpers::{set_mtime, TestLibrary, FAKE_DURATION};

const T0: u64 = 1_700_000_000;

fn progress_42() -> ProgressUpdate {
    ProgressUpdate {
        current_file_index: 1,
        current_position_seconds: 30.0,
        playback_speed: 1.5,
        listened_duration_seconds: 90.0,
        progress_percent: 42,
    }
}

#[tokio::test]
async fn test_scan_counts_audiobook_folders() {
    let lib = TestLibrary::new().await;
    lib.write("Author - Book/01.mp3", b"one", T0);
    lib.write("Author - Book/02.mp3", b"two", T0);
    lib.write("Series/Part 1/01.m4b", b"part", T0);
    lib.write("Scans/cover.jpg", b"img", T0);

    assert_eq!(lib.scan().await, 2);

    let book = lib.node("Author - Book").await;
    assert_eq!(book.kind, NodeKind::Audiobook);
    assert_eq!(book.file_count, 2);
    assert_eq!(book.total_duration_seconds, 2.0 * FAKE_DURATION);
    assert!(book.is_available);
    assert!(book.state_hash.is_some());

    assert!(lib.store.get_node("Scans").await.unwrap().is_none());
}

#[tokio::test]
async fn test_rescan_of_unchanged_library_does_no_heavy_work() {
    let lib = TestLibrary::new().await;
    lib.write("Author - Book/01.mp3", b"one", T0);
    lib.write("Author - Book/02.mp3", b"two", T0);
    lib.write("A/B/Nested/01.mp3", b"three", T0);

    assert_eq!(lib.scan().await, 2);
    let probe_calls = lib.probe.calls();
    let cover_calls = lib.covers.calls();
    let first = lib.catalog_state().await;
    assert!(probe_calls > 0);
    assert_eq!(cover_calls, 2);

    assert_eq!(lib.scan().await, 2);
    assert_eq!(lib.probe.calls(), probe_calls);
    assert_eq!(lib.covers.calls(), cover_calls);
    assert_eq!(lib.catalog_state().await, first);
}

#[tokio::test]
async fn test_full_extract_reads_each_file_once() {
    let lib = TestLibrary::new().await;
    for name in ["01.mp3", "02.mp3", "03.mp3", "04.mp3"] {
        lib.write(&format!("Book/{name}"), name.as_bytes(), T0);
    }
    lib.probe.set_tags(
        "02.mp3",
        FileTags {
            author: "Tagged Author".to_string(),
            title: "Tagged Title".to_string(),
            ..FileTags::default()
        },
    );

    assert_eq!(lib.scan().await, 1);
    assert_eq!(lib.probe.calls(), 4);

    let book = lib.node("Book").await;
    assert_eq!(book.author, "Tagged Author");
    assert_eq!(book.tag_title, "Tagged Title");
}

#[tokio::test]
async fn test_touched_file_forces_reextract() {
    let lib = TestLibrary::new().await;
    let file = lib.write("Book/01.mp3", b"one", T0);
    lib.write("Book/02.mp3", b"two", T0);

    lib.scan().await;
    let hash = lib.node("Book").await.state_hash;
    let calls = lib.probe.calls();

    set_mtime(&file, T0 + 60);
    lib.scan().await;
    let touched = lib.node("Book").await.state_hash;
    assert!(lib.probe.calls() > calls);
    assert_ne!(touched, hash);

    set_mtime(&file, T0);
    lib.scan().await;
    assert_eq!(lib.node("Book").await.state_hash, hash);
}

#[tokio::test]
async fn test_renamed_file_forces_reextract() {
    let lib = TestLibrary::new().await;
    let file = lib.write("Book/01.mp3", b"one", T0);

    lib.scan().await;
    let calls = lib.probe.calls();

    let renamed = file.with_file_name("01 - Prologue.mp3");
    fs::rename(&file, &renamed).unwrap();
    lib.scan().await;

    assert!(lib.probe.calls() > calls);
    let files = lib.store.file_records("Book").await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name, "01 - Prologue.mp3");
    assert_eq!(files[0].file_path, "Book/01 - Prologue.mp3");
}

#[tokio::test]
async fn test_cover_only_change_keeps_progress() {
    let lib = TestLibrary::new().await;
    lib.write("Book/01.mp3", b"one", T0);
    lib.scan().await;
    lib.store.save_progress("Book", &progress_42()).await.unwrap();

    // A new cover image is not an audio file, so the fingerprint stays the same
    lib.write("Book/cover.jpg", b"img", T0);
    lib.covers.set_cover(Some(PathBuf::from("/covers/new.jpg")));
    lib.scan().await;

    let book = lib.node("Book").await;
    assert_eq!(book.progress.progress_percent, 42);
    assert!(book.progress.is_started);
    assert!(!book.progress.is_completed);
    assert_eq!(book.cover_path, None);
}

#[tokio::test]
async fn test_reextract_updates_metadata_but_keeps_progress() {
    let lib = TestLibrary::new().await;
    let file = lib.write("Book/01.mp3", b"one", T0);
    lib.scan().await;
    lib.store.save_progress("Book", &progress_42()).await.unwrap();

    lib.covers.set_cover(Some(PathBuf::from("/covers/new.jpg")));
    set_mtime(&file, T0 + 1);
    lib.scan().await;

    let book = lib.node("Book").await;
    assert_eq!(book.cover_path.as_deref(), Some("/covers/new.jpg"));
    assert_eq!(book.progress.progress_percent, 42);
    assert_eq!(book.progress.playback_speed, 1.5);
    assert_eq!(book.progress.current_file_index, 1);
    assert!(book.progress.is_started);
    assert!(!book.progress.is_completed);
}

#[tokio::test]
async fn test_missing_folder_becomes_unavailable_and_returns() {
    let lib = TestLibrary::new().await;
    lib.write("Gone/Book/01.mp3", b"one", T0);
    lib.write("Stays/01.mp3", b"two", T0);
    lib.scan().await;
    lib.store.mark_completed("Gone/Book").await.unwrap();

    fs::remove_dir_all(lib.root().join("Gone")).unwrap();
    assert_eq!(lib.scan().await, 1);

    let gone = lib.node("Gone/Book").await;
    assert!(!gone.is_available);
    assert!(gone.progress.is_completed);
    assert_eq!(gone.progress.progress_percent, 100);
    assert!(!lib.node("Gone").await.is_available);
    assert!(lib.node("Stays").await.is_available);

    lib.write("Gone/Book/01.mp3", b"one", T0);
    assert_eq!(lib.scan().await, 2);

    let back = lib.node("Gone/Book").await;
    assert!(back.is_available);
    assert!(back.progress.is_completed);
    assert!(lib.node("Gone").await.is_available);
}

#[tokio::test]
async fn test_ancestor_folders_are_materialized() {
    let lib = TestLibrary::new().await;
    lib.write("A/B/Book One/01.mp3", b"one", T0);
    lib.write("A/B/Book Two/01.mp3", b"two", T0);
    lib.write("A/Other/01.mp3", b"three", T0);

    let report = lib.scanner().try_scan(lib.root()).await.unwrap();
    assert_eq!(report.folders_found, 3);
    assert_eq!(report.folders_materialized, 2);

    let a = lib.node("A").await;
    assert_eq!(a.kind, NodeKind::Folder);
    assert_eq!(a.parent_path, "");
    assert!(a.is_available);

    let b = lib.node("A/B").await;
    assert_eq!(b.kind, NodeKind::Folder);
    assert_eq!(b.parent_path, "A");
    assert_eq!(b.display_name, "B");

    assert_eq!(lib.node("A/B/Book One").await.parent_path, "A/B");

    let children: Vec<String> = lib
        .store
        .list_children("A")
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.path)
        .collect();
    assert_eq!(children, vec!["A/B", "A/Other"]);
}

#[tokio::test]
async fn test_folder_name_takes_precedence_over_tags() {
    let lib = TestLibrary::new().await;
    lib.write(
        "Иван Иванов - Война и мир (читает Петр Петров)/01.mp3",
        b"one",
        T0,
    );
    lib.probe.set_tags(
        "01.mp3",
        FileTags {
            title: "Tag Title".to_string(),
            author: "Tag Author".to_string(),
            year: "1869".to_string(),
            ..FileTags::default()
        },
    );

    lib.scan().await;

    let book = lib
        .node("Иван Иванов - Война и мир (читает Петр Петров)")
        .await;
    assert_eq!(book.author, "Иван Иванов");
    assert_eq!(book.title, "Война и мир");
    assert_eq!(book.narrator, "Петр Петров");
    assert_eq!(book.tag_author, "Tag Author");
    assert_eq!(book.tag_title, "Tag Title");
    assert_eq!(book.tag_year, "1869");
}

#[tokio::test]
async fn test_tags_fill_fields_missing_from_folder_name() {
    let lib = TestLibrary::new().await;
    lib.write("Just A Title/01.mp3", b"one", T0);
    lib.probe.set_tags(
        "01.mp3",
        FileTags {
            author: "Tag Author".to_string(),
            narrator: "Tag Reader".to_string(),
            ..FileTags::default()
        },
    );

    lib.scan().await;

    let book = lib.node("Just A Title").await;
    assert_eq!(book.author, "Tag Author");
    assert_eq!(book.title, "Just A Title");
    assert_eq!(book.narrator, "Tag Reader");
}

#[tokio::test]
async fn test_track_numbers_continue_after_tagged_tracks() {
    let lib = TestLibrary::new().await;
    lib.write("Book/a.mp3", b"a", T0);
    lib.write("Book/b.mp3", b"b", T0);
    lib.write("Book/c.mp3", b"c", T0);
    lib.probe.set_tags(
        "a.mp3",
        FileTags {
            track: Some(5),
            ..FileTags::default()
        },
    );

    lib.scan().await;

    let tracks: Vec<i64> = lib
        .store
        .file_records("Book")
        .await
        .unwrap()
        .iter()
        .map(|f| f.track_number)
        .collect();
    assert_eq!(tracks, vec![5, 6, 7]);
}

#[tokio::test]
async fn test_failed_duration_counts_as_zero() {
    let lib = TestLibrary::new().await;
    lib.write("Book/01.mp3", b"one", T0);
    lib.write("Book/02 broken.mp3", b"two", T0);

    let report = lib.scanner().try_scan(lib.root()).await.unwrap();
    assert_eq!(report.failed_files, 1);

    let book = lib.node("Book").await;
    assert_eq!(book.file_count, 2);
    assert_eq!(book.total_duration_seconds, FAKE_DURATION);

    let files = lib.store.file_records("Book").await.unwrap();
    assert_eq!(files[1].duration_seconds, 0.0);
}

#[tokio::test]
async fn test_configured_extensions_limit_the_scan() {
    let lib = TestLibrary::new().await;
    lib.write("Mp3 Book/01.mp3", b"one", T0);
    lib.write("Flac Book/01.flac", b"two", T0);

    let scanner = lib.scanner().with_config(ScanConfig {
        audio_extensions: vec!["flac".to_string()],
        follow_links: false,
    });

    assert_eq!(scanner.scan_directory(lib.root()).await, 1);
    assert!(lib.store.get_node("Mp3 Book").await.unwrap().is_none());
}

#[tokio::test]
async fn test_missing_root_returns_zero_and_keeps_catalog() {
    let lib = TestLibrary::new().await;
    lib.write("Book/01.mp3", b"one", T0);
    lib.scan().await;

    let missing = lib.root().join("does-not-exist");
    assert_eq!(lib.scanner().scan_directory(&missing).await, 0);
    assert!(lib.scanner().try_scan(&missing).await.is_err());

    assert!(lib.node("Book").await.is_available);
}

#[tokio::test]
async fn test_spawned_scan_streams_events() {
    let lib = TestLibrary::new().await;
    lib.write("Book/01.mp3", b"one", T0);

    let mut handle = lib.scanner().spawn(lib.root().to_path_buf());
    let mut events = Vec::new();
    while let Some(event) = handle.next_event().await {
        events.push(event);
    }
    assert_eq!(handle.finish().await, 1);

    assert!(matches!(events.first(), Some(ScanEvent::Started { .. })));
    assert!(events.contains(&ScanEvent::FoldersDiscovered { count: 1 }));
    assert!(events.iter().any(|e| matches!(
        e,
        ScanEvent::Processed {
            outcome: UpsertOutcome::Inserted,
            ..
        }
    )));
    match events.last() {
        Some(ScanEvent::Completed(report)) => {
            assert_eq!(report.folders_found, 1);
            assert_eq!(report.extracted, 1);
        }
        other => panic!("expected completion event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_spawned_scan_reports_failure() {
    let lib = TestLibrary::new().await;
    let mut handle = lib.scanner().spawn(lib.root().join("missing"));

    let mut failed = false;
    while let Some(event) = handle.next_event().await {
        failed |= matches!(event, ScanEvent::Failed { .. });
    }
    assert!(failed);
    assert_eq!(handle.finish().await, 0);
}

#[tokio::test]
async fn test_second_scan_reports_unchanged_folders() {
    let lib = TestLibrary::new().await;
    lib.write("One/01.mp3", b"one", T0);
    lib.write("Two/01.mp3", b"two", T0);
    lib.scan().await;

    let report = lib.scanner().try_scan(lib.root()).await.unwrap();
    assert_eq!(report.unchanged, 2);
    assert_eq!(report.extracted, 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_directory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let lib = TestLibrary::new().await;
    lib.write("Open/01.mp3", b"one", T0);
    lib.write("Locked/Book/01.mp3", b"two", T0);

    let locked = lib.root().join("Locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read the directory anyway
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let report = lib.scanner().try_scan(lib.root()).await;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let report = report.unwrap();
    assert_eq!(report.folders_found, 1);
    assert_eq!(report.skipped_dirs, vec![locked]);
    assert!(lib.node("Open").await.is_available);
}
