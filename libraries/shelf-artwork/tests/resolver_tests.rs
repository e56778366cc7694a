/// Integration tests for folder cover resolution
use shelf_artwork::{cover_cache_name, CoverConfig, FolderCoverResolver};
use shelf_core::CoverResolver;
use std::fs;
use tempfile::TempDir;

fn resolver_with_cache(cache: &TempDir) -> FolderCoverResolver {
    FolderCoverResolver::new(CoverConfig {
        cache_dir: cache.path().to_path_buf(),
        ..CoverConfig::default()
    })
}

#[test]
fn configured_name_wins_over_other_images() {
    let book = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    fs::write(book.path().join("a_scan.jpg"), b"scan").unwrap();
    fs::write(book.path().join("Folder.JPG"), b"folder").unwrap();
    fs::write(book.path().join("01.mp3"), b"audio").unwrap();

    let cover = resolver_with_cache(&cache).resolve_cover(book.path(), "book");
    assert_eq!(cover, Some(book.path().join("Folder.JPG")));
}

#[test]
fn names_are_tried_in_configured_order() {
    let book = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    fs::write(book.path().join("folder.jpg"), b"folder").unwrap();
    fs::write(book.path().join("cover.png"), b"cover").unwrap();

    let cover = resolver_with_cache(&cache).resolve_cover(book.path(), "book");
    assert_eq!(cover, Some(book.path().join("cover.png")));
}

#[test]
fn falls_back_to_any_image() {
    let book = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    fs::write(book.path().join("z_back.bmp"), b"back").unwrap();
    fs::write(book.path().join("b_front.png"), b"front").unwrap();
    fs::write(book.path().join("notes.txt"), b"notes").unwrap();

    let cover = resolver_with_cache(&cache).resolve_cover(book.path(), "book");
    assert_eq!(cover, Some(book.path().join("b_front.png")));
}

#[test]
fn reuses_cached_extraction() {
    let book = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    fs::write(book.path().join("01.mp3"), b"not really audio").unwrap();
    let cached = cache.path().join(cover_cache_name("Author/Book"));
    fs::write(&cached, b"jpeg").unwrap();

    let cover = resolver_with_cache(&cache).resolve_cover(book.path(), "Author/Book");
    assert_eq!(cover, Some(cached));
}

#[test]
fn no_cover_anywhere_is_none() {
    let book = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    fs::write(book.path().join("01.mp3"), b"not really audio").unwrap();

    let cover = resolver_with_cache(&cache).resolve_cover(book.path(), "Author/Book");
    assert_eq!(cover, None);
    assert_eq!(fs::read_dir(cache.path()).unwrap().count(), 0);
}

#[test]
fn missing_folder_is_none() {
    let cache = TempDir::new().unwrap();
    let cover = resolver_with_cache(&cache)
        .resolve_cover(&cache.path().join("gone"), "gone");
    assert_eq!(cover, None);
}
