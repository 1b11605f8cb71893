use super::*;
use crate::test_utils::{create_test_file, jpeg_with_exif_datetime};
use crate::types::ImageKind;
use std::path::Path;
use tempfile::tempdir;

fn candidate(path: &Path, kind: ImageKind, extension: &str) -> CandidateFile {
    CandidateFile {
        path: path.to_path_buf(),
        kind,
        extension: extension.to_string(),
    }
}

#[test]
fn test_identity_uses_exif_date_when_present() {
    let dir = tempdir().unwrap();
    let path = create_test_file(
        dir.path(),
        "IMG_0001.jpg",
        &jpeg_with_exif_datetime("2020:05:01 10:00:00"),
    );

    let identity = extract_identity(&candidate(&path, ImageKind::Jpeg, ".jpg")).unwrap();
    assert_eq!(identity.datetime_key(), "20200501100000");
    assert_eq!(identity.content_hash, compute_content_hash(&path).unwrap());
}

#[test]
fn test_identity_falls_back_to_mtime_without_metadata() {
    let dir = tempdir().unwrap();
    let path = create_test_file(dir.path(), "scan.jpg", b"DUMMY IMAGE DATA");

    let identity = extract_identity(&candidate(&path, ImageKind::Jpeg, ".jpg")).unwrap();
    assert_eq!(identity.datetime, modification_time(&path).unwrap());
}

#[test]
fn test_identity_for_png_uses_mtime() {
    let dir = tempdir().unwrap();
    let path = create_test_file(
        dir.path(),
        "screen.png",
        &jpeg_with_exif_datetime("2020:05:01 10:00:00"),
    );

    let identity = extract_identity(&candidate(&path, ImageKind::Png, ".png")).unwrap();
    assert_eq!(identity.datetime, modification_time(&path).unwrap());
}

#[test]
fn test_same_content_and_date_is_same_identity() {
    let dir = tempdir().unwrap();
    let bytes = jpeg_with_exif_datetime("2019:12:31 23:59:59");
    let first = create_test_file(&dir.path().join("a"), "one.jpg", &bytes);
    let second = create_test_file(&dir.path().join("b"), "two.JPG", &bytes);

    let a = extract_identity(&candidate(&first, ImageKind::Jpeg, ".jpg")).unwrap();
    let b = extract_identity(&candidate(&second, ImageKind::Jpeg, ".jpg")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_unreadable_file_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("gone.jpg");

    assert!(extract_identity(&candidate(&missing, ImageKind::Jpeg, ".jpg")).is_err());
}
