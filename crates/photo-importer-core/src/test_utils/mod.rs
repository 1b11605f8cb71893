use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Create a file with the given content, creating parent directories as needed
pub fn create_test_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    fs::create_dir_all(dir).unwrap();

    let file_path = dir.join(name);
    let mut file = File::create(&file_path).unwrap();
    file.write_all(content).unwrap();
    file_path
}

/// Minimal JPEG carrying an EXIF `DateTime` tag (`YYYY:MM:DD HH:MM:SS`) in IFD0
pub fn jpeg_with_exif_datetime(datetime: &str) -> Vec<u8> {
    assert_eq!(datetime.len(), 19);

    // Big-endian TIFF header, IFD0 at offset 8 with a single ASCII entry
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2a\x00\x00\x00\x08");
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x0132u16.to_be_bytes()); // DateTime
    tiff.extend_from_slice(&2u16.to_be_bytes()); // ASCII
    tiff.extend_from_slice(&20u32.to_be_bytes());
    tiff.extend_from_slice(&26u32.to_be_bytes());
    tiff.extend_from_slice(&0u32.to_be_bytes()); // no next IFD
    tiff.extend_from_slice(datetime.as_bytes());
    tiff.push(0);

    let mut jpeg = vec![0xFF, 0xD8];
    jpeg.extend_from_slice(&[0xFF, 0xE1]);
    jpeg.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    jpeg.extend_from_slice(b"Exif\x00\x00");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}
