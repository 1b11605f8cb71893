use chrono::{Datelike, NaiveDateTime, Timelike};
use std::fmt;
use std::path::PathBuf;

/// Supported image kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
    Tiff,
    Heic,
}

impl ImageKind {
    /// Determine kind from a file extension (without the leading dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "heic" => Some(Self::Heic),
            _ => None,
        }
    }

    /// Whether files of this kind can carry an EXIF capture timestamp
    pub fn has_embedded_metadata(&self) -> bool {
        match self {
            Self::Jpeg | Self::Tiff | Self::Heic => true,
            Self::Png => false,
        }
    }
}

/// A source file classified as importable by its extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Full path to the source file
    pub path: PathBuf,

    /// Image kind derived from the extension
    pub kind: ImageKind,

    /// Lowercased extension including the leading dot, e.g. `.jpeg`
    pub extension: String,
}

/// 128-bit MD5 digest of a file's full content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(pub [u8; 16]);

impl ContentHash {
    /// Lowercase hex rendering, as stored in the index and used in file names
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// The (capture time, content hash) pair identifying one logical import unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaptureIdentity {
    /// Capture timestamp with second precision
    pub datetime: NaiveDateTime,

    /// Digest of the file content
    pub content_hash: ContentHash,
}

impl CaptureIdentity {
    /// Fixed-width `YYYYMMDDHHMMSS` key used in the index and in file names
    pub fn datetime_key(&self) -> String {
        let d = &self.datetime;
        format!(
            "{:04}{:02}{:02}{:02}{:02}{:02}",
            d.year(),
            d.month(),
            d.day(),
            d.hour(),
            d.minute(),
            d.second()
        )
    }

    /// Lowercase hex rendering of the content hash
    pub fn hash_hex(&self) -> String {
        self.content_hash.to_hex()
    }
}
