use chrono::Datelike;
use std::path::{Path, PathBuf};

use crate::types::CaptureIdentity;

/// Archive path for an identity: `{root}/{YYYY}/{MM}/{DD}/{datetime_key}_{hash}{ext}`
///
/// Depends only on the identity and extension, never on the source path.
pub fn resolve_destination(identity: &CaptureIdentity, ext: &str, archive_root: &Path) -> PathBuf {
    let date = identity.datetime.date();
    archive_root
        .join(format!("{:04}", date.year()))
        .join(format!("{:02}", date.month()))
        .join(format!("{:02}", date.day()))
        .join(format!(
            "{}_{}{}",
            identity.datetime_key(),
            identity.hash_hex(),
            ext
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentHash;
    use chrono::NaiveDate;

    fn identity(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> CaptureIdentity {
        CaptureIdentity {
            datetime: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(hh, mm, ss)
                .unwrap(),
            content_hash: ContentHash([
                0xab, 0xc1, 0x23, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01,
            ]),
        }
    }

    #[test]
    fn test_layout() {
        let dest = resolve_destination(
            &identity(2020, 5, 1, 10, 0, 0),
            ".jpg",
            Path::new("/archive"),
        );
        assert_eq!(
            dest,
            PathBuf::from("/archive/2020/05/01/20200501100000_abc12300000000000000000000000001.jpg")
        );
    }

    #[test]
    fn test_zero_padding() {
        let dest = resolve_destination(&identity(33, 1, 2, 3, 4, 5), ".png", Path::new("a"));
        assert!(dest.starts_with("a/0033/01/02"));
        assert!(dest
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("00330102030405_"));
    }

    #[test]
    fn test_deterministic() {
        let id = identity(2021, 12, 31, 23, 59, 59);
        assert_eq!(
            resolve_destination(&id, ".jpeg", Path::new("/a")),
            resolve_destination(&id.clone(), ".jpeg", Path::new("/a"))
        );
    }
}
