use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Timelike};
use exif::{In, Reader, Tag, Value};
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::types::ImageKind;

/// Capture time from embedded EXIF metadata, if the kind carries any and it decodes
///
/// Decode failures are not errors: the caller falls back to the file's
/// modification time.
pub fn try_extract_capture_time(path: &Path, kind: ImageKind) -> Option<NaiveDateTime> {
    if !kind.has_embedded_metadata() {
        return None;
    }

    match read_exif_datetime(path) {
        Ok(Some(taken)) => {
            debug!("EXIF taken {} for {}", taken, path.display());
            Some(taken)
        }
        Ok(None) => {
            debug!("No EXIF capture date in {}", path.display());
            None
        }
        Err(e) => {
            debug!("Failed to decode EXIF for {}: {}", path.display(), e);
            None
        }
    }
}

/// Last-modified time in local time, truncated to whole seconds
pub fn modification_time(path: &Path) -> Result<NaiveDateTime> {
    let modified = std::fs::metadata(path)?.modified()?;
    let local: DateTime<Local> = modified.into();
    let naive = local.naive_local();
    Ok(naive.with_nanosecond(0).unwrap_or(naive))
}

fn read_exif_datetime(path: &Path) -> std::result::Result<Option<NaiveDateTime>, exif::Error> {
    let file = File::open(path)?;
    let exif = Reader::new().read_from_container(&mut BufReader::new(file))?;

    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY));

    let Some(field) = field else {
        return Ok(None);
    };

    let taken = match field.value {
        Value::Ascii(ref values) => values
            .first()
            .and_then(|raw| exif::DateTime::from_ascii(raw).ok())
            .and_then(|dt| {
                NaiveDate::from_ymd_opt(dt.year.into(), dt.month.into(), dt.day.into())?
                    .and_hms_opt(dt.hour.into(), dt.minute.into(), dt.second.into())
            }),
        _ => None,
    };

    Ok(taken)
}
