use crate::metadata::CaptureTimestamp;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use exif::{In, Reader, Tag, Value};
use log::{debug, warn};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

/// Farthest offset at which a JPEG Exif block can still begin.
pub const EXIF_SCAN_LIMIT: u64 = 65_635;

/// Reads `DateTimeOriginal` from the photo at `path`.
///
/// Every failure (missing or unreadable file, truncated or corrupt EXIF, absent tag)
/// is logged and reported as `None`.
pub fn read_capture_date(path: &Path) -> Option<CaptureTimestamp> {
    let prefix = match read_prefix(path) {
        Ok(prefix) => prefix,
        Err(err) => {
            debug!("{err:#}");
            return None;
        }
    };

    let exif = match Reader::new().read_from_container(&mut Cursor::new(prefix)) {
        Ok(exif) => exif,
        Err(err) => {
            warn!("EXIF unreadable in {}: {err}", path.display());
            return None;
        }
    };

    let date = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .and_then(|field| parse_date_time(&field.value));
    if date.is_none() {
        debug!("EXIF date not present in {}", path.display());
    }
    date
}

fn read_prefix(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path)
        .with_context(|| format!("photo is inaccessible: {}", path.display()))?;
    let mut prefix = Vec::new();
    file.take(EXIF_SCAN_LIMIT)
        .read_to_end(&mut prefix)
        .with_context(|| format!("unable to read photo: {}", path.display()))?;
    Ok(prefix)
}

fn parse_date_time(value: &Value) -> Option<CaptureTimestamp> {
    let Value::Ascii(parts) = value else {
        return None;
    };
    let raw = exif::DateTime::from_ascii(parts.first()?).ok()?;
    let naive = NaiveDate::from_ymd_opt(raw.year.into(), raw.month.into(), raw.day.into())?
        .and_hms_opt(raw.hour.into(), raw.minute.into(), raw.second.into())?;
    Some(naive.and_utc())
}
