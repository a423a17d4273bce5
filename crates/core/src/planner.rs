use crate::conflict::resolve_conflicts;
use crate::error::PlanError;
use crate::exif_reader::read_capture_date;
use crate::metadata::DateRange;
use crate::naming::{make_new_dir_name, make_new_file_name, NamingOptions};
use crate::scanner::{is_jpeg_name, scan_directory, EntryKind, ScannedEntry};
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One proposed rename. `destination` is `None` when no capture date was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameEntry {
    pub source: String,
    pub destination: Option<String>,
}

impl RenameEntry {
    pub fn new(source: impl Into<String>, destination: Option<impl Into<String>>) -> Self {
        Self {
            source: source.into(),
            destination: destination.map(Into::into),
        }
    }
}

/// Old-to-new names for the entries of one directory, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameMap {
    pub base_dir: PathBuf,
    pub kind: EntryKind,
    pub entries: Vec<RenameEntry>,
}

impl RenameMap {
    /// Entries that actually propose a new name.
    pub fn proposed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|entry| {
            entry
                .destination
                .as_deref()
                .map(|dest| (entry.source.as_str(), dest))
        })
    }

    pub fn has_changes(&self) -> bool {
        self.proposed().next().is_some()
    }
}

/// Plans new names for the files of `dir` accepted by `filter`, one EXIF read per file.
pub fn plan_file_renames<F>(
    dir: &Path,
    filter: F,
    options: &NamingOptions,
) -> Result<RenameMap, PlanError>
where
    F: Fn(&str) -> bool,
{
    let listing = scan_directory(dir, |_| true)?;
    let files: Vec<&ScannedEntry> = listing
        .iter()
        .filter(|entry| entry.kind == EntryKind::File && filter(entry.name.as_str()))
        .collect();

    let proposed: Vec<RenameEntry> = files
        .par_iter()
        .map(|entry| RenameEntry {
            source: entry.name.clone(),
            destination: read_capture_date(&dir.join(&entry.name))
                .map(|date| make_new_file_name(&entry.name, date, options)),
        })
        .collect();

    Ok(finish_plan(dir, EntryKind::File, &listing, proposed))
}

/// Plans new names for the subdirectories of `dir` from the capture dates of the JPEGs
/// inside each of them.
pub fn plan_dir_renames(dir: &Path, options: &NamingOptions) -> Result<RenameMap, PlanError> {
    let listing = scan_directory(dir, |_| true)?;
    let subdirs: Vec<&ScannedEntry> = listing
        .iter()
        .filter(|entry| entry.kind == EntryKind::Directory && !entry.name.starts_with('.'))
        .collect();

    let proposed: Vec<RenameEntry> = subdirs
        .par_iter()
        .map(|entry| RenameEntry {
            source: entry.name.clone(),
            destination: extract_dir_date_range(&dir.join(&entry.name), is_jpeg_name)
                .map(|range| make_new_dir_name(&entry.name, range, options)),
        })
        .collect();

    Ok(finish_plan(dir, EntryKind::Directory, &listing, proposed))
}

/// Earliest and latest capture date among the files of `dir` accepted by `filter`.
///
/// `None` when the directory cannot be read or holds no dated photo.
pub fn extract_dir_date_range<F>(dir: &Path, filter: F) -> Option<DateRange>
where
    F: Fn(&str) -> bool,
{
    let files = scan_directory(dir, filter).ok()?;
    let dates: Vec<_> = files
        .par_iter()
        .filter(|entry| entry.kind == EntryKind::File)
        .filter_map(|entry| read_capture_date(&dir.join(&entry.name)))
        .collect();

    let range = DateRange::from_timestamps(dates);
    if range.is_none() {
        info!(
            "{} does not contain any photo with a readable EXIF date",
            dir.display()
        );
    }
    range
}

fn finish_plan(
    dir: &Path,
    kind: EntryKind,
    listing: &[ScannedEntry],
    proposed: Vec<RenameEntry>,
) -> RenameMap {
    let entries: Vec<RenameEntry> = proposed
        .into_iter()
        .filter(|entry| entry.destination.as_deref() != Some(entry.source.as_str()))
        .collect();

    // Anything not being moved away keeps its name and blocks that name as a target.
    let moving: HashSet<&str> = entries
        .iter()
        .filter(|entry| entry.destination.is_some())
        .map(|entry| entry.source.as_str())
        .collect();
    let occupied: HashSet<String> = listing
        .iter()
        .filter(|entry| !moving.contains(entry.name.as_str()))
        .map(|entry| entry.name.clone())
        .collect();

    RenameMap {
        base_dir: dir.to_path_buf(),
        kind,
        entries: resolve_conflicts(entries, kind, &occupied),
    }
}
