use crate::error::PlanError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Lists the immediate entries of `dir` accepted by `filter`, sorted by name.
///
/// Symlinks are classified by their target; a dangling one counts as a file.
pub fn scan_directory<F>(dir: &Path, filter: F) -> Result<Vec<ScannedEntry>, PlanError>
where
    F: Fn(&str) -> bool,
{
    let read_dir = fs::read_dir(dir).map_err(|source| directory_access(dir, source))?;

    let mut out = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| directory_access(dir, source))?;
        let Ok(name) = entry.file_name().into_string() else {
            warn!(
                "skipping entry with a non UTF-8 name in {}: {:?}",
                dir.display(),
                entry.file_name()
            );
            continue;
        };
        if !filter(name.as_str()) {
            continue;
        }
        let kind = if is_directory(&dir.join(&name)) {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        out.push(ScannedEntry { name, kind });
    }
    out.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(out)
}

// `fs::metadata` follows links; any error (including a broken link) means "not a directory".
fn is_directory(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Default filter: visible `.jpg`/`.jpeg` files, any case.
pub fn is_jpeg_name(name: &str) -> bool {
    if name.starts_with('.') {
        return false;
    }
    Path::new(name)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg")
        })
        .unwrap_or(false)
}

fn directory_access(dir: &Path, source: std::io::Error) -> PlanError {
    warn!("cannot read directory {}: {source}", dir.display());
    PlanError::DirectoryAccess {
        path: dir.to_path_buf(),
        source,
    }
}
