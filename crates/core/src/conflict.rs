use crate::planner::RenameEntry;
use crate::scanner::EntryKind;
use std::collections::{HashMap, HashSet};

/// Makes every non-null destination unique.
///
/// Entries sharing a destination keep enumeration order: the first keeps the name,
/// the following ones get ` (2)`, ` (3)`, ... before the extension (files) or at the
/// end (directories). Names in `occupied`, and sources with no destination, stay in
/// place, so a destination equal to one of them is numbered from ` (2)` as well.
pub fn resolve_conflicts(
    entries: Vec<RenameEntry>,
    kind: EntryKind,
    occupied: &HashSet<String>,
) -> Vec<RenameEntry> {
    let mut taken: HashSet<String> = occupied.clone();
    taken.extend(
        entries
            .iter()
            .filter(|entry| entry.destination.is_none())
            .map(|entry| entry.source.clone()),
    );

    // First claimant of each free destination keeps it.
    let mut keeps = vec![false; entries.len()];
    for (index, entry) in entries.iter().enumerate() {
        if let Some(dest) = &entry.destination {
            if !taken.contains(dest) {
                taken.insert(dest.clone());
                keeps[index] = true;
            }
        }
    }

    let mut next_ordinal = HashMap::<String, usize>::new();
    entries
        .into_iter()
        .zip(keeps)
        .map(|(entry, keep)| match entry.destination {
            Some(dest) if !keep => {
                let ordinal = next_ordinal.entry(dest.clone()).or_insert(2);
                let mut candidate = numbered_name(&dest, *ordinal, kind);
                while taken.contains(&candidate) {
                    *ordinal += 1;
                    candidate = numbered_name(&dest, *ordinal, kind);
                }
                *ordinal += 1;
                taken.insert(candidate.clone());
                RenameEntry {
                    source: entry.source,
                    destination: Some(candidate),
                }
            }
            _ => entry,
        })
        .collect()
}

fn numbered_name(name: &str, ordinal: usize, kind: EntryKind) -> String {
    let (stem, ext) = match kind {
        EntryKind::File => split_extension(name),
        EntryKind::Directory => (name, ""),
    };
    format!("{stem} ({ordinal}){ext}")
}

// A leading dot belongs to the stem, so ".hidden" has no extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => name.split_at(pos),
        _ => (name, ""),
    }
}
