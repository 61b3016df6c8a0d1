use crate::services::fs::FsEntry;
use std::cmp::Ordering;

/// Sibling order: directories before everything else, then names compared
/// case-insensitively. Names that differ only in case fall back to a
/// byte-wise comparison so the order is total.
pub fn compare(a: &FsEntry, b: &FsEntry) -> Ordering {
    match (a.is_dir(), b.is_dir()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    }
}

pub fn sort_entries(entries: &mut [FsEntry]) {
    entries.sort_by(compare);
}
