use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::models::{PerformanceEvent, PerformanceRow};

/// Remove exact duplicate rows, keeping the last occurrence of each.
/// Surviving rows keep their relative order.
pub fn dedup_keep_last<T: Eq + Hash>(rows: Vec<T>) -> Vec<T> {
    let keep = {
        let mut seen = HashSet::with_capacity(rows.len());
        let mut keep = vec![false; rows.len()];
        for (i, row) in rows.iter().enumerate().rev() {
            keep[i] = seen.insert(row);
        }
        keep
    };

    rows.into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect()
}

/// Make setlist ids unique and keep the empty-event marker consistent.
///
/// Rows run through [`dedup_keep_last`] first. A setlist id that still maps
/// to differing event metadata keeps only the last-seen version, and the
/// `song = None` row of an event survives only if the event has no songs.
pub fn unique_setlists(rows: Vec<PerformanceRow>) -> Vec<PerformanceRow> {
    let rows = dedup_keep_last(rows);

    let keep: Vec<bool> = {
        let mut latest: HashMap<&str, &PerformanceEvent> = HashMap::new();
        let mut has_songs: HashSet<&str> = HashSet::new();
        for row in &rows {
            latest.insert(&row.event.setlist_id, &row.event);
            if row.song.is_some() {
                has_songs.insert(&row.event.setlist_id);
            }
        }

        rows.iter()
            .map(|row| {
                let id = row.event.setlist_id.as_str();
                let current = latest.get(id).is_some_and(|e| **e == row.event);
                let marker_ok = row.song.is_some() || !has_songs.contains(id);
                current && marker_ok
            })
            .collect()
    };

    let conflicts = keep.iter().filter(|k| !**k).count();
    if conflicts > 0 {
        log::debug!("Dropped {conflicts} superseded setlist rows");
    }

    rows.into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect()
}
