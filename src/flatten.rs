//! Flatten nested feed records into one row per leaf.
//!
//! Catalog: master → tracklist entry. Setlists take two passes: record →
//! set sections (main set, encores), then section → songs. Tape entries are
//! dropped between the second pass and title extraction.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::feed::schema::{MasterRelease, SetSection, SetlistRecord, Sets, SongEntry};
use crate::normalize::{clean_title, repair_encoding};
use crate::table::models::{CatalogTrack, Coordinates, PerformanceEvent, PerformanceRow};

/// A record whose nested payload could not be flattened. The record is
/// skipped; the rest of the batch continues.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("malformed structure in record {record}: {reason}")]
pub struct MalformedStructure {
    pub record: String,
    pub reason: String,
}

/// Output of a flatten run.
#[derive(Debug)]
pub struct Flattened<T> {
    pub rows: Vec<T>,
    pub skipped: Vec<MalformedStructure>,
    /// Song entries dropped as played from tape
    pub tape_entries: usize,
}

/// Identify a raw record for error messages: its `id`, else its `title`,
/// else its position in the feed.
fn record_label(record: &Value, index: usize) -> String {
    ["id", "title"]
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| format!("#{index}"))
}

fn malformed(record: &Value, index: usize, reason: impl ToString) -> MalformedStructure {
    let err = MalformedStructure {
        record: record_label(record, index),
        reason: reason.to_string(),
    };
    log::warn!("Skipping record: {err}");
    err
}

/// Flatten Discogs masters into one catalog track per tracklist entry.
pub fn flatten_catalog(records: &[Value]) -> Flattened<CatalogTrack> {
    let mut out = Flattened {
        rows: Vec::new(),
        skipped: Vec::new(),
        tape_entries: 0,
    };

    for (i, record) in records.iter().enumerate() {
        let master = match MasterRelease::deserialize(record) {
            Ok(m) => m,
            Err(e) => {
                out.skipped.push(malformed(record, i, e));
                continue;
            }
        };

        let album = repair_encoding(master.title.trim());
        let release_year = master.year.filter(|y| *y > 0);

        for entry in master.tracklist.iter().filter(|e| !e.is_heading()) {
            match entry.title.as_deref().and_then(clean_title) {
                Some(song) => out.rows.push(CatalogTrack {
                    album: album.clone(),
                    release_year,
                    song,
                }),
                None => log::debug!("{album}: tracklist entry without a title"),
            }
        }
    }

    log::info!(
        "Flattened {} catalog tracks from {} records ({} skipped)",
        out.rows.len(),
        records.len(),
        out.skipped.len()
    );
    out
}

/// First pass output: one set section of one event.
struct SectionRow<'a> {
    label: String,
    songs: &'a [SongEntry],
}

/// First pass: explode an event's `sets.set` list into one row per section.
fn explode_sections(sets: &Sets) -> Vec<SectionRow<'_>> {
    sets.set
        .iter()
        .enumerate()
        .map(|(i, section)| SectionRow {
            label: section_label(section, i),
            songs: &section.song,
        })
        .collect()
}

fn section_label(section: &SetSection, index: usize) -> String {
    match (&section.name, section.encore) {
        (Some(name), _) if !name.is_empty() => name.clone(),
        (_, Some(n)) => format!("Encore {n}"),
        _ => format!("Set {}", index + 1),
    }
}

/// Second pass: explode each section's songs, in order across sections.
/// Tape entries are discarded before their title is read.
fn explode_songs(sections: &[SectionRow<'_>], tape_entries: &mut usize) -> Vec<String> {
    let mut songs = Vec::new();
    for section in sections {
        for entry in section.songs {
            if entry.tape {
                *tape_entries += 1;
                log::debug!("{}: dropping tape entry {:?}", section.label, entry.name);
                continue;
            }
            match entry.name.as_deref().and_then(clean_title) {
                Some(title) => songs.push(title),
                None => log::debug!("{}: song entry without a title", section.label),
            }
        }
    }
    songs
}

/// Decode event metadata from a setlist record.
fn to_event(record: SetlistRecord) -> Result<(PerformanceEvent, Sets), String> {
    let event_date = NaiveDate::parse_from_str(record.event_date.trim(), "%d-%m-%Y")
        .map_err(|e| format!("bad event date {:?}: {e}", record.event_date))?;

    let venue = record.venue;
    let city = venue.as_ref().and_then(|v| v.city.as_ref());
    let coordinates = city
        .and_then(|c| c.coords.as_ref())
        .and_then(|c| match (c.lat, c.long) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        });
    let country = city.and_then(|c| c.country.as_ref());

    let event = PerformanceEvent {
        setlist_id: record.id,
        event_date,
        artist: record.artist.name,
        tour: record.tour.and_then(|t| t.name),
        venue_id: venue.as_ref().and_then(|v| v.id.clone()),
        venue: venue.as_ref().and_then(|v| v.name.clone()),
        venue_url: venue.as_ref().and_then(|v| v.url.clone()),
        city: city.and_then(|c| c.name.clone()),
        coordinates,
        country_code: country.and_then(|c| c.code.clone()),
        country: country.and_then(|c| c.name.clone()),
    };
    Ok((event, record.sets))
}

/// Flatten setlist.fm records into one row per live song. An event with no
/// live songs still yields one row with `song = None`.
pub fn flatten_setlists(records: &[Value]) -> Flattened<PerformanceRow> {
    let mut out = Flattened {
        rows: Vec::new(),
        skipped: Vec::new(),
        tape_entries: 0,
    };

    for (i, record) in records.iter().enumerate() {
        let decoded = SetlistRecord::deserialize(record)
            .map_err(|e| e.to_string())
            .and_then(to_event);
        let (event, sets) = match decoded {
            Ok(v) => v,
            Err(reason) => {
                out.skipped.push(malformed(record, i, reason));
                continue;
            }
        };

        let sections = explode_sections(&sets);
        let songs = explode_songs(&sections, &mut out.tape_entries);

        if songs.is_empty() {
            out.rows.push(PerformanceRow { event, song: None });
        } else {
            out.rows.extend(songs.into_iter().map(|song| PerformanceRow {
                event: event.clone(),
                song: Some(song),
            }));
        }
    }

    log::info!(
        "Flattened {} setlist rows from {} records ({} skipped, {} tape entries)",
        out.rows.len(),
        records.len(),
        out.skipped.len(),
        out.tape_entries
    );
    out
}
