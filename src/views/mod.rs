//! Derived tables over the joined dataset.
//!
//! Every builder is a pure function of its input tables and returns one
//! [`View`]: a title plus typed rows. A view whose percentage denominator
//! would be zero comes back empty rather than dividing.

pub mod albums;
pub mod geo;
pub mod songs;
pub mod summary;
pub mod temporal;

use std::collections::HashSet;
use std::num::NonZeroU64;

use serde::Serialize;

use crate::table::models::PerformanceEvent;
use crate::table::JoinedTable;

/// A titled table handed to a renderer or printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View<R> {
    pub title: String,
    pub rows: Vec<R>,
}

impl<R> View<R> {
    pub fn new(title: String, rows: Vec<R>) -> Self {
        Self { title, rows }
    }

    /// No qualifying input rows: correct schema, nothing to show.
    pub fn empty(title: String) -> Self {
        log::debug!("No data for view {title:?}");
        Self { title, rows: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` rows (chart tables show the top 30 only).
    pub fn top(&self, n: usize) -> &[R] {
        &self.rows[..n.min(self.rows.len())]
    }
}

/// A percentage denominator that cannot be zero.
#[derive(Debug, Clone, Copy)]
pub struct Denominator(NonZeroU64);

impl Denominator {
    pub fn new(total: u64) -> Option<Self> {
        NonZeroU64::new(total).map(Self)
    }

    /// `part / total × 100`, rounded to one decimal.
    pub fn percentage(&self, part: u64) -> f64 {
        round1(part as f64 / self.0.get() as f64 * 100.0)
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Hover label: `"12 (34.5%)"`.
pub fn count_with_share(count: u64, percentage: f64) -> String {
    format!("{count} ({percentage:.1}%)")
}

/// Title of a view: `"{artist} - {what}"`.
pub(crate) fn titled(artist: &str, what: &str) -> String {
    format!("{artist} - {what}")
}

/// One event per setlist id, in first-seen order. Event-level views count
/// these, never rows, so multi-song events count once.
pub(crate) fn distinct_events(table: &JoinedTable) -> Vec<&PerformanceEvent> {
    let mut seen = HashSet::new();
    table
        .rows()
        .iter()
        .filter(|r| seen.insert(r.setlist_id()))
        .map(|r| &r.event)
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use crate::table::models::{Coordinates, JoinedRow, PerformanceEvent};
    use crate::table::JoinedTable;
    use crate::NON_ALBUM;

    /// Event builder for view tests.
    pub fn event(id: &str, date: (i32, u32, u32), city: &str, country: (&str, &str)) -> PerformanceEvent {
        PerformanceEvent {
            setlist_id: id.into(),
            event_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            artist: "Band".into(),
            tour: None,
            venue_id: None,
            venue: None,
            venue_url: None,
            city: Some(city.into()),
            coordinates: Some(Coordinates { latitude: 1.0, longitude: 2.0 }),
            country_code: Some(country.0.into()),
            country: Some(country.1.into()),
        }
    }

    /// A matched or non-album song row.
    pub fn song(event: &PerformanceEvent, song: &str, album: Option<(&str, i32)>) -> JoinedRow {
        JoinedRow {
            event: event.clone(),
            song: Some(song.into()),
            album: Some(album.map(|a| a.0).unwrap_or(NON_ALBUM).into()),
            release_year: album.map(|a| a.1),
        }
    }

    /// The single row of an event without songs.
    pub fn empty(event: &PerformanceEvent) -> JoinedRow {
        JoinedRow {
            event: event.clone(),
            song: None,
            album: None,
            release_year: None,
        }
    }

    pub fn table(rows: Vec<JoinedRow>) -> JoinedTable {
        JoinedTable::from_rows(rows)
    }
}
