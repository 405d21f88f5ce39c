use std::hash::{Hash, Hasher};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// A studio track, attributed to an album and release year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CatalogTrack {
    pub album: String,
    pub release_year: Option<i32>,
    pub song: String,
}

/// City coordinates. Compared bitwise so rows can be hashed for dedup.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl PartialEq for Coordinates {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl Eq for Coordinates {}

impl Hash for Coordinates {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

/// One live show with its venue and geography.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PerformanceEvent {
    pub setlist_id: String,
    pub event_date: NaiveDate,
    pub artist: String,
    pub tour: Option<String>,
    pub venue_id: Option<String>,
    pub venue: Option<String>,
    pub venue_url: Option<String>,
    pub city: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub country_code: Option<String>,
    pub country: Option<String>,
}

impl PerformanceEvent {
    pub fn year(&self) -> i32 {
        self.event_date.year()
    }
}

/// An event × one of its live songs. `song` is `None` only for an event
/// with no live songs at all, which still gets exactly one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PerformanceRow {
    pub event: PerformanceEvent,
    pub song: Option<String>,
}

/// A performance row with its catalog attribution.
///
/// `album` is the matched album, [`crate::NON_ALBUM`] for an unmatched song,
/// or `None` when the event had no songs. `song` is the catalog title when
/// matched, otherwise the performed title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRow {
    pub event: PerformanceEvent,
    pub song: Option<String>,
    pub album: Option<String>,
    pub release_year: Option<i32>,
}

impl JoinedRow {
    pub fn setlist_id(&self) -> &str {
        &self.event.setlist_id
    }

    pub fn event_year(&self) -> i32 {
        self.event.year()
    }
}
