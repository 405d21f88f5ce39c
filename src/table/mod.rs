pub mod dedup;
pub mod join;
pub mod models;

use chrono::NaiveDate;

use models::{CatalogTrack, JoinedRow, PerformanceRow};

/// Studio tracks, deduplicated. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct CatalogTable {
    tracks: Vec<CatalogTrack>,
}

impl CatalogTable {
    pub fn from_tracks(tracks: Vec<CatalogTrack>) -> Self {
        let before = tracks.len();
        let tracks = dedup::dedup_keep_last(tracks);
        log::info!("Catalog: {} tracks ({} duplicates removed)", tracks.len(), before - tracks.len());
        Self { tracks }
    }

    pub fn tracks(&self) -> &[CatalogTrack] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Past performances at song grain, deduplicated, unique by setlist id.
#[derive(Debug, Clone)]
pub struct PerformanceTable {
    rows: Vec<PerformanceRow>,
}

impl PerformanceTable {
    /// Build from flattened rows, dropping events on or after `today`.
    pub fn from_rows(rows: Vec<PerformanceRow>, today: NaiveDate) -> Self {
        let before = rows.len();
        let past: Vec<PerformanceRow> = rows
            .into_iter()
            .filter(|r| r.event.event_date < today)
            .collect();
        if past.len() < before {
            log::info!("Dropped {} rows for events on or after {today}", before - past.len());
        }

        let rows = dedup::unique_setlists(past);
        Self { rows }
    }

    pub fn rows(&self) -> &[PerformanceRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct events.
    pub fn event_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.event.setlist_id.as_str())
            .collect::<std::collections::HashSet<_>>()
            .len()
    }
}

/// Performances attributed to albums. Every view is computed from this.
#[derive(Debug, Clone)]
pub struct JoinedTable {
    artist: String,
    rows: Vec<JoinedRow>,
}

impl JoinedTable {
    pub fn join(catalog: &CatalogTable, performances: &PerformanceTable) -> Self {
        let rows = join::left_join(catalog.tracks(), performances.rows());
        let artist = rows
            .first()
            .map(|r| r.event.artist.clone())
            .unwrap_or_default();
        Self { artist, rows }
    }

    /// Build directly from joined rows.
    pub fn from_rows(rows: Vec<JoinedRow>) -> Self {
        let artist = rows
            .first()
            .map(|r| r.event.artist.clone())
            .unwrap_or_default();
        Self { artist, rows }
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn rows(&self) -> &[JoinedRow] {
        &self.rows
    }

    /// Rows of filled setlists: events with at least one live song.
    pub fn filled_rows(&self) -> impl Iterator<Item = &JoinedRow> {
        self.rows.iter().filter(|r| r.song.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::PerformanceEvent;

    fn perf(id: &str, date: NaiveDate, song: Option<&str>) -> PerformanceRow {
        PerformanceRow {
            event: PerformanceEvent {
                setlist_id: id.into(),
                event_date: date,
                artist: "Band".into(),
                tour: None,
                venue_id: None,
                venue: None,
                venue_url: None,
                city: None,
                coordinates: None,
                country_code: None,
                country: None,
            },
            song: song.map(String::from),
        }
    }

    #[test]
    fn test_future_and_today_dropped() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let rows = vec![
            perf("past", NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(), Some("A")),
            perf("today", today, Some("A")),
            perf("future", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), Some("A")),
        ];
        let table = PerformanceTable::from_rows(rows, today);
        assert_eq!(table.event_count(), 1);
        assert_eq!(table.rows()[0].event.setlist_id, "past");
    }

    #[test]
    fn test_catalog_dedup_before_join() {
        let track = CatalogTrack {
            album: "Album A".into(),
            release_year: Some(2000),
            song: "Song X".into(),
        };
        let catalog = CatalogTable::from_tracks(vec![track.clone(), track]);
        assert_eq!(catalog.len(), 1);

        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let performances = PerformanceTable::from_rows(
            vec![perf("s1", NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(), Some("song x"))],
            today,
        );
        let joined = JoinedTable::join(&catalog, &performances);
        assert_eq!(joined.rows().len(), 1);
        assert_eq!(joined.artist(), "Band");
    }
}
