use std::collections::HashMap;

use super::models::{CatalogTrack, JoinedRow, PerformanceRow};
use crate::normalize::join_key;
use crate::NON_ALBUM;

/// Index catalog tracks by join key. When two tracks share a key, the first
/// one in catalog order is the match.
pub fn index_catalog(tracks: &[CatalogTrack]) -> HashMap<String, &CatalogTrack> {
    let mut by_key: HashMap<String, &CatalogTrack> = HashMap::with_capacity(tracks.len());
    for track in tracks {
        if let Some(key) = join_key(Some(&track.song)) {
            by_key.entry(key).or_insert(track);
        }
    }
    by_key
}

/// Left-join performance rows onto catalog tracks by normalized title.
///
/// Every input row yields exactly one output row, in input order.
pub fn left_join(tracks: &[CatalogTrack], rows: &[PerformanceRow]) -> Vec<JoinedRow> {
    let by_key = index_catalog(tracks);
    let mut unmatched = 0usize;

    let joined: Vec<JoinedRow> = rows
        .iter()
        .map(|row| {
            let Some(song) = &row.song else {
                return JoinedRow {
                    event: row.event.clone(),
                    song: None,
                    album: None,
                    release_year: None,
                };
            };

            match join_key(Some(song)).and_then(|key| by_key.get(&key)) {
                Some(track) => JoinedRow {
                    event: row.event.clone(),
                    song: Some(track.song.clone()),
                    album: Some(track.album.clone()),
                    release_year: track.release_year,
                },
                None => {
                    unmatched += 1;
                    JoinedRow {
                        event: row.event.clone(),
                        song: Some(song.clone()),
                        album: Some(NON_ALBUM.to_string()),
                        release_year: None,
                    }
                }
            }
        })
        .collect();

    log::debug!("Join: {} rows, {} non-album songs", joined.len(), unmatched);
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::models::PerformanceEvent;
    use chrono::NaiveDate;

    fn track(album: &str, year: i32, song: &str) -> CatalogTrack {
        CatalogTrack {
            album: album.into(),
            release_year: Some(year),
            song: song.into(),
        }
    }

    fn perf(id: &str, song: Option<&str>) -> PerformanceRow {
        PerformanceRow {
            event: PerformanceEvent {
                setlist_id: id.into(),
                event_date: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
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
    fn test_case_insensitive_match_uses_catalog_title() {
        let tracks = vec![track("Album A", 2000, "Song X")];
        let joined = left_join(&tracks, &[perf("s1", Some("song x"))]);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].song.as_deref(), Some("Song X"));
        assert_eq!(joined[0].album.as_deref(), Some("Album A"));
        assert_eq!(joined[0].release_year, Some(2000));
    }

    #[test]
    fn test_unmatched_gets_sentinel() {
        let tracks = vec![track("Album A", 2000, "Song X")];
        let joined = left_join(&tracks, &[perf("s1", Some("Cover Song"))]);
        assert_eq!(joined[0].album.as_deref(), Some(NON_ALBUM));
        assert_eq!(joined[0].release_year, None);
        assert_eq!(joined[0].song.as_deref(), Some("Cover Song"));
    }

    #[test]
    fn test_empty_event_kept_blank() {
        let joined = left_join(&[], &[perf("s1", None)]);
        assert_eq!(joined.len(), 1);
        assert!(joined[0].song.is_none());
        assert!(joined[0].album.is_none());
    }

    #[test]
    fn test_many_to_one_first_match_wins() {
        let tracks = vec![
            track("Album A", 2000, "Song X"),
            track("Best Of", 2010, "SONG X"),
        ];
        let rows = vec![perf("s1", Some("Song X")), perf("s2", Some("song x"))];
        let joined = left_join(&tracks, &rows);
        assert_eq!(joined.len(), 2);
        assert!(joined.iter().all(|r| r.album.as_deref() == Some("Album A")));
    }

    #[test]
    fn test_every_row_exactly_once() {
        let tracks = vec![track("Album A", 2000, "Song X")];
        let rows = vec![
            perf("s1", Some("Song X")),
            perf("s1", Some("Other")),
            perf("s2", None),
        ];
        let joined = left_join(&tracks, &rows);
        assert_eq!(joined.len(), rows.len());
        for (j, r) in joined.iter().zip(&rows) {
            assert_eq!(j.event, r.event);
            assert_eq!(j.album.is_some(), r.song.is_some());
        }
    }
}
