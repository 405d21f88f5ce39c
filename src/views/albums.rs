use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use super::songs::{cmp_year_none_last, song_ranking};
use super::{count_with_share, titled, Denominator, View};
use crate::table::{CatalogTable, JoinedTable};
use crate::NON_ALBUM;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumYearCount {
    pub album: String,
    pub event_year: i32,
    pub release_year: Option<i32>,
    pub count: u64,
    /// Share of that event year's song rows.
    pub percentage: f64,
    /// `"3 (75.0%)"`
    pub count_label: String,
    /// Legend text, see [`legend_label`]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumShare {
    pub album: String,
    pub release_year: Option<i32>,
    pub label: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseMarker {
    pub release_year: i32,
    pub album: String,
}

/// Legend text for an album: `"Album (2004)"`. The non-album bucket and
/// albums without a year keep their bare name.
pub fn legend_label(album: &str, release_year: Option<i32>) -> String {
    match release_year {
        Some(year) if album != NON_ALBUM => format!("{album} ({year})"),
        _ => album.to_string(),
    }
}

/// Song rows per (album, event year, release year) over filled setlists.
/// Each percentage is relative to its event year, not to the whole table.
pub fn album_over_time(table: &JoinedTable) -> View<AlbumYearCount> {
    let title = titled(table.artist(), "Albums Played Over the Years");

    let mut groups: HashMap<(&str, i32, Option<i32>), u64> = HashMap::new();
    for row in table.filled_rows() {
        let Some(album) = row.album.as_deref() else { continue };
        *groups
            .entry((album, row.event_year(), row.release_year))
            .or_default() += 1;
    }
    if groups.is_empty() {
        return View::empty(title);
    }

    let rows = groups
        .into_iter()
        .map(|((album, event_year, release_year), count)| AlbumYearCount {
            album: album.to_string(),
            event_year,
            release_year,
            count,
            percentage: 0.0,
            count_label: String::new(),
            label: legend_label(album, release_year),
        })
        .collect();
    View::new(title, with_year_shares(rows))
}

/// [`album_over_time`] over every album × every event year, absent
/// combinations filled with count 0. Shares are recomputed on the filled
/// table.
pub fn album_over_time_dense(table: &JoinedTable) -> View<AlbumYearCount> {
    let title = titled(table.artist(), "Shares of Albums Played Over the Years");
    let sparse = album_over_time(table);
    if sparse.is_empty() {
        return View::empty(title);
    }

    let mut release_years: HashMap<&str, Option<i32>> = HashMap::new();
    let mut counts: HashMap<(&str, i32), u64> = HashMap::new();
    let mut years: BTreeSet<i32> = BTreeSet::new();
    for row in &sparse.rows {
        let known = release_years.entry(row.album.as_str()).or_insert(None);
        if known.is_none() {
            *known = row.release_year;
        }
        *counts.entry((row.album.as_str(), row.event_year)).or_default() += row.count;
        years.insert(row.event_year);
    }

    let mut rows = Vec::with_capacity(release_years.len() * years.len());
    for (&album, &release_year) in &release_years {
        for &event_year in &years {
            rows.push(AlbumYearCount {
                album: album.to_string(),
                event_year,
                release_year,
                count: counts.get(&(album, event_year)).copied().unwrap_or(0),
                percentage: 0.0,
                count_label: String::new(),
                label: legend_label(album, release_year),
            });
        }
    }
    log::debug!(
        "Densified {} album-year rows to {} ({} albums x {} years)",
        sparse.rows.len(),
        rows.len(),
        release_years.len(),
        years.len()
    );
    View::new(title, with_year_shares(rows))
}

/// Fill in per-event-year percentages and their labels, then sort by
/// release year (unknown last), event year, then album.
fn with_year_shares(mut rows: Vec<AlbumYearCount>) -> Vec<AlbumYearCount> {
    let mut totals: HashMap<i32, u64> = HashMap::new();
    for row in &rows {
        *totals.entry(row.event_year).or_default() += row.count;
    }
    for row in &mut rows {
        row.percentage = totals
            .get(&row.event_year)
            .and_then(|t| Denominator::new(*t))
            .map(|d| d.percentage(row.count))
            .unwrap_or(0.0);
        row.count_label = count_with_share(row.count, row.percentage);
    }
    rows.sort_by(|a, b| {
        cmp_year_none_last(a.release_year, b.release_year)
            .then_with(|| a.event_year.cmp(&b.event_year))
            .then_with(|| a.album.cmp(&b.album))
    });
    rows
}

/// Song-ranking counts summed per album, largest share first.
pub fn album_shares(table: &JoinedTable) -> View<AlbumShare> {
    let title = titled(table.artist(), "Shares of Album Songs in Setlists");

    let mut sums: HashMap<(String, Option<i32>), u64> = HashMap::new();
    for row in song_ranking(table).rows {
        *sums.entry((row.album, row.release_year)).or_default() += row.count;
    }

    let Some(denom) = Denominator::new(sums.values().sum()) else {
        return View::empty(title);
    };

    let mut rows: Vec<AlbumShare> = sums
        .into_iter()
        .map(|((album, release_year), count)| AlbumShare {
            label: legend_label(&album, release_year),
            album,
            release_year,
            count,
            percentage: denom.percentage(count),
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.album.cmp(&b.album)));
    View::new(title, rows)
}

/// First album of each release year, in catalog order.
pub fn release_markers(catalog: &CatalogTable) -> Vec<ReleaseMarker> {
    let mut seen = HashSet::new();
    catalog
        .tracks()
        .iter()
        .filter_map(|t| t.release_year.map(|y| (y, t)))
        .filter(|(year, _)| seen.insert(*year))
        .map(|(release_year, t)| ReleaseMarker {
            release_year,
            album: t.album.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::models::CatalogTrack;
    use crate::views::fixtures::{empty, event, song, table};

    fn fixture() -> JoinedTable {
        let a = event("a", (2001, 1, 1), "Oslo", ("NO", "Norway"));
        let b = event("b", (2001, 6, 1), "Oslo", ("NO", "Norway"));
        let c = event("c", (2003, 1, 1), "Oslo", ("NO", "Norway"));
        let d = event("d", (2004, 1, 1), "Oslo", ("NO", "Norway"));
        table(vec![
            song(&a, "X", Some(("First", 2000))),
            song(&a, "Y", Some(("First", 2000))),
            song(&a, "Cover", None),
            song(&b, "X", Some(("First", 2000))),
            song(&c, "Z", Some(("Second", 2002))),
            empty(&d),
        ])
    }

    #[test]
    fn test_legend_label() {
        assert_eq!(legend_label("First", Some(2000)), "First (2000)");
        assert_eq!(legend_label(NON_ALBUM, None), NON_ALBUM);
        assert_eq!(legend_label("Untitled", None), "Untitled");
    }

    #[test]
    fn test_album_over_time_per_year_share() {
        let view = album_over_time(&fixture());
        assert_eq!(view.title, "Band - Albums Played Over the Years");
        assert_eq!(view.rows.len(), 3);

        assert_eq!(view.rows[0].album, "First");
        assert_eq!(view.rows[0].event_year, 2001);
        assert_eq!(view.rows[0].count, 3);
        assert_eq!(view.rows[0].percentage, 75.0);
        assert_eq!(view.rows[0].count_label, "3 (75.0%)");
        assert_eq!(view.rows[0].label, "First (2000)");

        assert_eq!(view.rows[1].album, "Second");
        assert_eq!(view.rows[1].percentage, 100.0);

        // Non-album rows carry no release year and sort last
        assert_eq!(view.rows[2].album, NON_ALBUM);
        assert_eq!(view.rows[2].percentage, 25.0);
        assert_eq!(view.rows[2].count_label, "1 (25.0%)");
    }

    #[test]
    fn test_dense_is_full_product() {
        let view = album_over_time_dense(&fixture());
        // 3 albums x 2 event years (2004 has no songs)
        assert_eq!(view.rows.len(), 6);

        let filled = view
            .rows
            .iter()
            .find(|r| r.album == "Second" && r.event_year == 2001)
            .unwrap();
        assert_eq!(filled.count, 0);
        assert_eq!(filled.percentage, 0.0);
        assert_eq!(filled.release_year, Some(2002));
        assert_eq!(filled.count_label, "0 (0.0%)");
        assert_eq!(filled.label, "Second (2002)");

        for year in [2001, 2003] {
            let sum: f64 = view
                .rows
                .iter()
                .filter(|r| r.event_year == year)
                .map(|r| r.percentage)
                .sum();
            assert!((sum - 100.0).abs() <= 0.1);
        }
    }

    #[test]
    fn test_album_row_json_carries_count_label() {
        let a = event("a", (2001, 1, 1), "Oslo", ("NO", "Norway"));
        let t = table(vec![song(&a, "X", Some(("First", 2000))), song(&a, "Cover", None)]);
        let view = album_over_time(&t);
        let json = serde_json::to_value(&view.rows[0]).unwrap();
        assert_eq!(json["album"], "First");
        assert_eq!(json["count_label"], "1 (50.0%)");
        assert_eq!(json["label"], "First (2000)");
    }

    #[test]
    fn test_album_views_empty_without_songs() {
        let d = event("d", (2004, 1, 1), "Oslo", ("NO", "Norway"));
        let t = table(vec![empty(&d)]);
        assert!(album_over_time(&t).is_empty());
        assert!(album_over_time_dense(&t).is_empty());
        assert!(album_shares(&t).is_empty());
    }

    #[test]
    fn test_album_shares() {
        let view = album_shares(&fixture());
        // ranking counts: X=2, Y=1, Cover=1, Z=1
        assert_eq!(view.rows[0].album, "First");
        assert_eq!(view.rows[0].count, 3);
        assert_eq!(view.rows[0].percentage, 60.0);
        assert_eq!(view.rows[0].label, "First (2000)");
        let sum: f64 = view.rows.iter().map(|r| r.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.1);
    }

    #[test]
    fn test_release_markers_first_album_per_year() {
        let track = |album: &str, year: Option<i32>, song: &str| CatalogTrack {
            album: album.into(),
            release_year: year,
            song: song.into(),
        };
        let catalog = CatalogTable::from_tracks(vec![
            track("Debut", Some(1990), "a"),
            track("Debut", Some(1990), "b"),
            track("Live EP", Some(1990), "c"),
            track("Lost Tapes", None, "d"),
            track("Return", Some(1995), "e"),
        ]);
        let markers = release_markers(&catalog);
        assert_eq!(
            markers,
            vec![
                ReleaseMarker { release_year: 1990, album: "Debut".into() },
                ReleaseMarker { release_year: 1995, album: "Return".into() },
            ]
        );
    }
}
