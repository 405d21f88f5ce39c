use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::{titled, Denominator, View};
use crate::normalize::join_key;
use crate::table::{CatalogTable, JoinedTable};
use crate::NON_ALBUM;

/// Upper play count for the "rarely played" table.
pub const RARELY_PLAYED_MAX: u64 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetlistSize {
    pub setlist_id: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongCount {
    pub album: String,
    pub release_year: Option<i32>,
    pub song: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RareSong {
    pub song: String,
    pub album: String,
    pub release_year: Option<i32>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSong {
    pub song: String,
    pub count: u64,
    pub percentage: f64,
}

/// Distinct live songs per event, empty events included (count 0).
pub fn setlist_sizes(table: &JoinedTable) -> View<SetlistSize> {
    let title = titled(table.artist(), "Distribution of Setlists Size");

    let mut order: Vec<&str> = Vec::new();
    let mut songs: HashMap<&str, HashSet<&str>> = HashMap::new();
    for row in table.rows() {
        let entry = songs.entry(row.setlist_id()).or_insert_with(|| {
            order.push(row.setlist_id());
            HashSet::new()
        });
        if let Some(song) = row.song.as_deref() {
            entry.insert(song);
        }
    }

    let rows = order
        .into_iter()
        .map(|id| SetlistSize {
            setlist_id: id.to_string(),
            count: songs.get(id).map(|s| s.len() as u64).unwrap_or(0),
        })
        .collect();
    View::new(title, rows)
}

/// Setlist sizes of filled setlists only.
pub fn filled_setlist_sizes(table: &JoinedTable) -> View<SetlistSize> {
    let all = setlist_sizes(table);
    let rows = all.rows.into_iter().filter(|s| s.count > 0).collect();
    View::new(
        titled(table.artist(), "Distribution of Filled Setlists Size on Violin Plot"),
        rows,
    )
}

/// Number of filled setlists.
pub fn filled_setlist_count(table: &JoinedTable) -> u64 {
    table
        .filled_rows()
        .map(|r| r.setlist_id())
        .collect::<HashSet<_>>()
        .len() as u64
}

/// Songs by number of filled setlists they appear in. The percentage is
/// the share of filled setlists featuring the song, so the column does not
/// sum to 100.
pub fn song_ranking(table: &JoinedTable) -> View<SongCount> {
    let title = titled(table.artist(), "Top 30 Played Songs");

    let Some(denom) = Denominator::new(filled_setlist_count(table)) else {
        return View::empty(title);
    };

    let mut groups: HashMap<(&str, Option<i32>, &str), HashSet<&str>> = HashMap::new();
    for row in table.filled_rows() {
        let (Some(album), Some(song)) = (row.album.as_deref(), row.song.as_deref()) else {
            continue;
        };
        groups
            .entry((album, row.release_year, song))
            .or_default()
            .insert(row.setlist_id());
    }

    let mut rows: Vec<SongCount> = groups
        .into_iter()
        .map(|((album, release_year, song), setlists)| {
            let count = setlists.len() as u64;
            SongCount {
                album: album.to_string(),
                release_year,
                song: song.to_string(),
                count,
                percentage: denom.percentage(count),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.song.cmp(&b.song))
            .then_with(|| a.album.cmp(&b.album))
    });
    View::new(title, rows)
}

/// Most played songs with no catalog match.
pub fn non_album_songs(table: &JoinedTable) -> View<SongCount> {
    let ranking = song_ranking(table);
    let rows = ranking
        .rows
        .into_iter()
        .filter(|r| r.album == NON_ALBUM)
        .collect();
    View::new(titled(table.artist(), "Top 15 Non-Album Songs Played"), rows)
}

/// Every catalog track with its play count (0 if never played), fewest
/// plays first, then by release year.
pub fn rare_songs(catalog: &CatalogTable, table: &JoinedTable) -> View<RareSong> {
    let title = titled(table.artist(), "Album Songs by Times Played Live");
    let ranking = song_ranking(table);

    // Ranking is sorted by count, so the first row per key is the largest
    let mut plays: HashMap<String, u64> = HashMap::new();
    for row in &ranking.rows {
        if let Some(key) = join_key(Some(&row.song)) {
            plays.entry(key).or_insert(row.count);
        }
    }

    let mut rows: Vec<RareSong> = catalog
        .tracks()
        .iter()
        .map(|track| RareSong {
            song: track.song.clone(),
            album: track.album.clone(),
            release_year: track.release_year,
            count: join_key(Some(&track.song))
                .and_then(|k| plays.get(&k).copied())
                .unwrap_or(0),
        })
        .collect();
    rows.sort_by(|a, b| {
        a.count
            .cmp(&b.count)
            .then_with(|| cmp_year_none_last(a.release_year, b.release_year))
    });
    View::new(title, rows)
}

/// Catalog tracks never played live.
pub fn never_played(catalog: &CatalogTable, table: &JoinedTable) -> View<RareSong> {
    let rows = rare_songs(catalog, table)
        .rows
        .into_iter()
        .filter(|r| r.count == 0)
        .collect();
    View::new(titled(table.artist(), "Album Songs Never Played Live"), rows)
}

/// Catalog tracks played live between 1 and [`RARELY_PLAYED_MAX`] times.
pub fn rarely_played(catalog: &CatalogTable, table: &JoinedTable) -> View<RareSong> {
    let rows = rare_songs(catalog, table)
        .rows
        .into_iter()
        .filter(|r| (1..=RARELY_PLAYED_MAX).contains(&r.count))
        .collect();
    View::new(
        titled(table.artist(), "Album Songs Rarely Played Live (less than 4 times)"),
        rows,
    )
}

#[derive(Clone, Copy)]
enum Edge {
    First,
    Last,
}

/// Opening songs of filled setlists with more than one song.
pub fn first_songs(table: &JoinedTable) -> View<EdgeSong> {
    edge_songs(table, Edge::First, titled(table.artist(), "First Songs of Setlists"))
}

/// Closing songs of filled setlists with more than one song.
pub fn last_songs(table: &JoinedTable) -> View<EdgeSong> {
    edge_songs(table, Edge::Last, titled(table.artist(), "Last Songs of Setlists"))
}

/// Single-song setlists are left out: their one song would be both first
/// and last.
fn edge_songs(table: &JoinedTable, edge: Edge, title: String) -> View<EdgeSong> {
    // setlist id -> (first song, last song, song rows)
    let mut setlists: HashMap<&str, (&str, &str, usize)> = HashMap::new();
    for row in table.filled_rows() {
        let Some(song) = row.song.as_deref() else { continue };
        setlists
            .entry(row.setlist_id())
            .and_modify(|(_, last, n)| {
                *last = song;
                *n += 1;
            })
            .or_insert((song, song, 1));
    }

    let mut counts: HashMap<&str, u64> = HashMap::new();
    for (first, last, n) in setlists.values() {
        if *n < 2 {
            continue;
        }
        let song = match edge {
            Edge::First => *first,
            Edge::Last => *last,
        };
        *counts.entry(song).or_default() += 1;
    }

    let Some(denom) = Denominator::new(counts.values().sum()) else {
        return View::empty(title);
    };

    let mut rows: Vec<EdgeSong> = counts
        .into_iter()
        .map(|(song, count)| EdgeSong {
            song: song.to_string(),
            count,
            percentage: denom.percentage(count),
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.song.cmp(&b.song)));
    View::new(title, rows)
}

/// Order release years ascending with unknown years last.
pub(crate) fn cmp_year_none_last(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
