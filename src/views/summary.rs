use serde::Serialize;

use super::geo::{city_counts, country_counts};
use super::songs::setlist_sizes;
use super::temporal::year_counts;
use super::Denominator;
use crate::table::JoinedTable;

/// Headline numbers for one artist's live history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourSummary {
    pub artist: String,
    /// Years with at least one event.
    pub years_on_tour: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub countries: usize,
    pub cities: usize,
    pub events: usize,
    pub filled_setlists: usize,
    pub empty_setlists: usize,
    /// Share of events without songs, one decimal.
    pub empty_share: Option<f64>,
    pub median_filled_size: Option<f64>,
}

pub fn tour_summary(table: &JoinedTable) -> TourSummary {
    let years = year_counts(table);
    let sizes = setlist_sizes(table);

    let events = sizes.rows.len();
    let mut filled: Vec<u64> = sizes
        .rows
        .iter()
        .map(|s| s.count)
        .filter(|&c| c > 0)
        .collect();
    filled.sort_unstable();
    let empty_setlists = events - filled.len();

    TourSummary {
        artist: table.artist().to_string(),
        years_on_tour: years.rows.iter().filter(|y| y.count > 0).count(),
        first_year: years.rows.first().map(|y| y.year),
        last_year: years.rows.last().map(|y| y.year),
        countries: country_counts(table).rows.len(),
        cities: city_counts(table).rows.len(),
        events,
        filled_setlists: filled.len(),
        empty_setlists,
        empty_share: Denominator::new(events as u64).map(|d| d.percentage(empty_setlists as u64)),
        median_filled_size: median(&filled),
    }
}

/// Median of a sorted slice.
fn median(sorted: &[u64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    Some(if n % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    })
}
