use std::collections::HashMap;

use serde::Serialize;

use super::{distinct_events, titled, Denominator, View};
use crate::table::models::Coordinates;
use crate::table::JoinedTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryCount {
    pub country: String,
    pub country_code: String,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityCount {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub count: u64,
    pub percentage: f64,
}

/// Events per country, most visited first, ties by name.
/// Events without a country name and code are not counted.
pub fn country_counts(table: &JoinedTable) -> View<CountryCount> {
    let title = titled(table.artist(), "Top 30 Countries by Number of Events");

    let mut groups: HashMap<(&str, &str), u64> = HashMap::new();
    for event in distinct_events(table) {
        if let (Some(country), Some(code)) = (event.country.as_deref(), event.country_code.as_deref()) {
            *groups.entry((country, code)).or_default() += 1;
        }
    }

    let Some(denom) = Denominator::new(groups.values().sum()) else {
        return View::empty(title);
    };

    let mut rows: Vec<CountryCount> = groups
        .into_iter()
        .map(|((country, code), count)| CountryCount {
            country: country.to_string(),
            country_code: code.to_string(),
            count,
            percentage: denom.percentage(count),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.country.cmp(&b.country))
            .then_with(|| a.country_code.cmp(&b.country_code))
    });
    View::new(title, rows)
}

/// Events per city, most visited first, ties by name. Cities are keyed by
/// name, coordinates and country, so same-named cities stay apart.
pub fn city_counts(table: &JoinedTable) -> View<CityCount> {
    let title = titled(table.artist(), "Top 30 Cities by Number of Events");

    let mut groups: HashMap<(&str, Coordinates, &str), u64> = HashMap::new();
    for event in distinct_events(table) {
        if let (Some(city), Some(coords), Some(country)) =
            (event.city.as_deref(), event.coordinates, event.country.as_deref())
        {
            *groups.entry((city, coords, country)).or_default() += 1;
        }
    }

    let Some(denom) = Denominator::new(groups.values().sum()) else {
        return View::empty(title);
    };

    let mut rows: Vec<CityCount> = groups
        .into_iter()
        .map(|((city, coords, country), count)| CityCount {
            city: city.to_string(),
            latitude: coords.latitude,
            longitude: coords.longitude,
            country: country.to_string(),
            count,
            percentage: denom.percentage(count),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.city.cmp(&b.city))
            .then_with(|| a.country.cmp(&b.country))
            .then_with(|| a.latitude.total_cmp(&b.latitude))
            .then_with(|| a.longitude.total_cmp(&b.longitude))
    });
    View::new(title, rows)
}
