use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use super::{count_with_share, distinct_events, titled, Denominator, View};
use crate::continent::Continent;
use crate::table::JoinedTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthContinentCount {
    pub month_number: u32,
    pub month: String,
    pub continent: String,
    pub count: u64,
}

/// Per-month total line drawn above the stacked continent bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month_number: u32,
    pub month: String,
    pub count: u64,
    pub percentage: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayCount {
    /// 0 = Monday
    pub day_number: u32,
    pub day: String,
    pub count: u64,
    pub percentage: f64,
}

/// Events per year over the full observed range, zero-filled.
pub fn year_counts(table: &JoinedTable) -> View<YearCount> {
    let title = titled(table.artist(), "Distribution of Events by Year");

    let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();
    for event in distinct_events(table) {
        *by_year.entry(event.year()).or_default() += 1;
    }

    let (Some(&first), Some(&last)) = (by_year.keys().next(), by_year.keys().next_back()) else {
        return View::empty(title);
    };
    let Some(denom) = Denominator::new(by_year.values().sum()) else {
        return View::empty(title);
    };

    let rows = (first..=last)
        .map(|year| {
            let count = by_year.get(&year).copied().unwrap_or(0);
            YearCount {
                year,
                count,
                percentage: denom.percentage(count),
            }
        })
        .collect();
    View::new(title, rows)
}

/// Events per (month, continent), month order then continent name.
pub fn month_counts(table: &JoinedTable) -> View<MonthContinentCount> {
    let title = titled(table.artist(), "Distribution of Events by Month");

    let mut groups: BTreeMap<(u32, &'static str), u64> = BTreeMap::new();
    for event in distinct_events(table) {
        let continent = event
            .country_code
            .as_deref()
            .map(Continent::from_country_code)
            .unwrap_or(Continent::Unknown);
        *groups.entry((event.event_date.month(), continent.name())).or_default() += 1;
    }

    let rows = groups
        .into_iter()
        .map(|((month_number, continent), count)| MonthContinentCount {
            month_number,
            month: month_name(month_number),
            continent: continent.to_string(),
            count,
        })
        .collect();
    View::new(title, rows)
}

/// Events per month with their share of all events.
pub fn month_totals(table: &JoinedTable) -> View<MonthTotal> {
    let by_continent = month_counts(table);

    let mut by_month: BTreeMap<u32, u64> = BTreeMap::new();
    for row in &by_continent.rows {
        *by_month.entry(row.month_number).or_default() += row.count;
    }

    let Some(denom) = Denominator::new(by_month.values().sum()) else {
        return View::empty(by_continent.title);
    };

    let rows = by_month
        .into_iter()
        .map(|(month_number, count)| {
            let percentage = denom.percentage(count);
            MonthTotal {
                month_number,
                month: month_name(month_number),
                count,
                percentage,
                label: count_with_share(count, percentage),
            }
        })
        .collect();
    View::new(by_continent.title, rows)
}

/// Events per day of the week, Monday first. Days without events are absent.
pub fn weekday_counts(table: &JoinedTable) -> View<WeekdayCount> {
    let title = titled(table.artist(), "Distribution of Events by Day of the Week");

    let mut by_day: BTreeMap<u32, (String, u64)> = BTreeMap::new();
    for event in distinct_events(table) {
        let date = event.event_date;
        by_day
            .entry(date.weekday().num_days_from_monday())
            .or_insert_with(|| (date.format("%A").to_string(), 0))
            .1 += 1;
    }

    let Some(denom) = Denominator::new(by_day.values().map(|(_, c)| c).sum()) else {
        return View::empty(title);
    };

    let rows = by_day
        .into_iter()
        .map(|(day_number, (day, count))| WeekdayCount {
            day_number,
            day,
            count,
            percentage: denom.percentage(count),
        })
        .collect();
    View::new(title, rows)
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_default()
}
