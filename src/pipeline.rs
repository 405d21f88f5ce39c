//! Raw feed records in, immutable base tables and the joined table out.

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

use crate::flatten::{self, MalformedStructure};
use crate::table::{CatalogTable, JoinedTable, PerformanceTable};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no valid catalog tracks ({skipped} records skipped)")]
    EmptyCatalog { skipped: usize },
    #[error("no past performances ({skipped} records skipped)")]
    EmptyPerformances { skipped: usize },
}

/// What the flatten stage dropped along the way.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub catalog_skipped: Vec<MalformedStructure>,
    pub setlists_skipped: Vec<MalformedStructure>,
    pub tape_entries: usize,
}

impl BuildReport {
    pub fn skipped(&self) -> usize {
        self.catalog_skipped.len() + self.setlists_skipped.len()
    }
}

/// The base tables and their join, built once per session.
#[derive(Debug)]
pub struct Dataset {
    pub catalog: CatalogTable,
    pub performances: PerformanceTable,
    pub joined: JoinedTable,
    pub report: BuildReport,
}

/// Flatten, clean, dedupe and join both feeds. Events dated `today` or
/// later are not performances yet and are left out.
pub fn build(
    catalog_records: &[Value],
    setlist_records: &[Value],
    today: NaiveDate,
) -> Result<Dataset, PipelineError> {
    let tracks = flatten::flatten_catalog(catalog_records);
    let catalog = CatalogTable::from_tracks(tracks.rows);
    if catalog.is_empty() {
        return Err(PipelineError::EmptyCatalog {
            skipped: tracks.skipped.len(),
        });
    }

    let rows = flatten::flatten_setlists(setlist_records);
    let performances = PerformanceTable::from_rows(rows.rows, today);
    if performances.is_empty() {
        return Err(PipelineError::EmptyPerformances {
            skipped: rows.skipped.len(),
        });
    }

    let joined = JoinedTable::join(&catalog, &performances);
    log::info!(
        "Joined {} rows for {} events of {:?}",
        joined.rows().len(),
        performances.event_count(),
        joined.artist()
    );

    Ok(Dataset {
        catalog,
        performances,
        joined,
        report: BuildReport {
            catalog_skipped: tracks.skipped,
            setlists_skipped: rows.skipped,
            tape_entries: rows.tape_entries,
        },
    })
}
