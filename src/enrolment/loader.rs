//! Load enrolment records from CSV
//!
//! Headers are matched after trimming, lowercasing and collapsing inner
//! whitespace to underscores. Records outside the requested state are skipped,
//! and records without a usable date, district or pincode are dropped. Bad age
//! counts never drop a record; they are treated as missing.

use super::data::{EnrolmentRow, parse_count, parse_date};
use crate::error::{PipelineError, Result};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Row counts observed while cleaning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    /// Data records in the file (header excluded)
    pub records_read: usize,
    /// Records whose state did not match the filter
    pub out_of_scope: usize,
    /// In-scope records dropped for a missing date, district or pincode
    pub dropped_missing_key: usize,
    /// Records retained
    pub retained: usize,
}

/// Cleaned rows together with the cleaning counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadedDataset {
    pub rows: Vec<EnrolmentRow>,
    pub summary: LoadSummary,
}

/// Positions of the required columns within a record
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    state: usize,
    district: usize,
    pincode: usize,
    age_0_5: usize,
    age_5_17: usize,
    age_18_plus: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let names: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |candidates: &[&str]| -> Result<usize> {
            candidates
                .iter()
                .find_map(|c| names.iter().position(|n| n == c))
                .ok_or_else(|| PipelineError::MissingColumn(candidates[0].to_string()))
        };

        Ok(Self {
            date: find(&["date"])?,
            state: find(&["state"])?,
            district: find(&["district"])?,
            pincode: find(&["pincode"])?,
            age_0_5: find(&["age_0_5"])?,
            age_5_17: find(&["age_5_17"])?,
            age_18_plus: find(&["age_18_greater", "age_18_plus"])?,
        })
    }
}

/// Lowercase, trim, and join inner whitespace runs with `_`
fn normalize_header(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Load and clean enrolment records for one state from a CSV file
pub fn load_rows<P: AsRef<Path>>(path: P, state_filter: &str) -> Result<LoadedDataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PipelineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!("Loading enrolment records from {}", path.display());
    load_rows_from_reader(file, state_filter)
}

/// Load and clean enrolment records for one state from any CSV reader
pub fn load_rows_from_reader<R: Read>(reader: R, state_filter: &str) -> Result<LoadedDataset> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(csv_reader.headers()?)?;
    let wanted_state = state_filter.trim().to_lowercase();

    let mut dataset = LoadedDataset::default();
    for result in csv_reader.records() {
        let record = result?;
        dataset.summary.records_read += 1;

        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        if field(columns.state).to_lowercase() != wanted_state {
            dataset.summary.out_of_scope += 1;
            continue;
        }

        let date = parse_date(field(columns.date));
        let district = field(columns.district);
        let pincode = field(columns.pincode);

        let Some(date) = date.filter(|_| !district.is_empty() && !pincode.is_empty()) else {
            dataset.summary.dropped_missing_key += 1;
            continue;
        };

        dataset.rows.push(EnrolmentRow::new(
            date,
            district,
            pincode,
            parse_count(field(columns.age_0_5)),
            parse_count(field(columns.age_5_17)),
            parse_count(field(columns.age_18_plus)),
        ));
    }
    dataset.summary.retained = dataset.rows.len();

    info!(
        "Read {} records: {} retained for '{}', {} out of scope, {} dropped for missing keys",
        dataset.summary.records_read,
        dataset.summary.retained,
        state_filter.trim(),
        dataset.summary.out_of_scope,
        dataset.summary.dropped_missing_key,
    );
    if dataset.summary.retained == 0 && dataset.summary.records_read > 0 {
        warn!("No records retained for state filter '{}'", state_filter.trim());
    }
    debug!("Column positions: {:?}", columns);

    Ok(dataset)
}
