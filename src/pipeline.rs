//! End-to-end pipeline: load, aggregate, compute indicators, summarise
//!
//! A run is a pure function of its input rows and config. The resulting
//! report is read-only and can be shared between consumers.

use crate::aggregate::Aggregates;
use crate::config::PipelineConfig;
use crate::enrolment::{EnrolmentRow, LoadSummary, LoadedDataset, load_rows, load_rows_from_reader};
use crate::error::Result;
use crate::indicators::IndicatorReport;
use crate::insights::{Insight, Recommendation, SummaryStatistics, generate_insights, generate_recommendations};
use log::info;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Size of the cleaned dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub monthly_points: usize,
    pub districts: usize,
    pub pincodes: usize,
}

impl DatasetProfile {
    pub fn new(rows: &[EnrolmentRow], aggregates: &Aggregates) -> Self {
        Self {
            rows: rows.len(),
            monthly_points: aggregates.state_monthly.len(),
            districts: aggregates.district_count(),
            pincodes: aggregates.pincode_count(),
        }
    }
}

/// Everything the presentation layer consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub state: String,
    pub load_summary: LoadSummary,
    pub profile: DatasetProfile,
    pub aggregates: Aggregates,
    pub indicators: IndicatorReport,
    pub summary: SummaryStatistics,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
}

/// Run every stage after loading over already-cleaned rows
pub fn run(dataset: LoadedDataset, config: &PipelineConfig) -> AnalyticsReport {
    let aggregates = Aggregates::from_rows(&dataset.rows);
    let profile = DatasetProfile::new(&dataset.rows, &aggregates);
    info!(
        "Profile: {} rows, {} months, {} districts, {} pincodes",
        profile.rows, profile.monthly_points, profile.districts, profile.pincodes
    );

    let indicators = IndicatorReport::compute(&aggregates, config);
    let summary = SummaryStatistics::collect(&aggregates, &indicators, config);
    let insights = generate_insights(&summary);
    let recommendations = generate_recommendations(&summary);

    AnalyticsReport {
        state: config.state_filter.trim().to_string(),
        load_summary: dataset.summary,
        profile,
        aggregates,
        indicators,
        summary,
        insights,
        recommendations,
    }
}

/// Run over rows that were cleaned elsewhere
pub fn run_rows(rows: Vec<EnrolmentRow>, config: &PipelineConfig) -> AnalyticsReport {
    let summary = LoadSummary {
        records_read: rows.len(),
        retained: rows.len(),
        ..Default::default()
    };
    run(LoadedDataset { rows, summary }, config)
}

/// Load a CSV file and run the full pipeline
pub fn run_from_path<P: AsRef<Path>>(path: P, config: &PipelineConfig) -> Result<AnalyticsReport> {
    let dataset = load_rows(path, &config.state_filter)?;
    Ok(run(dataset, config))
}

/// Read CSV from any reader and run the full pipeline
pub fn run_from_reader<R: Read>(reader: R, config: &PipelineConfig) -> Result<AnalyticsReport> {
    let dataset = load_rows_from_reader(reader, &config.state_filter)?;
    Ok(run(dataset, config))
}
