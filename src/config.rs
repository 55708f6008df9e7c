//! Pipeline configuration
//!
//! Every threshold, window size and ranking depth used downstream lives here so
//! a run can be reproduced (or varied in tests) from a single value.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters for a single pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// State retained by the loader (trimmed, case-insensitive match)
    #[serde(default = "default_state_filter")]
    pub state_filter: String,

    /// Short rolling window for recent average activity (months)
    #[serde(default = "default_short_window")]
    pub short_window: usize,

    /// Long rolling window for peak, average and deviation (months)
    #[serde(default = "default_long_window")]
    pub long_window: usize,

    /// Observations required before the long-window max is defined
    #[serde(default = "default_max_min_periods")]
    pub max_min_periods: usize,

    /// Observations required before the long-window mean/std are defined
    #[serde(default = "default_long_min_periods")]
    pub long_min_periods: usize,

    /// Saturation index below which a district is at risk (0.6)
    #[serde(default = "default_saturation_threshold")]
    pub saturation_threshold: f64,

    /// Short/long average ratio below which momentum is low (0.5)
    #[serde(default = "default_low_momentum_ratio")]
    pub low_momentum_ratio: f64,

    /// Multiple of the median deviation above which a district is volatile (1.5)
    #[serde(default = "default_volatility_multiplier")]
    pub volatility_multiplier: f64,

    /// Depth of top/bottom rankings in insights and recommendations
    #[serde(default = "default_rank_n")]
    pub rank_n: usize,

    /// Number of seasonal peak months named
    #[serde(default = "default_peak_months")]
    pub peak_months: usize,

    /// Months before the latest observed month that the trailing window starts
    #[serde(default = "default_recent_lookback_months")]
    pub recent_lookback_months: u32,

    /// Depth of the top/bottom district lists handed to charts
    #[serde(default = "default_disparity_chart_n")]
    pub disparity_chart_n: usize,
}

fn default_state_filter() -> String { "Maharashtra".to_string() }
fn default_short_window() -> usize { 3 }
fn default_long_window() -> usize { 12 }
fn default_max_min_periods() -> usize { 3 }
fn default_long_min_periods() -> usize { 6 }
fn default_saturation_threshold() -> f64 { 0.6 }
fn default_low_momentum_ratio() -> f64 { 0.5 }
fn default_volatility_multiplier() -> f64 { 1.5 }
fn default_rank_n() -> usize { 3 }
fn default_peak_months() -> usize { 2 }
fn default_recent_lookback_months() -> u32 { 11 }
fn default_disparity_chart_n() -> usize { 15 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            state_filter: default_state_filter(),
            short_window: default_short_window(),
            long_window: default_long_window(),
            max_min_periods: default_max_min_periods(),
            long_min_periods: default_long_min_periods(),
            saturation_threshold: default_saturation_threshold(),
            low_momentum_ratio: default_low_momentum_ratio(),
            volatility_multiplier: default_volatility_multiplier(),
            rank_n: default_rank_n(),
            peak_months: default_peak_months(),
            recent_lookback_months: default_recent_lookback_months(),
            disparity_chart_n: default_disparity_chart_n(),
        }
    }
}

impl PipelineConfig {
    /// Config with the default parameters and a different state filter
    pub fn for_state(state: impl Into<String>) -> Self {
        Self {
            state_filter: state.into(),
            ..Default::default()
        }
    }

    /// Parse a JSON config; absent fields fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
