//! District saturation, momentum and volatility flags
//!
//! Window statistics are computed over each district's full monthly history;
//! only the latest point per district is kept in the snapshot. Volatility is
//! judged against the median deviation across every (district, month) point,
//! not just the latest ones.

use super::rolling::{RollingWindow, median};
use crate::aggregate::{EntityMonth, series_by_entity};
use crate::config::PipelineConfig;
use chrono::NaiveDate;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Window sizes and thresholds for district risk classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskParams {
    pub short_window: usize,
    pub long_window: usize,
    pub max_min_periods: usize,
    pub long_min_periods: usize,
    pub saturation_threshold: f64,
    pub low_momentum_ratio: f64,
    pub volatility_multiplier: f64,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for RiskParams {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            short_window: config.short_window,
            long_window: config.long_window,
            max_min_periods: config.max_min_periods,
            long_min_periods: config.long_min_periods,
            saturation_threshold: config.saturation_threshold,
            low_momentum_ratio: config.low_momentum_ratio,
            volatility_multiplier: config.volatility_multiplier,
        }
    }
}

/// Window statistics at one point of a district's series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowPoint {
    pub date: NaiveDate,
    pub total: f64,
    pub rolling12_max: Option<f64>,
    pub rolling3_avg: Option<f64>,
    pub saturation_index: Option<f64>,
    pub rolling12_avg: Option<f64>,
    pub std12: Option<f64>,
}

/// Latest risk classification for one district
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictRiskSnapshot {
    pub district: String,
    pub saturation_index: Option<f64>,
    pub low_momentum: bool,
    pub volatile: bool,
    pub saturation_risk: bool,
}

/// Number of districts carrying each flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub saturation_risk: usize,
    pub low_momentum: usize,
    pub volatile: usize,
}

impl RiskSummary {
    pub fn from_snapshots(snapshots: &[DistrictRiskSnapshot]) -> Self {
        Self {
            saturation_risk: snapshots.iter().filter(|s| s.saturation_risk).count(),
            low_momentum: snapshots.iter().filter(|s| s.low_momentum).count(),
            volatile: snapshots.iter().filter(|s| s.volatile).count(),
        }
    }
}

/// Window statistics for every point of one date-ordered series
pub fn window_points(series: &[(NaiveDate, f64)], params: &RiskParams) -> Vec<WindowPoint> {
    let totals: Vec<f64> = series.iter().map(|(_, total)| *total).collect();

    let long_max = RollingWindow::new(params.long_window, params.max_min_periods).max(&totals);
    let short_avg = RollingWindow::new(params.short_window, params.short_window).mean(&totals);
    let long = RollingWindow::new(params.long_window, params.long_min_periods);
    let long_avg = long.mean(&totals);
    let long_std = long.std(&totals);

    series
        .iter()
        .enumerate()
        .map(|(i, &(date, total))| WindowPoint {
            date,
            total,
            rolling12_max: long_max[i],
            rolling3_avg: short_avg[i],
            saturation_index: ratio(short_avg[i], long_max[i]),
            rolling12_avg: long_avg[i],
            std12: long_std[i],
        })
        .collect()
}

/// `a / b`, undefined when either side is undefined or `b` is zero
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// `lhs < rhs`, false whenever either side is undefined
fn defined_lt(lhs: Option<f64>, rhs: Option<f64>) -> bool {
    matches!((lhs, rhs), (Some(l), Some(r)) if l < r)
}

/// Classify every district from its monthly totals
///
/// Sorted ascending by saturation index; districts without one come last, and
/// ties keep district name order.
pub fn district_risk_flags(
    district_monthly: &[EntityMonth],
    params: &RiskParams,
) -> Vec<DistrictRiskSnapshot> {
    let series: Vec<(&str, Vec<(NaiveDate, f64)>)> =
        series_by_entity(district_monthly).into_iter().collect();

    let histories: Vec<(&str, Vec<WindowPoint>)> = series
        .par_iter()
        .map(|(district, points)| (*district, window_points(points, params)))
        .collect();

    let all_std: Vec<f64> = histories
        .iter()
        .flat_map(|(_, points)| points.iter().filter_map(|p| p.std12))
        .collect();
    let volatility_threshold = median(&all_std).map(|m| params.volatility_multiplier * m);
    debug!(
        "Risk flags over {} districts, volatility threshold {:?}",
        histories.len(),
        volatility_threshold
    );

    let mut snapshots: Vec<DistrictRiskSnapshot> = histories
        .iter()
        .filter_map(|(district, points)| {
            let latest = points.last()?;
            Some(DistrictRiskSnapshot {
                district: district.to_string(),
                saturation_index: latest.saturation_index,
                low_momentum: defined_lt(
                    latest.rolling3_avg,
                    latest.rolling12_avg.map(|avg| params.low_momentum_ratio * avg),
                ),
                volatile: defined_lt(volatility_threshold, latest.std12),
                saturation_risk: defined_lt(
                    latest.saturation_index,
                    Some(params.saturation_threshold),
                ),
            })
        })
        .collect();

    snapshots.sort_by(|a, b| match (a.saturation_index, b.saturation_index) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Months;

    fn district(name: &str, totals: &[f64]) -> Vec<EntityMonth> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        totals
            .iter()
            .enumerate()
            .map(|(i, &total)| EntityMonth {
                entity: name.to_string(),
                date: start + Months::new(i as u32),
                total,
            })
            .collect()
    }

    fn flags(points: &[EntityMonth]) -> Vec<DistrictRiskSnapshot> {
        district_risk_flags(points, &RiskParams::default())
    }

    #[test]
    fn test_three_flat_points() {
        let out = flags(&district("Pune", &[100.0, 100.0, 100.0]));
        assert_eq!(out.len(), 1);
        let pune = &out[0];
        // Max needs three points, so the index is defined but not at risk
        assert_eq!(pune.saturation_index, Some(1.0));
        assert!(!pune.saturation_risk);
        assert!(!pune.low_momentum);
        assert!(!pune.volatile);
    }

    #[test]
    fn test_two_points_leave_index_undefined() {
        let out = flags(&district("Pune", &[100.0, 10.0]));
        assert_eq!(out[0].saturation_index, None);
        assert!(!out[0].saturation_risk);
    }

    #[test]
    fn test_saturation_risk_after_decline() {
        let out = flags(&district("Thane", &[300.0, 300.0, 300.0, 100.0, 100.0, 100.0]));
        let thane = &out[0];
        assert_relative_eq!(thane.saturation_index.unwrap(), 1.0 / 3.0, epsilon = 1e-12);
        assert!(thane.saturation_risk);
        // 3-month avg 100 vs 6-month avg 200: not below half
        assert!(!thane.low_momentum);
    }

    #[test]
    fn test_low_momentum() {
        let out = flags(&district("Beed", &[400.0, 400.0, 400.0, 400.0, 400.0, 10.0, 10.0, 10.0]));
        // 3-month avg 10 vs 8-month avg 253.75
        assert!(out[0].low_momentum);
    }

    #[test]
    fn test_zero_peak_leaves_index_undefined() {
        let out = flags(&district("Gadchiroli", &[0.0, 0.0, 0.0, 0.0]));
        assert_eq!(out[0].saturation_index, None);
        assert!(!out[0].saturation_risk);
    }

    #[test]
    fn test_short_history_never_volatile() {
        let mut points = district("Calm", &[10.0; 12]);
        points.extend(district("Steady", &[11.0, 9.0, 10.0, 11.0, 9.0, 10.0, 10.0, 11.0]));
        points.extend(district("Spiky", &[1.0, 500.0, 2.0, 800.0, 3.0]));
        let out = flags(&points);
        let spiky = out.iter().find(|s| s.district == "Spiky").unwrap();
        assert!(!spiky.volatile);
    }

    #[test]
    fn test_volatile_against_population_median() {
        let mut points = district("Calm", &[10.0, 11.0, 9.0, 10.0, 11.0, 9.0]);
        points.extend(district("Also Calm", &[20.0, 21.0, 19.0, 20.0, 21.0, 19.0]));
        points.extend(district("Wild", &[10.0, 200.0, 5.0, 300.0, 0.0, 250.0]));
        let out = flags(&points);
        let wild = out.iter().find(|s| s.district == "Wild").unwrap();
        let calm = out.iter().find(|s| s.district == "Calm").unwrap();
        assert!(wild.volatile);
        assert!(!calm.volatile);
        assert_eq!(RiskSummary::from_snapshots(&out).volatile, 1);
    }

    #[test]
    fn test_sorted_by_index_with_undefined_last() {
        let mut points = district("Undefined", &[5.0, 5.0]);
        points.extend(district("High", &[10.0, 10.0, 10.0]));
        points.extend(district("Low", &[90.0, 10.0, 10.0, 10.0]));
        let out = flags(&points);
        let order: Vec<&str> = out.iter().map(|s| s.district.as_str()).collect();
        assert_eq!(order, vec!["Low", "High", "Undefined"]);
    }

    #[test]
    fn test_only_latest_point_kept() {
        let series = district("Pune", &[100.0, 100.0, 100.0, 40.0]);
        let pts: Vec<(NaiveDate, f64)> = series.iter().map(|p| (p.date, p.total)).collect();
        let history = window_points(&pts, &RiskParams::default());
        assert_eq!(history.len(), 4);
        assert_eq!(history[2].saturation_index, Some(1.0));
        assert_relative_eq!(history[3].saturation_index.unwrap(), 0.8, epsilon = 1e-12);

        let out = flags(&series);
        assert_relative_eq!(out[0].saturation_index.unwrap(), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_repeatable() {
        let mut points = district("A", &[3.0, 8.0, 1.0, 9.0, 4.0, 7.0, 2.0]);
        points.extend(district("B", &[30.0, 20.0, 10.0, 5.0, 1.0, 1.0, 1.0]));
        assert_eq!(flags(&points), flags(&points));
    }

    #[test]
    fn test_empty() {
        assert!(flags(&[]).is_empty());
        assert_eq!(RiskSummary::from_snapshots(&[]), RiskSummary::default());
    }
}
