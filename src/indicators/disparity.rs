//! District ranking and pincode dispersion

use super::rolling::{mean, median};
use crate::aggregate::EntityMonth;
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictTotal {
    pub district: String,
    pub total: f64,
}

/// Districts ranked by summed total, highest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistrictRanking {
    pub ranked: Vec<DistrictTotal>,
}

impl DistrictRanking {
    /// Rank districts over points on or after `since` (all points when `None`)
    ///
    /// Equal totals keep district name order.
    pub fn from_points(points: &[EntityMonth], since: Option<NaiveDate>) -> Self {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for p in points.iter().filter(|p| since.map_or(true, |cutoff| p.date >= cutoff)) {
            *totals.entry(p.entity.as_str()).or_default() += p.total;
        }

        let mut ranked: Vec<DistrictTotal> = totals
            .into_iter()
            .map(|(district, total)| DistrictTotal {
                district: district.to_string(),
                total,
            })
            .collect();
        ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
        Self { ranked }
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn top(&self, n: usize) -> &[DistrictTotal] {
        &self.ranked[..n.min(self.ranked.len())]
    }

    /// The `n` lowest districts, still in descending order
    pub fn bottom(&self, n: usize) -> &[DistrictTotal] {
        &self.ranked[self.ranked.len().saturating_sub(n)..]
    }
}

/// First month of the trailing window ending at `latest`
pub fn recent_cutoff(latest: Option<NaiveDate>, lookback_months: u32) -> Option<NaiveDate> {
    latest.and_then(|date| date.checked_sub_months(Months::new(lookback_months)))
}

/// District rankings over all history and over the trailing window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisparityReport {
    pub all_time: DistrictRanking,
    /// First month of the trailing window, if any month was observed
    pub recent_since: Option<NaiveDate>,
    pub recent: DistrictRanking,
    /// Chart-sized slices of the trailing ranking
    pub recent_top: Vec<DistrictTotal>,
    pub recent_bottom: Vec<DistrictTotal>,
}

impl DisparityReport {
    pub fn build(
        district_monthly: &[EntityMonth],
        latest: Option<NaiveDate>,
        lookback_months: u32,
        chart_n: usize,
    ) -> Self {
        let recent_since = recent_cutoff(latest, lookback_months);
        let recent = DistrictRanking::from_points(district_monthly, recent_since);
        Self {
            all_time: DistrictRanking::from_points(district_monthly, None),
            recent_since,
            recent_top: recent.top(chart_n).to_vec(),
            recent_bottom: recent.bottom(chart_n).to_vec(),
            recent,
        }
    }
}

/// Mean over months of the median pincode total within each month
pub fn pincode_dispersion(pincode_monthly: &[EntityMonth]) -> Option<f64> {
    let mut by_month: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for p in pincode_monthly {
        by_month.entry(p.date).or_default().push(p.total);
    }
    let medians: Vec<f64> = by_month.values().filter_map(|v| median(v)).collect();
    mean(&medians)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(entity: &str, y: i32, m: u32, total: f64) -> EntityMonth {
        EntityMonth {
            entity: entity.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            total,
        }
    }

    fn names(totals: &[DistrictTotal]) -> Vec<&str> {
        totals.iter().map(|t| t.district.as_str()).collect()
    }

    #[test]
    fn test_ranking_descending_with_name_ties() {
        let points = vec![
            point("Pune", 2025, 1, 50.0),
            point("Pune", 2025, 2, 50.0),
            point("Akola", 2025, 1, 30.0),
            point("Beed", 2025, 1, 30.0),
            point("Thane", 2025, 2, 200.0),
        ];
        let ranking = DistrictRanking::from_points(&points, None);
        assert_eq!(names(&ranking.ranked), vec!["Thane", "Pune", "Akola", "Beed"]);
        assert_eq!(names(ranking.top(2)), vec!["Thane", "Pune"]);
        assert_eq!(names(ranking.bottom(2)), vec!["Akola", "Beed"]);
        assert_eq!(ranking.bottom(10).len(), 4);
    }

    #[test]
    fn test_trailing_window_cutoff() {
        let latest = NaiveDate::from_ymd_opt(2025, 12, 1);
        let cutoff = recent_cutoff(latest, 11);
        assert_eq!(cutoff, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(recent_cutoff(None, 11), None);

        let points = vec![
            point("Old", 2024, 12, 1000.0),
            point("Old", 2025, 6, 1.0),
            point("New", 2025, 1, 5.0),
        ];
        let report = DisparityReport::build(&points, latest, 11, 15);
        assert_eq!(names(&report.all_time.ranked), vec!["Old", "New"]);
        assert_eq!(names(&report.recent.ranked), vec!["New", "Old"]);
        assert_eq!(report.recent_top.len(), 2);
    }

    #[test]
    fn test_pincode_dispersion() {
        let points = vec![
            point("411001", 2025, 1, 10.0),
            point("411002", 2025, 1, 20.0),
            point("411003", 2025, 1, 90.0),
            point("411001", 2025, 2, 4.0),
            point("411002", 2025, 2, 6.0),
        ];
        // Medians 20 and 5
        assert_eq!(pincode_dispersion(&points), Some(12.5));
        assert_eq!(pincode_dispersion(&[]), None);
    }

    #[test]
    fn test_empty_ranking() {
        let ranking = DistrictRanking::from_points(&[], None);
        assert!(ranking.is_empty());
        assert!(ranking.top(3).is_empty());
        assert!(ranking.bottom(3).is_empty());
    }
}
