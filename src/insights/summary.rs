//! Raw summary values behind the insight and recommendation text

use crate::aggregate::{Aggregates, StateMonth};
use crate::config::PipelineConfig;
use crate::indicators::{DistrictTotal, IndicatorReport, RiskSummary, TrendSummary, latest_child_share};
use serde::{Deserialize, Serialize};

/// Share of each age segment in the overall total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeShares {
    pub age_0_5: f64,
    pub age_5_17: f64,
    pub age_18_plus: f64,
}

impl AgeShares {
    /// `None` when nothing was enrolled at all
    pub fn from_monthly(monthly: &[StateMonth]) -> Option<Self> {
        let total: f64 = monthly.iter().map(|m| m.total).sum();
        if total == 0.0 {
            return None;
        }
        Some(Self {
            age_0_5: monthly.iter().map(|m| m.age_0_5).sum::<f64>() / total,
            age_5_17: monthly.iter().map(|m| m.age_5_17).sum::<f64>() / total,
            age_18_plus: monthly.iter().map(|m| m.age_18_plus).sum::<f64>() / total,
        })
    }
}

/// Numbers the narrative layer formats; callers wanting their own formatting
/// read these directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub monthly_points: usize,
    pub trend: TrendSummary,
    pub age_shares: Option<AgeShares>,
    /// Top districts by all-time total
    pub top_districts: Vec<DistrictTotal>,
    /// Bottom districts by all-time total
    pub bottom_districts: Vec<DistrictTotal>,
    /// Bottom districts by total over the trailing window
    pub recent_bottom_districts: Vec<DistrictTotal>,
    pub pincode_dispersion: Option<f64>,
    /// Highest seasonality months, best first
    pub peak_months: Vec<u32>,
    pub risk_summary: RiskSummary,
    /// First few volatile districts in flag-table order
    pub volatile_districts: Vec<String>,
    pub child_points: usize,
    pub latest_child_share: Option<f64>,
}

impl SummaryStatistics {
    pub fn collect(
        aggregates: &Aggregates,
        indicators: &IndicatorReport,
        config: &PipelineConfig,
    ) -> Self {
        let n = config.rank_n;
        Self {
            monthly_points: aggregates.state_monthly.len(),
            trend: indicators.trend,
            age_shares: AgeShares::from_monthly(&aggregates.state_monthly),
            top_districts: indicators.disparity.all_time.top(n).to_vec(),
            bottom_districts: indicators.disparity.all_time.bottom(n).to_vec(),
            recent_bottom_districts: indicators.disparity.recent.bottom(n).to_vec(),
            pincode_dispersion: indicators.pincode_dispersion,
            peak_months: indicators.seasonality.peak_months(config.peak_months),
            risk_summary: indicators.risk_summary,
            volatile_districts: indicators
                .district_flags
                .iter()
                .filter(|s| s.volatile)
                .take(n)
                .map(|s| s.district.clone())
                .collect(),
            child_points: indicators.child_momentum.len(),
            latest_child_share: latest_child_share(&indicators.child_momentum),
        }
    }
}
