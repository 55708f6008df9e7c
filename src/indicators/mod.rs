//! Time-series indicators derived from the monthly aggregates

pub mod child;
pub mod disparity;
pub mod risk;
pub mod rolling;
pub mod seasonality;
pub mod trend;

pub use child::{ChildShare, child_momentum, latest_child_share};
pub use disparity::{DisparityReport, DistrictRanking, DistrictTotal, pincode_dispersion};
pub use risk::{DistrictRiskSnapshot, RiskParams, RiskSummary, WindowPoint, district_risk_flags};
pub use rolling::RollingWindow;
pub use seasonality::{SeasonalIndex, SeasonalityBasis, SeasonalityTable};
pub use trend::TrendSummary;

use crate::aggregate::Aggregates;
use crate::config::PipelineConfig;
use log::info;
use serde::{Deserialize, Serialize};

/// Every indicator computed for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReport {
    pub seasonality: SeasonalityTable,
    /// Ascending by saturation index, undefined last
    pub district_flags: Vec<DistrictRiskSnapshot>,
    pub risk_summary: RiskSummary,
    pub child_momentum: Vec<ChildShare>,
    pub trend: TrendSummary,
    pub disparity: DisparityReport,
    /// Typical pincode total per month; `None` without pincode observations
    pub pincode_dispersion: Option<f64>,
}

impl IndicatorReport {
    pub fn compute(aggregates: &Aggregates, config: &PipelineConfig) -> Self {
        let district_flags =
            district_risk_flags(&aggregates.district_monthly, &RiskParams::from(config));
        let risk_summary = RiskSummary::from_snapshots(&district_flags);
        info!(
            "District flags: {} saturation risk, {} low momentum, {} volatile of {}",
            risk_summary.saturation_risk,
            risk_summary.low_momentum,
            risk_summary.volatile,
            district_flags.len(),
        );

        Self {
            seasonality: SeasonalityTable::from_monthly(&aggregates.state_monthly),
            district_flags,
            risk_summary,
            child_momentum: child_momentum(&aggregates.state_monthly),
            trend: TrendSummary::from_monthly(&aggregates.state_monthly),
            disparity: DisparityReport::build(
                &aggregates.district_monthly,
                aggregates.latest_month(),
                config.recent_lookback_months,
                config.disparity_chart_n,
            ),
            pincode_dispersion: pincode_dispersion(&aggregates.pincode_monthly),
        }
    }
}
