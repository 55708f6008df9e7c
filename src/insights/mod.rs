//! Narrative insights and recommendations
//!
//! Each topic produces exactly one insight, falling back to an
//! "insufficient data" finding when its series is empty.

pub mod recommendations;
pub mod summary;

pub use recommendations::{Recommendation, RecommendationKind, generate_recommendations};
pub use summary::{AgeShares, SummaryStatistics};

use crate::indicators::DistrictTotal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chart/metric topic an insight describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    TotalTrend,
    AgeStacked,
    DistrictDisparity,
    PincodeBox,
    SeasonalityIndex,
    RiskSummary,
    ChildMomentum,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::TotalTrend,
        Topic::AgeStacked,
        Topic::DistrictDisparity,
        Topic::PincodeBox,
        Topic::SeasonalityIndex,
        Topic::RiskSummary,
        Topic::ChildMomentum,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Topic::TotalTrend => "total_trend",
            Topic::AgeStacked => "age_stacked",
            Topic::DistrictDisparity => "district_disparity",
            Topic::PincodeBox => "pincode_box",
            Topic::SeasonalityIndex => "seasonality_index",
            Topic::RiskSummary => "risk_summary",
            Topic::ChildMomentum => "child_momentum",
        }
    }

    fn what(self) -> &'static str {
        match self {
            Topic::TotalTrend => "Monthly state-level enrolments over time",
            Topic::AgeStacked => "Stacked area of age-group enrolments",
            Topic::DistrictDisparity => "Top and bottom district enrolments",
            Topic::PincodeBox => "Monthly distribution of pincode-level enrolments",
            Topic::SeasonalityIndex => "Month-of-year seasonal index of enrolments",
            Topic::RiskSummary => {
                "Count of districts flagged for saturation, low momentum, and volatility"
            }
            Topic::ChildMomentum => "Share of child enrolments in total over time",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One narrative insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub topic: Topic,
    /// The analysis performed
    pub what: String,
    /// Computed result, pre-formatted
    pub findings: String,
    /// Why it matters
    pub why: String,
    /// False when the finding is an "insufficient data" fallback
    pub sufficient: bool,
}

impl Insight {
    fn new(topic: Topic, findings: String, why: &str) -> Self {
        Self {
            topic,
            what: topic.what().to_string(),
            findings,
            why: why.to_string(),
            sufficient: true,
        }
    }

    fn insufficient(topic: Topic, findings: &str, why: &str) -> Self {
        Self {
            sufficient: false,
            ..Self::new(topic, findings.to_string(), why)
        }
    }
}

/// Format a ratio as a percentage with one decimal, e.g. `0.123` -> `12.3%`
pub fn format_pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn format_optional_pct(value: Option<f64>) -> String {
    value.map(format_pct).unwrap_or_else(|| "n/a".to_string())
}

fn format_districts(totals: &[DistrictTotal]) -> String {
    totals
        .iter()
        .map(|t| format!("{} ({})", t.district, t.total.trunc()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build one insight per topic, in `Topic::ALL` order
pub fn generate_insights(summary: &SummaryStatistics) -> Vec<Insight> {
    Topic::ALL
        .iter()
        .map(|&topic| insight_for(topic, summary))
        .collect()
}

fn insight_for(topic: Topic, s: &SummaryStatistics) -> Insight {
    match topic {
        Topic::TotalTrend => match s.trend.overall_change {
            Some(change) => Insight::new(
                topic,
                format!(
                    "Overall change: {}; recent avg MoM growth: {}.",
                    format_pct(change),
                    format_optional_pct(s.trend.recent_mom_growth),
                ),
                "Tracks momentum and helps plan outreach or capacity scaling.",
            ),
            None => Insight::insufficient(
                topic,
                "Insufficient data to compute trends.",
                "Trend monitoring guides operational planning.",
            ),
        },

        Topic::AgeStacked => match s.age_shares {
            Some(shares) => Insight::new(
                topic,
                format!(
                    "Shares - 0-5: {}, 5-17: {}, 18+: {}.",
                    format_pct(shares.age_0_5),
                    format_pct(shares.age_5_17),
                    format_pct(shares.age_18_plus),
                ),
                "Helps target initiatives for children, students, and adults.",
            ),
            None => Insight::insufficient(
                topic,
                "No totals available to compute shares.",
                "Age mix guides segment-specific policy actions.",
            ),
        },

        Topic::DistrictDisparity => {
            if s.top_districts.is_empty() {
                Insight::insufficient(
                    topic,
                    "No district-level observations available.",
                    "District comparison highlights where support is needed.",
                )
            } else {
                Insight::new(
                    topic,
                    format!(
                        "Top: {}; Bottom: {}.",
                        format_districts(&s.top_districts),
                        format_districts(&s.bottom_districts),
                    ),
                    "Highlights areas for targeted support and resource allocation.",
                )
            }
        }

        Topic::PincodeBox => match s.pincode_dispersion {
            Some(typical) => Insight::new(
                topic,
                format!(
                    "Central tendency (median across months): ~{} enrolments per pincode.",
                    typical.trunc()
                ),
                "Assesses local capacity needs and variability.",
            ),
            None => Insight::insufficient(
                topic,
                "No pincode-level observations available.",
                "Local variability informs micro-targeting.",
            ),
        },

        Topic::SeasonalityIndex => {
            if s.peak_months.is_empty() {
                Insight::insufficient(
                    topic,
                    "Insufficient months to estimate seasonality.",
                    "Seasonality informs timing for campaigns.",
                )
            } else {
                let months: Vec<String> = s.peak_months.iter().map(u32::to_string).collect();
                Insight::new(
                    topic,
                    format!(
                        "Peak months: {}; plan staffing and campaigns accordingly.",
                        months.join(", ")
                    ),
                    "Seasonal planning improves throughput and user experience.",
                )
            }
        }

        Topic::RiskSummary => Insight::new(
            topic,
            format!(
                "Saturation risk: {}; Low momentum: {}; Volatile: {}.",
                s.risk_summary.saturation_risk,
                s.risk_summary.low_momentum,
                s.risk_summary.volatile,
            ),
            "Directs attention to underperforming or unstable areas.",
        ),

        Topic::ChildMomentum => match (s.child_points, s.latest_child_share) {
            (0, _) => Insight::insufficient(
                topic,
                "Insufficient data for child share.",
                "Child enrolment is a priority segment.",
            ),
            (_, Some(share)) => Insight::new(
                topic,
                format!(
                    "Latest child share: {}. Monitor changes post school cycles.",
                    format_pct(share)
                ),
                "Guides child-focused outreach and school partnerships.",
            ),
            (_, None) => Insight::insufficient(
                topic,
                "Latest month recorded no enrolments; child share is undefined.",
                "Guides child-focused outreach and school partnerships.",
            ),
        },
    }
}
