//! Prioritised action items
//!
//! Always five recommendations in a fixed order. Each one names concrete
//! districts, months or shares when the data supports it and falls back to a
//! generic action otherwise.

use super::format_pct;
use super::summary::SummaryStatistics;
use chrono::Month;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    ChildFocus,
    MobileUnits,
    SeasonalCampaigns,
    VolatilityMonitoring,
    ServiceQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub text: String,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| month.to_string())
}

pub fn generate_recommendations(s: &SummaryStatistics) -> Vec<Recommendation> {
    let child_focus = match s.latest_child_share {
        Some(share) => format!(
            "Prioritize biometric update infrastructure for children ({} share).",
            format_pct(share)
        ),
        None => "Prioritize child enrolment infrastructure; monitor child share trends.".to_string(),
    };

    let mobile_units = if s.recent_bottom_districts.is_empty() {
        "Deploy mobile units to low-performing areas identified by recent trends.".to_string()
    } else {
        let names: Vec<&str> = s
            .recent_bottom_districts
            .iter()
            .map(|d| d.district.as_str())
            .collect();
        format!(
            "Deploy mobile enrolment units in low-performing districts ({}).",
            names.join(", ")
        )
    };

    let seasonal = if s.peak_months.is_empty() {
        "Align campaigns with observed seasonal peaks once sufficient data accrues.".to_string()
    } else {
        let names: Vec<String> = s.peak_months.iter().map(|&m| month_name(m)).collect();
        format!(
            "Align outreach campaigns with seasonal peaks ({}).",
            names.join(" & ")
        )
    };

    let volatility = if s.volatile_districts.is_empty() {
        "Monitor districts exhibiting high variability for operational stability.".to_string()
    } else {
        format!(
            "Monitor volatile districts for operational instability (e.g., {}).",
            s.volatile_districts.join(", ")
        )
    };

    let service_quality = format!(
        "Shift focus from enrolment to service quality in saturated districts (approx. {} flagged).",
        s.risk_summary.saturation_risk
    );

    vec![
        Recommendation { kind: RecommendationKind::ChildFocus, text: child_focus },
        Recommendation { kind: RecommendationKind::MobileUnits, text: mobile_units },
        Recommendation { kind: RecommendationKind::SeasonalCampaigns, text: seasonal },
        Recommendation { kind: RecommendationKind::VolatilityMonitoring, text: volatility },
        Recommendation { kind: RecommendationKind::ServiceQuality, text: service_quality },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{DistrictTotal, RiskSummary, TrendSummary};

    fn summary() -> SummaryStatistics {
        SummaryStatistics {
            monthly_points: 0,
            trend: TrendSummary::default(),
            age_shares: None,
            top_districts: Vec::new(),
            bottom_districts: Vec::new(),
            recent_bottom_districts: Vec::new(),
            pincode_dispersion: None,
            peak_months: Vec::new(),
            risk_summary: RiskSummary::default(),
            volatile_districts: Vec::new(),
            child_points: 0,
            latest_child_share: None,
        }
    }

    #[test]
    fn test_fallbacks_keep_order() {
        let recs = generate_recommendations(&summary());
        let kinds: Vec<RecommendationKind> = recs.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::ChildFocus,
                RecommendationKind::MobileUnits,
                RecommendationKind::SeasonalCampaigns,
                RecommendationKind::VolatilityMonitoring,
                RecommendationKind::ServiceQuality,
            ]
        );
        assert_eq!(
            recs[4].text,
            "Shift focus from enrolment to service quality in saturated districts (approx. 0 flagged)."
        );
    }

    #[test]
    fn test_concrete_recommendations() {
        let s = SummaryStatistics {
            latest_child_share: Some(0.4216),
            recent_bottom_districts: vec![
                DistrictTotal { district: "Hingoli".into(), total: 30.0 },
                DistrictTotal { district: "Washim".into(), total: 12.0 },
            ],
            peak_months: vec![4, 7],
            volatile_districts: vec!["Thane".into()],
            risk_summary: RiskSummary { saturation_risk: 5, low_momentum: 1, volatile: 1 },
            ..summary()
        };
        let recs = generate_recommendations(&s);
        assert_eq!(
            recs[0].text,
            "Prioritize biometric update infrastructure for children (42.2% share)."
        );
        assert_eq!(
            recs[1].text,
            "Deploy mobile enrolment units in low-performing districts (Hingoli, Washim)."
        );
        assert_eq!(recs[2].text, "Align outreach campaigns with seasonal peaks (April & July).");
        assert_eq!(
            recs[3].to_string(),
            "Monitor volatile districts for operational instability (e.g., Thane)."
        );
        assert!(recs[4].text.contains("approx. 5 flagged"));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "13");
    }
}
