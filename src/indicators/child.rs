//! Child enrolment momentum

use crate::aggregate::StateMonth;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Child (0-17) enrolments for one state month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildShare {
    pub date: NaiveDate,
    pub child_total: f64,
    /// `child_total / total`; `None` for months with zero total
    pub child_share: Option<f64>,
}

pub fn child_momentum(monthly: &[StateMonth]) -> Vec<ChildShare> {
    monthly
        .iter()
        .map(|m| {
            let child_total = m.age_0_5 + m.age_5_17;
            let child_share = if m.total != 0.0 {
                Some(child_total / m.total)
            } else {
                None
            };
            ChildShare {
                date: m.date,
                child_total,
                child_share,
            }
        })
        .collect()
}

/// Child share in the most recent month, if that month has any enrolments
pub fn latest_child_share(series: &[ChildShare]) -> Option<f64> {
    series.last().and_then(|c| c.child_share)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn month(m: u32, a: f64, b: f64, c: f64) -> StateMonth {
        StateMonth {
            date: NaiveDate::from_ymd_opt(2025, m, 1).unwrap(),
            age_0_5: a,
            age_5_17: b,
            age_18_plus: c,
            total: a + b + c,
            month_of_year: m,
        }
    }

    #[test]
    fn test_child_share() {
        let out = child_momentum(&[month(1, 10.0, 30.0, 60.0), month(2, 0.0, 0.0, 50.0)]);
        assert_eq!(out[0].child_total, 40.0);
        assert_relative_eq!(out[0].child_share.unwrap(), 0.4);
        assert_eq!(out[1].child_share, Some(0.0));
        assert_eq!(latest_child_share(&out), Some(0.0));
    }

    #[test]
    fn test_zero_total_is_undefined() {
        let out = child_momentum(&[month(3, 0.0, 0.0, 0.0)]);
        assert_eq!(out[0].child_share, None);
        assert_eq!(latest_child_share(&out), None);
    }

    #[test]
    fn test_share_within_unit_interval() {
        let months: Vec<StateMonth> = (1..=12)
            .map(|m| month(m, (m * 3) as f64, (m % 5) as f64, ((12 - m) * 7) as f64))
            .collect();
        for c in child_momentum(&months) {
            if let Some(share) = c.child_share {
                assert!((0.0..=1.0).contains(&share));
            }
        }
    }

    #[test]
    fn test_empty() {
        assert!(child_momentum(&[]).is_empty());
        assert_eq!(latest_child_share(&[]), None);
    }
}
