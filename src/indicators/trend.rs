//! State-level trend summary

use crate::aggregate::StateMonth;
use serde::{Deserialize, Serialize};

/// Month-over-month change slots averaged for recent growth
const RECENT_CHANGE_SLOTS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// `(last - first) / max(first, 1)`
    pub overall_change: Option<f64>,
    /// Mean of the defined month-over-month changes among the last three slots
    pub recent_mom_growth: Option<f64>,
}

impl TrendSummary {
    pub fn from_monthly(monthly: &[StateMonth]) -> Self {
        let (Some(first), Some(last)) = (monthly.first(), monthly.last()) else {
            return Self::default();
        };
        let overall_change = Some((last.total - first.total) / first.total.max(1.0));

        let changes = month_over_month(monthly);
        let recent: Vec<f64> = changes
            .iter()
            .skip(changes.len().saturating_sub(RECENT_CHANGE_SLOTS))
            .flatten()
            .copied()
            .collect();
        let recent_mom_growth = if recent.is_empty() {
            None
        } else {
            Some(recent.iter().sum::<f64>() / recent.len() as f64)
        };

        Self {
            overall_change,
            recent_mom_growth,
        }
    }
}

/// Percentage change from the previous month, aligned with the input
///
/// The first month has no predecessor, and a zero predecessor gives no change.
pub fn month_over_month(monthly: &[StateMonth]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(monthly.len());
    if !monthly.is_empty() {
        changes.push(None);
    }
    changes.extend(monthly.windows(2).map(|pair| {
        let (prev, curr) = (pair[0].total, pair[1].total);
        if prev != 0.0 {
            Some((curr - prev) / prev)
        } else {
            None
        }
    }));
    changes
}
