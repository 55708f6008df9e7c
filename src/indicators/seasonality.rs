//! Month-of-year seasonality index

use crate::aggregate::StateMonth;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the `index` values in a seasonality table are relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonalityBasis {
    /// Month mean divided by the overall monthly mean
    RatioToMean,
    /// Overall mean was zero or undefined, so the raw month mean is reported
    RawMean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalIndex {
    /// Calendar month (1-12)
    pub month: u32,
    pub index: f64,
}

/// Seasonality index for every calendar month present in the state series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityTable {
    pub basis: SeasonalityBasis,
    /// Ordered by month
    pub entries: Vec<SeasonalIndex>,
}

impl SeasonalityTable {
    pub fn from_monthly(monthly: &[StateMonth]) -> Self {
        let overall_mean = if monthly.is_empty() {
            0.0
        } else {
            monthly.iter().map(|m| m.total).sum::<f64>() / monthly.len() as f64
        };

        let mut by_month: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
        for m in monthly {
            let slot = by_month.entry(m.month_of_year).or_insert((0.0, 0));
            slot.0 += m.total;
            slot.1 += 1;
        }

        let basis = if overall_mean != 0.0 {
            SeasonalityBasis::RatioToMean
        } else {
            SeasonalityBasis::RawMean
        };

        let entries = by_month
            .into_iter()
            .map(|(month, (sum, count))| {
                let month_mean = sum / count as f64;
                let index = match basis {
                    SeasonalityBasis::RatioToMean => month_mean / overall_mean,
                    SeasonalityBasis::RawMean => month_mean,
                };
                SeasonalIndex { month, index }
            })
            .collect();

        Self { basis, entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` months with the highest index; ties go to the earlier month
    pub fn peak_months(&self, n: usize) -> Vec<u32> {
        let mut ranked: Vec<&SeasonalIndex> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.index.total_cmp(&a.index));
        ranked.into_iter().take(n).map(|e| e.month).collect()
    }
}
