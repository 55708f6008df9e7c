//! Monthly aggregation at state, district and pincode level
//!
//! Grouping goes through `BTreeMap`s keyed on date or `(entity, date)`, so the
//! output order (and content) never depends on the order rows arrive in.

use crate::enrolment::EnrolmentRow;
use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// State-level totals for one observed month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateMonth {
    pub date: NaiveDate,
    pub age_0_5: f64,
    pub age_5_17: f64,
    pub age_18_plus: f64,
    pub total: f64,
    /// Calendar month (1-12)
    pub month_of_year: u32,
}

/// Total for one entity (district or pincode) in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMonth {
    pub entity: String,
    pub date: NaiveDate,
    pub total: f64,
}

/// The three aggregate views every indicator is derived from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    /// Ascending by date, one entry per observed month
    pub state_monthly: Vec<StateMonth>,
    /// Sorted by (district, date)
    pub district_monthly: Vec<EntityMonth>,
    /// Sorted by (pincode, date)
    pub pincode_monthly: Vec<EntityMonth>,
}

impl Aggregates {
    /// Build all three views from cleaned rows
    pub fn from_rows(rows: &[EnrolmentRow]) -> Self {
        let aggregates = Self {
            state_monthly: state_monthly(rows),
            district_monthly: entity_monthly(rows, |r| r.district.as_str()),
            pincode_monthly: entity_monthly(rows, |r| r.pincode.as_str()),
        };
        debug!(
            "Aggregated {} rows into {} months, {} district-months, {} pincode-months",
            rows.len(),
            aggregates.state_monthly.len(),
            aggregates.district_monthly.len(),
            aggregates.pincode_monthly.len(),
        );
        aggregates
    }

    /// Latest month observed at state level
    pub fn latest_month(&self) -> Option<NaiveDate> {
        self.state_monthly.last().map(|m| m.date)
    }

    /// Number of distinct districts
    pub fn district_count(&self) -> usize {
        distinct_entities(&self.district_monthly)
    }

    /// Number of distinct pincodes
    pub fn pincode_count(&self) -> usize {
        distinct_entities(&self.pincode_monthly)
    }
}

#[derive(Default)]
struct MonthAccumulator {
    age_0_5: f64,
    age_5_17: f64,
    age_18_plus: f64,
    total: f64,
}

/// Sum each age segment and total per month; missing counts add nothing
pub fn state_monthly(rows: &[EnrolmentRow]) -> Vec<StateMonth> {
    let mut months: BTreeMap<NaiveDate, MonthAccumulator> = BTreeMap::new();
    for row in rows {
        let acc = months.entry(row.date).or_default();
        acc.age_0_5 += row.age_0_5.unwrap_or(0.0);
        acc.age_5_17 += row.age_5_17.unwrap_or(0.0);
        acc.age_18_plus += row.age_18_plus.unwrap_or(0.0);
        acc.total += row.total;
    }

    months
        .into_iter()
        .map(|(date, acc)| StateMonth {
            date,
            age_0_5: acc.age_0_5,
            age_5_17: acc.age_5_17,
            age_18_plus: acc.age_18_plus,
            total: acc.total,
            month_of_year: date.month(),
        })
        .collect()
}

/// Sum totals per (entity, month), with the entity chosen by `key`
pub fn entity_monthly<F>(rows: &[EnrolmentRow], key: F) -> Vec<EntityMonth>
where
    F: Fn(&EnrolmentRow) -> &str,
{
    let mut groups: BTreeMap<(&str, NaiveDate), f64> = BTreeMap::new();
    for row in rows {
        *groups.entry((key(row), row.date)).or_default() += row.total;
    }

    groups
        .into_iter()
        .map(|((entity, date), total)| EntityMonth {
            entity: entity.to_string(),
            date,
            total,
        })
        .collect()
}

/// Split a `(entity, date)`-sorted series into per-entity date-ordered totals
pub fn series_by_entity(points: &[EntityMonth]) -> BTreeMap<&str, Vec<(NaiveDate, f64)>> {
    let mut series: BTreeMap<&str, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for point in points {
        series
            .entry(point.entity.as_str())
            .or_default()
            .push((point.date, point.total));
    }
    for values in series.values_mut() {
        values.sort_by_key(|(date, _)| *date);
    }
    series
}

fn distinct_entities(points: &[EntityMonth]) -> usize {
    points
        .iter()
        .map(|p| p.entity.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_rows() -> Vec<EnrolmentRow> {
        vec![
            EnrolmentRow::new(ymd(2025, 2, 3), "Pune", "411001", Some(1.0), Some(2.0), Some(3.0)),
            EnrolmentRow::new(ymd(2025, 1, 5), "Pune", "411002", Some(4.0), None, Some(1.0)),
            EnrolmentRow::new(ymd(2025, 1, 20), "Nashik", "422001", None, None, None),
            EnrolmentRow::new(ymd(2025, 2, 14), "Nashik", "422001", Some(2.0), Some(2.0), Some(2.0)),
            EnrolmentRow::new(ymd(2025, 2, 28), "Pune", "411001", Some(0.0), Some(1.0), Some(0.0)),
        ]
    }

    #[test]
    fn test_state_monthly_sums_and_sorts() {
        let monthly = state_monthly(&sample_rows());
        assert_eq!(monthly.len(), 2);

        assert_eq!(monthly[0].date, ymd(2025, 1, 1));
        assert_eq!(monthly[0].month_of_year, 1);
        assert_eq!(monthly[0].age_0_5, 4.0);
        assert_eq!(monthly[0].age_5_17, 0.0);
        assert_eq!(monthly[0].total, 5.0);

        assert_eq!(monthly[1].date, ymd(2025, 2, 1));
        assert_eq!(monthly[1].age_5_17, 5.0);
        assert_eq!(monthly[1].total, 13.0);
    }

    #[test]
    fn test_entity_monthly_groups_by_entity_and_month() {
        let aggregates = Aggregates::from_rows(&sample_rows());
        let pune: Vec<_> = aggregates
            .district_monthly
            .iter()
            .filter(|p| p.entity == "Pune")
            .collect();
        assert_eq!(pune.len(), 2);
        assert_eq!(pune[0].total, 5.0);
        assert_eq!(pune[1].total, 7.0);

        let pin = aggregates
            .pincode_monthly
            .iter()
            .find(|p| p.entity == "411001")
            .unwrap();
        assert_eq!(pin.date, ymd(2025, 2, 1));
        assert_eq!(pin.total, 7.0);

        assert_eq!(aggregates.district_count(), 2);
        assert_eq!(aggregates.pincode_count(), 3);
        assert_eq!(aggregates.latest_month(), Some(ymd(2025, 2, 1)));
    }

    #[test]
    fn test_row_order_does_not_matter() {
        let rows = sample_rows();
        let mut reversed = rows.clone();
        reversed.reverse();
        let mut rotated = rows.clone();
        rotated.rotate_left(2);

        let expected = Aggregates::from_rows(&rows);
        assert_eq!(Aggregates::from_rows(&reversed), expected);
        assert_eq!(Aggregates::from_rows(&rotated), expected);
    }

    #[test]
    fn test_non_negative_rows_give_non_negative_months() {
        let monthly = state_monthly(&sample_rows());
        assert!(monthly.iter().all(|m| m.total >= 0.0));
    }

    #[test]
    fn test_empty_input() {
        let aggregates = Aggregates::from_rows(&[]);
        assert!(aggregates.state_monthly.is_empty());
        assert!(aggregates.district_monthly.is_empty());
        assert_eq!(aggregates.latest_month(), None);
    }

    #[test]
    fn test_series_by_entity() {
        let aggregates = Aggregates::from_rows(&sample_rows());
        let series = series_by_entity(&aggregates.district_monthly);
        assert_eq!(series.keys().copied().collect::<Vec<_>>(), vec!["Nashik", "Pune"]);
        assert_eq!(series["Nashik"], vec![(ymd(2025, 1, 1), 0.0), (ymd(2025, 2, 1), 6.0)]);
    }
}
