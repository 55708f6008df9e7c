//! Trailing-window statistics over an ordered series
//!
//! Each function returns one result per input point, aligned by index. A point
//! only gets a value when its trailing window holds at least `min_periods`
//! observations.

/// Trailing window of up to `size` points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingWindow {
    pub size: usize,
    pub min_periods: usize,
}

impl RollingWindow {
    pub fn new(size: usize, min_periods: usize) -> Self {
        Self { size, min_periods }
    }

    /// Apply `stat` to each trailing window that meets `min_periods`
    pub fn apply<F>(&self, values: &[f64], stat: F) -> Vec<Option<f64>>
    where
        F: Fn(&[f64]) -> Option<f64>,
    {
        let size = self.size.max(1);
        let min_periods = self.min_periods.max(1);
        (0..values.len())
            .map(|end| {
                let start = (end + 1).saturating_sub(size);
                let window = &values[start..=end];
                if window.len() >= min_periods {
                    stat(window)
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn max(&self, values: &[f64]) -> Vec<Option<f64>> {
        self.apply(values, |w| w.iter().copied().reduce(f64::max))
    }

    pub fn mean(&self, values: &[f64]) -> Vec<Option<f64>> {
        self.apply(values, mean)
    }

    /// Sample standard deviation (n - 1 denominator)
    pub fn std(&self, values: &[f64]) -> Vec<Option<f64>> {
        self.apply(values, sample_std)
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation; undefined for fewer than two points
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Median of the values; undefined when empty
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}
