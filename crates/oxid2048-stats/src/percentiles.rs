use serde::Serialize;

/// Precomputed percentile values for a dataset.
///
/// Serialized as a list of `{"percentile": p, "value": v}` objects.
///
/// # Examples
///
/// ```
/// use oxid2048_stats::percentiles::Percentiles;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]);
///
/// assert_eq!(percentiles.get(50.0), Some(6.0));
/// assert_eq!(percentiles.get(25.0), Some(3.0));
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Percentiles {
    /// Sorted by percentile; percentiles are 0.0-100.0.
    values: Vec<PercentileValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileValue {
    pub percentile: f64,
    pub value: f64,
}

impl Percentiles {
    /// Computes percentiles from sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .map(|&percentile| PercentileValue {
                percentile,
                value: compute_percentile(sorted_values, percentile),
            })
            .collect();
        Self { values }
    }

    /// Computes percentiles from unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// use oxid2048_stats::percentiles::Percentiles;
    ///
    /// let values = vec![5.0, 2.0, 8.0, 1.0, 9.0];
    /// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]);
    ///
    /// assert_eq!(percentiles.get(50.0), Some(5.0));
    /// ```
    #[must_use]
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Gets the value at a specific percentile.
    ///
    /// Returns `None` if the percentile was not precomputed.
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values
            .iter()
            .find(|pv| (pv.percentile - percentile).abs() < f64::EPSILON)
            .map(|pv| pv.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = PercentileValue> + '_ {
        self.values.iter().copied()
    }
}

/// Computes a single percentile value from sorted data.
///
/// This function uses the nearest-rank method (also called "ordinary" percentile).
/// For a dataset with n values, the k-th percentile is the value at position
/// `floor(n * k / 100)`. Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use oxid2048_stats::percentiles::compute_percentile;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_percentile(&values, 50.0), 3.0);
/// assert_eq!(compute_percentile(&values, 25.0), 2.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let idx = ((sorted_values.len() as f64 * percentile) / 100.0) as usize;
    let idx = idx.min(sorted_values.len() - 1);
    sorted_values[idx]
}
