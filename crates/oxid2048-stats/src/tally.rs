use std::collections::BTreeMap;

use serde::Serialize;

/// Occurrence counts of discrete values, such as the largest tile reached in each game.
///
/// Serialized as a map from value to count, in ascending value order.
///
/// # Examples
///
/// ```
/// use oxid2048_stats::tally::Tally;
///
/// let tally: Tally<u32> = [512, 1024, 1024, 2048].into_iter().collect();
/// assert_eq!(tally.count(&1024), 2);
/// assert_eq!(tally.at_least(&1024), 3);
/// assert_eq!(tally.fraction_at_least(&2048), 0.25);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Tally<K: Ord> {
    counts: BTreeMap<K, usize>,
}

impl<K: Ord> Default for Tally<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<K: Ord> Tally<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: K) {
        *self.counts.entry(value).or_default() += 1;
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn count(&self, value: &K) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Number of recorded values greater than or equal to `threshold`.
    #[must_use]
    pub fn at_least(&self, threshold: &K) -> usize {
        self.counts.range(threshold..).map(|(_, count)| count).sum()
    }

    /// Share of recorded values greater than or equal to `threshold`, 0 when nothing was recorded.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fraction_at_least(&self, threshold: &K) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.at_least(threshold) as f64 / total as f64,
        }
    }

    /// Iterates over `(value, count)` pairs in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> + '_ {
        self.counts.iter().map(|(value, count)| (value, *count))
    }
}

impl<K: Ord> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Self::new();
        for value in iter {
            tally.add(value);
        }
        tally
    }
}
