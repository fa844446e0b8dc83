use serde::{Deserialize, Serialize};

/// Per-feature weights of the heuristic evaluator.
///
/// Serialized as a JSON object with one field per feature id; every field is required and
/// unknown fields are rejected, so a typo in a weights file fails loudly.
///
/// # Example
///
/// ```
/// use oxid2048_evaluator::HeuristicWeights;
///
/// let json = r#"{
///     "monotonicity": 4.0, "smoothness": 1.0, "max_value": 2.0, "empty_tiles": 2.7,
///     "corner_max": 2.8, "snake_pattern": 1.6, "merge_potential": 1.0
/// }"#;
/// let weights: HeuristicWeights = serde_json::from_str(json).unwrap();
/// assert_eq!(weights, HeuristicWeights::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeuristicWeights {
    pub monotonicity: f64,
    pub smoothness: f64,
    pub max_value: f64,
    pub empty_tiles: f64,
    pub corner_max: f64,
    pub snake_pattern: f64,
    pub merge_potential: f64,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("weight {field:?} must be finite, got {value}")]
pub struct InvalidWeightError {
    field: &'static str,
    value: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self::REFERENCE
    }
}

impl HeuristicWeights {
    /// Hand-tuned weights that play well on the classic 4×4 grid.
    pub const REFERENCE: Self = Self {
        monotonicity: 4.0,
        smoothness: 1.0,
        max_value: 2.0,
        empty_tiles: 2.7,
        corner_max: 2.8,
        snake_pattern: 1.6,
        merge_potential: 1.0,
    };

    /// Weights in the order of [`ALL_GRID_FEATURES`](crate::ALL_GRID_FEATURES).
    #[must_use]
    pub const fn as_array(&self) -> [f64; 7] {
        [
            self.monotonicity,
            self.smoothness,
            self.max_value,
            self.empty_tiles,
            self.corner_max,
            self.snake_pattern,
            self.merge_potential,
        ]
    }

    /// Rejects NaN and infinite weights, which would poison every comparison in the search.
    pub fn validate(&self) -> Result<(), InvalidWeightError> {
        let fields = [
            ("monotonicity", self.monotonicity),
            ("smoothness", self.smoothness),
            ("max_value", self.max_value),
            ("empty_tiles", self.empty_tiles),
            ("corner_max", self.corner_max),
            ("snake_pattern", self.snake_pattern),
            ("merge_potential", self.merge_potential),
        ];
        match fields.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((field, value)) => Err(InvalidWeightError { field, value }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_rejected() {
        let result: Result<HeuristicWeights, _> = serde_json::from_str(r#"{"monotonicity":1.0}"#);
        assert!(result.unwrap_err().to_string().contains("missing field"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut value = serde_json::to_value(HeuristicWeights::default()).unwrap();
        value["corner"] = serde_json::json!(1.0);
        let result: Result<HeuristicWeights, _> = serde_json::from_value(value);
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        assert!(HeuristicWeights::default().validate().is_ok());
        let weights = HeuristicWeights {
            smoothness: f64::NAN,
            ..HeuristicWeights::default()
        };
        let err = weights.validate().unwrap_err();
        assert!(err.to_string().contains("smoothness"));
    }
}
