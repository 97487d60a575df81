// ============================================================================
// Probability Distribution Validation
// ============================================================================
//
// Contract: outcome probabilities are finite, each in [0, 1], and sum to 1.0
// within tolerance. Nothing is renormalized; a failing vector is an error.

use serde::{Deserialize, Serialize};

/// Default tolerance for the outcome model (sum must be 1 ± 1e-9).
pub const OUTCOME_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbabilityValidator {
    /// Maximum allowed deviation of the sum from 1.0
    tolerance: f64,
}

impl Default for ProbabilityValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbabilityValidator {
    /// Validator with [`OUTCOME_SUM_TOLERANCE`].
    pub fn new() -> Self {
        Self { tolerance: OUTCOME_SUM_TOLERANCE }
    }

    /// # Examples
    /// ```
    /// use bb_core::engine::probability_validator::ProbabilityValidator;
    ///
    /// let lenient = ProbabilityValidator::with_tolerance(0.01);
    /// assert!(lenient.validate_distribution(&[0.5, 0.505]).is_ok());
    /// ```
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Validate a probability distribution.
    ///
    /// # Validation Rules
    /// 1. Distribution must not be empty
    /// 2. Every entry is finite and within [0.0, 1.0]
    /// 3. Sum must be within tolerance of 1.0
    ///
    /// # Examples
    /// ```
    /// use bb_core::engine::probability_validator::ProbabilityValidator;
    ///
    /// let validator = ProbabilityValidator::new();
    /// assert!(validator.validate_distribution(&[0.25, 0.50, 0.25]).is_ok());
    /// assert!(validator.validate_distribution(&[0.25, 0.50, 0.30]).is_err());
    /// assert!(validator.validate_distribution(&[0.25, -0.10, 0.85]).is_err());
    /// ```
    pub fn validate_distribution(&self, probabilities: &[f64]) -> Result<(), String> {
        if probabilities.is_empty() {
            return Err("Empty probability distribution".to_string());
        }

        if let Some((i, p)) = probabilities
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p < 0.0 || **p > 1.0)
        {
            return Err(format!("Probability at index {} is outside [0, 1]: {}", i, p));
        }

        let sum: f64 = probabilities.iter().sum();
        let deviation = (sum - 1.0).abs();

        if deviation > self.tolerance {
            return Err(format!(
                "Probability sum {:.12} deviates from 1.0 by {:.3e} (tolerance: {:.3e})",
                sum, deviation, self.tolerance
            ));
        }

        Ok(())
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}
