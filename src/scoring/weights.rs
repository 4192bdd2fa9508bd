//! Weight-vector validation and interactive adjustment.
//!
//! `adjust_one` is a best-effort normalizer: near the 0/1 boundaries the
//! clamping can leave the vector slightly off 1.0, which `validate` tolerates.

use crate::error::{PrioritizerError, Result};
use crate::types::scoring::{ScoringWeights, WeightKey};

/// Allowed drift of the weight sum from 1.0.
pub const SUM_TOLERANCE: f64 = 1e-2;

pub fn validate(weights: &ScoringWeights) -> Result<()> {
    for key in WeightKey::ALL {
        let value = weights.get(key);
        if !value.is_finite() {
            return Err(PrioritizerError::InvalidWeights(format!(
                "{key} weight is not a finite number"
            )));
        }
        if value < 0.0 {
            return Err(PrioritizerError::InvalidWeights(format!(
                "{key} weight must not be negative (found {value:.3})"
            )));
        }
    }

    let sum = weights.sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(PrioritizerError::InvalidWeights(format!(
            "weights must sum to 1.0 (found {sum:.3})"
        )));
    }
    Ok(())
}

/// Moves one weight to `new_value` and lets the other three absorb the change
/// in proportion to their current size. When the other three are all zero
/// nothing can absorb the change and `current` is returned untouched.
pub fn adjust_one(
    current: &ScoringWeights,
    key: WeightKey,
    new_value: f64,
) -> Result<ScoringWeights> {
    if !new_value.is_finite() || !(0.0..=1.0).contains(&new_value) {
        return Err(PrioritizerError::InvalidWeights(format!(
            "{key} weight must be between 0.0 and 1.0 (found {new_value})"
        )));
    }

    let others_total: f64 = key.others().map(|other| current.get(other)).sum();
    if others_total == 0.0 {
        tracing::debug!(%key, "other weights are all zero; adjustment skipped");
        return Ok(*current);
    }

    let delta = new_value - current.get(key);
    let mut next = *current;
    next.set(key, new_value);
    for other in key.others() {
        let share = current.get(other) / others_total;
        next.set(other, (current.get(other) - delta * share).clamp(0.0, 1.0));
    }

    let sum = next.sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        let residual = (1.0 - sum) / 3.0;
        tracing::debug!(%key, sum, residual, "spreading residual across other weights");
        for other in key.others() {
            next.set(other, (next.get(other) + residual).clamp(0.0, 1.0));
        }
    }

    Ok(next)
}

/// Renormalizes by the actual sum after dropping negative components. This is
/// the explicit alternative to the hard failure in `validate`.
pub fn repair(weights: &ScoringWeights) -> Result<ScoringWeights> {
    if WeightKey::ALL
        .into_iter()
        .any(|key| !weights.get(key).is_finite())
    {
        return Err(PrioritizerError::InvalidWeights(
            "cannot repair non-finite weights".to_string(),
        ));
    }

    let mut repaired = *weights;
    for key in WeightKey::ALL {
        repaired.set(key, repaired.get(key).max(0.0));
    }
    let sum = repaired.sum();
    if sum <= 0.0 {
        return Err(PrioritizerError::InvalidWeights(
            "cannot repair weights that are all zero".to_string(),
        ));
    }
    for key in WeightKey::ALL {
        repaired.set(key, repaired.get(key) / sum);
    }
    Ok(repaired)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn validate_accepts_defaults_and_small_drift() {
        assert!(validate(&ScoringWeights::default()).is_ok());
        assert!(validate(&ScoringWeights::new(0.30, 0.25, 0.25, 0.205)).is_ok());
    }

    #[test]
    fn validate_rejects_negative_component() {
        let err = validate(&ScoringWeights::new(1.2, -0.2, 0.0, 0.0))
            .expect_err("negative weight should fail");
        assert!(matches!(err, PrioritizerError::InvalidWeights(_)));
        assert!(err.to_string().contains("importance weight must not be negative"));
    }

    #[test]
    fn validate_rejects_sum_outside_tolerance() {
        let err = validate(&ScoringWeights::new(0.5, 0.5, 0.5, 0.5))
            .expect_err("sum of 2.0 should fail");
        assert!(err.to_string().contains("must sum to 1.0 (found 2.000)"));
        assert!(validate(&ScoringWeights::new(0.30, 0.25, 0.25, 0.25)).is_err());
    }

    #[test]
    fn validate_rejects_nan() {
        assert!(validate(&ScoringWeights::new(f64::NAN, 0.25, 0.25, 0.5)).is_err());
    }

    #[test]
    fn raising_votes_shrinks_others_proportionally() {
        let adjusted = adjust_one(&ScoringWeights::default(), WeightKey::Votes, 0.50)
            .expect("adjustment should succeed");

        assert_close(adjusted.votes, 0.50);
        assert_close(adjusted.importance, 0.25 - 0.20 * (0.25 / 0.70));
        assert_close(adjusted.alignment, 0.25 - 0.20 * (0.25 / 0.70));
        assert_close(adjusted.cost, 0.20 - 0.20 * (0.20 / 0.70));
        assert!((adjusted.sum() - 1.0).abs() <= 0.01);
        assert!(adjusted.importance < 0.25 && adjusted.cost < 0.20);
    }

    #[test]
    fn lowering_a_weight_grows_the_others() {
        let adjusted = adjust_one(&ScoringWeights::default(), WeightKey::Cost, 0.0)
            .expect("adjustment should succeed");
        assert_close(adjusted.cost, 0.0);
        assert!(adjusted.votes > 0.30);
        assert!((adjusted.sum() - 1.0).abs() <= 0.01);
    }

    #[test]
    fn zero_weight_others_make_adjustment_a_no_op() {
        let current = ScoringWeights::new(1.0, 0.0, 0.0, 0.0);
        let adjusted =
            adjust_one(&current, WeightKey::Votes, 0.4).expect("no-op should still succeed");
        assert_eq!(adjusted, current);
    }

    #[test]
    fn drifted_vector_gets_residual_spread() {
        let current = ScoringWeights::new(0.4, 0.4, 0.4, 0.4);
        let adjusted =
            adjust_one(&current, WeightKey::Votes, 0.4).expect("adjustment should succeed");
        assert_close(adjusted.votes, 0.4);
        assert_close(adjusted.importance, 0.2);
        assert_close(adjusted.alignment, 0.2);
        assert_close(adjusted.cost, 0.2);
    }

    #[test]
    fn residual_pass_is_best_effort_at_the_boundaries() {
        let current = ScoringWeights::new(0.9, 0.0, 0.0, 0.9);
        let adjusted =
            adjust_one(&current, WeightKey::Votes, 0.9).expect("adjustment should succeed");
        assert_close(adjusted.importance, 0.0);
        assert_close(adjusted.alignment, 0.0);
        assert_close(adjusted.cost, 0.9 - 0.8 / 3.0);
        assert!(validate(&adjusted).is_err());
    }

    #[test]
    fn adjusting_every_key_keeps_sum_near_one() {
        for key in WeightKey::ALL {
            for step in 0..=10 {
                let value = f64::from(step) / 10.0;
                let adjusted = adjust_one(&ScoringWeights::default(), key, value)
                    .expect("in-range value should adjust");
                assert!(
                    (adjusted.sum() - 1.0).abs() <= 0.011,
                    "{key}={value} drifted to {}",
                    adjusted.sum()
                );
                assert!(WeightKey::ALL
                    .into_iter()
                    .all(|k| (0.0..=1.0).contains(&adjusted.get(k))));
            }
        }
    }

    #[test]
    fn adjust_rejects_out_of_range_value() {
        assert!(adjust_one(&ScoringWeights::default(), WeightKey::Votes, 1.5).is_err());
        assert!(adjust_one(&ScoringWeights::default(), WeightKey::Votes, -0.1).is_err());
        assert!(adjust_one(&ScoringWeights::default(), WeightKey::Votes, f64::NAN).is_err());
    }

    #[test]
    fn repair_divides_by_actual_sum() {
        let repaired =
            repair(&ScoringWeights::new(0.6, 0.5, 0.5, 0.4)).expect("repair should succeed");
        assert_close(repaired.votes, 0.3);
        assert_close(repaired.cost, 0.2);
        assert!(validate(&repaired).is_ok());
    }

    #[test]
    fn repair_drops_negatives_and_rejects_all_zero() {
        let repaired =
            repair(&ScoringWeights::new(-1.0, 1.0, 1.0, 0.0)).expect("repair should succeed");
        assert_close(repaired.votes, 0.0);
        assert_close(repaired.importance, 0.5);

        assert!(repair(&ScoringWeights::new(0.0, 0.0, 0.0, 0.0)).is_err());
        assert!(repair(&ScoringWeights::new(-1.0, 0.0, 0.0, 0.0)).is_err());
    }
}
