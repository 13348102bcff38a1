//! Stock termination predicates for [`GentleBoost::train`].
//!
//! Every predicate here is an ordinary closure over `(learners, outputs)`,
//! so callers can just as well hand-roll their own or wrap these with extra
//! conditions.
//!
//! [`GentleBoost::train`]: crate::boost::GentleBoost::train

use serde::{Deserialize, Serialize};

/// Stop once the ensemble holds `limit` learners.
///
/// Counts pre-trained learners too, so resuming an ensemble of length 3
/// with a limit of 3 trains zero rounds.
pub fn max_rounds<L>(limit: usize) -> impl FnMut(&[L], &[f32]) -> bool {
    move |learners, _outputs| learners.len() >= limit
}

/// Detection-rate targets for sizing one cascade stage.
///
/// A stage is done when, thresholding the accumulated outputs at
/// `decision_threshold`, the positive class is detected at
/// `min_true_positive_rate` or better while the negative class passes at
/// `max_false_positive_rate` or worse. `max_rounds` caps the stage when the
/// targets are unreachable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateTargets {
    pub min_true_positive_rate: f32,
    pub max_false_positive_rate: f32,
    pub decision_threshold: f32,
    pub max_rounds: usize,
}

impl Default for RateTargets {
    fn default() -> Self {
        Self {
            min_true_positive_rate: 0.995,
            max_false_positive_rate: 0.5,
            decision_threshold: 0.0,
            max_rounds: 64,
        }
    }
}

/// Stop when the thresholded outputs meet the stage's rate targets, or the
/// round cap is hit.
///
/// `true_values` must be the same label vector passed to `train`; entries
/// `> 0` are positives. An ensemble with zero learners never satisfies the
/// rate check (all outputs are zero, so no positive clears the threshold
/// unless the threshold is negative).
pub fn rate_targets<'a, L>(
    true_values: &'a [f32],
    targets: RateTargets,
) -> impl FnMut(&[L], &[f32]) -> bool + 'a {
    move |learners, outputs| {
        if learners.len() >= targets.max_rounds {
            return true;
        }

        let mut positives = 0usize;
        let mut negatives = 0usize;
        let mut true_positives = 0usize;
        let mut false_positives = 0usize;

        for (&label, &output) in true_values.iter().zip(outputs.iter()) {
            let accepted = output > targets.decision_threshold;
            if label > 0.0 {
                positives += 1;
                if accepted {
                    true_positives += 1;
                }
            } else {
                negatives += 1;
                if accepted {
                    false_positives += 1;
                }
            }
        }

        if positives == 0 || negatives == 0 {
            return true;
        }

        let tpr = true_positives as f32 / positives as f32;
        let fpr = false_positives as f32 / negatives as f32;
        tpr >= targets.min_true_positive_rate && fpr <= targets.max_false_positive_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_rounds_counts_existing_learners() {
        let mut stop = max_rounds::<u32>(2);
        assert!(!stop(&[], &[]));
        assert!(!stop(&[7], &[]));
        assert!(stop(&[7, 8], &[]));
        assert!(stop(&[7, 8, 9], &[]));
    }

    #[test]
    fn rate_targets_requires_both_rates() {
        let labels = [1.0, 1.0, -1.0, -1.0];
        let targets = RateTargets {
            min_true_positive_rate: 1.0,
            max_false_positive_rate: 0.5,
            decision_threshold: 0.0,
            max_rounds: 100,
        };
        let mut stop = rate_targets::<u32>(&labels, targets);

        // Zero learners, zero outputs: nothing clears the threshold.
        assert!(!stop(&[], &[0.0; 4]));
        // Both positives detected, one negative leaks: fpr 0.5 is allowed.
        assert!(stop(&[1], &[0.4, 0.2, 0.1, -0.3]));
        // One positive missed.
        assert!(!stop(&[1], &[0.4, -0.2, -0.1, -0.3]));
        // Both negatives leak.
        assert!(!stop(&[1], &[0.4, 0.2, 0.1, 0.3]));
    }

    #[test]
    fn rate_targets_honors_round_cap() {
        let labels = [1.0, -1.0];
        let targets = RateTargets {
            max_rounds: 3,
            ..RateTargets::default()
        };
        let mut stop = rate_targets::<u32>(&labels, targets);
        assert!(!stop(&[1, 2], &[0.0, 0.0]));
        assert!(stop(&[1, 2, 3], &[0.0, 0.0]));
    }
}
