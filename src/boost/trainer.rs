//! GentleBoost training loop.
//!
//! Implements the GentleBoost variant of additive boosting: each round
//! reweights every sample with a class-normalized exponential of its
//! accumulated output, trains one new weak learner against those weights,
//! and adds the learner's per-sample predictions to the running outputs.
//! The ensemble is append-only; a learner is never revised or reordered
//! once trained.

use std::fmt;

/// Errors that can abort a training call.
#[derive(Debug)]
pub enum TrainError<E> {
    /// The label vector does not contain at least one positive (`> 0`) and
    /// one non-positive sample. The per-class weight normalization divides
    /// by both class counts, so training cannot start.
    ClassMissing { positives: usize, negatives: usize },
    /// The learner factory failed. Learners appended in earlier rounds are
    /// kept; there is no rollback.
    Capability(E),
}

impl<E: fmt::Display> fmt::Display for TrainError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::ClassMissing {
                positives,
                negatives,
            } => write!(
                f,
                "Training set must contain both classes: {positives} positive, {negatives} negative samples",
            ),
            TrainError::Capability(err) => write!(f, "Learner factory failed: {err}"),
        }
    }
}

impl<E: fmt::Display + fmt::Debug> std::error::Error for TrainError<E> {}

/// Boosted ensemble of weak learners of type `L`.
///
/// The trainer knows nothing about `L` beyond what the capabilities passed
/// to [`train`](Self::train) and [`output`](Self::output) expose. Outside
/// callers get a borrowed, read-only view of the learners.
#[derive(Debug, Clone)]
pub struct GentleBoost<L> {
    learners: Vec<L>,
}

impl<L> Default for GentleBoost<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> GentleBoost<L> {
    /// Create an empty ensemble.
    pub fn new() -> Self {
        Self::from_learners(Vec::new())
    }

    /// Create an ensemble from already-trained learners, in training order.
    ///
    /// This is the resume path: a model reconstructed from storage can keep
    /// training or serve predictions without repeating earlier rounds.
    pub fn from_learners(learners: Vec<L>) -> Self {
        Self { learners }
    }

    /// Trained learners in training order (first trained applies first).
    pub fn learners(&self) -> &[L] {
        &self.learners
    }

    /// Number of trained learners.
    pub fn len(&self) -> usize {
        self.learners.len()
    }

    /// Whether the ensemble holds no learners yet.
    pub fn is_empty(&self) -> bool {
        self.learners.is_empty()
    }

    /// Regression / classification output for one input.
    ///
    /// `classify` maps one learner to its scalar contribution for the input
    /// the caller has in hand; the ensemble output is the sum over all
    /// learners. An empty ensemble yields `0.0`.
    pub fn output(&self, mut classify: impl FnMut(&L) -> f32) -> f32 {
        self.learners.iter().map(|learner| classify(learner)).sum()
    }

    /// Run boosting rounds until the termination predicate says stop.
    ///
    /// `true_values` holds one signed label per sample; entries `> 0` are
    /// the positive class, everything else the negative class. Its length
    /// defines the sample count for the whole call.
    ///
    /// Per round:
    /// 1. each sample's raw weight is `exp(-output) / n_positives` for
    ///    positives and `exp(+output) / n_negatives` otherwise,
    /// 2. weights are normalized to sum to 1,
    /// 3. `create_learner` turns the weight vector into one trained learner,
    ///    which is appended immediately,
    /// 4. `classify(learner, i)` is added to the accumulated output of every
    ///    sample `i`.
    ///
    /// `should_stop` observes the ensemble so far and the accumulated
    /// outputs, and is consulted exactly once per round, before the round
    /// runs — returning `true` on the first call is a legal zero-round
    /// training. The outputs accumulator is local to this call and starts
    /// at zero even when resuming from pre-trained learners.
    ///
    /// Returns the number of completed rounds.
    pub fn train<E>(
        &mut self,
        true_values: &[f32],
        mut create_learner: impl FnMut(&[f32]) -> Result<L, E>,
        mut classify: impl FnMut(&L, usize) -> f32,
        mut should_stop: impl FnMut(&[L], &[f32]) -> bool,
    ) -> Result<usize, TrainError<E>> {
        let n_samples = true_values.len();
        let n_positives = true_values.iter().filter(|&&v| v > 0.0).count();
        let n_negatives = n_samples - n_positives;

        if n_positives == 0 || n_negatives == 0 {
            return Err(TrainError::ClassMissing {
                positives: n_positives,
                negatives: n_negatives,
            });
        }

        let mut outputs = vec![0.0f32; n_samples];
        let mut weights = vec![0.0f32; n_samples];
        let mut rounds = 0usize;

        while !should_stop(&self.learners, &outputs) {
            let mut weight_sum = 0.0f32;
            for i in 0..n_samples {
                // exp in f64, cast before the class-count division
                weights[i] = if true_values[i] > 0.0 {
                    (f64::from(-outputs[i]).exp() as f32) / n_positives as f32
                } else {
                    (f64::from(outputs[i]).exp() as f32) / n_negatives as f32
                };
                weight_sum += weights[i];
            }

            for weight in &mut weights {
                *weight /= weight_sum;
            }

            let trained = create_learner(&weights).map_err(TrainError::Capability)?;
            self.learners.push(trained);
            let newest = &self.learners[self.learners.len() - 1];

            for (i, output) in outputs.iter_mut().enumerate() {
                *output += classify(newest, i);
            }

            rounds += 1;
            tracing::debug!(
                round = rounds,
                ensemble_size = self.learners.len(),
                weight_sum,
                "boosting round complete"
            );
        }

        Ok(rounds)
    }
}
