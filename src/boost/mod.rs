//! Additive boosting of weak regressors.
//!
//! [`GentleBoost`] combines many weak learners into one strong model by
//! reweighting samples each round so that later learners concentrate on the
//! samples earlier learners got wrong. The trainer is generic over the
//! learner type; it only ever touches learners through the capabilities the
//! caller supplies ([`GentleBoost::train`]).

pub mod termination;
pub mod trainer;

pub use termination::{max_rounds, rate_targets, RateTargets};
pub use trainer::{GentleBoost, TrainError};
