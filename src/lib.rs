//! # gentleboost
//!
//! Generic GentleBoost ensemble training and serialization of cascaded
//! stage classifiers into the Pico hex-array format.
//!
//! The trainer is agnostic to what a weak learner is: it drives the
//! boosting loop through three caller-supplied capabilities (a factory
//! that trains one learner from sample weights, an evaluator that scores a
//! learner on a sample, and a termination predicate). Trained stages are
//! assembled into a [`Cascade`] and written out as an embeddable C-style
//! byte array.
//!
//! ## Quick Start
//!
//! ```rust
//! use gentleboost::{termination, GentleBoost};
//!
//! let labels = [1.0_f32, 1.0, -1.0, -1.0];
//!
//! // A weak learner can be anything; here a constant predictor.
//! let mut booster: GentleBoost<f32> = GentleBoost::new();
//! booster
//!     .train(
//!         &labels,
//!         |_weights| Ok::<_, std::convert::Infallible>(0.25_f32),
//!         |learner, _sample| *learner,
//!         termination::max_rounds(3),
//!     )
//!     .unwrap();
//!
//! assert_eq!(booster.len(), 3);
//! let score = booster.output(|learner| *learner);
//! assert!((score - 0.75).abs() < 1e-6);
//! ```
//!
//! ## Core Modules
//!
//! - [`boost`] - GentleBoost trainer and stock termination predicates
//! - [`cascade`] - detector model: region, stages, tree payloads
//! - [`serialize`] - packed binary layout and hex-array rendering
//! - [`config`] - training configuration via TOML
//! - [`logging`] - JSON line-delimited training logs

pub mod boost;
pub mod cascade;
pub mod config;
pub mod logging;
pub mod serialize;

pub use boost::termination::{self, max_rounds, rate_targets, RateTargets};
pub use boost::{GentleBoost, TrainError};
pub use cascade::{
    Cascade, Detector, NormalizedRegion, RegressionTreeData, Stage, TreeLearner, TreeShapeError,
};
pub use config::{ConfigError, TrainConfig};
pub use serialize::{decode_binary, encode_binary, render_hex, to_hex_file, SerializeError};
