//! Cascaded stage-classifier data model.
//!
//! A [`Detector`] is a [`NormalizedRegion`] plus a [`Cascade`] of stages;
//! each [`Stage`] pairs one boosted ensemble with the decision threshold
//! that gates admission to the next stage. Evaluating the cascade against
//! an image is the detector runtime's job, not this crate's; the model here
//! exists to be trained into and serialized out of.

pub mod tree;

pub use tree::{RegressionTreeData, TreeLearner, TreeShapeError};

use serde::{Deserialize, Serialize};

use crate::boost::GentleBoost;

/// Window placement descriptor: where a detection window sits relative to
/// its anchor, in units of the window size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRegion {
    pub row_offset: f32,
    pub col_offset: f32,
    pub row_scale: f32,
    pub col_scale: f32,
}

impl NormalizedRegion {
    pub const fn new(row_offset: f32, col_offset: f32, row_scale: f32, col_scale: f32) -> Self {
        Self {
            row_offset,
            col_offset,
            row_scale,
            col_scale,
        }
    }
}

impl Default for NormalizedRegion {
    /// The identity placement: no offset, unit scale.
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// One cascade stage: a boosted ensemble and its decision threshold.
#[derive(Debug, Clone)]
pub struct Stage<L> {
    classifier: GentleBoost<L>,
    threshold: f32,
}

impl<L> Stage<L> {
    pub fn new(classifier: GentleBoost<L>, threshold: f32) -> Self {
        Self {
            classifier,
            threshold,
        }
    }

    pub fn classifier(&self) -> &GentleBoost<L> {
        &self.classifier
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

/// Ordered sequence of stages, evaluated first to last by the detector
/// runtime.
#[derive(Debug, Clone, Default)]
pub struct Cascade<L> {
    stages: Vec<Stage<L>>,
}

impl<L> Cascade<L> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a trained stage. Stage order is evaluation order.
    pub fn push_stage(&mut self, classifier: GentleBoost<L>, threshold: f32) {
        self.stages.push(Stage::new(classifier, threshold));
    }

    pub fn stages(&self) -> &[Stage<L>] {
        &self.stages
    }

    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// A complete detector model: window placement plus the stage cascade.
#[derive(Debug, Clone)]
pub struct Detector<L> {
    region: NormalizedRegion,
    cascade: Cascade<L>,
}

impl<L> Detector<L> {
    pub fn new(region: NormalizedRegion, cascade: Cascade<L>) -> Self {
        Self { region, cascade }
    }

    pub fn region(&self) -> &NormalizedRegion {
        &self.region
    }

    pub fn cascade(&self) -> &Cascade<L> {
        &self.cascade
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_preserves_stage_order() {
        let mut cascade = Cascade::new();
        cascade.push_stage(
            GentleBoost::from_learners(vec![RegressionTreeData::constant(0.1)]),
            0.25,
        );
        cascade.push_stage(
            GentleBoost::from_learners(vec![
                RegressionTreeData::constant(0.2),
                RegressionTreeData::constant(0.3),
            ]),
            -0.5,
        );

        assert_eq!(cascade.num_stages(), 2);
        assert_eq!(cascade.stages()[0].classifier().len(), 1);
        assert_eq!(cascade.stages()[0].threshold(), 0.25);
        assert_eq!(cascade.stages()[1].classifier().len(), 2);
        assert_eq!(cascade.stages()[1].threshold(), -0.5);
    }

    #[test]
    fn default_region_is_identity() {
        let region = NormalizedRegion::default();
        assert_eq!(region, NormalizedRegion::new(0.0, 0.0, 1.0, 1.0));
    }
}
