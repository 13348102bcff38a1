//! Serializer-facing view of a weak learner.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the serializer needs to know about a weak learner: a regression
/// tree flattened into its depth, one packed test code per internal node,
/// and one output value per leaf.
///
/// The boosting core itself never requires this; it only matters for models
/// that are going to be persisted in the cascade layout.
pub trait TreeLearner {
    /// Tree depth, excluding the leaf level.
    fn depth(&self) -> i32;
    /// Packed binary-test codes of the internal nodes, in level order.
    fn internal_codes(&self) -> &[i32];
    /// Regression outputs of the leaves, in level order.
    fn leaf_values(&self) -> &[f32];
}

/// The tree payload arrays are inconsistent with the declared depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeShapeError {
    pub depth: i32,
    pub internal_codes: usize,
    pub leaf_values: usize,
}

impl fmt::Display for TreeShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tree of depth {} must carry {} internal codes and {} leaf values, got {} and {}",
            self.depth,
            self.depth - 1,
            self.depth,
            self.internal_codes,
            self.leaf_values,
        )
    }
}

impl std::error::Error for TreeShapeError {}

/// Flattened regression-tree payload, the concrete learner type used when a
/// cascade is reconstructed from its serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTreeData {
    depth: i32,
    internal_codes: Vec<i32>,
    leaf_values: Vec<f32>,
}

impl RegressionTreeData {
    /// Build a payload, checking the framing contract: a tree of depth `d`
    /// (leaf level excluded) carries `d - 1` internal codes and `d` leaf
    /// values.
    pub fn new(
        depth: i32,
        internal_codes: Vec<i32>,
        leaf_values: Vec<f32>,
    ) -> Result<Self, TreeShapeError> {
        let codes_ok = depth >= 1 && internal_codes.len() == (depth - 1) as usize;
        let leaves_ok = depth >= 1 && leaf_values.len() == depth as usize;
        if !codes_ok || !leaves_ok {
            return Err(TreeShapeError {
                depth,
                internal_codes: internal_codes.len(),
                leaf_values: leaf_values.len(),
            });
        }
        Ok(Self {
            depth,
            internal_codes,
            leaf_values,
        })
    }

    /// A depth-1 tree: no splits, one constant output.
    pub fn constant(value: f32) -> Self {
        Self {
            depth: 1,
            internal_codes: Vec::new(),
            leaf_values: vec![value],
        }
    }
}

impl TreeLearner for RegressionTreeData {
    fn depth(&self) -> i32 {
        self.depth
    }

    fn internal_codes(&self) -> &[i32] {
        &self.internal_codes
    }

    fn leaf_values(&self) -> &[f32] {
        &self.leaf_values
    }
}
