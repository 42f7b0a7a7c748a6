//! Validating builders for scores, areas and trees.
//!
//! Constructors fail on the first problem they meet. The builders instead
//! walk the whole subtree and collect ALL violations (field values, zero-span
//! ranges, weight sums at every level) before reporting, so a hand-written
//! tree with several mistakes can be fixed in one pass.
//!
//! # Example
//!
//! ```rust
//! use scoretree::builders::{AreaBuilder, ScoreBuilder, ScoreTreeBuilder};
//! use scoretree::ScoreTreeError;
//!
//! let result = ScoreTreeBuilder::new()
//!     .item(
//!         AreaBuilder::new("Dynamics")
//!             .weight(1.0)
//!             .item(ScoreBuilder::new("Top speed").weight(0.5).range(0.0, 0.0))
//!             .item(ScoreBuilder::new("Elapsed time").weight(0.4).range(20.0, 60.0)),
//!     )
//!     .build();
//!
//! match result {
//!     Err(ScoreTreeError::Invalid { errors }) => assert_eq!(errors.len(), 2),
//!     other => panic!("expected two violations, got {:?}", other),
//! }
//! ```

use crate::config::ScoreTreeConfig;
use crate::core::weights::{
    ensure_tolerance, is_complete, weight_violations, DEFAULT_WEIGHT_TOLERANCE,
};
use crate::core::{Score, ScoreArea, ScoreNode, ScoreTree};
use crate::errors::{Result, ScoreTreeError};
use crate::validation::{
    collect, ensure_finite, ensure_range, ensure_weight, finish_validation, into_result,
    FieldPath, TreeValidation,
};
use tracing::debug;

/// Builder for a leaf [`Score`].
///
/// `weight` and `range` are required; `value` defaults to 0 and `inverse`
/// to false.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBuilder {
    name: String,
    weight: Option<f64>,
    range: Option<(f64, f64)>,
    value: f64,
    inverse: bool,
}

impl ScoreBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: None,
            range: None,
            value: 0.0,
            inverse: false,
        }
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    pub fn validate(self) -> TreeValidation<Score> {
        let mut errors = Vec::new();
        let score = self.collect(&mut errors);
        settle(score, errors)
    }

    pub fn build(self) -> Result<Score> {
        into_result(self.validate())
    }

    fn declared_weight(&self) -> Option<f64> {
        self.weight.filter(|weight| weight.is_finite())
    }

    fn collect(self, errors: &mut Vec<ScoreTreeError>) -> Option<Score> {
        let field = FieldPath::new(format!("Score({})", self.name));

        let weight = match self.weight {
            Some(weight) => collect(ensure_weight(&field.push("weight"), weight), errors),
            None => {
                errors.push(missing(&field.push("weight"), "number"));
                None
            }
        };
        let range = match self.range {
            Some(range) => collect(ensure_range(&field.push("range"), range), errors),
            None => {
                errors.push(missing(&field.push("range"), "(min, max)"));
                None
            }
        };
        let value = collect(ensure_finite(&field.push("value"), self.value), errors);

        let (Some(weight), Some(range), Some(value)) = (weight, range, value) else {
            return None;
        };
        Some(Score::from_parts(self.name, weight, range, value, self.inverse))
    }
}

/// Builder for a composite [`ScoreArea`].
#[derive(Debug, Clone, PartialEq)]
pub struct AreaBuilder {
    name: String,
    weight: Option<f64>,
    items: Vec<NodeBuilder>,
    tolerance: f64,
}

impl AreaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: None,
            items: Vec::new(),
            tolerance: DEFAULT_WEIGHT_TOLERANCE,
        }
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn item(mut self, item: impl Into<NodeBuilder>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn items<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<NodeBuilder>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    /// Tolerance for the weight sums of this subtree. The built area keeps it
    /// for later `set_items` calls. Inside a tree the tree's tolerance wins.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn validate(self) -> TreeValidation<ScoreArea> {
        let mut errors = Vec::new();
        let tolerance = collect(ensure_tolerance(self.tolerance), &mut errors)
            .unwrap_or(DEFAULT_WEIGHT_TOLERANCE);
        let area = self.collect(&FieldPath::root(), tolerance, &mut errors);
        settle(area, errors)
    }

    pub fn build(self) -> Result<ScoreArea> {
        into_result(self.validate())
    }

    fn declared_weight(&self) -> Option<f64> {
        self.weight.filter(|weight| weight.is_finite())
    }

    fn collect(
        self,
        parent: &FieldPath,
        tolerance: f64,
        errors: &mut Vec<ScoreTreeError>,
    ) -> Option<ScoreArea> {
        let field = FieldPath::new(format!("ScoreArea({})", self.name)).push("weight");
        let weight = match self.weight {
            Some(weight) => collect(ensure_weight(&field, weight), errors),
            None => {
                errors.push(missing(&field, "number"));
                None
            }
        };

        let owner = parent.push(self.name.as_str());
        let items = collect_items(self.items, &owner, tolerance, errors);

        Some(ScoreArea::from_parts(self.name, weight?, items?, tolerance))
    }
}

/// A child handed to an [`AreaBuilder`] or [`ScoreTreeBuilder`]: either a
/// node that already exists or a builder still to be validated.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBuilder {
    Node(ScoreNode),
    Score(ScoreBuilder),
    Area(AreaBuilder),
}

impl NodeBuilder {
    fn declared_weight(&self) -> Option<f64> {
        match self {
            Self::Node(node) => Some(node.weight()),
            Self::Score(score) => score.declared_weight(),
            Self::Area(area) => area.declared_weight(),
        }
    }

    fn collect(
        self,
        parent: &FieldPath,
        tolerance: f64,
        errors: &mut Vec<ScoreTreeError>,
    ) -> Option<ScoreNode> {
        match self {
            Self::Node(node) => {
                // Existing areas were checked against their own tolerance
                if let ScoreNode::Area(area) = &node {
                    errors.extend(weight_violations(
                        area.items(),
                        &parent.push(area.name()),
                        tolerance,
                    ));
                }
                Some(node)
            }
            Self::Score(score) => score.collect(errors).map(ScoreNode::Score),
            Self::Area(area) => area.collect(parent, tolerance, errors).map(ScoreNode::Area),
        }
    }
}

impl From<ScoreNode> for NodeBuilder {
    fn from(node: ScoreNode) -> Self {
        Self::Node(node)
    }
}

impl From<Score> for NodeBuilder {
    fn from(score: Score) -> Self {
        Self::Node(ScoreNode::Score(score))
    }
}

impl From<ScoreArea> for NodeBuilder {
    fn from(area: ScoreArea) -> Self {
        Self::Node(ScoreNode::Area(area))
    }
}

impl From<ScoreBuilder> for NodeBuilder {
    fn from(builder: ScoreBuilder) -> Self {
        Self::Score(builder)
    }
}

impl From<AreaBuilder> for NodeBuilder {
    fn from(builder: AreaBuilder) -> Self {
        Self::Area(builder)
    }
}

/// Builder for a [`ScoreTree`].
///
/// Colorization defaults to on, the weight tolerance to
/// [`DEFAULT_WEIGHT_TOLERANCE`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTreeBuilder {
    items: Vec<NodeBuilder>,
    colorized: bool,
    tolerance: f64,
}

impl Default for ScoreTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreTreeBuilder {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            colorized: true,
            tolerance: DEFAULT_WEIGHT_TOLERANCE,
        }
    }

    pub fn item(mut self, item: impl Into<NodeBuilder>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn items<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<NodeBuilder>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn colorized(mut self, colorized: bool) -> Self {
        self.colorized = colorized;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Take colorization and weight tolerance from a configuration.
    pub fn config(self, config: &ScoreTreeConfig) -> Self {
        self.colorized(config.colorized())
            .tolerance(config.weight_tolerance)
    }

    pub fn validate(self) -> TreeValidation<ScoreTree> {
        let mut errors = Vec::new();
        let tolerance = collect(ensure_tolerance(self.tolerance), &mut errors);
        let items = collect_items(
            self.items,
            &FieldPath::root(),
            tolerance.unwrap_or(DEFAULT_WEIGHT_TOLERANCE),
            &mut errors,
        );

        let colorized = self.colorized;
        let tree = items
            .zip(tolerance)
            .map(|(items, tolerance)| ScoreTree::from_parts(items, colorized, tolerance));
        settle(tree, errors)
    }

    pub fn build(self) -> Result<ScoreTree> {
        into_result(self.validate())
    }
}

/// Build every child, then check that the declared weights add up to 1.
///
/// The sum is only checked when every child declares a usable weight; a
/// missing or non-finite weight is already reported on the child.
fn collect_items(
    items: Vec<NodeBuilder>,
    owner: &FieldPath,
    tolerance: f64,
    errors: &mut Vec<ScoreTreeError>,
) -> Option<Vec<ScoreNode>> {
    let declared: Option<Vec<f64>> = items.iter().map(NodeBuilder::declared_weight).collect();

    let built: Vec<Option<ScoreNode>> = items
        .into_iter()
        .map(|item| item.collect(owner, tolerance, errors))
        .collect();

    if let Some(weights) = declared {
        let total: f64 = weights.iter().sum();
        if !is_complete(total, tolerance) {
            debug!(owner = %owner, total, "Weight sum violation");
            errors.push(ScoreTreeError::weight_sum(owner, total));
        }
    }

    built.into_iter().collect()
}

fn missing(field: &FieldPath, expected: &str) -> ScoreTreeError {
    ScoreTreeError::value(field, "is required", expected, "nothing")
}

/// A built value is only present when no violation was collected.
fn settle<T>(built: Option<T>, errors: Vec<ScoreTreeError>) -> TreeValidation<T> {
    finish_validation(errors, || {
        built.ok_or_else(|| ScoreTreeError::Invalid { errors: Vec::new() })
    })
}
