//! Score tree: the root container of weighted scores and areas.

use crate::builders::ScoreTreeBuilder;
use crate::config::ScoreTreeConfig;
use crate::core::weights::{check_weights, ensure_tolerance, weighted_score};
use crate::core::ScoreNode;
use crate::errors::Result;
use crate::formatting::{colorize, BandFormatter, ColoredFormatter, PlainFormatter};
use crate::validation::FieldPath;
use tracing::debug;

/// Score tree generation class.
///
/// Owns an ordered list of top-level scores and areas whose weights add up
/// to 1, recursively enforced at every nesting level. Colorization is a
/// per-tree setting passed down to every node during a render; there is no
/// process-wide state.
///
/// A tree is not meant for concurrent mutation. Concurrent `score` reads are
/// safe since nothing is cached.
///
/// ```
/// use scoretree::{Score, ScoreTree};
///
/// let tree = ScoreTree::new(vec![
///     Score::new("Top speed (m/s)", 0.5, (0.0, 100.0), 48.12, false)?.into(),
///     Score::new("Elapsed time (s)", 0.5, (20.0, 60.0), 31.2, true)?.into(),
/// ], false)?;
///
/// assert_eq!(tree.to_string(), "Top Speed (M/S) (50.00%): 48.12%\nElapsed Time (S) (50.00%): 72.00%");
/// # Ok::<(), scoretree::ScoreTreeError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTree {
    items: Vec<ScoreNode>,
    colorized: bool,
    tolerance: f64,
}

impl ScoreTree {
    pub fn new(items: Vec<ScoreNode>, colorized: bool) -> Result<Self> {
        ScoreTreeBuilder::new()
            .items(items)
            .colorized(colorized)
            .build()
    }

    /// Create a tree taking colorization and weight tolerance from `config`.
    pub fn with_config(items: Vec<ScoreNode>, config: &ScoreTreeConfig) -> Result<Self> {
        ScoreTreeBuilder::new().config(config).items(items).build()
    }

    pub fn builder() -> ScoreTreeBuilder {
        ScoreTreeBuilder::new()
    }

    /// Assemble a tree from items that were already validated.
    pub(crate) fn from_parts(items: Vec<ScoreNode>, colorized: bool, tolerance: f64) -> Self {
        debug!(items = items.len(), colorized, tolerance, "Score tree validated");
        Self {
            items,
            colorized,
            tolerance,
        }
    }

    pub fn items(&self) -> &[ScoreNode] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the top-level items; the whole hierarchy is validated first.
    pub fn set_items(&mut self, items: Vec<ScoreNode>) -> Result<()> {
        check_weights(&items, &FieldPath::root(), self.tolerance)?;
        debug!(items = items.len(), "Score tree items replaced");
        self.items = items;
        Ok(())
    }

    pub fn colorized(&self) -> bool {
        self.colorized
    }

    pub fn set_colorized(&mut self, colorized: bool) {
        self.colorized = colorized;
    }

    /// Absolute tolerance used when comparing weight sums against 1.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Change the tolerance. The current items are re-checked against it
    /// and nothing changes when they fail.
    pub fn set_tolerance(&mut self, tolerance: f64) -> Result<()> {
        let tolerance = ensure_tolerance(tolerance)?;
        check_weights(&self.items, &FieldPath::root(), tolerance)?;
        self.tolerance = tolerance;
        Ok(())
    }

    /// Weighted score of the whole tree, in [0, 1].
    pub fn score(&self) -> f64 {
        weighted_score(&self.items)
    }

    /// Render with the tree's own colorization setting.
    pub fn render(&self) -> String {
        if self.colorized {
            self.render_with(&ColoredFormatter::always())
        } else {
            self.render_with(&PlainFormatter)
        }
    }

    /// Render every top-level item at depth 0, each block banded by the
    /// item's own score, blocks separated by newlines.
    pub fn render_with(&self, formatter: &dyn BandFormatter) -> String {
        self.items
            .iter()
            .map(|item| colorize(&item.render(0, formatter), item.score(), formatter))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Short form, e.g. `<ScoreTree with 2 items>`.
    pub fn summary(&self) -> String {
        format!("<ScoreTree with {} items>", self.items.len())
    }
}

impl std::fmt::Display for ScoreTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}
