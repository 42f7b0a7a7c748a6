//! Composite score area: a weighted grouping of scores and nested areas.

use crate::builders::AreaBuilder;
use crate::core::weights::{check_weights, weighted_score};
use crate::core::ScoreNode;
use crate::errors::Result;
use crate::formatting::{colorize, indent, percent, title_case, BandFormatter, PlainFormatter};
use crate::validation::{ensure_weight, FieldPath};

/// Score area representation unit.
///
/// Groups child scores or areas by level or category. The weights of the
/// children must add up to 1; this holds at construction and after every
/// `set_items`, recursively through nested areas, using the weight tolerance
/// the area was built with.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreArea {
    name: String,
    weight: f64,
    items: Vec<ScoreNode>,
    tolerance: f64,
}

impl ScoreArea {
    /// Create a validated area.
    ///
    /// ```
    /// use scoretree::{Score, ScoreArea};
    ///
    /// let area = ScoreArea::new("Track", 1.0, vec![
    ///     Score::new("Best", 0.5, (0.0, 1.0), 1.0, false)?.into(),
    ///     Score::new("Worst", 0.5, (0.0, 1.0), 0.0, false)?.into(),
    /// ])?;
    /// assert_eq!(area.score(), 0.5);
    /// # Ok::<(), scoretree::ScoreTreeError>(())
    /// ```
    pub fn new(name: impl Into<String>, weight: f64, items: Vec<ScoreNode>) -> Result<Self> {
        AreaBuilder::new(name).weight(weight).items(items).build()
    }

    pub fn builder(name: impl Into<String>) -> AreaBuilder {
        AreaBuilder::new(name)
    }

    /// Assemble an area from a weight and items that were already validated.
    pub(crate) fn from_parts(
        name: String,
        weight: f64,
        items: Vec<ScoreNode>,
        tolerance: f64,
    ) -> Self {
        Self {
            name,
            weight,
            items,
            tolerance,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn items(&self) -> &[ScoreNode] {
        &self.items
    }

    /// Tolerance applied to the children's weight sum by `set_items`.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_weight(&mut self, weight: f64) -> Result<()> {
        let field = FieldPath::new(self.summary()).push("weight");
        self.weight = ensure_weight(&field, weight)?;
        Ok(())
    }

    /// Replace the children after checking the weight sums of the new items
    /// and of every area nested in them.
    pub fn set_items(&mut self, items: Vec<ScoreNode>) -> Result<()> {
        check_weights(&items, &FieldPath::new(&self.name), self.tolerance)?;
        self.items = items;
        Ok(())
    }

    /// Weighted score: Σ child.score × child.weight.
    pub fn score(&self) -> f64 {
        weighted_score(&self.items)
    }

    /// Uncolored header line, e.g. `Dynamics (60.00%): 82.82%`.
    pub fn line(&self) -> String {
        format!(
            "{} ({}): {}",
            title_case(&self.name),
            percent(self.weight),
            percent(self.score())
        )
    }

    /// Render the header at `depth` followed by every child at `depth + 1`.
    pub fn render(&self, depth: usize, formatter: &dyn BandFormatter) -> String {
        let header = format!("{}{}", indent(depth), self.line());

        std::iter::once(colorize(&header, self.score(), formatter))
            .chain(self.items.iter().map(|item| item.render(depth + 1, formatter)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Short form, e.g. `ScoreArea(Dynamics)`.
    pub fn summary(&self) -> String {
        format!("ScoreArea({})", self.name)
    }
}

impl std::fmt::Display for ScoreArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(0, &PlainFormatter))
    }
}
