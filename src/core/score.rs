//! Leaf score: a single weighted, range-normalized metric.

use crate::builders::ScoreBuilder;
use crate::errors::Result;
use crate::formatting::{colorize, indent, percent, title_case, BandFormatter, PlainFormatter};
use crate::validation::{ensure_finite, ensure_range, ensure_weight, FieldPath};

/// Normalize a raw value within `range` to [0, 1].
///
/// Values above the range saturate at 1 (0 when inverted). Values below the
/// range give a negative raw ratio whose magnitude is taken, so they mirror
/// back upwards before the final clamp to [0, 1]. The span must be non-zero;
/// [`Score`] guarantees it.
///
/// ```
/// use scoretree::normalize;
///
/// assert_eq!(normalize(50.0, (0.0, 100.0), false), 0.5);
/// assert_eq!(normalize(20.0, (20.0, 60.0), true), 1.0);
/// assert_eq!(normalize(250.0, (0.0, 100.0), false), 1.0);
/// ```
pub fn normalize(value: f64, range: (f64, f64), inverse: bool) -> f64 {
    let (min, max) = range;
    let span = max - min;
    let raw = (value - min).min(span) / span;
    let flip = if inverse { 1.0 } else { 0.0 };

    (flip - raw).abs().clamp(0.0, 1.0)
}

/// Minimal score representation unit.
///
/// Holds a raw `value` measured within `range`, plus the `weight` the score
/// carries among its siblings. With `inverse` set, lower values are better:
/// a value at the range minimum scores 1 and one at the maximum scores 0.
///
/// The normalized score is computed on every read and never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    name: String,
    weight: f64,
    range: (f64, f64),
    value: f64,
    inverse: bool,
}

impl Score {
    /// Create a validated score.
    ///
    /// ```
    /// use scoretree::Score;
    ///
    /// let speed = Score::new("Speed", 0.5, (0.0, 100.0), 50.0, false)?;
    /// assert_eq!(speed.score(), 0.5);
    /// assert_eq!(speed.to_string(), "Speed (50.00%): 50.00%");
    /// # Ok::<(), scoretree::ScoreTreeError>(())
    /// ```
    pub fn new(
        name: impl Into<String>,
        weight: f64,
        range: (f64, f64),
        value: f64,
        inverse: bool,
    ) -> Result<Self> {
        ScoreBuilder::new(name)
            .weight(weight)
            .range(range.0, range.1)
            .value(value)
            .inverse(inverse)
            .build()
    }

    pub fn builder(name: impl Into<String>) -> ScoreBuilder {
        ScoreBuilder::new(name)
    }

    /// Assemble a score from fields that were already validated.
    pub(crate) fn from_parts(
        name: String,
        weight: f64,
        range: (f64, f64),
        value: f64,
        inverse: bool,
    ) -> Self {
        Self {
            name,
            weight,
            range,
            value,
            inverse,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn inverse(&self) -> bool {
        self.inverse
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_weight(&mut self, weight: f64) -> Result<()> {
        self.weight = ensure_weight(&self.field("weight"), weight)?;
        Ok(())
    }

    /// Replace the range. A zero-span range is rejected with a domain error.
    pub fn set_range(&mut self, range: (f64, f64)) -> Result<()> {
        self.range = ensure_range(&self.field("range"), range)?;
        Ok(())
    }

    pub fn set_value(&mut self, value: f64) -> Result<()> {
        self.value = ensure_finite(&self.field("value"), value)?;
        Ok(())
    }

    pub fn set_inverse(&mut self, inverse: bool) {
        self.inverse = inverse;
    }

    /// Normalized score in [0, 1].
    pub fn score(&self) -> f64 {
        normalize(self.value, self.range, self.inverse)
    }

    /// Uncolored display line, e.g. `Speed (50.00%): 50.00%`.
    pub fn line(&self) -> String {
        format!(
            "{} ({}): {}",
            title_case(&self.name),
            percent(self.weight),
            percent(self.score())
        )
    }

    /// Render the line at `depth`, dimmed and banded by the score itself.
    pub fn render(&self, depth: usize, formatter: &dyn BandFormatter) -> String {
        let text = format!("{}{}", indent(depth), self.line());
        colorize(&formatter.dim(&text), self.score(), formatter)
    }

    /// Short form, e.g. `Score(Speed)`.
    pub fn summary(&self) -> String {
        format!("Score({})", self.name)
    }

    fn field(&self, field: &str) -> FieldPath {
        FieldPath::new(format!("Score({})", self.name)).push(field)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(0, &PlainFormatter))
    }
}
