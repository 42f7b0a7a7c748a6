//! Score tree data model.
//!
//! A tree is built from two node kinds: leaf [`Score`]s and composite
//! [`ScoreArea`]s. Both expose the same `weight`/`score` capability through
//! the closed [`ScoreNode`] sum type. Scores fold bottom-up (every composite
//! is the weighted sum of its children) and rendering runs top-down.

pub mod area;
pub mod score;
pub mod tree;
pub mod weights;

pub use area::ScoreArea;
pub use score::{normalize, Score};
pub use tree::ScoreTree;

use crate::formatting::BandFormatter;

/// A child of an area or a top-level item of a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreNode {
    Score(Score),
    Area(ScoreArea),
}

impl ScoreNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Score(score) => score.name(),
            Self::Area(area) => area.name(),
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Self::Score(score) => score.weight(),
            Self::Area(area) => area.weight(),
        }
    }

    /// Normalized score of a leaf, or the weighted aggregate of an area.
    pub fn score(&self) -> f64 {
        match self {
            Self::Score(score) => score.score(),
            Self::Area(area) => area.score(),
        }
    }

    pub fn render(&self, depth: usize, formatter: &dyn BandFormatter) -> String {
        match self {
            Self::Score(score) => score.render(depth, formatter),
            Self::Area(area) => area.render(depth, formatter),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Self::Score(score) => score.summary(),
            Self::Area(area) => area.summary(),
        }
    }

    pub fn as_score(&self) -> Option<&Score> {
        match self {
            Self::Score(score) => Some(score),
            Self::Area(_) => None,
        }
    }

    pub fn as_area(&self) -> Option<&ScoreArea> {
        match self {
            Self::Area(area) => Some(area),
            Self::Score(_) => None,
        }
    }

    pub fn is_area(&self) -> bool {
        matches!(self, Self::Area(_))
    }
}

impl From<Score> for ScoreNode {
    fn from(score: Score) -> Self {
        Self::Score(score)
    }
}

impl From<ScoreArea> for ScoreNode {
    fn from(area: ScoreArea) -> Self {
        Self::Area(area)
    }
}

impl std::fmt::Display for ScoreNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score(score) => std::fmt::Display::fmt(score, f),
            Self::Area(area) => std::fmt::Display::fmt(area, f),
        }
    }
}
