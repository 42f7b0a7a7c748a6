//! Weighted multi-level score trees.
//!
//! Raw measurements are normalized within a value range into leaf
//! [`Score`]s, grouped into weighted [`ScoreArea`]s and finally into a
//! [`ScoreTree`] whose weighted score and indented, severity-colored text
//! rendering summarize the whole hierarchy.
//!
//! ```
//! use scoretree::{Score, ScoreArea, ScoreTree};
//!
//! let tree = ScoreTree::new(vec![
//!     ScoreArea::new("Track 1", 1.0, vec![
//!         Score::new("Top speed (m/s)", 0.5, (0.0, 100.0), 88.2, false)?.into(),
//!         Score::new("Elapsed time (s)", 0.5, (20.0, 60.0), 31.2, true)?.into(),
//!     ])?.into(),
//! ], false)?;
//!
//! assert!((tree.score() - 0.801).abs() < 1e-12);
//! println!("{}", tree);
//! # Ok::<(), scoretree::ScoreTreeError>(())
//! ```

// Export modules for library usage
pub mod builders;
pub mod config;
pub mod core;
pub mod definition;
pub mod errors;
pub mod formatting;
pub mod validation;

// Re-export commonly used types
pub use crate::core::{normalize, Score, ScoreArea, ScoreNode, ScoreTree};

pub use crate::core::weights::DEFAULT_WEIGHT_TOLERANCE;

pub use crate::builders::{AreaBuilder, NodeBuilder, ScoreBuilder, ScoreTreeBuilder};

pub use crate::config::{load_config, ScoreTreeConfig};

pub use crate::errors::{ErrorKind, Result, ScoreTreeError};

pub use crate::formatting::{
    colorize, indent, Band, BandFormatter, ColorMode, ColoredFormatter, FormattingConfig,
    PlainFormatter,
};
