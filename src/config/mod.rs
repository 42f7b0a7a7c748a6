//! Score tree configuration.
//!
//! Read from a `.scoretree.toml` file:
//!
//! ```toml
//! weight_tolerance = 1e-9
//!
//! [display]
//! color = "auto"   # auto | always | never
//! ```

mod loader;

pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path, parse_config,
    CONFIG_FILE_NAME,
};

use crate::core::weights::{ensure_tolerance, DEFAULT_WEIGHT_TOLERANCE};
use crate::errors::Result;
use crate::formatting::{ColorMode, FormattingConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTreeConfig {
    /// Absolute tolerance when comparing weight sums against 1.
    #[serde(default = "default_weight_tolerance")]
    pub weight_tolerance: f64,

    #[serde(default)]
    pub display: FormattingConfig,
}

impl Default for ScoreTreeConfig {
    fn default() -> Self {
        Self {
            weight_tolerance: default_weight_tolerance(),
            display: FormattingConfig::default(),
        }
    }
}

fn default_weight_tolerance() -> f64 {
    DEFAULT_WEIGHT_TOLERANCE
}

impl ScoreTreeConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_tolerance(self.weight_tolerance).map(|_| ())
    }

    /// Whether trees built from this configuration render with colors.
    pub fn colorized(&self) -> bool {
        self.display.color.should_use_color()
    }

    /// Let `NO_COLOR`, `CLICOLOR` and `CLICOLOR_FORCE` override the file's
    /// color mode. Nothing changes when none of them is set.
    pub fn with_env_overrides(mut self) -> Self {
        let env = FormattingConfig::from_env();
        if env.color != ColorMode::Auto {
            self.display.color = env.color;
        }
        self
    }
}
