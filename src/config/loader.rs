use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::ScoreTreeConfig;
use crate::core::weights::DEFAULT_WEIGHT_TOLERANCE;

/// File searched for by [`load_config`].
pub const CONFIG_FILE_NAME: &str = ".scoretree.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string.
///
/// An unusable weight tolerance is replaced by the default with a warning.
pub fn parse_config(contents: &str) -> Result<ScoreTreeConfig, String> {
    let mut config = toml::from_str::<ScoreTreeConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    if let Err(e) = config.validate() {
        log::warn!("Invalid weight tolerance: {}. Using default.", e);
        config.weight_tolerance = DEFAULT_WEIGHT_TOLERANCE;
    }

    Ok(config)
}

/// Load a configuration file, failing on a missing or malformed file.
pub fn load_config_from_path(path: &Path) -> anyhow::Result<ScoreTreeConfig> {
    let contents = read_config_file(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&contents).map_err(anyhow::Error::msg)
}

pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<ScoreTreeConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // "not found" is the normal case while walking up the tree
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` followed by its parents, at most `max_depth` directories.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for [`CONFIG_FILE_NAME`].
pub fn load_config_from(start: &Path) -> ScoreTreeConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            ScoreTreeConfig::default()
        })
}

/// Search the current directory and its ancestors; defaults when nothing is found.
pub fn load_config() -> ScoreTreeConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            ScoreTreeConfig::default()
        }
    }
}
