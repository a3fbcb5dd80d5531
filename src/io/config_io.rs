use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::BoardConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Candidate config locations, nearest first: `reach.toml` in the working
/// directory, then `<config dir>/reach/config.toml`.
fn candidate_paths(cwd: &Path) -> Vec<PathBuf> {
    let mut paths = vec![cwd.join("reach.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("reach").join("config.toml"));
    }
    paths
}

/// Load the board config. A missing file falls back to defaults; a file that
/// exists but does not parse is a loud error. `REACH_API_BASE` in the
/// environment overrides the file's `api_base`.
pub fn load_config(cwd: &Path) -> Result<BoardConfig, ConfigError> {
    let mut config = BoardConfig::default();
    for path in candidate_paths(cwd) {
        if path.is_file() {
            config = read_config_file(&path)?;
            break;
        }
    }
    if let Ok(base) = std::env::var("REACH_API_BASE")
        && !base.trim().is_empty()
    {
        config.api_base = base.trim().trim_end_matches('/').to_string();
    }
    Ok(config)
}

/// Read and parse one config file.
pub fn read_config_file(path: &Path) -> Result<BoardConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
