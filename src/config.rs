// Configuration loader: reads the install path and API token from a small
// JSON file. Both fields are required; we fail before touching the network
// if either is missing or empty.

use crate::error::{ReseedError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "reseed-config.json";

/// Sub-directory of the user's config dir used as a second lookup location.
const CONFIG_DIR_NAME: &str = "biorand-reseed";

/// User configuration. Field names on disk follow the original
/// `reseed-config.json` layout (`RE4InstallPath`, `BiorandToken`); a few
/// friendlier spellings are accepted too.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(
        rename = "RE4InstallPath",
        alias = "re4InstallPath",
        alias = "install_path",
        default
    )]
    pub install_path: String,
    #[serde(
        rename = "BiorandToken",
        alias = "biorandToken",
        alias = "token",
        default
    )]
    pub token: String,
}

impl Config {
    /// Parse and validate a configuration from raw JSON bytes.
    pub fn from_slice(path: &Path, bytes: &[u8]) -> Result<Self> {
        let config: Config =
            serde_json::from_slice(bytes).map_err(|source| ReseedError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| ReseedError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(path, &bytes)
    }

    fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(ReseedError::Config(
                "the Biorand token can't be empty".into(),
            ));
        }
        if self.install_path.is_empty() {
            return Err(ReseedError::Config(
                "RE4 install path can't be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Pick the config file to read. An explicit path always wins. Otherwise
/// the working directory is tried first, then `<config dir>/biorand-reseed`.
/// When neither exists the working-directory path is returned so the error
/// message points at the expected location.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        let candidate = dir.join(CONFIG_DIR_NAME).join(DEFAULT_CONFIG_FILE);
        if candidate.exists() {
            return candidate;
        }
    }
    local
}
