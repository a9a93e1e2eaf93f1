//! Options for the hide-code filter.
//!
//! The options file lives at `~/.hidecode/hidecode.toml`. A host that embeds
//! the filter may also point at its own file with [`load_config_from`] or
//! build [`HideCodeConfig`] directly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HideCodeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "hidecode.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".hidecode";

// ---------------------------------------------------------------------------
// Config structs (matching hidecode.toml schema)
// ---------------------------------------------------------------------------

/// Top-level config, deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// `[hide_code]` section.
    #[serde(default)]
    pub hide_code: HideCodeConfig,
}

/// `[hide_code]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HideCodeConfig {
    /// When false the filter returns the notebook untouched.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cell metadata key that marks code as hidden.
    #[serde(default = "default_hide_code_key")]
    pub hide_code_key: String,

    /// Clear prompt numbers on cells carrying `hide_prompt_key`.
    #[serde(default)]
    pub hide_prompt: bool,

    /// Cell metadata key that marks the prompt as hidden.
    #[serde(default = "default_hide_prompt_key")]
    pub hide_prompt_key: String,

    /// Remove code cells left with no source and no outputs.
    #[serde(default = "default_true")]
    pub drop_empty_code_cells: bool,
}

impl Default for HideCodeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hide_code_key: default_hide_code_key(),
            hide_prompt: false,
            hide_prompt_key: default_hide_prompt_key(),
            drop_empty_code_cells: true,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_hide_code_key() -> String {
    "hideCode".into()
}
fn default_hide_prompt_key() -> String {
    "hidePrompt".into()
}

impl AppConfig {
    /// Reject options the filter cannot act on.
    pub fn validate(&self) -> Result<()> {
        self.hide_code.validate()
    }
}

impl HideCodeConfig {
    /// Flag keys must be non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.hide_code_key.trim().is_empty() {
            return Err(HideCodeError::validation("hide_code_key must not be empty"));
        }
        if self.hide_prompt && self.hide_prompt_key.trim().is_empty() {
            return Err(HideCodeError::validation(
                "hide_prompt_key must not be empty when hide_prompt is enabled",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.hidecode/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| HideCodeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.hidecode/hidecode.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load and validate the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| HideCodeError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        HideCodeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;

    tracing::debug!(?path, enabled = config.hide_code.enabled, "loaded config");
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    init_config_at(&config_dir()?)
}

/// Write a default config file into `dir`, creating it if needed.
pub fn init_config_at(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| HideCodeError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| HideCodeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| HideCodeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
