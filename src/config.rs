use crate::error::{GatError, Result};
use crate::git::credentials::DEFAULT_SSH_USER;
use crate::resolver::ResolutionStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "gat.toml";

/// Settings for a gat invocation.
///
/// Every field has a default, so an empty or partial file is valid.
/// Command-line flags override values read from a file.
#[derive(Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Remote the new tag is pushed to
    pub remote: String,

    /// Private key used to authenticate the push
    pub ssh_key: PathBuf,

    /// Passphrase of `ssh_key`, empty when the key is not encrypted
    pub ssh_password: String,

    /// SSH user when the remote URL does not name one
    pub ssh_user: String,

    /// How the latest existing version is chosen
    pub strategy: ResolutionStrategy,

    /// Stop instead of tagging again when HEAD already has the latest tag
    pub abort_if_head_tagged: bool,
}

/// Returns `~/.ssh/id_rsa` for the current user.
pub fn default_ssh_key() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".ssh").join("id_rsa"),
        None => PathBuf::from("~/.ssh/id_rsa"),
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote: "origin".to_string(),
            ssh_key: default_ssh_key(),
            ssh_password: String::new(),
            ssh_user: DEFAULT_SSH_USER.to_string(),
            strategy: ResolutionStrategy::default(),
            abort_if_head_tagged: false,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("remote", &self.remote)
            .field("ssh_key", &self.ssh_key)
            .field("ssh_password", &"<redacted>")
            .field("ssh_user", &self.ssh_user)
            .field("strategy", &self.strategy)
            .field("abort_if_head_tagged", &self.abort_if_head_tagged)
            .finish()
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gat.toml` in current directory
/// 3. `gat.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        PathBuf::from(CONFIG_FILE_NAME)
    } else if let Some(path) = dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
    {
        path
    } else {
        tracing::debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let config_str = fs::read_to_string(&path).map_err(|e| {
        GatError::config(format!("Cannot read '{}': {}", path.display(), e))
    })?;

    parse_config(&config_str)
        .map_err(|e| GatError::config(format!("Invalid '{}': {}", path.display(), e)))
}

/// Parse configuration from TOML text
pub fn parse_config(contents: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(contents)
}
