//! issuebot configuration.
//!
//! Loaded from `~/.issuebot/config.toml` unless a path is given.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured token.
pub const TOKEN_VAR: &str = "ISSUEBOT_TOKEN";

/// issuebot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Tracker base URL: a GitHub or GitHub Enterprise host, optionally
    /// with the `/api/v3` prefix. Only its host is used.
    /// When omitted, gh's default host is used.
    #[serde(default)]
    pub url: Option<String>,

    /// Auth token. `ISSUEBOT_TOKEN` takes precedence.
    #[serde(default)]
    pub token: Option<String>,

    /// Identity whose stored gh credentials to use,
    /// from `~/.issuebot/gh-config/<identity>/`.
    #[serde(default)]
    pub identity: Option<String>,
}

impl Config {
    /// Load config from `path`, or from `~/.issuebot/config.toml` when `None`.
    /// Returns an error if the file is missing or invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::path().ok_or("could not determine home directory")?,
        };

        if !path.exists() {
            return Err(format!(
                "no config file found at {}\n\
                 Create one with at minimum:\n\n\
                 owner = \"your-org\"\n\
                 repo = \"your-repo\"",
                path.display()
            ));
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        for (key, value) in [("owner", &config.owner), ("repo", &config.repo)] {
            if value.trim().is_empty() {
                return Err(format!("{key} is empty in {}", path.display()));
            }
        }

        Ok(config)
    }

    /// The default config file path: `~/.issuebot/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".issuebot").join("config.toml"))
    }

    /// The token to authenticate with: `ISSUEBOT_TOKEN`, then the file.
    pub fn token(&self) -> Option<String> {
        env::var(TOKEN_VAR)
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.token.clone().filter(|t| !t.is_empty()))
    }
}
