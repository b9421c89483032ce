use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::github::RepoCoordinates;
use crate::github::client::{DEFAULT_API_BASE, DEFAULT_USER_AGENT};
use crate::{AppError, AppResult};

/// Optional settings, as read from `config.toml` or collected from command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialSettings {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub path: Option<String>,
    pub api_base: Option<String>,
    pub token: Option<String>,
    pub user_agent: Option<String>,
}

/// Fully resolved settings for one viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub coords: RepoCoordinates,
    pub api_base: String,
    pub token: Option<String>,
    pub user_agent: String,
}

impl PartialSettings {
    pub fn parse(raw: &str) -> AppResult<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Read `explicit`, or the default config file when none is given.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    #[tracing::instrument(name = "Loading config", level = "debug")]
    pub async fn load(explicit: Option<&Path>) -> AppResult<Self> {
        let path: PathBuf = match explicit {
            Some(path) => path.to_path_buf(),
            None => post_history_dirs::config_file()?,
        };
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                info!("Using config file {}", path.display());
                Self::parse(&raw)
            }
            Err(e) if e.kind() == ErrorKind::NotFound && explicit.is_none() => {
                debug!("No config file at {}", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Values set in `overrides` win over values in `self`.
    pub fn merge(self, overrides: PartialSettings) -> Self {
        PartialSettings {
            owner: overrides.owner.or(self.owner),
            repo: overrides.repo.or(self.repo),
            path: overrides.path.or(self.path),
            api_base: overrides.api_base.or(self.api_base),
            token: overrides.token.or(self.token),
            user_agent: overrides.user_agent.or(self.user_agent),
        }
    }
}

impl TryFrom<PartialSettings> for Settings {
    type Error = AppError;

    fn try_from(partial: PartialSettings) -> AppResult<Self> {
        let require = |value: Option<String>, name: &str| {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("`{name}` is not set (flag --{name} or config.toml)")))
        };
        Ok(Settings {
            coords: RepoCoordinates {
                owner: require(partial.owner, "owner")?,
                repo: require(partial.repo, "repo")?,
                path: require(partial.path, "path")?
                    .trim_start_matches('/')
                    .to_string(),
            },
            api_base: partial
                .api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            token: partial.token.filter(|t| !t.is_empty()),
            user_agent: partial
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        })
    }
}
