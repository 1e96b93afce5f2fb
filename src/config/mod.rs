//! Library configuration loaded from CLI, environment, and files.
//!
//! Consumers that drive refscope from automation can load a
//! [`RefscopeConfig`] with ortho-config's layered approach instead of wiring
//! tokens and repository coordinates by hand.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in defaults
//! 2. **Configuration file** – `.refscope.toml` in the current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `REFSCOPE_TOKEN`, `REFSCOPE_OWNER`, ... or
//!    legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--token`/`-t`, `--owner`/`-o`, ...
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! owner = "acme"
//! repo = "widgets"
//! api_base = "https://ghe.example.com/api/v3"
//! temporary_ref_base = "ci-scratch"
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::SetupError;
use crate::github::locator::{
    GITHUB_API_BASE, PersonalAccessToken, RepoCoordinate, RepositoryLocator,
};

/// Default base name for temporary branches.
pub const DEFAULT_TEMPORARY_REF_BASE: &str = "refscope-tmp";

/// Configuration for GitHub access and temporary branch naming.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use refscope::RefscopeConfig;
///
/// let config = RefscopeConfig::load().expect("failed to load configuration");
/// let token = config.resolve_token().expect("token required");
/// let locator = config.require_locator().expect("repository required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "REFSCOPE",
    discovery(
        dotfile_name = ".refscope.toml",
        config_file_name = "refscope.toml",
        app_name = "refscope"
    )
)]
pub struct RefscopeConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `REFSCOPE_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Repository owner (e.g., "acme").
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name (e.g., "widgets").
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Repository URL, used when `owner` and `repo` are not both set.
    ///
    /// The API base is derived from the URL host.
    #[ortho_config(cli_short = 'u')]
    pub repository_url: Option<String>,

    /// GitHub API base URL used together with `owner` and `repo`.
    ///
    /// Defaults to `https://api.github.com`.
    #[ortho_config()]
    pub api_base: Option<String>,

    /// Base name callers may pass to
    /// [`TemporaryRefManager`](crate::github::TemporaryRefManager) when they
    /// have no natural base branch name of their own.
    ///
    /// The manager never reads configuration; it always takes the base from
    /// its caller. Read this through [`Self::temporary_ref_base`].
    ///
    /// Defaults to `refscope-tmp`.
    #[ortho_config()]
    pub temporary_ref_base: String,
}

impl Default for RefscopeConfig {
    fn default() -> Self {
        Self {
            token: None,
            owner: None,
            repo: None,
            repository_url: None,
            api_base: None,
            temporary_ref_base: DEFAULT_TEMPORARY_REF_BASE.to_owned(),
        }
    }
}

impl RefscopeConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, SetupError> {
        let value = self
            .token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(SetupError::MissingToken)?;
        PersonalAccessToken::new(value)
    }

    /// API base to use with `owner` and `repo`.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(GITHUB_API_BASE)
    }

    /// Base name for temporary branches, falling back to the default when
    /// configured blank.
    ///
    /// Intended as the `base_ref` argument of
    /// [`TemporaryRefManager::with_temporary`](crate::github::TemporaryRefManager::with_temporary).
    #[must_use]
    pub fn temporary_ref_base(&self) -> &str {
        let configured = self.temporary_ref_base.trim();
        if configured.is_empty() {
            DEFAULT_TEMPORARY_REF_BASE
        } else {
            configured
        }
    }

    /// Resolves the repository and the API base it is served from.
    ///
    /// `owner` and `repo` win over `repository_url` when both are present.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Configuration`] when no repository is configured
    /// and propagates parsing failures of the configured values.
    pub fn require_locator(&self) -> Result<RepositoryLocator, SetupError> {
        match (&self.owner, &self.repo, &self.repository_url) {
            (Some(owner), Some(repo), _) => {
                let coordinate = RepoCoordinate::new(owner, repo)?;
                RepositoryLocator::with_api_base(self.api_base(), coordinate)
            }
            (_, _, Some(url)) => RepositoryLocator::parse(url),
            (None, _, None) => Err(SetupError::Configuration {
                message: "repository owner is required (use --owner or -o)".to_owned(),
            }),
            (_, None, None) => Err(SetupError::Configuration {
                message: "repository name is required (use --repo or -r)".to_owned(),
            }),
        }
    }

    /// Resolves only the repository coordinate.
    ///
    /// # Errors
    ///
    /// Same as [`Self::require_locator`].
    pub fn require_repository(&self) -> Result<RepoCoordinate, SetupError> {
        self.require_locator()
            .map(|locator| locator.coordinate().clone())
    }
}

#[cfg(test)]
mod tests;
