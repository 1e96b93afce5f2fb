//! Octocrab client construction helpers for gateway implementations.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::SetupError;
use crate::github::locator::PersonalAccessToken;

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns [`SetupError::InvalidUrl`] when the base URI cannot be parsed or
/// [`SetupError::Client`] when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, SetupError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| SetupError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| SetupError::Client {
            message: error.to_string(),
        })?
        .build()
        .map_err(|error| SetupError::Client {
            message: error.to_string(),
        })
}
