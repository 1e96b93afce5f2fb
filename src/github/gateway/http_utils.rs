//! Shared HTTP utilities for gateway implementations.

use http::Uri;

use crate::github::error::RemoteFailure;

/// Parses a route into a relative URI for Octocrab's raw request methods.
pub(super) fn route_uri(route: &str) -> Result<Uri, RemoteFailure> {
    route.parse::<Uri>().map_err(|error| RemoteFailure::Other {
        message: format!("invalid route {route}: {error}"),
    })
}

/// Extracts the `message` field from a GitHub error body.
pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
