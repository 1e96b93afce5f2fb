//! Error classification helpers for the Octocrab gateway implementations.

use http::StatusCode;

use crate::github::error::RemoteFailure;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether a status and message describe a rate limit rejection.
fn is_rate_limit(status: StatusCode, message: &str, documentation_url: Option<&str>) -> bool {
    let is_rate_limit_status = matches!(
        status,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = message.to_lowercase().contains("rate limit")
        || documentation_url.is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

/// Classifies a GitHub answer given its status and message.
fn classify_status(
    status: StatusCode,
    message: String,
    documentation_url: Option<&str>,
) -> RemoteFailure {
    if is_rate_limit(status, &message, documentation_url) {
        RemoteFailure::RateLimited { message }
    } else if is_auth_failure(status) {
        RemoteFailure::Authentication {
            status: status.as_u16(),
            message,
        }
    } else {
        RemoteFailure::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Classifies an Octocrab error into a [`RemoteFailure`].
pub(super) fn map_octocrab_error(error: &octocrab::Error) -> RemoteFailure {
    if let octocrab::Error::GitHub { source, .. } = error {
        return classify_status(
            source.status_code,
            source.message.clone(),
            source.documentation_url.as_deref(),
        );
    }

    if is_network_error(error) {
        return RemoteFailure::Network {
            message: error.to_string(),
        };
    }

    RemoteFailure::Other {
        message: error.to_string(),
    }
}

/// Classifies a raw non-success HTTP response.
pub(super) fn map_http_error(status: StatusCode, maybe_message: Option<String>) -> RemoteFailure {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    classify_status(status, message, None)
}
