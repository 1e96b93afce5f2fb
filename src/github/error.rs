//! Error types exposed by the GitHub reference layer.
//!
//! Remote failures surface as [`RefError`], a closed set of five kinds that
//! each carry the repository, the reference or pull request involved, and the
//! classified [`RemoteFailure`] returned by GitHub. Failures that happen
//! before any remote call (parsing, client construction, configuration) are
//! reported as [`SetupError`].

use thiserror::Error;

use super::locator::RepoCoordinate;

/// Operation label used for reference reads.
pub const READ_REF: &str = "read ref";
/// Operation label used for reference creation.
pub const CREATE_REF: &str = "create ref";
/// Operation label used for reference updates.
pub const UPDATE_REF: &str = "update ref";
/// Operation label used for reference deletion.
pub const DELETE_REF: &str = "delete ref";
/// Operation label used for pull request commit listing.
pub const LIST_COMMITS: &str = "list pull request commits";

/// Classified cause of a failed GitHub call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteFailure {
    /// GitHub rejected the credentials (401/403).
    #[error("GitHub rejected the token ({status}): {message}")]
    Authentication {
        /// HTTP status returned by GitHub.
        status: u16,
        /// Message body returned with the response.
        message: String,
    },

    /// GitHub refused the request because the rate limit was exhausted.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimited {
        /// Message body returned with the response.
        message: String,
    },

    /// GitHub answered with a non-success status.
    #[error("GitHub API returned {status}: {message}")]
    Api {
        /// HTTP status returned by GitHub.
        status: u16,
        /// Message body returned with the response.
        message: String,
    },

    /// The request never produced an HTTP response.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Any other failure, such as an undecodable response body.
    #[error("{message}")]
    Other {
        /// Error detail.
        message: String,
    },
}

impl RemoteFailure {
    /// HTTP status associated with the failure, when GitHub answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::RateLimited { .. } | Self::Network { .. } | Self::Other { .. } => None,
        }
    }
}

/// Errors surfaced by reference and commit history operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefError {
    /// The reference could not be read, typically because it does not exist.
    #[error("failed to read ref `{reference}` in {repository}")]
    RefRead {
        /// Repository the reference lives in.
        repository: RepoCoordinate,
        /// Short reference name.
        reference: String,
        /// Classified GitHub failure.
        #[source]
        cause: RemoteFailure,
    },

    /// The reference could not be created, typically because it already exists.
    #[error("failed to create ref `{reference}` in {repository}")]
    RefCreate {
        /// Repository the reference was to be created in.
        repository: RepoCoordinate,
        /// Short reference name.
        reference: String,
        /// Classified GitHub failure.
        #[source]
        cause: RemoteFailure,
    },

    /// GitHub rejected the update, for example a non-fast-forward move.
    #[error("failed to update ref `{reference}` in {repository} (force: {force})")]
    RefUpdate {
        /// Repository the reference lives in.
        repository: RepoCoordinate,
        /// Short reference name.
        reference: String,
        /// Whether the update was forced.
        force: bool,
        /// Classified GitHub failure.
        #[source]
        cause: RemoteFailure,
    },

    /// The reference could not be deleted.
    #[error("failed to delete ref `{reference}` in {repository}")]
    RefDelete {
        /// Repository the reference lives in.
        repository: RepoCoordinate,
        /// Short reference name.
        reference: String,
        /// Classified GitHub failure.
        #[source]
        cause: RemoteFailure,
    },

    /// A page of the pull request commit listing failed.
    #[error("failed to list commits of pull request #{pull_request} in {repository}")]
    CommitFetch {
        /// Repository the pull request belongs to.
        repository: RepoCoordinate,
        /// Pull request number.
        pull_request: u64,
        /// Classified GitHub failure.
        #[source]
        cause: RemoteFailure,
    },
}

impl RefError {
    /// Label of the operation that failed.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::RefRead { .. } => READ_REF,
            Self::RefCreate { .. } => CREATE_REF,
            Self::RefUpdate { .. } => UPDATE_REF,
            Self::RefDelete { .. } => DELETE_REF,
            Self::CommitFetch { .. } => LIST_COMMITS,
        }
    }

    /// Repository the failed operation targeted.
    #[must_use]
    pub const fn repository(&self) -> &RepoCoordinate {
        match self {
            Self::RefRead { repository, .. }
            | Self::RefCreate { repository, .. }
            | Self::RefUpdate { repository, .. }
            | Self::RefDelete { repository, .. }
            | Self::CommitFetch { repository, .. } => repository,
        }
    }

    /// Reference name, for the four reference operations.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::RefRead { reference, .. }
            | Self::RefCreate { reference, .. }
            | Self::RefUpdate { reference, .. }
            | Self::RefDelete { reference, .. } => Some(reference.as_str()),
            Self::CommitFetch { .. } => None,
        }
    }

    /// The GitHub failure that caused this error.
    #[must_use]
    pub const fn cause(&self) -> &RemoteFailure {
        match self {
            Self::RefRead { cause, .. }
            | Self::RefCreate { cause, .. }
            | Self::RefUpdate { cause, .. }
            | Self::RefDelete { cause, .. }
            | Self::CommitFetch { cause, .. } => cause,
        }
    }
}

/// Errors raised before any reference operation reaches GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SetupError {
    /// The provided URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// The repository owner or name is missing.
    #[error("repository must be given as <owner>/<name>")]
    InvalidRepository,

    /// The pull request number is not a valid integer.
    #[error("pull request number must be a positive integer")]
    InvalidPullRequestNumber,

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// Octocrab could not build a client.
    #[error("GitHub client construction failed: {message}")]
    Client {
        /// Builder error detail.
        message: String,
    },

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}
