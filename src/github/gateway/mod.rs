//! Gateways for Git references and pull request commits.
//!
//! The traits describe the remote operations this crate consumes so that the
//! temporary reference manager and the commit history facade can be driven by
//! mocks in tests, while the Octocrab implementations talk to GitHub.

mod client;
mod commits;
mod error_mapping;
mod http_utils;
mod refs;

pub use commits::OctocrabCommitGateway;
pub use refs::OctocrabRefGateway;

use async_trait::async_trait;

use crate::github::error::RefError;
use crate::github::locator::{PullRequestNumber, RepoCoordinate};
use crate::github::models::CommitDetails;

/// Reference operations against a remote repository.
///
/// Every method calls GitHub once. Failures are logged with their full
/// context and surfaced as the matching [`RefError`] variant; nothing is
/// retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefGateway: Send + Sync {
    /// Returns the SHA the branch currently points at.
    async fn fetch_target_sha(
        &self,
        repository: &RepoCoordinate,
        reference: &str,
    ) -> Result<String, RefError>;

    /// Creates a new branch pointing at `sha`.
    async fn create_reference(
        &self,
        repository: &RepoCoordinate,
        reference: &str,
        sha: &str,
    ) -> Result<(), RefError>;

    /// Moves an existing branch to `sha`.
    ///
    /// Without `force` GitHub only accepts fast-forward moves.
    async fn update_reference(
        &self,
        repository: &RepoCoordinate,
        reference: &str,
        sha: &str,
        force: bool,
    ) -> Result<(), RefError>;

    /// Deletes the branch.
    async fn delete_reference(
        &self,
        repository: &RepoCoordinate,
        reference: &str,
    ) -> Result<(), RefError>;
}

/// Pull request commit listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommitGateway: Send + Sync {
    /// Returns every commit of the pull request, draining all pages.
    ///
    /// A failure on any page fails the whole call.
    async fn list_pull_request_commits(
        &self,
        repository: &RepoCoordinate,
        pull_request: PullRequestNumber,
    ) -> Result<Vec<CommitDetails>, RefError>;
}
