//! Pull request commit history facade.

use super::error::RefError;
use super::gateway::CommitGateway;
use super::locator::{PullRequestNumber, RepoCoordinate};
use super::models::CommitDetails;

/// Retrieves the commits of a pull request through a gateway.
pub struct CommitHistory<'client, Gateway>
where
    Gateway: CommitGateway,
{
    client: &'client Gateway,
}

impl<'client, Gateway> CommitHistory<'client, Gateway>
where
    Gateway: CommitGateway,
{
    /// Create a new facade using the provided gateway.
    #[must_use]
    pub const fn new(client: &'client Gateway) -> Self {
        Self { client }
    }

    /// Every commit of the pull request, in the order GitHub lists them.
    ///
    /// # Errors
    ///
    /// Returns [`RefError::CommitFetch`] when any page fails; no partial
    /// history is returned.
    pub async fn fetch_commit_details(
        &self,
        repository: &RepoCoordinate,
        pull_request: PullRequestNumber,
    ) -> Result<Vec<CommitDetails>, RefError> {
        self.client
            .list_pull_request_commits(repository, pull_request)
            .await
    }

    /// SHAs of every commit of the pull request, in listing order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_commit_details`].
    pub async fn fetch_commit_shas(
        &self,
        repository: &RepoCoordinate,
        pull_request: PullRequestNumber,
    ) -> Result<Vec<String>, RefError> {
        let commits = self.fetch_commit_details(repository, pull_request).await?;
        Ok(commits.into_iter().map(|commit| commit.sha).collect())
    }
}
