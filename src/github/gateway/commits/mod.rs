//! Octocrab implementation of the pull request commit listing.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};

use crate::github::error::{LIST_COMMITS, RefError, SetupError};
use crate::github::locator::{
    PersonalAccessToken, PullRequestNumber, RepoCoordinate, RepositoryLocator,
};
use crate::github::models::{ApiPullRequestCommit, CommitDetails};

use super::CommitGateway;
use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;

/// Largest page size GitHub accepts for the commit listing.
const COMMITS_PER_PAGE: &str = "100";

/// Octocrab-backed pull request commit gateway.
#[derive(Clone)]
pub struct OctocrabCommitGateway {
    client: Octocrab,
}

impl OctocrabCommitGateway {
    /// Creates a new gateway from an authenticated Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the token and the locator's API base.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidUrl`] when the base URI cannot be parsed or
    /// [`SetupError::Client`] when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: &RepositoryLocator,
    ) -> Result<Self, SetupError> {
        let octocrab = build_octocrab_client(token, locator.api_base().as_str())?;
        Ok(Self::new(octocrab))
    }

    fn fetch_failed(
        repository: &RepoCoordinate,
        pull_request: PullRequestNumber,
        error: &octocrab::Error,
    ) -> RefError {
        tracing::error!(
            %repository,
            pull_request = pull_request.get(),
            operation = LIST_COMMITS,
            error = ?error,
            "GitHub commit listing failed"
        );
        RefError::CommitFetch {
            repository: repository.clone(),
            pull_request: pull_request.get(),
            cause: map_octocrab_error(error),
        }
    }
}

#[async_trait]
impl CommitGateway for OctocrabCommitGateway {
    async fn list_pull_request_commits(
        &self,
        repository: &RepoCoordinate,
        pull_request: PullRequestNumber,
    ) -> Result<Vec<CommitDetails>, RefError> {
        let query = [("per_page", COMMITS_PER_PAGE)];
        let first_page: Page<ApiPullRequestCommit> = self
            .client
            .get(
                repository.pull_request_commits_path(pull_request),
                Some(&query),
            )
            .await
            .map_err(|error| Self::fetch_failed(repository, pull_request, &error))?;

        // Drain every page before projecting so a late failure discards all.
        let commits = self
            .client
            .all_pages(first_page)
            .await
            .map_err(|error| Self::fetch_failed(repository, pull_request, &error))?;

        tracing::debug!(
            %repository,
            pull_request = pull_request.get(),
            count = commits.len(),
            "listed pull request commits"
        );
        Ok(commits.into_iter().map(CommitDetails::from).collect())
    }
}
