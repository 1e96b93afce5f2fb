//! Octocrab implementation of the reference gateway.

use async_trait::async_trait;
use octocrab::Octocrab;

use crate::github::error::{
    CREATE_REF, DELETE_REF, READ_REF, RefError, RemoteFailure, SetupError, UPDATE_REF,
};
use crate::github::locator::{PersonalAccessToken, RepoCoordinate, RepositoryLocator};
use crate::github::models::{ApiCreateRef, ApiGitRef, ApiUpdateRef};
use crate::github::naming::{fully_qualified_path, head_path};

use super::RefGateway;
use super::client::build_octocrab_client;
use super::error_mapping::{map_http_error, map_octocrab_error};
use super::http_utils::{extract_github_message, route_uri};

/// Logs an Octocrab failure with its context and classifies it.
fn call_failed(
    operation: &'static str,
    repository: &RepoCoordinate,
    reference: &str,
    error: &octocrab::Error,
) -> RemoteFailure {
    tracing::error!(
        %repository,
        reference,
        operation,
        error = ?error,
        "GitHub reference call failed"
    );
    map_octocrab_error(error)
}

/// Octocrab-backed reference gateway.
#[derive(Clone)]
pub struct OctocrabRefGateway {
    client: Octocrab,
}

impl OctocrabRefGateway {
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

    /// Sends the DELETE request and checks for a success status.
    async fn send_delete(
        &self,
        repository: &RepoCoordinate,
        reference: &str,
    ) -> Result<(), RemoteFailure> {
        let route = repository.git_refs_entry_path(&head_path(reference));
        let uri = route_uri(&route).inspect_err(|failure| {
            tracing::error!(
                %repository,
                reference,
                operation = DELETE_REF,
                error = %failure,
                "GitHub reference call failed"
            );
        })?;

        let response = self
            .client
            ._delete(uri, None::<&()>)
            .await
            .map_err(|error| call_failed(DELETE_REF, repository, reference, &error))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = match self.client.body_to_string(response).await {
            Ok(body) => body,
            Err(error) => {
                tracing::debug!(
                    %repository,
                    reference,
                    operation = DELETE_REF,
                    error = ?error,
                    "error response body could not be read"
                );
                String::new()
            }
        };
        tracing::error!(
            %repository,
            reference,
            operation = DELETE_REF,
            status = status.as_u16(),
            body = %body,
            "GitHub reference call failed"
        );
        Err(map_http_error(status, extract_github_message(&body)))
    }
}

#[async_trait]
impl RefGateway for OctocrabRefGateway {
    async fn fetch_target_sha(
        &self,
        repository: &RepoCoordinate,
        reference: &str,
    ) -> Result<String, RefError> {
        let route = repository.git_ref_path(&head_path(reference));
        let git_ref = self
            .client
            .get::<ApiGitRef, _, _>(route, None::<&()>)
            .await
            .map_err(|error| RefError::RefRead {
                repository: repository.clone(),
                reference: reference.to_owned(),
                cause: call_failed(READ_REF, repository, reference, &error),
            })?;

        tracing::debug!(
            %repository,
            reference = %git_ref.name,
            object_type = git_ref.object.kind.as_deref().unwrap_or("unknown"),
            sha = %git_ref.object.sha,
            "read reference target"
        );
        Ok(git_ref.object.sha)
    }

    async fn create_reference(
        &self,
        repository: &RepoCoordinate,
        reference: &str,
        sha: &str,
    ) -> Result<(), RefError> {
        let qualified = fully_qualified_path(reference);
        let body = ApiCreateRef {
            reference: &qualified,
            sha,
        };

        let _created: ApiGitRef = self
            .client
            .post(repository.git_refs_path(), Some(&body))
            .await
            .map_err(|error| RefError::RefCreate {
                repository: repository.clone(),
                reference: reference.to_owned(),
                cause: call_failed(CREATE_REF, repository, reference, &error),
            })?;

        tracing::debug!(%repository, reference, sha, "created reference");
        Ok(())
    }

    async fn update_reference(
        &self,
        repository: &RepoCoordinate,
        reference: &str,
        sha: &str,
        force: bool,
    ) -> Result<(), RefError> {
        let route = repository.git_refs_entry_path(&head_path(reference));
        let body = ApiUpdateRef { sha, force };

        let _updated: ApiGitRef = self
            .client
            .patch(route, Some(&body))
            .await
            .map_err(|error| RefError::RefUpdate {
                repository: repository.clone(),
                reference: reference.to_owned(),
                force,
                cause: call_failed(UPDATE_REF, repository, reference, &error),
            })?;

        tracing::debug!(%repository, reference, sha, force, "updated reference");
        Ok(())
    }

    async fn delete_reference(
        &self,
        repository: &RepoCoordinate,
        reference: &str,
    ) -> Result<(), RefError> {
        self.send_delete(repository, reference)
            .await
            .map_err(|cause| RefError::RefDelete {
                repository: repository.clone(),
                reference: reference.to_owned(),
                cause,
            })?;

        tracing::debug!(%repository, reference, "deleted reference");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
