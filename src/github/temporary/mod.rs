//! Scoped temporary branches.
//!
//! [`TemporaryRefManager`] creates a branch under a generated name, lets the
//! caller work against it, and deletes it again whatever the outcome. The
//! returned [`TemporaryRef`] is armed from the moment GitHub confirms the
//! creation: consuming it with [`TemporaryRef::delete`] disarms it, and
//! dropping it while still armed (a panic in the guarded action, or the
//! owning future being cancelled) schedules the deletion on the current Tokio
//! runtime.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use refscope::github::{
//!     OctocrabRefGateway, PersonalAccessToken, RefGateway, RepoCoordinate, RepositoryLocator,
//!     TemporaryRefManager,
//! };
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = RepoCoordinate::new("acme", "widgets")?;
//! let locator = RepositoryLocator::on_github(repository.clone())?;
//! let token = PersonalAccessToken::new("ghp_example")?;
//! let gateway = Arc::new(OctocrabRefGateway::for_token(&token, &locator)?);
//! let manager = TemporaryRefManager::new(Arc::clone(&gateway));
//!
//! let sha = manager
//!     .with_temporary(&repository, "main", "abc123", |name| {
//!         let gateway = Arc::clone(&gateway);
//!         let repository = repository.clone();
//!         async move { gateway.fetch_target_sha(&repository, &name).await }
//!     })
//!     .await?;
//! assert_eq!(sha, "abc123");
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::github::error::RefError;
use crate::github::gateway::RefGateway;
use crate::github::locator::RepoCoordinate;
use crate::github::naming::{TokenSource, UuidTokenSource, generate_unique_name};

/// Creates temporary branches and guarantees their removal.
pub struct TemporaryRefManager<G, S = UuidTokenSource>
where
    G: RefGateway + 'static,
    S: TokenSource,
{
    gateway: Arc<G>,
    tokens: S,
}

impl<G> TemporaryRefManager<G, UuidTokenSource>
where
    G: RefGateway + 'static,
{
    /// Creates a manager that names branches with random UUID suffixes.
    #[must_use]
    pub const fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            tokens: UuidTokenSource,
        }
    }
}

impl<G, S> TemporaryRefManager<G, S>
where
    G: RefGateway + 'static,
    S: TokenSource,
{
    /// Creates a manager with an explicit token source.
    #[must_use]
    pub const fn with_token_source(gateway: Arc<G>, tokens: S) -> Self {
        Self { gateway, tokens }
    }

    /// Creates `<base_ref>-<token>` pointing at `sha` and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`RefError::RefCreate`] when GitHub rejects the creation; no
    /// handle exists in that case and nothing needs cleaning up.
    pub async fn create_temporary(
        &self,
        repository: &RepoCoordinate,
        base_ref: &str,
        sha: &str,
    ) -> Result<TemporaryRef<G>, RefError> {
        let name = generate_unique_name(&self.tokens, base_ref);
        self.gateway
            .create_reference(repository, &name, sha)
            .await?;

        tracing::debug!(%repository, reference = %name, sha, "temporary reference created");
        Ok(TemporaryRef {
            name,
            repository: repository.clone(),
            gateway: Arc::clone(&self.gateway),
            armed: true,
        })
    }

    /// Runs `action` against a temporary branch created from `sha`.
    ///
    /// The action receives the generated branch name. The branch is deleted
    /// exactly once after the action completes, whether it succeeded or not.
    /// When the action fails its error is returned and a failing cleanup is
    /// only logged; when the action succeeds a failing cleanup is returned as
    /// [`RefError::RefDelete`]. If the branch cannot be created the action is
    /// never invoked.
    ///
    /// # Errors
    ///
    /// Returns the action's error, or a [`RefError`] converted into `E` when
    /// the creation or the cleanup fails.
    pub async fn with_temporary<T, E, F, Fut>(
        &self,
        repository: &RepoCoordinate,
        base_ref: &str,
        sha: &str,
        action: F,
    ) -> Result<T, E>
    where
        E: From<RefError>,
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let temporary = self.create_temporary(repository, base_ref, sha).await?;
        let outcome = action(temporary.name().to_owned()).await;
        let name = temporary.name().to_owned();
        let cleanup = temporary.delete().await;

        match (outcome, cleanup) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(cleanup_error)) => Err(E::from(cleanup_error)),
            (Err(primary), Ok(())) => Err(primary),
            (Err(primary), Err(cleanup_error)) => {
                tracing::error!(
                    %repository,
                    reference = %name,
                    error = %cleanup_error,
                    "temporary reference cleanup failed after the action failed; the reference may be leaked"
                );
                Err(primary)
            }
        }
    }
}

/// Handle to a temporary branch that must be deleted exactly once.
#[must_use = "dropping a temporary reference schedules its deletion in the background"]
pub struct TemporaryRef<G>
where
    G: RefGateway + 'static,
{
    name: String,
    repository: RepoCoordinate,
    gateway: Arc<G>,
    armed: bool,
}

impl<G> TemporaryRef<G>
where
    G: RefGateway + 'static,
{
    /// Generated branch name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Repository the branch lives in.
    #[must_use]
    pub const fn repository(&self) -> &RepoCoordinate {
        &self.repository
    }

    /// Deletes the branch, consuming the handle.
    ///
    /// The handle stays armed until GitHub answers, so a deletion interrupted
    /// by cancellation is rescheduled when the handle drops.
    ///
    /// # Errors
    ///
    /// Returns [`RefError::RefDelete`] when GitHub rejects the deletion.
    pub async fn delete(mut self) -> Result<(), RefError> {
        let result = self
            .gateway
            .delete_reference(&self.repository, &self.name)
            .await;
        self.armed = false;

        if result.is_ok() {
            tracing::debug!(
                repository = %self.repository,
                reference = %self.name,
                "temporary reference deleted"
            );
        }
        result
    }
}

impl<G> Drop for TemporaryRef<G>
where
    G: RefGateway + 'static,
{
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::error!(
                repository = %self.repository,
                reference = %self.name,
                "temporary reference dropped outside a Tokio runtime; the reference is leaked"
            );
            return;
        };

        tracing::warn!(
            repository = %self.repository,
            reference = %self.name,
            "temporary reference dropped before deletion; scheduling cleanup"
        );
        let gateway = Arc::clone(&self.gateway);
        let repository = self.repository.clone();
        let name = std::mem::take(&mut self.name);
        drop(runtime.spawn(async move {
            if let Err(error) = gateway.delete_reference(&repository, &name).await {
                tracing::error!(
                    %repository,
                    reference = %name,
                    %error,
                    "background cleanup of temporary reference failed"
                );
            }
        }));
    }
}
