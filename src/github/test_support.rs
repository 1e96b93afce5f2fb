//! In-memory stand-ins for GitHub used by unit and behavioural tests.
//!
//! [`InMemoryRefStore`] mimics the remote reference namespace closely enough
//! to exercise the temporary reference lifecycle: creation rejects existing
//! names, non-forced updates must fast-forward along recorded parent links,
//! and every call is journalled so tests can assert on what reached the
//! remote.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::error::{RefError, RemoteFailure};
use super::gateway::RefGateway;
use super::locator::RepoCoordinate;
use super::naming::TokenSource;

/// A call received by [`InMemoryRefStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefCall {
    /// `fetch_target_sha`.
    Read {
        /// Short reference name.
        reference: String,
    },
    /// `create_reference`.
    Create {
        /// Short reference name.
        reference: String,
        /// Target SHA.
        sha: String,
    },
    /// `update_reference`.
    Update {
        /// Short reference name.
        reference: String,
        /// Target SHA.
        sha: String,
        /// Whether the update was forced.
        force: bool,
    },
    /// `delete_reference`.
    Delete {
        /// Short reference name.
        reference: String,
    },
}

#[derive(Debug, Default)]
struct StoreState {
    refs: HashMap<(RepoCoordinate, String), String>,
    parents: HashMap<String, Vec<String>>,
    calls: Vec<RefCall>,
    create_failure: Option<RemoteFailure>,
    delete_failure: Option<RemoteFailure>,
}

impl StoreState {
    fn descends_from(&self, candidate: &str, ancestor: &str) -> bool {
        let mut queue = VecDeque::from([candidate.to_owned()]);
        let mut seen = HashSet::new();
        while let Some(sha) = queue.pop_front() {
            if sha == ancestor {
                return true;
            }
            if !seen.insert(sha.clone()) {
                continue;
            }
            if let Some(parents) = self.parents.get(&sha) {
                queue.extend(parents.iter().cloned());
            }
        }
        false
    }
}

fn api_failure(status: u16, message: &str) -> RemoteFailure {
    RemoteFailure::Api {
        status,
        message: message.to_owned(),
    }
}

/// Thread-safe in-memory reference namespace implementing [`RefGateway`].
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    state: Mutex<StoreState>,
}

impl InMemoryRefStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds a branch pointing at `sha`.
    #[must_use]
    pub fn with_ref(self, repository: &RepoCoordinate, reference: &str, sha: &str) -> Self {
        self.lock()
            .refs
            .insert((repository.clone(), reference.to_owned()), sha.to_owned());
        self
    }

    /// Records `parent` as a parent of commit `sha` for fast-forward checks.
    #[must_use]
    pub fn with_commit(self, sha: &str, parent: &str) -> Self {
        self.lock()
            .parents
            .entry(sha.to_owned())
            .or_default()
            .push(parent.to_owned());
        self
    }

    /// Makes every subsequent creation fail with `cause`.
    #[must_use]
    pub fn failing_creates(self, cause: RemoteFailure) -> Self {
        self.lock().create_failure = Some(cause);
        self
    }

    /// Makes every subsequent deletion fail with `cause`.
    #[must_use]
    pub fn failing_deletes(self, cause: RemoteFailure) -> Self {
        self.lock().delete_failure = Some(cause);
        self
    }

    /// Returns the SHA a branch points at, if it exists.
    #[must_use]
    pub fn target(&self, repository: &RepoCoordinate, reference: &str) -> Option<String> {
        self.lock()
            .refs
            .get(&(repository.clone(), reference.to_owned()))
            .cloned()
    }

    /// Returns whether the branch exists.
    #[must_use]
    pub fn contains(&self, repository: &RepoCoordinate, reference: &str) -> bool {
        self.target(repository, reference).is_some()
    }

    /// Names of every branch in `repository`, sorted.
    #[must_use]
    pub fn references(&self, repository: &RepoCoordinate) -> Vec<String> {
        let mut names: Vec<String> = self
            .lock()
            .refs
            .keys()
            .filter(|(owner, _)| owner == repository)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Every call received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RefCall> {
        self.lock().calls.clone()
    }
}

#[async_trait]
impl RefGateway for InMemoryRefStore {
    async fn fetch_target_sha(
        &self,
        repository: &RepoCoordinate,
        reference: &str,
    ) -> Result<String, RefError> {
        let mut state = self.lock();
        state.calls.push(RefCall::Read {
            reference: reference.to_owned(),
        });
        state
            .refs
            .get(&(repository.clone(), reference.to_owned()))
            .cloned()
            .ok_or_else(|| RefError::RefRead {
                repository: repository.clone(),
                reference: reference.to_owned(),
                cause: api_failure(404, "Not Found"),
            })
    }

    async fn create_reference(
        &self,
        repository: &RepoCoordinate,
        reference: &str,
        sha: &str,
    ) -> Result<(), RefError> {
        let mut state = self.lock();
        state.calls.push(RefCall::Create {
            reference: reference.to_owned(),
            sha: sha.to_owned(),
        });

        let key = (repository.clone(), reference.to_owned());
        let failure = state.create_failure.clone().or_else(|| {
            state
                .refs
                .contains_key(&key)
                .then(|| api_failure(422, "Reference already exists"))
        });
        if let Some(cause) = failure {
            return Err(RefError::RefCreate {
                repository: repository.clone(),
                reference: reference.to_owned(),
                cause,
            });
        }

        state.refs.insert(key, sha.to_owned());
        Ok(())
    }

    async fn update_reference(
        &self,
        repository: &RepoCoordinate,
        reference: &str,
        sha: &str,
        force: bool,
    ) -> Result<(), RefError> {
        let mut state = self.lock();
        state.calls.push(RefCall::Update {
            reference: reference.to_owned(),
            sha: sha.to_owned(),
            force,
        });

        let key = (repository.clone(), reference.to_owned());
        let rejection = match state.refs.get(&key) {
            None => Some(api_failure(422, "Reference does not exist")),
            Some(current) if !force && !state.descends_from(sha, current) => {
                Some(api_failure(422, "Update is not a fast forward"))
            }
            Some(_) => None,
        };
        if let Some(cause) = rejection {
            return Err(RefError::RefUpdate {
                repository: repository.clone(),
                reference: reference.to_owned(),
                force,
                cause,
            });
        }

        state.refs.insert(key, sha.to_owned());
        Ok(())
    }

    async fn delete_reference(
        &self,
        repository: &RepoCoordinate,
        reference: &str,
    ) -> Result<(), RefError> {
        let mut state = self.lock();
        state.calls.push(RefCall::Delete {
            reference: reference.to_owned(),
        });

        let key = (repository.clone(), reference.to_owned());
        let failure = state.delete_failure.clone().or_else(|| {
            (!state.refs.contains_key(&key)).then(|| api_failure(422, "Reference does not exist"))
        });
        if let Some(cause) = failure {
            return Err(RefError::RefDelete {
                repository: repository.clone(),
                reference: reference.to_owned(),
                cause,
            });
        }

        state.refs.remove(&key);
        Ok(())
    }
}

/// Deterministic token source yielding `1`, `2`, `3`, ...
#[derive(Debug, Default)]
pub struct SequenceTokenSource {
    next: AtomicU64,
}

impl TokenSource for SequenceTokenSource {
    fn next_token(&self) -> String {
        (self.next.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}
