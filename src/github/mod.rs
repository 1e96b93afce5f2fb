//! GitHub reference primitives and pull request commit history.
//!
//! This module wraps Octocrab to read, create, move, and delete branches, to
//! run work against short-lived temporary branches that are always cleaned
//! up, and to list the commits of a pull request. GitHub failures are logged
//! where they happen and surfaced as [`RefError`] values that carry the
//! repository, the reference, and the classified cause.

pub mod error;
pub mod gateway;
pub mod history;
pub mod locator;
pub mod models;
pub mod naming;
pub mod temporary;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{RefError, RemoteFailure, SetupError};
pub use gateway::{CommitGateway, OctocrabCommitGateway, OctocrabRefGateway, RefGateway};
pub use history::CommitHistory;
pub use locator::{
    PersonalAccessToken, PullRequestNumber, RepoCoordinate, RepositoryLocator, RepositoryName,
    RepositoryOwner,
};
pub use models::{CommitDetails, CommitSignature};
pub use naming::{TokenSource, UuidTokenSource};
pub use temporary::{TemporaryRef, TemporaryRefManager};

#[cfg(test)]
pub use gateway::{MockCommitGateway, MockRefGateway};
