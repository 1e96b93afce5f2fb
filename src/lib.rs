//! Refscope library crate for scoped GitHub branch operations.
//!
//! The library wraps Octocrab to manipulate branches through the Git
//! references API, to run work against temporary branches that are deleted
//! whatever the outcome, and to retrieve the commit history of a pull
//! request.

pub mod config;
pub mod github;

pub use config::RefscopeConfig;
pub use github::{
    CommitDetails, CommitHistory, OctocrabCommitGateway, OctocrabRefGateway, PersonalAccessToken,
    RefError, RefGateway, RepoCoordinate, SetupError, TemporaryRef, TemporaryRefManager,
};
