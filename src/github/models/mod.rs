//! Data models for Git references and pull request commits.
//!
//! Types prefixed with `Api` are deserialisation targets (or request bodies)
//! for the GitHub REST API; they convert into the public domain types.

use serde::{Deserialize, Serialize};

/// Name, email, and timestamp recorded for a commit author or committer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSignature {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Timestamp (ISO 8601 format).
    pub date: Option<String>,
}

/// Normalised commit record from a pull request's history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitDetails {
    /// Commit SHA.
    pub sha: String,
    /// SHA of the tree the commit points at.
    pub tree_sha: String,
    /// Author signature, when GitHub reports one.
    pub author: Option<CommitSignature>,
    /// Committer signature, when GitHub reports one.
    pub committer: Option<CommitSignature>,
    /// Full commit message.
    pub message: String,
}

/// Response body of the single reference endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiGitRef {
    #[serde(rename = "ref")]
    pub(crate) name: String,
    pub(crate) object: ApiGitObject,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiGitObject {
    pub(crate) sha: String,
    #[serde(rename = "type")]
    pub(crate) kind: Option<String>,
}

/// Request body for reference creation.
#[derive(Debug, Serialize)]
pub(crate) struct ApiCreateRef<'a> {
    #[serde(rename = "ref")]
    pub(crate) reference: &'a str,
    pub(crate) sha: &'a str,
}

/// Request body for reference updates.
#[derive(Debug, Serialize)]
pub(crate) struct ApiUpdateRef<'a> {
    pub(crate) sha: &'a str,
    pub(crate) force: bool,
}

/// Entry of the pull request commit listing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestCommit {
    pub(crate) sha: String,
    pub(crate) commit: ApiCommitData,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCommitData {
    pub(crate) tree: ApiTree,
    pub(crate) author: Option<ApiSignature>,
    pub(crate) committer: Option<ApiSignature>,
    #[serde(default)]
    pub(crate) message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiTree {
    pub(crate) sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiSignature {
    pub(crate) name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) date: Option<String>,
}

impl From<ApiSignature> for CommitSignature {
    fn from(value: ApiSignature) -> Self {
        Self {
            name: value.name,
            email: value.email,
            date: value.date,
        }
    }
}

impl From<ApiPullRequestCommit> for CommitDetails {
    fn from(value: ApiPullRequestCommit) -> Self {
        let ApiPullRequestCommit { sha, commit } = value;
        Self {
            sha,
            tree_sha: commit.tree.sha,
            author: commit.author.map(CommitSignature::from),
            committer: commit.committer.map(CommitSignature::from),
            message: commit.message,
        }
    }
}
