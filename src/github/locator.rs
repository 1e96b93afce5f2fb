//! Repository coordinates, API base derivation, and GitHub route builders.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use super::error::SetupError;

/// Public GitHub API base used when no enterprise host is involved.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Characters left verbatim in a route segment: RFC 3986 unreserved only.
const ROUTE_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encodes each `/`-separated segment of a reference path.
///
/// Branch names may contain `#`, `%`, `?`, or spaces; left raw they would
/// truncate or corrupt the route and address a different branch.
fn encode_ref_path(ref_path: &str) -> String {
    ref_path
        .split('/')
        .map(|segment| utf8_percent_encode(segment, ROUTE_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidRepository`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, SetupError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SetupError::InvalidRepository);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidRepository`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, SetupError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SetupError::InvalidRepository);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Owner and name pair scoping every reference and commit operation.
///
/// # Example
///
/// ```
/// use refscope::github::locator::RepoCoordinate;
///
/// let repository = RepoCoordinate::new("acme", "widgets").expect("valid coordinate");
/// assert_eq!(repository.to_string(), "acme/widgets");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoCoordinate {
    owner: RepositoryOwner,
    name: RepositoryName,
}

impl RepoCoordinate {
    /// Builds a coordinate from owner and repository name strings.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidRepository`] when either part is blank.
    pub fn new(owner: &str, name: &str) -> Result<Self, SetupError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            name: RepositoryName::new(name)?,
        })
    }

    /// Parses an `<owner>/<name>` slug.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidRepository`] when the slug does not have
    /// exactly two non-empty segments.
    pub fn parse_slug(slug: &str) -> Result<Self, SetupError> {
        let mut segments = slug.trim().trim_end_matches(".git").split('/');
        let owner = segments.next().ok_or(SetupError::InvalidRepository)?;
        let name = segments.next().ok_or(SetupError::InvalidRepository)?;
        if segments.next().is_some() {
            return Err(SetupError::InvalidRepository);
        }
        Self::new(owner, name)
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }

    fn repos_prefix(&self) -> String {
        format!(
            "/repos/{}/{}",
            utf8_percent_encode(self.owner.as_str(), ROUTE_SEGMENT),
            utf8_percent_encode(self.name.as_str(), ROUTE_SEGMENT)
        )
    }

    /// Route for reading a single reference given its head path.
    pub(crate) fn git_ref_path(&self, head_path: &str) -> String {
        format!("{}/git/ref/{}", self.repos_prefix(), encode_ref_path(head_path))
    }

    /// Route for creating references.
    pub(crate) fn git_refs_path(&self) -> String {
        format!("{}/git/refs", self.repos_prefix())
    }

    /// Route for updating or deleting a reference given its head path.
    pub(crate) fn git_refs_entry_path(&self, head_path: &str) -> String {
        format!("{}/git/refs/{}", self.repos_prefix(), encode_ref_path(head_path))
    }

    /// Route for listing the commits of a pull request.
    pub(crate) fn pull_request_commits_path(&self, number: PullRequestNumber) -> String {
        format!("{}/pulls/{}/commits", self.repos_prefix(), number.get())
    }
}

impl fmt::Display for RepoCoordinate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.owner.as_str(), self.name.as_str())
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Validates that the number is positive.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidPullRequestNumber`] for zero.
    pub const fn new(value: u64) -> Result<Self, SetupError> {
        if value == 0 {
            return Err(SetupError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::MissingToken`] when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, SetupError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SetupError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(<redacted>)")
    }
}

/// Derives the GitHub API base URL from a host string.
fn derive_api_base_from_host(
    scheme: &str,
    host: &str,
    port: Option<u16>,
) -> Result<Url, SetupError> {
    if host.eq_ignore_ascii_case("github.com") {
        return Url::parse(GITHUB_API_BASE)
            .map_err(|error| SetupError::InvalidUrl(error.to_string()));
    }

    let authority = if host.contains(':') {
        format!("[{host}]")
    } else {
        host.to_owned()
    };
    let mut api_url = Url::parse(&format!("{scheme}://{authority}"))
        .map_err(|error| SetupError::InvalidUrl(error.to_string()))?;

    api_url
        .set_port(port)
        .map_err(|()| SetupError::InvalidUrl("invalid port".to_owned()))?;
    api_url.set_path("api/v3");
    Ok(api_url)
}

/// Repository coordinate paired with the API base it is served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    coordinate: RepoCoordinate,
}

impl RepositoryLocator {
    /// Creates a locator for a repository hosted on `github.com`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidUrl`] if the public API base cannot be
    /// parsed.
    pub fn on_github(coordinate: RepoCoordinate) -> Result<Self, SetupError> {
        Self::with_api_base(GITHUB_API_BASE, coordinate)
    }

    /// Creates a locator with an explicit API base.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidUrl`] when `api_base` is not a URL.
    pub fn with_api_base(api_base: &str, coordinate: RepoCoordinate) -> Result<Self, SetupError> {
        let parsed =
            Url::parse(api_base).map_err(|error| SetupError::InvalidUrl(error.to_string()))?;
        Ok(Self {
            api_base: parsed,
            coordinate,
        })
    }

    /// Parses a repository URL such as `https://github.com/<owner>/<repo>`.
    ///
    /// GitHub Enterprise hosts map to `<scheme>://<host>/api/v3`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::InvalidUrl`] when parsing fails and
    /// [`SetupError::InvalidRepository`] when the path is not `/owner/repo`.
    pub fn parse(input: &str) -> Result<Self, SetupError> {
        let parsed = Url::parse(input).map_err(|error| SetupError::InvalidUrl(error.to_string()))?;

        let mut segments = parsed
            .path_segments()
            .ok_or(SetupError::InvalidRepository)?;
        let owner = segments.next().ok_or(SetupError::InvalidRepository)?;
        let repository = segments.next().ok_or(SetupError::InvalidRepository)?;
        let coordinate = RepoCoordinate::new(owner, repository.trim_end_matches(".git"))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| SetupError::InvalidUrl("URL must include a host".to_owned()))?;
        let api_base = derive_api_base_from_host(parsed.scheme(), host, parsed.port())?;

        Ok(Self {
            api_base,
            coordinate,
        })
    }

    /// API base URL.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository coordinate.
    #[must_use]
    pub const fn coordinate(&self) -> &RepoCoordinate {
        &self.coordinate
    }
}
