//! URL parsing and identity wrappers for the monitored pull request.

use std::fmt;

use url::Url;

use super::error::MonitorError;

const GITHUB_HOSTS: [&str; 2] = ["github.com", "www.github.com"];

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, MonitorError> {
        if value.is_empty() {
            return Err(MonitorError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
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
    pub(crate) fn new(value: &str) -> Result<Self, MonitorError> {
        if value.is_empty() {
            return Err(MonitorError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Parses a path segment made only of ASCII digits.
    fn parse(segment: &str) -> Result<Self, MonitorError> {
        if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(MonitorError::InvalidPullRequestNumber);
        }
        segment
            .parse::<u64>()
            .map(Self)
            .map_err(|_| MonitorError::InvalidPullRequestNumber)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// GitHub personal access token used for bearer authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Trims whitespace from the token; a blank token yields `None`, which
    /// the gateway treats as unauthenticated access.
    #[must_use]
    pub fn new(token: impl AsRef<str>) -> Option<Self> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
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
        formatter.write_str("PersonalAccessToken(***)")
    }
}

/// Immutable reference to one pull request on github.com.
///
/// Two locators are equal when owner, repository, and number match, so a
/// locator can key a map or set.
///
/// # Example
///
/// ```
/// use prwatch::github::PullRequestLocator;
///
/// let locator = PullRequestLocator::parse("https://github.com/octo/repo/pull/12/")
///     .expect("should parse pull request URL");
/// assert_eq!(locator.owner().as_str(), "octo");
/// assert_eq!(locator.repository().as_str(), "repo");
/// assert_eq!(locator.number().get(), 12);
/// assert_eq!(locator.to_string(), "octo/repo#12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PullRequestLocator {
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: PullRequestNumber,
}

impl PullRequestLocator {
    /// Builds a locator from its parts.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::MissingPathSegments` when owner or repository is
    /// empty.
    pub fn new(owner: &str, repository: &str, number: u64) -> Result<Self, MonitorError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repository)?,
            number: PullRequestNumber(number),
        })
    }

    /// Parses a GitHub pull request URL in the form
    /// `https://github.com/<owner>/<repo>/pull/<number>`, optionally with a
    /// `www.` host prefix and a trailing slash.
    ///
    /// Owner and repository may be any non-empty segment; GitHub enforces
    /// its own naming rules. Query strings and fragments are ignored.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::InvalidUrl` when the input is not a URL,
    /// `UnsupportedHost` when the host is not github.com or the URL carries
    /// credentials, `MissingPathSegments` when the path is not
    /// `/owner/repo/pull/<number>`,
    /// and `InvalidPullRequestNumber` when the final segment is not made of
    /// digits.
    pub fn parse(input: &str) -> Result<Self, MonitorError> {
        let parsed =
            Url::parse(input).map_err(|error| MonitorError::InvalidUrl(error.to_string()))?;

        let host = parsed.host_str().unwrap_or_default();
        let has_userinfo = !parsed.username().is_empty() || parsed.password().is_some();
        if has_userinfo {
            return Err(MonitorError::UnsupportedHost {
                host: format!("{}@{host}", parsed.username()),
            });
        }
        if !GITHUB_HOSTS.contains(&host) || parsed.port().is_some() {
            return Err(MonitorError::UnsupportedHost {
                host: host.to_owned(),
            });
        }

        let segments: Vec<&str> = parsed
            .path_segments()
            .ok_or(MonitorError::MissingPathSegments)?
            .collect();

        let [owner_segment, repository_segment, marker, number_segment, rest @ ..] =
            segments.as_slice()
        else {
            return Err(MonitorError::MissingPathSegments);
        };

        // A single trailing slash yields one empty segment.
        if marker != &"pull" || !matches!(rest, [] | [""]) {
            return Err(MonitorError::MissingPathSegments);
        }

        if number_segment.is_empty() {
            return Err(MonitorError::MissingPathSegments);
        }

        Ok(Self {
            owner: RepositoryOwner::new(owner_segment)?,
            repository: RepositoryName::new(repository_segment)?,
            number: PullRequestNumber::parse(number_segment)?,
        })
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    fn repository_path(&self) -> String {
        format!("/repos/{}/{}", self.owner.as_str(), self.repository.as_str())
    }

    pub(crate) fn pull_request_path(&self) -> String {
        format!("{}/pulls/{}", self.repository_path(), self.number.get())
    }

    pub(crate) fn reviews_path(&self) -> String {
        format!("{}/reviews", self.pull_request_path())
    }

    pub(crate) fn commit_status_path(&self, sha: &str) -> String {
        format!("{}/commits/{sha}/status", self.repository_path())
    }

    pub(crate) fn check_runs_path(&self, sha: &str) -> String {
        format!("{}/commits/{sha}/check-runs", self.repository_path())
    }
}

impl fmt::Display for PullRequestLocator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}/{}#{}",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }
}
