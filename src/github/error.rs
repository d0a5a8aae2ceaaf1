//! Error types exposed by the GitHub monitoring layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while parsing input, talking to GitHub, or assembling a
/// status snapshot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MonitorError {
    /// The CLI did not include a pull request URL.
    #[error("pull request URL is required")]
    MissingPullRequestUrl,

    /// The provided URL could not be parsed.
    #[error("pull request URL is invalid: {0}")]
    InvalidUrl(String),

    /// The URL points somewhere other than github.com.
    #[error("not a GitHub URL: host {host} is not github.com")]
    UnsupportedHost {
        /// Host found in the URL.
        host: String,
    },

    /// The pull request path is incomplete or has the wrong shape.
    #[error("pull request URL must match /owner/repo/pull/<number>")]
    MissingPathSegments,

    /// The pull request number is not a valid integer.
    #[error("pull request number must be a non-negative integer")]
    InvalidPullRequestNumber,

    /// GitHub answered 404 for the requested resource.
    #[error("resource not found: {resource}")]
    NotFound {
        /// API path that could not be found.
        resource: String,
    },

    /// Rate limit exhausted: GitHub answered 403 with zero remaining quota.
    #[error("GitHub API rate limit exceeded (resets at {reset})", reset = .rate_limit.reset_at())]
    RateLimitExceeded {
        /// Quota details taken from the response headers.
        rate_limit: RateLimitInfo,
    },

    /// GitHub returned any other error status.
    #[error("GitHub API error ({status}): {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Response body returned with the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A payload was missing required fields or had an unexpected shape.
    #[error("malformed GitHub response: {message}")]
    MalformedResponse {
        /// Which payload failed and why.
        message: String,
    },

    /// The HTTP client could not be constructed or used.
    #[error("GitHub client error: {message}")]
    Client {
        /// Error detail reported by the client.
        message: String,
    },

    /// Invalid pagination state.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Configuration could not be loaded or is out of range.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl MonitorError {
    /// Returns true when the error came from parsing the pull request URL.
    #[must_use]
    pub const fn is_invalid_reference(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl(_)
                | Self::UnsupportedHost { .. }
                | Self::MissingPathSegments
                | Self::InvalidPullRequestNumber
        )
    }

    /// HTTP status code associated with the error, if any.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::RateLimitExceeded { .. } => Some(403),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
