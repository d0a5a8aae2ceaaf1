//! Classification of GitHub responses and Octocrab failures.

use http::StatusCode;

use crate::github::error::MonitorError;
use crate::github::rate_limit::RateLimitInfo;

use super::http_utils::error_message;

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// A 403 only signals rate limiting when GitHub reports zero remaining quota.
pub(super) fn exhausted_rate_limit(
    status: StatusCode,
    rate_limit: Option<RateLimitInfo>,
) -> Option<RateLimitInfo> {
    rate_limit.filter(|info| status == StatusCode::FORBIDDEN && info.is_exhausted())
}

/// Maps a non-success response onto the error taxonomy.
///
/// 404 becomes `NotFound`, 403 with an exhausted quota becomes
/// `RateLimitExceeded`, and every other status at or above 400 becomes `Api`
/// carrying the status and body.
pub(super) fn map_http_error(
    resource: &str,
    status: StatusCode,
    rate_limit: Option<RateLimitInfo>,
    body: &str,
) -> MonitorError {
    if status == StatusCode::NOT_FOUND {
        return MonitorError::NotFound {
            resource: resource.to_owned(),
        };
    }

    if let Some(info) = exhausted_rate_limit(status, rate_limit) {
        return MonitorError::RateLimitExceeded { rate_limit: info };
    }

    MonitorError::Api {
        status: status.as_u16(),
        message: error_message(body),
    }
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> MonitorError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return MonitorError::Api {
            status: source.status_code.as_u16(),
            message: format!("{operation} failed: {message}", message = source.message),
        };
    }

    if is_network_error(error) {
        return MonitorError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    MonitorError::Client {
        message: format!("{operation} failed: {error}"),
    }
}
