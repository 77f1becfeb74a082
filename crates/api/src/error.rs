//! Error taxonomy for remote calls.

use thiserror::Error;

/// Errors surfaced by the remote course API.
///
/// `Shape` is produced at the decode boundary; on the progress and
/// chapter-list paths it is downgraded to an empty result before it
/// reaches callers (defensive parsing), so it only escapes where a
/// default value would be meaningless.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request failed with status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response body: {0}")]
    Shape(String),

    #[error(transparent)]
    Network(#[from] reqwest::Error),
}
