//! Client setup errors.

use thiserror::Error;

/// Errors raised while building the HTTP strategy.
///
/// Failures of individual calls are reported as
/// `pennyplan_core::allocation::StrategyError` instead.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured endpoint is not an absolute http(s) URL.
    #[error("Invalid allocation endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// Endpoint as configured.
        endpoint: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}
