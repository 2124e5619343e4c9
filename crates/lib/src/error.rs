//! SDK error type.

/// Errors surfaced by DevKit calls.
///
/// The first group is raised synchronously at call time. `Transport` covers
/// network-level failures only: a webhook response with a non-2xx status is
/// handed back to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum DevKitError {
    #[error("devkit not initialized: call init with a token before using authenticated helpers")]
    NotInitialized,
    #[error("missing query parameter: {0}")]
    MissingUserId(String),
    #[error("devkit is not supported outside a browser host context")]
    UnsupportedEnvironment,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = DevKitError> = std::result::Result<T, E>;
