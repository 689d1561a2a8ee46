use thiserror::Error;

/// Errors surfaced by the Agent VM SDK.
///
/// Transport problems are passed through from the HTTP layer unchanged, and
/// service rejections carry the raw status and body. The SDK never retries or
/// reinterprets a failure on the caller's behalf.
#[derive(Error, Debug)]
pub enum SdkError {
    /// The request never produced a usable response (connection, DNS,
    /// timeout, or body decode failure).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Service { status: u16, body: String },

    /// The SDK is missing something it needs, such as an optional
    /// integration that was not compiled in.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Convenience result type used across the SDK.
pub type Result<T> = std::result::Result<T, SdkError>;
