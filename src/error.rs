//! Error types for the `link_sanitizer` crate.

/// All errors that can occur while sanitizing text or resolving photo albums.
///
/// Most variants are local to a single URL token and recoverable: the engine
/// falls back to a best-effort rewrite of that token and keeps going. Use
/// [`is_recoverable`](Self::is_recoverable) to tell them apart from failures
/// that abort the whole call.
#[derive(Debug, thiserror::Error)]
pub enum LinkSanitizerError {
    /// Transport-level failure (connect, TLS, timeout, redirect loop, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote end answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The photo manifest API reported an application-level failure.
    #[error("photo manifest rejected (code {code}): {msg}")]
    Manifest { code: i64, msg: String },

    /// The photo manifest decoded fine but listed no images.
    #[error("photo manifest lists no images")]
    EmptyManifest,

    /// The photo manifest body was not the expected JSON shape.
    #[error("photo manifest decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// A downloaded image could not be written to the cache directory.
    #[error("Cache write failed: {0}")]
    CacheWrite(#[source] std::io::Error),

    /// The input text could not be read at all.
    #[error("failed to read input: {0}")]
    Input(#[source] std::io::Error),

    /// The builder configuration is invalid.
    #[error("Config error: {0}")]
    Config(String),

    /// [`init`](crate::init) was called more than once.
    #[error("global LinkSanitizer already initialized")]
    AlreadyInitialized,
}

impl LinkSanitizerError {
    /// Whether processing can continue past this error with a fallback.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Input(_) | Self::Config(_) | Self::AlreadyInitialized
        )
    }
}

/// A type alias for `Result<T, LinkSanitizerError>`.
pub type Result<T> = std::result::Result<T, LinkSanitizerError>;
