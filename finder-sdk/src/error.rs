//! Common error types for the meeting finder SDK

use thiserror::Error;

/// Common result type for SDK operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised by the network collaborator.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection-level failure (DNS, TLS, timeout, refused)
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success HTTP status
    #[error("HTTP status {status}: {message}")]
    Http { status: u16, message: String },
}

/// Errors raised while decoding a backend response.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The top-level response body is not parseable JSON. Individual
    /// malformed meeting or format records never raise this; they are
    /// dropped record-by-record instead.
    #[error("response is not valid JSON: {0}")]
    JsonParseFailure(String),
}

/// Top-level error taxonomy surfaced through the search completion channel.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Missing or malformed configuration (typically the server root URL).
    /// Detected before any network activity.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network or HTTP failure. Never retried automatically.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Top-level response decode failure. Always paired with an empty
    /// (not absent) data set in the search outcome.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O failure while loading configuration files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
