//! Error types for the transport layer.

use std::fmt;

/// Failures raised before a usable HTTP response was obtained.
///
/// Anything carried here means the server never answered (or the request
/// could not even be built). Responses with an error status are *not*
/// transport failures; they come back as a normal [`HttpResponse`].
///
/// [`HttpResponse`]: crate::http::HttpResponse
#[derive(Debug, Clone)]
pub enum NetworkError {
    /// The request could not be sent or its body could not be read.
    Request(String),
    /// Invalid URL provided.
    InvalidUrl(String),
    /// The attempt exceeded its timeout.
    Timeout,
    /// DNS failure, refused or reset connection.
    Connection(String),
    /// Invalid header name or value.
    InvalidHeader(String),
    /// The client could not be constructed.
    Build(String),
}

impl NetworkError {
    /// Whether the failure is a timeout or a connection-level problem.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Timeout | Self::Connection(_) | Self::Request(_))
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(msg) => write!(f, "HTTP request error: {msg}"),
            Self::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            Self::Timeout => write!(f, "Request timed out"),
            Self::Connection(msg) => write!(f, "Connection error: {msg}"),
            Self::InvalidHeader(msg) => write!(f, "Invalid header: {msg}"),
            Self::Build(msg) => write!(f, "Failed to build HTTP client: {msg}"),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_builder() {
            Self::Build(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<http::header::InvalidHeaderName> for NetworkError {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for NetworkError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

/// A specialized Result type for transport operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectivity_classes() {
        assert!(NetworkError::Timeout.is_connectivity());
        assert!(NetworkError::Connection("refused".into()).is_connectivity());
        assert!(!NetworkError::InvalidUrl("nope".into()).is_connectivity());
        assert!(!NetworkError::InvalidHeader("bad".into()).is_connectivity());
    }

    #[test]
    fn display_includes_detail() {
        let err = NetworkError::Connection("connection refused".into());
        assert_eq!(err.to_string(), "Connection error: connection refused");
    }
}
