//! HTTP request types.

use std::time::Duration;

use bytes::Bytes;

/// HTTP request methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method.
    Get,
    /// HTTP POST method.
    Post,
    /// HTTP PUT method.
    Put,
    /// HTTP DELETE method.
    Delete,
    /// HTTP PATCH method.
    Patch,
    /// HTTP HEAD method.
    Head,
    /// HTTP OPTIONS method.
    Options,
}

impl HttpMethod {
    /// Methods that may be repeated without changing the outcome beyond the
    /// first successful application. POST is deliberately absent.
    pub const IDEMPOTENT: [HttpMethod; 6] = [
        Self::Get,
        Self::Head,
        Self::Put,
        Self::Delete,
        Self::Options,
        Self::Patch,
    ];

    /// Whether the method belongs to [`HttpMethod::IDEMPOTENT`].
    pub fn is_idempotent(self) -> bool {
        Self::IDEMPOTENT.contains(&self)
    }

    /// Convert to reqwest method.
    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Patch => reqwest::Method::PATCH,
            Self::Head => reqwest::Method::HEAD,
            Self::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
            Self::Patch => write!(f, "PATCH"),
            Self::Head => write!(f, "HEAD"),
            Self::Options => write!(f, "OPTIONS"),
        }
    }
}

/// A fully built request, ready to hand to a [`Transport`].
///
/// The body is already serialized; the transport never looks inside it.
///
/// [`Transport`]: super::Transport
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// Absolute request URL, query string included.
    pub url: String,
    /// Request headers. Lookups are case-insensitive.
    pub headers: http::HeaderMap,
    /// Serialized request body.
    pub body: Option<Bytes>,
    /// Timeout for this attempt only.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Create a request with no headers, body or timeout override.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: http::HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Add a header, replacing any previous value with the same name.
    ///
    /// Invalid names or values are ignored.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Set the serialized body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a timeout for this attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
