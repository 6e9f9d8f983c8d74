//! Error taxonomy and response classification.
//!
//! Every failed attempt is mapped into exactly one [`ResourceError`] class:
//!
//! | Outcome | Class | Retry-eligible |
//! |---------|-------|----------------|
//! | transport failed before a response | [`ResourceError::Connectivity`] | yes |
//! | request could not be built or sent | [`ResourceError::Request`] | no |
//! | body present but not valid JSON | [`ResourceError::Response`] | no |
//! | 1xx or any other unclassifiable status | [`ResourceError::Response`] | no |
//! | 3xx | [`ResourceError::UnsupportedRedirect`] | no |
//! | 4xx | [`ResourceError::Client`] | no |
//! | 5xx | [`ResourceError::Server`] | yes |
//!
//! Whether an eligible error is actually retried is up to the active
//! [`RetryCoordinator`](crate::retry::RetryCoordinator).

use std::fmt;

use bytes::Bytes;
use hal_resource_net::{HttpMethod, HttpResponse, NetworkError};
use serde_json::Value;

use crate::schema::RelationKind;

/// A specialized Result type for resource operations.
pub type Result<T> = std::result::Result<T, ResourceError>;

/// Errors produced by resource operations.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// The transport failed before a response was obtained.
    #[error("{method} {url} failed before a response was received: {source}")]
    Connectivity {
        method: HttpMethod,
        url: String,
        #[source]
        source: NetworkError,
    },

    /// The request was rejected locally, for example an invalid header or
    /// URL, so no attempt reached the network.
    #[error("{method} {url} could not be sent: {source}")]
    Request {
        method: HttpMethod,
        url: String,
        #[source]
        source: NetworkError,
    },

    /// A response was obtained but could not be classified, or its body did
    /// not parse.
    #[error(transparent)]
    Response(ResponseError),

    /// The server answered with a 4xx status.
    #[error(transparent)]
    Client(ResponseError),

    /// The server answered with a 5xx status.
    #[error(transparent)]
    Server(ResponseError),

    /// The server answered with a 3xx status. Redirects are never followed.
    #[error(transparent)]
    UnsupportedRedirect(ResponseError),

    /// The root and href of a resource do not form a valid URL.
    #[error("Invalid resource URL '{href}': {message}")]
    InvalidUrl { href: String, message: String },

    /// The request body could not be serialized.
    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The default transport could not be constructed.
    #[error("Failed to configure transport: {0}")]
    Transport(#[source] NetworkError),

    /// The resource schema has no relation of the requested kind.
    #[error("{resource} does not declare a {expected} relation named '{relation}'")]
    UndeclaredRelation {
        resource: &'static str,
        relation: String,
        expected: RelationKind,
    },

    /// The loaded document has no link for a relation that needs one.
    #[error("{resource} has no '{relation}' link")]
    MissingLink { resource: String, relation: String },

    /// A credential is configured but yields no bearer value.
    #[error("Credential for '{href}' has no bearer token")]
    MissingCredential { href: String },
}

impl ResourceError {
    /// The response details for the four response-derived classes.
    pub fn response(&self) -> Option<&ResponseError> {
        match self {
            Self::Response(err)
            | Self::Client(err)
            | Self::Server(err)
            | Self::UnsupportedRedirect(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of the response that caused this error, if any.
    pub fn status(&self) -> Option<u16> {
        self.response().map(ResponseError::status)
    }

    /// Whether this is a 404 client error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Client(err) if err.status() == 404)
    }

    /// Whether the error belongs to a class the default policy retries.
    pub fn is_retry_eligible(&self) -> bool {
        matches!(self, Self::Server(_) | Self::Connectivity { .. })
    }
}

/// Details of a response that was received but is not a success.
///
/// The display message is assembled from a base message followed by the
/// body's `error` and `message` fields in parentheses, or by the raw body
/// when it never parsed.
#[derive(Debug)]
pub struct ResponseError {
    status: u16,
    raw_body: Bytes,
    body: Option<Value>,
    message: String,
    source: Option<serde_json::Error>,
}

impl ResponseError {
    /// Build response error details, assembling the display message.
    pub fn new(
        message: impl Into<String>,
        status: u16,
        raw_body: Bytes,
        body: Option<Value>,
        source: Option<serde_json::Error>,
    ) -> Self {
        let mut message = message.into();
        match &body {
            Some(parsed) => {
                if let Some(error) = parsed.get("error").filter(|v| !v.is_null()) {
                    message = format!("{message} ({})", display_value(error));
                }
                if let Some(detail) = parsed.get("message").filter(|v| !v.is_null()) {
                    message = format!("{message} ({})", display_value(detail));
                }
            }
            None if !raw_body.is_empty() => {
                message = format!("{message} ({})", String::from_utf8_lossy(&raw_body));
            }
            None => {}
        }

        Self {
            status,
            raw_body,
            body,
            message,
            source,
        }
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The body exactly as received.
    pub fn raw_body(&self) -> &Bytes {
        &self.raw_body
    }

    /// The parsed body, if it was valid JSON.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The assembled human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ResponseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Classify a received response.
///
/// The body is decoded before the status is looked at, so an unparseable
/// body is always a [`ResourceError::Response`], whatever the status. An
/// empty body decodes to `None`.
pub fn classify_response(response: &HttpResponse) -> Result<Option<Value>> {
    let status = response.status();
    let raw_body = response.body().clone();

    let body = if response.has_body() {
        match serde_json::from_slice::<Value>(&raw_body) {
            Ok(value) => Some(value),
            Err(err) => {
                return Err(ResourceError::Response(ResponseError::new(
                    "Error when deserializing response body",
                    status,
                    raw_body,
                    None,
                    Some(err),
                )));
            }
        }
    } else {
        None
    };

    match status / 100 {
        2 => Ok(body),
        3 => Err(ResourceError::UnsupportedRedirect(ResponseError::new(
            format!("{status} redirects are not supported"),
            status,
            raw_body,
            body,
            None,
        ))),
        4 => Err(ResourceError::Client(ResponseError::new(
            status.to_string(),
            status,
            raw_body,
            body,
            None,
        ))),
        5 => Err(ResourceError::Server(ResponseError::new(
            status.to_string(),
            status,
            raw_body,
            body,
            None,
        ))),
        _ => Err(ResourceError::Response(ResponseError::new(
            format!("Unexpected status {status}"),
            status,
            raw_body,
            body,
            None,
        ))),
    }
}

/// Classify a transport failure.
///
/// Only timeouts and connection-level failures count as connectivity
/// problems; anything else is a [`ResourceError::Request`].
pub fn classify_transport(method: HttpMethod, url: &str, source: NetworkError) -> ResourceError {
    let url = url.to_string();
    if source.is_connectivity() {
        ResourceError::Connectivity {
            method,
            url,
            source,
        }
    } else {
        ResourceError::Request {
            method,
            url,
            source,
        }
    }
}
