//! HTTP response types.

use bytes::Bytes;

/// A fully buffered HTTP response.
///
/// Responses are read to completion by the transport so the caller can
/// classify the status and decode the body without holding a connection.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    status: u16,
    headers: http::HeaderMap,
    body: Bytes,
}

impl HttpResponse {
    /// Create a response from its parts.
    pub fn new(status: u16, headers: http::HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Create from a reqwest response, reading the whole body.
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> crate::Result<Self> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response headers.
    pub fn headers(&self) -> &http::HeaderMap {
        &self.headers
    }

    /// Get a specific header value.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Get the raw body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Whether the server sent a non-empty body.
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }
}
