//! The transport seam between the resource engine and the network.

use async_trait::async_trait;

use super::client::HttpClient;
use super::request::HttpRequest;
use super::response::HttpResponse;
use crate::error::Result;

/// Sends a single request attempt.
///
/// Implementations report a [`NetworkError`] only when no response was
/// obtained. Any status code, including 4xx and 5xx, is a successful send.
/// Retrying is never the transport's job.
///
/// [`NetworkError`]: crate::NetworkError
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and buffer the full response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = url::Url::parse(&request.url)?;

        tracing::trace!(
            target: "hal_resource_net::http",
            method = %request.method,
            %url,
            "sending request"
        );

        let mut builder = self
            .reqwest_client()
            .request(request.method.to_reqwest(), url)
            .headers(request.headers);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let response = HttpResponse::from_reqwest(response).await?;

        tracing::trace!(
            target: "hal_resource_net::http",
            status = response.status(),
            bytes = response.body().len(),
            "received response"
        );

        Ok(response)
    }
}
