//! HTTP transport for hal-resource.
//!
//! The engine talks to the network only through the [`Transport`] trait.
//! [`HttpClient`] is the production implementation; tests substitute their
//! own.
//!
//! # Example
//!
//! ```ignore
//! use hal_resource_net::http::{HttpClient, HttpMethod, HttpRequest, Transport};
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! let request = HttpRequest::new(HttpMethod::Get, "https://api.example.com/accounts")
//!     .header("Accept", "application/hal+json");
//! let response = client.send(request).await?;
//! println!("Status: {}", response.status());
//! ```

mod client;
mod request;
mod response;
mod transport;

pub use client::{HttpClient, HttpClientBuilder, HttpClientConfig};
pub use request::{HttpMethod, HttpRequest};
pub use response::HttpResponse;
pub use transport::Transport;
