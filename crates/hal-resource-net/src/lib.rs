//! Transport layer for hal-resource.
//!
//! This crate owns everything between a built request and a buffered
//! response:
//!
//! - **[`HttpMethod`]**: verbs, including the fixed idempotent set used for
//!   retry decisions
//! - **[`HttpRequest`] / [`HttpResponse`]**: plain data, headers kept in a
//!   case-insensitive [`http::HeaderMap`]
//! - **[`Transport`]**: the trait the resource engine sends through
//! - **[`HttpClient`]**: a `reqwest` implementation with per-attempt
//!   timeouts and redirect following disabled
//!
//! ```ignore
//! use hal_resource_net::{HttpClient, HttpMethod, HttpRequest, Transport};
//!
//! let client = HttpClient::new()?;
//! let response = client
//!     .send(HttpRequest::new(HttpMethod::Get, "https://api.example.com/"))
//!     .await?;
//! ```

mod error;
pub mod http;

pub use error::{NetworkError, Result};

pub use http::{
    HttpClient, HttpClientBuilder, HttpClientConfig, HttpMethod, HttpRequest, HttpResponse,
    Transport,
};
