//! Resilient client for hypermedia (HAL) REST APIs.
//!
//! Resources are JSON documents with attributes, `_links` to related
//! resources and `_embedded` sub-resources. This crate loads them into
//! [`ResourceNode`]s, follows declared relations lazily, walks paginated
//! collections and retries transient failures.
//!
//! # Overview
//!
//! - **[`ResourceClient`]**: root URL, credential, transport and the
//!   registry of resource types
//! - **[`ResourceType`] / [`Relation`]**: static descriptions of resource
//!   variants and the relations they declare
//! - **[`ResourceNode`]**: one document, loaded on first access
//! - **[`Paginator`]**: eager or streamed traversal of `next` links
//! - **[`RetryCoordinator`]**: pluggable retry policy, overridable per task
//!
//! # Example
//!
//! ```ignore
//! use hal_resource::{Params, Relation, ResourceClient, ResourceType};
//!
//! static ACCOUNT: ResourceType = ResourceType::new("Api", "Account")
//!     .with_relations(&[Relation::has_many("mainframes").of("Mainframe")]);
//! static MAINFRAME: ResourceType = ResourceType::new("Api", "Mainframe")
//!     .with_relations(&[Relation::belongs_to("account").of("Account")]);
//!
//! let client = ResourceClient::builder("https://api.example.com")
//!     .namespace("Api")
//!     .credential("token")
//!     .register(&ACCOUNT)
//!     .register(&MAINFRAME)
//!     .build()?;
//!
//! if let Some(mut account) = client.find(&ACCOUNT, 1, &Params::new()).await? {
//!     for mainframe in account.related_many("mainframes").await?.unwrap_or_default() {
//!         println!("{:?}", mainframe.attribute("handle"));
//!     }
//! }
//! ```
//!
//! # Retries
//!
//! Server errors and connectivity failures of idempotent requests are
//! retried after 200ms, 800ms and 2s. POST is never retried. Use
//! [`without_retry`] or [`with_retry_coordinator`] to change the policy for
//! one task, or [`configure`] to change it for the process.

mod client;
mod config;
mod credential;
mod document;
mod error;
mod error_record;
mod executor;
mod inflect;
pub mod logging;
mod model;
mod node;
mod paginator;
mod params;
mod relations;
mod resolver;
mod retry;
mod schema;

pub use client::{ResourceClient, ResourceClientBuilder};
pub use config::{
    Configuration, DEFAULT_REQUEST_TIMEOUT, configuration, configure, current_retry_coordinator,
    with_retry_coordinator, without_retry,
};
pub use credential::{ACCESS_TOKEN_ATTRIBUTE, AccessToken, Credential};
pub use document::{Embedded, LinkDescriptor};
pub use error::{ResourceError, ResponseError, Result, classify_response};
pub use error_record::ErrorRecord;
pub use executor::MAX_ATTEMPTS;
pub use inflect::{camelize, pluralize};
pub use node::{LoadState, ResourceNode};
pub use paginator::{EntryStream, Page, PageStream, Paginator};
pub use params::{ParamValue, Params};
pub use resolver::{TypeRegistry, type_hint};
pub use retry::{
    DefaultRetryCoordinator, NullRetryCoordinator, RetryCoordinator, RetryCoordinatorFactory,
    RetrySchedule, default_retry_coordinator, null_retry_coordinator,
};
pub use schema::{GENERIC_RESOURCE, Relation, RelationKind, Resource, ResourceType};

pub use hal_resource_net::{
    HttpClient, HttpMethod, HttpRequest, HttpResponse, NetworkError, Transport,
};
