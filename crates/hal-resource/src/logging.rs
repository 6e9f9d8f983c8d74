//! Logging targets for hal-resource.
//!
//! All diagnostics go through `tracing`. Nothing is printed unless the
//! application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("hal_resource=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Request execution and the retry loop.
    pub const EXECUTOR: &str = "hal_resource::executor";
    /// Retry coordinator decisions and backoff.
    pub const RETRY: &str = "hal_resource::retry";
    /// Collection pagination.
    pub const PAGINATOR: &str = "hal_resource::paginator";
    /// Type hint resolution.
    pub const RESOLVER: &str = "hal_resource::resolver";
    /// Lazy relation loading.
    pub const RELATIONS: &str = "hal_resource::relations";
    /// The reqwest transport.
    pub const TRANSPORT: &str = "hal_resource_net::http";
}
