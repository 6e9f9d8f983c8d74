//! Process-wide configuration and scoped retry overrides.
//!
//! The configuration is a snapshot behind an `Arc`; readers clone the `Arc`
//! and never hold the lock across an await. [`configure`] replaces the
//! snapshot as a whole.
//!
//! Retry coordinator overrides are task-local. A scope entered with
//! [`with_retry_coordinator`] or [`without_retry`] affects only the future it
//! wraps; concurrently running and spawned tasks keep the configured
//! coordinator.
//!
//! ```ignore
//! use hal_resource::{configure, without_retry};
//!
//! configure(|config| config.user_agent = "my-app/1.0".into());
//!
//! // A 5xx inside this scope is returned at once instead of retried.
//! let account = without_retry(client.find(&ACCOUNT, "42", &Params::new())).await?;
//! ```

use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use parking_lot::RwLock;

use crate::retry::{RetryCoordinatorFactory, default_retry_coordinator, null_retry_coordinator};

/// Default per-attempt timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Process-wide client settings.
#[derive(Clone)]
pub struct Configuration {
    /// Value of the `User-Agent` header on every request.
    pub user_agent: String,
    /// Builds the coordinator for each logical request.
    pub retry_coordinator: RetryCoordinatorFactory,
    /// Timeout applied to each individual attempt.
    pub request_timeout: Duration,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            user_agent: format!("hal-resource {}", env!("CARGO_PKG_VERSION")),
            retry_coordinator: default_retry_coordinator(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("user_agent", &self.user_agent)
            .field("retry_coordinator", &"<factory>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

static CONFIGURATION: OnceLock<RwLock<Arc<Configuration>>> = OnceLock::new();

fn global() -> &'static RwLock<Arc<Configuration>> {
    CONFIGURATION.get_or_init(|| RwLock::new(Arc::new(Configuration::default())))
}

/// The current configuration snapshot.
pub fn configuration() -> Arc<Configuration> {
    global().read().clone()
}

/// Replace the process-wide configuration.
///
/// The closure edits a copy of the current snapshot and runs with no lock
/// held, so it may call [`configuration`]. Requests already in flight keep
/// the snapshot they started with.
pub fn configure(update: impl FnOnce(&mut Configuration)) {
    let mut next = Configuration::clone(&configuration());
    update(&mut next);
    *global().write() = Arc::new(next);
}

tokio::task_local! {
    static RETRY_COORDINATOR_OVERRIDE: RetryCoordinatorFactory;
}

/// Run `future` with `factory` as the retry coordinator for every request it
/// makes.
pub async fn with_retry_coordinator<F>(factory: RetryCoordinatorFactory, future: F) -> F::Output
where
    F: Future,
{
    RETRY_COORDINATOR_OVERRIDE.scope(factory, future).await
}

/// Run `future` with retries disabled.
pub async fn without_retry<F>(future: F) -> F::Output
where
    F: Future,
{
    with_retry_coordinator(null_retry_coordinator(), future).await
}

/// The coordinator factory in effect for the current task: the innermost
/// scoped override, or the configured one.
pub fn current_retry_coordinator() -> RetryCoordinatorFactory {
    RETRY_COORDINATOR_OVERRIDE
        .try_with(Arc::clone)
        .unwrap_or_else(|_| configuration().retry_coordinator.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_user_agent_names_the_crate() {
        let config = Configuration::default();
        assert!(config.user_agent.starts_with("hal-resource "));
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn override_is_visible_only_inside_scope() {
        let null = null_retry_coordinator();
        let inside = with_retry_coordinator(null.clone(), async {
            Arc::ptr_eq(&current_retry_coordinator(), &null)
        })
        .await;

        assert!(inside);
        assert!(!Arc::ptr_eq(&current_retry_coordinator(), &null));
    }

    #[tokio::test]
    async fn override_does_not_reach_spawned_tasks() {
        let null = null_retry_coordinator();
        let spawned = with_retry_coordinator(null.clone(), async {
            let scoped = null.clone();
            tokio::spawn(async move { Arc::ptr_eq(&current_retry_coordinator(), &scoped) })
                .await
                .unwrap()
        })
        .await;

        assert!(!spawned);
    }

    #[test]
    fn configure_closure_can_read_the_current_snapshot() {
        configure(|config| {
            let current = configuration();
            config.request_timeout = current.request_timeout;
        });
        assert_eq!(configuration().request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }
}
