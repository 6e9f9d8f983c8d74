//! Pluggable retry coordination.
//!
//! A coordinator is created for every logical request and asked, after each
//! failed attempt, whether to try again. It may sleep before answering; that
//! delay is the backoff.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hal_resource_net::HttpMethod;

use crate::error::ResourceError;
use crate::logging::targets;
use crate::node::ResourceNode;

/// Builds a coordinator for one logical request on a node.
pub type RetryCoordinatorFactory =
    Arc<dyn Fn(&ResourceNode) -> Box<dyn RetryCoordinator> + Send + Sync>;

/// Decides whether a failed attempt is tried again.
#[async_trait]
pub trait RetryCoordinator: Send {
    /// Called once per failed attempt. Returning `true` re-runs the request.
    async fn should_retry(&mut self, method: HttpMethod, error: &ResourceError) -> bool;
}

/// Delays consumed front to back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetrySchedule {
    delays: VecDeque<Duration>,
}

impl RetrySchedule {
    /// A schedule with the given delays.
    pub fn new(delays: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            delays: delays.into_iter().collect(),
        }
    }

    /// Take the next delay.
    pub fn next_delay(&mut self) -> Option<Duration> {
        self.delays.pop_front()
    }

    /// Whether no delays remain.
    pub fn is_exhausted(&self) -> bool {
        self.delays.is_empty()
    }

    /// Delays not yet taken.
    pub fn remaining(&self) -> usize {
        self.delays.len()
    }
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::new([
            Duration::from_millis(200),
            Duration::from_millis(800),
            Duration::from_secs(2),
        ])
    }
}

/// Retries server and connectivity errors of idempotent requests on a fixed
/// schedule.
#[derive(Debug)]
pub struct DefaultRetryCoordinator {
    href: String,
    schedule: RetrySchedule,
}

impl DefaultRetryCoordinator {
    /// A coordinator with the default schedule.
    pub fn new(node: &ResourceNode) -> Self {
        Self::with_schedule(node, RetrySchedule::default())
    }

    /// A coordinator with a custom schedule.
    pub fn with_schedule(node: &ResourceNode, schedule: RetrySchedule) -> Self {
        Self {
            href: node.href().to_string(),
            schedule,
        }
    }
}

#[async_trait]
impl RetryCoordinator for DefaultRetryCoordinator {
    async fn should_retry(&mut self, method: HttpMethod, error: &ResourceError) -> bool {
        if !method.is_idempotent() || !error.is_retry_eligible() {
            return false;
        }

        let Some(delay) = self.schedule.next_delay() else {
            tracing::debug!(
                target: targets::RETRY,
                %method,
                href = %self.href,
                "retry schedule exhausted"
            );
            return false;
        };

        tracing::warn!(
            target: targets::RETRY,
            %method,
            href = %self.href,
            delay_ms = delay.as_millis() as u64,
            remaining = self.schedule.remaining(),
            error = %error,
            "retrying request"
        );
        tokio::time::sleep(delay).await;
        true
    }
}

/// Never retries.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRetryCoordinator;

#[async_trait]
impl RetryCoordinator for NullRetryCoordinator {
    async fn should_retry(&mut self, _method: HttpMethod, _error: &ResourceError) -> bool {
        false
    }
}

/// Factory for [`DefaultRetryCoordinator`].
pub fn default_retry_coordinator() -> RetryCoordinatorFactory {
    Arc::new(|node: &ResourceNode| {
        Box::new(DefaultRetryCoordinator::new(node)) as Box<dyn RetryCoordinator>
    })
}

/// Factory for [`NullRetryCoordinator`].
pub fn null_retry_coordinator() -> RetryCoordinatorFactory {
    Arc::new(|_: &ResourceNode| Box::new(NullRetryCoordinator) as Box<dyn RetryCoordinator>)
}
