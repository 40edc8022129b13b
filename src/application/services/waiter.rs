//! Bounded polling for eventually-consistent deletions
//!
//! The predicate is evaluated once up front, then every `interval` until it
//! holds or `timeout` has elapsed. No backoff.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::domain::{DomainError, ResourceType};

/// Category-specific existence check used by the deletion waiter.
pub trait DeletionCheck {
    /// Whether the resource is gone from the service's point of view.
    fn is_deleted(&self, res_type: ResourceType, res_id: &str) -> ApplicationResult<bool>;
}

/// Poll `check` until it returns `true` or `timeout` elapses.
///
/// Returns `Ok(false)` on timeout; errors from `check` abort the loop.
/// A `timeout` too large to represent as an `Instant` never expires.
pub fn poll_until<F>(interval: Duration, timeout: Duration, mut check: F) -> ApplicationResult<bool>
where
    F: FnMut() -> ApplicationResult<bool>,
{
    let deadline = Instant::now().checked_add(timeout);
    let expired = || deadline.is_some_and(|d| Instant::now() > d);
    let mut done = check()?;
    let mut attempts = 1;

    while !(done || expired()) {
        thread::sleep(interval);
        done = check()?;
        attempts += 1;
    }

    debug!("poll_until: done={}, attempts={}", done, attempts);
    Ok(done)
}

/// Wait until `res_id` of category `res_type` is reported deleted.
///
/// # Errors
/// * `DomainError::InvalidResource` - unsupported category (nothing is polled)
/// * `DomainError::ResourceReleaseFailed` - still present after `timeout`
#[instrument(level = "debug", skip(checker))]
pub fn wait_for_resource_deletion(
    checker: &dyn DeletionCheck,
    res_type: &str,
    res_id: &str,
    interval: Duration,
    timeout: Duration,
) -> ApplicationResult<()> {
    // TODO: wire share, snapshot and share-network checks once their listings are wrapped
    let resource: ResourceType = res_type.parse()?;

    let deleted = poll_until(interval, timeout, || checker.is_deleted(resource, res_id))?;
    if !deleted {
        return Err(DomainError::ResourceReleaseFailed {
            res_type: res_type.to_string(),
            res_id: res_id.to_string(),
        }
        .into());
    }
    Ok(())
}
