//! Waiting for UI elements that may not be rendered yet
//!
//! The folder UI renders lazily, so elements the run depends on appear some time
//! after navigation. [`Resolver`] polls a locator with a fixed delay until it yields
//! a value, the attempt budget runs out, or a [`CancellationToken`] fires.

use crate::error::{OutlineError, Result};
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Looks up a rendered element by selector without side effects
pub trait ObjectLocator {
    type Element;

    /// Return the element if it is currently present
    fn locate(&self, selector: &str) -> Option<Self::Element>;
}

/// Host scheduling facility used between attempts
#[async_trait]
pub trait Timer: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

/// Timer backed by the tokio runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[async_trait]
impl Timer for TokioTimer {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Attempt budget and delay for a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of lookups, including the first one
    pub max_attempts: u32,

    /// Fixed delay between lookups
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the attempt budget
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Builder method: set the delay between attempts
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Polls a locator until it produces a value
#[derive(Debug, Clone, Default)]
pub struct Resolver<T = TokioTimer> {
    policy: RetryPolicy,
    timer: T,
}

impl Resolver<TokioTimer> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            timer: TokioTimer,
        }
    }
}

impl<T: Timer> Resolver<T> {
    /// Create a resolver that waits on a custom timer
    pub fn with_timer(policy: RetryPolicy, timer: T) -> Self {
        Self { policy, timer }
    }

    /// Poll `locate` until it yields a value or the budget is exhausted.
    ///
    /// `target` only names the lookup in logs and errors.
    pub async fn resolve<V, F>(&self, target: &str, locate: F) -> Result<V>
    where
        V: Debug,
        F: FnMut() -> Option<V>,
    {
        self.resolve_with_cancel(target, locate, &CancellationToken::new())
            .await
    }

    /// Like [`Resolver::resolve`], but gives up as soon as `cancel` fires
    pub async fn resolve_with_cancel<V, F>(
        &self,
        target: &str,
        mut locate: F,
        cancel: &CancellationToken,
    ) -> Result<V>
    where
        V: Debug,
        F: FnMut() -> Option<V>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempts = 0;

        loop {
            let found = locate();
            attempts += 1;
            log::debug!("Lookup {}/{} for '{}': {:?}", attempts, max_attempts, target, found);

            if let Some(value) = found {
                return Ok(value);
            }

            if attempts >= max_attempts {
                return Err(OutlineError::ResolutionTimeout {
                    target: target.to_string(),
                    attempts,
                });
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(OutlineError::ResolutionCancelled {
                        target: target.to_string(),
                        attempts,
                    });
                }
                _ = self.timer.sleep(self.policy.delay) => {}
            }
        }
    }

    /// Wait until `locator` finds `selector`
    pub async fn resolve_selector<L>(&self, locator: &L, selector: &str) -> Result<L::Element>
    where
        L: ObjectLocator,
        L::Element: Debug,
    {
        self.resolve(selector, || locator.locate(selector)).await
    }

    /// Wait until `locator` finds `selector`, unless `cancel` fires first
    pub async fn resolve_selector_with_cancel<L>(
        &self,
        locator: &L,
        selector: &str,
        cancel: &CancellationToken,
    ) -> Result<L::Element>
    where
        L: ObjectLocator,
        L::Element: Debug,
    {
        self.resolve_with_cancel(selector, || locator.locate(selector), cancel)
            .await
    }
}

/// Poll `locate` with the tokio timer under `policy`
pub async fn resolve<V, F>(locate: F, policy: RetryPolicy) -> Result<V>
where
    V: Debug,
    F: FnMut() -> Option<V>,
{
    Resolver::new(policy).resolve("object", locate).await
}
