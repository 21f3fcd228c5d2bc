//! Per-domain politeness limiting
//!
//! This module handles:
//! - Bounding in-flight requests per domain via semaphores
//! - Holding each slot for a fixed plus random delay after its request
//!
//! Domains never share a budget, so a slow host does not hold back others.

use crate::config::CrawlerConfig;
use rand::Rng;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Limits concurrent work per domain and spaces out requests to it
#[derive(Debug)]
pub struct DomainLimiter {
    /// Slots per domain
    parallelism: usize,

    /// Fixed pause after each request
    delay: Duration,

    /// Ceiling of the random pause added to `delay`
    random_delay: Duration,

    /// One semaphore per domain, created on first use
    slots: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl DomainLimiter {
    /// Creates a limiter
    ///
    /// A parallelism of zero is raised to one.
    pub fn new(parallelism: usize, delay: Duration, random_delay: Duration) -> Self {
        Self {
            parallelism: parallelism.max(1),
            delay,
            random_delay,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a limiter from crawler settings
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.parallelism as usize,
            Duration::from_millis(config.delay_ms),
            Duration::from_millis(config.random_delay_ms),
        )
    }

    /// Runs `work` inside one of `domain`'s slots
    ///
    /// The slot is held while `work` runs and for the politeness pause after
    /// it, whatever `work` returned.
    pub async fn throttle<F>(&self, domain: &str, work: F) -> F::Output
    where
        F: Future,
    {
        let semaphore = self.slot(domain);

        // Semaphores are never closed, so a permit is always granted
        let _permit = semaphore.acquire_owned().await.ok();
        tracing::trace!("Acquired slot for {}", domain);

        let output = work.await;

        let pause = self.pause();
        if !pause.is_zero() {
            tracing::trace!("Holding slot for {} another {:?}", domain, pause);
            tokio::time::sleep(pause).await;
        }

        output
    }

    /// Returns the number of requests currently holding a slot for `domain`
    #[cfg(test)]
    pub(crate) fn in_flight(&self, domain: &str) -> usize {
        self.lock()
            .get(domain)
            .map_or(0, |s| self.parallelism.saturating_sub(s.available_permits()))
    }

    /// Returns the number of domains seen so far
    #[cfg(test)]
    pub(crate) fn domain_count(&self) -> usize {
        self.lock().len()
    }

    fn slot(&self, domain: &str) -> Arc<Semaphore> {
        let mut slots = self.lock();
        Arc::clone(
            slots
                .entry(domain.to_string())
                .or_insert_with(|| Arc::new(Semaphore::new(self.parallelism))),
        )
    }

    /// Draws the pause for one request: `delay + U[0, random_delay]`
    fn pause(&self) -> Duration {
        let ceiling = self.random_delay.as_millis() as u64;
        if ceiling == 0 {
            return self.delay;
        }

        let jitter = rand::rng().random_range(0..=ceiling);
        self.delay + Duration::from_millis(jitter)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<Semaphore>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
