//! Rate limiting implementation
//!
//! Every API call is followed by a call to [`RateLimiter::pause`]. The
//! default strategy is a flat sleep; a token bucket built on the governor
//! crate can be swapped in without touching the callers.

use crate::config::{RateLimitConfig, RateLimitStrategy};
use crate::error::{Error, Result};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Spacing applied after each API call
#[async_trait]
pub trait RateLimiter: Send + Sync + std::fmt::Debug {
    /// Wait until the next call may be issued
    async fn pause(&self);
}

/// Flat sleep after every call
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No pause at all
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl RateLimiter for FixedDelay {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Token bucket allowing `requests` calls per `window`
#[derive(Clone)]
pub struct QuotaLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl QuotaLimiter {
    pub fn new(requests: u32, window: Duration) -> Result<Self> {
        let burst = NonZeroU32::new(requests)
            .ok_or_else(|| Error::config("rate limit quota must allow at least one request"))?;
        let quota = Quota::with_period(window / requests)
            .ok_or_else(|| Error::config("rate limit window must be positive"))?
            .allow_burst(burst);

        Ok(Self {
            limiter: Arc::new(Governor::direct(quota)),
        })
    }

    /// Check if a call could be made immediately, consuming a cell if so
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

#[async_trait]
impl RateLimiter for QuotaLimiter {
    async fn pause(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for QuotaLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaLimiter").finish()
    }
}

/// Limiter used after listing calls
pub fn page_limiter(config: &RateLimitConfig) -> Result<Arc<dyn RateLimiter>> {
    match config.strategy {
        RateLimitStrategy::Fixed => Ok(Arc::new(FixedDelay::new(config.page_delay()))),
        RateLimitStrategy::Quota => Ok(Arc::new(QuotaLimiter::new(
            config.requests_per_window,
            config.window(),
        )?)),
    }
}

/// Limiter used after handle lookups
pub fn lookup_limiter(config: &RateLimitConfig) -> Arc<dyn RateLimiter> {
    Arc::new(FixedDelay::new(config.lookup_delay()))
}
