//! @ai:module:intent Token-bucket throttle for judge requests
//! @ai:module:layer infrastructure
//! @ai:module:public_api RateLimiter, RateLimiterTrait
//! @ai:module:stateless false

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// @ai:intent Trait for rate limiting functionality
pub trait RateLimiterTrait: Send + Sync {
    /// @ai:intent Wait until a request is allowed
    fn wait(&self) -> impl std::future::Future<Output = ()> + Send;
}

/// @ai:intent Requests-per-minute bucket shared by every in-flight comparison
pub struct RateLimiter {
    bucket: Arc<Mutex<Bucket>>,
    per_minute: u32,
}

struct Bucket {
    available: f64,
    refilled_at: Instant,
}

impl Bucket {
    fn refill(&mut self, per_minute: u32) {
        let now = Instant::now();
        let earned = now.duration_since(self.refilled_at).as_secs_f64() * per_second(per_minute);
        self.available = (self.available + earned).min(per_minute as f64);
        self.refilled_at = now;
    }
}

fn per_second(per_minute: u32) -> f64 {
    per_minute as f64 / 60.0
}

impl RateLimiter {
    /// @ai:intent Create a limiter starting with a full bucket
    /// @ai:post per_minute == 0 disables throttling
    /// @ai:effects pure
    pub fn new(per_minute: u32) -> Self {
        Self {
            bucket: Arc::new(Mutex::new(Bucket {
                available: per_minute as f64,
                refilled_at: Instant::now(),
            })),
            per_minute,
        }
    }

    /// @ai:intent Limiter that never waits
    /// @ai:effects pure
    pub fn unlimited() -> Self {
        Self::new(0)
    }

    /// @ai:intent Take a token if one is available, without waiting
    /// @ai:effects state:write
    pub async fn try_acquire(&self) -> Result<(), Duration> {
        if self.per_minute == 0 {
            return Ok(());
        }

        let mut bucket = self.bucket.lock().await;
        bucket.refill(self.per_minute);

        if bucket.available >= 1.0 {
            bucket.available -= 1.0;
            return Ok(());
        }

        let missing = 1.0 - bucket.available;
        Err(Duration::from_secs_f64(missing / per_second(self.per_minute)))
    }
}

impl RateLimiterTrait for RateLimiter {
    /// @ai:intent Wait until a request is allowed
    /// @ai:effects state:write, time
    async fn wait(&self) {
        while let Err(delay) = self.try_acquire().await {
            tracing::debug!("Judge rate limit reached, sleeping {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_burst_is_immediate() {
        let limiter = RateLimiter::new(60);

        let start = Instant::now();
        for _ in 0..5 {
            limiter.wait().await;
        }

        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_empty_bucket_reports_delay() {
        let limiter = RateLimiter::new(60);

        for _ in 0..60 {
            limiter.wait().await;
        }

        let delay = limiter.try_acquire().await.unwrap_err();
        assert!(delay > Duration::from_millis(900));
        assert!(delay <= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_unlimited_never_throttles() {
        let limiter = RateLimiter::unlimited();

        for _ in 0..1000 {
            assert!(limiter.try_acquire().await.is_ok());
        }
    }
}
