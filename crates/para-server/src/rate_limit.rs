use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::error::AppError;

/// Token bucket shared by every `/generate` request.
#[derive(Clone)]
pub struct RateLimiter {
    rps: u32,
    state: Arc<Mutex<Bucket>>,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last: Instant,
}

impl RateLimiter {
    pub fn new(rps: u32) -> Self {
        let rps = rps.max(1);
        Self {
            rps,
            state: Arc::new(Mutex::new(Bucket {
                tokens: rps as f64,
                last: Instant::now(),
            })),
        }
    }

    pub fn rps(&self) -> u32 {
        self.rps
    }

    pub async fn check(&self) -> Result<(), AppError> {
        let mut bucket = self.state.lock().await;
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last);
        bucket.last = now;

        let capacity = self.rps as f64;
        bucket.tokens = (bucket.tokens + elapsed.as_secs_f64() * capacity).min(capacity);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            return Ok(());
        }

        let wait = Duration::from_secs_f64((1.0 - bucket.tokens) / capacity);
        Err(AppError::RateLimited(format!(
            "rate limit exceeded (RATE_LIMIT_RPS={}): try again in ~{}ms",
            self.rps,
            wait.as_millis()
        )))
    }
}
