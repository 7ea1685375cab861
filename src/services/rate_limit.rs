use std::time::Duration;
use tokio::sync::Mutex;

/// Courtesy delay in front of outbound calls
///
/// Every caller waits `delay` before proceeding, and callers pass the gate one
/// at a time, so concurrent users still start at most one call per `delay`.
/// A zero delay turns the limiter into a no-op.
#[derive(Debug)]
pub struct RateLimiter {
    delay: Duration,
    gate: Mutex<()>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            gate: Mutex::new(()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits for this caller's turn
    pub async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }
        let _turn = self.gate.lock().await;
        tokio::time::sleep(self.delay).await;
    }
}
