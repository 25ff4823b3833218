use crate::config::RateLimitConfig;
use crate::constants::rate_limit::MAX_POLL_INTERVAL_MS;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Sliding-window admission control for outbound API calls.
///
/// Keeps the instants of admitted calls inside the trailing window. A call is
/// admitted while fewer than `max_requests` instants remain after pruning.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    admitted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests.max(1),
            window: config.window,
            admitted: Mutex::new(VecDeque::with_capacity(config.max_requests.max(1))),
        }
    }

    /// Admits and records the call if capacity remains right now.
    pub fn try_admit(&self) -> bool {
        self.admit_or_wait().is_ok()
    }

    /// Waits until the call is admitted, polling at most once per second.
    pub async fn acquire(&self) {
        loop {
            match self.admit_or_wait() {
                Ok(()) => return,
                Err(wait) => {
                    let capped = wait.min(Duration::from_millis(MAX_POLL_INTERVAL_MS));
                    tokio::time::sleep(capped.max(Duration::from_millis(1))).await;
                }
            }
        }
    }

    /// Calls currently counted against the window.
    pub fn in_window(&self) -> usize {
        let now = Instant::now();
        let mut admitted = self.lock();
        self.prune(&mut admitted, now);
        admitted.len()
    }

    fn admit_or_wait(&self) -> Result<(), Duration> {
        let now = Instant::now();
        let mut admitted = self.lock();
        self.prune(&mut admitted, now);

        if admitted.len() < self.max_requests {
            admitted.push_back(now);
            return Ok(());
        }

        // max_requests >= 1, so a denied window always holds an oldest entry.
        let Some(oldest) = admitted.front().copied() else {
            admitted.push_back(now);
            return Ok(());
        };
        Err((oldest + self.window).saturating_duration_since(now))
    }

    fn prune(&self, admitted: &mut VecDeque<Instant>, now: Instant) {
        while let Some(front) = admitted.front() {
            if now.saturating_duration_since(*front) >= self.window {
                admitted.pop_front();
            } else {
                break;
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Instant>> {
        self.admitted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
