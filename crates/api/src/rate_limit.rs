use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Sliding-window request counter keyed by client address.
///
/// Clients with no request inside the window are swept at most once per
/// window, so the map only holds recently active clients.
#[derive(Debug, Clone)]
pub struct ClientRateLimiter {
    state: Arc<Mutex<LimiterState>>,
    window: Duration,
    max_requests: usize,
}

#[derive(Debug)]
struct LimiterState {
    hits: HashMap<String, VecDeque<Instant>>,
    last_sweep: Instant,
}

impl ClientRateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(LimiterState {
                hits: HashMap::new(),
                last_sweep: Instant::now(),
            })),
            window,
            max_requests,
        }
    }

    /// Records a request for `client` and returns how many remain in the
    /// window, or `None` when the limit is exhausted.
    pub fn acquire(&self, client: &str) -> Option<usize> {
        self.acquire_at(client, Instant::now())
    }

    fn acquire_at(&self, client: &str, now: Instant) -> Option<usize> {
        let mut state = self.state.lock();

        if now.saturating_duration_since(state.last_sweep) > self.window {
            let window = self.window;
            state.hits.retain(|_, queue| {
                queue
                    .back()
                    .is_some_and(|last| now.saturating_duration_since(*last) <= window)
            });
            state.last_sweep = now;
        }

        let queue = state.hits.entry(client.to_string()).or_default();
        while queue
            .front()
            .is_some_and(|front| now.saturating_duration_since(*front) > self.window)
        {
            queue.pop_front();
        }

        if queue.len() >= self.max_requests {
            return None;
        }

        queue.push_back(now);
        Some(self.max_requests - queue.len())
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.state.lock().hits.len()
    }
}
