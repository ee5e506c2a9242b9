use super::clock::Clock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Length of the counting window.
pub const WINDOW: Duration = Duration::from_secs(60);

/// Verdict for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Call admitted and counted
    Allowed { remaining: u32 },

    /// Call rejected; the oldest counted call leaves the window after `retry_after`
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

struct WindowState {
    calls: HashMap<String, VecDeque<Instant>>,
    last_sweep: Instant,
}

impl WindowState {
    // Identities whose newest call has left the window hold no budget
    fn sweep(&mut self, now: Instant) {
        self.calls.retain(|_, calls| {
            calls
                .back()
                .is_some_and(|latest| now.duration_since(*latest) < WINDOW)
        });
        self.last_sweep = now;
    }
}

/// Sliding-window request counter keyed by identity.
///
/// All per-identity state lives behind one lock owned by this value; there
/// is no ambient shared map. Idle identities are swept from inside
/// [`check`](Self::check) at most once per window, so the map stays bounded
/// by the identities active in the last two windows.
pub struct RateLimiter {
    limit: u32,
    clock: Arc<dyn Clock>,
    state: Mutex<WindowState>,
}

impl RateLimiter {
    /// Allow `limit` calls per identity per minute. A limit of zero disables limiting.
    pub fn new(limit: u32, clock: Arc<dyn Clock>) -> Self {
        let last_sweep = clock.now();
        Self {
            limit,
            clock,
            state: Mutex::new(WindowState {
                calls: HashMap::new(),
                last_sweep,
            }),
        }
    }

    /// Count a call for `identity` if the window has room.
    pub async fn check(&self, identity: &str) -> RateDecision {
        if self.limit == 0 {
            return RateDecision::Allowed {
                remaining: u32::MAX,
            };
        }

        let now = self.clock.now();
        let mut state = self.state.lock().await;
        if now.duration_since(state.last_sweep) >= WINDOW {
            state.sweep(now);
        }

        let calls = state.calls.entry(identity.to_string()).or_default();

        while calls
            .front()
            .is_some_and(|at| now.duration_since(*at) >= WINDOW)
        {
            calls.pop_front();
        }

        if calls.len() >= self.limit as usize {
            let retry_after = calls
                .front()
                .map(|oldest| WINDOW.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(WINDOW);
            return RateDecision::Limited { retry_after };
        }

        calls.push_back(now);
        RateDecision::Allowed {
            remaining: self.limit - calls.len() as u32,
        }
    }

    /// Drop identities with no calls left in the window.
    pub async fn prune(&self) {
        let now = self.clock.now();
        self.state.lock().await.sweep(now);
    }

    /// Number of identities currently tracked.
    pub async fn tracked_identities(&self) -> usize {
        self.state.lock().await.calls.len()
    }
}
