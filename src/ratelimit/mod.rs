//! Per-identity request limiting.
//!
//! A sliding one-minute window per identity, held by a single
//! [`RateLimiter`] and driven by an injected [`Clock`] so tests can move
//! time by hand.

mod clock;
mod sliding_window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use sliding_window::{RateDecision, RateLimiter, WINDOW};
