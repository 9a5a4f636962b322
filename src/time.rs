//! Frame pacing primitives.
//!
//! The engine never reads a clock itself; the host passes a millisecond
//! timestamp into every frame and these helpers decide what runs. That keeps
//! the simulation steppable from tests with synthetic time.
//!
//! | Type | Role |
//! |------|------|
//! | [`Clock`] | Monotonic millisecond source for the host |
//! | [`FrameGate`] | Soft frame-rate ceiling |
//! | [`Interval`] | Repeating wall-clock timer (auto mode) |
//!
//! # Example
//!
//! ```ignore
//! use nexus::time::{Clock, FrameGate};
//!
//! let clock = Clock::new();
//! let mut gate = FrameGate::new(60.0);
//!
//! // In the redraw handler:
//! if gate.ready(clock.now_ms()) {
//!     // run one frame
//! }
//! ```

use std::time::Instant;

/// Milliseconds since creation, from a monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Skips frames that arrive sooner than `1000 / fps_limit` ms after the last
/// executed one.
#[derive(Debug, Clone)]
pub struct FrameGate {
    min_interval_ms: f64,
    last_ms: Option<f64>,
}

impl FrameGate {
    /// Create a gate for the given ceiling. Non-positive limits disable it.
    pub fn new(fps_limit: f32) -> Self {
        let min_interval_ms = if fps_limit.is_finite() && fps_limit > 0.0 {
            1000.0 / fps_limit as f64
        } else {
            0.0
        };
        Self {
            min_interval_ms,
            last_ms: None,
        }
    }

    /// Whether a frame may run at `now_ms`. Records the time when it may.
    ///
    /// The first call always passes.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.min_interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    #[inline]
    pub fn min_interval_ms(&self) -> f64 {
        self.min_interval_ms
    }

    /// Forget the last executed frame.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Fires once per `period_ms` of wall time.
///
/// The first period starts at the first [`tick`](Self::tick), not at zero.
/// After a long stall it fires once and restarts the period rather than
/// firing a backlog.
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: f64,
    started_ms: Option<f64>,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            started_ms: None,
        }
    }

    /// Advance to `now_ms`; returns `true` when a full period has elapsed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.started_ms {
            None => {
                self.started_ms = Some(now_ms);
                false
            }
            Some(start) if now_ms - start >= self.period_ms => {
                self.started_ms = Some(now_ms);
                true
            }
            Some(_) => false,
        }
    }

    /// Milliseconds elapsed in the current period.
    pub fn elapsed(&self, now_ms: f64) -> f64 {
        self.started_ms.map_or(0.0, |s| now_ms - s)
    }

    #[inline]
    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Restart the period at the next tick.
    pub fn reset(&mut self) {
        self.started_ms = None;
    }
}
