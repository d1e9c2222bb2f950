use std::fmt;
use std::time::{Duration, Instant};

use tracing::trace;

use super::timers::IdleTimer;

/// Coarse scroll velocity, used only to decide how much image detail to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScrollTier {
    #[default]
    Idle,
    Slow,
    Medium,
    Fast,
}

/// Samples successive scroll offsets and classifies the movement between them.
///
/// State is limited to the last sampled offset and the pending idle deadline, and
/// belongs to one instance: separate grids never share samples.
pub struct ScrollSpeedEstimator {
    last_offset: Option<f64>,
    idle: IdleTimer,
    tier: ScrollTier,
    medium_threshold: f64,
    fast_threshold: f64,
    decay_factor: f64,
    on_idle: Option<Box<dyn FnMut()>>,
}

impl ScrollSpeedEstimator {
    pub fn new(medium_threshold: f64, fast_threshold: f64, decay_factor: f64) -> Self {
        Self {
            last_offset: None,
            idle: IdleTimer::new(),
            tier: ScrollTier::Idle,
            medium_threshold,
            fast_threshold,
            decay_factor,
            on_idle: None,
        }
    }

    pub fn tier(&self) -> ScrollTier {
        self.tier
    }

    pub fn classify(&self, delta: f64) -> ScrollTier {
        if delta <= 0.0 {
            ScrollTier::Idle
        } else if delta < self.medium_threshold {
            ScrollTier::Slow
        } else if delta < self.fast_threshold {
            ScrollTier::Medium
        } else {
            ScrollTier::Fast
        }
    }

    pub fn sample(&mut self, current_offset: f64, sample_interval: Duration) -> ScrollTier {
        self.sample_at(current_offset, sample_interval, Instant::now())
    }

    /// Records `current_offset` and reschedules the idle deadline.
    ///
    /// The first sample after construction or after going idle has no
    /// predecessor and counts as zero movement.
    pub fn sample_at(
        &mut self,
        current_offset: f64,
        sample_interval: Duration,
        now: Instant,
    ) -> ScrollTier {
        let delta = self
            .last_offset
            .map(|last| (current_offset - last).abs())
            .unwrap_or(0.0);
        self.last_offset = Some(current_offset);
        self.idle
            .arm(now, sample_interval.mul_f64(self.decay_factor.max(0.0)));
        self.tier = self.classify(delta);
        trace!(current_offset, delta, tier = ?self.tier, "Sampled scroll speed");
        self.tier
    }

    /// Fires the idle callback once the deadline has passed. Returns whether it fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.idle.poll(now) {
            return false;
        }
        self.last_offset = None;
        self.tier = ScrollTier::Idle;
        if let Some(callback) = self.on_idle.as_mut() {
            callback();
        }
        true
    }

    pub fn connect_idle<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.on_idle = Some(Box::new(callback));
    }

    /// Drops the pending idle deadline and the callback.
    pub fn cancel(&mut self) {
        self.idle.cancel();
        self.on_idle = None;
    }

    pub fn is_idle_pending(&self) -> bool {
        self.idle.is_armed()
    }
}

impl fmt::Debug for ScrollSpeedEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollSpeedEstimator")
            .field("last_offset", &self.last_offset)
            .field("idle", &self.idle)
            .field("tier", &self.tier)
            .field("medium_threshold", &self.medium_threshold)
            .field("fast_threshold", &self.fast_threshold)
            .field("decay_factor", &self.decay_factor)
            .finish_non_exhaustive()
    }
}
