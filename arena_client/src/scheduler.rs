//! Frame scheduling.
//!
//! The loop never sleeps on its own. At the end of every tick it asks a
//! [`FrameScheduler`] for the next one, and the driver awaits the scheduler
//! before ticking again. Production paces ticks with a tokio interval; tests
//! hand out ticks one at a time.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, Interval, MissedTickBehavior};

#[async_trait]
pub trait FrameScheduler: Send {
    /// Requests one more tick.
    fn request_tick(&mut self);

    /// Waits until the requested tick is due. Returns `false` if no tick is
    /// pending or the scheduler will not deliver one.
    async fn next_tick(&mut self) -> bool;
}

/// Fixed-cadence scheduler standing in for the host refresh callback.
pub struct IntervalScheduler {
    period: Duration,
    interval: Option<Interval>,
    pending: bool,
}

impl IntervalScheduler {
    pub fn new(refresh_hz: u32) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / f64::from(refresh_hz.max(1))),
            interval: None,
            pending: false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

#[async_trait]
impl FrameScheduler for IntervalScheduler {
    fn request_tick(&mut self) {
        self.pending = true;
    }

    async fn next_tick(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        // Created on first use so construction does not need a runtime.
        let period = self.period;
        let interval = self.interval.get_or_insert_with(|| {
            let mut i = time::interval(period);
            i.set_missed_tick_behavior(MissedTickBehavior::Skip);
            i
        });
        interval.tick().await;
        self.pending = false;
        true
    }
}

/// Deterministic scheduler: a tick is delivered only when one was requested
/// and the test has granted a frame.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: usize,
    granted: usize,
    requests: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows `frames` more ticks to be delivered.
    pub fn grant(&mut self, frames: usize) {
        self.granted += frames;
    }

    /// Total number of `request_tick` calls seen.
    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn is_pending(&self) -> bool {
        self.pending > 0
    }
}

#[async_trait]
impl FrameScheduler for ManualScheduler {
    fn request_tick(&mut self) {
        self.pending += 1;
        self.requests += 1;
    }

    async fn next_tick(&mut self) -> bool {
        if self.pending == 0 || self.granted == 0 {
            return false;
        }
        self.pending -= 1;
        self.granted -= 1;
        true
    }
}
