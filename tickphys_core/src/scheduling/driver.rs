//! Self-driving for schedulers with `auto_update` enabled.
//!
//! A [`FrameDriver`] samples a [`FrameClock`] once per host frame and feeds the
//! elapsed time into [`TickScheduler::tick`]. Real applications use the
//! [`MonotonicClock`]; tests and headless tools use a [`ManualClock`] so frame
//! deltas are exact.

use crate::error::{TickError, TickResult};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::scheduler::{TickReport, TickScheduler};

/// Source of frame timestamps, in seconds since the clock started.
pub trait FrameClock {
    fn now_secs(&self) -> f64;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for MonotonicClock {
    fn now_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward. Negative and non-finite steps are ignored.
    pub fn advance(&mut self, secs: f64) {
        if secs.is_finite() && secs > 0.0 {
            self.now += secs;
        }
    }
}

impl FrameClock for ManualClock {
    fn now_secs(&self) -> f64 {
        self.now
    }
}

/// Totals over a driven run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Frames that reached `tick`.
    pub frames: u64,
    /// Fixed steps executed across those frames.
    pub fixed_steps: u64,
    /// Frames stopped by the catch-up cap.
    pub throttled_frames: u64,
}

impl RunSummary {
    fn record(&mut self, report: &TickReport) {
        self.frames += 1;
        self.fixed_steps += u64::from(report.steps);
        if report.throttled {
            self.throttled_frames += 1;
        }
    }
}

/// Drives a [`TickScheduler`] from a frame clock.
pub struct FrameDriver<C: FrameClock = MonotonicClock> {
    clock: C,
    last_time: f64,
    frame_count: u64,
    running: Arc<Mutex<bool>>,
}

impl<C: FrameClock> FrameDriver<C> {
    pub fn with_clock(clock: C) -> Self {
        let last_time = clock.now_secs();
        Self {
            clock,
            last_time,
            frame_count: 0,
            running: Arc::new(Mutex::new(true)),
        }
    }

    /// Run one frame.
    ///
    /// The clock is sampled every call so that enabling `auto_update` later
    /// does not dump the whole idle period into one tick. Returns `None` when
    /// the scheduler's `auto_update` is off.
    pub fn update(&mut self, scheduler: &mut TickScheduler) -> Option<TickReport> {
        let now = self.clock.now_secs();
        let delta_time = now - self.last_time;
        self.last_time = now;

        if !scheduler.auto_update() {
            return None;
        }

        self.frame_count += 1;
        let fixed_delta_time = scheduler.config().fixed_delta_time;
        Some(scheduler.tick(now, delta_time, fixed_delta_time))
    }

    /// Frames that reached `tick` so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Shared run flag. Clearing it (e.g. from a Ctrl+C handler) ends `run_for`.
    pub fn stop_handle(&self) -> Arc<Mutex<bool>> {
        self.running.clone()
    }

    /// Check if the driver is running
    pub fn is_running(&self) -> bool {
        if let Ok(running) = self.running.lock() {
            *running
        } else {
            false
        }
    }

    /// Stop the driver
    pub fn stop(&self) {
        if let Ok(mut running) = self.running.lock() {
            *running = false;
        }
    }
}

impl FrameDriver<MonotonicClock> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }

    /// Drive `scheduler` at roughly `frame_rate_hz` until `duration` elapses or
    /// the driver is stopped.
    pub fn run_for(
        &mut self,
        scheduler: &mut TickScheduler,
        duration: Duration,
        frame_rate_hz: f64,
    ) -> TickResult<RunSummary> {
        if !(frame_rate_hz.is_finite() && frame_rate_hz > 0.0) {
            return Err(TickError::config(format!(
                "frame rate must be positive (got {})",
                frame_rate_hz
            )));
        }
        if !scheduler.auto_update() {
            return Err(TickError::config(format!(
                "{}: auto_update is disabled, nothing to drive",
                scheduler.name()
            )));
        }

        let frame_period = Duration::try_from_secs_f64(1.0 / frame_rate_hz).map_err(|e| {
            TickError::config(format!("frame rate {} gives no usable frame period: {}", frame_rate_hz, e))
        })?;
        let start_time = Instant::now();
        let mut summary = RunSummary::default();

        log::debug!(
            "{}: driving for {:?} at {:.1} fps",
            scheduler.name(),
            duration,
            frame_rate_hz
        );

        while self.is_running() {
            if start_time.elapsed() >= duration {
                break;
            }

            let frame_start = Instant::now();
            if let Some(report) = self.update(scheduler) {
                summary.record(&report);
            }

            let spent = frame_start.elapsed();
            if spent < frame_period {
                std::thread::sleep(frame_period - spent);
            }
        }

        log::debug!(
            "{}: drove {} frames, {} fixed steps",
            scheduler.name(),
            summary.frames,
            summary.fixed_steps
        );
        Ok(summary)
    }
}

impl Default for FrameDriver<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver<ManualClock> {
    pub fn manual() -> Self {
        Self::with_clock(ManualClock::new())
    }

    /// Advance the manual clock by `delta_time` and run one frame.
    pub fn update_with(
        &mut self,
        scheduler: &mut TickScheduler,
        delta_time: f64,
    ) -> Option<TickReport> {
        self.clock.advance(delta_time);
        self.update(scheduler)
    }

    /// Run `frames` frames of `delta_time` each, stopping early if the driver
    /// is stopped.
    pub fn run_frames(
        &mut self,
        scheduler: &mut TickScheduler,
        frames: usize,
        delta_time: f64,
    ) -> RunSummary {
        let mut summary = RunSummary::default();
        for _ in 0..frames {
            if !self.is_running() {
                break;
            }
            if let Some(report) = self.update_with(scheduler, delta_time) {
                summary.record(&report);
            }
        }
        summary
    }
}
