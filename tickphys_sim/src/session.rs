//! One simulation run: scheduler, demo world and the counters reported at the end.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tickphys::prelude::*;
use tickphys::{RunSummary, TickSnapshot};
use tracing::info;

use crate::demo::{spawn_projectiles, DemoStats};

/// What a finished run did.
#[derive(Debug, Clone)]
pub struct SimReport {
    pub summary: RunSummary,
    pub snapshot: TickSnapshot,
    pub simulated_time: f64,
    pub input_reads: u64,
    pub despawned: u64,
    pub live_objects: usize,
    pub rendered: u64,
}

pub struct SimSession {
    scheduler: TickScheduler,
    world: StepCounter,
    stats: DemoStats,
    input_reads: Rc<Cell<u64>>,
    _objects: Vec<ObjectHandle>,
}

impl SimSession {
    pub fn new(config: TickConfig, objects: usize) -> TickResult<Self> {
        let world = StepCounter::new();
        let fixed_delta_time = config.fixed_delta_time;
        let mut scheduler = TickScheduler::new(world.clone())
            .with_name("tickphys_sim")
            .with_config(config)?;

        let input_reads = Rc::new(Cell::new(0));
        {
            let input_reads = input_reads.clone();
            scheduler.on_read_input(move || input_reads.set(input_reads.get() + 1));
        }

        let stats = DemoStats::default();
        let handles = spawn_projectiles(&scheduler.registry(), objects, fixed_delta_time, &stats);
        info!("Spawned {} projectiles", handles.len());

        Ok(Self {
            scheduler,
            world,
            stats,
            input_reads,
            _objects: handles,
        })
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    /// Drive the session in real time until `duration` passes or `driver` is stopped.
    pub fn run_realtime(
        &mut self,
        driver: &mut FrameDriver,
        duration: Duration,
        frame_rate_hz: f64,
    ) -> TickResult<SimReport> {
        let summary = driver.run_for(&mut self.scheduler, duration, frame_rate_hz)?;
        Ok(self.report(summary))
    }

    /// Drive the session with synthetic frames of `delta_time` seconds each.
    pub fn run_frames(&mut self, frames: usize, delta_time: f64) -> SimReport {
        let mut driver = FrameDriver::manual();
        let summary = driver.run_frames(&mut self.scheduler, frames, delta_time);
        self.report(summary)
    }

    fn report(&self, summary: RunSummary) -> SimReport {
        SimReport {
            summary,
            snapshot: self.scheduler.snapshot(),
            simulated_time: self.world.simulated_time(),
            input_reads: self.input_reads.get(),
            despawned: self.stats.despawned(),
            live_objects: self.scheduler.registry().len(),
            rendered: self.stats.rendered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_run_despawns_everything() {
        let config = TickConfig::standard().with_fixed_delta_time(0.125).with_auto_update(true);
        let mut session = SimSession::new(config, 4).unwrap();

        // Longest lifetime for 4 objects is 31 steps; 40 frames of one step each.
        let report = session.run_frames(40, 0.125);

        assert_eq!(report.summary.frames, 40);
        assert_eq!(report.summary.fixed_steps, 40);
        assert_eq!(report.input_reads, 40);
        assert_eq!(report.despawned, 4);
        assert_eq!(report.live_objects, 0);
        assert_eq!(report.simulated_time, 5.0);
        assert_eq!(report.snapshot.fixed_frame_count, 40);
    }

    #[test]
    fn test_capped_run_reports_throttling() {
        let config = TickConfig::standard()
            .with_fixed_delta_time(0.125)
            .with_max_catch_up_steps(2)
            .with_auto_update(true);
        let mut session = SimSession::new(config, 1).unwrap();

        let report = session.run_frames(3, 0.5);

        assert_eq!(report.summary.fixed_steps, 6);
        assert_eq!(report.summary.throttled_frames, 3);
        assert!(session.scheduler().extra_delta_time() > 0.125);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = TickConfig::standard().with_fixed_delta_time(f64::NAN);
        assert!(SimSession::new(config, 2).is_err());
    }
}
