use crate::{CycleResult, UpdateCycle};
use ink_display::DisplayDriver;
use ink_render::Renderer;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Something the scheduler can run once per tick.
#[allow(async_fn_in_trait)]
pub trait Cycle {
    async fn run(&mut self) -> CycleResult;
}

impl<R: Renderer, D: DisplayDriver + 'static> Cycle for UpdateCycle<R, D> {
    async fn run(&mut self) -> CycleResult {
        UpdateCycle::run(self).await
    }
}

/// Timer state owned by the scheduler.
#[derive(Debug, Clone)]
pub struct ScheduleState {
    interval: Duration,
    next_due: Option<Instant>,
    cycles: u64,
    failures: u64,
    consecutive_failures: u64,
}

impl ScheduleState {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
            cycles: 0,
            failures: 0,
            consecutive_failures: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next cycle starts; `None` before the first one has run.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Cycles run to completion, whatever their outcome.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn consecutive_failures(&self) -> u64 {
        self.consecutive_failures
    }

    fn record(&mut self, started: Instant, result: &CycleResult) {
        self.cycles += 1;
        if result.error().is_some() {
            self.failures += 1;
            self.consecutive_failures += 1;
        } else {
            self.consecutive_failures = 0;
        }
        // an overrunning cycle is followed immediately by the next one
        self.next_due = Some((started + self.interval).max(Instant::now()));
    }
}

/// Runs a cycle at startup and then once every interval until shutdown.
///
/// Cycles run inline on the scheduler's task, so two never overlap. A cycle
/// that overruns the interval delays the next one instead of being skipped
/// or doubled up.
pub struct Scheduler<C> {
    cycle: C,
    state: ScheduleState,
}

impl<C: Cycle> Scheduler<C> {
    pub fn new(cycle: C, interval: Duration) -> Self {
        Self {
            cycle,
            state: ScheduleState::new(interval),
        }
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    pub fn cycle(&self) -> &C {
        &self.cycle
    }

    pub fn into_cycle(self) -> C {
        self.cycle
    }

    /// Run until `shutdown` is cancelled. A cycle in flight is allowed to
    /// reach its next stage boundary first.
    pub async fn run(&mut self, shutdown: &CancellationToken) {
        let mut ticker = tokio::time::interval(self.state.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if shutdown.run_until_cancelled(ticker.tick()).await.is_none() {
                break;
            }

            let started = Instant::now();
            let result = self.cycle.run().await;
            self.state.record(started, &result);

            if self.state.consecutive_failures > 1 {
                log::warn!(
                    "{} refreshes in a row have failed",
                    self.state.consecutive_failures
                );
            }
            if let Some(next_due) = self.state.next_due {
                log::debug!(
                    "cycle {} finished, next in {:?}",
                    self.state.cycles,
                    next_due.saturating_duration_since(Instant::now())
                );
            }
        }
        log::info!("scheduler stopped after {} cycles", self.state.cycles);
    }
}
