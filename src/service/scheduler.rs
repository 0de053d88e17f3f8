use std::time::{Duration, Instant};

use crate::common::Result;

use super::Updater;

/// State carried from one iteration of the loop to the next.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopState {
    /// Completed runs since startup. Only used for logging.
    pub runs: u64,
}

/// Repeats the updater on a fixed interval, measured from the start of each
/// run. A run that overruns the interval is followed immediately by the next.
pub struct Scheduler {
    updater: Updater,
    interval: Duration,
}

impl Scheduler {
    pub fn new(updater: Updater, interval: Duration) -> Self {
        Self { updater, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Perform one run and return the advanced state.
    pub fn tick(&self, state: LoopState) -> Result<LoopState> {
        let outcome = self.updater.run()?;
        let state = LoopState {
            runs: state.runs + 1,
        };

        tracing::info!(
            run = state.runs,
            address = %outcome.address,
            name = %outcome.target,
            created = outcome.changes.created,
            updated = outcome.changes.updated,
            failed = outcome.changes.failed_creates,
            "Run completed"
        );
        Ok(state)
    }

    /// Run immediately, then keep running every interval for as long as
    /// `keep_going` holds for the state after a run. Stops at the first error.
    pub fn run_while<F>(&self, mut keep_going: F) -> Result<LoopState>
    where
        F: FnMut(&LoopState) -> bool,
    {
        let mut state = LoopState::default();
        loop {
            let started = Instant::now();
            state = self.tick(state)?;
            if !keep_going(&state) {
                return Ok(state);
            }

            let wait = self.interval.saturating_sub(started.elapsed());
            tracing::info!(
                run = state.runs,
                wait_secs = wait.as_secs(),
                "Waiting for the next run"
            );
            std::thread::sleep(wait);
        }
    }

    /// Loop forever. Only returns when a run fails.
    pub fn run(&self) -> Result<LoopState> {
        if self.interval.is_zero() {
            tracing::warn!("Update interval is zero, runs will follow each other without pause");
        }
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Starting update loop"
        );
        self.run_while(|_| true)
    }
}
