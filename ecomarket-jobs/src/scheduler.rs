//! Fixed-interval job scheduler.
//!
//! Each registered job carries its own interval; `run_pending` runs every job
//! whose due time has passed and reschedules it relative to the current time,
//! so a stalled process does not replay a burst of missed runs. Job failures
//! are logged and the job stays scheduled; one bad run never takes the
//! simulation down.

use anyhow::Result;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use ecomarket_core::clock::Clock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// A unit of recurring work.
pub trait Job: Send + Sync {
    fn name(&self) -> &str;
    fn run(&self) -> Result<()>;
}

struct Slot {
    job: Box<dyn Job>,
    interval: ChronoDuration,
    next_due: DateTime<Utc>,
}

/// Runs registered jobs at their fixed intervals against the injected clock.
pub struct Scheduler {
    clock: Arc<dyn Clock>,
    slots: Vec<Slot>,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            slots: Vec::new(),
        }
    }

    /// Register a job. Its first run is due immediately.
    pub fn register(&mut self, job: Box<dyn Job>, interval: Duration) {
        let interval = ChronoDuration::from_std(interval).unwrap_or(ChronoDuration::minutes(1));
        info!(job = job.name(), interval_secs = interval.num_seconds(), "job registered");
        self.slots.push(Slot {
            job,
            interval,
            next_due: self.clock.now(),
        });
    }

    /// Run every job whose due time has passed. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let now = self.clock.now();
        let mut ran = 0;
        for slot in &mut self.slots {
            if now < slot.next_due {
                continue;
            }
            debug!(job = slot.job.name(), "running scheduled job");
            if let Err(err) = slot.job.run() {
                error!(job = slot.job.name(), error = %err, "scheduled job failed");
            }
            slot.next_due = now + slot.interval;
            ran += 1;
        }
        ran
    }

    /// Time until the next job is due, if any are registered.
    pub fn time_to_next(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.slots
            .iter()
            .map(|s| s.next_due)
            .min()
            .map(|due| (due - now).to_std().unwrap_or(Duration::ZERO))
    }

    /// Loop forever, sleeping between due times. Only returns if no jobs are
    /// registered.
    pub fn run_forever(&mut self) {
        while !self.slots.is_empty() {
            self.run_pending();
            if let Some(wait) = self.time_to_next() {
                std::thread::sleep(wait.max(Duration::from_millis(100)));
            }
        }
    }
}
