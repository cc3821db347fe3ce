//! Fixed-cadence scheduler
//!
//! Drives the pipeline forever: Idle while waiting for the next tick,
//! Running while one job is in flight. Single-threaded: the loop
//! blocks on the job before re-checking ticks, so runs can
//! never overlap. Time comes through the `Clock` trait so tests can
//! inject synthetic ticks instead of sleeping.

use crate::config::ScheduleConfig;
use crate::error::Result;
use crate::pipeline::RunReport;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info};

/// Source of time for the scheduler
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by tokio sleeps
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Scheduler state: exactly one job in flight at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunnerState {
    Idle,
    Running,
}

/// Runs a job on a fixed interval, forever.
///
/// A job returning `Err` (store failure) is logged and isolated: the
/// run is over, the loop keeps ticking. There is no graceful shutdown
/// inside the loop; the process is stopped externally.
pub struct Scheduler<C: Clock> {
    clock: C,
    interval: ChronoDuration,
    poll: Duration,
    warm_start: bool,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C, config: &ScheduleConfig) -> Self {
        Self {
            clock,
            interval: ChronoDuration::minutes(config.interval_minutes as i64),
            poll: Duration::from_secs(config.poll_secs),
            warm_start: config.warm_start,
        }
    }

    /// Run the scheduling loop until the process is terminated
    pub async fn run<F, Fut>(&self, mut job: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RunReport>>,
    {
        self.run_bounded(&mut job, None).await;
    }

    /// The loop body, with an optional run budget used by tests
    async fn run_bounded<F, Fut>(&self, job: &mut F, max_runs: Option<usize>)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RunReport>>,
    {
        let mut state = RunnerState::Idle;
        let mut runs = 0usize;
        let mut next_due = self.clock.now() + self.interval;

        info!(
            "Scheduler started: every {} minute(s), warm start {}",
            self.interval.num_minutes(),
            self.warm_start
        );

        // Warm start is an explicit initial transition, not the first
        // tick: the job runs once, synchronously, before the loop.
        if self.warm_start {
            state = self.execute(job, state).await;
            runs += 1;
            if max_runs.is_some_and(|max| runs >= max) {
                return;
            }
        }

        loop {
            self.clock.sleep(self.poll).await;

            if self.clock.now() < next_due {
                continue;
            }

            state = self.execute(job, state).await;
            runs += 1;

            // An overrunning job advances the schedule in whole
            // intervals rather than drifting by job duration.
            while next_due <= self.clock.now() {
                next_due = next_due + self.interval;
            }

            if max_runs.is_some_and(|max| runs >= max) {
                return;
            }
        }
    }

    /// One Idle → Running → Idle transition. Unconditionally returns
    /// to Idle whether the job succeeded or failed.
    async fn execute<F, Fut>(&self, job: &mut F, state: RunnerState) -> RunnerState
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RunReport>>,
    {
        debug_assert_eq!(state, RunnerState::Idle);
        debug!("Runner: idle -> running");

        match job().await {
            Ok(report) => {
                debug!(
                    "Run finished: {} extracted, {} inserted",
                    report.extracted, report.inserted
                );
            }
            Err(e) => {
                error!("Pipeline run failed: {}", e);
            }
        }

        debug!("Runner: running -> idle");
        RunnerState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Clock whose sleeps advance a synthetic time instead of waiting
    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Utc::now()),
            }
        }
    }

    #[async_trait]
    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }

        async fn sleep(&self, duration: Duration) {
            let mut now = self.now.lock().unwrap();
            *now = *now + ChronoDuration::from_std(duration).unwrap();
        }
    }

    fn config(interval_minutes: u64, warm_start: bool) -> ScheduleConfig {
        ScheduleConfig {
            interval_minutes,
            poll_secs: 1,
            warm_start,
        }
    }

    #[tokio::test]
    async fn test_warm_start_runs_before_first_tick() {
        let clock = ManualClock::new();
        let started = clock.now();
        let scheduler = Scheduler::new(clock, &config(5, true));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut job = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(RunReport::default()) }
        };

        scheduler.run_bounded(&mut job, Some(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // No polling sleep happened before the warm-start run
        assert_eq!(scheduler.clock.now(), started);
    }

    #[tokio::test]
    async fn test_interval_elapses_before_run() {
        let clock = ManualClock::new();
        let started = clock.now();
        let scheduler = Scheduler::new(clock, &config(1, false));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut job = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(RunReport::default()) }
        };

        scheduler.run_bounded(&mut job, Some(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Two one-minute intervals of one-second polls
        let elapsed = scheduler.clock.now() - started;
        assert_eq!(elapsed, ChronoDuration::seconds(120));
    }

    #[tokio::test]
    async fn test_job_failure_does_not_stop_the_loop() {
        let clock = ManualClock::new();
        let scheduler = Scheduler::new(clock, &config(1, true));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut job = move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(Error::Other("store unavailable".to_string()))
                } else {
                    Ok(RunReport::default())
                }
            }
        };

        // Warm-start run fails; the next scheduled tick still fires
        scheduler.run_bounded(&mut job, Some(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
