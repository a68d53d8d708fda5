//! [`Scheduler`] – runs [`PeriodicTask`]s on a shared Tokio worker pool.
//!
//! Each deployed task becomes one Tokio task driven by
//! [`tokio::time::interval`].  The first tick fires one full period after
//! deployment; later ticks keep a fixed rate.  Ticks missed because the pool
//! was busy are skipped rather than replayed in a burst.
//!
//! A failing tick only ever affects its own task: the [`FaultPolicy`] decides
//! whether the task logs and carries on, or logs and ends.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use truck_runtime::scheduler::{FaultPolicy, PeriodicTask, Scheduler};
//! use truck_types::TruckError;
//!
//! struct Heartbeat;
//!
//! impl PeriodicTask for Heartbeat {
//!     fn name(&self) -> &str { "heartbeat" }
//!     fn interval(&self) -> Duration { Duration::from_secs(1) }
//!     fn on_tick(&mut self) -> Result<(), TruckError> { Ok(()) }
//! }
//!
//! # async fn run() -> Result<(), TruckError> {
//! let mut scheduler = Scheduler::current();
//! let handle = scheduler.deploy(Heartbeat, FaultPolicy::SkipTick)?;
//! assert_eq!(handle.name(), "heartbeat");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{Instrument, error, warn};
use truck_types::TruckError;

use crate::telemetry::task_span;

/// A unit of work re-invoked at a fixed interval for the life of the process.
pub trait PeriodicTask: Send + 'static {
    /// Name used in logs and deployment reports.
    fn name(&self) -> &str;

    /// Time between two ticks.  Must be non-zero.
    fn interval(&self) -> Duration;

    /// Run one tick.  Must not block for long: every task shares the same
    /// worker pool.
    fn on_tick(&mut self) -> Result<(), TruckError>;
}

/// What happens when [`PeriodicTask::on_tick`] returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// Log the error and wait for the next tick.
    #[default]
    SkipTick,
    /// Log the error and end this task.
    Stop,
}

/// Handle onto one deployed task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    name: String,
    abort: AbortHandle,
    ticks: Arc<AtomicU64>,
}

impl TaskHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of ticks started so far, failed ones included.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// `true` once the task has ended, either through
    /// [`FaultPolicy::Stop`] or [`abort`][Self::abort].
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }

    /// Cancel the task at its next suspension point.
    pub fn abort(&self) {
        self.abort.abort();
    }
}

/// Deploys periodic tasks onto a Tokio runtime and keeps track of them.
pub struct Scheduler {
    runtime: Handle,
    tasks: Vec<TaskHandle>,
}

impl Scheduler {
    /// Create a scheduler spawning onto `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            tasks: Vec::new(),
        }
    }

    /// Create a scheduler bound to the runtime of the calling context.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Start running `task` every [`PeriodicTask::interval`].
    ///
    /// # Errors
    ///
    /// Returns [`TruckError::Deployment`] when the task's interval is zero.
    pub fn deploy<T: PeriodicTask>(
        &mut self,
        task: T,
        policy: FaultPolicy,
    ) -> Result<TaskHandle, TruckError> {
        let name = task.name().to_string();
        let period = task.interval();
        if period.is_zero() {
            return Err(TruckError::Deployment {
                task: name,
                reason: "interval must be non-zero".to_string(),
            });
        }

        let ticks = Arc::new(AtomicU64::new(0));
        let span = task_span(&name, period);
        let join = self
            .runtime
            .spawn(run_periodic(task, period, policy, Arc::clone(&ticks)).instrument(span));

        let handle = TaskHandle {
            name,
            abort: join.abort_handle(),
            ticks,
        };
        self.tasks.push(handle.clone());
        Ok(handle)
    }

    /// Every task deployed so far.
    pub fn tasks(&self) -> &[TaskHandle] {
        &self.tasks
    }

    /// Abort every deployed task.
    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

async fn run_periodic<T: PeriodicTask>(
    mut task: T,
    period: Duration,
    policy: FaultPolicy,
    ticks: Arc<AtomicU64>,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        ticks.fetch_add(1, Ordering::Relaxed);

        let Err(e) = task.on_tick() else {
            continue;
        };
        match policy {
            FaultPolicy::SkipTick => {
                warn!(error = %e, "tick failed; skipping");
            }
            FaultPolicy::Stop => {
                error!(error = %e, "tick failed; stopping task");
                return;
            }
        }
    }
}
