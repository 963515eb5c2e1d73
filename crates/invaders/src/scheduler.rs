//! # Task Scheduler
//!
//! Periodic tasks, one named OS thread each, started in priority order.
//!
//! ```text
//! ┌──────────┐  start()   ┌──────────────────────────────┐
//! │ TaskSpec │──────────> │ thread "ship" (stack budget) │
//! │ + task   │            │   WAIT  timer.wait_next()    │
//! └──────────┘            │   stop? shutdown -> exit     │
//!                         │   ACT   task.tick()          │
//!                         └──────────────────────────────┘
//! ```
//!
//! Threads are created highest priority first. Every task wakes on absolute
//! deadlines; a task that falls more than a period behind resynchronises
//! and the tick is counted as late.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use invaders_core::{PeriodicTimer, ShutdownSignal};

use crate::error::{InvadersError, InvadersResult};

/// Static description of a periodic task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    /// Thread name.
    pub name: String,
    /// Start order: higher is spawned first. Running threads are not
    /// prioritised; the OS schedules them as equals.
    pub priority: u8,
    /// Time between ticks.
    pub period: Duration,
    /// Stack budget of the thread, in bytes.
    pub stack_size: usize,
}

impl TaskSpec {
    /// Creates a spec.
    #[must_use]
    pub fn new(name: impl Into<String>, priority: u8, period: Duration, stack_size: usize) -> Self {
        Self { name: name.into(), priority, period, stack_size }
    }
}

/// Unit of periodic work.
pub trait PeriodicTask: Send + 'static {
    /// Runs one ACT phase.
    fn tick(&mut self);

    /// Whether pausing the game suspends this task.
    fn pausable(&self) -> bool {
        true
    }
}

/// Shared run state of every task: shutdown and pause.
#[derive(Debug, Clone, Default)]
pub struct TaskControl {
    shutdown: ShutdownSignal,
    paused: Arc<AtomicBool>,
}

impl TaskControl {
    /// Wraps an existing shutdown signal.
    #[must_use]
    pub fn new(shutdown: ShutdownSignal) -> Self {
        Self { shutdown, paused: Arc::default() }
    }

    /// The shutdown signal.
    #[must_use]
    pub const fn shutdown(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Suspends pausable tasks.
    pub fn pause(&self) {
        if !self.paused.swap(true, Ordering::AcqRel) {
            tracing::info!("game paused");
        }
    }

    /// Resumes pausable tasks.
    pub fn resume(&self) {
        if self.paused.swap(false, Ordering::AcqRel) {
            tracing::info!("game resumed");
        }
    }

    /// Returns true while paused.
    #[inline]
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }
}

/// What a task did before it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// Task name.
    pub name: String,
    /// Wake-ups.
    pub ticks: u64,
    /// Wake-ups that were resynchronised.
    pub late_ticks: u64,
    /// ACT phases run.
    pub acted: u64,
}

struct Pending {
    spec: TaskSpec,
    task: Box<dyn PeriodicTask>,
}

/// Owner of the periodic task threads.
pub struct Scheduler {
    control: TaskControl,
    started: Instant,
    pending: Vec<Pending>,
    running: Vec<(String, JoinHandle<TaskReport>)>,
}

impl Scheduler {
    /// Creates an idle scheduler bound to `shutdown`.
    #[must_use]
    pub fn new(shutdown: ShutdownSignal) -> Self {
        Self {
            control: TaskControl::new(shutdown),
            started: Instant::now(),
            pending: Vec::new(),
            running: Vec::new(),
        }
    }

    /// Shared run state handed to tasks and input.
    #[must_use]
    pub fn control(&self) -> TaskControl {
        self.control.clone()
    }

    /// Registers a task to be spawned by [`Scheduler::start`].
    pub fn add(&mut self, spec: TaskSpec, task: impl PeriodicTask) {
        self.pending.push(Pending { spec, task: Box::new(task) });
    }

    /// Number of running task threads.
    #[must_use]
    pub fn running(&self) -> usize {
        self.running.len()
    }

    /// Milliseconds since the scheduler was created.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Spawns every registered task, highest priority first.
    ///
    /// # Errors
    ///
    /// Returns `TaskSpawn` if a thread cannot be created. Tasks already
    /// started are stopped and joined before returning.
    pub fn start(&mut self) -> InvadersResult<()> {
        let mut pending = std::mem::take(&mut self.pending);
        pending.sort_by(|a, b| b.spec.priority.cmp(&a.spec.priority));

        for Pending { spec, task } in pending {
            let name = spec.name.clone();
            let control = self.control.clone();
            let stack_size = spec.stack_size;
            match spawn_named(&name, stack_size, move || run_task(&spec, task, &control)) {
                Ok(handle) => self.running.push((name, handle)),
                Err(error) => {
                    self.control.shutdown().trigger();
                    let _ = self.join_all();
                    return Err(error);
                }
            }
        }
        tracing::info!(tasks = self.running.len(), "scheduler started");
        Ok(())
    }

    /// Suspends every pausable task.
    pub fn pause(&self) {
        self.control.pause();
    }

    /// Resumes every pausable task.
    pub fn resume(&self) {
        self.control.resume();
    }

    /// Returns true while paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.control.is_paused()
    }

    /// Signals shutdown and waits for every task to exit.
    ///
    /// # Errors
    ///
    /// Returns `TaskPanicked` for the first task that panicked. Every
    /// thread is joined regardless.
    pub fn shutdown_and_join(&mut self) -> InvadersResult<Vec<TaskReport>> {
        self.control.shutdown().trigger();
        let reports = self.join_all()?;
        tracing::info!(tasks = reports.len(), uptime_ms = self.tick_count(), "scheduler stopped");
        Ok(reports)
    }

    fn join_all(&mut self) -> InvadersResult<Vec<TaskReport>> {
        let mut reports = Vec::with_capacity(self.running.len());
        let mut panicked = None;
        for (name, handle) in self.running.drain(..) {
            match handle.join() {
                Ok(report) => reports.push(report),
                Err(_) => {
                    tracing::error!(task = %name, "task panicked");
                    panicked.get_or_insert(name);
                }
            }
        }
        match panicked {
            Some(name) => Err(InvadersError::TaskPanicked { name }),
            None => Ok(reports),
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if !self.running.is_empty() {
            self.control.shutdown().trigger();
            let _ = self.join_all();
        }
    }
}

/// Spawns a named thread with a stack budget.
///
/// # Errors
///
/// Returns `TaskSpawn` if the OS refuses the thread.
pub fn spawn_named<T, F>(name: &str, stack_size: usize, body: F) -> InvadersResult<JoinHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_owned())
        .stack_size(stack_size)
        .spawn(body)
        .map_err(|source| InvadersError::TaskSpawn { name: name.to_owned(), source })
}

fn run_task(spec: &TaskSpec, mut task: Box<dyn PeriodicTask>, control: &TaskControl) -> TaskReport {
    tracing::info!(
        task = %spec.name,
        priority = spec.priority,
        period = ?spec.period,
        "task started"
    );

    let mut timer = PeriodicTimer::new(spec.period);
    let mut acted = 0;
    loop {
        timer.wait_next();
        if control.shutdown().is_triggered() {
            break;
        }
        if task.pausable() && control.is_paused() {
            continue;
        }
        task.tick();
        acted += 1;
    }

    let stats = timer.stats();
    tracing::info!(task = %spec.name, ticks = stats.ticks, late = stats.late_ticks, "task stopped");
    TaskReport {
        name: spec.name.clone(),
        ticks: stats.ticks,
        late_ticks: stats.late_ticks,
        acted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;

    struct Counter {
        hits: Arc<AtomicU64>,
        pausable: bool,
    }

    impl PeriodicTask for Counter {
        fn tick(&mut self) {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }

        fn pausable(&self) -> bool {
            self.pausable
        }
    }

    fn spec(name: &str, priority: u8) -> TaskSpec {
        TaskSpec::new(name, priority, Duration::from_millis(1), 64 * 1024)
    }

    fn counter(pausable: bool) -> (Counter, Arc<AtomicU64>) {
        let hits = Arc::new(AtomicU64::new(0));
        (Counter { hits: Arc::clone(&hits), pausable }, hits)
    }

    #[test]
    fn test_tasks_tick_until_shutdown() {
        let mut scheduler = Scheduler::new(ShutdownSignal::new());
        let (task, hits) = counter(true);
        scheduler.add(spec("counter", 1), task);
        scheduler.start().unwrap();
        assert_eq!(scheduler.running(), 1);

        thread::sleep(Duration::from_millis(30));
        let reports = scheduler.shutdown_and_join().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(scheduler.running(), 0);
        assert_eq!(reports[0].name, "counter");
        assert!(reports[0].acted > 0);
        assert_eq!(reports[0].acted, hits.load(Ordering::Relaxed));
    }

    #[test]
    fn test_pause_skips_pausable_tasks_only() {
        let mut scheduler = Scheduler::new(ShutdownSignal::new());
        let (gameplay, gameplay_hits) = counter(true);
        let (input, input_hits) = counter(false);
        scheduler.add(spec("gameplay", 2), gameplay);
        scheduler.add(spec("input", 3), input);
        scheduler.pause();
        scheduler.start().unwrap();

        thread::sleep(Duration::from_millis(20));
        assert_eq!(gameplay_hits.load(Ordering::Relaxed), 0);
        assert!(input_hits.load(Ordering::Relaxed) > 0);

        scheduler.resume();
        thread::sleep(Duration::from_millis(20));
        assert!(gameplay_hits.load(Ordering::Relaxed) > 0);
        scheduler.shutdown_and_join().unwrap();
    }

    #[test]
    fn test_spawned_in_priority_order() {
        let mut scheduler = Scheduler::new(ShutdownSignal::new());
        for (name, priority) in [("low", 1), ("high", 3), ("mid", 2)] {
            scheduler.add(spec(name, priority), counter(true).0);
        }
        scheduler.start().unwrap();
        let reports = scheduler.shutdown_and_join().unwrap();
        let names: Vec<_> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["high", "mid", "low"]);
    }

    #[test]
    fn test_shutdown_before_first_tick_never_acts() {
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();
        let mut scheduler = Scheduler::new(shutdown);
        let (task, hits) = counter(true);
        scheduler.add(spec("idle", 1), task);
        scheduler.start().unwrap();

        let reports = scheduler.shutdown_and_join().unwrap();
        assert_eq!(reports[0].acted, 0);
        assert_eq!(hits.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_panicking_task_reported() {
        struct Boom;
        impl PeriodicTask for Boom {
            fn tick(&mut self) {
                panic!("boom");
            }
        }

        let mut scheduler = Scheduler::new(ShutdownSignal::new());
        scheduler.add(spec("boom", 1), Boom);
        scheduler.start().unwrap();
        thread::sleep(Duration::from_millis(10));
        let err = scheduler.shutdown_and_join().unwrap_err();
        assert!(matches!(err, InvadersError::TaskPanicked { name } if name == "boom"));
    }

    #[test]
    fn test_tick_count_advances() {
        let scheduler = Scheduler::new(ShutdownSignal::new());
        thread::sleep(Duration::from_millis(5));
        assert!(scheduler.tick_count() >= 5);
    }
}
