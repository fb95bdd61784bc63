use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tracing::debug;

use crate::error::{BoxError, RoutineError, TaskResult};
use crate::interval::{Interval, IntervalSpec};

use super::builder::RoutineBuilder;
use super::handle::RoutineHandle;
use super::runner;

/// Lifecycle state of a routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineState {
    /// Constructed but never started.
    NotStarted,
    /// Run loop is live.
    Running,
    /// Graceful stop requested; one more iteration will run before exit.
    StopRequested,
    /// Cancelled; the loop exited without running further iterations.
    Cancelled,
    /// Iteration limit reached, stop completed, or the loop terminated.
    Completed,
}

impl std::fmt::Display for RoutineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RoutineState::NotStarted => "not started",
            RoutineState::Running => "running",
            RoutineState::StopRequested => "stopping",
            RoutineState::Cancelled => "cancelled",
            RoutineState::Completed => "completed",
        };
        write!(f, "{name}")
    }
}

/// Boxed future produced by a unit of work or a hook.
pub(crate) type BoxedTask = Pin<Box<dyn Future<Output = TaskResult> + Send>>;

pub(crate) type WorkFn = Arc<dyn Fn() -> BoxedTask + Send + Sync>;
pub(crate) type HookFn = Arc<dyn Fn() -> BoxedTask + Send + Sync>;
pub(crate) type ErrorHookFn = Arc<dyn Fn(BoxError) -> BoxedTask + Send + Sync>;

#[derive(Default)]
pub(crate) struct Hooks {
    pub(crate) before: Option<HookFn>,
    pub(crate) after: Option<HookFn>,
    pub(crate) error: Option<ErrorHookFn>,
}

/// Control signal observed by the run loop at its suspension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    Run,
    Stop,
    Cancel,
}

pub(crate) struct Shared {
    pub(crate) work: WorkFn,
    pub(crate) interval: Mutex<Interval>,
    pub(crate) wait_first: bool,
    pub(crate) iterations: Option<u64>,
    pub(crate) hooks: Mutex<Hooks>,
    pub(crate) completed: AtomicU64,
    pub(crate) started_at: Mutex<Option<DateTime<Local>>>,
    pub(crate) state: watch::Sender<RoutineState>,
    pub(crate) control: watch::Sender<Control>,
}

/// A self-contained periodic task with its own timing, state and hooks.
///
/// A `Routine` repeatedly runs its unit of work on the configured interval
/// inside a dedicated task. Cloning yields another handle addressing the
/// same routine; identity is the shared allocation.
#[derive(Clone)]
pub struct Routine {
    pub(crate) shared: Arc<Shared>,
}

impl std::fmt::Debug for Routine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Routine")
            .field("state", &self.state())
            .field("completed_iterations", &self.completed_iterations())
            .finish_non_exhaustive()
    }
}

impl Routine {
    /// Start building a routine around the given unit of work.
    pub fn builder<W, Fut>(work: W) -> RoutineBuilder
    where
        W: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        RoutineBuilder::new(work)
    }

    pub(crate) fn from_parts(
        work: WorkFn,
        interval: Interval,
        wait_first: bool,
        iterations: Option<u64>,
    ) -> Self {
        let (state, _) = watch::channel(RoutineState::NotStarted);
        let (control, _) = watch::channel(Control::Run);
        Self {
            shared: Arc::new(Shared {
                work,
                interval: Mutex::new(interval),
                wait_first,
                iterations,
                hooks: Mutex::new(Hooks::default()),
                completed: AtomicU64::new(0),
                started_at: Mutex::new(None),
                state,
                control,
            }),
        }
    }

    /// Launch the run loop as its own task and return a handle to it.
    ///
    /// Fails with [`RoutineError::InvalidState`] while the routine is live.
    /// A completed or cancelled routine may be started again; its counters
    /// and start time reset.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(&self) -> Result<RoutineHandle, RoutineError> {
        let started = self.shared.state.send_if_modified(|state| match state {
            RoutineState::Running | RoutineState::StopRequested => false,
            _ => {
                *state = RoutineState::Running;
                true
            }
        });
        if !started {
            return Err(RoutineError::InvalidState {
                operation: "start",
                state: self.state(),
            });
        }

        self.shared.completed.store(0, Ordering::SeqCst);
        *self.shared.started_at.lock().unwrap() = Some(Local::now());
        self.shared.control.send_replace(Control::Run);

        let control = self.shared.control.subscribe();
        let join = tokio::spawn(runner::run(self.shared.clone(), control));
        debug!("routine started");
        Ok(RoutineHandle::new(join))
    }

    /// Request graceful termination: the current wait finishes, one more
    /// iteration runs, then the loop exits through the after hook.
    ///
    /// Idempotent; no-op unless the routine is running.
    pub fn stop(&self) {
        let requested = self.shared.state.send_if_modified(|state| {
            if *state == RoutineState::Running {
                *state = RoutineState::StopRequested;
                true
            } else {
                false
            }
        });
        if requested {
            // A pending cancel always wins over a later stop.
            self.shared.control.send_if_modified(|control| {
                if *control == Control::Cancel {
                    false
                } else {
                    *control = Control::Stop;
                    true
                }
            });
            debug!("routine stop requested");
        }
    }

    /// Request cooperative cancellation: the loop exits at its next
    /// suspension point without running further iterations or hooks. An
    /// iteration already in flight runs to completion first.
    ///
    /// Idempotent; no-op unless the routine is live.
    pub fn cancel(&self) {
        let live = matches!(
            *self.shared.state.borrow(),
            RoutineState::Running | RoutineState::StopRequested
        );
        if live {
            self.shared.control.send_replace(Control::Cancel);
            debug!("routine cancel requested");
        }
    }

    /// Cancel the current run loop, wait for it to exit, and start again
    /// with fresh counters.
    ///
    /// Restart is only meaningful on a live routine; calling it in any other
    /// state fails with [`RoutineError::InvalidState`].
    pub async fn restart(&self) -> Result<RoutineHandle, RoutineError> {
        if !self.is_running() {
            return Err(RoutineError::InvalidState {
                operation: "restart",
                state: self.state(),
            });
        }
        self.cancel();

        let mut state = self.shared.state.subscribe();
        while matches!(
            *state.borrow_and_update(),
            RoutineState::Running | RoutineState::StopRequested
        ) {
            if state.changed().await.is_err() {
                break;
            }
        }
        self.start()
    }

    /// Attach the hook run once before the first iteration. A failure here
    /// aborts startup and surfaces on the activity handle; it is not routed
    /// through the error hook.
    pub fn before_routine<H, Fut>(&self, hook: H) -> Result<(), RoutineError>
    where
        H: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        let mut hooks = self.shared.hooks.lock().unwrap();
        if hooks.before.is_some() && self.has_started() {
            return Err(RoutineError::Configuration(
                "before hook is already attached".into(),
            ));
        }
        hooks.before = Some(Arc::new(move || Box::pin(hook()) as BoxedTask));
        Ok(())
    }

    /// Attach the hook run once after the final iteration, on graceful
    /// completion (iteration limit reached or stop). Cancellation skips it.
    pub fn after_routine<H, Fut>(&self, hook: H) -> Result<(), RoutineError>
    where
        H: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        let mut hooks = self.shared.hooks.lock().unwrap();
        if hooks.after.is_some() && self.has_started() {
            return Err(RoutineError::Configuration(
                "after hook is already attached".into(),
            ));
        }
        hooks.after = Some(Arc::new(move || Box::pin(hook()) as BoxedTask));
        Ok(())
    }

    /// Attach the hook invoked with the error whenever the unit of work
    /// fails. With a hook attached the loop keeps going; without one, the
    /// first failure terminates the loop.
    pub fn on_error<H, Fut>(&self, hook: H) -> Result<(), RoutineError>
    where
        H: Fn(BoxError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        let mut hooks = self.shared.hooks.lock().unwrap();
        if hooks.error.is_some() && self.has_started() {
            return Err(RoutineError::Configuration(
                "error hook is already attached".into(),
            ));
        }
        hooks.error = Some(Arc::new(move |err| Box::pin(hook(err)) as BoxedTask));
        Ok(())
    }

    /// Swap the timing specification. Takes effect from the next computed
    /// wait; a wait already in progress is not shortened or lengthened.
    pub fn change_interval(&self, spec: IntervalSpec) -> Result<(), RoutineError> {
        let interval = spec.resolve()?;
        *self.shared.interval.lock().unwrap() = interval;
        debug!(?interval, "routine interval changed");
        Ok(())
    }

    pub fn state(&self) -> RoutineState {
        *self.shared.state.borrow()
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.state(),
            RoutineState::Running | RoutineState::StopRequested
        )
    }

    /// Iterations completed in the current run, including ones whose failure
    /// was handled by the error hook.
    pub fn completed_iterations(&self) -> u64 {
        self.shared.completed.load(Ordering::SeqCst)
    }

    /// Iterations left before the limit, or `None` when unbounded.
    pub fn remaining_iterations(&self) -> Option<u64> {
        self.shared
            .iterations
            .map(|limit| limit.saturating_sub(self.completed_iterations()))
    }

    /// When the current run loop began; `None` once the routine has fully
    /// stopped.
    pub fn start_time(&self) -> Option<DateTime<Local>> {
        *self.shared.started_at.lock().unwrap()
    }

    /// Whether two handles address the same underlying routine.
    pub fn same_routine(&self, other: &Routine) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    fn has_started(&self) -> bool {
        !matches!(*self.shared.state.borrow(), RoutineState::NotStarted)
    }
}
