use std::future::Future;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::{RoutineError, TaskResult};
use crate::interval::IntervalSpec;
use crate::routine::Routine;

/// Registry that tracks a set of routines and fans lifecycle calls out to
/// all of them.
///
/// Tracking is non-owning with respect to execution: stopping through the
/// manager delegates to each routine's own `stop`/`cancel`, fire-and-forget,
/// and one routine never blocks another. Routines stay registered until
/// explicitly unregistered or cleared.
#[derive(Default)]
pub struct RoutineManager {
    registered: Mutex<Vec<Routine>>,
}

impl RoutineManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a routine. Idempotent: registering the same routine twice keeps
    /// a single entry.
    pub fn register(&self, routine: &Routine) {
        let mut registered = self.registered.lock().unwrap();
        if !registered.iter().any(|known| known.same_routine(routine)) {
            registered.push(routine.clone());
        }
    }

    /// Stop tracking a routine; no-op if it was never registered.
    pub fn unregister(&self, routine: &Routine) {
        self.registered
            .lock()
            .unwrap()
            .retain(|known| !known.same_routine(routine));
    }

    /// Construct a routine from an interval spec and a unit of work,
    /// registering it with this manager in one call. The returned routine is
    /// independently usable, exactly as if built directly.
    pub fn routine<W, Fut>(&self, spec: IntervalSpec, work: W) -> Result<Routine, RoutineError>
    where
        W: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        let routine = Routine::builder(work).interval(spec).build()?;
        self.register(&routine);
        Ok(routine)
    }

    /// Start every tracked routine that is not already live, detaching the
    /// run-loop handles. Failures are logged and do not affect the others.
    pub fn start_all(&self) {
        let registered = self.registered.lock().unwrap();
        debug!(count = registered.len(), "starting all routines");
        for routine in registered.iter() {
            if let Err(err) = routine.start() {
                warn!(error = %err, "failed to start routine");
            }
        }
    }

    /// Request graceful termination of every tracked routine.
    pub fn stop_all(&self) {
        let registered = self.registered.lock().unwrap();
        debug!(count = registered.len(), "stopping all routines");
        for routine in registered.iter() {
            routine.stop();
        }
    }

    /// Cancel every tracked routine.
    pub fn cancel_all(&self) {
        let registered = self.registered.lock().unwrap();
        debug!(count = registered.len(), "cancelling all routines");
        for routine in registered.iter() {
            routine.cancel();
        }
    }

    /// Cancel every tracked routine and drop all registrations.
    pub fn clear(&self) {
        let mut registered = self.registered.lock().unwrap();
        debug!(count = registered.len(), "clearing routines");
        for routine in registered.iter() {
            routine.cancel();
        }
        registered.clear();
    }

    /// Whether the routine is currently tracked.
    pub fn contains(&self, routine: &Routine) -> bool {
        self.registered
            .lock()
            .unwrap()
            .iter()
            .any(|known| known.same_routine(routine))
    }

    pub fn len(&self) -> usize {
        self.registered.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
