use std::future::Future;
use std::sync::Arc;

use chrono::NaiveTime;

use crate::config::RoutineConfig;
use crate::error::{RoutineError, TaskResult};
use crate::interval::IntervalSpec;

use super::routine::{BoxedTask, Routine, WorkFn};

/// Builder for a [`Routine`].
///
/// Collects the unit of work, the interval specification and the optional
/// iteration limit; everything is validated at [`build`](Self::build) time.
pub struct RoutineBuilder {
    work: WorkFn,
    spec: IntervalSpec,
    wait_first: bool,
    iterations: Option<u64>,
}

impl RoutineBuilder {
    pub(crate) fn new<W, Fut>(work: W) -> Self
    where
        W: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        Self {
            work: Arc::new(move || Box::pin(work()) as BoxedTask),
            spec: IntervalSpec::default(),
            wait_first: false,
            iterations: None,
        }
    }

    /// Seconds component of a duration-mode interval.
    pub fn seconds(mut self, seconds: u64) -> Self {
        self.spec.seconds = seconds;
        self
    }

    /// Minutes component of a duration-mode interval.
    pub fn minutes(mut self, minutes: u64) -> Self {
        self.spec.minutes = minutes;
        self
    }

    /// Hours component of a duration-mode interval.
    pub fn hours(mut self, hours: u64) -> Self {
        self.spec.hours = hours;
        self
    }

    /// Daily mode: fire at this wall-clock time each day. Mutually exclusive
    /// with the duration components.
    pub fn at(mut self, time: NaiveTime) -> Self {
        self.spec.time = Some(time);
        self
    }

    /// Replace the whole interval specification at once.
    pub fn interval(mut self, spec: IntervalSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Delay the first iteration by one full interval instead of running it
    /// immediately.
    pub fn wait_first(mut self, wait_first: bool) -> Self {
        self.wait_first = wait_first;
        self
    }

    /// Upper bound on completed iterations; the routine stops itself once
    /// reached.
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Apply options loaded from application config.
    pub fn configure(mut self, config: &RoutineConfig) -> Result<Self, RoutineError> {
        self.spec = config.interval_spec()?;
        self.wait_first = config.wait_first;
        self.iterations = config.iterations;
        Ok(self)
    }

    /// Validate the configuration and construct the routine.
    pub fn build(self) -> Result<Routine, RoutineError> {
        if self.iterations == Some(0) {
            return Err(RoutineError::Configuration(
                "iterations must be positive".into(),
            ));
        }
        let interval = self.spec.resolve()?;
        Ok(Routine::from_parts(
            self.work,
            interval,
            self.wait_first,
            self.iterations,
        ))
    }
}
