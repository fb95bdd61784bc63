use tokio::task::JoinHandle;

use crate::error::RoutineError;

/// Handle for a routine's running scheduled activity.
///
/// Returned by [`Routine::start`](super::Routine::start). Awaiting it
/// observes the loop's terminal outcome, including the task error when the
/// unit of work failed with no error hook attached.
#[derive(Debug)]
pub struct RoutineHandle {
    join: JoinHandle<Result<(), RoutineError>>,
}

impl RoutineHandle {
    pub(crate) fn new(join: JoinHandle<Result<(), RoutineError>>) -> Self {
        Self { join }
    }

    /// Await the run loop until it exits.
    pub async fn join(self) -> Result<(), RoutineError> {
        self.join.await?
    }

    /// Whether the run loop has already exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
