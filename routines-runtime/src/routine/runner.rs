use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{HookKind, RoutineError};

use super::routine::{Control, RoutineState, Shared};

/// Outcome of one suspension at the wait point.
enum Waited {
    Elapsed,
    Stop,
    Cancelled,
}

/// How the loop ended.
enum Exit {
    Completed,
    Cancelled,
}

/// Run-loop entry point; owns the routine's terminal bookkeeping.
pub(crate) async fn run(
    shared: Arc<Shared>,
    mut control: watch::Receiver<Control>,
) -> Result<(), RoutineError> {
    let result = drive(&shared, &mut control).await;

    // Clear the bookkeeping before publishing the terminal state: a restart
    // may begin the moment the state change is observed.
    *shared.started_at.lock().unwrap() = None;
    let final_state = match &result {
        Ok(Exit::Cancelled) => RoutineState::Cancelled,
        _ => RoutineState::Completed,
    };
    shared.state.send_replace(final_state);

    match result {
        Ok(Exit::Completed) => {
            debug!(
                iterations = shared.completed.load(Ordering::SeqCst),
                "routine completed"
            );
            Ok(())
        }
        Ok(Exit::Cancelled) => {
            debug!("routine cancelled");
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "routine terminated");
            Err(err)
        }
    }
}

async fn drive(
    shared: &Shared,
    control: &mut watch::Receiver<Control>,
) -> Result<Exit, RoutineError> {
    let before = shared.hooks.lock().unwrap().before.clone();
    if let Some(before) = before {
        before().await.map_err(|source| RoutineError::Hook {
            kind: HookKind::Before,
            source,
        })?;
    }

    let mut first = true;
    loop {
        let waited = if first && !shared.wait_first {
            // The first iteration fires immediately, but a signal that
            // arrived between start and the loop's first poll still counts.
            peek(control)
        } else {
            let wait = shared
                .interval
                .lock()
                .unwrap()
                .next_wait(Local::now().naive_local());
            wait_until(wait, control).await
        };
        first = false;

        let stopping = match waited {
            Waited::Cancelled => return Ok(Exit::Cancelled),
            Waited::Stop => true,
            Waited::Elapsed => false,
        };

        if let Err(err) = (shared.work)().await {
            let error_hook = shared.hooks.lock().unwrap().error.clone();
            match error_hook {
                Some(hook) => {
                    warn!(error = %err, "routine iteration failed, dispatching to error hook");
                    hook(err).await.map_err(|source| RoutineError::Hook {
                        kind: HookKind::Error,
                        source,
                    })?;
                }
                None => return Err(RoutineError::Task(err)),
            }
        }

        let done = shared.completed.fetch_add(1, Ordering::SeqCst) + 1;
        let limit_reached = shared.iterations.is_some_and(|limit| done >= limit);
        if stopping || limit_reached {
            let after = shared.hooks.lock().unwrap().after.clone();
            if let Some(after) = after {
                after().await.map_err(|source| RoutineError::Hook {
                    kind: HookKind::After,
                    source,
                })?;
            }
            return Ok(Exit::Completed);
        }
    }
}

fn peek(control: &mut watch::Receiver<Control>) -> Waited {
    match *control.borrow_and_update() {
        Control::Cancel => Waited::Cancelled,
        Control::Stop => Waited::Stop,
        Control::Run => Waited::Elapsed,
    }
}

/// Suspend until the wait elapses or cancellation arrives. A graceful stop
/// lets the wait run to completion so the final iteration still fires on
/// schedule.
async fn wait_until(wait: Duration, control: &mut watch::Receiver<Control>) -> Waited {
    let mut stopping = false;
    match peek(control) {
        Waited::Cancelled => return Waited::Cancelled,
        Waited::Stop => stopping = true,
        Waited::Elapsed => {}
    }

    let sleep = tokio::time::sleep(wait);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            _ = &mut sleep => {
                return if stopping { Waited::Stop } else { Waited::Elapsed };
            }
            changed = control.changed() => {
                if changed.is_err() {
                    // A closed control channel means the routine is being
                    // torn down; exit as if cancelled.
                    return Waited::Cancelled;
                }
                match *control.borrow_and_update() {
                    Control::Cancel => return Waited::Cancelled,
                    Control::Stop => stopping = true,
                    Control::Run => {}
                }
            }
        }
    }
}
