use crate::routine::RoutineState;

/// Boxed error produced by a unit of work or a hook.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by units of work and hooks.
pub type TaskResult = Result<(), BoxError>;

/// Which hook raised a [`RoutineError::Hook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Before,
    After,
    Error,
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookKind::Before => write!(f, "before"),
            HookKind::After => write!(f, "after"),
            HookKind::Error => write!(f, "error"),
        }
    }
}

/// Errors surfaced by routine construction, lifecycle calls and the run loop.
#[derive(Debug, thiserror::Error)]
pub enum RoutineError {
    /// Invalid or missing interval specification, or an improper hook
    /// reattachment.
    #[error("invalid routine configuration: {0}")]
    Configuration(String),

    /// Lifecycle method invoked in a state that forbids it.
    #[error("cannot {operation} a routine that is {state}")]
    InvalidState {
        operation: &'static str,
        state: RoutineState,
    },

    /// The unit of work failed and no error hook was attached.
    #[error("routine task failed: {0}")]
    Task(#[source] BoxError),

    /// A before/after/error hook failed. Hook failures always terminate the
    /// run loop and are never routed back through the error hook.
    #[error("{kind} hook failed: {source}")]
    Hook {
        kind: HookKind,
        #[source]
        source: BoxError,
    },

    /// Configuration file could not be loaded or deserialized.
    #[error("failed to load routine configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// The spawned routine task panicked or was aborted.
    #[error("routine task did not run to completion: {0}")]
    Join(#[from] tokio::task::JoinError),
}
