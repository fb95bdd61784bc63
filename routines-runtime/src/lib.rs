//! Routines Runtime - core runtime for periodic routine execution
//!
//! This crate provides the runtime infrastructure for periodic routines:
//! the [`Routine`] scheduling unit, the [`RoutineManager`] registry,
//! interval computation and configuration loading.

mod config;
mod error;
mod interval;
mod manager;
mod routine;

// Re-export public API
pub use config::{load_toml_config, load_yaml_config, RoutineConfig};
pub use error::{BoxError, HookKind, RoutineError, TaskResult};
pub use interval::IntervalSpec;
pub use manager::RoutineManager;
pub use routine::{Routine, RoutineBuilder, RoutineHandle, RoutineState};
