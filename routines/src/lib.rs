//! # Routines - Periodic Async Tasks for Rust
//!
//! This library provides self-contained periodic routines: a unit of async
//! work re-invoked on a configurable interval, with lifecycle control,
//! hooks and a dedicated error-handling path.
//!
//! ## Features
//!
//! - **Duration intervals**: run every N seconds/minutes/hours (summed)
//! - **Daily intervals**: run at a fixed wall-clock time each day
//! - **Lifecycle control**: start, graceful stop, cancel, restart
//! - **Iteration limits**: stop automatically after N iterations
//! - **Hooks**: before the first iteration, after the last, and on error
//! - **Dynamic reconfiguration**: change the interval of a live routine
//! - **Config support**: load routine options from TOML/YAML config files
//!
//! ## Quick Start
//!
//! ```no_run
//! use routines::Routine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), routines::RoutineError> {
//!     let routine = Routine::builder(|| async {
//!         println!("polling the service");
//!         Ok(())
//!     })
//!     .seconds(30)
//!     .build()?;
//!
//!     let handle = routine.start()?;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(90)).await;
//!     routine.stop();
//!     handle.join().await?;
//!     Ok(())
//! }
//! ```
//!
//! A graceful `stop` lets the current wait elapse and runs one final
//! iteration; `cancel` exits at the next suspension point without running
//! anything further.
//!
//! ## Hooks
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), routines::RoutineError> {
//! use routines::Routine;
//!
//! let routine = Routine::builder(|| async { Err("flaky".into()) })
//!     .minutes(5)
//!     .build()?;
//!
//! routine.before_routine(|| async {
//!     println!("warming up");
//!     Ok(())
//! })?;
//! routine.on_error(|err| async move {
//!     eprintln!("iteration failed: {err}");
//!     Ok(())
//! })?;
//!
//! let handle = routine.start()?;
//! # handle.join().await?;
//! # Ok(())
//! # }
//! ```
//!
//! With an error hook attached the loop keeps going after a failure;
//! without one, the first failure ends the loop and surfaces on the handle
//! returned by `start`.
//!
//! ## Managing a fleet
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), routines::RoutineError> {
//! use routines::{IntervalSpec, RoutineManager};
//!
//! let manager = RoutineManager::new();
//! manager.routine(IntervalSpec::from_secs(60), || async {
//!     println!("announce");
//!     Ok(())
//! })?;
//! manager.routine(IntervalSpec::from_secs(300), || async {
//!     println!("sync");
//!     Ok(())
//! })?;
//!
//! manager.start_all();
//! // ... later, during shutdown or config reload:
//! manager.stop_all();
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! Create `config/application.toml`:
//!
//! ```toml
//! [announce]
//! seconds = 30
//! wait_first = true
//!
//! [digest]
//! time = "08:30"
//! ```
//!
//! Or the YAML equivalent. Values can be overridden with `ROUTINE_`-prefixed
//! environment variables. Then:
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), routines::RoutineError> {
//! use routines::{load_toml_config, Routine, RoutineConfig};
//!
//! let config = load_toml_config("config/application.toml")?;
//! let options = RoutineConfig::from_config(&config, "announce")?;
//!
//! let routine = Routine::builder(|| async { Ok(()) })
//!     .configure(&options)?
//!     .build()?;
//! # let _ = routine;
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use routines_runtime::{
    load_toml_config, load_yaml_config, BoxError, HookKind, IntervalSpec, Routine,
    RoutineBuilder, RoutineConfig, RoutineError, RoutineHandle, RoutineManager, RoutineState,
    TaskResult,
};
