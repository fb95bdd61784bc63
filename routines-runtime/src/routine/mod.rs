mod handle;
mod builder;
mod routine;
mod runner;

pub use handle::RoutineHandle;
pub use builder::RoutineBuilder;
pub use routine::{Routine, RoutineState};
