use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use routines::{Routine, RoutineState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let counter = Arc::new(AtomicU32::new(0));

    let worker = counter.clone();
    let routine = Routine::builder(move || {
        let worker = worker.clone();
        async move {
            let count = worker.fetch_add(1, Ordering::SeqCst) + 1;
            println!("[TICK] iteration #{count}");
            Ok(())
        }
    })
    .seconds(1)
    .iterations(3)
    .build()?;

    routine.after_routine(|| async {
        println!("[DONE] all iterations finished");
        Ok(())
    })?;

    let handle = routine.start()?;
    handle.join().await?;

    println!(
        "final state: {}, completed iterations: {}",
        routine.state(),
        routine.completed_iterations()
    );
    assert_eq!(routine.state(), RoutineState::Completed);
    Ok(())
}
