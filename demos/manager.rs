use std::time::Duration;

use routines::{IntervalSpec, RoutineManager};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let manager = RoutineManager::new();

    manager.routine(IntervalSpec::from_secs(1), || async {
        println!("[ANNOUNCE] join our channel!");
        Ok(())
    })?;

    manager.routine(IntervalSpec::from_secs(2), || async {
        println!("[SYNC] refreshing state");
        Ok(())
    })?;

    manager.start_all();
    println!("running {} routines for 6 seconds...", manager.len());

    tokio::time::sleep(Duration::from_secs(6)).await;

    // Graceful: each routine finishes its wait and one more iteration.
    manager.stop_all();
    tokio::time::sleep(Duration::from_secs(3)).await;
    Ok(())
}
