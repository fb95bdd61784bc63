use std::time::Duration;

use routines::Routine;

/// A routine whose work fails on every call keeps running as long as an
/// error hook recovers the failures.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let routine = Routine::builder(|| async {
        println!("[WORK] polling the flaky service...");
        Err("service unavailable".into())
    })
    .seconds(1)
    .build()?;

    routine.on_error(|err| async move {
        println!("[RECOVERED] {err}");
        Ok(())
    })?;

    let handle = routine.start()?;

    tokio::time::sleep(Duration::from_secs(5)).await;
    routine.cancel();
    handle.join().await?;

    println!("iterations survived: {}", routine.completed_iterations());
    Ok(())
}
