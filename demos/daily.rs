use routines::{IntervalSpec, Routine};

/// Daily mode: the routine fires at a fixed wall-clock time each day. For
/// the demo the target is a few seconds from now.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let at = (chrono::Local::now() + chrono::Duration::seconds(3)).time();
    println!("scheduling daily announcement for {at}");

    let routine = Routine::builder(|| async {
        println!("[DAILY] it is announcement time");
        Ok(())
    })
    .interval(IntervalSpec::at(at))
    .wait_first(true)
    .iterations(1)
    .build()?;

    let handle = routine.start()?;
    handle.join().await?;
    Ok(())
}
