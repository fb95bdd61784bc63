use routines::{load_toml_config, Routine, RoutineConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_toml_config("demos/config/application.toml")?;
    let options = RoutineConfig::from_config(&config, "announce")?;
    println!("loaded announce options: {options:?}");

    let routine = Routine::builder(|| async {
        println!("[ANNOUNCE] hello chat!");
        Ok(())
    })
    .configure(&options)?
    .build()?;

    let handle = routine.start()?;
    handle.join().await?;

    println!("done after {} iterations", routine.completed_iterations());
    Ok(())
}
