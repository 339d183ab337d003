use log::info;
use std::time::Duration;

use retries::{constant_delay, execute, options, CancelHandle, FlakyTask};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();
    println!("Starting the retries starter...");

    // Fails ten times, then succeeds on the eleventh call.
    let task = FlakyTask::new("starter", 10);
    let deadline = CancelHandle::with_timeout(Duration::from_secs(30));

    execute(
        task.clone(),
        vec![
            options::cancellation(deadline),
            options::attempts(20),
            options::on_retry(|attempt, wait, _| {
                info!("Retry #{}, until next retry {:?}", attempt, wait);
            }),
            options::delay(Duration::from_millis(200)),
            options::max_delay(Duration::from_secs(5)),
            options::delay_strategy(constant_delay),
        ],
    )
    .await?;

    println!("Finished after {} call(s)", task.calls());
    Ok(())
}
