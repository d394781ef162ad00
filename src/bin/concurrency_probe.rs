use chat_probe::app;
use chat_probe::errors::ProbeError;
use chat_probe::harness::ConcurrencyHarness;

async fn run() -> Result<(), ProbeError> {
    let config = app::init()?;
    let client = app::create_client(&config)?;
    let request = config.chat_request(&config.model, config.harness_prompt());

    let harness = ConcurrencyHarness::new(client, request, config.concurrency);
    harness.run(&mut std::io::stdout()).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        log::error!("concurrency_probe: {:?}", e);
        eprintln!("{e}");
    }
}
