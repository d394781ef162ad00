use chat_probe::app;
use chat_probe::errors::ProbeError;
use chat_probe::probe::run_probe;

async fn run() -> Result<(), ProbeError> {
    let config = app::init()?;
    let client = app::create_client(&config)?;
    let request = config.chat_request(&config.model, config.probe_prompt());

    let verdict = run_probe(
        &*client,
        &request,
        config.locale,
        &mut std::io::stdout(),
    )
    .await?;
    log::debug!("probe verdict: {:?}", verdict);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        log::error!("chat_probe: {:?}", e);
        eprintln!("{e}");
    }
}
