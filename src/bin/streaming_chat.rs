use chat_probe::app;
use chat_probe::chat::ChatSession;
use chat_probe::errors::ProbeError;
use tokio::io::BufReader;

async fn run() -> Result<(), ProbeError> {
    let config = app::init()?;
    let client = app::create_client(&config)?;

    let input = BufReader::new(tokio::io::stdin());
    let mut session = ChatSession::new(client, &config.stream_model, input, std::io::stdout())
        .with_sampling(config.sampling);

    let end = session
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::warn!("cannot listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    log::debug!("session ended: {:?}", end);
    Ok(())
}

fn main() {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("failed to start runtime: {e}");
            return;
        }
    };

    if let Err(e) = runtime.block_on(run()) {
        log::error!("streaming_chat: {:?}", e);
        eprintln!("{e}");
    }

    // A stdin read may still be parked on a blocking thread after Ctrl+C.
    runtime.shutdown_background();
}
