use color_eyre::eyre::{Result, WrapErr};
use solmock::{ConsoleConfig, MockConsoleServer};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("solmock=info")
        .init();

    let config = ConsoleConfig::default();
    info!(address = %config.bind_addr, "starting mock serial console");

    let server = MockConsoleServer::new(config);
    server
        .run()
        .await
        .wrap_err("failed to run mock serial console")?;

    Ok(())
}
