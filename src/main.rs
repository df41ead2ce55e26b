use tracing::{error, info};
use veriface::{utils::config::Config, Application};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = Config::new()?;

    // Initialize logging; RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.node.log_level)),
        )
        .with_target(true)
        .init();

    info!("Starting Veriface v{}", env!("CARGO_PKG_VERSION"));

    // Initialize application
    let app = Application::new(config).await.map_err(|e| {
        error!("Failed to initialize application: {}", e);
        e
    })?;

    // Serve until the host asks us to stop
    app.run().await.map_err(|e| {
        error!("Server error: {}", e);
        e
    })?;

    info!("Application shutdown complete");
    Ok(())
}
