use anyhow::Result;
use coindash::{config::Config, ui::App};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (to stderr, since the TUI owns stdout)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting coindash");

    // Load configuration
    let config = Config::load()?;
    tracing::info!("Loaded config with {} assets", config.data.assets.len());

    // Run the application
    let mut app = App::new(config)?;
    app.run().await?;

    Ok(())
}
