use std::sync::Arc;

use anyhow::Context;
use ngo_detail::config::Config;
use ngo_detail::http_client::HttpClient;
use ngo_detail::services::{Navigate, NgoDetailView, ViewPhase};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ngo_detail=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration; a positional argument overrides NGO_ID
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(arg) = std::env::args().nth(1) {
        config.ngo_id = arg
            .parse()
            .with_context(|| format!("Invalid NGO id: {}", arg))?;
    }

    tracing::info!(
        "Loading NGO {} from {}",
        config.ngo_id,
        config.api_base_url
    );

    let client = HttpClient::new(&config)?;
    let navigate: Navigate = Arc::new(|page: &str| tracing::info!("Navigate to {}", page));
    let view = NgoDetailView::mount(client, config.ngo_id, navigate);
    view.settled().await;

    let snapshot = view.snapshot();
    view.unmount();

    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if let ViewPhase::Failed { message } = &snapshot.phase {
        anyhow::bail!("{}", message);
    }

    Ok(())
}
