use credito_search::client::{CreditoApi, CreditoClient};
use credito_search::config::Config;
use credito_search::handlers::{router, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes logging, loads configuration, builds the credit API client
/// and serves the search page.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credito_search=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let client = CreditoClient::new(&config.credito_api_url, config.http_timeout())?;
    tracing::info!("✓ Credito API client initialized: {}", client.base_url());
    let api: Arc<dyn CreditoApi> = Arc::new(client);

    let app = router(AppState::new(api));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
