use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use research_report_client::{config::Config, routes, state::AppState};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = Arc::new(AppState::from_config(&config).context("building report client")?);
    tracing::info!(
        endpoint = state.client.endpoint(),
        timeout = ?state.client.timeout(),
        session_ttl = ?state.sessions.ttl(),
        "report service configured"
    );

    let sessions = state.sessions.clone();
    let purge_every = (config.session_ttl / 2).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(purge_every);
        loop {
            ticker.tick().await;
            let removed = sessions.purge_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "purged idle sessions");
            }
        }
    });

    let app = routes::create_router()
        .with_state(state)
        .layer(CorsLayer::very_permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;

    tracing::info!("🚀 Research assistant running at http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
