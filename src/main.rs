//! AgriSmart ML service entry point.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use agrismart_ml::adapters::ai::gemini_from_config;
use agrismart_ml::adapters::http::{build_router, AgronomyAppState};
use agrismart_ml::config::AppConfig;
use agrismart_ml::ports::AIProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config);
    config.validate().context("invalid configuration")?;

    let provider: Option<Arc<dyn AIProvider>> = match gemini_from_config(&config.ai)? {
        Some(chain) => {
            tracing::info!(
                models = ?config.ai.model_candidates(),
                "Gemini configured"
            );
            Some(Arc::new(chain) as Arc<dyn AIProvider>)
        }
        None => {
            tracing::warn!(
                "GEMINI_API_KEY not set; every endpoint will answer with fallback records"
            );
            None
        }
    };

    let state = AgronomyAppState::with_model_deadline(provider, config.server.model_deadline());
    let app = build_router(state, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, environment = ?config.server.environment, "AgriSmart ML service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured level; production logs are JSON.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).compact().init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
