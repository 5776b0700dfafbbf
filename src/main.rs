use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use translate_service::config::{Settings, DEFAULT_LOG_FILTER};
use translate_service::config_manager::{ArtifactFetcher, ArtifactLocation};
use translate_service::llm::OpenAICompatibleLLM;
use translate_service::routes::create_app;
use translate_service::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    // Any failure up to the bind is fatal: the server never starts without a
    // configuration.
    let settings = Settings::from_env()?;
    let location = ArtifactLocation::parse(settings.storage_location()?, &settings.config_object)?;

    let http = reqwest::Client::new();
    let configuration = ArtifactFetcher::new(http.clone())
        .with_gcs_token(settings.gcs_access_token().map(str::to_string))
        .load(&location)
        .await?;

    let model = OpenAICompatibleLLM::new(
        http,
        settings.openai_base_url.clone(),
        settings.api_key()?,
        configuration.model_name(),
    );

    let app = create_app(AppState::new(configuration, Arc::new(model)));

    let listener = tokio::net::TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
