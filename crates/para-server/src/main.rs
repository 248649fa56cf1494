mod config;
mod error;
mod rate_limit;
mod server;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use para_core::openai::ChatClient;
use para_core::questions::{FirstTerm, RandomTerm, SeededTerm, TermSelector};
use para_core::resources::LanguageResources;
use para_core::{AnalysisBackend, LocalBackend, RemoteBackend};

use config::{BackendKind, Config, TermSelection};
use error::AppError;
use rate_limit::RateLimiter;
use server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting para-server");

    let config = Config::from_env()?;
    let backend = build_backend(&config)?;
    info!(
        bind_addr = %config.bind_addr,
        backend = backend.label(),
        "backend configured"
    );

    let limiter = config.rate_limit_rps.map(RateLimiter::new);
    if let Some(limiter) = &limiter {
        info!(rps = limiter.rps(), "rate limiting enabled");
    }

    let state = Arc::new(AppState::new(backend, config.service_name.clone(), limiter));
    let app = server::create_router(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP server ready");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "HTTP server error"))?;

    info!("HTTP server shut down");
    Ok(())
}

fn build_backend(config: &Config) -> Result<Arc<dyn AnalysisBackend>, AppError> {
    match (config.backend, &config.remote) {
        (BackendKind::Remote, Some(remote)) => {
            info!(
                base_url = %remote.client.base_url,
                model = %remote.model,
                timeout_ms = remote.client.timeout.as_millis() as u64,
                max_retries = remote.client.max_retries,
                "remote client configured"
            );
            let client = ChatClient::new(remote.client.clone())?;
            Ok(Arc::new(RemoteBackend::new(client, remote.model.clone())))
        }
        (BackendKind::Remote, None) => Err(AppError::Config(
            "remote backend selected without remote settings".to_string(),
        )),
        (BackendKind::Local, _) => {
            let selector = term_selector(config.term_selection);
            let backend = match LanguageResources::shared(config.lexicon_path.as_deref()) {
                Ok(resources) => LocalBackend::new(resources, selector),
                Err(e) => {
                    warn!(error = %e, "language resources unavailable, serving fallback analysis only");
                    LocalBackend::without_resources(selector)
                }
            };
            Ok(Arc::new(backend))
        }
    }
}

fn term_selector(selection: TermSelection) -> Arc<dyn TermSelector> {
    match selection {
        TermSelection::First => Arc::new(FirstTerm),
        TermSelection::Random => Arc::new(RandomTerm),
        TermSelection::Seeded(seed) => Arc::new(SeededTerm::new(seed)),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
