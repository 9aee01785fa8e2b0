use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scripture_reader::config::Config;
use scripture_reader::gateway::FunctionGateway;
use scripture_reader::server::{AppState, build_router};
use scripture_reader::session::SessionRegistry;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scripture_reader=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "configuration error");
            std::process::exit(1);
        }
    };

    let gateway = Arc::new(FunctionGateway::new(config.gateway_endpoint.clone()));
    let cancel = CancellationToken::new();
    let registry = Arc::new(SessionRegistry::new(
        gateway,
        config.session_config(),
        cancel.clone(),
    ));

    let app = build_router(AppState::new(Arc::clone(&registry)));

    tracing::info!("listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await.unwrap();

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
            shutdown.cancel();
        })
        .await
        .unwrap();

    registry.shutdown_all().await;
}
