//! Web front end: upload page, submit endpoints and the download route.

mod error;
pub mod handlers;
mod page;

use crate::config::cli::LocalStorage;
use crate::config::toml_config::TomlConfig;
use crate::core::etl::EtlEngine;
use crate::core::pipeline::TransformPipeline;
use crate::core::ConfigProvider;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub type ServicePipeline = TransformPipeline<LocalStorage, TomlConfig>;

/// 路由共享的唯讀狀態
pub struct AppState {
    pub engine: EtlEngine<ServicePipeline>,
}

impl AppState {
    pub fn new(config: TomlConfig) -> Self {
        let storage = LocalStorage::new(config.output_path().to_string());
        Self {
            engine: EtlEngine::new(TransformPipeline::new(storage, config)),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let config = state.engine.pipeline().config();
    let upload_limit = config.max_upload_bytes();
    let submit_limit = config.max_submit_body_bytes();

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health_check))
        .route(
            "/api/submit",
            post(handlers::submit).layer(DefaultBodyLimit::max(submit_limit)),
        )
        .route(
            "/api/upload",
            post(handlers::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/download/{*path}", get(handlers::download))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}

pub async fn serve(config: TomlConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address {}: {}", config.server_addr(), e))?;

    info!("📁 Transformed files are written to {}", config.output_path());
    let app = router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Ctrl+C 或 SIGTERM 時結束
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}
