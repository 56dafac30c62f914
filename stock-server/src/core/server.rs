//! Server Implementation
//!
//! HTTP 服务器启动和路由组装

use std::net::SocketAddr;

use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::{Config, Result, ServerState};

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    let status = response.status();
    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);
    response
}

/// Resolves once `signal` fires. A handler that cannot be installed is
/// logged and shuts the server down as well.
async fn shutdown_signal(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(e) = signal.await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down...");
}

/// Build the full application router bound to `state`
pub fn build_router(state: ServerState) -> Router {
    crate::api::routes()
        // JWT 认证中间件 - require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(log_request))
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new()),
        )
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with an initialized state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> Result<()> {
        let app = build_router(self.state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Stock server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_signal_resolves_on_handler_error() {
        let failing = async { Err(std::io::Error::other("no signal support")) };
        tokio::time::timeout(std::time::Duration::from_secs(1), shutdown_signal(failing))
            .await
            .expect("shutdown should proceed when the signal handler fails");
    }

    #[tokio::test]
    async fn test_shutdown_signal_waits_for_signal() {
        let never = std::future::pending::<std::io::Result<()>>();
        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(50), shutdown_signal(never)).await;
        assert!(waited.is_err());
    }
}
