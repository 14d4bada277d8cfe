use crate::core::{Config, Result, ServerError, ServerState};
use axum::{Router, middleware};
use std::net::SocketAddr;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub type OneshotResult =
    std::result::Result<http::Response<axum::body::Body>, Box<dyn std::error::Error + Send + Sync>>;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::info!(target: "http_access", elapsed_ms, "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::tables::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::menu::router())
        .merge(crate::api::sync::router())
}

/// Build the full service: routes, state and tower middleware
pub fn build_router(state: ServerState) -> Router {
    build_app()
        .with_state(state)
        // Tower HTTP 中间件
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
}

#[derive(Clone, Debug)]
pub struct HttpService {
    config: Config,
    router: Router,
}

impl HttpService {
    pub fn new(config: Config, state: ServerState) -> Self {
        Self {
            config,
            router: build_router(state),
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// 进程内调用路由 (不经过网络)
    pub async fn oneshot(&self, request: http::Request<axum::body::Body>) -> OneshotResult {
        match self.router().oneshot(request).await {
            Ok(response) => Ok(response),
            Err(never) => match never {},
        }
    }

    /// Start the HTTP server and run until `shutdown_signal` resolves
    pub async fn start_server<F>(&self, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("🚀 Starting HTTP server on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::Internal(anyhow::anyhow!("Server error: {}", e)))?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
