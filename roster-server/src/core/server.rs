//! Server Implementation
//!
//! HTTP 服务器启动、路由装配和优雅关闭

use std::time::Duration;

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    middleware::{self, Next},
    response::Response,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::core::{Config, Result, ServerError, ServerState};
use crate::utils::{AppError, ErrorCode};

/// Assemble the full router with middleware
pub fn build_router(state: ServerState) -> Router {
    let config = &state.config;
    let cors = cors_layer(&config.cors_allow_origin);
    let deadline = Duration::from_millis(config.request_timeout_ms);

    let routes = Router::new()
        .merge(api::clients::router())
        .merge(api::health::router())
        .fallback(|| async { AppError::not_found("Route") });

    with_request_timeout(routes, deadline)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 为路由加上请求期限，超时返回 504 和标准错误体
pub fn with_request_timeout<S>(router: Router<S>, limit: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(limit, request_deadline))
}

async fn request_deadline(
    State(limit): State<Duration>,
    req: Request,
    next: Next,
) -> std::result::Result<Response, AppError> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    tokio::time::timeout(limit, next.run(req))
        .await
        .map_err(|_| {
            tracing::warn!(%method, %path, ?limit, "Request exceeded deadline");
            AppError::new(ErrorCode::TimeoutError)
        })
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin.trim() == "*" {
        AllowOrigin::from(Any)
    } else {
        match HeaderValue::from_str(origin.trim()) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(origin, "Invalid CORS_ALLOW_ORIGIN, allowing any origin");
                AllowOrigin::from(Any)
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> Result<()> {
        let state = self.state.clone();

        let addr = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        tracing::info!("Roster server listening on {}", addr);

        let db = state.db.clone();
        axum::serve(listener, build_router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.into()))?;

        db.close().await;
        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
}
