//! HTTP server assembly.
//!
//! Builds the axum router over a shared store handle and runs it. Each
//! request handler takes its own short-lived transaction on the store; the
//! router itself holds no other mutable state.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::Logger;
use crate::storage::Store;

use super::city_routes::city_routes;
use super::config::HttpServerConfig;
use super::country_routes::country_routes;
use super::language_routes::language_routes;
use super::response::HealthResponse;

/// State shared by all handlers.
pub struct AppState {
    pub store: Arc<Store>,
}

/// The HTTP server for the world API.
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Assemble the server over an opened store.
    pub fn new(store: Arc<Store>, config: HttpServerConfig) -> Self {
        let router = Self::build_router(store, &config);
        Self { config, router }
    }

    fn build_router(store: Arc<Store>, config: &HttpServerConfig) -> Router {
        let state = Arc::new(AppState { store });

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/health", get(health))
            .merge(country_routes())
            .merge(city_routes())
            .merge(language_routes())
            .layer(cors)
            .with_state(state)
    }

    /// The configured socket address.
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// The assembled router (for tests).
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the process exits.
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid listen address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        Logger::info("HTTP_LISTENING", &[("addr", addr.to_string().as_str())]);
        axum::serve(listener, self.router).await
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_server_assembles_with_default_config() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(Store::open(tmp.path()).unwrap());
        let server = HttpServer::new(store, HttpServerConfig::default());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
        let _router = server.router();
    }

    #[test]
    fn test_server_assembles_with_cors_origins() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(Store::open(tmp.path()).unwrap());
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };
        let _router = HttpServer::new(store, config).router();
    }
}
