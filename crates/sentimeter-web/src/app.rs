//! Router and server configuration.

use std::env;
use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes::{api, health, page};
use crate::state::AppState;

/// Builds the router with every route and middleware layer.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(page::dashboard))
        .route("/refresh", post(page::refresh))
        .route("/api/dashboard", get(api::dashboard))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

const HOST_SETTING: &str = "SENTIMETER_WEB_HOST";
const PORT_SETTING: &str = "SENTIMETER_WEB_PORT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Reads host and port; unparseable values keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = env::var(HOST_SETTING)
            .ok()
            .filter(|host| !host.trim().is_empty())
            .unwrap_or(defaults.host);
        let port = env::var(PORT_SETTING)
            .ok()
            .and_then(|port| port.trim().parse().ok())
            .unwrap_or(defaults.port);

        Self { host, port }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr().parse()
    }
}
