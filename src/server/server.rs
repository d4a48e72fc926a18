//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::server::middleware::AuthMiddleware;
use crate::server::routes;
use crate::server::state::AppState;
use crate::storage::DocumentStore;
use crate::utils::error::{GatewayError, Result};
use actix_web::{
    App, HttpServer as ActixHttpServer, error::JsonPayloadError, middleware::DefaultHeaders, web,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server over a store
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Result<Self> {
        info!("Creating HTTP server");

        let server_config = config.server().clone();
        let state = AppState::new(config, store)?;

        Ok(Self {
            config: server_config,
            state,
        })
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);
        let max_body_size = self.config.max_body_size;
        let mut server = ActixHttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .wrap(AuthMiddleware)
                .wrap(TracingLogger::default())
                .wrap(DefaultHeaders::new().add(("Server", "crm-gateway")))
                .configure(configure_app(max_body_size))
        });
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| {
                GatewayError::config(format!("Failed to bind to {}: {}", bind_addr, e))
            })?
            .run();

        info!("HTTP server listening on {}", bind_addr);
        server.await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Routes plus request-body handling; the caller supplies state and middleware
pub fn configure_app(max_body_size: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(
            web::JsonConfig::default()
                .limit(max_body_size)
                .error_handler(|err, _req| {
                    warn!("Rejected request body: {}", err);
                    json_error(err).into()
                }),
        )
        .configure(routes::configure_routes);
    }
}

fn json_error(err: JsonPayloadError) -> GatewayError {
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            GatewayError::validation("Request body too large")
        }
        other => GatewayError::validation(format!("Invalid request body: {}", other)),
    }
}
