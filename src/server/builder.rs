//! ServerBuilder for the development API server

use super::entity_registry::{DataDescriptor, EntityRegistry};
use crate::core::{Data, DataService};
use crate::storage::InMemoryDataService;
use anyhow::Result;
use axum::http::{Method, header};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builder for a server exposing registered entities with the dashboard's
/// REST contract
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .register_in_memory::<Property>()
///     .register(corretores_service)
///     .serve("127.0.0.1:8000")
///     .await?;
/// ```
pub struct ServerBuilder {
    entity_registry: EntityRegistry,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            entity_registry: EntityRegistry::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Serve `T` from `service`
    pub fn register<T>(mut self, service: impl DataService<T> + 'static) -> Self
    where
        T: Data + Serialize + DeserializeOwned,
    {
        self.entity_registry
            .register(Box::new(DataDescriptor::<T>::new(Arc::new(service))));
        self
    }

    /// Serve `T` from a shared service handle
    pub fn register_shared<T>(mut self, service: Arc<dyn DataService<T>>) -> Self
    where
        T: Data + Serialize + DeserializeOwned,
    {
        self.entity_registry
            .register(Box::new(DataDescriptor::<T>::new(service)));
        self
    }

    /// Serve `T` from an empty in-memory store
    pub fn register_in_memory<T>(self) -> Self
    where
        T: Data + Serialize + DeserializeOwned,
    {
        self.register(InMemoryDataService::<T>::new())
    }

    /// Add routes outside the CRUD pattern
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }

    /// Build the router with health, entity and custom routes plus the
    /// CORS and tracing layers
    pub fn build(self) -> Result<Router> {
        let mut app = health_routes().merge(self.entity_registry.build_routes());

        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app.layer(cors_layer()).layer(TraceLayer::new_for_http()))
    }

    /// Serve on `addr` until SIGTERM or Ctrl+C
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
}

fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
    }))
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
