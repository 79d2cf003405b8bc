//! ServerBuilder for fluent API to build the HTTP server

use super::cors::cors_layer;
use super::entity_registry::{EntityDescriptor, EntityRegistry};
use super::shutdown::{ShutdownTrigger, request_scope, shutdown_signal};
use super::state::AppState;
use crate::config::CorsConfig;
use crate::core::error::{AdminError, InternalErrorDetail};
use crate::core::response::ApiResponse;
use anyhow::Result;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::any::Any;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Builder for creating the HTTP server with registered entity routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_state(AppState::in_memory())
///     .with_api_prefix("/api")
///     .register_entities()
///     .build()?;
/// ```
pub struct ServerBuilder {
    state: Option<AppState>,
    entity_registry: EntityRegistry,
    api_prefix: String,
    cors: Option<CorsConfig>,
    custom_routes: Vec<Router<AppState>>,
    expose_internal_errors: bool,
    shutdown: Option<ShutdownTrigger>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            state: None,
            entity_registry: EntityRegistry::new(),
            api_prefix: String::new(),
            cors: None,
            custom_routes: Vec::new(),
            expose_internal_errors: false,
            shutdown: None,
        }
    }

    /// Set the application state (required)
    pub fn with_state(mut self, state: AppState) -> Self {
        self.state = Some(state);
        self
    }

    /// Mount every route under `prefix` (e.g. "/api")
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    /// Enable CORS with the given policy
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.cors = Some(config);
        self
    }

    /// Put the underlying message back into 500 responses (development only)
    pub fn expose_internal_errors(mut self, expose: bool) -> Self {
        self.expose_internal_errors = expose;
        self
    }

    /// Also stop serving when `trigger` fires
    pub fn with_shutdown_trigger(mut self, trigger: ShutdownTrigger) -> Self {
        self.shutdown = Some(trigger);
        self
    }

    /// Add routes that are not part of an entity group
    pub fn with_custom_routes(mut self, routes: Router<AppState>) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Register a single entity group
    pub fn register(mut self, descriptor: impl EntityDescriptor + 'static) -> Self {
        self.entity_registry.register(Box::new(descriptor));
        self
    }

    /// Register all built-in entity groups
    pub fn register_entities(mut self) -> Self {
        crate::entities::register_all(&mut self.entity_registry);
        self
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        let state = self
            .state
            .ok_or_else(|| anyhow::anyhow!("AppState is required. Call .with_state()"))?;

        tracing::debug!(entities = ?self.entity_registry.entity_types(), "building router");

        let health_path = format!("{}/health", self.api_prefix);
        let mut router = Router::new()
            .route(&health_path, get(health))
            .merge(self.entity_registry.build_routes(&self.api_prefix));

        for routes in self.custom_routes {
            router = router.merge(routes);
        }

        let router = router
            .fallback(route_not_found)
            .with_state(state)
            .layer(middleware::from_fn(request_scope))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(middleware::from_fn_with_state(
                        self.expose_internal_errors,
                        reveal_internal_errors,
                    )),
            );

        Ok(match &self.cors {
            Some(cors) => router.layer(cors_layer(cors)),
            None => router,
        })
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Stop accepting on SIGTERM, SIGINT (Ctrl+C) or the shutdown trigger and
    ///   drain in-flight requests
    pub async fn serve(self, addr: &str) -> Result<()> {
        let trigger = self.shutdown.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(trigger))
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

async fn health() -> ApiResponse<()> {
    ApiResponse::message("ok")
}

async fn route_not_found() -> AdminError {
    AdminError::not_found("Route")
}

/// Turn a handler panic into the standard 500 envelope
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "request handler panicked");
    AdminError::Internal(detail).into_response()
}

/// Swap the masked 500 body for the full one when exposure is enabled
async fn reveal_internal_errors(
    State(expose): State<bool>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    match response.extensions_mut().remove::<InternalErrorDetail>() {
        Some(InternalErrorDetail(body)) if expose => (response.status(), Json(body)).into_response(),
        _ => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::ORIGIN;
    use axum::http::{HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::Value;

    fn server(builder: ServerBuilder) -> TestServer {
        TestServer::new(builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_build_without_state_fails() {
        assert!(ServerBuilder::new().build().is_err());
    }

    #[tokio::test]
    async fn test_health_under_prefix() {
        let server = server(
            ServerBuilder::new()
                .with_state(AppState::in_memory())
                .with_api_prefix("/api/"),
        );

        let response = server.get("/api/health").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_envelope() {
        let server = server(ServerBuilder::new().with_state(AppState::in_memory()));

        let response = server.get("/nowhere").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_panic_becomes_500_envelope() {
        async fn boom() -> &'static str {
            panic!("kaboom")
        }

        let routes = Router::new().route("/boom", get(boom));
        let server = server(
            ServerBuilder::new()
                .with_state(AppState::in_memory())
                .with_custom_routes(routes),
        );

        let response = server.get("/boom").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "INTERNAL_ERROR");
    }

    async fn store_down() -> AdminError {
        AdminError::Store(crate::core::error::StoreError::Backend("connection refused".into()))
    }

    #[tokio::test]
    async fn test_internal_detail_hidden_by_default() {
        let server = server(
            ServerBuilder::new()
                .with_state(AppState::in_memory())
                .with_custom_routes(Router::new().route("/down", get(store_down))),
        );

        let response = server.get("/down").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], "Internal server error");
        assert_eq!(body["code"], "STORAGE_ERROR");
    }

    #[tokio::test]
    async fn test_internal_detail_exposed_when_enabled() {
        let server = server(
            ServerBuilder::new()
                .with_state(AppState::in_memory())
                .expose_internal_errors(true)
                .with_custom_routes(Router::new().route("/down", get(store_down))),
        );

        let response = server.get("/down").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], "Database error: connection refused");
        assert_eq!(body["code"], "STORAGE_ERROR");
    }

    #[tokio::test]
    async fn test_cors_headers_for_allowed_origin_only() {
        let server = server(
            ServerBuilder::new()
                .with_state(AppState::in_memory())
                .with_api_prefix("/api")
                .with_cors(CorsConfig::default()),
        );

        let allowed = server
            .get("/api/health")
            .add_header(ORIGIN, HeaderValue::from_static("http://localhost:5173"))
            .await;
        assert_eq!(
            allowed.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            allowed.headers().get("access-control-allow-credentials").unwrap(),
            "true"
        );

        let denied = server
            .get("/api/health")
            .add_header(ORIGIN, HeaderValue::from_static("https://evil.example"))
            .await;
        assert!(denied.headers().get("access-control-allow-origin").is_none());
    }
}
