// Server module - router assembly and the listen loop used by main.rs

use axum::Router;
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::api_docs::ApiDoc;
use crate::infrastructure::AppState;
use crate::services::PUBLIC_PREFIX;

/// The only origin allowed to call the API from a browser
pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(HeaderValue::from_static(ALLOWED_ORIGIN))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Build the full application router: API, uploaded images and docs
pub fn build_router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.uploads.root());

    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api::api_router(state))
        .nest_service(PUBLIC_PREFIX, uploads)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process exits
pub async fn serve(state: AppState, port: u16) -> Result<(), String> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Contact manager listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("HTTP server error: {}", e))
}
