use crate::handlers::{self, AppState};
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

const OPENAPI_SPEC: &str = include_str!("../openapi.yml");

/// Form payloads are plain text fields; 1MB is generous.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Serves the OpenAPI specification YAML document.
async fn serve_openapi_spec() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/yaml")],
        OPENAPI_SPEC,
    )
}

/// Serves the Swagger UI HTML page, pointed at [`serve_openapi_spec`].
async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Career Signals Console - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.yml",
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}

/// Builds the console router with its middleware stack.
pub fn router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/v1/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route(
            "/api/v1/forms/:form",
            get(handlers::get_form)
                .put(handlers::update_form)
                .delete(handlers::reset_form),
        )
        .route("/api/v1/forms/:form/submit", post(handlers::submit_form))
        .route("/api/v1/forms/:form/curl", get(handlers::curl_preview))
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/docs", get(serve_swagger_ui))
        .route("/api-docs/openapi.yml", get(serve_openapi_spec))
        .merge(api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
