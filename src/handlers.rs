use crate::config::Config;
use crate::dispatcher::{build_curl, DispatchOptions, Dispatcher};
use crate::errors::AppError;
use crate::models::*;
use crate::payload;
use crate::session::Session;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration, including the shared API key.
    pub config: Config,
    /// Client for the upstream career-signals API.
    pub dispatcher: Dispatcher,
    /// Settings, form values and submission state.
    ///
    /// Never held across an upstream call.
    pub session: RwLock<Session>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let dispatcher = Dispatcher::new()?;
        let session = RwLock::new(Session::from_config(&config));
        Ok(Self {
            config,
            dispatcher,
            session,
        })
    }

    fn settings_view(&self, settings: &Settings) -> SettingsView {
        SettingsView {
            base_url: settings.base_url.clone(),
            auth_mode: settings.auth_mode,
            use_stub: settings.use_stub,
            api_key_configured: !self.config.api_key.is_empty(),
        }
    }
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "career-signals-console",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/v1/settings
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<SettingsView> {
    let session = state.session.read().await;
    Json(state.settings_view(session.settings()))
}

/// PUT /api/v1/settings
///
/// Updates the base URL, auth mode or stub toggle. Omitted fields keep
/// their current value.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<SettingsView>, AppError> {
    let base_url = update
        .base_url
        .map(|url| validate_base_url(&url))
        .transpose()?;

    let mut session = state.session.write().await;
    let settings = session.settings_mut();
    if let Some(url) = base_url {
        settings.base_url = url;
    }
    if let Some(mode) = update.auth_mode {
        settings.auth_mode = mode;
    }
    if let Some(use_stub) = update.use_stub {
        settings.use_stub = use_stub;
    }

    tracing::info!(
        "Settings updated: base_url={}, auth_mode={}, use_stub={}",
        settings.base_url,
        settings.auth_mode,
        settings.use_stub
    );

    Ok(Json(state.settings_view(session.settings())))
}

fn validate_base_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| AppError::BadRequest(format!("Invalid base_url '{}': {}", trimmed, e)))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::BadRequest(
            "base_url must start with http:// or https://".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// GET /api/v1/forms/:form
pub async fn get_form(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<FormKind>,
) -> Json<FormView> {
    Json(state.session.read().await.view(kind))
}

/// PUT /api/v1/forms/:form
///
/// Replaces the form's values. Missing fields take their defaults.
pub async fn update_form(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<FormKind>,
    Json(values): Json<Value>,
) -> Result<Json<FormView>, AppError> {
    let form = FormState::from_json(kind, values)
        .map_err(|e| AppError::BadRequest(format!("Invalid {} form: {}", kind, e)))?;

    let mut session = state.session.write().await;
    session.set_form(form);
    Ok(Json(session.view(kind)))
}

/// DELETE /api/v1/forms/:form
///
/// Restores the form's default values.
pub async fn reset_form(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<FormKind>,
) -> Json<FormView> {
    let mut session = state.session.write().await;
    session.reset_form(kind);
    tracing::info!("Form {} reset to defaults", kind);
    Json(session.view(kind))
}

/// POST /api/v1/forms/:form/submit
///
/// Validates and prepares the form, dispatches it (live or stubbed) and
/// records the outcome. Validation and configuration failures are returned
/// in the result's `error` field without touching the network.
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<FormKind>,
) -> Json<RequestResult> {
    let (form, settings) = {
        let session = state.session.read().await;
        (session.form(kind).clone(), session.settings().clone())
    };

    let payload = match payload::build_payload(&form, settings.auth_mode, &state.config.api_key) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Submission of {} rejected: {}", kind, e);
            let result = RequestResult::failure(e.to_string());
            state.session.write().await.reject(kind, result.clone());
            return Json(result);
        }
    };

    let generation = state.session.write().await.begin(kind);
    tracing::info!("Submitting {} (generation {})", kind, generation);

    let options = DispatchOptions {
        base_url: &settings.base_url,
        auth_mode: settings.auth_mode,
        api_key: &state.config.api_key,
        use_stub: settings.use_stub,
    };
    let mut result = state
        .dispatcher
        .dispatch(kind.endpoint(), &payload, options, Some(kind.stub_response()))
        .await;
    result.request_body = Some(Value::Object(payload));

    state
        .session
        .write()
        .await
        .complete(kind, generation, result.clone());

    Json(result)
}

/// GET /api/v1/forms/:form/curl
///
/// Equivalent `curl` command for the form's prepared payload.
pub async fn curl_preview(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<FormKind>,
) -> Result<String, AppError> {
    let (form, settings) = {
        let session = state.session.read().await;
        (session.form(kind).clone(), session.settings().clone())
    };

    let prepared = payload::prepare(
        payload::shape(&form),
        settings.auth_mode,
        &state.config.api_key,
    )?;

    let options = DispatchOptions {
        base_url: &settings.base_url,
        auth_mode: settings.auth_mode,
        api_key: &state.config.api_key,
        use_stub: settings.use_stub,
    };
    Ok(build_curl(kind.endpoint(), &prepared, options))
}
