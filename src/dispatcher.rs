use crate::config::key_fingerprint;
use crate::errors::AppError;
use crate::models::{AuthMode, RequestResult};
use crate::payload::Payload;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::{Duration, Instant};

/// Simulated latency of a stubbed call.
pub const STUB_DELAY: Duration = Duration::from_millis(250);

/// How a request should be sent.
#[derive(Debug, Clone, Copy)]
pub struct DispatchOptions<'a> {
    pub base_url: &'a str,
    pub auth_mode: AuthMode,
    pub api_key: &'a str,
    /// Skip the network and answer with the canned body.
    pub use_stub: bool,
}

/// Sends prepared payloads to the career-signals API, or stubs them.
///
/// No timeout is configured: a live call waits as long as the upstream does.
#[derive(Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
}

impl Dispatcher {
    /// Creates a new `Dispatcher`.
    pub fn new() -> Result<Self, AppError> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            AppError::InternalError(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client })
    }

    /// Sends `payload` to `endpoint` and normalizes the outcome.
    ///
    /// Never fails: transport and protocol problems end up in
    /// [`RequestResult::error`]. In stub mode the result carries `stub_body`
    /// (or the payload itself when none is given) after [`STUB_DELAY`].
    pub async fn dispatch(
        &self,
        endpoint: &str,
        payload: &Payload,
        options: DispatchOptions<'_>,
        stub_body: Option<Value>,
    ) -> RequestResult {
        if options.use_stub {
            let start = Instant::now();
            tokio::time::sleep(STUB_DELAY).await;
            tracing::info!("Stubbed {} ({:?})", endpoint, start.elapsed());
            return RequestResult {
                status: Some(200),
                duration_ms: Some(elapsed_ms(start)),
                response_body: Some(stub_body.unwrap_or_else(|| Value::Object(payload.clone()))),
                ..Default::default()
            };
        }

        let url = endpoint_url(options.base_url, endpoint);
        tracing::info!(
            "POST {} (auth: {}, key: {})",
            url,
            options.auth_mode,
            key_fingerprint(options.api_key)
        );
        tracing::debug!("Request payload field count: {}", payload.len());

        let start = Instant::now();
        match self.send(&url, payload, options).await {
            Ok((status, text)) => {
                let duration_ms = elapsed_ms(start);
                let parsed = parse_body(&text);
                let error = if (200..300).contains(&status) {
                    None
                } else {
                    Some(AppError::Protocol { status }.to_string())
                };
                tracing::info!("Response {} from {} in {} ms", status, url, duration_ms);
                RequestResult {
                    status: Some(status),
                    duration_ms: Some(duration_ms),
                    response_body: Some(parsed),
                    raw_text: Some(text),
                    error,
                    request_body: None,
                }
            }
            Err(e) => {
                tracing::error!("Request to {} failed: {}", url, e);
                RequestResult::failure(e.to_string())
            }
        }
    }

    async fn send(
        &self,
        url: &str,
        payload: &Payload,
        options: DispatchOptions<'_>,
    ) -> Result<(u16, String), AppError> {
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(payload);

        if options.auth_mode == AuthMode::Header && !options.api_key.is_empty() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", options.api_key));
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok((status, text))
    }
}

/// Strips a single trailing slash from a base URL.
pub fn normalize_base_url(base_url: &str) -> &str {
    base_url.strip_suffix('/').unwrap_or(base_url)
}

/// Full upstream URL for an endpoint path.
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!("{}{}", normalize_base_url(base_url), endpoint)
}

/// Parses a response body as JSON, falling back to the raw text.
///
/// An empty body is treated as an empty object.
pub fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Renders the `curl` command equivalent to a live dispatch.
pub fn build_curl(endpoint: &str, payload: &Payload, options: DispatchOptions<'_>) -> String {
    let body = serde_json::to_string_pretty(payload).unwrap_or_else(|_| "{}".to_string());

    let mut lines = vec![
        format!("curl -X POST \"{}\"", endpoint_url(options.base_url, endpoint)),
        "  -H \"Content-Type: application/json\"".to_string(),
    ];
    if options.auth_mode == AuthMode::Header && !options.api_key.is_empty() {
        lines.push(format!("  -H \"Authorization: Bearer {}\"", options.api_key));
    }
    lines.push(format!("  -d '{}'", body));

    lines.join(" \\\n")
}

fn elapsed_ms(start: Instant) -> u64 {
    (start.elapsed().as_secs_f64() * 1000.0).round() as u64
}
