use crate::models::AuthMode;
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Hosted career-signals API used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://x8ki-letl-twmt.n7.xano.io/api:career_signals";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub base_url: String,
    /// Shared credential supplied at deploy time. Empty when unset.
    pub api_key: String,
    pub auth_mode: AuthMode,
    pub use_stub: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            base_url: {
                let url = std::env::var("CS_API_BASE_URL")
                    .ok()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("CS_API_BASE_URL must start with http:// or https://");
                }
                url
            },
            api_key: std::env::var("CS_DEFAULT_API_KEY")
                .map(|key| key.trim().to_string())
                .unwrap_or_default(),
            auth_mode: std::env::var("CS_AUTH_MODE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|mode| mode.parse::<AuthMode>())
                .transpose()
                .map_err(|e| anyhow::anyhow!("CS_AUTH_MODE: {}", e))?
                .unwrap_or_default(),
            use_stub: std::env::var("CS_USE_STUB")
                .ok()
                .map(|v| parse_flag(&v))
                .transpose()
                .map_err(|e| anyhow::anyhow!("CS_USE_STUB: {}", e))?
                .unwrap_or(false),
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Upstream Base URL: {}", config.base_url);
        tracing::debug!("Auth mode: {}, stub mode: {}", config.auth_mode, config.use_stub);
        tracing::debug!("Server Port: {}", config.port);
        if config.api_key.is_empty() {
            tracing::warn!("CS_DEFAULT_API_KEY is not set; header auth will be rejected");
        } else {
            tracing::info!("Shared API key configured ({})", key_fingerprint(&config.api_key));
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("'{}' is not a boolean", other)),
    }
}

/// Short, non-reversible identifier for a credential, safe to log.
pub fn key_fingerprint(key: &str) -> String {
    if key.is_empty() {
        return "unset".to_string();
    }
    let digest = Sha256::digest(key.as_bytes());
    format!("sha256:{}", &hex::encode(digest)[..12])
}
