use career_signals_console::app;
use career_signals_console::config::Config;
use career_signals_console::handlers::AppState;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the console backend.
///
/// Initializes tracing, loads configuration, builds the session state and
/// serves the router until the process is stopped.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "career_signals_console=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let port = config.port;

    let app_state = Arc::new(AppState::new(config)?);
    if app_state.config.use_stub {
        tracing::info!("Stub mode enabled; upstream calls will be simulated");
    }

    let app = app::router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
