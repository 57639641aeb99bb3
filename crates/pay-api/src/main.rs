//! # Payment
//!
//! Simulated invoice charging service.
//!
//! ## Usage
//!
//! ```bash
//! # Optional overrides (defaults: 0.0.0.0:8080)
//! export HOST=127.0.0.1
//! export PORT=8080
//!
//! # Run the server
//! payment
//! ```

use pay_api::{server, AppConfig, AppState, LogFormat};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The log format comes from config, so load it before logging anything
    let config = match AppConfig::load() {
        Ok(config) => {
            init_tracing(config.log_format);
            config
        }
        Err(e) => {
            init_tracing(LogFormat::Text);
            error!("Failed to load configuration: {}", e);
            return Err(anyhow::anyhow!("Failed to load configuration: {}", e));
        }
    };

    info!("Payment v{} starting", env!("CARGO_PKG_VERSION"));
    match &config.source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No config file found, using defaults and environment"),
    }

    // Initialize application state
    let state = AppState::with_config(config);

    info!("Outcome generator: {}", state.outcomes.name());
    info!(
        "Timeouts: read={:?}, read_header={:?}, write={:?}",
        state.config.read_timeout, state.config.read_header_timeout, state.config.write_timeout
    );

    if let Err(e) = server::run(state).await {
        error!("Server error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
