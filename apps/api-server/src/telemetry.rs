//! Process-wide tracing setup.
//!
//! Local runs get pretty multi-line logs; deployments set LOG_FORMAT=json
//! and ship one JSON object per line. RUST_LOG overrides the default
//! filter as usual.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,blogicum_api=debug,blogicum_infra=debug";

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Emit one JSON object per log line instead of the pretty format.
    pub json_logs: bool,
    /// Name reported in the startup log line.
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            service_name: "blogicum-api".to_string(),
        }
    }
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        let json_logs =
            std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
        let service_name =
            std::env::var("SERVICE_NAME").unwrap_or_else(|_| "blogicum-api".to_string());

        Self {
            json_logs,
            service_name,
        }
    }
}

/// Installs the global subscriber. Call once, before the first log line.
pub fn init_telemetry(config: &TelemetryConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "telemetry initialized"
    );
}
