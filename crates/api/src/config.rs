//! Process configuration from environment variables.

use std::time::Duration;

use tracing::warn;

/// Runtime configuration for the API process.
///
/// Everything has a default so a bare `billrun-api` starts a fully
/// functional dev instance (in-memory store, hourly billing pass).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Postgres connection URL; absent means in-memory store with demo
    /// data.
    pub database_url: Option<String>,
    /// How often the scheduled billing pass runs; `None` disables it.
    pub billing_interval: Option<Duration>,
    /// Dev gateway: fraction of charge attempts the provider accepts.
    pub gateway_success_ratio: f64,
    /// Dev gateway: fraction of charge attempts that fail with a network
    /// error.
    pub gateway_network_ratio: f64,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let database_url = std::env::var("DATABASE_URL").ok();

        let interval_secs = parse_or("BILLING_INTERVAL_SECS", env("BILLING_INTERVAL_SECS"), 3600u64);
        let billing_interval = match interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Self {
            bind_addr,
            database_url,
            billing_interval,
            gateway_success_ratio: parse_or(
                "GATEWAY_SUCCESS_RATIO",
                env("GATEWAY_SUCCESS_RATIO"),
                0.9,
            ),
            gateway_network_ratio: parse_or(
                "GATEWAY_NETWORK_RATIO",
                env("GATEWAY_NETWORK_RATIO"),
                0.05,
            ),
        }
    }
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Parse an optional raw value, falling back to the default (with a log
/// line) when it is absent or malformed.
fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(var = name, value = %raw, fallback = %default, "unparseable env var, using fallback");
            default
        }),
    }
}
