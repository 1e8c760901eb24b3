use std::env;
use std::time::Duration;

/// Resolver configuration loaded from environment variables.
/// Every field has a production default; nothing is required.
#[derive(Debug, Clone)]
pub struct Config {
    /// Promo-code resolution endpoint (taopass API).
    pub taopass_endpoint: String,
    /// Base URL for shortlink redirect pages.
    pub shortlink_base: String,
    /// Deadline for a whole resolution race.
    pub deadline: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            taopass_endpoint: env::var("TAOPASS_ENDPOINT")
                .unwrap_or_else(|_| taopass_client::DEFAULT_ENDPOINT.to_string()),
            shortlink_base: env::var("SHORTLINK_BASE")
                .unwrap_or_else(|_| "https://m.tb.cn".to_string()),
            deadline: Duration::from_millis(
                env::var("RESOLVE_TIMEOUT_MS")
                    .unwrap_or_else(|_| "15000".to_string())
                    .parse()
                    .expect("RESOLVE_TIMEOUT_MS must be a number"),
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            taopass_endpoint: taopass_client::DEFAULT_ENDPOINT.to_string(),
            shortlink_base: "https://m.tb.cn".to_string(),
            deadline: Duration::from_millis(15_000),
        }
    }
}
