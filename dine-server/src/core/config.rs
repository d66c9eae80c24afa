/// Gateway configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 3000 | HTTP + Socket.IO port |
/// | ENVIRONMENT | development | Runtime environment |
/// | LOG_LEVEL | info | Log level (overridden by RUST_LOG) |
/// | LOG_JSON | false | JSON console logs |
/// | LOG_DIR | unset | Daily rolling log files |
/// | RELAY_CHANNEL_CAPACITY | 256 | Per-tenant relay buffer |
/// | WEBHOOK_SECRET | unset | Required `x-webhook-secret` value on webhooks |
/// | AUTO_CONFIRM_ITEMS_ON_APPROVE | false | Confirm unconfirmed items when an order is approved |
/// | LATE_THRESHOLD_MINUTES | 15 | Kitchen "late" threshold advertised on /health |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 WEBHOOK_SECRET=s3cret cargo run -p dine-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// Buffered events per tenant before slow subscribers start lagging
    pub relay_channel_capacity: usize,
    pub webhook_secret: Option<String>,
    pub auto_confirm_items_on_approve: bool,
    pub late_threshold_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to defaults
    pub fn from_env() -> Self {
        Self {
            http_port: env_parse("HTTP_PORT", 3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            relay_channel_capacity: env_parse("RELAY_CHANNEL_CAPACITY", 256).max(1),
            webhook_secret: std::env::var("WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            auto_confirm_items_on_approve: env_parse("AUTO_CONFIRM_ITEMS_ON_APPROVE", false),
            late_threshold_minutes: env_parse("LATE_THRESHOLD_MINUTES", 15),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    /// Defaults without reading the environment (tests)
    fn default() -> Self {
        Self {
            http_port: 3000,
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            relay_channel_capacity: 256,
            webhook_secret: None,
            auto_confirm_items_on_approve: false,
            late_threshold_minutes: 15,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
