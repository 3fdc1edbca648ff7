//! Environment variable loading for configuration

use std::env;

use rowbound_core::Result;

use super::builder::ConfigBuilder;

/// Environment variable names
mod vars {
    pub const ROWBOUND_LOG_LEVEL: &str = "ROWBOUND_LOG_LEVEL";
    pub const ROWBOUND_JSON_LOGS: &str = "ROWBOUND_JSON_LOGS";
    pub const ROWBOUND_SERVICE_NAME: &str = "ROWBOUND_SERVICE_NAME";
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Load configuration from environment variables
pub fn load_from_env(mut builder: ConfigBuilder) -> Result<ConfigBuilder> {
    if let Ok(name) = env::var(vars::ROWBOUND_SERVICE_NAME) {
        builder = builder.service_name(name);
    }

    if let Ok(level) = env::var(vars::ROWBOUND_LOG_LEVEL).or_else(|_| env::var(vars::RUST_LOG)) {
        builder = builder.log_level(level);
    }

    if let Ok(val) = env::var(vars::ROWBOUND_JSON_LOGS) {
        builder = builder.json_logs(parse_bool(&val));
    }

    Ok(builder)
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
