//! Configuration builder

use rowbound_core::{Error, InterestSet, Properties, Signature};

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub telemetry: TelemetryConfig,
    pub interceptors: Vec<InterceptorConfig>,
}

impl Config {
    #[must_use]
    pub const fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    #[must_use]
    pub const fn telemetry(&self) -> &TelemetryConfig {
        &self.telemetry
    }

    /// Interceptor registrations in registration order.
    #[must_use]
    pub fn interceptors(&self) -> &[InterceptorConfig] {
        &self.interceptors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub log_level: String,
    pub json_logs: bool,
}

/// One interceptor registration: a registry name, an optional interest
/// override and pass-through properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptorConfig {
    name: String,
    interest: Vec<Signature>,
    properties: Properties,
}

impl InterceptorConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interest: Vec::new(),
            properties: Properties::new(),
        }
    }

    #[must_use]
    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.interest.push(signature);
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured interest, or `None` to keep the interceptor's declared one.
    #[must_use]
    pub fn interest(&self) -> Option<InterestSet> {
        if self.interest.is_empty() {
            return None;
        }
        Some(self.interest.iter().cloned().collect())
    }

    #[must_use]
    pub const fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// Configuration builder with fluent API
#[derive(Debug)]
pub struct ConfigBuilder {
    telemetry: TelemetryConfig,
    interceptors: Vec<InterceptorConfig>,
}

impl ConfigBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            telemetry: TelemetryConfig {
                service_name: String::new(),
                log_level: String::new(),
                json_logs: false,
            },
            interceptors: Vec::new(),
        }
    }

    #[must_use]
    pub fn service_name(mut self, name: String) -> Self {
        self.telemetry.service_name = name;
        self
    }

    #[must_use]
    pub fn log_level(mut self, level: String) -> Self {
        self.telemetry.log_level = level;
        self
    }

    #[must_use]
    pub const fn json_logs(mut self, enabled: bool) -> Self {
        self.telemetry.json_logs = enabled;
        self
    }

    /// Append an interceptor registration.
    #[must_use]
    pub fn interceptor(mut self, interceptor: InterceptorConfig) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn build(self) -> rowbound_core::Result<Config> {
        if let Some(position) = self
            .interceptors
            .iter()
            .position(|i| i.name.trim().is_empty())
        {
            return Err(Error::config(format!(
                "interceptor #{position} has an empty name"
            )));
        }

        // Apply defaults for telemetry
        let service_name = if self.telemetry.service_name.is_empty() {
            "rowbound".to_string()
        } else {
            self.telemetry.service_name
        };

        let log_level = if self.telemetry.log_level.is_empty() {
            "info".to_string()
        } else {
            self.telemetry.log_level
        };

        Ok(Config {
            telemetry: TelemetryConfig {
                service_name,
                log_level,
                json_logs: self.telemetry.json_logs,
            },
            interceptors: self.interceptors,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rowbound_core::{Operation, ReceiverKind};

    use super::*;

    fn query_signature() -> Signature {
        Signature::new(
            ReceiverKind::new("Executor"),
            Operation::new("query", ["String", "RowBounds"]),
        )
    }

    #[test]
    fn test_builder_telemetry_defaults() {
        let config = ConfigBuilder::new().build().unwrap();

        assert_eq!(config.telemetry.service_name, "rowbound");
        assert_eq!(config.telemetry.log_level, "info");
        assert!(!config.telemetry.json_logs);
        assert!(config.interceptors().is_empty());
    }

    #[test]
    fn test_builder_telemetry_config() {
        let config = ConfigBuilder::new()
            .service_name("orders-service".to_string())
            .log_level("debug".to_string())
            .json_logs(true)
            .build()
            .unwrap();

        assert_eq!(config.telemetry().service_name, "orders-service");
        assert_eq!(config.telemetry().log_level, "debug");
        assert!(config.telemetry().json_logs);
    }

    #[test]
    fn test_builder_keeps_interceptor_order() {
        let config = Config::builder()
            .interceptor(InterceptorConfig::new("tracing"))
            .interceptor(InterceptorConfig::new("row_limit").with_property("max_rows", "100"))
            .build()
            .unwrap();

        let names: Vec<_> = config.interceptors().iter().map(InterceptorConfig::name).collect();
        assert_eq!(names, vec!["tracing", "row_limit"]);
        assert_eq!(config.interceptors()[1].properties().get("max_rows"), Some("100"));
    }

    #[test]
    fn test_builder_rejects_empty_interceptor_name() {
        let err = ConfigBuilder::new()
            .interceptor(InterceptorConfig::new("tracing"))
            .interceptor(InterceptorConfig::new("  "))
            .build()
            .unwrap_err();

        assert!(err.is_config());
        assert!(err.to_string().contains("#1"));
    }

    #[test]
    fn test_interceptor_interest_override() {
        let plain = InterceptorConfig::new("retry");
        assert!(plain.interest().is_none());

        let scoped = InterceptorConfig::new("retry").with_signature(query_signature());
        let interest = scoped.interest().unwrap();
        assert_eq!(interest.len(), 1);
        assert!(interest.contains(&query_signature()));
    }

    #[test]
    fn test_config_builder_default() {
        let config = ConfigBuilder::default().build().unwrap();
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_telemetry_config_default() {
        let telemetry = TelemetryConfig::default();
        assert!(telemetry.service_name.is_empty());
        assert!(telemetry.log_level.is_empty());
        assert!(!telemetry.json_logs);
    }

    #[test]
    fn test_config_debug() {
        let config = ConfigBuilder::new().build().unwrap();
        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("Config"));
        assert!(debug_str.contains("telemetry"));
    }
}
