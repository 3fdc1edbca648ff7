//! TOML configuration file loading

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rowbound_core::{Error, Operation, Properties, ReceiverKind, Result, Signature};
use serde::Deserialize;

use super::builder::{ConfigBuilder, InterceptorConfig};

/// Configuration file locations checked in order
const CONFIG_PATHS: &[&str] = &[
    "./rowbound.toml",
    "~/.config/rowbound/config.toml",
    "/etc/rowbound/config.toml",
];

/// Find the first existing configuration file
pub fn find_config_file() -> Option<PathBuf> {
    for path_str in CONFIG_PATHS {
        let path = if path_str.starts_with('~') {
            if let Ok(home) = std::env::var("HOME") {
                PathBuf::from(path_str.replacen('~', &home, 1))
            } else {
                continue;
            }
        } else {
            PathBuf::from(path_str)
        };

        if path.exists() {
            return Some(path);
        }
    }
    None
}

/// Load configuration from a TOML file
pub fn load_from_file(path: &Path, builder: ConfigBuilder) -> Result<ConfigBuilder> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    let file_config: FileConfig = toml::from_str(&content).map_err(|e| {
        Error::config(format!(
            "Failed to parse config file {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(apply_file_config(builder, file_config))
}

fn apply_file_config(mut builder: ConfigBuilder, config: FileConfig) -> ConfigBuilder {
    // Observability settings
    if let Some(obs) = config.observability {
        if let Some(name) = obs.service_name {
            builder = builder.service_name(name);
        }

        if let Some(level) = obs.log_level {
            builder = builder.log_level(level);
        }

        if let Some(json) = obs.json_logs {
            builder = builder.json_logs(json);
        }
    }

    // Interceptor registrations, in file order
    for entry in config.interceptors {
        let mut interceptor = InterceptorConfig::new(entry.name)
            .with_properties(properties_from_toml(entry.properties));

        for signature in entry.interest {
            interceptor = interceptor.with_signature(Signature::new(
                ReceiverKind::new(signature.receiver),
                Operation::new(signature.method, signature.args),
            ));
        }

        builder = builder.interceptor(interceptor);
    }

    builder
}

/// Scalars are stringified; strings pass through without quotes.
fn properties_from_toml(raw: BTreeMap<String, toml::Value>) -> Properties {
    raw.into_iter()
        .map(|(key, value)| match value {
            toml::Value::String(s) => (key, s),
            other => (key, other.to_string()),
        })
        .collect()
}

/// Root configuration file structure
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    observability: Option<ObservabilityConfig>,
    #[serde(default)]
    interceptors: Vec<InterceptorFileConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ObservabilityConfig {
    service_name: Option<String>,
    log_level: Option<String>,
    json_logs: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InterceptorFileConfig {
    name: String,
    #[serde(default)]
    interest: Vec<SignatureFileConfig>,
    #[serde(default)]
    properties: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SignatureFileConfig {
    receiver: String,
    method: String,
    #[serde(default)]
    args: Vec<String>,
}
