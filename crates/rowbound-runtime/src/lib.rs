//! Configuration, logging and built-in interceptors for rowbound.
//!
//! Loads a [`Config`] from defaults, an optional TOML file and environment
//! variables, builds the configured interceptors through an
//! [`InterceptorRegistry`], and exposes the result as a [`Configuration`].
//!
//! # Example
//!
//! ```rust,ignore
//! use rowbound_runtime::{Configuration, InterceptorRegistry, init_logging, load_config};
//!
//! let config = load_config()?.build()?;
//! init_logging(config.telemetry())?;
//!
//! let configuration = Configuration::new(config, &InterceptorRegistry::with_builtins())?;
//! let executor = configuration.wrap(executor);
//! ```
//!
//! A configuration file registering two interceptors:
//!
//! ```toml
//! [observability]
//! log_level = "debug"
//!
//! [[interceptors]]
//! name = "row_limit"
//! properties = { max_rows = 500 }
//! interest = [{ receiver = "Executor", method = "query", args = ["String", "RowBounds"] }]
//!
//! [[interceptors]]
//! name = "tracing"
//! properties = { level = "info" }
//! interest = [{ receiver = "Executor", method = "query", args = ["String", "RowBounds"] }]
//! ```
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod configuration;
pub mod interceptors;
pub mod observability;
pub mod registry;

pub use config::{
    Config, ConfigBuilder, InterceptorConfig, TelemetryConfig, load_config, load_config_from_path,
};
pub use configuration::Configuration;
pub use interceptors::{CallLevel, RetryInterceptor, RowLimitInterceptor, TracingInterceptor};
pub use observability::init_logging;
pub use registry::{InterceptorFactory, InterceptorRegistry, default_factory};
