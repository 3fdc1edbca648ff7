//! Name to interceptor factory mapping.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rowbound_core::{Error, Interceptor, Properties, Result};

use crate::interceptors::{RetryInterceptor, RowLimitInterceptor, TracingInterceptor};

/// Builds a configured interceptor from its registration properties.
pub type InterceptorFactory = fn(&Properties) -> Result<Arc<dyn Interceptor>>;

/// Factory for any `Default` interceptor: construct, then apply properties.
///
/// # Errors
///
/// Returns the interceptor's property validation error.
pub fn default_factory<I>(properties: &Properties) -> Result<Arc<dyn Interceptor>>
where
    I: Interceptor + Default + 'static,
{
    let mut interceptor = I::default();
    interceptor.set_properties(properties)?;
    Ok(Arc::new(interceptor))
}

/// Interceptors available to configuration files, by name.
#[derive(Clone, Default)]
pub struct InterceptorRegistry {
    factories: HashMap<String, InterceptorFactory>,
}

impl InterceptorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `tracing`, `row_limit` and `retry`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("tracing", default_factory::<TracingInterceptor>);
        registry.register("row_limit", default_factory::<RowLimitInterceptor>);
        registry.register("retry", default_factory::<RetryInterceptor>);
        registry
    }

    /// Register a factory, returning the one it replaces.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: InterceptorFactory,
    ) -> Option<InterceptorFactory> {
        self.factories.insert(name.into(), factory)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the interceptor registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown name or invalid
    /// properties.
    pub fn create(&self, name: &str, properties: &Properties) -> Result<Arc<dyn Interceptor>> {
        let factory = self.factories.get(name).ok_or_else(|| {
            Error::config(format!(
                "unknown interceptor '{name}' (available: {})",
                self.names().join(", ")
            ))
        })?;
        factory(properties)
    }
}

impl fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorRegistry")
            .field("names", &self.names())
            .finish()
    }
}
