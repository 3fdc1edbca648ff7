//! Runtime object threaded through everything built from one config.

use std::sync::Arc;

use rowbound_core::{
    DefaultCursor, Interceptor, InterceptorChain, Result, RowBounds, RowSource, Target,
};

use crate::config::Config;
use crate::registry::InterceptorRegistry;

/// Owns the configuration and the interceptor chain built from it.
///
/// Construct it once and pass it to whatever creates execution objects;
/// there is no global instance.
///
/// # Example
///
/// ```rust,ignore
/// let config = load_config()?.build()?;
/// let configuration = Configuration::new(config, &InterceptorRegistry::with_builtins())?;
///
/// let executor = configuration.wrap(Arc::new(MyExecutor::new(pool)));
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    config: Config,
    chain: InterceptorChain,
}

impl Configuration {
    /// Build every configured interceptor, in order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown interceptor name or
    /// invalid properties.
    pub fn new(config: Config, registry: &InterceptorRegistry) -> Result<Self> {
        let mut chain = InterceptorChain::new();
        for entry in config.interceptors() {
            let interceptor = registry.create(entry.name(), entry.properties())?;
            match entry.interest() {
                Some(interest) => chain.add_with_interest(interceptor, interest),
                None => chain.add(interceptor),
            }
        }

        tracing::info!(
            service.name = %config.telemetry.service_name,
            interceptors = chain.len(),
            "configuration ready",
        );

        Ok(Self { config, chain })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn chain(&self) -> &InterceptorChain {
        &self.chain
    }

    /// Register an interceptor after the configured ones.
    pub fn add_interceptor(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.chain.add(interceptor);
    }

    /// Apply the interceptor chain to an execution object.
    #[must_use]
    pub fn wrap(&self, target: Arc<dyn Target>) -> Arc<dyn Target> {
        self.chain.plugin_all(target)
    }

    /// Open a cursor over `source`.
    #[must_use]
    pub fn new_cursor<S, H, T>(
        &self,
        source: S,
        bounds: RowBounds,
        handler: H,
    ) -> DefaultCursor<S, H, T>
    where
        S: RowSource,
    {
        tracing::trace!(
            service.name = %self.config.telemetry.service_name,
            cursor.bounds = %bounds,
            "opening cursor",
        );
        DefaultCursor::new(source, bounds, handler)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rowbound_core::{
        Cursor, IdentityHandler, InterestSet, Invocation, Operation, ReceiverKind, Signature,
        Value, VecRowSource,
    };

    use super::*;
    use crate::config::{ConfigBuilder, InterceptorConfig};
    use crate::interceptors::testing::{EXECUTOR, Executor, QUERY, query_args, query_interest};

    fn query_signature() -> Signature {
        Signature::new(EXECUTOR.clone(), QUERY)
    }

    #[test]
    fn test_configured_chain_applies_in_order() {
        let config = ConfigBuilder::new()
            .interceptor(
                InterceptorConfig::new("row_limit")
                    .with_signature(query_signature())
                    .with_property("max_rows", "50"),
            )
            .interceptor(
                InterceptorConfig::new("retry")
                    .with_signature(query_signature())
                    .with_property("attempts", "2"),
            )
            .build()
            .unwrap();
        let configuration =
            Configuration::new(config, &InterceptorRegistry::with_builtins()).unwrap();
        assert_eq!(configuration.chain().len(), 2);

        let executor = Arc::new(Executor::failing(1));
        let target = configuration.wrap(Arc::clone(&executor) as Arc<dyn Target>);

        let value = target
            .invoke(&QUERY, &query_args(RowBounds::new(0, 1000)))
            .unwrap();
        assert_eq!(value.cloned::<RowBounds>().unwrap(), RowBounds::new(0, 50));
        assert_eq!(executor.calls(), 2);
    }

    #[test]
    fn test_unknown_interceptor_is_config_error() {
        let config = ConfigBuilder::new()
            .interceptor(InterceptorConfig::new("audit"))
            .build()
            .unwrap();
        let err = Configuration::new(config, &InterceptorRegistry::with_builtins()).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_interest_outside_configured_set_is_untouched() {
        let other = Signature::new(
            ReceiverKind::new("StatementHandler"),
            Operation::new("prepare", ["String"]),
        );
        let config = ConfigBuilder::new()
            .interceptor(
                InterceptorConfig::new("row_limit")
                    .with_signature(other)
                    .with_property("max_rows", "1"),
            )
            .build()
            .unwrap();
        let configuration =
            Configuration::new(config, &InterceptorRegistry::with_builtins()).unwrap();

        let target = configuration.wrap(Arc::new(Executor::default()));
        let value = target
            .invoke(&QUERY, &query_args(RowBounds::new(0, 1000)))
            .unwrap();
        assert_eq!(value.cloned::<RowBounds>().unwrap(), RowBounds::new(0, 1000));
    }

    #[test]
    fn test_add_interceptor_after_configured() {
        #[derive(Default)]
        struct Count(AtomicUsize);

        impl Interceptor for Count {
            fn interest(&self) -> InterestSet {
                query_interest()
            }

            fn intercept(&self, invocation: Invocation<'_>) -> Result<Value> {
                self.0.fetch_add(1, Ordering::SeqCst);
                invocation.proceed()
            }
        }

        let config = ConfigBuilder::new().build().unwrap();
        let mut configuration =
            Configuration::new(config, &InterceptorRegistry::with_builtins()).unwrap();
        let counter = Arc::new(Count::default());
        configuration.add_interceptor(Arc::clone(&counter) as Arc<dyn Interceptor>);

        let target = configuration.wrap(Arc::new(Executor::default()));
        target.invoke(&QUERY, &query_args(RowBounds::DEFAULT)).unwrap();
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_new_cursor() {
        let configuration =
            Configuration::new(ConfigBuilder::new().build().unwrap(), &InterceptorRegistry::new())
                .unwrap();

        let source: VecRowSource<u32> = (0..20).collect();
        let mut cursor = configuration.new_cursor(source, RowBounds::new(18, 5), IdentityHandler);

        let items: Vec<u32> = cursor.iter().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(items, vec![18, 19]);
        assert!(cursor.is_consumed());
    }
}
