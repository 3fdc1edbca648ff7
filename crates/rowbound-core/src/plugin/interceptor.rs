//! Interceptor trait and registration properties.

use std::collections::BTreeMap;
use std::str::FromStr;

use super::invocation::Invocation;
use super::signature::InterestSet;
use super::value::Value;
use crate::{Error, Result};

/// Behavior that wraps calls on execution objects.
///
/// For every call matching its [`interest`](Self::interest), an interceptor may:
///
/// - handle the call fully without proceeding,
/// - inspect or rewrite arguments and proceed once,
/// - proceed several times (retry) or not at all,
/// - fabricate a result.
///
/// Interceptors hold their own state; the chain keeps none.
///
/// # Example
///
/// ```rust,ignore
/// struct CountQueries(AtomicUsize);
///
/// impl Interceptor for CountQueries {
///     fn interest(&self) -> InterestSet {
///         InterestSet::new().with(EXECUTOR.clone(), QUERY)
///     }
///
///     fn intercept(&self, invocation: Invocation<'_>) -> Result<Value> {
///         self.0.fetch_add(1, Ordering::Relaxed);
///         invocation.proceed()
///     }
/// }
/// ```
pub trait Interceptor: Send + Sync {
    /// Signatures this interceptor wants to observe.
    fn interest(&self) -> InterestSet;

    /// Handle or continue an intercepted call.
    ///
    /// # Errors
    ///
    /// Failures from `proceed()` or from the interceptor itself reach the
    /// original caller unchanged.
    fn intercept(&self, invocation: Invocation<'_>) -> Result<Value>;

    /// Receive registration properties before first use.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid properties.
    fn set_properties(&mut self, properties: &Properties) -> Result<()> {
        let _ = properties;
        Ok(())
    }

    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// String properties handed to an interceptor at registration time.
///
/// Values are passed through unmodified; typed parsing is left to the
/// interceptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert a property, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Parse a property into `T`.
    ///
    /// Returns `Ok(None)` when the property is absent.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the value does not parse.
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.trim().parse::<T>().map_err(|e| {
                    Error::config(format!("invalid value '{raw}' for property '{key}': {e}"))
                })
            })
            .transpose()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for Properties {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
