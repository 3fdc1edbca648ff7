//! Typed client over a cache target.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::ops;
use crate::Result;
use crate::plugin::{Arguments, Target};

/// Typed view of a cache reached through interceptor layers.
///
/// Calls are encoded as [`Arguments`] and dispatched on the wrapped
/// target, so every interested interceptor sees them.
///
/// # Example
///
/// ```rust,ignore
/// let cache = Arc::new(SynchronizedCache::new(PerpetualCache::new(id)));
/// let facade = CacheFacade::<String, u64>::new(chain.plugin_all(cache));
///
/// facade.put("k".to_string(), 1)?;
/// assert_eq!(facade.get("k".to_string())?, Some(1));
/// ```
pub struct CacheFacade<K, V> {
    target: Arc<dyn Target>,
    _types: PhantomData<fn() -> (K, V)>,
}

impl<K, V> CacheFacade<K, V>
where
    K: Any + Send + Sync,
    V: Any + Send + Sync + Clone,
{
    pub fn new(target: Arc<dyn Target>) -> Self {
        Self {
            target,
            _types: PhantomData,
        }
    }

    pub fn get(&self, key: K) -> Result<Option<V>> {
        self.target
            .invoke(&ops::GET, &Arguments::new().arg(key))?
            .cloned()
    }

    pub fn put(&self, key: K, value: V) -> Result<()> {
        self.target
            .invoke(&ops::PUT, &Arguments::new().arg(key).arg(value))?;
        Ok(())
    }

    pub fn remove(&self, key: K) -> Result<Option<V>> {
        self.target
            .invoke(&ops::REMOVE, &Arguments::new().arg(key))?
            .cloned()
    }

    pub fn clear(&self) -> Result<()> {
        self.target.invoke(&ops::CLEAR, &Arguments::new())?;
        Ok(())
    }

    pub fn size(&self) -> Result<usize> {
        self.target
            .invoke(&ops::SIZE, &Arguments::new())?
            .cloned()
    }

    pub fn target(&self) -> &Arc<dyn Target> {
        &self.target
    }
}

impl<K, V> Clone for CacheFacade<K, V> {
    fn clone(&self) -> Self {
        Self {
            target: Arc::clone(&self.target),
            _types: PhantomData,
        }
    }
}

impl<K, V> fmt::Debug for CacheFacade<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheFacade")
            .field("receiver", self.target.receiver_kind())
            .field("key", &std::any::type_name::<K>())
            .field("value", &std::any::type_name::<V>())
            .finish()
    }
}
