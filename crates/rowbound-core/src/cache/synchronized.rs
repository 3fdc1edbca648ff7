//! Mutex-guarded cache, exposed as an interception target.

use std::any::Any;
use std::fmt;

use parking_lot::Mutex;

use super::{Cache, CacheId, ops};
use crate::plugin::{Arguments, Operation, ReceiverKind, Target, Value};
use crate::{Error, Result};

/// Serializes every operation of the wrapped cache behind a mutex.
///
/// Individual operations are atomic; sequences of operations are not.
pub struct SynchronizedCache<C> {
    id: CacheId,
    inner: Mutex<C>,
}

impl<C: Cache> SynchronizedCache<C> {
    pub fn new(cache: C) -> Self {
        Self {
            id: cache.id().clone(),
            inner: Mutex::new(cache),
        }
    }

    pub const fn id(&self) -> &CacheId {
        &self.id
    }

    pub fn get(&self, key: &C::Key) -> Option<C::Value> {
        self.inner.lock().get(key)
    }

    pub fn put(&self, key: C::Key, value: C::Value) {
        self.inner.lock().put(key, value);
    }

    pub fn remove(&self, key: &C::Key) -> Option<C::Value> {
        self.inner.lock().remove(key)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }

    pub fn into_inner(self) -> C {
        self.inner.into_inner()
    }
}

impl<C> Target for SynchronizedCache<C>
where
    C: Cache + Send,
    C::Key: Any + Send + Sync + Clone,
    C::Value: Any + Send + Sync + Clone,
{
    fn receiver_kind(&self) -> &ReceiverKind {
        &ops::CACHE
    }

    fn invoke(&self, operation: &Operation, arguments: &Arguments) -> Result<Value> {
        if *operation == ops::GET {
            let key = arguments.get::<C::Key>(0)?;
            Ok(Value::new(self.get(key)))
        } else if *operation == ops::PUT {
            let key = arguments.get::<C::Key>(0)?.clone();
            let value = arguments.get::<C::Value>(1)?.clone();
            self.put(key, value);
            Ok(Value::unit())
        } else if *operation == ops::REMOVE {
            let key = arguments.get::<C::Key>(0)?;
            Ok(Value::new(self.remove(key)))
        } else if *operation == ops::CLEAR {
            self.clear();
            Ok(Value::unit())
        } else if *operation == ops::SIZE {
            Ok(Value::new(self.size()))
        } else {
            Err(Error::unknown_operation(
                ops::CACHE.as_str(),
                operation.to_string(),
            ))
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for SynchronizedCache<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynchronizedCache")
            .field("id", &self.id)
            .field("inner", &self.inner)
            .finish()
    }
}
