//! Type-erased call values.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::{Error, Result};

/// Opaque value passed into or returned from an intercepted call.
///
/// Cloning is cheap: the payload is shared behind an `Arc`.
#[derive(Clone)]
pub struct Value {
    inner: Option<Arc<dyn Any + Send + Sync>>,
    type_name: &'static str,
}

impl Value {
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Some(Arc::new(value)),
            type_name: type_name::<T>(),
        }
    }

    /// The empty result of an operation that returns nothing.
    #[must_use]
    pub const fn unit() -> Self {
        Self {
            inner: None,
            type_name: "()",
        }
    }

    #[must_use]
    pub const fn is_unit(&self) -> bool {
        self.inner.is_none()
    }

    /// Type name recorded at construction.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.as_deref().is_some_and(|v| v.is::<T>())
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.as_deref()?.downcast_ref()
    }

    /// Clone the payload out as `T`.
    ///
    /// # Errors
    ///
    /// Returns a usage error if the payload is not a `T`.
    pub fn cloned<T: Any + Clone>(&self) -> Result<T> {
        self.downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| Error::result_mismatch(type_name::<T>(), self.type_name))
    }

    /// Returns true if both values share the same payload.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::unit()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Ordered argument list of a call.
#[derive(Debug, Clone, Default)]
pub struct Arguments(Vec<Value>);

impl Arguments {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an argument, returning `self` for chaining.
    #[must_use]
    pub fn arg<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.0.push(Value::new(value));
        self
    }

    /// Append an already erased value.
    #[must_use]
    pub fn value_arg(mut self, value: Value) -> Self {
        self.0.push(value);
        self
    }

    /// Typed access to the argument at `index`.
    ///
    /// # Errors
    ///
    /// Returns a usage error if the index is out of range or the argument
    /// is not a `T`.
    pub fn get<T: Any>(&self, index: usize) -> Result<&T> {
        let value = self
            .0
            .get(index)
            .ok_or_else(|| Error::argument_mismatch(index, type_name::<T>(), "nothing"))?;

        value
            .downcast_ref()
            .ok_or_else(|| Error::argument_mismatch(index, type_name::<T>(), value.type_name()))
    }

    /// Erased access to the argument at `index`.
    ///
    /// # Errors
    ///
    /// Returns a usage error if the index is out of range.
    pub fn value(&self, index: usize) -> Result<&Value> {
        self.0
            .get(index)
            .ok_or_else(|| Error::argument_mismatch(index, "any value", "nothing"))
    }

    /// Index of the first argument of type `T`.
    #[must_use]
    pub fn position<T: Any>(&self) -> Option<usize> {
        self.0.iter().position(Value::is::<T>)
    }

    /// Replace the argument at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns a usage error if the index is out of range.
    pub fn replace(&mut self, index: usize, value: Value) -> Result<Value> {
        let slot = self
            .0
            .get_mut(index)
            .ok_or_else(|| Error::argument_mismatch(index, "any value", "nothing"))?;
        Ok(std::mem::replace(slot, value))
    }

    /// Copy of these arguments with the one at `index` replaced.
    ///
    /// # Errors
    ///
    /// Returns a usage error if the index is out of range.
    pub fn with(&self, index: usize, value: Value) -> Result<Self> {
        let mut arguments = self.clone();
        arguments.replace(index, value)?;
        Ok(arguments)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Arguments {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
