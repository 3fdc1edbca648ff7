//! Interception layers and their ordered composition.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::interceptor::Interceptor;
use super::invocation::{Invocation, Target};
use super::signature::{InterestSet, Operation, ReceiverKind};
use super::value::{Arguments, Value};
use crate::Result;

/// One interception layer around a target.
///
/// The operations to intercept are resolved once, when the layer is
/// built. Calls outside that set go straight to the inner target.
pub struct Plugin {
    target: Arc<dyn Target>,
    interceptor: Arc<dyn Interceptor>,
    operations: HashSet<Operation>,
}

impl Plugin {
    /// Wrap `target` using the interceptor's declared interest.
    #[must_use]
    pub fn wrap(target: Arc<dyn Target>, interceptor: Arc<dyn Interceptor>) -> Arc<dyn Target> {
        let interest = interceptor.interest();
        Self::wrap_with_interest(target, interceptor, &interest)
    }

    /// Wrap `target` using an explicit interest set.
    ///
    /// Returns `target` itself when the interest set names no operation of
    /// its receiver kind.
    #[must_use]
    pub fn wrap_with_interest(
        target: Arc<dyn Target>,
        interceptor: Arc<dyn Interceptor>,
        interest: &InterestSet,
    ) -> Arc<dyn Target> {
        let Some(operations) = interest.operations_for(target.receiver_kind()) else {
            tracing::trace!(
                plugin.receiver = %target.receiver_kind(),
                plugin.interceptor = interceptor.name(),
                "no matching signatures, target left unwrapped",
            );
            return target;
        };

        tracing::trace!(
            plugin.receiver = %target.receiver_kind(),
            plugin.interceptor = interceptor.name(),
            plugin.operations = operations.len(),
            "wrapping target",
        );

        Arc::new(Self {
            operations: operations.clone(),
            target,
            interceptor,
        })
    }

    /// The wrapped target.
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn Target> {
        &self.target
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("receiver", self.target.receiver_kind())
            .field("interceptor", &self.interceptor.name())
            .field("operations", &self.operations.len())
            .finish_non_exhaustive()
    }
}

impl Target for Plugin {
    fn receiver_kind(&self) -> &ReceiverKind {
        self.target.receiver_kind()
    }

    fn invoke(&self, operation: &Operation, arguments: &Arguments) -> Result<Value> {
        if self.operations.contains(operation) {
            self.interceptor
                .intercept(Invocation::new(self.target.as_ref(), operation, arguments))
        } else {
            self.target.invoke(operation, arguments)
        }
    }
}

#[derive(Clone)]
struct Registration {
    interceptor: Arc<dyn Interceptor>,
    interest: InterestSet,
}

/// Ordered set of interceptors applied to targets.
///
/// For interceptors registered as `[I1, I2, ..., In]`, [`plugin_all`] builds
/// `I1(I2(...In(target)))`: a call matching every interest set reaches `I1`
/// first and the real target last.
///
/// [`plugin_all`]: Self::plugin_all
#[derive(Clone, Default)]
pub struct InterceptorChain {
    registrations: Vec<Registration>,
}

impl InterceptorChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an interceptor with its declared interest.
    pub fn add(&mut self, interceptor: Arc<dyn Interceptor>) {
        let interest = interceptor.interest();
        self.add_with_interest(interceptor, interest);
    }

    /// Register an interceptor with an interest set overriding its declared one.
    pub fn add_with_interest(&mut self, interceptor: Arc<dyn Interceptor>, interest: InterestSet) {
        tracing::debug!(
            chain.interceptor = interceptor.name(),
            chain.signatures = interest.len(),
            chain.position = self.registrations.len(),
            "interceptor registered",
        );
        self.registrations.push(Registration {
            interceptor,
            interest,
        });
    }

    /// Wrap `target` with every registered interceptor.
    #[must_use]
    pub fn plugin_all(&self, target: Arc<dyn Target>) -> Arc<dyn Target> {
        self.registrations.iter().rev().fold(target, |wrapped, r| {
            Plugin::wrap_with_interest(wrapped, Arc::clone(&r.interceptor), &r.interest)
        })
    }

    /// Registered interceptors in registration order.
    pub fn interceptors(&self) -> impl Iterator<Item = &Arc<dyn Interceptor>> {
        self.registrations.iter().map(|r| &r.interceptor)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.registrations.iter().map(|r| r.interceptor.name()))
            .finish()
    }
}

impl FromIterator<Arc<dyn Interceptor>> for InterceptorChain {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Interceptor>>>(iter: I) -> Self {
        let mut chain = Self::new();
        for interceptor in iter {
            chain.add(interceptor);
        }
        chain
    }
}
