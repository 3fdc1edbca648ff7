//! Call interception for execution objects.
//!
//! Execution objects expose themselves as [`Target`]s: they dispatch on an
//! [`Operation`] signature and an [`Arguments`] list. Interceptors declare an
//! [`InterestSet`] and are composed around targets by an
//! [`InterceptorChain`]. Each layer is a [`Plugin`], which is itself a target,
//! so chains nest.
//!
//! Interest filtering happens once per wrap: a target whose receiver kind is
//! not named by an interceptor is not wrapped by it at all, and inside a
//! layer only the declared operations reach the interceptor.

mod chain;
mod interceptor;
mod invocation;
mod signature;
mod value;

pub use chain::{InterceptorChain, Plugin};
pub use interceptor::{Interceptor, Properties};
pub use invocation::{Invocation, Target};
pub use signature::{InterestSet, Operation, ReceiverKind, Signature};
pub use value::{Arguments, Value};
