//! Interception targets and captured invocations.

use std::borrow::Cow;
use std::fmt;

use super::signature::{Operation, ReceiverKind, Signature};
use super::value::{Arguments, Value};
use crate::Result;

/// An execution object whose operations can be intercepted.
///
/// Targets dispatch on the operation signature only; they expose no other
/// knowledge to the interception chain. Wrapped targets ([`Plugin`]) are
/// targets themselves, so wrapping nests.
///
/// [`Plugin`]: super::Plugin
pub trait Target: Send + Sync {
    /// Role this target plays, matched against interceptor interest sets.
    fn receiver_kind(&self) -> &ReceiverKind;

    /// Perform `operation` with `arguments`.
    ///
    /// # Errors
    ///
    /// Returns whatever the operation fails with. Unknown operations should
    /// fail with [`Error::unknown_operation`](crate::Error::unknown_operation).
    fn invoke(&self, operation: &Operation, arguments: &Arguments) -> Result<Value>;
}

/// A pending call: receiver, operation and arguments.
///
/// Constructing an invocation has no side effects. [`proceed`](Self::proceed)
/// performs the real call against the next layer.
#[derive(Clone)]
pub struct Invocation<'a> {
    target: &'a dyn Target,
    operation: &'a Operation,
    arguments: Cow<'a, Arguments>,
}

impl<'a> Invocation<'a> {
    #[must_use]
    pub fn new(target: &'a dyn Target, operation: &'a Operation, arguments: &'a Arguments) -> Self {
        Self {
            target,
            operation,
            arguments: Cow::Borrowed(arguments),
        }
    }

    /// The next layer this invocation proceeds into.
    #[must_use]
    pub fn target(&self) -> &'a dyn Target {
        self.target
    }

    #[must_use]
    pub fn receiver_kind(&self) -> &'a ReceiverKind {
        self.target.receiver_kind()
    }

    #[must_use]
    pub const fn operation(&self) -> &'a Operation {
        self.operation
    }

    #[must_use]
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Full signature of the captured call.
    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature::new(self.receiver_kind().clone(), self.operation.clone())
    }

    /// A copy of this invocation carrying different arguments.
    #[must_use]
    pub fn with_arguments(&self, arguments: Arguments) -> Self {
        Self {
            target: self.target,
            operation: self.operation,
            arguments: Cow::Owned(arguments),
        }
    }

    /// Perform the real call and return its outcome unchanged.
    ///
    /// May be called any number of times; every call reaches the target.
    ///
    /// # Errors
    ///
    /// Propagates the target's failure as-is.
    pub fn proceed(&self) -> Result<Value> {
        self.target.invoke(self.operation, &self.arguments)
    }
}

impl fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("receiver", self.receiver_kind())
            .field("operation", self.operation)
            .field("arguments", &self.arguments.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::Error;

    static ECHO: ReceiverKind = ReceiverKind::from_static("Echo");
    const SAY: Operation = Operation::from_static("say", &[Cow::Borrowed("String")]);

    #[derive(Default)]
    struct Echo {
        calls: AtomicUsize,
    }

    impl Target for Echo {
        fn receiver_kind(&self) -> &ReceiverKind {
            &ECHO
        }

        fn invoke(&self, operation: &Operation, arguments: &Arguments) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if *operation == SAY {
                Ok(Value::new(arguments.get::<String>(0)?.clone()))
            } else {
                Err(Error::unknown_operation(ECHO.as_str(), operation.to_string()))
            }
        }
    }

    #[test]
    fn test_new_invocation_has_no_side_effects() {
        let echo = Echo::default();
        let say = SAY;
        let args = Arguments::new().arg("hi".to_string());
        let invocation = Invocation::new(&echo, &say, &args);

        assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
        assert_eq!(invocation.signature().to_string(), "Echo.say(String)");
    }

    #[test]
    fn test_proceed_performs_one_call_per_invocation() {
        let echo = Echo::default();
        let say = SAY;
        let args = Arguments::new().arg("hi".to_string());
        let invocation = Invocation::new(&echo, &say, &args);

        let result = invocation.proceed().unwrap();
        assert_eq!(result.downcast_ref::<String>().unwrap(), "hi");
        assert_eq!(echo.calls.load(Ordering::SeqCst), 1);

        invocation.proceed().unwrap();
        assert_eq!(echo.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_with_arguments_leaves_original_untouched() {
        let echo = Echo::default();
        let say = SAY;
        let args = Arguments::new().arg("hi".to_string());
        let invocation = Invocation::new(&echo, &say, &args);
        let rewritten = invocation.with_arguments(Arguments::new().arg("bye".to_string()));

        let out = rewritten.proceed().unwrap();
        assert_eq!(out.downcast_ref::<String>().unwrap(), "bye");
        assert_eq!(invocation.arguments().get::<String>(0).unwrap(), "hi");
    }

    #[test]
    fn test_proceed_propagates_failure() {
        let echo = Echo::default();
        let args = Arguments::new();
        let shout = Operation::new("shout", ["String"]);
        let invocation = Invocation::new(&echo, &shout, &args);

        let err = invocation.proceed().unwrap_err();
        assert!(err.is_unknown_operation());
    }

    #[test]
    fn test_invocation_debug() {
        let echo = Echo::default();
        let args = Arguments::new().arg("hi".to_string());
        let debug_str = format!("{:?}", Invocation::new(&echo, &SAY, &args));
        assert!(debug_str.contains("Invocation"));
        assert!(debug_str.contains("say"));
    }
}
