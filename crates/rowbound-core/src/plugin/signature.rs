//! Operation signatures and interest sets.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Role a target plays (`Executor`, `StatementHandler`, `Cache`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReceiverKind(Cow<'static, str>);

impl ReceiverKind {
    /// Create a receiver kind from a static name.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of an operation: its name and parameter type names.
///
/// Parameter types are part of the identity, so overloads such as
/// `query(Statement, RowBounds)` and `query(Statement, RowBounds, CacheKey)`
/// are distinct operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operation {
    name: Cow<'static, str>,
    params: Cow<'static, [Cow<'static, str>]>,
}

impl Operation {
    /// Create an operation usable in `const` items.
    ///
    /// ```rust,ignore
    /// const GET: Operation = Operation::from_static("get", &[Cow::Borrowed("CacheKey")]);
    /// ```
    #[must_use]
    pub const fn from_static(name: &'static str, params: &'static [Cow<'static, str>]) -> Self {
        Self {
            name: Cow::Borrowed(name),
            params: Cow::Borrowed(params),
        }
    }

    #[must_use]
    pub fn new<I, P>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            name: Cow::Owned(name.into()),
            params: params
                .into_iter()
                .map(|p| Cow::Owned(p.into()))
                .collect::<Vec<_>>()
                .into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter type names in declaration order.
    pub fn params(&self) -> impl ExactSizeIterator<Item = &str> {
        self.params.iter().map(|p| &**p)
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(param)?;
        }
        f.write_str(")")
    }
}

/// An operation bound to the receiver kind that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    receiver: ReceiverKind,
    operation: Operation,
}

impl Signature {
    #[must_use]
    pub const fn new(receiver: ReceiverKind, operation: Operation) -> Self {
        Self {
            receiver,
            operation,
        }
    }

    #[must_use]
    pub const fn receiver(&self) -> &ReceiverKind {
        &self.receiver
    }

    #[must_use]
    pub const fn operation(&self) -> &Operation {
        &self.operation
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.receiver, self.operation)
    }
}

/// Set of signatures an interceptor wants to observe, grouped by receiver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestSet {
    by_receiver: HashMap<ReceiverKind, HashSet<Operation>>,
}

impl InterestSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a signature, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, receiver: ReceiverKind, operation: Operation) -> Self {
        self.insert(Signature::new(receiver, operation));
        self
    }

    /// Add a signature. Returns false if it was already present.
    pub fn insert(&mut self, signature: Signature) -> bool {
        self.by_receiver
            .entry(signature.receiver)
            .or_default()
            .insert(signature.operation)
    }

    #[must_use]
    pub fn contains(&self, signature: &Signature) -> bool {
        self.by_receiver
            .get(&signature.receiver)
            .is_some_and(|ops| ops.contains(&signature.operation))
    }

    /// Operations declared for `receiver`, if any.
    #[must_use]
    pub fn operations_for(&self, receiver: &ReceiverKind) -> Option<&HashSet<Operation>> {
        self.by_receiver.get(receiver).filter(|ops| !ops.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_receiver.values().all(HashSet::is_empty)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_receiver.values().map(HashSet::len).sum()
    }

    /// Iterate over all declared signatures in unspecified order.
    pub fn signatures(&self) -> impl Iterator<Item = Signature> + '_ {
        self.by_receiver.iter().flat_map(|(receiver, ops)| {
            ops.iter()
                .map(move |op| Signature::new(receiver.clone(), op.clone()))
        })
    }
}

impl FromIterator<Signature> for InterestSet {
    fn from_iter<I: IntoIterator<Item = Signature>>(iter: I) -> Self {
        let mut set = Self::new();
        for signature in iter {
            set.insert(signature);
        }
        set
    }
}
