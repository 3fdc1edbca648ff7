//! Pagination rewriting interceptor

use rowbound_core::{
    Error, Interceptor, InterestSet, Invocation, Properties, Result, RowBounds, Value,
};

/// Caps the limit of the `RowBounds` argument of intercepted calls.
///
/// Calls without a `RowBounds` argument, or already within the cap, proceed
/// with their original arguments.
///
/// Properties: `max_rows` (required).
#[derive(Debug, Clone, Default)]
pub struct RowLimitInterceptor {
    max_rows: Option<usize>,
    interest: InterestSet,
}

impl RowLimitInterceptor {
    #[must_use]
    pub fn new(max_rows: usize) -> Self {
        Self {
            max_rows: Some(max_rows),
            interest: InterestSet::new(),
        }
    }

    /// Declare the signatures to rewrite.
    #[must_use]
    pub fn with_interest(mut self, interest: InterestSet) -> Self {
        self.interest = interest;
        self
    }

    #[must_use]
    pub const fn max_rows(&self) -> Option<usize> {
        self.max_rows
    }
}

impl Interceptor for RowLimitInterceptor {
    fn interest(&self) -> InterestSet {
        self.interest.clone()
    }

    fn intercept(&self, invocation: Invocation<'_>) -> Result<Value> {
        let (Some(max_rows), Some(index)) = (
            self.max_rows,
            invocation.arguments().position::<RowBounds>(),
        ) else {
            return invocation.proceed();
        };

        let bounds = *invocation.arguments().get::<RowBounds>(index)?;
        let clamped = bounds.clamp_limit(max_rows);
        if clamped == bounds {
            return invocation.proceed();
        }

        tracing::debug!(
            call.signature = %invocation.signature(),
            row_limit.requested = %bounds,
            row_limit.applied = %clamped,
            "row bounds clamped",
        );

        let arguments = invocation
            .arguments()
            .with(index, Value::new(clamped))?;
        invocation.with_arguments(arguments).proceed()
    }

    fn set_properties(&mut self, properties: &Properties) -> Result<()> {
        let max_rows = properties
            .get_parsed::<usize>("max_rows")?
            .ok_or_else(|| Error::config("row_limit requires the 'max_rows' property"))?;
        self.max_rows = Some(max_rows);
        Ok(())
    }

    fn name(&self) -> &str {
        "row_limit"
    }
}
