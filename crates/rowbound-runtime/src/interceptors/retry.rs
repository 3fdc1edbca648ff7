//! Retry interceptor

use rowbound_core::{Error, Interceptor, InterestSet, Invocation, Properties, Result, Value};

/// Proceeds again while the call fails with a data-access error.
///
/// Usage, configuration and target errors propagate on the first attempt.
///
/// Properties: `attempts` (total attempts, at least 1; default 3).
#[derive(Debug, Clone)]
pub struct RetryInterceptor {
    attempts: u32,
    interest: InterestSet,
}

impl RetryInterceptor {
    pub const DEFAULT_ATTEMPTS: u32 = 3;

    /// # Errors
    ///
    /// Returns a configuration error if `attempts` is zero.
    pub fn new(attempts: u32) -> Result<Self> {
        Ok(Self {
            attempts: checked_attempts(attempts)?,
            interest: InterestSet::new(),
        })
    }

    /// Declare the signatures to retry.
    #[must_use]
    pub fn with_interest(mut self, interest: InterestSet) -> Self {
        self.interest = interest;
        self
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}

fn checked_attempts(attempts: u32) -> Result<u32> {
    if attempts == 0 {
        return Err(Error::config("retry 'attempts' must be at least 1"));
    }
    Ok(attempts)
}

impl Default for RetryInterceptor {
    fn default() -> Self {
        Self {
            attempts: Self::DEFAULT_ATTEMPTS,
            interest: InterestSet::new(),
        }
    }
}

impl Interceptor for RetryInterceptor {
    fn interest(&self) -> InterestSet {
        self.interest.clone()
    }

    fn intercept(&self, invocation: Invocation<'_>) -> Result<Value> {
        let mut attempt = 1;
        loop {
            match invocation.proceed() {
                Err(e) if e.is_data_access() && attempt < self.attempts => {
                    tracing::debug!(
                        call.signature = %invocation.signature(),
                        retry.attempt = attempt,
                        retry.max_attempts = self.attempts,
                        error = %e,
                        "retrying after data access error",
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn set_properties(&mut self, properties: &Properties) -> Result<()> {
        if let Some(attempts) = properties.get_parsed::<u32>("attempts")? {
            self.attempts = checked_attempts(attempts)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "retry"
    }
}
