//! Call logging interceptor

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use rowbound_core::{Error, Interceptor, InterestSet, Invocation, Properties, Result, Value};

/// Level at which intercepted calls are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallLevel {
    Trace,
    #[default]
    Debug,
    Info,
}

impl CallLevel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
        }
    }
}

impl FromStr for CallLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            other => Err(Error::config(format!(
                "unsupported call log level '{other}' (expected trace, debug or info)"
            ))),
        }
    }
}

impl fmt::Display for CallLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emit one event at a runtime-selected level.
macro_rules! call_event {
    ($level:expr, $($field:tt)*) => {
        match $level {
            CallLevel::Trace => tracing::trace!($($field)*),
            CallLevel::Debug => tracing::debug!($($field)*),
            CallLevel::Info => tracing::info!($($field)*),
        }
    };
}

/// Logs every intercepted call with its signature, duration and outcome.
///
/// Properties: `level` (`trace`, `debug` or `info`; default `debug`).
#[derive(Debug, Clone, Default)]
pub struct TracingInterceptor {
    level: CallLevel,
    interest: InterestSet,
}

impl TracingInterceptor {
    #[must_use]
    pub fn new(level: CallLevel) -> Self {
        Self {
            level,
            interest: InterestSet::new(),
        }
    }

    /// Declare the signatures to log.
    #[must_use]
    pub fn with_interest(mut self, interest: InterestSet) -> Self {
        self.interest = interest;
        self
    }

    #[must_use]
    pub const fn level(&self) -> CallLevel {
        self.level
    }
}

impl Interceptor for TracingInterceptor {
    fn interest(&self) -> InterestSet {
        self.interest.clone()
    }

    fn intercept(&self, invocation: Invocation<'_>) -> Result<Value> {
        let signature = invocation.signature();
        let start = Instant::now();

        let result = invocation.proceed();
        let elapsed_us = start.elapsed().as_micros() as u64;

        match &result {
            Ok(value) => call_event!(
                self.level,
                call.signature = %signature,
                call.elapsed_us = elapsed_us,
                call.outcome = "ok",
                call.result_type = value.type_name(),
                "intercepted call",
            ),
            Err(e) => call_event!(
                self.level,
                call.signature = %signature,
                call.elapsed_us = elapsed_us,
                call.outcome = "error",
                error = %e,
                "intercepted call",
            ),
        }

        result
    }

    fn set_properties(&mut self, properties: &Properties) -> Result<()> {
        if let Some(level) = properties.get_parsed::<CallLevel>("level")? {
            self.level = level;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "tracing"
    }
}
