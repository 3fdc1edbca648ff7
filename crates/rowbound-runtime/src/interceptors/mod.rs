//! Built-in interceptors.
//!
//! None of them declares an interest of its own: the registration decides
//! which signatures they see, either through a configured interest or
//! through [`InterceptorChain::add_with_interest`](rowbound_core::InterceptorChain::add_with_interest).

mod logging;
mod retry;
mod row_limit;

pub use logging::{CallLevel, TracingInterceptor};
pub use retry::RetryInterceptor;
pub use row_limit::RowLimitInterceptor;
