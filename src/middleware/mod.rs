mod core;
mod tracing;

pub use self::core::Middleware;
pub use self::tracing::TracingMiddleware;
