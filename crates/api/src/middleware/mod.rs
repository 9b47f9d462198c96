//! HTTP middleware and extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, HTTP context)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS
//!
//! Authentication and authorization run per route as extractors.

pub mod auth;
pub mod request_id;

pub use auth::{AdminOnly, Elevated, RequireAuth, RequireRole, RoleSet, SuperUserOnly};
pub use request_id::{RequestId, request_id_middleware};
