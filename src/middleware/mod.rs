//! Middleware and extractors
//!
//! Request tracing, security headers, bearer-token authentication and
//! validated JSON bodies.

pub mod auth;
mod security;
mod trace;
mod validation;

pub use auth::AuthenticatedUser;
pub use security::{hsts_header, security_headers};
pub use trace::request_tracing;
pub use validation::ValidatedJson;
