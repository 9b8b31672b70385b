//! Authentication
//!
//! - bcrypt password hashing
//! - HS256 bearer tokens carrying the user id
//! - registration, login and profile lookup

mod jwt;
mod password;
mod service;

pub use jwt::{generate_token, verify_token, Claims, JwtError};
pub use password::{hash_password, verify_password, PasswordError};
pub use service::{AuthError, AuthService};
