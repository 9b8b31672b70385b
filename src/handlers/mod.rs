//! API handlers

pub mod auth;
pub mod loan;
pub mod user;

pub use auth::{current_user, login, register};
pub use loan::{calculate_loan, get_loan};
pub use user::get_user;
