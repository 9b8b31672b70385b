//! Loan calculator backend library
//!
//! Amortization engine, user accounts and loan persistence behind an
//! axum HTTP API.

pub mod amortization;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod loan_service;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod store;
