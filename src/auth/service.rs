//! Authentication service
//!
//! Registration, login and profile lookup over a [`UserStore`].

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{AuthResponse, LoginRequest, NewUser, RegisterRequest, User};
use crate::store::{StoreError, UserStore};

use super::jwt::{generate_token, JwtError};
use super::password::{hash_password, verify_password, PasswordError};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0} required")]
    MissingField(&'static str),

    #[error("Email already taken")]
    EmailTaken,

    #[error("Email does not exist")]
    EmailNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("User not found")]
    UserNotFound,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation(_) => AuthError::EmailTaken,
            other => AuthError::Store(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingField(_) => ApiError::Validation(vec![e.to_string()]),
            AuthError::EmailTaken => ApiError::Conflict(e.to_string()),
            AuthError::EmailNotFound | AuthError::UserNotFound => ApiError::NotFound(e.to_string()),
            AuthError::InvalidPassword => ApiError::Unauthorized(e.to_string()),
            AuthError::Store(store_err) => store_err.into(),
            AuthError::Password(_) | AuthError::Token(_) | AuthError::Task(_) => {
                ApiError::InternalError(e.to_string())
            }
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: String,
    token_ttl_seconds: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        jwt_secret: String,
        token_ttl_seconds: i64,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            jwt_secret,
            token_ttl_seconds,
            bcrypt_cost,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Create an account and sign the new user in
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        let name = request.name.ok_or(AuthError::MissingField("Name"))?;
        let email = request.email.ok_or(AuthError::MissingField("Email"))?;
        let password = request.password.ok_or(AuthError::MissingField("Password"))?;

        let email = normalize_email(&email);
        let cost = self.bcrypt_cost;
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password(&password, cost))
                .await
                .map_err(|e| AuthError::Task(e.to_string()))??;

        let user = self
            .users
            .create_user(NewUser {
                name: name.trim().to_string(),
                email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        self.signed_in(user)
    }

    /// Check credentials and issue a token
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = request.email.ok_or(AuthError::MissingField("Email"))?;
        let password = request.password.ok_or(AuthError::MissingField("Password"))?;

        let user = self
            .users
            .find_user_by_email(&normalize_email(&email))
            .await?
            .ok_or(AuthError::EmailNotFound)?;

        let password_hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
                .await
                .map_err(|e| AuthError::Task(e.to_string()))??;

        if !matches {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidPassword);
        }

        self.signed_in(user)
    }

    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<User, AuthError> {
        self.users
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    fn signed_in(&self, user: User) -> Result<AuthResponse, AuthError> {
        let token = generate_token(user.id, &self.jwt_secret, self.token_ttl_seconds)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
