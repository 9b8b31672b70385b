//! Authentication request and response bodies

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::UserResponse;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "Name required"),
        length(min = 1, max = 255, message = "Name must be between 1 and 255 characters")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Email required"),
        email(message = "Email must be a valid email address")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Password required"),
        length(min = 6, max = 72, message = "Password must be between 6 and 72 characters")
    )]
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "Email required"))]
    pub email: Option<String>,

    #[validate(required(message = "Password required"))]
    pub password: Option<String>,
}

/// Profile plus a freshly issued bearer token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_request_validation() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "name": "Ada",
            "email": "not-an-email",
            "password": "123"
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn test_valid_register_request() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "password": "analytical"
        }))
        .unwrap();

        assert!(req.validate().is_ok());
    }
}
