pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use service::AuthService;
pub use token::{Claims, TokenIssuer};

/// Represents the payload for a user login request.
///
/// Only emptiness is rejected here. Oversized values cannot match a stored
/// user and fail as bad credentials instead.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username. Must be non-empty and at most 100 characters.
    #[validate(length(
        min = 1,
        max = 100,
        message = "username must be between 1 and 100 characters"
    ))]
    pub username: String,
    /// Password for the new account. Must be non-empty and at most 255 characters.
    #[validate(length(
        min = 1,
        max = 255,
        message = "password must be between 1 and 255 characters"
    ))]
    pub password: String,
}

/// Response body after a successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The signed bearer token.
    pub token: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_login_request_validation() {
        let valid_login = LoginRequest {
            username: "alice".to_string(),
            password: "p1".to_string(),
        };
        assert!(valid_login.validate().is_ok());

        let empty_password = LoginRequest {
            username: "alice".to_string(),
            password: "".to_string(),
        };
        assert!(empty_password.validate().is_err());

        let oversized = LoginRequest {
            username: "a".repeat(101),
            password: "b".repeat(256),
        };
        assert!(oversized.validate().is_ok());
    }

    #[test]
    fn test_register_request_validation() {
        let valid_register = RegisterRequest {
            username: "a".repeat(100),
            password: "b".repeat(255),
        };
        assert!(valid_register.validate().is_ok());

        let long_username = RegisterRequest {
            username: "a".repeat(101),
            password: "password".to_string(),
        };
        assert!(long_username.validate().is_err());

        let long_password = RegisterRequest {
            username: "alice".to_string(),
            password: "b".repeat(256),
        };
        assert!(long_password.validate().is_err());
    }
}
