pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::AuthUser;
pub use middleware::AuthMiddleware;
pub use service::AuthService;
pub use token::{Claims, TokenKeys};

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Must be a valid email format.
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    /// Must be at least 6 characters long.
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `data` payload returned by both register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The signed access token, valid for one hour.
    pub token: String,
}
