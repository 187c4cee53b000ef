use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register a new user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Login with either username or email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

/// Partial profile update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// New car for the inventory
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 50))]
    pub make: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    #[validate(range(min = 1886, max = 2100))]
    pub year: i32,
    #[validate(length(min = 1, max = 50))]
    pub body_type: String,
    #[validate(length(min = 1, max = 50))]
    pub fuel_type: String,
    #[validate(length(min = 1, max = 20))]
    pub transmission: String,
    pub engine_size: Option<f64>,
    #[validate(range(min = 0))]
    pub horsepower: Option<i32>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub description: Option<String>,
    pub features: Option<String>,
}

/// Partial car update, absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCarRequest {
    #[validate(length(min = 1, max = 50))]
    pub make: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    #[validate(range(min = 1886, max = 2100))]
    pub year: Option<i32>,
    pub body_type: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub engine_size: Option<f64>,
    #[validate(range(min = 0))]
    pub horsepower: Option<i32>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub description: Option<String>,
    pub features: Option<String>,
}

/// Incoming chat message
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<i64>,
}

/// Free-text query for the extractor debug endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseQueryRequest {
    pub query: String,
}

/// Offset pagination parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { skip: 0, limit: default_limit() }
    }
}

impl Pagination {
    /// Clamp to sane bounds before hitting the database
    pub fn clamped(self) -> Self {
        Self {
            skip: self.skip.max(0),
            limit: self.limit.clamp(1, 100),
        }
    }
}

fn default_limit() -> i64 {
    100
}
