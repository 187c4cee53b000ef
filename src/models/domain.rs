use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A car in the inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Car {
    pub id: i64,
    pub make: String,
    pub model: String,
    pub year: i32,
    /// sedan, suv, hatchback, truck, ...
    pub body_type: String,
    /// gasoline, diesel, hybrid, electric
    pub fuel_type: String,
    /// automatic, manual, cvt
    pub transmission: String,
    /// Litres
    pub engine_size: Option<f64>,
    pub horsepower: Option<i32>,
    pub price: Option<f64>,
    pub description: Option<String>,
    /// Comma-separated feature list
    pub features: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A conversation between a user and the bot
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatSession {
    pub id: i64,
    pub user_id: i64,
    pub title: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Single chat message. `user_id` is `None` for bot messages.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub chat_session_id: i64,
    pub user_id: Option<i64>,
    pub content: String,
    pub role: MessageRole,
    pub timestamp: DateTime<Utc>,
}

/// A car that was suggested inside a chat session
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recommendation {
    pub id: i64,
    pub chat_session_id: i64,
    pub car_id: i64,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
