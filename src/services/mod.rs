// Service exports
pub mod auth;
pub mod cache;
pub mod chat;
pub mod postgres;

pub use auth::{AuthError, AuthService, Claims};
pub use cache::{CacheError, CarCache};
pub use chat::{ChatError, ChatService};
pub use postgres::{PostgresClient, PostgresError};
