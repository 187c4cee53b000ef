//! Car Advisor - chat-driven car recommendation service
//!
//! Free-text questions about cars (mostly in Russian) are turned into
//! structured search parameters by a rule-based extractor, matched against
//! the car inventory and answered with a short rendered summary.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    CarInventory, ExtractedParameters, InMemoryInventory, InventoryError, KeywordDictionary,
    ParameterExtractor, RecommendationEngine, RecommendationResult,
};
pub use models::{Car, ChatRequest, ChatResponse};
