// Core recommendation exports
pub mod extractor;
pub mod filters;
pub mod inventory;
pub mod keywords;
pub mod recommender;
pub mod response;

pub use extractor::{ExtractedParameters, ParameterExtractor};
pub use filters::{translate, passes_post_filter, matches_inventory_filter, InventoryFilter, PostFilter};
pub use inventory::{CarInventory, InMemoryInventory, InventoryError};
pub use keywords::{DictionaryError, KeywordDictionary, KeywordSet};
pub use recommender::{RecommendationEngine, RecommendationResult, DEFAULT_RESULT_LIMIT};
pub use response::{render_response, format_price};
