use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::{
    extractor::{ExtractedParameters, ParameterExtractor},
    filters::{passes_post_filter, translate},
    inventory::{CarInventory, InventoryError},
    response::render_response,
};
use crate::models::Car;

/// Number of cars returned when nothing else is configured
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Reply text together with the cars it enumerates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub response: String,
    pub cars: Vec<Car>,
}

/// Recommendation orchestrator
///
/// # Pipeline Stages
/// 1. Parameter extraction from the chat text
/// 2. Translation into inventory filters
/// 3. Inventory lookup (the only await point)
/// 4. In-process horsepower filter and truncation
/// 5. Response rendering
#[derive(Clone)]
pub struct RecommendationEngine {
    extractor: Arc<ParameterExtractor>,
    inventory: Arc<dyn CarInventory>,
    limit: usize,
}

impl RecommendationEngine {
    pub fn new(extractor: ParameterExtractor, inventory: Arc<dyn CarInventory>) -> Self {
        Self {
            extractor: Arc::new(extractor),
            inventory,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn extract_parameters(&self, query: &str) -> ExtractedParameters {
        self.extractor.extract(query)
    }

    /// Find cars matching the extracted parameters, at most `limit` of them.
    ///
    /// Inventory failures are returned unchanged; they never turn into an
    /// empty result.
    pub async fn find_matching_cars(
        &self,
        params: &ExtractedParameters,
        limit: usize,
    ) -> Result<Vec<Car>, InventoryError> {
        let (filter, post) = translate(params, limit);

        let candidates = self.inventory.find_cars(&filter).await.map_err(|e| {
            tracing::error!("Inventory lookup failed: {}", e);
            e
        })?;
        let total_candidates = candidates.len();

        let mut cars: Vec<Car> = candidates
            .into_iter()
            .filter(|car| passes_post_filter(car, &post))
            .collect();
        cars.truncate(limit);

        tracing::debug!(
            "Inventory returned {} candidates, {} kept after post-filtering",
            total_candidates,
            cars.len()
        );

        Ok(cars)
    }

    /// Process a chat query end to end.
    ///
    /// The reply is rendered only once the final list of matches is known.
    pub async fn process_query(&self, query: &str) -> Result<RecommendationResult, InventoryError> {
        let params = self.extract_parameters(query);
        let cars = self.find_matching_cars(&params, self.limit).await?;
        let response = render_response(&cars);

        tracing::info!("Recommended {} cars for query", cars.len());

        Ok(RecommendationResult { response, cars })
    }
}

impl std::fmt::Debug for RecommendationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationEngine")
            .field("extractor", &self.extractor)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filters::InventoryFilter;
    use crate::core::inventory::InMemoryInventory;
    use crate::core::response::{MULTIPLE_MATCHES_CLOSING, NO_RESULTS_MESSAGE, SINGLE_MATCH_CLOSING};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    fn create_car(id: i64, make: &str, year: i32, horsepower: Option<i32>) -> Car {
        Car {
            id,
            make: make.to_string(),
            model: format!("Model {}", id),
            year,
            body_type: "sedan".to_string(),
            fuel_type: "gasoline".to_string(),
            transmission: "automatic".to_string(),
            engine_size: None,
            horsepower,
            price: Some(2_000_000.0),
            description: None,
            features: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Returns a fixed list and remembers the filter it was called with
    struct RecordingInventory {
        cars: Vec<Car>,
        last_filter: Mutex<Option<InventoryFilter>>,
    }

    #[async_trait]
    impl CarInventory for RecordingInventory {
        async fn find_cars(&self, filter: &InventoryFilter) -> Result<Vec<Car>, InventoryError> {
            *self.last_filter.lock().unwrap() = Some(filter.clone());
            Ok(self.cars.clone())
        }
    }

    struct FailingInventory;

    #[async_trait]
    impl CarInventory for FailingInventory {
        async fn find_cars(&self, _filter: &InventoryFilter) -> Result<Vec<Car>, InventoryError> {
            Err(InventoryError::Unavailable("database is down".to_string()))
        }
    }

    fn engine_with(cars: Vec<Car>) -> (RecommendationEngine, Arc<RecordingInventory>) {
        let inventory = Arc::new(RecordingInventory {
            cars,
            last_filter: Mutex::new(None),
        });
        let engine = RecommendationEngine::new(ParameterExtractor::default(), inventory.clone());
        (engine, inventory)
    }

    #[tokio::test]
    async fn test_exact_year_sent_as_range() {
        let (engine, inventory) = engine_with(vec![]);
        engine.process_query("2020").await.unwrap();

        let filter = inventory.last_filter.lock().unwrap().clone().unwrap();
        assert_eq!(filter.min_year, Some(2020));
        assert_eq!(filter.max_year, Some(2021));
        assert_eq!(filter.limit, 2 * DEFAULT_RESULT_LIMIT);
    }

    #[tokio::test]
    async fn test_empty_query_renders_defaults() {
        let (engine, inventory) = engine_with(vec![create_car(1, "Kia", 2021, None)]);
        let result = engine.process_query("привет").await.unwrap();

        let filter = inventory.last_filter.lock().unwrap().clone().unwrap();
        assert_eq!(filter, InventoryFilter { limit: 10, ..Default::default() });
        assert_eq!(result.cars.len(), 1);
        assert!(result.response.ends_with(SINGLE_MATCH_CLOSING));
    }

    #[tokio::test]
    async fn test_no_candidates_gives_no_results_text() {
        let (engine, _) = engine_with(vec![]);
        let result = engine.process_query("привет").await.unwrap();
        assert!(result.cars.is_empty());
        assert_eq!(result.response, NO_RESULTS_MESSAGE);
    }

    #[tokio::test]
    async fn test_horsepower_post_filter() {
        let (engine, inventory) = engine_with(vec![
            create_car(1, "BMW", 2021, None),
            create_car(2, "BMW", 2021, Some(340)),
            create_car(3, "BMW", 2021, Some(190)),
            create_car(4, "BMW", 2021, Some(300)),
            create_car(5, "BMW", 2021, None),
        ]);

        let result = engine.process_query("мощнее 300 лс").await.unwrap();

        let filter = inventory.last_filter.lock().unwrap().clone().unwrap();
        assert_eq!(filter, InventoryFilter { limit: 10, ..Default::default() });

        let ids: Vec<i64> = result.cars.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 4]);
        assert!(result.response.ends_with(MULTIPLE_MATCHES_CLOSING));
    }

    #[tokio::test]
    async fn test_truncates_to_limit() {
        let cars: Vec<Car> = (0..12).map(|i| create_car(i, "Kia", 2021, Some(150))).collect();
        let (engine, _) = engine_with(cars);
        let engine = engine.with_limit(3);

        let result = engine.process_query("киа").await.unwrap();
        assert_eq!(result.cars.len(), 3);
        assert_eq!(result.cars[0].id, 0);
    }

    #[tokio::test]
    async fn test_inventory_failure_propagates() {
        let engine = RecommendationEngine::new(ParameterExtractor::default(), Arc::new(FailingInventory));
        let err = engine.process_query("седан").await.unwrap_err();
        assert!(matches!(err, InventoryError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_with_in_memory_inventory() {
        let inventory = InMemoryInventory::new(vec![
            create_car(1, "Toyota", 2020, Some(203)),
            create_car(2, "BMW", 2020, Some(340)),
        ]);
        let engine = RecommendationEngine::new(ParameterExtractor::default(), Arc::new(inventory));

        let result = engine.process_query("бмв 2020 года").await.unwrap();
        assert_eq!(result.cars.len(), 1);
        assert_eq!(result.cars[0].make, "BMW");
        assert!(result.response.contains("**BMW Model 2**"));
    }
}
