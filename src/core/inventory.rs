use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::core::filters::{matches_inventory_filter, InventoryFilter};
use crate::models::Car;

/// Failures of the inventory lookup.
///
/// These are the only errors the recommendation engine propagates, so callers
/// can tell "nothing matched" apart from "lookup failed".
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Inventory service unavailable: {0}")]
    Unavailable(String),

    #[error("Inventory query failed: {0}")]
    QueryFailed(String),
}

/// Car inventory query capability
#[async_trait]
pub trait CarInventory: Send + Sync {
    /// Return up to `filter.limit` cars matching the filter, most recent first
    async fn find_cars(&self, filter: &InventoryFilter) -> Result<Vec<Car>, InventoryError>;
}

/// Inventory backed by a vector, used for development and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    cars: Arc<RwLock<Vec<Car>>>,
}

impl InMemoryInventory {
    pub fn new(cars: Vec<Car>) -> Self {
        Self {
            cars: Arc::new(RwLock::new(cars)),
        }
    }

    pub async fn insert(&self, car: Car) {
        self.cars.write().await.push(car);
    }

    pub async fn len(&self) -> usize {
        self.cars.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cars.read().await.is_empty()
    }
}

#[async_trait]
impl CarInventory for InMemoryInventory {
    async fn find_cars(&self, filter: &InventoryFilter) -> Result<Vec<Car>, InventoryError> {
        let cars = self.cars.read().await;
        let mut found: Vec<Car> = cars
            .iter()
            .filter(|car| matches_inventory_filter(car, filter))
            .cloned()
            .collect();

        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        found.truncate(filter.limit);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn create_test_car(id: i64, make: &str, age_days: i64) -> Car {
        let created = Utc::now() - Duration::days(age_days);
        Car {
            id,
            make: make.to_string(),
            model: format!("Model {}", id),
            year: 2022,
            body_type: "suv".to_string(),
            fuel_type: "gasoline".to_string(),
            transmission: "automatic".to_string(),
            engine_size: None,
            horsepower: None,
            price: None,
            description: None,
            features: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn test_most_recent_first() {
        let inventory = InMemoryInventory::new(vec![
            create_test_car(1, "Kia", 10),
            create_test_car(2, "Kia", 1),
            create_test_car(3, "Kia", 5),
        ]);

        let filter = InventoryFilter { limit: 2, ..Default::default() };
        let cars = inventory.find_cars(&filter).await.unwrap();

        let ids: Vec<i64> = cars.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_filters_applied() {
        let inventory = InMemoryInventory::default();
        inventory.insert(create_test_car(1, "Kia", 1)).await;
        inventory.insert(create_test_car(2, "Toyota", 2)).await;
        assert_eq!(inventory.len().await, 2);

        let filter = InventoryFilter {
            make: Some("toyota".to_string()),
            limit: 10,
            ..Default::default()
        };
        let cars = inventory.find_cars(&filter).await.unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].make, "Toyota");
    }
}
