// Integration tests for the recommendation engine

use async_trait::async_trait;
use car_advisor::core::{
    CarInventory, InMemoryInventory, InventoryError, InventoryFilter, KeywordDictionary,
    ParameterExtractor, RecommendationEngine,
};
use car_advisor::models::Car;
use chrono::{Duration, Utc};
use std::sync::{Arc, Mutex};

const NO_RESULTS: &str = "К сожалению, я не нашел автомобилей";
const ONLY_ONE: &str = "Это единственный автомобиль, соответствующий вашему запросу. ";
const CHOOSE_ONE: &str = "Выберите понравившийся вариант, и я могу рассказать о нем подробнее.";

#[allow(clippy::too_many_arguments)]
fn create_test_car(
    id: i64,
    make: &str,
    model: &str,
    year: i32,
    body_type: &str,
    fuel_type: &str,
    horsepower: Option<i32>,
    price: Option<f64>,
) -> Car {
    // Higher ids are newer
    let created = Utc::now() - Duration::hours(100 - id);
    Car {
        id,
        make: make.to_string(),
        model: model.to_string(),
        year,
        body_type: body_type.to_string(),
        fuel_type: fuel_type.to_string(),
        transmission: "automatic".to_string(),
        engine_size: Some(2.0),
        horsepower,
        price,
        description: Some(format!("{} {} в отличном состоянии", make, model)),
        features: None,
        created_at: created,
        updated_at: created,
    }
}

fn sample_inventory() -> Vec<Car> {
    vec![
        create_test_car(1, "Toyota", "Camry", 2022, "sedan", "gasoline", Some(203), Some(2_800_000.0)),
        create_test_car(2, "Toyota", "RAV4", 2023, "suv", "hybrid", Some(219), Some(3_200_000.0)),
        create_test_car(3, "BMW", "X5", 2023, "suv", "diesel", Some(340), Some(6_500_000.0)),
        create_test_car(4, "Kia", "Cerato", 2022, "sedan", "gasoline", Some(123), Some(1_800_000.0)),
        create_test_car(5, "Hyundai", "Solaris", 2021, "sedan", "gasoline", None, Some(1_200_000.0)),
        create_test_car(6, "Mercedes-Benz", "GLC", 2020, "suv", "gasoline", Some(258), None),
    ]
}

fn engine_with(cars: Vec<Car>) -> RecommendationEngine {
    RecommendationEngine::new(
        ParameterExtractor::new(KeywordDictionary::default()),
        Arc::new(InMemoryInventory::new(cars)),
    )
}

/// Records the filters it is asked for and returns a fixed list
struct RecordingInventory {
    cars: Vec<Car>,
    seen: Mutex<Vec<InventoryFilter>>,
}

#[async_trait]
impl CarInventory for RecordingInventory {
    async fn find_cars(&self, filter: &InventoryFilter) -> Result<Vec<Car>, InventoryError> {
        self.seen.lock().unwrap().push(filter.clone());
        Ok(self.cars.clone())
    }
}

struct UnavailableInventory;

#[async_trait]
impl CarInventory for UnavailableInventory {
    async fn find_cars(&self, _filter: &InventoryFilter) -> Result<Vec<Car>, InventoryError> {
        Err(InventoryError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_end_to_end_single_match() {
    let engine = engine_with(sample_inventory());

    let result = engine.process_query("Хочу седан toyota").await.unwrap();

    assert_eq!(result.cars.len(), 1);
    assert_eq!(result.cars[0].model, "Camry");
    assert!(result.response.contains("**Toyota Camry** (2022 г.)"));
    assert!(result.response.contains("Цена: 2,800,000 руб."));
    assert!(result.response.ends_with(ONLY_ONE));
}

#[tokio::test]
async fn test_end_to_end_multiple_matches_newest_first() {
    let engine = engine_with(sample_inventory());

    let result = engine.process_query("нужен внедорожник").await.unwrap();

    let ids: Vec<i64> = result.cars.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![6, 3, 2]);
    assert!(result.response.starts_with("Я нашел 3 автомобиль(ей)"));
    assert!(result.response.ends_with(CHOOSE_ONE));
}

#[tokio::test]
async fn test_no_matches_renders_fixed_reply() {
    let engine = engine_with(sample_inventory());

    let result = engine.process_query("ищу электромобиль").await.unwrap();

    assert!(result.cars.is_empty());
    assert!(result.response.starts_with(NO_RESULTS));
}

#[tokio::test]
async fn test_unrecognized_query_returns_inventory_defaults() {
    let engine = engine_with(sample_inventory()).with_limit(2);

    let result = engine.process_query("привет").await.unwrap();

    // Nothing extracted, so the two newest cars come back and are rendered
    let ids: Vec<i64> = result.cars.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![6, 5]);
    assert!(result.response.ends_with(CHOOSE_ONE));

    let empty = engine_with(Vec::new());
    let result = empty.process_query("привет").await.unwrap();
    assert!(result.response.starts_with(NO_RESULTS));
}

#[tokio::test]
async fn test_price_ceiling_filters_inventory() {
    let engine = engine_with(sample_inventory());

    let result = engine.process_query("седан до 2 млн").await.unwrap();

    let ids: Vec<i64> = result.cars.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![5, 4]);
}

#[tokio::test]
async fn test_exact_year_includes_following_year() {
    let engine = engine_with(sample_inventory());

    let result = engine.process_query("машина 2022 года").await.unwrap();

    let mut years: Vec<i32> = result.cars.iter().map(|c| c.year).collect();
    years.sort_unstable();
    assert_eq!(years, vec![2022, 2022, 2023, 2023]);
}

#[tokio::test]
async fn test_horsepower_floor_drops_unknown_and_weaker_cars() {
    let recording = Arc::new(RecordingInventory {
        cars: vec![
            create_test_car(1, "Kia", "Rio", 2020, "sedan", "gasoline", None, None),
            create_test_car(2, "Kia", "K5", 2021, "sedan", "gasoline", Some(150), None),
            create_test_car(3, "BMW", "M3", 2022, "sedan", "gasoline", Some(300), None),
            create_test_car(4, "BMW", "M5", 2023, "sedan", "gasoline", Some(200), None),
            create_test_car(5, "Lada", "Vesta", 2023, "sedan", "gasoline", None, None),
        ],
        seen: Mutex::new(Vec::new()),
    });
    let engine = RecommendationEngine::new(ParameterExtractor::default(), recording.clone());

    let result = engine.process_query("мощнее 200 лс").await.unwrap();

    let ids: Vec<i64> = result.cars.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![3, 4]);

    let seen = recording.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].limit, 10);
    assert_eq!(seen[0], InventoryFilter { limit: 10, ..Default::default() });
}

#[tokio::test]
async fn test_inventory_failure_is_propagated() {
    let engine = RecommendationEngine::new(
        ParameterExtractor::default(),
        Arc::new(UnavailableInventory),
    );

    let err = engine.process_query("седан").await.unwrap_err();
    assert!(matches!(err, InventoryError::Unavailable(_)));
}

#[tokio::test]
async fn test_result_limit_is_respected() {
    let cars: Vec<Car> = (1..=20)
        .map(|i| create_test_car(i, "Kia", "Rio", 2020, "sedan", "gasoline", Some(100), None))
        .collect();
    let engine = engine_with(cars);

    let result = engine.process_query("седан").await.unwrap();

    assert_eq!(result.cars.len(), 5);
    assert_eq!(result.cars[0].id, 20);
}
