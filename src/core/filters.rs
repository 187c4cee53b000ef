use serde::{Deserialize, Serialize};

use crate::core::extractor::ExtractedParameters;
use crate::models::Car;

/// Filter set understood by the inventory.
///
/// Any subset of the optional fields may be set, including none at all, in
/// which case the inventory returns its most recent cars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryFilter {
    pub make: Option<String>,
    pub body_type: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub limit: usize,
}

/// Filters the inventory cannot express and that run in-process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub min_horsepower: Option<i32>,
}

/// Translate extracted parameters into the inventory vocabulary.
///
/// An exact `year` becomes the range `[year, year + 1]`. `min_horsepower` is
/// moved to the in-process [`PostFilter`] and an exact `horsepower` is not
/// used. The inventory is asked for twice the result limit so the post
/// filter still has enough candidates left.
pub fn translate(params: &ExtractedParameters, limit: usize) -> (InventoryFilter, PostFilter) {
    let mut filter = InventoryFilter {
        make: params.make.clone(),
        body_type: params.body_type.clone(),
        fuel_type: params.fuel_type.clone(),
        transmission: params.transmission.clone(),
        min_year: params.min_year,
        max_year: params.max_year,
        min_price: params.min_price,
        max_price: params.max_price,
        limit: limit.saturating_mul(2),
    };

    if let Some(year) = params.year {
        filter.min_year = Some(year);
        filter.max_year = Some(year.saturating_add(1));
    }

    let post = PostFilter {
        min_horsepower: params.min_horsepower,
    };

    (filter, post)
}

/// Check a car against the in-process filters.
///
/// Cars with unknown horsepower never satisfy a horsepower floor.
#[inline]
pub fn passes_post_filter(car: &Car, post: &PostFilter) -> bool {
    match post.min_horsepower {
        Some(min_hp) => matches!(car.horsepower, Some(hp) if hp >= min_hp),
        None => true,
    }
}

/// Check a car against the inventory filter.
///
/// Mirrors the semantics of the SQL inventory: `make` is a case-insensitive
/// substring match, everything else is exact or inclusive, and a price bound
/// rejects cars without a price.
pub fn matches_inventory_filter(car: &Car, filter: &InventoryFilter) -> bool {
    if let Some(make) = &filter.make {
        if !car.make.to_lowercase().contains(&make.to_lowercase()) {
            return false;
        }
    }

    let exact: [(Option<&str>, &str); 3] = [
        (filter.body_type.as_deref(), car.body_type.as_str()),
        (filter.fuel_type.as_deref(), car.fuel_type.as_str()),
        (filter.transmission.as_deref(), car.transmission.as_str()),
    ];
    if exact
        .iter()
        .any(|&(wanted, actual)| wanted.is_some_and(|w| w != actual))
    {
        return false;
    }

    if filter.min_year.is_some_and(|min| car.year < min)
        || filter.max_year.is_some_and(|max| car.year > max)
    {
        return false;
    }

    if filter.min_price.is_some() || filter.max_price.is_some() {
        let Some(price) = car.price else {
            return false;
        };
        if filter.min_price.is_some_and(|min| price < min as f64)
            || filter.max_price.is_some_and(|max| price > max as f64)
        {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_car(make: &str, year: i32, horsepower: Option<i32>, price: Option<f64>) -> Car {
        Car {
            id: 1,
            make: make.to_string(),
            model: "Model".to_string(),
            year,
            body_type: "sedan".to_string(),
            fuel_type: "gasoline".to_string(),
            transmission: "automatic".to_string(),
            engine_size: Some(2.0),
            horsepower,
            price,
            description: None,
            features: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_translate_passthrough() {
        let params = ExtractedParameters {
            make: Some("BMW".to_string()),
            body_type: Some("suv".to_string()),
            fuel_type: Some("diesel".to_string()),
            transmission: Some("automatic".to_string()),
            min_year: Some(2019),
            max_price: Some(5_000_000),
            ..Default::default()
        };

        let (filter, post) = translate(&params, 5);

        assert_eq!(filter.make.as_deref(), Some("BMW"));
        assert_eq!(filter.body_type.as_deref(), Some("suv"));
        assert_eq!(filter.fuel_type.as_deref(), Some("diesel"));
        assert_eq!(filter.transmission.as_deref(), Some("automatic"));
        assert_eq!(filter.min_year, Some(2019));
        assert_eq!(filter.max_year, None);
        assert_eq!(filter.max_price, Some(5_000_000));
        assert_eq!(filter.limit, 10);
        assert_eq!(post, PostFilter::default());
    }

    #[test]
    fn test_translate_exact_year_expands() {
        let params = ExtractedParameters {
            year: Some(2020),
            ..Default::default()
        };
        let (filter, _) = translate(&params, 5);
        assert_eq!(filter.min_year, Some(2020));
        assert_eq!(filter.max_year, Some(2021));
    }

    #[test]
    fn test_translate_horsepower_handling() {
        let params = ExtractedParameters {
            horsepower: Some(150),
            ..Default::default()
        };
        let (filter, post) = translate(&params, 5);
        assert_eq!(filter, InventoryFilter { limit: 10, ..Default::default() });
        assert_eq!(post.min_horsepower, None);

        let params = ExtractedParameters {
            min_horsepower: Some(300),
            ..Default::default()
        };
        let (_, post) = translate(&params, 5);
        assert_eq!(post.min_horsepower, Some(300));
    }

    #[test]
    fn test_post_filter_drops_missing_horsepower() {
        let post = PostFilter { min_horsepower: Some(200) };
        assert!(passes_post_filter(&create_test_car("BMW", 2020, Some(250), None), &post));
        assert!(passes_post_filter(&create_test_car("BMW", 2020, Some(200), None), &post));
        assert!(!passes_post_filter(&create_test_car("BMW", 2020, Some(199), None), &post));
        assert!(!passes_post_filter(&create_test_car("BMW", 2020, None, None), &post));
        assert!(passes_post_filter(&create_test_car("BMW", 2020, None, None), &PostFilter::default()));
    }

    #[test]
    fn test_inventory_filter_make_substring() {
        let filter = InventoryFilter {
            make: Some("merc".to_string()),
            ..Default::default()
        };
        assert!(matches_inventory_filter(&create_test_car("Mercedes", 2020, None, None), &filter));
        assert!(!matches_inventory_filter(&create_test_car("BMW", 2020, None, None), &filter));
    }

    #[test]
    fn test_inventory_filter_ranges() {
        let filter = InventoryFilter {
            min_year: Some(2020),
            max_year: Some(2021),
            max_price: Some(3_000_000),
            ..Default::default()
        };
        assert!(matches_inventory_filter(&create_test_car("Kia", 2021, None, Some(2_500_000.0)), &filter));
        assert!(!matches_inventory_filter(&create_test_car("Kia", 2022, None, Some(2_500_000.0)), &filter));
        assert!(!matches_inventory_filter(&create_test_car("Kia", 2020, None, Some(3_500_000.0)), &filter));
        assert!(!matches_inventory_filter(&create_test_car("Kia", 2020, None, None), &filter));
    }
}
