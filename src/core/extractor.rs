use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::keywords::{KeywordDictionary, KeywordSet};

/// Amount followed by a currency or magnitude unit: "500 тыс", "1 200 000 руб"
static PRICE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,3}(?:\s*\d{3})*)\s*(?:руб|рублей|тыс|тысяч|млн|миллион)")
        .expect("price pattern is valid")
});

/// Bare 20xx year
static YEAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(20\d{2})\b").expect("year pattern is valid"));

/// Integer followed by a horsepower unit: "250 лс", "300 л.с."
static HORSEPOWER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*(?:л\.с\.|лс|лошадиных)").expect("horsepower pattern is valid")
});

const THOUSAND_UNITS: &[&str] = &["тыс", "тысяч"];
const MILLION_UNITS: &[&str] = &["млн", "миллион"];

const PRICE_CEILING_WORDS: &[&str] = &["до", "менее", "не больше", "бюджет"];
const PRICE_FLOOR_WORDS: &[&str] = &["более", "больше", "от"];

const YEAR_NEWER_WORDS: &[&str] = &["новый", "новее", "свежий"];
const YEAR_OLDER_WORDS: &[&str] = &["старый", "старше"];

const POWER_WORDS: &[&str] = &["мощнее", "мощный", "мощность"];

/// Parameters detected in a free-text query.
///
/// Sparse: a field is `Some` only when the query mentioned it. The paired
/// numeric fields are mutually exclusive per query (one price, one year, one
/// horsepower figure at most).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horsepower: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_horsepower: Option<i32>,
}

impl ExtractedParameters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Rule-based extractor turning chat text into search parameters.
///
/// Pure: holds only the injected dictionary and shares the compiled patterns,
/// so a single instance can serve any number of concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ParameterExtractor {
    dictionary: KeywordDictionary,
}

impl ParameterExtractor {
    pub fn new(dictionary: KeywordDictionary) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &KeywordDictionary {
        &self.dictionary
    }

    /// Extract car parameters from a natural language query.
    ///
    /// Never fails: text without recognizable keywords or numbers yields an
    /// empty set of parameters.
    pub fn extract(&self, query: &str) -> ExtractedParameters {
        let lowered = query.to_lowercase();
        let mut params = ExtractedParameters {
            body_type: last_match(&self.dictionary.body_type, &lowered),
            fuel_type: last_match(&self.dictionary.fuel_type, &lowered),
            transmission: last_match(&self.dictionary.transmission, &lowered),
            make: last_match(&self.dictionary.make, &lowered),
            ..Default::default()
        };

        if let Some(price) = extract_price(&lowered) {
            if contains_any(&lowered, PRICE_CEILING_WORDS) {
                params.max_price = Some(price);
            } else if contains_any(&lowered, PRICE_FLOOR_WORDS) {
                params.min_price = Some(price);
            } else {
                params.max_price = Some(price);
            }
        }

        if let Some(year) = extract_year(&lowered) {
            if contains_any(&lowered, YEAR_NEWER_WORDS) {
                params.min_year = Some(year);
            } else if contains_any(&lowered, YEAR_OLDER_WORDS) {
                params.max_year = Some(year);
            } else {
                params.year = Some(year);
            }
        }

        if let Some(power) = extract_horsepower(&lowered) {
            if contains_any(&lowered, POWER_WORDS) {
                params.min_horsepower = Some(power);
            } else {
                params.horsepower = Some(power);
            }
        }

        tracing::debug!("Extracted parameters from {:?}: {:?}", query, params);
        params
    }
}

/// Walk the category in declared order; every hit overwrites the previous one.
fn last_match(sets: &[KeywordSet], lowered: &str) -> Option<String> {
    let mut found = None;
    for set in sets {
        if set.matches(lowered) {
            found = Some(set.value.clone());
        }
    }
    found
}

#[inline]
fn contains_any(lowered: &str, words: &[&str]) -> bool {
    words.iter().any(|w| lowered.contains(w))
}

/// First amount only. The magnitude is decided by scanning the whole query
/// for a unit word, not just the matched span.
fn extract_price(lowered: &str) -> Option<i64> {
    let captures = PRICE_PATTERN.captures(lowered)?;
    let digits: String = captures[1].chars().filter(|c| !c.is_whitespace()).collect();
    let amount: i64 = digits.parse().ok()?;

    if contains_any(lowered, THOUSAND_UNITS) {
        amount.checked_mul(1_000)
    } else if contains_any(lowered, MILLION_UNITS) {
        amount.checked_mul(1_000_000)
    } else {
        Some(amount)
    }
}

/// First 20xx year only
fn extract_year(lowered: &str) -> Option<i32> {
    let captures = YEAR_PATTERN.captures(lowered)?;
    captures[1].parse().ok()
}

/// First horsepower figure only
fn extract_horsepower(lowered: &str) -> Option<i32> {
    let captures = HORSEPOWER_PATTERN.captures(lowered)?;
    captures[1].parse().ok()
}
