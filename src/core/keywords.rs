use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a keyword dictionary from disk
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("Failed to read dictionary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dictionary format: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Canonical value together with the surface forms that trigger it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet {
    pub value: String,
    pub triggers: Vec<String>,
}

impl KeywordSet {
    pub fn new(value: &str, triggers: &[&str]) -> Self {
        Self {
            value: value.to_string(),
            triggers: triggers.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// True if any trigger is a substring of the (already lower-cased) text
    #[inline]
    pub fn matches(&self, lowered: &str) -> bool {
        self.triggers.iter().any(|t| lowered.contains(t.as_str()))
    }
}

/// Keyword dictionary for the categorical car attributes.
///
/// Each category is an ordered list. The extractor walks it front to back and
/// lets later matches overwrite earlier ones, so declaration order decides
/// which value wins when a query hits triggers of several values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordDictionary {
    pub body_type: Vec<KeywordSet>,
    pub fuel_type: Vec<KeywordSet>,
    pub transmission: Vec<KeywordSet>,
    pub make: Vec<KeywordSet>,
}

impl KeywordDictionary {
    /// Load a dictionary from a TOML file.
    ///
    /// Triggers are lower-cased on load so matching stays case-insensitive.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, DictionaryError> {
        let mut dictionary: Self = toml::from_str(raw)?;
        for set in dictionary.categories_mut() {
            for trigger in set.triggers.iter_mut() {
                *trigger = trigger.to_lowercase();
            }
        }
        Ok(dictionary)
    }

    fn categories_mut(&mut self) -> impl Iterator<Item = &mut KeywordSet> {
        self.body_type
            .iter_mut()
            .chain(self.fuel_type.iter_mut())
            .chain(self.transmission.iter_mut())
            .chain(self.make.iter_mut())
    }
}

impl Default for KeywordDictionary {
    /// Built-in Russian/Latin dictionary
    fn default() -> Self {
        Self {
            body_type: vec![
                KeywordSet::new("sedan", &["седан", "седане", "купе"]),
                KeywordSet::new(
                    "suv",
                    &["внедорожник", "внедорожнике", "джип", "паркетник", "кроссовер", "кроссовере"],
                ),
                KeywordSet::new("hatchback", &["хэтчбек", "хетчбек", "универсал", "минивен"]),
                KeywordSet::new("truck", &["пикап", "грузовик", "трак"]),
            ],
            fuel_type: vec![
                KeywordSet::new("gasoline", &["бензин", "бензиновый", "октан"]),
                KeywordSet::new("diesel", &["дизель", "дизельный", "турбодизель"]),
                KeywordSet::new("hybrid", &["гибрид", "гибридный", "электрогибрид"]),
                KeywordSet::new(
                    "electric",
                    &["электро", "электромобиль", "электрокар", "ev", "electric"],
                ),
            ],
            transmission: vec![
                KeywordSet::new("automatic", &["автомат", "автоматическая", "автоматик", "ат"]),
                KeywordSet::new("manual", &["механика", "механическая", "ручная", "мт"]),
                KeywordSet::new("cvt", &["вариатор", "cvt", "вариаторная"]),
            ],
            make: vec![
                KeywordSet::new("Toyota", &["тойота", "toyota", "камри", "рав4", "ленд крузер"]),
                KeywordSet::new("BMW", &["бмв", "bmw", "бавария"]),
                KeywordSet::new("Mercedes", &["мерседес", "мерс", "benz", "клс", "е класс"]),
                // "сivic" starts with a Cyrillic "с", kept as users type it
                KeywordSet::new("Honda", &["хонда", "honda", "сivic", "cr-v"]),
                KeywordSet::new("Kia", &["киа", "kia", "спортейдж", "керато"]),
                KeywordSet::new("Hyundai", &["хендай", "hyundai", "туссан", "соната"]),
                KeywordSet::new("Marussia", &["маруся", "marussia", "б2"]),
                KeywordSet::new("Koenigsegg", &["кенигсегг", "koenigsegg", "cc850"]),
            ],
        }
    }
}
