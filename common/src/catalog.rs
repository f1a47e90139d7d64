use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Starting stock for every fruit in the default catalog.
pub const DEFAULT_STARTING_COUNT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown fruit '{0}'")]
    UnknownFruit(String),
}

/// Starting stock and unit price for one fruit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub count: i64,
    pub price: f64,
}

/// The fixed set of sellable fruits.
///
/// Built once at startup and shared read-only for the life of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: BTreeMap<String, CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse a catalog from a JSON object of `fruit -> {count, price}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Unit price for a fruit. There is no fallback price.
    pub fn price(&self, fruit: &str) -> Result<f64, CatalogError> {
        self.entries
            .get(fruit)
            .map(|entry| entry.price)
            .ok_or_else(|| CatalogError::UnknownFruit(fruit.to_string()))
    }

    pub fn get(&self, fruit: &str) -> Option<&CatalogEntry> {
        self.entries.get(fruit)
    }

    pub fn contains(&self, fruit: &str) -> bool {
        self.entries.contains_key(fruit)
    }

    pub fn fruits(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    /// apple, banana, pear and orange, 100 of each.
    fn default() -> Self {
        let entries = [("apple", 2.0), ("banana", 1.5), ("pear", 2.3), ("orange", 1.8)]
            .into_iter()
            .map(|(fruit, price)| {
                (
                    fruit.to_string(),
                    CatalogEntry {
                        count: DEFAULT_STARTING_COUNT,
                        price,
                    },
                )
            })
            .collect();
        Self { entries }
    }
}
