use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Remaining stock and unit price for one fruit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockLevel {
    /// May be negative when purchases exceed the starting count.
    pub count: i64,
    pub price: f64,
}

/// Total purchased quantity for one fruit across the whole ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FruitTotal {
    pub fruit: String,
    pub quantity: i64,
}

/// Point-in-time view of stock: catalog starting counts minus ledger totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventorySnapshot {
    levels: BTreeMap<String, StockLevel>,
}

impl InventorySnapshot {
    /// Every catalog fruit at its starting count.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let levels = catalog
            .iter()
            .map(|(fruit, entry)| {
                (
                    fruit.to_string(),
                    StockLevel {
                        count: entry.count,
                        price: entry.price,
                    },
                )
            })
            .collect();
        Self { levels }
    }

    /// Subtract aggregated purchase totals. Totals for fruits not in the
    /// snapshot are left out and returned so the caller can report them.
    pub fn apply_purchases<I>(&mut self, totals: I) -> Vec<FruitTotal>
    where
        I: IntoIterator<Item = FruitTotal>,
    {
        let mut skipped = Vec::new();
        for total in totals {
            match self.levels.get_mut(&total.fruit) {
                Some(level) => level.count -= total.quantity,
                None => skipped.push(total),
            }
        }
        skipped
    }

    pub fn get(&self, fruit: &str) -> Option<&StockLevel> {
        self.levels.get(fruit)
    }

    pub fn count(&self, fruit: &str) -> Option<i64> {
        self.levels.get(fruit).map(|l| l.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StockLevel)> {
        self.levels.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub(crate) fn get_mut(&mut self, fruit: &str) -> Option<&mut StockLevel> {
        self.levels.get_mut(fruit)
    }
}
