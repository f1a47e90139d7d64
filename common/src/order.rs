use serde::{Deserialize, Serialize};

use crate::inventory::InventorySnapshot;
use crate::purchase::{PurchaseItem, PurchaseRequest};

/// An editable multi-line order as the shopper builds it.
///
/// Lines are sent to the server exactly as entered, including blank or
/// zero-quantity lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBuilder {
    lines: Vec<PurchaseItem>,
}

/// Result of simulating an order against a cached snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPreview {
    pub total: f64,
    /// The snapshot as it would look after the accepted lines.
    pub projected: InventorySnapshot,
    /// Indices of lines that contributed to `total`.
    pub accepted: Vec<usize>,
}

fn blank_line() -> PurchaseItem {
    PurchaseItem {
        fruit: String::new(),
        quantity: 0,
    }
}

impl OrderBuilder {
    /// A builder with one blank line.
    pub fn new() -> Self {
        Self {
            lines: vec![blank_line()],
        }
    }

    pub fn lines(&self) -> &[PurchaseItem] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn add_line(&mut self) {
        self.lines.push(blank_line());
    }

    /// Out-of-range indices are ignored, as are the setters below.
    pub fn remove_line(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    pub fn set_fruit(&mut self, index: usize, fruit: impl Into<String>) {
        if let Some(line) = self.lines.get_mut(index) {
            line.fruit = fruit.into();
        }
    }

    pub fn set_quantity(&mut self, index: usize, quantity: u32) {
        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
    }

    /// Set a quantity from text as typed. An empty field means zero; any
    /// other text that is not a whole number leaves the line unchanged.
    ///
    /// Returns whether the line was updated.
    pub fn set_quantity_input(&mut self, index: usize, input: &str) -> bool {
        let input = input.trim();
        let quantity = if input.is_empty() {
            0
        } else {
            match input.parse::<u32>() {
                Ok(quantity) => quantity,
                Err(_) => return false,
            }
        };
        if index >= self.lines.len() {
            return false;
        }
        self.set_quantity(index, quantity);
        true
    }

    /// Simulate the order against `snapshot` without touching it.
    ///
    /// A line counts when its fruit is in the snapshot, its quantity is
    /// positive, and enough projected stock remains. Each accepted line
    /// reduces the projected stock seen by later lines.
    pub fn preview(&self, snapshot: &InventorySnapshot) -> OrderPreview {
        let mut projected = snapshot.clone();
        let mut total = 0.0;
        let mut accepted = Vec::new();

        for (index, line) in self.lines.iter().enumerate() {
            let quantity = i64::from(line.quantity);
            if let Some(level) = projected.get_mut(&line.fruit) {
                if quantity > 0 && level.count >= quantity {
                    total += level.price * line.quantity as f64;
                    level.count -= quantity;
                    accepted.push(index);
                }
            }
        }

        OrderPreview {
            total,
            projected,
            accepted,
        }
    }

    /// The request body for submission: raw lines plus the client total.
    pub fn to_request(&self, total_price: f64) -> PurchaseRequest {
        PurchaseRequest {
            items: self.lines.clone(),
            total_price,
        }
    }
}

impl Default for OrderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::inventory::FruitTotal;

    fn snapshot() -> InventorySnapshot {
        InventorySnapshot::from_catalog(&Catalog::default())
    }

    fn order(lines: &[(&str, u32)]) -> OrderBuilder {
        let mut builder = OrderBuilder::new();
        builder.remove_line(0);
        for (i, (fruit, qty)) in lines.iter().enumerate() {
            builder.add_line();
            builder.set_fruit(i, *fruit);
            builder.set_quantity(i, *qty);
        }
        builder
    }

    #[test]
    fn test_new_builder_has_one_blank_line() {
        let builder = OrderBuilder::new();
        assert_eq!(builder.lines(), &[blank_line()]);
    }

    #[test]
    fn test_edit_and_remove_lines() {
        let mut builder = OrderBuilder::new();
        builder.add_line();
        builder.add_line();
        builder.set_fruit(1, "pear");
        builder.set_quantity(1, 4);
        builder.remove_line(0);
        assert_eq!(builder.len(), 2);
        assert_eq!(builder.lines()[0].fruit, "pear");
        assert_eq!(builder.lines()[0].quantity, 4);

        // Ignored.
        builder.remove_line(9);
        builder.set_fruit(9, "apple");
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_quantity_input_keeps_last_good_value() {
        let mut builder = order(&[("apple", 7)]);
        for partial in ["-", "7.", "abc", "99999999999"] {
            assert!(!builder.set_quantity_input(0, partial));
            assert_eq!(builder.lines()[0].quantity, 7);
        }

        assert!(builder.set_quantity_input(0, " 12 "));
        assert_eq!(builder.lines()[0].quantity, 12);
        assert!(builder.set_quantity_input(0, ""));
        assert_eq!(builder.lines()[0].quantity, 0);
        assert!(!builder.set_quantity_input(5, "3"));
    }

    #[test]
    fn test_preview_totals_valid_lines() {
        let builder = order(&[("apple", 10), ("banana", 2)]);
        let preview = builder.preview(&snapshot());
        assert_eq!(preview.total, 23.0);
        assert_eq!(preview.accepted, vec![0, 1]);
        assert_eq!(preview.projected.count("apple"), Some(90));
        assert_eq!(preview.projected.count("banana"), Some(98));
    }

    #[test]
    fn test_preview_skips_invalid_lines() {
        let builder = order(&[("", 3), ("kiwi", 1), ("pear", 0), ("orange", 101), ("apple", 1)]);
        let preview = builder.preview(&snapshot());
        assert_eq!(preview.total, 2.0);
        assert_eq!(preview.accepted, vec![4]);
        assert_eq!(preview.projected.count("orange"), Some(100));
    }

    #[test]
    fn test_preview_drains_stock_across_lines() {
        let builder = order(&[("apple", 60), ("apple", 60)]);
        let preview = builder.preview(&snapshot());
        assert_eq!(preview.total, 120.0);
        assert_eq!(preview.accepted, vec![0]);
        assert_eq!(preview.projected.count("apple"), Some(40));
    }

    #[test]
    fn test_preview_leaves_snapshot_untouched() {
        let mut cached = snapshot();
        cached.apply_purchases([FruitTotal {
            fruit: "apple".to_string(),
            quantity: 5,
        }]);
        let before = cached.clone();
        order(&[("apple", 10)]).preview(&cached);
        assert_eq!(cached, before);
    }

    #[test]
    fn test_request_carries_raw_lines() {
        let builder = order(&[("apple", 10), ("kiwi", 0)]);
        let request = builder.to_request(20.0);
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[1].fruit, "kiwi");
        assert_eq!(request.total_price, 20.0);
    }
}
