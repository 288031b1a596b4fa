//! Line Items
//!
//! `RawItem` is what extraction produces after sanitization;
//! `LineItem` is the ledger's owned form with identity and the
//! assignment relation attached.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One extracted `{name, price}` record, already normalized
/// (non-empty name, finite non-negative price)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub name: String,
    pub price: f64,
}

impl RawItem {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// A purchased good/service on the bill
///
/// `assigned_to` holds the ids of every participant sharing the item;
/// an empty set means the item is still unassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: u32,
    pub name: String,
    pub price: f64,
    pub assigned_to: BTreeSet<u32>,
}

impl LineItem {
    /// Build a ledger item from an extraction record
    pub fn from_raw(id: u32, raw: RawItem) -> Self {
        Self {
            id,
            name: raw.name,
            price: raw.price,
            assigned_to: BTreeSet::new(),
        }
    }

    pub fn is_assigned(&self) -> bool {
        !self.assigned_to.is_empty()
    }

    /// Per-assignee share; the full price while unassigned
    pub fn share(&self) -> f64 {
        if self.assigned_to.is_empty() {
            self.price
        } else {
            self.price / self.assigned_to.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_starts_unassigned() {
        let item = LineItem::from_raw(0, RawItem::new("Pizza", 12.0));
        assert_eq!(item.id, 0);
        assert_eq!(item.name, "Pizza");
        assert!(!item.is_assigned());
        assert_eq!(item.share(), 12.0);
    }

    #[test]
    fn test_share_divides_evenly() {
        let mut item = LineItem::from_raw(1, RawItem::new("Soda", 3.0));
        item.assigned_to.insert(1);
        item.assigned_to.insert(2);
        assert_eq!(item.share(), 1.5);
    }
}
