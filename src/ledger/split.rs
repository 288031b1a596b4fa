//! Split Calculator
//!
//! Pure even-split arithmetic over the ledger state. Recomputed in
//! full on every read; item and participant counts are tens, not
//! thousands, so there is no incremental delta maintenance.
//!
//! Amounts accumulate in full f64 precision; rounding to two decimals
//! happens only at presentation time.

use serde::Serialize;
use std::collections::HashMap;

use crate::types::{LineItem, Participant};

/// Derived settlement totals
#[derive(Debug, Clone, Serialize)]
pub struct Totals {
    /// Amount owed per participant id; every live participant is
    /// present, participants with nothing assigned report exactly 0.0
    pub per_person: HashMap<u32, f64>,
    /// Sum of all item prices
    pub grand_total: f64,
    /// Sum of prices of items with an empty assignment set
    pub unassigned_total: f64,
}

impl Totals {
    pub fn owed_by(&self, participant_id: u32) -> f64 {
        self.per_person.get(&participant_id).copied().unwrap_or(0.0)
    }

    /// Whether every item has been assigned to someone
    pub fn fully_assigned(&self) -> bool {
        self.unassigned_total == 0.0
    }
}

/// Compute the settlement for the current items and participants.
///
/// Each assigned item's price divides evenly across its assignees;
/// unassigned items accumulate separately so the caller can surface
/// "falta asignar" state.
pub fn compute_totals(items: &[LineItem], participants: &[Participant]) -> Totals {
    let mut per_person: HashMap<u32, f64> =
        participants.iter().map(|p| (p.id, 0.0)).collect();
    let mut grand_total = 0.0;
    let mut unassigned_total = 0.0;

    for item in items {
        grand_total += item.price;

        if item.assigned_to.is_empty() {
            unassigned_total += item.price;
        } else {
            let share = item.price / item.assigned_to.len() as f64;
            for pid in &item.assigned_to {
                if let Some(owed) = per_person.get_mut(pid) {
                    *owed += share;
                }
            }
        }
    }

    Totals {
        per_person,
        grand_total,
        unassigned_total,
    }
}
