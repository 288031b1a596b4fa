//! Assignment & Settlement Engine
//!
//! `BillLedger` owns the canonical in-memory state of one bill: the
//! extracted items, the participants, and the many-to-many assignment
//! relation between them. Mutations are synchronous and atomic from
//! the caller's perspective; derived totals are recomputed on demand
//! by the split calculator.
//!
//! ## Invariants
//!
//! - item ids unique within the live item set, never reused
//! - participant ids unique, assigned `max + 1`, never reused in-session
//! - every assignment set only references live participants (removal
//!   cascades)
//! - at least one participant always exists

mod split;

pub use split::{Totals, compute_totals};

use serde::{Deserialize, Serialize};

use crate::constants::labels::SEED_PARTICIPANTS;
use crate::types::{LineItem, Participant, RawItem};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillLedger {
    items: Vec<LineItem>,
    participants: Vec<Participant>,
}

impl Default for BillLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl BillLedger {
    /// Fresh ledger with the default participant pair and no items
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            participants: seed_participants(),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, id: u32) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Whether the ledger is still awaiting its first extraction
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current settlement, recomputed in full
    pub fn totals(&self) -> Totals {
        compute_totals(&self.items, &self.participants)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace the item list with a fresh extraction result.
    ///
    /// Items get sequential ids from 0 in input order with empty
    /// assignment sets; participants are untouched.
    pub fn initialize(&mut self, raw_items: Vec<RawItem>) {
        self.items = raw_items
            .into_iter()
            .enumerate()
            .map(|(idx, raw)| LineItem::from_raw(idx as u32, raw))
            .collect();
    }

    /// Add a participant, returning its id.
    ///
    /// Ids are `max(existing) + 1`, so removing anyone but the highest
    /// id never frees that id for reuse.
    pub fn add_participant(&mut self, name: Option<&str>) -> u32 {
        let id = self
            .participants
            .iter()
            .map(|p| p.id)
            .max()
            .map_or(1, |max| max + 1);

        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => Participant::default_name(id),
        };

        self.participants.push(Participant::new(id, name));
        id
    }

    /// Rename a participant. Blank names are rejected and the previous
    /// name is retained; returns whether the rename was applied.
    pub fn rename_participant(&mut self, id: u32, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }

        match self.participants.iter_mut().find(|p| p.id == id) {
            Some(p) => {
                p.name = trimmed.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove a participant and strip its id from every assignment.
    ///
    /// The last remaining participant cannot be removed (no-op
    /// returning false), so the ledger never ends up with nobody to
    /// split against.
    pub fn remove_participant(&mut self, id: u32) -> bool {
        if self.participants.len() <= 1 {
            return false;
        }

        let before = self.participants.len();
        self.participants.retain(|p| p.id != id);
        if self.participants.len() == before {
            return false;
        }

        for item in &mut self.items {
            item.assigned_to.remove(&id);
        }

        true
    }

    /// Replace one item's assignment set wholesale.
    ///
    /// Ids are de-duplicated and ids not naming a live participant are
    /// discarded, preserving the subset invariant. An unknown item id
    /// is a no-op returning false.
    pub fn set_assignment(&mut self, item_id: u32, participant_ids: &[u32]) -> bool {
        let live: std::collections::BTreeSet<u32> =
            self.participants.iter().map(|p| p.id).collect();

        match self.items.iter_mut().find(|i| i.id == item_id) {
            Some(item) => {
                item.assigned_to = participant_ids
                    .iter()
                    .copied()
                    .filter(|pid| live.contains(pid))
                    .collect();
                true
            }
            None => false,
        }
    }

    /// Start a new receipt: clear items and re-seed the participant
    /// list to the default pair.
    pub fn reset(&mut self) {
        self.items.clear();
        self.participants = seed_participants();
    }
}

fn seed_participants() -> Vec<Participant> {
    SEED_PARTICIPANTS
        .iter()
        .enumerate()
        .map(|(idx, name)| Participant::new(idx as u32 + 1, *name))
        .collect()
}
