//! Participants
//!
//! A participant is one person among whom the bill is split.
//! Ids are assigned `max(existing) + 1` by the ledger and never
//! reused within a session.

use serde::{Deserialize, Serialize};

use crate::constants::labels::PARTICIPANT_PREFIX;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: u32,
    pub name: String,
}

impl Participant {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Auto-generated label for participants added without a name
    pub fn default_name(id: u32) -> String {
        format!("{} {}", PARTICIPANT_PREFIX, id)
    }
}
