//! Participant and ParticipantStatus.

use serde::{Deserialize, Serialize};

/// Opaque user identifier (e.g. a Discord snowflake), unique within a tournament.
pub type UserId = String;

/// Where a participant stands in the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    #[default]
    Registered,
    Eliminated,
    Winner,
}

/// A registered entrant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: UserId,
    /// Placement order, 1-based. Lower seeds fill earlier bracket positions.
    pub seed: u32,
    #[serde(default)]
    pub status: ParticipantStatus,
}

impl Participant {
    pub fn new(user_id: impl Into<UserId>, seed: u32) -> Self {
        Self {
            user_id: user_id.into(),
            seed,
            status: ParticipantStatus::Registered,
        }
    }

    /// Mark the participant as knocked out.
    pub fn eliminate(&mut self) {
        self.status = ParticipantStatus::Eliminated;
    }

    /// Mark the participant as the tournament champion.
    pub fn crown(&mut self) {
        self.status = ParticipantStatus::Winner;
    }
}
