//! Match, Scores, MatchStatus and the optional bookkeeping block attached to a match.

use crate::models::participant::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Match id of the championship match.
pub const FINAL_MATCH_ID: &str = "final";

/// Unique key of a match within a tournament (`r{round}p{position}` or `final`).
pub type MatchId = String;

/// Lifecycle of a single match.
///
/// The bracket engine only ever moves a match along `pending -> in_progress -> completed`
/// (or straight to `completed` for byes). `cancelled` and `disputed` are set by admins.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Disputed,
}

/// Which slot of a match a player occupies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Slot {
    Player1,
    Player2,
}

impl Slot {
    /// Slot a winner fills in the next round: odd positions feed `player1`, even feed `player2`.
    pub fn for_position(position: u32) -> Self {
        if position % 2 == 1 {
            Slot::Player1
        } else {
            Slot::Player2
        }
    }

    pub fn other(self) -> Self {
        match self {
            Slot::Player1 => Slot::Player2,
            Slot::Player2 => Slot::Player1,
        }
    }

    /// Position of the match in the previous round that feeds this slot of `position`.
    pub fn feeder_position(self, position: u32) -> u32 {
        match self {
            Slot::Player1 => position * 2 - 1,
            Slot::Player2 => position * 2,
        }
    }
}

/// Game scores of both players.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub player1: u32,
    pub player2: u32,
}

/// A score submission from a player or organiser.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultReport {
    pub reporter: UserId,
    pub scores: Scores,
    pub reported_at: DateTime<Utc>,
}

/// Bookkeeping owned by collaborators outside the bracket engine (chat threads, reports,
/// admin decisions). Flattened into the match JSON; empty fields are omitted.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    /// Games needed per match in this round (from the tournament's round formats).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_of: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub result_reports: Vec<ResultReport>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub admin_resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<UserId>,
}

/// One node of the single-elimination tree.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub match_id: MatchId,
    pub round: u32,
    pub position: u32,
    /// None means bye or not yet determined.
    pub player1: Option<UserId>,
    pub player2: Option<UserId>,
    #[serde(default)]
    pub scores: Scores,
    #[serde(default)]
    pub status: MatchStatus,
    /// Set only when `status` is `completed`.
    pub winner: Option<UserId>,
    /// Match the winner feeds into; None for the final.
    pub next_match_id: Option<MatchId>,
    #[serde(default)]
    pub is_bye: bool,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub metadata: MatchMetadata,
}

impl Match {
    /// Empty pending match at `(round, position)`; `total_rounds` decides whether it is the final.
    pub fn new(round: u32, position: u32, total_rounds: u32) -> Self {
        let next_match_id = if round >= total_rounds {
            None
        } else {
            Some(match_id_for(round + 1, position.div_ceil(2), total_rounds))
        };
        Self {
            match_id: match_id_for(round, position, total_rounds),
            round,
            position,
            player1: None,
            player2: None,
            scores: Scores::default(),
            status: MatchStatus::Pending,
            winner: None,
            next_match_id,
            is_bye: false,
            completed_at: None,
            metadata: MatchMetadata::default(),
        }
    }

    pub fn player(&self, slot: Slot) -> Option<&UserId> {
        match slot {
            Slot::Player1 => self.player1.as_ref(),
            Slot::Player2 => self.player2.as_ref(),
        }
    }

    pub fn set_player(&mut self, slot: Slot, user_id: UserId) {
        match slot {
            Slot::Player1 => self.player1 = Some(user_id),
            Slot::Player2 => self.player2 = Some(user_id),
        }
    }

    /// Both slots are filled.
    pub fn has_both_players(&self) -> bool {
        self.player1.is_some() && self.player2.is_some()
    }

    /// The single occupied slot, if exactly one is filled.
    pub fn lone_player(&self) -> Option<(Slot, &UserId)> {
        match (&self.player1, &self.player2) {
            (Some(p), None) => Some((Slot::Player1, p)),
            (None, Some(p)) => Some((Slot::Player2, p)),
            _ => None,
        }
    }

    /// The player who did not win, once the match is decided.
    pub fn loser(&self) -> Option<&UserId> {
        let winner = self.winner.as_ref()?;
        [&self.player1, &self.player2]
            .into_iter()
            .flatten()
            .find(|p| *p != winner)
    }

    pub fn is_final(&self) -> bool {
        self.next_match_id.is_none()
    }

    /// Mark as completed with `winner`, stamping the completion time.
    pub fn complete(&mut self, winner: UserId, at: DateTime<Utc>) {
        self.winner = Some(winner);
        self.status = MatchStatus::Completed;
        self.completed_at = Some(at);
    }
}

/// Deterministic match id: `final` for the last round, `r{round}p{position}` otherwise.
pub fn match_id_for(round: u32, position: u32, total_rounds: u32) -> MatchId {
    if round == total_rounds {
        FINAL_MATCH_ID.to_string()
    } else {
        format!("r{round}p{position}")
    }
}
