//! Tournament, TournamentStatus and TournamentError.

use crate::models::bracket_match::{Match, MatchId};
use crate::models::participant::{Participant, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Broad class of a failure, used by callers to pick a response (400 / 404 / 409).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
}

/// Errors that can occur during tournament and bracket operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// A bracket needs at least two participants.
    NotEnoughParticipants { count: usize },
    /// Seeds must be positive.
    InvalidSeed(u32),
    /// Two participants share a seed.
    DuplicateSeed(u32),
    /// The user is already registered.
    DuplicateParticipant(UserId),
    /// Registration is capped and the cap is reached.
    TournamentFull { max: usize },
    /// Reported scores are not usable (negative or out of range).
    InvalidScores,
    /// Requested match status cannot be assigned through a result report.
    InvalidResultStatus,
    /// The named winner is not playing in this match.
    WinnerNotInMatch { match_id: MatchId, winner: UserId },
    /// No match with this id.
    MatchNotFound(MatchId),
    /// No participant with this user id.
    ParticipantNotFound(UserId),
    /// The match is missing a player or is held by an admin state.
    MatchNotReady(MatchId),
    /// The match already has a result.
    MatchAlreadyCompleted(MatchId),
    /// The final has not been decided yet.
    BracketIncomplete,
    /// Tournament is not in a state that allows this action.
    InvalidState,
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            NotEnoughParticipants { .. }
            | InvalidSeed(_)
            | DuplicateSeed(_)
            | InvalidScores
            | InvalidResultStatus
            | WinnerNotInMatch { .. } => ErrorKind::Validation,
            MatchNotFound(_) | ParticipantNotFound(_) => ErrorKind::NotFound,
            DuplicateParticipant(_)
            | TournamentFull { .. }
            | MatchNotReady(_)
            | MatchAlreadyCompleted(_)
            | BracketIncomplete
            | InvalidState => ErrorKind::Conflict,
        }
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::NotEnoughParticipants { count } => {
                write!(f, "Need at least 2 participants to build a bracket (have {})", count)
            }
            TournamentError::InvalidSeed(seed) => write!(f, "Seed {} is not a positive number", seed),
            TournamentError::DuplicateSeed(seed) => write!(f, "Seed {} is used more than once", seed),
            TournamentError::DuplicateParticipant(id) => write!(f, "User {} is already registered", id),
            TournamentError::TournamentFull { max } => {
                write!(f, "Tournament is full ({} participants)", max)
            }
            TournamentError::InvalidScores => write!(f, "Scores must be non-negative numbers"),
            TournamentError::InvalidResultStatus => {
                write!(f, "A result can only mark a match in progress or completed")
            }
            TournamentError::WinnerNotInMatch { match_id, winner } => {
                write!(f, "{} is not playing in match {}", winner, match_id)
            }
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::ParticipantNotFound(id) => write!(f, "Participant {} not found", id),
            TournamentError::MatchNotReady(id) => {
                write!(f, "Match {} is not ready to accept a result", id)
            }
            TournamentError::MatchAlreadyCompleted(id) => {
                write!(f, "Match {} already has a result", id)
            }
            TournamentError::BracketIncomplete => write!(f, "The final has not been decided yet"),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Created, not yet announced.
    #[default]
    Draft,
    /// Open for sign-ups.
    Registration,
    /// Bracket generated; participants and seeds are frozen.
    RegistrationClosed,
    /// Match results are accepted.
    InProgress,
    /// Champion decided.
    Completed,
    Cancelled,
}

impl TournamentStatus {
    /// Participants may still join, leave or be re-seeded.
    pub fn accepts_registrations(self) -> bool {
        matches!(self, TournamentStatus::Draft | TournamentStatus::Registration)
    }
}

/// A tournament: participants, bracket and phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub participants: Vec<Participant>,
    /// Full bracket, empty until generated.
    pub matches: Vec<Match>,
    pub max_participants: Option<usize>,
    /// Best-of per round, copied onto matches at generation.
    #[serde(default)]
    pub round_formats: BTreeMap<u32, u32>,
    /// Champion, once the final is completed.
    pub winner: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Tournament {
    /// Create a new tournament in Draft with no participants.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: TournamentStatus::Draft,
            participants: Vec::new(),
            matches: Vec::new(),
            max_participants: None,
            round_formats: BTreeMap::new(),
            winner: None,
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
        }
    }

    pub fn with_max_participants(mut self, max: usize) -> Self {
        self.max_participants = Some(max);
        self
    }

    pub fn with_round_formats(mut self, round_formats: BTreeMap<u32, u32>) -> Self {
        self.round_formats = round_formats;
        self
    }

    pub fn participant(&self, user_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    pub fn participant_mut(&mut self, user_id: &str) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.user_id == user_id)
    }

    pub fn get_match(&self, match_id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.match_id == match_id)
    }

    /// Open sign-ups (Draft only).
    pub fn open_registration(&mut self) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Draft {
            return Err(TournamentError::InvalidState);
        }
        self.status = TournamentStatus::Registration;
        Ok(())
    }

    /// Register a user (Draft or Registration). The new participant takes the next seed.
    pub fn register_participant(&mut self, user_id: impl Into<UserId>) -> Result<(), TournamentError> {
        if !self.status.accepts_registrations() {
            return Err(TournamentError::InvalidState);
        }
        let user_id = user_id.into();
        if self.participant(&user_id).is_some() {
            return Err(TournamentError::DuplicateParticipant(user_id));
        }
        if let Some(max) = self.max_participants {
            if self.participants.len() >= max {
                return Err(TournamentError::TournamentFull { max });
            }
        }
        let seed = self.participants.len() as u32 + 1;
        self.participants.push(Participant::new(user_id, seed));
        Ok(())
    }

    /// Withdraw a user (Draft or Registration). Remaining seeds are renumbered 1..N in order.
    pub fn withdraw_participant(&mut self, user_id: &str) -> Result<(), TournamentError> {
        if !self.status.accepts_registrations() {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .participants
            .iter()
            .position(|p| p.user_id == user_id)
            .ok_or_else(|| TournamentError::ParticipantNotFound(user_id.to_string()))?;
        self.participants.remove(idx);
        self.renumber_seeds();
        Ok(())
    }

    /// Reassign seeds 1..N contiguously, keeping the current seed order.
    pub(crate) fn renumber_seeds(&mut self) {
        self.participants.sort_by_key(|p| p.seed);
        for (i, p) in self.participants.iter_mut().enumerate() {
            p.seed = i as u32 + 1;
        }
    }

    /// Abandon the tournament (any state except Completed).
    pub fn cancel(&mut self) -> Result<(), TournamentError> {
        if matches!(self.status, TournamentStatus::Completed | TournamentStatus::Cancelled) {
            return Err(TournamentError::InvalidState);
        }
        self.status = TournamentStatus::Cancelled;
        self.ended_at = Some(Utc::now());
        Ok(())
    }
}
