//! Data structures for single-elimination tournaments: participants, matches, tournament state.

mod bracket_match;
mod participant;
mod tournament;

pub use bracket_match::{
    match_id_for, Match, MatchId, MatchMetadata, MatchStatus, ResultReport, Scores, Slot,
    FINAL_MATCH_ID,
};
pub use participant::{Participant, ParticipantStatus, UserId};
pub use tournament::{ErrorKind, Tournament, TournamentError, TournamentId, TournamentStatus};
