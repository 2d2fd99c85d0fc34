//! Single-elimination tournament brackets: library with models, bracket engine and lifecycle.

pub mod config;
pub mod logic;
pub mod models;

pub use config::ServerConfig;
pub use logic::{
    byes_for, champion, dispute_match, end_tournament, generate_bracket,
    generate_tournament_bracket, is_final_match, propagate_byes, report_match_result,
    resolve_match, resolve_match_by_admin, rounds_for, shuffle_seeds, start_tournament,
    update_match, MatchResult, ReportedScores,
};
pub use models::{
    match_id_for, ErrorKind, Match, MatchId, MatchMetadata, MatchStatus, Participant,
    ParticipantStatus, ResultReport, Scores, Slot, Tournament, TournamentError, TournamentId,
    TournamentStatus, UserId, FINAL_MATCH_ID,
};
