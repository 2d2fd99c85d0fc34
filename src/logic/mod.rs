//! Bracket engine and tournament business logic: generation, byes, results, lifecycle.

mod generation;
mod propagation;
mod reporting;
mod results;
mod setup;

pub use generation::{byes_for, generate_bracket, rounds_for};
pub use propagation::propagate_byes;
pub use reporting::{dispute_match, end_tournament, report_match_result, resolve_match_by_admin};
pub use results::{
    champion, is_final_match, resolve_match, update_match, MatchResult, ReportedScores,
};
pub use setup::{generate_tournament_bracket, shuffle_seeds, start_tournament};
