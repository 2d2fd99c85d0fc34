//! Play phase: match reports, admin decisions, and crowning the champion.

use crate::logic::results::{champion, is_final_match, resolve_match, update_match, MatchResult};
use crate::models::{Match, MatchStatus, Tournament, TournamentError, TournamentStatus};
use chrono::Utc;

/// Record a result for one match (InProgress only).
///
/// A completed match eliminates its loser. When the final completes, the tournament becomes
/// Completed and the champion's participant status becomes `winner`.
pub fn report_match_result(
    tournament: &mut Tournament,
    match_id: &str,
    result: &MatchResult,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::InProgress {
        return Err(TournamentError::InvalidState);
    }
    let matches = update_match(&tournament.matches, match_id, result)?;
    apply_updated_bracket(tournament, matches, match_id);
    Ok(())
}

/// Decide a match by organiser ruling (e.g. after a tie or a dispute) (InProgress only).
pub fn resolve_match_by_admin(
    tournament: &mut Tournament,
    match_id: &str,
    winner: &str,
    resolved_by: &str,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::InProgress {
        return Err(TournamentError::InvalidState);
    }
    let matches = resolve_match(&tournament.matches, match_id, winner, resolved_by)?;
    log::info!(
        "Tournament {}: match {} resolved for {} by {}",
        tournament.id,
        match_id,
        winner,
        resolved_by
    );
    apply_updated_bracket(tournament, matches, match_id);
    Ok(())
}

/// Put an open match on hold as disputed (InProgress only). Only an admin ruling completes it.
pub fn dispute_match(tournament: &mut Tournament, match_id: &str) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::InProgress {
        return Err(TournamentError::InvalidState);
    }
    let m = tournament
        .matches
        .iter_mut()
        .find(|m| m.match_id == match_id)
        .ok_or_else(|| TournamentError::MatchNotFound(match_id.to_string()))?;
    match m.status {
        MatchStatus::Pending | MatchStatus::InProgress => {
            m.status = MatchStatus::Disputed;
            Ok(())
        }
        MatchStatus::Completed => Err(TournamentError::MatchAlreadyCompleted(m.match_id.clone())),
        MatchStatus::Cancelled | MatchStatus::Disputed => {
            Err(TournamentError::MatchNotReady(m.match_id.clone()))
        }
    }
}

/// Finish the tournament once the final has a winner (InProgress only).
pub fn end_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::InProgress {
        return Err(TournamentError::InvalidState);
    }
    if champion(&tournament.matches).is_none() {
        return Err(TournamentError::BracketIncomplete);
    }
    crown_champion(tournament);
    Ok(())
}

/// Store the new bracket and apply its effects on participants and the tournament.
fn apply_updated_bracket(tournament: &mut Tournament, matches: Vec<Match>, match_id: &str) {
    tournament.matches = matches;
    let Some(m) = tournament.get_match(match_id) else {
        return;
    };
    if m.status != MatchStatus::Completed {
        return;
    }
    if let Some(loser) = m.loser().cloned() {
        if let Some(p) = tournament.participant_mut(&loser) {
            p.eliminate();
        }
    }
    if is_final_match(&tournament.matches, match_id) {
        crown_champion(tournament);
    }
}

fn crown_champion(tournament: &mut Tournament) {
    let Some(winner) = champion(&tournament.matches).cloned() else {
        return;
    };
    if let Some(p) = tournament.participant_mut(&winner) {
        p.crown();
    }
    log::info!("Tournament {} completed, champion {}", tournament.id, winner);
    tournament.winner = Some(winner);
    tournament.status = TournamentStatus::Completed;
    tournament.ended_at = Some(Utc::now());
}
