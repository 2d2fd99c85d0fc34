//! Match results: record scores, decide winners, advance them one round.

use crate::logic::propagation::{advance_winner, BracketIndex};
use crate::models::{
    Match, MatchStatus, ResultReport, Scores, TournamentError, UserId,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Scores as submitted, before validation. Signed so that negative input can be rejected
/// with a proper error instead of a parse failure.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReportedScores {
    pub player1: i64,
    pub player2: i64,
}

impl ReportedScores {
    pub fn new(player1: i64, player2: i64) -> Self {
        Self { player1, player2 }
    }

    fn validate(self) -> Result<Scores, TournamentError> {
        let convert = |v: i64| u32::try_from(v).map_err(|_| TournamentError::InvalidScores);
        Ok(Scores {
            player1: convert(self.player1)?,
            player2: convert(self.player2)?,
        })
    }
}

/// A result submission for one match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub scores: ReportedScores,
    /// Overrides the score-based winner when set.
    #[serde(default)]
    pub winner: Option<UserId>,
    /// `in_progress` records scores only; `completed` (or absent) finishes the match when a
    /// winner can be determined.
    #[serde(default)]
    pub status: Option<MatchStatus>,
    #[serde(default)]
    pub reporter: Option<UserId>,
}

impl MatchResult {
    pub fn from_scores(player1: i64, player2: i64) -> Self {
        Self {
            scores: ReportedScores::new(player1, player2),
            ..Self::default()
        }
    }
}

/// Apply `result` to the match `match_id` and return the updated bracket.
///
/// The input is left untouched, so an error never leaves a half-applied result behind.
/// A completed match advances its winner exactly one round; the next match goes
/// `in_progress` once both of its players are known. Equal scores without an explicit winner
/// keep the match `in_progress` with no winner.
pub fn update_match(
    matches: &[Match],
    match_id: &str,
    result: &MatchResult,
) -> Result<Vec<Match>, TournamentError> {
    let index = BracketIndex::new(matches);
    let idx = index
        .by_id(match_id)
        .ok_or_else(|| TournamentError::MatchNotFound(match_id.to_string()))?;
    let scores = result.scores.validate()?;
    let finish = match result.status {
        None | Some(MatchStatus::Completed) => true,
        Some(MatchStatus::InProgress) => false,
        Some(_) => return Err(TournamentError::InvalidResultStatus),
    };

    let m = &matches[idx];
    ensure_playable(m, &[MatchStatus::Pending, MatchStatus::InProgress])?;
    let winner = match &result.winner {
        Some(w) => Some(checked_winner(m, w)?),
        None => winner_from_scores(m, scores),
    };

    let mut updated = matches.to_vec();
    let m = &mut updated[idx];
    m.scores = scores;
    if let Some(reporter) = &result.reporter {
        m.metadata.result_reports.push(ResultReport {
            reporter: reporter.clone(),
            scores,
            reported_at: Utc::now(),
        });
    }
    match winner.filter(|_| finish) {
        Some(w) => {
            m.complete(w, Utc::now());
            advance_winner(&mut updated, &index, idx);
        }
        None => m.status = MatchStatus::InProgress,
    }
    Ok(updated)
}

/// Complete a match by organiser decision (ties, disputes, no-shows) and advance the winner.
/// Scores are kept as reported.
pub fn resolve_match(
    matches: &[Match],
    match_id: &str,
    winner: &str,
    resolved_by: &str,
) -> Result<Vec<Match>, TournamentError> {
    let index = BracketIndex::new(matches);
    let idx = index
        .by_id(match_id)
        .ok_or_else(|| TournamentError::MatchNotFound(match_id.to_string()))?;
    let m = &matches[idx];
    ensure_playable(
        m,
        &[MatchStatus::Pending, MatchStatus::InProgress, MatchStatus::Disputed],
    )?;
    let winner = checked_winner(m, winner)?;

    let mut updated = matches.to_vec();
    let m = &mut updated[idx];
    m.metadata.admin_resolved = true;
    m.metadata.resolved_by = Some(resolved_by.to_string());
    m.complete(winner, Utc::now());
    advance_winner(&mut updated, &index, idx);
    Ok(updated)
}

/// The champion: winner of the highest-round match, once it is completed.
pub fn champion(matches: &[Match]) -> Option<&UserId> {
    let last = matches.iter().max_by_key(|m| m.round)?;
    if last.status == MatchStatus::Completed {
        last.winner.as_ref()
    } else {
        None
    }
}

/// Whether `match_id` is the highest-round match of the bracket.
pub fn is_final_match(matches: &[Match], match_id: &str) -> bool {
    let max_round = matches.iter().map(|m| m.round).max();
    matches
        .iter()
        .any(|m| m.match_id == match_id && Some(m.round) == max_round)
}

fn ensure_playable(m: &Match, allowed: &[MatchStatus]) -> Result<(), TournamentError> {
    if m.status == MatchStatus::Completed {
        return Err(TournamentError::MatchAlreadyCompleted(m.match_id.clone()));
    }
    if !allowed.contains(&m.status) || !m.has_both_players() {
        return Err(TournamentError::MatchNotReady(m.match_id.clone()));
    }
    Ok(())
}

fn checked_winner(m: &Match, winner: &str) -> Result<UserId, TournamentError> {
    if m.player1.as_deref() == Some(winner) || m.player2.as_deref() == Some(winner) {
        Ok(winner.to_string())
    } else {
        Err(TournamentError::WinnerNotInMatch {
            match_id: m.match_id.clone(),
            winner: winner.to_string(),
        })
    }
}

fn winner_from_scores(m: &Match, scores: Scores) -> Option<UserId> {
    use std::cmp::Ordering::*;
    match scores.player1.cmp(&scores.player2) {
        Greater => m.player1.clone(),
        Less => m.player2.clone(),
        Equal => None,
    }
}
