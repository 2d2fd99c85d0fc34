//! Setup phase: seeding, bracket generation, and the transition to play.

use crate::logic::generation::generate_bracket;
use crate::models::{Tournament, TournamentError, TournamentStatus};
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

/// Randomly re-assign seeds 1..N (Draft or Registration only).
pub fn shuffle_seeds<R: Rng + ?Sized>(tournament: &mut Tournament, rng: &mut R) -> Result<(), TournamentError> {
    if !tournament.status.accepts_registrations() {
        return Err(TournamentError::InvalidState);
    }
    let mut seeds: Vec<u32> = (1..=tournament.participants.len() as u32).collect();
    seeds.shuffle(rng);
    for (p, seed) in tournament.participants.iter_mut().zip(seeds) {
        p.seed = seed;
    }
    tournament.participants.sort_by_key(|p| p.seed);
    Ok(())
}

/// Build the bracket from the current participants and close registration.
///
/// On error the tournament is left exactly as it was.
pub fn generate_tournament_bracket(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if !tournament.status.accepts_registrations() {
        return Err(TournamentError::InvalidState);
    }
    let matches = generate_bracket(&tournament.participants, Some(&tournament.round_formats))?;
    log::info!(
        "Tournament {}: bracket generated with {} matches for {} participants",
        tournament.id,
        matches.len(),
        tournament.participants.len()
    );
    tournament.matches = matches;
    tournament.status = TournamentStatus::RegistrationClosed;
    Ok(())
}

/// Start accepting match results (RegistrationClosed -> InProgress).
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::RegistrationClosed {
        return Err(TournamentError::InvalidState);
    }
    tournament.status = TournamentStatus::InProgress;
    tournament.started_at = Some(Utc::now());
    log::info!("Tournament {} started", tournament.id);
    Ok(())
}
