//! Bracket generation: build the single-elimination tree, seed round 1, hand out byes.

use crate::logic::propagation::propagate_byes;
use crate::models::{Match, Participant, TournamentError};
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};

/// Number of rounds needed for `participant_count` entrants: `ceil(log2(n))`.
pub fn rounds_for(participant_count: usize) -> u32 {
    participant_count.next_power_of_two().trailing_zeros()
}

/// Number of round-1 matches that receive a single player.
pub fn byes_for(participant_count: usize) -> usize {
    participant_count.next_power_of_two() - participant_count
}

/// Generate the full bracket for `participants`.
///
/// 1. Validate: at least two participants, positive and unique seeds.
/// 2. Build every match from round 1 to the final, each pointing at `ceil(position / 2)`
///    of the next round.
/// 3. Walk participants by ascending seed: the first `byes` round-1 positions get one player
///    and complete immediately as byes, the rest get two consecutive players.
/// 4. Propagate byes upward.
///
/// `round_formats` maps a round number to its best-of count and is copied onto each match.
/// Matches come back ordered by `(round, position)`.
pub fn generate_bracket(
    participants: &[Participant],
    round_formats: Option<&BTreeMap<u32, u32>>,
) -> Result<Vec<Match>, TournamentError> {
    validate_participants(participants)?;

    let n = participants.len();
    let num_rounds = rounds_for(n);
    let first_round_matches = 1usize << (num_rounds - 1);
    let byes = byes_for(n);

    let mut matches = Vec::with_capacity(first_round_matches * 2 - 1);
    for round in 1..=num_rounds {
        let matches_in_round = 1u32 << (num_rounds - round);
        let best_of = round_formats.and_then(|f| f.get(&round)).copied();
        for position in 1..=matches_in_round {
            let mut m = Match::new(round, position, num_rounds);
            m.metadata.best_of = best_of;
            matches.push(m);
        }
    }

    let mut seeded: Vec<&Participant> = participants.iter().collect();
    seeded.sort_by_key(|p| p.seed);
    let mut seeded = seeded.into_iter().map(|p| p.user_id.clone());

    let now = Utc::now();
    // Round 1 occupies the first `first_round_matches` entries, in position order.
    for (idx, m) in matches.iter_mut().take(first_round_matches).enumerate() {
        m.player1 = seeded.next();
        if idx < byes {
            if let Some(p) = m.player1.clone() {
                m.complete(p, now);
                m.is_bye = true;
            }
        } else {
            m.player2 = seeded.next();
        }
    }

    propagate_byes(&mut matches);
    log::debug!(
        "Generated bracket: {} participants, {} rounds, {} byes",
        n,
        num_rounds,
        byes
    );
    Ok(matches)
}

fn validate_participants(participants: &[Participant]) -> Result<(), TournamentError> {
    if participants.len() < 2 {
        return Err(TournamentError::NotEnoughParticipants {
            count: participants.len(),
        });
    }
    let mut seeds = HashSet::with_capacity(participants.len());
    let mut users = HashSet::with_capacity(participants.len());
    for p in participants {
        if p.seed == 0 {
            return Err(TournamentError::InvalidSeed(p.seed));
        }
        if !seeds.insert(p.seed) {
            return Err(TournamentError::DuplicateSeed(p.seed));
        }
        if !users.insert(p.user_id.as_str()) {
            return Err(TournamentError::DuplicateParticipant(p.user_id.clone()));
        }
    }
    Ok(())
}
