//! Bye propagation: push decided winners forward and auto-resolve matches that can never get
//! an opponent.

use crate::models::{Match, MatchStatus, Slot};
use chrono::Utc;
use std::collections::{HashMap, VecDeque};

/// Lookup of matches by id and by `(round, position)`, as indices into the match slice.
pub(crate) struct BracketIndex {
    by_id: HashMap<String, usize>,
    by_place: HashMap<(u32, u32), usize>,
}

impl BracketIndex {
    pub(crate) fn new(matches: &[Match]) -> Self {
        let mut by_id = HashMap::with_capacity(matches.len());
        let mut by_place = HashMap::with_capacity(matches.len());
        for (i, m) in matches.iter().enumerate() {
            by_id.insert(m.match_id.clone(), i);
            by_place.insert((m.round, m.position), i);
        }
        Self { by_id, by_place }
    }

    pub(crate) fn by_id(&self, match_id: &str) -> Option<usize> {
        self.by_id.get(match_id).copied()
    }

    pub(crate) fn at(&self, round: u32, position: u32) -> Option<usize> {
        self.by_place.get(&(round, position)).copied()
    }

    /// Whether the match at `(round, position)` has produced or can still produce a winner.
    ///
    /// A match with any player always ends with a winner (played or bye). An empty round-1
    /// match never does. An empty later match depends on its two feeders.
    fn can_produce_winner(&self, matches: &[Match], round: u32, position: u32) -> bool {
        let Some(idx) = self.at(round, position) else {
            return false;
        };
        let m = &matches[idx];
        if m.winner.is_some() || m.player1.is_some() || m.player2.is_some() {
            return true;
        }
        if round <= 1 {
            return false;
        }
        [Slot::Player1, Slot::Player2]
            .into_iter()
            .any(|slot| self.can_produce_winner(matches, round - 1, slot.feeder_position(position)))
    }
}

/// Place the winner of `matches[source]` into its next match.
///
/// Returns the index of the target match, or None when there is nothing to advance
/// (no winner yet, or the source is the final).
pub(crate) fn advance_winner(matches: &mut [Match], index: &BracketIndex, source: usize) -> Option<usize> {
    let src = &matches[source];
    let winner = src.winner.clone()?;
    let target = index.by_id(src.next_match_id.as_deref()?)?;
    let slot = Slot::for_position(src.position);
    if matches[target].player(slot) != Some(&winner) {
        matches[target].set_player(slot, winner);
    }
    let t = &mut matches[target];
    if t.status == MatchStatus::Pending && t.has_both_players() {
        t.status = MatchStatus::InProgress;
    }
    Some(target)
}

/// Push every decided winner forward and auto-resolve matches whose other slot can never be
/// filled, cascading toward the final. Running it again on a consistent bracket changes nothing.
pub fn propagate_byes(matches: &mut [Match]) {
    let index = BracketIndex::new(matches);
    let mut queue: VecDeque<usize> = (0..matches.len())
        .filter(|&i| matches[i].winner.is_some() && matches[i].next_match_id.is_some())
        .collect();

    while let Some(source) = queue.pop_front() {
        let Some(target) = advance_winner(matches, &index, source) else {
            continue;
        };
        let t = &matches[target];
        if t.status != MatchStatus::Pending {
            continue;
        }
        let Some((slot, player)) = t.lone_player() else {
            continue;
        };
        let empty_feeder = slot.other().feeder_position(t.position);
        if index.can_produce_winner(matches, t.round - 1, empty_feeder) {
            continue;
        }
        let player = player.clone();
        log::debug!("Auto-advancing {} through bye in {}", player, t.match_id);
        let t = &mut matches[target];
        t.complete(player, Utc::now());
        t.is_bye = true;
        if t.next_match_id.is_some() {
            queue.push_back(target);
        }
    }
}
