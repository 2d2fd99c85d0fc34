//! Integration tests for the tournament lifecycle around the bracket engine.

use bracket_tournament_web::{
    dispute_match, end_tournament, generate_tournament_bracket, report_match_result,
    resolve_match_by_admin, shuffle_seeds, start_tournament, MatchResult, MatchStatus,
    ParticipantStatus, Tournament, TournamentError, TournamentStatus, FINAL_MATCH_ID,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn tournament_with_participants(n: usize) -> Tournament {
    let mut t = Tournament::new("Weekly Cup");
    t.open_registration().unwrap();
    for i in 1..=n {
        t.register_participant(format!("u{i}")).unwrap();
    }
    t
}

fn started_tournament(n: usize) -> Tournament {
    let mut t = tournament_with_participants(n);
    generate_tournament_bracket(&mut t).unwrap();
    start_tournament(&mut t).unwrap();
    t
}

fn status_of(t: &Tournament, user_id: &str) -> ParticipantStatus {
    t.participant(user_id).unwrap().status
}

#[test]
fn registration_assigns_seeds_in_order() {
    let t = tournament_with_participants(3);
    let seeds: Vec<_> = t.participants.iter().map(|p| (p.user_id.as_str(), p.seed)).collect();
    assert_eq!(seeds, vec![("u1", 1), ("u2", 2), ("u3", 3)]);
}

#[test]
fn registration_rejects_duplicates_and_overflow() {
    let mut t = Tournament::new("Capped").with_max_participants(2);
    t.register_participant("a").unwrap();
    assert_eq!(
        t.register_participant("a"),
        Err(TournamentError::DuplicateParticipant("a".to_string()))
    );
    t.register_participant("b").unwrap();
    assert_eq!(
        t.register_participant("c"),
        Err(TournamentError::TournamentFull { max: 2 })
    );
}

#[test]
fn withdrawal_renumbers_seeds() {
    let mut t = tournament_with_participants(4);
    t.withdraw_participant("u2").unwrap();
    let seeds: Vec<_> = t.participants.iter().map(|p| (p.user_id.as_str(), p.seed)).collect();
    assert_eq!(seeds, vec![("u1", 1), ("u3", 2), ("u4", 3)]);
    assert_eq!(
        t.withdraw_participant("u2"),
        Err(TournamentError::ParticipantNotFound("u2".to_string()))
    );
}

#[test]
fn shuffled_seeds_stay_contiguous() {
    let mut t = tournament_with_participants(9);
    shuffle_seeds(&mut t, &mut StdRng::seed_from_u64(7)).unwrap();
    let mut seeds: Vec<u32> = t.participants.iter().map(|p| p.seed).collect();
    seeds.sort();
    assert_eq!(seeds, (1..=9).collect::<Vec<_>>());
}

#[test]
fn generating_closes_registration() {
    let mut t = tournament_with_participants(5);
    generate_tournament_bracket(&mut t).unwrap();
    assert_eq!(t.status, TournamentStatus::RegistrationClosed);
    assert_eq!(t.matches.len(), 7);
    assert_eq!(t.register_participant("late"), Err(TournamentError::InvalidState));
    assert_eq!(t.withdraw_participant("u1"), Err(TournamentError::InvalidState));
    assert_eq!(generate_tournament_bracket(&mut t), Err(TournamentError::InvalidState));
}

#[test]
fn failed_generation_leaves_tournament_untouched() {
    let mut t = tournament_with_participants(1);
    assert_eq!(
        generate_tournament_bracket(&mut t),
        Err(TournamentError::NotEnoughParticipants { count: 1 })
    );
    assert_eq!(t.status, TournamentStatus::Registration);
    assert!(t.matches.is_empty());
}

#[test]
fn results_need_a_started_tournament() {
    let mut t = tournament_with_participants(2);
    generate_tournament_bracket(&mut t).unwrap();
    assert_eq!(
        report_match_result(&mut t, FINAL_MATCH_ID, &MatchResult::from_scores(2, 0)),
        Err(TournamentError::InvalidState)
    );
    start_tournament(&mut t).unwrap();
    assert!(t.started_at.is_some());
    assert_eq!(start_tournament(&mut t), Err(TournamentError::InvalidState));
}

#[test]
fn two_player_final_completes_tournament() {
    let mut t = started_tournament(2);
    report_match_result(&mut t, FINAL_MATCH_ID, &MatchResult::from_scores(2, 1)).unwrap();

    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.winner.as_deref(), Some("u1"));
    assert!(t.ended_at.is_some());
    assert_eq!(status_of(&t, "u1"), ParticipantStatus::Winner);
    assert_eq!(status_of(&t, "u2"), ParticipantStatus::Eliminated);
}

#[test]
fn five_player_run_to_champion() {
    let mut t = started_tournament(5);
    let results = [
        ("r1p4", 1, 3), // u5 beats u4
        ("r2p1", 0, 2), // u2 beats u1
        ("r2p2", 2, 1), // u3 beats u5
    ];
    for (match_id, s1, s2) in results {
        report_match_result(&mut t, match_id, &MatchResult::from_scores(s1, s2)).unwrap();
        assert_eq!(t.status, TournamentStatus::InProgress);
    }
    let fin = t.get_match(FINAL_MATCH_ID).unwrap();
    assert_eq!(fin.player1.as_deref(), Some("u2"));
    assert_eq!(fin.player2.as_deref(), Some("u3"));
    assert_eq!(fin.status, MatchStatus::InProgress);
    assert_eq!(end_tournament(&mut t), Err(TournamentError::BracketIncomplete));

    report_match_result(&mut t, FINAL_MATCH_ID, &MatchResult::from_scores(1, 4)).unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.winner.as_deref(), Some("u3"));
    assert_eq!(status_of(&t, "u3"), ParticipantStatus::Winner);
    for loser in ["u1", "u2", "u4", "u5"] {
        assert_eq!(status_of(&t, loser), ParticipantStatus::Eliminated, "{loser}");
    }
}

#[test]
fn tie_then_admin_ruling() {
    let mut t = started_tournament(2);
    report_match_result(&mut t, FINAL_MATCH_ID, &MatchResult::from_scores(2, 2)).unwrap();
    assert_eq!(t.status, TournamentStatus::InProgress);
    let fin = t.get_match(FINAL_MATCH_ID).unwrap();
    assert_eq!(fin.status, MatchStatus::InProgress);
    assert!(fin.winner.is_none());

    resolve_match_by_admin(&mut t, FINAL_MATCH_ID, "u2", "admin").unwrap();
    let fin = t.get_match(FINAL_MATCH_ID).unwrap();
    assert!(fin.metadata.admin_resolved);
    assert_eq!(fin.metadata.resolved_by.as_deref(), Some("admin"));
    assert_eq!((fin.scores.player1, fin.scores.player2), (2, 2));
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.winner.as_deref(), Some("u2"));
}

#[test]
fn disputed_match_waits_for_admin() {
    let mut t = started_tournament(4);
    dispute_match(&mut t, "r1p1").unwrap();
    assert_eq!(t.get_match("r1p1").unwrap().status, MatchStatus::Disputed);
    assert_eq!(
        report_match_result(&mut t, "r1p1", &MatchResult::from_scores(2, 0)),
        Err(TournamentError::MatchNotReady("r1p1".to_string()))
    );

    resolve_match_by_admin(&mut t, "r1p1", "u2", "mod").unwrap();
    let fin = t.get_match(FINAL_MATCH_ID).unwrap();
    assert_eq!(fin.player1.as_deref(), Some("u2"));
    assert_eq!(status_of(&t, "u1"), ParticipantStatus::Eliminated);
    assert_eq!(
        dispute_match(&mut t, "r1p1"),
        Err(TournamentError::MatchAlreadyCompleted("r1p1".to_string()))
    );
}

#[test]
fn failed_report_keeps_previous_bracket() {
    let mut t = started_tournament(4);
    let before = t.matches.clone();
    assert_eq!(
        report_match_result(&mut t, "r1p1", &MatchResult::from_scores(2, -1)),
        Err(TournamentError::InvalidScores)
    );
    assert_eq!(t.matches, before);
    assert_eq!(
        report_match_result(&mut t, "nope", &MatchResult::from_scores(2, 1)),
        Err(TournamentError::MatchNotFound("nope".to_string()))
    );
}

#[test]
fn cancel_from_any_open_state() {
    let mut t = started_tournament(3);
    t.cancel().unwrap();
    assert_eq!(t.status, TournamentStatus::Cancelled);
    assert_eq!(t.cancel(), Err(TournamentError::InvalidState));
}

#[test]
fn tournament_json_is_camel_case() {
    let t = started_tournament(2);
    let json = serde_json::to_value(&t).unwrap();
    assert_eq!(json["status"], "in_progress");
    assert_eq!(json["participants"][0]["userId"], "u1");
    assert_eq!(json["participants"][0]["status"], "registered");
    assert_eq!(json["matches"][0]["matchId"], FINAL_MATCH_ID);
}
