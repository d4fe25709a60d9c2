use super::*;
use crate::test_support::competitors;

fn schedule(names: &[&str]) -> Vec<MatchPairing> {
    round_robin(&competitors(names))
}

#[test]
fn strict_majority_decides() {
    assert_eq!(Winner::decide(2.0, 1.0), Winner::Home);
    assert_eq!(Winner::decide(0.0, 3.0), Winner::Away);
    assert_eq!(Winner::decide(1.0, 1.0), Winner::Draw);
    assert_eq!(Winner::decide(0.0, 0.0), Winner::Draw);
}

#[test]
fn decisive_scores_favour_the_winner() {
    let p = schedule(&["a", "b"]);
    let pairing = &p[0];
    for (home, away) in [(3.0, 1.0), (0.0, 2.0), (1.0, 1.0), (0.0, 0.0)] {
        let outcome = MatchOutcome::decided(pairing, home, away);
        match outcome.winner {
            Winner::Home => assert!(home > away),
            Winner::Away => assert!(away > home),
            Winner::Draw => assert_eq!(home, away),
            Winner::Error => panic!("decided outcome marked as error"),
        }
    }
}

#[test]
fn labels() {
    let p = schedule(&["x", "y"]);
    let pairing = &p[0];

    let won = MatchOutcome::decided(pairing, 2.0, 1.0);
    assert_eq!(won.winner_label(), "x");
    assert_eq!(won.score_label(), "2-1");
    assert_eq!(won.summary_line(), "x 2 - 1 y | Winner: x");

    let drawn = MatchOutcome::decided(pairing, 1.0, 1.0);
    assert_eq!(drawn.winner_label(), "Draw");
    assert!(drawn.winning_competitor().is_none());

    let failed = MatchOutcome::failed(pairing, "simulator crashed");
    assert_eq!(failed.winner_label(), "ERROR");
    assert_eq!(failed.score_label(), "simulator crashed");
    assert_eq!(
        failed.summary_line(),
        "x vs y | simulator crashed | Winner: ERROR"
    );
    assert!(failed.winning_competitor().is_none());
}

#[test]
fn zero_win_competitors_are_absent() {
    let p = schedule(&["x", "y", "z"]);
    let outcomes = vec![
        MatchOutcome::decided(&p[0], 2.0, 1.0),
        MatchOutcome::failed(&p[1], "boom"),
        MatchOutcome::decided(&p[2], 1.0, 1.0),
    ];

    let table = WinTable::aggregate(&outcomes);
    assert_eq!(table.get("x"), Some(1));
    assert_eq!(table.get("y"), None);
    assert_eq!(table.get("z"), None);
    assert_eq!(table.len(), 1);
}

#[test]
fn total_wins_equal_decisive_outcomes() {
    let p = schedule(&["a", "b", "c", "d"]);
    let scores = [(1.0, 0.0), (0.0, 2.0), (3.0, 3.0), (1.0, 4.0), (2.0, 0.0)];
    let mut outcomes: Vec<MatchOutcome> = p
        .iter()
        .zip(scores)
        .map(|(pairing, (h, a))| MatchOutcome::decided(pairing, h, a))
        .collect();
    outcomes.push(MatchOutcome::failed(&p[5], NOT_AVAILABLE));

    let decisive = outcomes
        .iter()
        .filter(|o| !matches!(o.winner, Winner::Draw | Winner::Error))
        .count();
    let table = WinTable::aggregate(&outcomes);
    assert_eq!(table.total() as usize, decisive);

    // Anyone missing from the table never won
    for outcome in &outcomes {
        if let Some(winner) = outcome.winning_competitor() {
            assert!(table.get(&winner.name).is_some());
        }
    }
}

#[test]
fn aggregation_is_idempotent() {
    let p = schedule(&["a", "b", "c"]);
    let outcomes = vec![
        MatchOutcome::decided(&p[0], 0.0, 1.0),
        MatchOutcome::decided(&p[1], 2.0, 0.0),
        MatchOutcome::decided(&p[2], 5.0, 1.0),
    ];
    assert_eq!(WinTable::aggregate(&outcomes), WinTable::aggregate(&outcomes));
}

#[test]
fn ranking_is_descending_and_stable() {
    let p = schedule(&["a", "b", "c", "d"]);
    // b beats a, c beats a, d beats a, b beats c, d beats b, c beats d
    let outcomes = vec![
        MatchOutcome::decided(&p[0], 0.0, 1.0),
        MatchOutcome::decided(&p[1], 0.0, 1.0),
        MatchOutcome::decided(&p[2], 0.0, 1.0),
        MatchOutcome::decided(&p[3], 1.0, 0.0),
        MatchOutcome::decided(&p[4], 0.0, 1.0),
        MatchOutcome::decided(&p[5], 1.0, 0.0),
    ];

    let table = WinTable::aggregate(&outcomes);
    let order: Vec<&str> = table.iter().map(|(n, _)| n).collect();
    assert_eq!(order, vec!["b", "c", "d"]);
    // Everyone but `a` has two wins; ties keep first-win order
    assert_eq!(table.ranking(), vec![("b", 2), ("c", 2), ("d", 2)]);

    let lopsided = WinTable::aggregate(&outcomes[..3]);
    assert_eq!(lopsided.ranking(), vec![("b", 1), ("c", 1), ("d", 1)]);
}

#[test]
fn report_roundtrip_and_text() {
    let tmp = tempfile::tempdir().unwrap();
    let p = schedule(&["x", "y", "z"]);
    let mut report = TournamentReport::new(
        "unit",
        competitors(&["x", "y", "z"]),
        TournamentConfig::default(),
    );
    report.add_outcome(MatchOutcome::decided(&p[0], 2.0, 1.0));
    report.add_outcome(MatchOutcome::decided(&p[1], 0.0, 0.0));
    report.add_outcome(MatchOutcome::failed(&p[2], "rollout failed"));

    let path = tmp.path().join("results.json");
    report.save(&path).unwrap();
    let loaded = TournamentReport::load(&path).unwrap();
    assert_eq!(loaded.outcomes, report.outcomes);
    assert_eq!(loaded.competitors, report.competitors);
    assert_eq!(loaded.error_count(), 1);

    let text = loaded.generate_report();
    assert!(text.contains("TOURNAMENT RESULTS"));
    assert!(text.contains("Win Counts:"));
    assert!(text.contains("  x: 1 wins"));
    assert!(text.contains("rollout failed"));
    assert!(!text.contains("  y:"));
}

#[test]
fn loading_garbage_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("results.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        TournamentReport::load(&path),
        Err(ReportError::Json(_))
    ));
    assert!(matches!(
        TournamentReport::load(&tmp.path().join("missing.json")),
        Err(ReportError::Io(_))
    ));
}
