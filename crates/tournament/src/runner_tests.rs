use super::*;
use crate::test_support::{CountingEnv, Reply, StubLoader, StubRollout};

fn models(names: &[&str]) -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    for name in names {
        std::fs::create_dir_all(tmp.path().join("models").join(name)).unwrap();
    }
    tmp
}

fn config(tmp: &tempfile::TempDir) -> TournamentConfig {
    TournamentConfig {
        name: "test".to_string(),
        models_dir: tmp.path().join("models"),
        output_dir: tmp.path().join("logs"),
        render: false,
        verbose: false,
        ..Default::default()
    }
}

#[test]
fn three_competitor_scenario() {
    let tmp = models(&["z", "x", "y"]);
    let loader = StubLoader::default();
    let rollout = StubRollout::new()
        .reply("x", "y", Reply::Score(2.0, 1.0))
        .reply("x", "z", Reply::Fail("rollout exploded".into()))
        .reply("y", "z", Reply::Score(1.0, 1.0));
    let mut env = CountingEnv::default();

    let report = Tournament::new(config(&tmp), &loader, &rollout, &mut env)
        .run()
        .unwrap();

    let pairs: Vec<(&str, &str)> = report
        .outcomes
        .iter()
        .map(|o| (o.pairing.home.name.as_str(), o.pairing.away.name.as_str()))
        .collect();
    assert_eq!(pairs, vec![("x", "y"), ("x", "z"), ("y", "z")]);

    let winners: Vec<Winner> = report.outcomes.iter().map(|o| o.winner).collect();
    assert_eq!(winners, vec![Winner::Home, Winner::Error, Winner::Draw]);
    assert_eq!(report.outcomes[1].score_label(), "rollout exploded");

    let wins = report.win_table();
    assert_eq!(wins.get("x"), Some(1));
    assert_eq!(wins.get("y"), None);
    assert_eq!(wins.get("z"), None);
    assert_eq!(report.error_count(), 1);
    assert!(tmp.path().join("logs").is_dir());
}

#[test]
fn one_broken_artifact_only_costs_its_matches() {
    let tmp = models(&["a", "b", "c", "bad"]);
    let loader = StubLoader::with_broken(&["bad"]);
    let rollout = StubRollout::new()
        .reply("a", "b", Reply::Score(1.0, 0.0))
        .reply("a", "c", Reply::Score(1.0, 0.0))
        .reply("b", "c", Reply::Score(1.0, 0.0));
    let mut env = CountingEnv::default();

    let report = Tournament::new(config(&tmp), &loader, &rollout, &mut env)
        .run()
        .unwrap();

    assert_eq!(report.outcomes.len(), match_count(4));
    assert_eq!(report.error_count(), 3);
    assert_eq!(rollout.calls.get(), 3);
    assert_eq!(report.win_table().ranking(), vec![("a", 2), ("b", 1)]);
    for outcome in report.outcomes.iter().filter(|o| o.winner == Winner::Error) {
        assert!(outcome.pairing.home.name == "bad" || outcome.pairing.away.name == "bad");
        assert_eq!(outcome.score_label(), NOT_AVAILABLE);
    }
}

#[test]
fn missing_models_dir_aborts() {
    let tmp = tempfile::tempdir().unwrap();
    let loader = StubLoader::default();
    let rollout = StubRollout::new();
    let mut env = CountingEnv::default();

    let err = Tournament::new(config(&tmp), &loader, &rollout, &mut env)
        .run()
        .unwrap_err();

    assert!(matches!(
        err,
        TournamentError::Registry(RegistryError::NotFound(_))
    ));
    assert_eq!(rollout.calls.get(), 0);
}

#[test]
fn empty_models_dir_runs_nothing() {
    let tmp = models(&[]);
    std::fs::create_dir_all(tmp.path().join("models")).unwrap();
    let loader = StubLoader::default();
    let rollout = StubRollout::new();
    let mut env = CountingEnv::default();

    let report = Tournament::new(config(&tmp), &loader, &rollout, &mut env)
        .run()
        .unwrap();
    assert!(report.outcomes.is_empty());
    assert!(report.win_table().is_empty());
}
