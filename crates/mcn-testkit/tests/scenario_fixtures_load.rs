//! Scenario: fixture loaders produce histories the simulator accepts.

use std::io::Write;

use mcn_sim::{simulate, SimulationConfig};
use mcn_testkit::{compounded_closes, flat_closes, load_closes_csv, random_walk_closes};

#[test]
fn shipped_csv_fixture_simulates() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/closes_40d.csv");
    let closes = load_closes_csv(path).unwrap();
    assert_eq!(closes.len(), 40);

    let cfg = SimulationConfig::uniform(2_000, Some(1)).unwrap();
    let (_, summary) = simulate(&closes, &cfg).unwrap();
    assert_eq!(summary.history_length, 40);
    assert_eq!(summary.last_close, closes[39].close);
}

#[test]
fn csv_written_to_disk_round_trips_dates() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "date,close").unwrap();
    for (i, p) in flat_closes(3, 50.0).iter().enumerate() {
        writeln!(file, "{},{}", p.date, 50.0 + i as f64).unwrap();
    }
    let closes = load_closes_csv(file.path()).unwrap();
    assert_eq!(closes.len(), 3);
    assert_eq!(closes[2].close, 52.0);
}

#[test]
fn synthetic_series_feed_the_simulator() {
    let cfg = SimulationConfig::uniform(5_000, Some(9)).unwrap();
    for closes in [
        compounded_closes(252, 100.0, -0.0005, 0.01, 2).unwrap(),
        random_walk_closes(120, 100.0, 1),
    ] {
        let (outcomes, summary) = simulate(&closes, &cfg).unwrap();
        assert_eq!(outcomes.len(), 5_000);
        assert!((0.0..=1.0).contains(&summary.probability_up));
    }
}
