use gridiron_game::{Achievement, Facility, SaveError, SaveSnapshot, SeasonSimulator};
use serde_json::Value;
use std::hash::Hasher;
use twox_hash::XxHash64;

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

fn busy_season(seed: u64) -> SeasonSimulator {
    let mut sim = SeasonSimulator::new(seed);
    sim.generate_roster().unwrap();
    for _ in 0..5 {
        let ours = sim.simulate_score();
        let theirs = sim.simulate_score();
        sim.record_game_result(ours, theirs, "Steelers");
        sim.advance_week();
    }
    sim.upgrade_facility(Facility::Medical).unwrap();
    sim.award_achievement(Achievement::Comeback);
    sim
}

fn edited(sim: &SeasonSimulator, edit: impl FnOnce(&mut Value)) -> String {
    let mut value: Value = serde_json::from_str(&sim.save_game().unwrap()).unwrap();
    edit(&mut value);
    value.to_string()
}

#[test]
fn save_then_load_restores_every_field() {
    let original = busy_season(31);
    let json = original.snapshot_at(1_700_000_000_000).to_json().unwrap();

    let mut restored = SeasonSimulator::new(999);
    restored.load_game(&json).unwrap();
    assert_eq!(
        restored.snapshot_at(1_700_000_000_000),
        original.snapshot_at(1_700_000_000_000)
    );
    assert!(restored.achievements().is_unlocked(Achievement::Comeback));
    assert_eq!(restored.player_team().facilities.medical, 2);
}

#[test]
fn snapshot_digest_is_stable_per_seed() {
    let digest = |seed| {
        let json = busy_season(seed).snapshot_at(0).to_json().unwrap();
        snapshot_hash(json.as_bytes())
    };
    assert_eq!(digest(8), digest(8));
    assert_ne!(digest(8), digest(9));
}

#[test]
fn rejected_loads_leave_state_untouched() {
    let source = busy_season(4);
    let mut target = busy_season(12);
    let before = target.snapshot_at(0);

    let future = edited(&source, |v| v["version"] = Value::from(2));
    assert!(matches!(
        target.load_game(&future),
        Err(SaveError::UnsupportedVersion {
            found: 2,
            supported: 1
        })
    ));

    assert!(matches!(
        target.load_game("{\"version\": 1, \"season\": "),
        Err(SaveError::Malformed(_))
    ));

    let duplicate = edited(&source, |v| {
        let first = v["league"][0].clone();
        if let Some(league) = v["league"].as_array_mut() {
            league.push(first);
        }
    });
    assert!(matches!(
        target.load_game(&duplicate),
        Err(SaveError::Inconsistent(_))
    ));

    let gilded = edited(&source, |v| {
        v["player_team"]["facilities"]["stadium"] = Value::from(5);
    });
    assert!(matches!(
        target.load_game(&gilded),
        Err(SaveError::Inconsistent(_))
    ));

    let missing = edited(&source, |v| {
        if let Some(map) = v.as_object_mut() {
            map.remove("roster");
        }
    });
    assert!(matches!(
        target.load_game(&missing),
        Err(SaveError::Malformed(_))
    ));

    assert_eq!(target.snapshot_at(0), before);
}

#[test]
fn snapshot_json_uses_flat_field_names() {
    let json = busy_season(1).save_game().unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    for key in [
        "version",
        "season",
        "player_team",
        "roster",
        "league",
        "game_stats",
        "difficulty",
        "achievements",
        "timestamp",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["player_team"]["name"], "Home Team");
    assert_eq!(value["difficulty"]["level"], "medium");
    assert!(SaveSnapshot::from_json(&json).is_ok());
}

#[test]
fn week_past_the_season_needs_playoffs() {
    let source = busy_season(8);
    let mut target = busy_season(8);
    let runaway = edited(&source, |v| {
        v["season"]["current_week"] = Value::from(u32::MAX);
    });
    assert!(matches!(
        target.load_game(&runaway),
        Err(SaveError::Inconsistent(_))
    ));
}

#[test]
fn saturated_counters_keep_the_season_running() {
    let source = busy_season(9);
    let saturated = edited(&source, |v| {
        v["season"]["current_week"] = Value::from(u32::MAX);
        v["season"]["playoffs"] = Value::from(true);
        v["player_team"]["wins"] = Value::from(u32::MAX);
        v["player_team"]["losses"] = Value::from(u32::MAX);
        if let Some(league) = v["league"].as_array_mut() {
            for team in league {
                team["wins"] = Value::from(u32::MAX);
                team["losses"] = Value::from(u32::MAX);
            }
        }
    });
    let mut sim = SeasonSimulator::new(9);
    sim.load_game(&saturated).unwrap();

    let report = sim.advance_week();
    assert_eq!(report.week, u32::MAX);
    assert!(!report.playoffs_started);
    sim.record_game_result(21, 14, "Steelers");
    sim.record_game_result(3, 14, "Steelers");
    assert_eq!(sim.player_team().record.wins, u32::MAX);
    assert_eq!(sim.player_team().record.games_played(), u32::MAX);
    assert!(sim.league().iter().all(|t| t.wins == u32::MAX));
}
