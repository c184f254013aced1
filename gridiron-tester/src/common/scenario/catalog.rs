use anyhow::{Result, bail, ensure};
use gridiron_game::{CatchResolution, DifficultyLevel, decode_to_seed, encode_friendly};

use super::TestScenario;
use crate::logic::{SimulationPlan, SimulationSummary};

const PLAYOFF_FIELD: u32 = 9;
const ROSTER_CAPACITY: usize = 53;

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::new(
            "smoke",
            "Smoke",
            "One week with a short scripted game",
            SimulationPlan::new(1)
                .with_plays(2)
                .with_expectation(sane_match_totals)
                .with_expectation(one_game_recorded),
        ),
        TestScenario::new(
            "full-season",
            "Full Season",
            "Seventeen weeks into a seeded playoff berth",
            SimulationPlan::new(17)
                .with_plays(1)
                .with_expectation(sane_match_totals)
                .with_expectation(playoffs_seeded)
                .with_expectation(standings_ordered),
        ),
        TestScenario::new(
            "match-play",
            "Match Play",
            "Long games that must keep possession consistent",
            SimulationPlan::new(2)
                .with_plays(12)
                .with_expectation(sane_match_totals)
                .with_expectation(scores_bounded),
        ),
        TestScenario::new(
            "skill-catch",
            "Skill Catch",
            "Catches decided by receiver skill rolls",
            SimulationPlan::new(3)
                .with_catch_resolution(CatchResolution::SkillRoll)
                .with_expectation(sane_match_totals),
        ),
        TestScenario::new(
            "extreme-difficulty",
            "Extreme Difficulty",
            "A month at the hardest setting",
            SimulationPlan::new(4)
                .with_difficulty(DifficultyLevel::Extreme)
                .with_expectation(sane_match_totals)
                .with_expectation(roster_within_capacity),
        ),
        TestScenario::new(
            "save-roundtrip",
            "Save Roundtrip",
            "Mid-season save reloads to the same snapshot",
            SimulationPlan::new(6)
                .with_plays(2)
                .with_save_check()
                .with_expectation(save_reloads),
        ),
        TestScenario::new(
            "determinism",
            "Determinism",
            "Same seed replays to the same snapshot digest",
            SimulationPlan::new(4)
                .with_plays(3)
                .with_replay_check()
                .with_expectation(replay_identical),
        ),
        TestScenario::new(
            "share-codes",
            "Share Codes",
            "Share code for the seed decodes back to itself",
            SimulationPlan::new(1)
                .with_plays(1)
                .with_expectation(share_code_stable),
        ),
    ]
}

fn sane_match_totals(summary: &SimulationSummary) -> Result<()> {
    let totals = &summary.totals;
    ensure!(
        totals.possession_violations == 0,
        "{} ticks with inconsistent possession",
        totals.possession_violations
    );
    ensure!(
        totals.completions + totals.incompletions <= totals.passes,
        "{} completions and {} incompletions from {} passes",
        totals.completions,
        totals.incompletions,
        totals.passes
    );
    ensure!(
        totals.drops <= totals.incompletions,
        "more drops than incompletions"
    );
    Ok(())
}

fn one_game_recorded(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.wins + summary.losses == 1,
        "expected one decision, got {}-{}",
        summary.wins,
        summary.losses
    );
    Ok(())
}

fn playoffs_seeded(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.playoffs, "season ended without playoffs");
    match summary.playoff_seed {
        Some(seed) if (1..=PLAYOFF_FIELD).contains(&seed) => Ok(()),
        Some(seed) => bail!("playoff seed {seed} outside 1..={PLAYOFF_FIELD}"),
        None => bail!("player team was not seeded"),
    }
}

fn standings_ordered(summary: &SimulationSummary) -> Result<()> {
    for pair in summary.standings.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        ensure!(
            (a.wins, a.point_differential) >= (b.wins, b.point_differential),
            "{} ({}-{}) ranked above {} ({}-{})",
            a.name,
            a.wins,
            a.losses,
            b.name,
            b.wins,
            b.losses
        );
    }
    Ok(())
}

fn scores_bounded(summary: &SimulationSummary) -> Result<()> {
    let ceiling = summary.totals.passes * 7;
    ensure!(
        summary.totals.player_score <= ceiling,
        "scored {} from {} passes",
        summary.totals.player_score,
        summary.totals.passes
    );
    Ok(())
}

fn roster_within_capacity(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        (1..=ROSTER_CAPACITY).contains(&summary.roster_size),
        "roster size {} outside 1..={ROSTER_CAPACITY}",
        summary.roster_size
    );
    Ok(())
}

fn save_reloads(summary: &SimulationSummary) -> Result<()> {
    match summary.save_roundtrip {
        Some(true) => Ok(()),
        Some(false) => bail!("reloaded snapshot differs from the saved one"),
        None => bail!("save check did not run"),
    }
}

fn replay_identical(summary: &SimulationSummary) -> Result<()> {
    match summary.replay_matches {
        Some(true) => Ok(()),
        Some(false) => bail!("replay digest differs from {}", summary.snapshot_digest),
        None => bail!("replay check did not run"),
    }
}

fn share_code_stable(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        encode_friendly(summary.seed) == summary.share_code,
        "seed {} reported code {}",
        summary.seed,
        summary.share_code
    );
    let Some(canonical) = decode_to_seed(&summary.share_code) else {
        bail!("{} does not decode", summary.share_code);
    };
    ensure!(
        encode_friendly(canonical) == summary.share_code,
        "{} re-encodes as {}",
        summary.share_code,
        encode_friendly(canonical)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::GameTester;

    #[test]
    fn catalog_covers_expected_keys() {
        let keys: Vec<_> = catalog_scenarios().iter().map(|s| s.key).collect();
        for key in [
            "smoke",
            "full-season",
            "match-play",
            "skill-catch",
            "extreme-difficulty",
            "save-roundtrip",
            "determinism",
            "share-codes",
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }

    #[test]
    fn share_code_scenario_passes() {
        let scenario = super::super::get_scenario("share-codes").unwrap();
        let summary = GameTester::new(false).run_plan(&scenario.plan, 2024).unwrap();
        for expectation in &scenario.plan.expectations {
            expectation(&summary).unwrap();
        }
    }
}
