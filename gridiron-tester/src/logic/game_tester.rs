use anyhow::{Context, Result};
use gridiron_game::{
    Achievement, AiState, CatchResolution, DifficultyLevel, DifficultyProfile, Field, FieldConfig,
    GameEvent, PlayerId, Position, Route, ScoreSide, SeasonSimulator, StandingsRow, TeamSide,
    Vec2, encode_friendly,
};
use log::debug;
use sha2::{Digest, Sha256};

const FRAME_MS: u64 = 16;
const PLAY_TICKS: usize = 240;
const THROW_TICK: usize = 40;
const TOUCHDOWN_POINTS: u32 = 7;
const FIELD_GOAL_POINTS: u32 = 3;

const QB_SPOT: Vec2 = Vec2::new(100.0, 300.0);
const WR_SPOT: Vec2 = Vec2::new(140.0, 200.0);
const WR_BREAK: Vec2 = Vec2::new(220.0, 200.0);
const DB_SPOT: Vec2 = Vec2::new(260.0, 200.0);
const LB_SPOT: Vec2 = Vec2::new(320.0, 300.0);

pub type Expectation = fn(&SimulationSummary) -> Result<()>;

/// What a scenario iteration simulates and the checks it must pass.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub weeks: u32,
    pub plays_per_game: usize,
    pub difficulty: DifficultyLevel,
    pub catch_resolution: CatchResolution,
    pub verify_save: bool,
    pub verify_replay: bool,
    pub expectations: Vec<Expectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(weeks: u32) -> Self {
        Self {
            weeks,
            plays_per_game: 4,
            difficulty: DifficultyLevel::Medium,
            catch_resolution: CatchResolution::Proximity,
            verify_save: false,
            verify_replay: false,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_plays(mut self, plays: usize) -> Self {
        self.plays_per_game = plays;
        self
    }

    #[must_use]
    pub const fn with_difficulty(mut self, level: DifficultyLevel) -> Self {
        self.difficulty = level;
        self
    }

    #[must_use]
    pub const fn with_catch_resolution(mut self, resolution: CatchResolution) -> Self {
        self.catch_resolution = resolution;
        self
    }

    #[must_use]
    pub const fn with_save_check(mut self) -> Self {
        self.verify_save = true;
        self
    }

    #[must_use]
    pub const fn with_replay_check(mut self) -> Self {
        self.verify_replay = true;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }
}

/// Totals for one scripted match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub player_score: u32,
    pub cpu_score: u32,
    pub passes: u32,
    pub completions: u32,
    pub incompletions: u32,
    pub drops: u32,
    pub tackles: u32,
    pub possession_violations: u32,
}

impl MatchSummary {
    const fn absorb(&mut self, other: &Self) {
        self.player_score += other.player_score;
        self.cpu_score += other.cpu_score;
        self.passes += other.passes;
        self.completions += other.completions;
        self.incompletions += other.incompletions;
        self.drops += other.drops;
        self.tackles += other.tackles;
        self.possession_violations += other.possession_violations;
    }
}

#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub share_code: String,
    pub weeks_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub playoffs: bool,
    pub playoff_seed: Option<u32>,
    pub roster_size: usize,
    pub standings: Vec<StandingsRow>,
    pub achievements: Vec<Achievement>,
    pub warnings: usize,
    pub totals: MatchSummary,
    pub snapshot_digest: String,
    pub save_roundtrip: Option<bool>,
    pub replay_matches: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct GameTester {
    verbose: bool,
}

impl GameTester {
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Simulate `plan.weeks` weeks of a season seeded with `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the season rejects an operation the script relies on.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let (season, totals, warnings) = self.simulate_season(plan, seed)?;
        let snapshot_json = season.snapshot_at(0).to_json()?;
        let snapshot_digest = hex_digest(snapshot_json.as_bytes());

        let save_roundtrip = if plan.verify_save {
            Some(save_roundtrip_holds(&season)?)
        } else {
            None
        };
        let replay_matches = if plan.verify_replay {
            let (replayed, _, _) = self.simulate_season(plan, seed)?;
            let replay_json = replayed.snapshot_at(0).to_json()?;
            Some(hex_digest(replay_json.as_bytes()) == snapshot_digest)
        } else {
            None
        };

        let record = &season.player_team().record;
        Ok(SimulationSummary {
            seed,
            share_code: encode_friendly(seed),
            weeks_played: record.games_played(),
            wins: record.wins,
            losses: record.losses,
            playoffs: season.season().playoffs,
            playoff_seed: season.player_team().playoff_seed,
            roster_size: season.roster().len(),
            standings: season.standings(),
            achievements: season.achievements().unlocked().collect(),
            warnings,
            totals,
            snapshot_digest,
            save_roundtrip,
            replay_matches,
        })
    }

    fn simulate_season(
        &self,
        plan: &SimulationPlan,
        seed: u64,
    ) -> Result<(SeasonSimulator, MatchSummary, usize)> {
        let mut season = SeasonSimulator::new(seed);
        season.set_difficulty(plan.difficulty);
        season
            .generate_roster()
            .context("starting lineup should fit an empty roster")?;

        let opponents: Vec<String> = season.league().iter().map(|t| t.name.clone()).collect();
        let mut totals = MatchSummary::default();
        let mut warnings = 0;
        for week in 0..plan.weeks {
            let match_seed = seed ^ u64::from(week).wrapping_mul(0x9E37_79B9_7F4A_7C15);
            let mut game = play_match(plan, match_seed)?;
            game.cpu_score = season.simulate_score();
            let opponent = &opponents[week as usize % opponents.len()];
            let report = season.record_game_result(game.player_score, game.cpu_score, opponent);
            warnings += report.warnings.len();
            if self.verbose {
                println!(
                    "    week {:>2}: Home Team {} - {} {} ({} completions, {} tackles)",
                    week + 1,
                    game.player_score,
                    game.cpu_score,
                    opponent,
                    game.completions,
                    game.tackles
                );
            }
            debug!("week {} vs {opponent}: {game:?}", week + 1);
            totals.absorb(&game);
            season.advance_week();
        }
        Ok((season, totals, warnings))
    }
}

fn play_match(plan: &SimulationPlan, seed: u64) -> Result<MatchSummary> {
    let config = FieldConfig {
        catch_resolution: plan.catch_resolution,
        difficulty: DifficultyProfile::for_level(plan.difficulty),
        ..FieldConfig::default()
    };
    let mut field = Field::new(seed, config);
    let qb = field.spawn(Position::Quarterback, TeamSide::Offense, QB_SPOT);
    let wr = field.spawn(Position::WideReceiver, TeamSide::Offense, WR_SPOT);
    let db = field.spawn(Position::DefensiveBack, TeamSide::Defense, DB_SPOT);
    let lb = field.spawn(Position::Linebacker, TeamSide::Defense, LB_SPOT);
    field.set_human(qb, true)?;

    let mut summary = MatchSummary::default();
    for _ in 0..plan.plays_per_game {
        line_up(&mut field, &[(qb, QB_SPOT), (wr, WR_SPOT), (db, DB_SPOT), (lb, LB_SPOT)])?;
        field.reset_ball(QB_SPOT);
        field.give_ball(qb)?;
        field.player_mut(wr)?.assign(AiState::Running {
            route: Route::new([WR_BREAK]),
        });
        field.player_mut(db)?.assign(AiState::Covering { target: wr });
        field.player_mut(lb)?.assign(AiState::Tackling);

        for tick in 0..PLAY_TICKS {
            if tick == THROW_TICK && field.ball().carrier() == Some(qb) {
                field.pass(qb, wr)?;
                summary.passes += 1;
            }
            field.tick(FRAME_MS);
            if !field.possession_consistent() {
                summary.possession_violations += 1;
            }
            if field.is_play_dead() {
                break;
            }
        }

        let events = field.events_mut().drain();
        let mut caught = false;
        let mut tackled = false;
        for event in &events {
            match event {
                GameEvent::PassCompleted { .. } => {
                    caught = true;
                    summary.completions += 1;
                }
                GameEvent::PassIncomplete { dropped, .. } => {
                    summary.incompletions += 1;
                    if *dropped {
                        summary.drops += 1;
                    }
                }
                GameEvent::Tackle { .. } => {
                    tackled = true;
                    summary.tackles += 1;
                }
                _ => {}
            }
        }
        match (caught, tackled) {
            (true, false) => field.award_points(ScoreSide::Player, TOUCHDOWN_POINTS),
            (true, true) => field.award_points(ScoreSide::Player, FIELD_GOAL_POINTS),
            _ => {}
        }
    }
    summary.player_score = field.scoreboard().player();
    Ok(summary)
}

fn line_up(field: &mut Field, spots: &[(PlayerId, Vec2)]) -> Result<()> {
    for &(id, spot) in spots {
        let player = field.player_mut(id)?;
        player.at = spot;
        player.stop();
        player.assign(AiState::Idle);
    }
    Ok(())
}

fn save_roundtrip_holds(season: &SeasonSimulator) -> Result<bool> {
    let json = season.save_game()?;
    let mut restored = SeasonSimulator::new(season.seed());
    restored.load_game(&json)?;
    Ok(restored.snapshot_at(0) == season.snapshot_at(0))
}

fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_week_plays_one_game() {
        let tester = GameTester::new(false);
        let plan = SimulationPlan::new(1).with_plays(2);
        let summary = tester.run_plan(&plan, 42).unwrap();
        assert_eq!(summary.weeks_played, 1);
        assert_eq!(summary.roster_size, 24);
        assert_eq!(summary.totals.passes, summary.totals.completions + summary.totals.incompletions);
        assert_eq!(summary.totals.possession_violations, 0);
        assert_eq!(summary.snapshot_digest.len(), 64);
        assert!(summary.share_code.starts_with("GR-"));
    }

    #[test]
    fn full_season_reaches_playoffs() {
        let tester = GameTester::new(false);
        let plan = SimulationPlan::new(17).with_plays(1).with_save_check();
        let summary = tester.run_plan(&plan, 7).unwrap();
        assert_eq!(summary.weeks_played, 17);
        assert!(summary.playoffs);
        assert!(summary.playoff_seed.is_some());
        assert_eq!(summary.save_roundtrip, Some(true));
    }

    #[test]
    fn replay_reproduces_digest() {
        let tester = GameTester::new(false);
        let plan = SimulationPlan::new(3)
            .with_catch_resolution(CatchResolution::SkillRoll)
            .with_replay_check();
        let summary = tester.run_plan(&plan, 99).unwrap();
        assert_eq!(summary.replay_matches, Some(true));
    }
}
