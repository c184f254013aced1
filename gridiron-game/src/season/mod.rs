//! Season simulator: league records, weekly results, achievements, facilities,
//! roster aging and snapshots.
mod achievements;
mod difficulty;
mod facilities;
mod league;
mod snapshot;

pub use achievements::{Achievement, Achievements};
pub use difficulty::{DifficultyLevel, DifficultyProfile};
pub use facilities::{Facilities, Facility};
pub use league::{
    LeagueResult, MAX_SIMULATED_SCORE, StandingsRow, TeamRecord, TeamStats, franchises,
    simulate_league_games, simulate_score, standings,
};
pub use snapshot::{SaveError, SaveSnapshot};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::constants::{
    COMEBACK_DEFICIT, SAVE_FORMAT_VERSION, SEASON_START_YEAR, SEASON_TOTAL_WEEKS,
    STARTING_SALARY_POOL, WIN_BONUS,
};
use crate::events::{EventLog, EventSink, GameEvent};
use crate::profile::{PlayerProfile, Roster, RosterError, generate_player, generate_starting_lineup};
use crate::rng::RngBundle;
use crate::skill::Position;

const PLAYER_TEAM_NAME: &str = "Home Team";
const PLAYER_TEAM_CITY: &str = "New York";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonState {
    pub current_week: u32,
    pub total_weeks: u32,
    pub year: u32,
    pub playoffs: bool,
}

impl Default for SeasonState {
    fn default() -> Self {
        Self {
            current_week: 1,
            total_weeks: SEASON_TOTAL_WEEKS,
            year: SEASON_START_YEAR,
            playoffs: false,
        }
    }
}

/// Cumulative offensive and defensive totals across games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameStats {
    pub passing_yards: u32,
    pub rushing_yards: u32,
    pub completions: u32,
    pub attempts: u32,
    pub touchdowns: u32,
    pub interceptions: u32,
    pub sacks: u32,
    pub tackles: u32,
}

impl GameStats {
    pub const fn accumulate(&mut self, game: &Self) {
        self.passing_yards = self.passing_yards.saturating_add(game.passing_yards);
        self.rushing_yards = self.rushing_yards.saturating_add(game.rushing_yards);
        self.completions = self.completions.saturating_add(game.completions);
        self.attempts = self.attempts.saturating_add(game.attempts);
        self.touchdowns = self.touchdowns.saturating_add(game.touchdowns);
        self.interceptions = self.interceptions.saturating_add(game.interceptions);
        self.sacks = self.sacks.saturating_add(game.sacks);
        self.tackles = self.tackles.saturating_add(game.tackles);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTeam {
    #[serde(flatten)]
    pub record: TeamRecord,
    /// Standings rank assigned when the playoffs start.
    #[serde(default)]
    pub playoff_seed: Option<u32>,
    pub salary_pool: u64,
    pub facilities: Facilities,
}

impl Default for PlayerTeam {
    fn default() -> Self {
        Self {
            record: TeamRecord::new(PLAYER_TEAM_NAME, PLAYER_TEAM_CITY),
            playoff_seed: None,
            salary_pool: STARTING_SALARY_POOL,
            facilities: Facilities::default(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeasonError {
    #[error("{facility} is already at max level {level}")]
    MaxLevelReached { facility: Facility, level: u8 },
    #[error("upgrading {facility} costs {cost} but the salary pool holds {available}")]
    InsufficientFunds {
        facility: Facility,
        cost: u64,
        available: u64,
    },
    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Non-fatal problems noticed while recording a result.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonWarning {
    #[error("opponent {name} is not in the league; only the player record was updated")]
    UnknownOpponent { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameReport {
    pub won: bool,
    pub unlocked: Vec<Achievement>,
    pub warnings: Vec<SeasonWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekReport {
    pub week: u32,
    pub results: Vec<LeagueResult>,
    pub playoffs_started: bool,
}

/// League-wide simulation for one franchise.
#[derive(Debug)]
pub struct SeasonSimulator<E = EventLog> {
    season: SeasonState,
    player_team: PlayerTeam,
    roster: Roster,
    league: Vec<TeamRecord>,
    game_stats: GameStats,
    difficulty: DifficultyProfile,
    achievements: Achievements,
    rng: RngBundle,
    events: E,
}

impl SeasonSimulator<EventLog> {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_sink(seed, EventLog::new())
    }
}

impl<E: EventSink> SeasonSimulator<E> {
    #[must_use]
    pub fn with_sink(seed: u64, events: E) -> Self {
        Self {
            season: SeasonState::default(),
            player_team: PlayerTeam::default(),
            roster: Roster::new(),
            league: franchises(),
            game_stats: GameStats::default(),
            difficulty: DifficultyProfile::default(),
            achievements: Achievements::default(),
            rng: RngBundle::from_user_seed(seed),
            events,
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub const fn season(&self) -> &SeasonState {
        &self.season
    }

    #[must_use]
    pub const fn player_team(&self) -> &PlayerTeam {
        &self.player_team
    }

    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn league(&self) -> &[TeamRecord] {
        &self.league
    }

    #[must_use]
    pub fn team(&self, name: &str) -> Option<&TeamRecord> {
        self.league.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub const fn game_stats(&self) -> &GameStats {
        &self.game_stats
    }

    #[must_use]
    pub const fn difficulty(&self) -> &DifficultyProfile {
        &self.difficulty
    }

    #[must_use]
    pub const fn achievements(&self) -> &Achievements {
        &self.achievements
    }

    #[must_use]
    pub const fn events(&self) -> &E {
        &self.events
    }

    pub const fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    #[must_use]
    pub const fn rng(&self) -> &RngBundle {
        &self.rng
    }

    pub const fn set_difficulty(&mut self, level: DifficultyLevel) {
        self.difficulty = DifficultyProfile::for_level(level);
    }

    /// Directly adjust the salary pool, e.g. for scripted scenarios.
    pub const fn set_salary_pool(&mut self, amount: u64) {
        self.player_team.salary_pool = amount;
    }

    /// Sign a generated starting lineup.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonError::Roster`] without signing anyone if the lineup
    /// would not fit.
    pub fn generate_roster(&mut self) -> Result<usize, SeasonError> {
        let lineup = generate_starting_lineup(&mut *self.rng.roster());
        if self.roster.len() + lineup.len() > Roster::CAPACITY {
            return Err(RosterError::RosterFull {
                capacity: Roster::CAPACITY,
            }
            .into());
        }
        let signed = lineup.len();
        for player in lineup {
            self.roster.sign(player)?;
        }
        debug!("generated roster of {signed} players");
        Ok(signed)
    }

    /// Generate and sign one player.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonError::Roster`] when the roster is full.
    pub fn draft_player(
        &mut self,
        position: Position,
        skill: Option<u8>,
    ) -> Result<&PlayerProfile, SeasonError> {
        let player = generate_player(position, skill, &mut *self.rng.roster());
        self.roster.sign(player)?;
        self.roster
            .players()
            .last()
            .ok_or(SeasonError::Roster(RosterError::RosterFull {
                capacity: Roster::CAPACITY,
            }))
    }

    /// # Errors
    ///
    /// Returns [`SeasonError::Roster`] when the roster is full.
    pub fn sign_player(&mut self, player: PlayerProfile) -> Result<(), SeasonError> {
        Ok(self.roster.sign(player)?)
    }

    pub fn simulate_score(&mut self) -> u32 {
        simulate_score(&mut *self.rng.league())
    }

    pub fn simulate_league_games(&mut self) -> Vec<LeagueResult> {
        simulate_league_games(&mut self.league, &mut *self.rng.league())
    }

    /// Move to the next week, play the league slate, and enter the playoffs
    /// once the regular season is over.
    pub fn advance_week(&mut self) -> WeekReport {
        self.season.current_week = self.season.current_week.saturating_add(1);
        let results = self.simulate_league_games();
        debug!(
            "advanced to week {} of {}",
            self.season.current_week, self.season.year
        );
        let playoffs_started =
            self.season.current_week > self.season.total_weeks && !self.season.playoffs;
        if playoffs_started {
            self.start_playoffs();
        }
        WeekReport {
            week: self.season.current_week,
            results,
            playoffs_started,
        }
    }

    /// Flag the playoffs and seed the player team by standings rank.
    pub fn start_playoffs(&mut self) -> Vec<StandingsRow> {
        self.season.playoffs = true;
        let table = self.standings();
        let seed = table
            .iter()
            .position(|row| row.is_player)
            .and_then(|rank| u32::try_from(rank + 1).ok());
        self.player_team.playoff_seed = seed;
        for (rank, row) in table.iter().enumerate() {
            info!(
                "playoff standings {:>2}. {} {}-{} ({:+})",
                rank + 1,
                row.name,
                row.wins,
                row.losses,
                row.point_differential
            );
        }
        table
    }

    /// Reset records for a new year and age the roster. Returns retirees.
    pub fn start_new_season(&mut self) -> Vec<PlayerProfile> {
        self.season.current_week = 1;
        self.season.year = self.season.year.saturating_add(1);
        self.season.playoffs = false;
        self.player_team.record.reset_season();
        self.player_team.playoff_seed = None;
        for team in &mut self.league {
            team.reset_season();
        }
        let retired = self.age_roster();
        debug!(
            "season {} started, {} players retired",
            self.season.year,
            retired.len()
        );
        retired
    }

    /// Age every roster player; those reaching their retirement age leave.
    pub fn age_roster(&mut self) -> Vec<PlayerProfile> {
        self.roster.age_one_season()
    }

    /// Apply a finished game between the player team and `opponent`.
    pub fn record_game_result(
        &mut self,
        player_score: u32,
        opponent_score: u32,
        opponent: &str,
    ) -> GameReport {
        let won = player_score > opponent_score;
        self.player_team
            .record
            .record_game(player_score, opponent_score, won);
        if won {
            self.player_team.salary_pool = self.player_team.salary_pool.saturating_add(WIN_BONUS);
        }

        let mut warnings = Vec::new();
        if let Some(team) = self.league.iter_mut().find(|t| t.name == opponent) {
            team.record_game(opponent_score, player_score, opponent_score > player_score);
        } else {
            warn!("recorded a game against unknown opponent {opponent}");
            warnings.push(SeasonWarning::UnknownOpponent {
                name: opponent.to_string(),
            });
        }

        self.events.emit(GameEvent::GameRecorded {
            opponent: opponent.to_string(),
            player_score,
            opponent_score,
            won,
        });
        let unlocked = self.check_achievements(player_score, opponent_score);
        GameReport {
            won,
            unlocked,
            warnings,
        }
    }

    /// Evaluate achievement rules for a final score. Returns newly unlocked flags.
    pub fn check_achievements(&mut self, player_score: u32, opponent_score: u32) -> Vec<Achievement> {
        let deficit = i64::from(opponent_score) - i64::from(player_score);
        let candidates = [
            (Achievement::FirstTouchdown, player_score > 0),
            (
                Achievement::Shutout,
                player_score > 0 && opponent_score == 0,
            ),
            (
                Achievement::Comeback,
                deficit >= i64::from(COMEBACK_DEFICIT) && player_score > opponent_score,
            ),
            (
                Achievement::UndefeatedSeason,
                self.player_team.record.wins == self.season.total_weeks,
            ),
        ];
        let mut unlocked = Vec::new();
        for (achievement, earned) in candidates {
            if earned && self.achievements.unlock(achievement) {
                self.events
                    .emit(GameEvent::AchievementUnlocked { achievement });
                unlocked.push(achievement);
            }
        }
        unlocked
    }

    /// Unlock an achievement awarded outside the score rules.
    pub fn award_achievement(&mut self, achievement: Achievement) -> bool {
        let newly = self.achievements.unlock(achievement);
        if newly {
            self.events
                .emit(GameEvent::AchievementUnlocked { achievement });
        }
        newly
    }

    /// Add a finished match's totals to the cumulative game stats.
    pub const fn record_game_stats(&mut self, game: &GameStats) {
        self.game_stats.accumulate(game);
    }

    #[must_use]
    pub fn standings(&self) -> Vec<StandingsRow> {
        standings(&self.player_team.record, &self.league)
    }

    /// Buy the next tier of `facility`. Returns the new level.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonError::MaxLevelReached`] at the top tier (checked
    /// before funds) or [`SeasonError::InsufficientFunds`] when the salary
    /// pool cannot cover the cost.
    pub fn upgrade_facility(&mut self, facility: Facility) -> Result<u8, SeasonError> {
        let level = self.player_team.facilities.level(facility);
        let Some(cost) = facility.upgrade_cost(level) else {
            return Err(SeasonError::MaxLevelReached { facility, level });
        };
        let available = self.player_team.salary_pool;
        if available < cost {
            return Err(SeasonError::InsufficientFunds {
                facility,
                cost,
                available,
            });
        }
        self.player_team.salary_pool -= cost;
        let slot = self.player_team.facilities.level_mut(facility);
        *slot += 1;
        debug!("{facility} upgraded to level {}", *slot);
        Ok(*slot)
    }

    /// Snapshot the persistent season state with an explicit timestamp.
    #[must_use]
    pub fn snapshot_at(&self, timestamp: u64) -> SaveSnapshot {
        SaveSnapshot {
            version: SAVE_FORMAT_VERSION,
            season: self.season,
            player_team: self.player_team.clone(),
            roster: self.roster.clone(),
            league: self.league.clone(),
            game_stats: self.game_stats,
            difficulty: self.difficulty,
            achievements: self.achievements,
            timestamp,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SaveSnapshot {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        self.snapshot_at(timestamp)
    }

    /// Serialize the season to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Malformed`] if serialization fails.
    pub fn save_game(&self) -> Result<String, SaveError> {
        self.snapshot().to_json()
    }

    /// Replace the season with a JSON snapshot. On any error the current
    /// state is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] for malformed, unsupported or inconsistent data.
    pub fn load_game(&mut self, json: &str) -> Result<(), SaveError> {
        let snapshot = SaveSnapshot::from_json(json).inspect_err(|err| {
            warn!("rejected save data: {err}");
        })?;
        self.apply_snapshot(snapshot);
        Ok(())
    }

    /// Replace the season with an in-memory snapshot after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] if the snapshot fails validation.
    pub fn restore(&mut self, snapshot: SaveSnapshot) -> Result<(), SaveError> {
        snapshot.validate()?;
        self.apply_snapshot(snapshot);
        Ok(())
    }

    fn apply_snapshot(&mut self, snapshot: SaveSnapshot) {
        self.season = snapshot.season;
        self.player_team = snapshot.player_team;
        self.roster = snapshot.roster;
        self.league = snapshot.league;
        self.game_stats = snapshot.game_stats;
        self.difficulty = snapshot.difficulty;
        self.achievements = snapshot.achievements;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_over_cowboys_updates_both_records() {
        let mut sim = SeasonSimulator::new(1);
        let report = sim.record_game_result(21, 14, "Cowboys");
        assert!(report.won);
        assert!(report.warnings.is_empty());
        assert_eq!(sim.player_team().record.wins, 1);
        assert_eq!(sim.player_team().salary_pool, 50_100_000);
        let cowboys = sim.team("Cowboys").unwrap();
        assert_eq!((cowboys.wins, cowboys.losses), (0, 1));
        assert_eq!(cowboys.points_allowed, 21);
        assert!(sim.achievements().is_unlocked(Achievement::FirstTouchdown));
        assert!(report.unlocked.contains(&Achievement::FirstTouchdown));
    }

    #[test]
    fn unknown_opponent_is_reported_not_fatal() {
        let mut sim = SeasonSimulator::new(2);
        let report = sim.record_game_result(3, 10, "Raiders");
        assert_eq!(
            report.warnings,
            vec![SeasonWarning::UnknownOpponent {
                name: "Raiders".into()
            }]
        );
        assert_eq!(sim.player_team().record.losses, 1);
        assert!(sim.league().iter().all(|t| t.games_played() == 0));
    }

    #[test]
    fn tie_counts_as_a_loss_for_both_sides() {
        let mut sim = SeasonSimulator::new(3);
        let report = sim.record_game_result(10, 10, "Eagles");
        assert!(!report.won);
        assert_eq!(sim.player_team().record.losses, 1);
        assert_eq!(sim.team("Eagles").unwrap().losses, 1);
    }

    #[test]
    fn shutout_and_events() {
        let mut sim = SeasonSimulator::new(4);
        sim.record_game_result(7, 0, "Giants");
        assert!(sim.achievements().is_unlocked(Achievement::Shutout));
        let unlocked: Vec<Achievement> = sim
            .events()
            .events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::AchievementUnlocked { achievement } => Some(*achievement),
                _ => None,
            })
            .collect();
        assert_eq!(
            unlocked,
            vec![Achievement::FirstTouchdown, Achievement::Shutout]
        );
        let again = sim.record_game_result(14, 0, "Giants");
        assert!(again.unlocked.is_empty());
    }

    #[test]
    fn comeback_rule_cannot_fire_from_a_final_score() {
        let mut sim = SeasonSimulator::new(5);
        sim.record_game_result(35, 21, "Chiefs");
        sim.record_game_result(0, 28, "Chiefs");
        assert!(!sim.achievements().is_unlocked(Achievement::Comeback));
    }

    #[test]
    fn undefeated_after_seventeen_wins() {
        let mut sim = SeasonSimulator::new(6);
        for week in 0..17 {
            let report = sim.record_game_result(24, 3, "Packers");
            assert_eq!(
                report.unlocked.contains(&Achievement::UndefeatedSeason),
                week == 16
            );
        }
    }

    #[test]
    fn facility_upgrades_check_level_then_funds() {
        let mut sim = SeasonSimulator::new(7);
        sim.set_salary_pool(500_000);
        assert_eq!(
            sim.upgrade_facility(Facility::Training),
            Err(SeasonError::InsufficientFunds {
                facility: Facility::Training,
                cost: 1_000_000,
                available: 500_000
            })
        );
        assert_eq!(sim.player_team().salary_pool, 500_000);

        sim.set_salary_pool(100_000_000);
        for expected in 2..=4 {
            assert_eq!(sim.upgrade_facility(Facility::Medical), Ok(expected));
        }
        assert_eq!(sim.player_team().salary_pool, 100_000_000 - 6_750_000);
        sim.set_salary_pool(0);
        assert_eq!(
            sim.upgrade_facility(Facility::Medical),
            Err(SeasonError::MaxLevelReached {
                facility: Facility::Medical,
                level: 4
            })
        );
    }

    #[test]
    fn advancing_past_week_seventeen_starts_playoffs() {
        let mut sim = SeasonSimulator::new(8);
        let mut started = 0;
        for _ in 0..17 {
            if sim.advance_week().playoffs_started {
                started += 1;
            }
        }
        assert_eq!(started, 1);
        assert_eq!(sim.season().current_week, 18);
        assert!(sim.season().playoffs);
        assert!(sim.player_team().playoff_seed.is_some());
        assert!(sim.league().iter().all(|t| t.games_played() == 17));
    }

    #[test]
    fn new_season_resets_records_and_ages_roster() {
        let mut sim = SeasonSimulator::new(9);
        sim.generate_roster().unwrap();
        let ages: Vec<u8> = sim.roster().players().iter().map(|p| p.age).collect();
        sim.advance_week();
        sim.record_game_result(14, 7, "Steelers");
        let retired = sim.start_new_season();
        assert!(retired.is_empty());
        assert_eq!(sim.season().year, 2025);
        assert_eq!(sim.season().current_week, 1);
        assert_eq!(sim.player_team().record.games_played(), 0);
        assert!(sim.league().iter().all(|t| t.points == 0));
        let aged: Vec<u8> = sim.roster().players().iter().map(|p| p.age).collect();
        assert!(ages.iter().zip(&aged).all(|(a, b)| a + 1 == *b));
        assert!(sim.achievements().is_unlocked(Achievement::FirstTouchdown));
    }

    #[test]
    fn generate_roster_refuses_to_overflow() {
        let mut sim = SeasonSimulator::new(10);
        assert_eq!(sim.generate_roster(), Ok(24));
        assert_eq!(sim.generate_roster(), Ok(24));
        assert!(matches!(
            sim.generate_roster(),
            Err(SeasonError::Roster(RosterError::RosterFull { .. }))
        ));
        assert_eq!(sim.roster().len(), 48);
    }

    #[test]
    fn difficulty_levels_switch_profiles() {
        let mut sim = SeasonSimulator::new(11);
        sim.set_difficulty(DifficultyLevel::Extreme);
        assert!((sim.difficulty().cpu_speed - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rejected_load_leaves_state_untouched() {
        let mut sim = SeasonSimulator::new(12);
        sim.record_game_result(21, 14, "Cowboys");
        let before = sim.snapshot_at(0);
        assert!(matches!(
            sim.load_game("{not json"),
            Err(SaveError::Malformed(_))
        ));
        let mut future = before.clone();
        future.version = 99;
        let json = serde_json::to_string(&future).unwrap();
        assert!(matches!(
            sim.load_game(&json),
            Err(SaveError::UnsupportedVersion { found: 99, .. })
        ));
        let mut broken = before.clone();
        broken.player_team.facilities.stadium = 9;
        assert!(matches!(
            sim.restore(broken),
            Err(SaveError::Inconsistent(_))
        ));
        assert_eq!(sim.snapshot_at(0), before);
    }

    #[test]
    fn save_then_load_restores_season() {
        let mut original = SeasonSimulator::new(13);
        original.generate_roster().unwrap();
        original.advance_week();
        original.record_game_result(17, 10, "Eagles");
        let json = original.save_game().unwrap();

        let mut restored = SeasonSimulator::new(99);
        restored.load_game(&json).unwrap();
        assert_eq!(restored.snapshot_at(0), original.snapshot_at(0));
    }
}
