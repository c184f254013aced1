//! Flat JSON snapshot of a season.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::{Achievements, DifficultyProfile, GameStats, PlayerTeam, SeasonState, TeamRecord};
use crate::constants::SAVE_FORMAT_VERSION;
use crate::profile::Roster;
use crate::skill::SKILL_CAP;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save data is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported save version {found} (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("inconsistent save data: {0}")]
    Inconsistent(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSnapshot {
    pub version: u32,
    pub season: SeasonState,
    pub player_team: PlayerTeam,
    pub roster: Roster,
    pub league: Vec<TeamRecord>,
    pub game_stats: GameStats,
    pub difficulty: DifficultyProfile,
    pub achievements: Achievements,
    /// Milliseconds since the Unix epoch when the snapshot was taken.
    pub timestamp: u64,
}

impl SaveSnapshot {
    /// Parse and fully validate a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] for malformed JSON, an unsupported version, or
    /// data that violates season invariants.
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// # Errors
    ///
    /// Returns [`SaveError::Malformed`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check invariants a hand-edited or truncated save could break.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), SaveError> {
        if self.version != SAVE_FORMAT_VERSION {
            return Err(SaveError::UnsupportedVersion {
                found: self.version,
                supported: SAVE_FORMAT_VERSION,
            });
        }
        if self.season.total_weeks == 0 || self.season.current_week == 0 {
            return Err(inconsistent("season weeks must start at 1"));
        }
        if self.season.current_week > self.season.total_weeks.saturating_add(1)
            && !self.season.playoffs
        {
            return Err(inconsistent(format!(
                "week {} is past the end of a {}-week season without playoffs",
                self.season.current_week, self.season.total_weeks
            )));
        }
        if self.league.is_empty() {
            return Err(inconsistent("league has no teams"));
        }
        let mut names = HashSet::new();
        for team in &self.league {
            if !names.insert(team.name.as_str()) {
                return Err(inconsistent(format!("duplicate league team {}", team.name)));
            }
        }
        if !self.player_team.facilities.all_valid() {
            return Err(inconsistent("facility level outside 1..=4"));
        }
        if self.roster.exceeds_capacity() {
            return Err(inconsistent(format!(
                "roster holds {} players (max {})",
                self.roster.len(),
                Roster::CAPACITY
            )));
        }
        if let Some(player) = self
            .roster
            .players()
            .iter()
            .find(|p| p.skill > SKILL_CAP || p.morale > 100)
        {
            return Err(inconsistent(format!(
                "{} has ratings above 100",
                player.full_name()
            )));
        }
        let knobs = [
            self.difficulty.cpu_skill,
            self.difficulty.cpu_speed,
            self.difficulty.cpu_reaction,
        ];
        if knobs.iter().any(|k| !k.is_finite() || *k < 0.0) {
            return Err(inconsistent("difficulty knobs must be finite and non-negative"));
        }
        Ok(())
    }
}

fn inconsistent(reason: impl Into<String>) -> SaveError {
    SaveError::Inconsistent(reason.into())
}
