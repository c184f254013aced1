//! In-match ratings consulted by movement and outcome resolution.
use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_SPEED_SCALE, DEFAULT_CATCHING, DEFAULT_TACKLING, DEFAULT_THROW_ACCURACY,
    DEFAULT_THROW_POWER,
};
use crate::skill::{Position, PositionStats};

const BASE_RATING: f64 = 70.0;

/// Ratings on a 0-100 scale. Optional entries fall back to league defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchRatings {
    pub speed: f64,
    pub strength: f64,
    pub agility: f64,
    pub awareness: f64,
    pub stamina: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throw_power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throw_accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catching: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrying: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_running: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocking: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tackling: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_rush: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kick_power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kick_accuracy: Option<f64>,
}

impl Default for MatchRatings {
    fn default() -> Self {
        Self {
            speed: BASE_RATING,
            strength: BASE_RATING,
            agility: BASE_RATING,
            awareness: BASE_RATING,
            stamina: BASE_RATING,
            throw_power: None,
            throw_accuracy: None,
            catching: None,
            carrying: None,
            route_running: None,
            blocking: None,
            tackling: None,
            pass_rush: None,
            coverage: None,
            kick_power: None,
            kick_accuracy: None,
        }
    }
}

impl MatchRatings {
    /// Arcade ratings for a pickup player at `position`.
    #[must_use]
    pub fn for_position(position: Position) -> Self {
        let base = Self::default();
        match position {
            Position::Quarterback => Self {
                speed: 65.0,
                awareness: 88.0,
                throw_power: Some(85.0),
                throw_accuracy: Some(82.0),
                ..base
            },
            Position::RunningBack => Self {
                speed: 88.0,
                agility: 85.0,
                strength: 72.0,
                carrying: Some(80.0),
                ..base
            },
            Position::WideReceiver => Self {
                speed: 92.0,
                agility: 86.0,
                catching: Some(85.0),
                route_running: Some(82.0),
                ..base
            },
            Position::TightEnd => Self {
                speed: 75.0,
                strength: 82.0,
                catching: Some(78.0),
                blocking: Some(75.0),
                ..base
            },
            Position::OffensiveLine => Self {
                speed: 55.0,
                strength: 92.0,
                awareness: 75.0,
                blocking: Some(88.0),
                ..base
            },
            Position::DefensiveLine => Self {
                speed: 70.0,
                strength: 90.0,
                tackling: Some(80.0),
                pass_rush: Some(82.0),
                ..base
            },
            Position::Linebacker => Self {
                speed: 78.0,
                strength: 80.0,
                tackling: Some(88.0),
                coverage: Some(72.0),
                ..base
            },
            Position::DefensiveBack => Self {
                speed: 90.0,
                agility: 88.0,
                coverage: Some(85.0),
                tackling: Some(70.0),
                ..base
            },
            Position::Kicker => Self {
                speed: 50.0,
                kick_power: Some(88.0),
                kick_accuracy: Some(85.0),
                ..base
            },
        }
    }

    /// Ratings for a roster player, taken from their skill-derived stats.
    #[must_use]
    pub fn from_stats(stats: &PositionStats) -> Self {
        let base = Self::default();
        match *stats {
            PositionStats::Quarterback {
                speed,
                accuracy,
                power,
                vision,
            } => Self {
                speed,
                awareness: vision,
                throw_accuracy: Some(accuracy),
                throw_power: Some(power),
                ..base
            },
            PositionStats::RunningBack {
                speed,
                power,
                agility,
                vision,
            } => Self {
                speed,
                strength: power,
                agility,
                awareness: vision,
                ..base
            },
            PositionStats::WideReceiver {
                speed,
                catching,
                agility,
                jump_ball,
            } => Self {
                speed,
                agility,
                catching: Some(catching),
                route_running: Some(jump_ball),
                ..base
            },
            PositionStats::Standard {
                speed,
                strength,
                stamina,
                technique,
            } => Self {
                speed,
                strength,
                stamina,
                blocking: Some(technique),
                ..base
            },
        }
    }

    /// Top speed in field units per second.
    #[must_use]
    pub fn base_speed(&self) -> f64 {
        self.speed / 100.0 * BASE_SPEED_SCALE
    }

    #[must_use]
    pub fn catching_or_default(&self) -> f64 {
        self.catching.unwrap_or(DEFAULT_CATCHING)
    }

    #[must_use]
    pub fn tackling_or_default(&self) -> f64 {
        self.tackling.unwrap_or(DEFAULT_TACKLING)
    }

    #[must_use]
    pub fn throw_accuracy_or_default(&self) -> f64 {
        self.throw_accuracy.unwrap_or(DEFAULT_THROW_ACCURACY)
    }

    #[must_use]
    pub fn throw_power_or_default(&self) -> f64 {
        self.throw_power.unwrap_or(DEFAULT_THROW_POWER)
    }
}
