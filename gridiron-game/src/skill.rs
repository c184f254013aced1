//! Skill model: position attribute sets and salary derived from a skill rating.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{SALARY_BASE, SALARY_SKILL_DIVISOR, SKILL_MAX_GENERATED, SKILL_MIN_GENERATED};
use crate::numbers::floor_f64_to_u64;

/// Highest legal skill rating.
pub const SKILL_CAP: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "OL")]
    OffensiveLine,
    #[serde(rename = "DL")]
    DefensiveLine,
    #[serde(rename = "LB")]
    Linebacker,
    #[serde(rename = "DB")]
    DefensiveBack,
    #[serde(rename = "K")]
    Kicker,
}

impl Position {
    pub const ALL: [Self; 9] = [
        Self::Quarterback,
        Self::RunningBack,
        Self::WideReceiver,
        Self::TightEnd,
        Self::OffensiveLine,
        Self::DefensiveLine,
        Self::Linebacker,
        Self::DefensiveBack,
        Self::Kicker,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quarterback => "QB",
            Self::RunningBack => "RB",
            Self::WideReceiver => "WR",
            Self::TightEnd => "TE",
            Self::OffensiveLine => "OL",
            Self::DefensiveLine => "DL",
            Self::Linebacker => "LB",
            Self::DefensiveBack => "DB",
            Self::Kicker => "K",
        }
    }

    #[must_use]
    pub const fn is_kicker(self) -> bool {
        matches!(self, Self::Kicker)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|position| position.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// Attribute set derived from a skill rating, tagged by position family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum PositionStats {
    Quarterback {
        speed: f64,
        accuracy: f64,
        power: f64,
        vision: f64,
    },
    RunningBack {
        speed: f64,
        power: f64,
        agility: f64,
        vision: f64,
    },
    WideReceiver {
        speed: f64,
        catching: f64,
        agility: f64,
        jump_ball: f64,
    },
    /// Tight ends, linemen, linebackers, defensive backs and kickers.
    Standard {
        speed: f64,
        strength: f64,
        stamina: f64,
        technique: f64,
    },
}

impl PositionStats {
    #[must_use]
    pub const fn speed(&self) -> f64 {
        match *self {
            Self::Quarterback { speed, .. }
            | Self::RunningBack { speed, .. }
            | Self::WideReceiver { speed, .. }
            | Self::Standard { speed, .. } => speed,
        }
    }

    #[must_use]
    pub const fn catching(&self) -> Option<f64> {
        match *self {
            Self::WideReceiver { catching, .. } => Some(catching),
            _ => None,
        }
    }

    #[must_use]
    pub const fn throw_accuracy(&self) -> Option<f64> {
        match *self {
            Self::Quarterback { accuracy, .. } => Some(accuracy),
            _ => None,
        }
    }

    #[must_use]
    pub const fn throw_power(&self) -> Option<f64> {
        match *self {
            Self::Quarterback { power, .. } => Some(power),
            _ => None,
        }
    }

    #[must_use]
    pub const fn agility(&self) -> Option<f64> {
        match *self {
            Self::RunningBack { agility, .. } | Self::WideReceiver { agility, .. } => Some(agility),
            _ => None,
        }
    }

    #[must_use]
    pub const fn strength(&self) -> Option<f64> {
        match *self {
            Self::Standard { strength, .. } => Some(strength),
            _ => None,
        }
    }
}

/// Uniform integer draw in the generated-skill band.
pub fn random_skill(rng: &mut (impl Rng + ?Sized)) -> u8 {
    rng.gen_range(SKILL_MIN_GENERATED..=SKILL_MAX_GENERATED)
}

/// Derive the attribute set for `position` at `skill`.
#[must_use]
pub fn derive_position_stats(position: Position, skill: u8) -> PositionStats {
    let s = f64::from(skill.min(SKILL_CAP));
    match position {
        Position::Quarterback => PositionStats::Quarterback {
            speed: s.mul_add(0.6, 20.0),
            accuracy: s.mul_add(0.8, 10.0),
            power: s.mul_add(0.7, 15.0),
            vision: s * 0.9,
        },
        Position::RunningBack => PositionStats::RunningBack {
            speed: s * 0.9,
            power: s.mul_add(0.7, 15.0),
            agility: s.mul_add(0.8, 10.0),
            vision: s.mul_add(0.6, 20.0),
        },
        Position::WideReceiver => PositionStats::WideReceiver {
            speed: s * 0.95,
            catching: s.mul_add(0.85, 5.0),
            agility: s.mul_add(0.8, 10.0),
            jump_ball: s.mul_add(0.7, 15.0),
        },
        _ => PositionStats::Standard {
            speed: s.mul_add(0.7, 15.0),
            strength: s.mul_add(0.8, 10.0),
            stamina: s.mul_add(0.6, 20.0),
            technique: s.mul_add(0.75, 12.0),
        },
    }
}

/// Derive stats, drawing a skill rating when none is supplied.
pub fn derive_position_stats_or_random(
    position: Position,
    skill: Option<u8>,
    rng: &mut (impl Rng + ?Sized),
) -> (u8, PositionStats) {
    let skill = skill.map_or_else(|| random_skill(rng), |s| s.min(SKILL_CAP));
    (skill, derive_position_stats(position, skill))
}

/// Annual salary for a skill rating.
#[must_use]
pub fn salary_for_skill(skill: u8) -> u64 {
    let multiplier = f64::from(skill.min(SKILL_CAP)) / SALARY_SKILL_DIVISOR;
    floor_f64_to_u64(SALARY_BASE * multiplier)
}
