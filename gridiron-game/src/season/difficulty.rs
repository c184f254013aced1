use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
    Extreme,
}

impl DifficultyLevel {
    pub const ALL: [Self; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Extreme];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Extreme => "extreme",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// CPU tuning knobs selected by a difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub level: DifficultyLevel,
    pub cpu_skill: f64,
    pub cpu_speed: f64,
    pub cpu_reaction: f64,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::for_level(DifficultyLevel::default())
    }
}

impl DifficultyProfile {
    #[must_use]
    pub const fn for_level(level: DifficultyLevel) -> Self {
        let (cpu_skill, cpu_speed, cpu_reaction) = match level {
            DifficultyLevel::Easy => (0.3, 0.8, 0.7),
            DifficultyLevel::Medium => (0.5, 1.0, 1.0),
            DifficultyLevel::Hard => (0.7, 1.2, 1.3),
            DifficultyLevel::Extreme => (0.9, 1.5, 1.6),
        };
        Self {
            level,
            cpu_skill,
            cpu_speed,
            cpu_reaction,
        }
    }

    #[must_use]
    pub const fn easy() -> Self {
        Self::for_level(DifficultyLevel::Easy)
    }

    #[must_use]
    pub const fn medium() -> Self {
        Self::for_level(DifficultyLevel::Medium)
    }

    #[must_use]
    pub const fn hard() -> Self {
        Self::for_level(DifficultyLevel::Hard)
    }

    #[must_use]
    pub const fn extreme() -> Self {
        Self::for_level(DifficultyLevel::Extreme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_to_cpu_knobs() {
        let easy = DifficultyProfile::easy();
        assert!((easy.cpu_speed - 0.8).abs() < f64::EPSILON);
        let extreme = DifficultyProfile::extreme();
        assert!((extreme.cpu_reaction - 1.6).abs() < f64::EPSILON);
        assert_eq!(DifficultyProfile::default().level, DifficultyLevel::Medium);
    }

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!("HARD".parse::<DifficultyLevel>(), Ok(DifficultyLevel::Hard));
        assert!("insane".parse::<DifficultyLevel>().is_err());
    }
}
