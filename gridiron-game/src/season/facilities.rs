use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::FACILITY_MAX_LEVEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facility {
    Training,
    Medical,
    Stadium,
}

impl Facility {
    pub const ALL: [Self; 3] = [Self::Training, Self::Medical, Self::Stadium];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Medical => "medical",
            Self::Stadium => "stadium",
        }
    }

    /// Upgrade price per current level, index 0 for level 1.
    #[must_use]
    pub const fn cost_table(self) -> [u64; 4] {
        match self {
            Self::Training => [1_000_000, 2_500_000, 5_000_000, 10_000_000],
            Self::Medical => [750_000, 2_000_000, 4_000_000, 8_000_000],
            Self::Stadium => [2_000_000, 5_000_000, 10_000_000, 20_000_000],
        }
    }

    /// Cost to upgrade from `level`, or `None` at the top tier.
    #[must_use]
    pub fn upgrade_cost(self, level: u8) -> Option<u64> {
        if level >= FACILITY_MAX_LEVEL {
            return None;
        }
        let index = usize::from(level.max(1) - 1);
        self.cost_table().get(index).copied()
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facility {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|facility| facility.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// Facility tiers, each in `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facilities {
    pub training: u8,
    pub medical: u8,
    pub stadium: u8,
}

impl Default for Facilities {
    fn default() -> Self {
        Self {
            training: 1,
            medical: 1,
            stadium: 1,
        }
    }
}

impl Facilities {
    #[must_use]
    pub const fn level(&self, facility: Facility) -> u8 {
        match facility {
            Facility::Training => self.training,
            Facility::Medical => self.medical,
            Facility::Stadium => self.stadium,
        }
    }

    pub(crate) const fn level_mut(&mut self, facility: Facility) -> &mut u8 {
        match facility {
            Facility::Training => &mut self.training,
            Facility::Medical => &mut self.medical,
            Facility::Stadium => &mut self.stadium,
        }
    }

    pub(crate) fn all_valid(&self) -> bool {
        Facility::ALL
            .into_iter()
            .all(|facility| (1..=FACILITY_MAX_LEVEL).contains(&self.level(facility)))
    }
}
