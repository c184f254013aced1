use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    FirstTouchdown,
    PerfectGame,
    Comeback,
    Shutout,
    ChampionshipWin,
    UndefeatedSeason,
}

impl Achievement {
    pub const ALL: [Self; 6] = [
        Self::FirstTouchdown,
        Self::PerfectGame,
        Self::Comeback,
        Self::Shutout,
        Self::ChampionshipWin,
        Self::UndefeatedSeason,
    ];
}

/// Unlock flags. A flag set to `true` stays set until a new game replaces the struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Achievements {
    #[serde(default)]
    first_touchdown: bool,
    #[serde(default)]
    perfect_game: bool,
    #[serde(default)]
    comeback: bool,
    #[serde(default)]
    shutout: bool,
    #[serde(default)]
    championship_win: bool,
    #[serde(default)]
    undefeated_season: bool,
}

impl Achievements {
    const fn flag(&mut self, achievement: Achievement) -> &mut bool {
        match achievement {
            Achievement::FirstTouchdown => &mut self.first_touchdown,
            Achievement::PerfectGame => &mut self.perfect_game,
            Achievement::Comeback => &mut self.comeback,
            Achievement::Shutout => &mut self.shutout,
            Achievement::ChampionshipWin => &mut self.championship_win,
            Achievement::UndefeatedSeason => &mut self.undefeated_season,
        }
    }

    #[must_use]
    pub const fn is_unlocked(&self, achievement: Achievement) -> bool {
        match achievement {
            Achievement::FirstTouchdown => self.first_touchdown,
            Achievement::PerfectGame => self.perfect_game,
            Achievement::Comeback => self.comeback,
            Achievement::Shutout => self.shutout,
            Achievement::ChampionshipWin => self.championship_win,
            Achievement::UndefeatedSeason => self.undefeated_season,
        }
    }

    /// Set a flag. Returns `true` only when it was previously locked.
    pub const fn unlock(&mut self, achievement: Achievement) -> bool {
        let flag = self.flag(achievement);
        let newly = !*flag;
        *flag = true;
        newly
    }

    pub fn unlocked(&self) -> impl Iterator<Item = Achievement> + '_ {
        Achievement::ALL
            .into_iter()
            .filter(|achievement| self.is_unlocked(*achievement))
    }

    /// True when every flag set in `earlier` is still set here.
    #[must_use]
    pub fn supersedes(&self, earlier: &Self) -> bool {
        earlier.unlocked().all(|achievement| self.is_unlocked(achievement))
    }
}
