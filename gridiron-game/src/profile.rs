//! Roster-level player profiles and roster generation.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CONTRACT_MAX_YEARS, CONTRACT_MIN_YEARS, RETIREMENT_AGE_DEFAULT, RETIREMENT_AGE_KICKER,
    ROOKIE_MAX_AGE, ROOKIE_MIN_AGE, ROSTER_MAX_PLAYERS, STARTING_MORALE,
};
use crate::skill::{Position, PositionStats, derive_position_stats_or_random, salary_for_skill};

const FIRST_NAMES: &[&str] = &[
    "Mike", "John", "James", "Robert", "David", "Tom", "Aaron", "Patrick", "Josh", "Lamar",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Jones", "Brown", "Davis", "Miller", "Wilson", "Moore",
    "Taylor",
];

/// Starting lineup produced by [`generate_starting_lineup`].
pub const STARTING_LINEUP: &[(Position, usize)] = &[
    (Position::Quarterback, 1),
    (Position::RunningBack, 2),
    (Position::WideReceiver, 3),
    (Position::TightEnd, 1),
    (Position::OffensiveLine, 5),
    (Position::DefensiveLine, 4),
    (Position::Linebacker, 3),
    (Position::DefensiveBack, 4),
    (Position::Kicker, 1),
];

/// An injury keeping a player out for a number of weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Injury {
    pub description: String,
    pub weeks_remaining: u8,
}

/// Persistent roster entry. Never mutated while a match is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub first_name: String,
    pub last_name: String,
    pub number: u8,
    pub position: Position,
    pub skill: u8,
    pub age: u8,
    pub salary: u64,
    /// Remaining contract length in years.
    pub contract_years: u8,
    pub morale: u8,
    pub stats: PositionStats,
    #[serde(default)]
    pub injury: Option<Injury>,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub games_missed: u32,
}

impl PlayerProfile {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age at which this player leaves the roster.
    #[must_use]
    pub const fn retirement_age(&self) -> u8 {
        if self.position.is_kicker() {
            RETIREMENT_AGE_KICKER
        } else {
            RETIREMENT_AGE_DEFAULT
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.injury.is_none()
    }
}

/// Create a rookie at `position`; a missing skill is drawn from the generated band.
pub fn generate_player<R: Rng + ?Sized>(
    position: Position,
    skill: Option<u8>,
    rng: &mut R,
) -> PlayerProfile {
    let (skill, stats) = derive_position_stats_or_random(position, skill, rng);
    let first_name = FIRST_NAMES.choose(rng).copied().unwrap_or("Rookie");
    let last_name = LAST_NAMES.choose(rng).copied().unwrap_or("Player");
    PlayerProfile {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        number: rng.gen_range(1..=99),
        position,
        skill,
        age: rng.gen_range(ROOKIE_MIN_AGE..=ROOKIE_MAX_AGE),
        salary: salary_for_skill(skill),
        contract_years: rng.gen_range(CONTRACT_MIN_YEARS..=CONTRACT_MAX_YEARS),
        morale: STARTING_MORALE,
        stats,
        injury: None,
        games_played: 0,
        games_missed: 0,
    }
}

/// Generate one player per slot of [`STARTING_LINEUP`].
pub fn generate_starting_lineup<R: Rng + ?Sized>(rng: &mut R) -> Vec<PlayerProfile> {
    STARTING_LINEUP
        .iter()
        .flat_map(|&(position, count)| std::iter::repeat_n(position, count))
        .map(|position| generate_player(position, None, rng))
        .collect()
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("roster is full ({capacity} players)")]
    RosterFull { capacity: usize },
}

/// Team roster capped at the league limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: Vec<PlayerProfile>,
}

impl Roster {
    pub const CAPACITY: usize = ROSTER_MAX_PLAYERS;

    #[must_use]
    pub const fn new() -> Self {
        Self {
            players: Vec::new(),
        }
    }

    /// Add a player.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::RosterFull`] when the roster is at capacity.
    pub fn sign(&mut self, player: PlayerProfile) -> Result<(), RosterError> {
        if self.players.len() >= Self::CAPACITY {
            return Err(RosterError::RosterFull {
                capacity: Self::CAPACITY,
            });
        }
        self.players.push(player);
        Ok(())
    }

    /// Retire players entering the season at or past their threshold and
    /// age the rest one year.
    ///
    /// Returns the retired players in roster order, at their final age.
    pub fn age_one_season(&mut self) -> Vec<PlayerProfile> {
        let mut retired = Vec::new();
        let mut kept = Vec::with_capacity(self.players.len());
        for mut player in self.players.drain(..) {
            if player.age < player.retirement_age() {
                player.age = player.age.saturating_add(1);
                kept.push(player);
            } else {
                retired.push(player);
            }
        }
        self.players = kept;
        retired
    }

    #[must_use]
    pub fn players(&self) -> &[PlayerProfile] {
        &self.players
    }

    pub fn by_position(&self, position: Position) -> impl Iterator<Item = &PlayerProfile> {
        self.players.iter().filter(move |p| p.position == position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub(crate) fn exceeds_capacity(&self) -> bool {
        self.players.len() > Self::CAPACITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn player_aged(position: Position, age: u8) -> PlayerProfile {
        let mut rng = SmallRng::seed_from_u64(5);
        PlayerProfile {
            age,
            ..generate_player(position, Some(70), &mut rng)
        }
    }

    #[test]
    fn generated_player_fields_are_in_range() {
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..200 {
            let player = generate_player(Position::WideReceiver, None, &mut rng);
            assert!((1..=99).contains(&player.number));
            assert!((21..=30).contains(&player.age));
            assert!((1..=4).contains(&player.contract_years));
            assert!((60..=99).contains(&player.skill));
            assert_eq!(player.morale, 75);
            assert_eq!(player.salary, salary_for_skill(player.skill));
            assert!(FIRST_NAMES.contains(&player.first_name.as_str()));
            assert!(player.is_available());
        }
    }

    #[test]
    fn starting_lineup_fills_every_slot() {
        let mut rng = SmallRng::seed_from_u64(3);
        let lineup = generate_starting_lineup(&mut rng);
        assert_eq!(lineup.len(), 24);
        let receivers = lineup
            .iter()
            .filter(|p| p.position == Position::WideReceiver)
            .count();
        assert_eq!(receivers, 3);
    }

    #[test]
    fn aging_retains_34_and_retires_35() {
        let mut roster = Roster::new();
        roster.sign(player_aged(Position::Linebacker, 34)).unwrap();
        roster.sign(player_aged(Position::Linebacker, 35)).unwrap();
        let retired = roster.age_one_season();
        assert_eq!(retired.len(), 1);
        assert_eq!(retired[0].position, Position::Linebacker);
        assert_eq!(retired[0].age, 35);
        let ages: Vec<u8> = roster.players().iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![35]);
    }

    #[test]
    fn kickers_play_until_forty() {
        let mut roster = Roster::new();
        roster.sign(player_aged(Position::Kicker, 39)).unwrap();
        roster.sign(player_aged(Position::Kicker, 40)).unwrap();
        roster.sign(player_aged(Position::Linebacker, 33)).unwrap();
        let retired = roster.age_one_season();
        let retired_ages: Vec<u8> = retired.iter().map(|p| p.age).collect();
        assert_eq!(retired_ages, vec![40]);
        let ages: Vec<u8> = roster.players().iter().map(|p| p.age).collect();
        assert_eq!(ages, vec![40, 34]);
    }

    #[test]
    fn roster_rejects_player_past_capacity() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut roster = Roster::new();
        for _ in 0..Roster::CAPACITY {
            roster
                .sign(generate_player(Position::OffensiveLine, None, &mut rng))
                .unwrap();
        }
        let extra = generate_player(Position::Kicker, None, &mut rng);
        assert_eq!(
            roster.sign(extra),
            Err(RosterError::RosterFull { capacity: 53 })
        );
        assert_eq!(roster.len(), 53);
    }
}
