//! Gridiron Game Engine
//!
//! Platform-agnostic core for an arcade football game: player and ball
//! entities, the per-frame match driver, and the season simulator.
//! This crate provides all game mechanics without UI or platform-specific dependencies.

pub mod ball;
pub mod clock;
pub(crate) mod constants;
pub mod events;
pub mod field;
pub mod geometry;
pub mod numbers;
pub mod outcome;
pub mod player;
pub mod profile;
pub mod ratings;
pub mod rng;
pub mod scoreboard;
pub mod season;
pub mod seed;
pub mod skill;

// Re-export commonly used types
pub use ball::{BallEntity, BallError, BallPhase, BallState, FlightResult, KickArc, PassPath};
pub use clock::MatchClock;
pub use events::{Discard, EventLog, EventSink, GameEvent, SoundCue, SoundLog, SoundSink};
pub use field::{Field, FieldConfig, FieldError};
pub use geometry::Vec2;
pub use outcome::{CatchResolution, roll_success};
pub use player::{
    AiOutcome, AiState, Facing, FieldView, MatchStats, PlayerEntity, PlayerError, PlayerId,
    PlayerSnapshot, Posture, Route, TeamSide, ThrowParams,
};
pub use profile::{Injury, PlayerProfile, Roster, RosterError, generate_player};
pub use ratings::MatchRatings;
pub use rng::{RngBundle, fixed_roll};
pub use scoreboard::{ClockEvent, ScoreSide, Scoreboard};
pub use season::{
    Achievement, Achievements, DifficultyLevel, DifficultyProfile, Facilities, Facility,
    GameReport, GameStats, LeagueResult, PlayerTeam, SaveError, SaveSnapshot, SeasonError,
    SeasonSimulator, SeasonState, SeasonWarning, StandingsRow, TeamRecord, WeekReport,
};
pub use seed::{decode_to_seed, encode_friendly, generate_code_from_entropy, parse_share_code};
pub use skill::{Position, PositionStats, derive_position_stats};

/// Trait for abstracting save/load operations
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store a serialized season under `save_name`, replacing any previous save.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be written.
    fn save_game(&self, save_name: &str, json: &str) -> Result<(), Self::Error>;

    /// Read back the serialized season stored under `save_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the save exists but cannot be read.
    fn load_game(&self, save_name: &str) -> Result<Option<String>, Self::Error>;

    /// Delete saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Creates seeded seasons and moves them in and out of a storage backend.
pub struct GameEngine<S>
where
    S: GameStorage,
{
    storage: S,
}

impl<S> GameEngine<S>
where
    S: GameStorage,
{
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Start a season from `seed` with a generated starting lineup.
    ///
    /// # Errors
    ///
    /// Returns an error if the lineup does not fit on the roster.
    pub fn create_season(&self, seed: u64) -> Result<SeasonSimulator, SeasonError> {
        let mut season = SeasonSimulator::new(seed);
        season.generate_roster()?;
        Ok(season)
    }

    /// Serialize `season` into slot `save_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn save_season<E: EventSink>(
        &self,
        save_name: &str,
        season: &SeasonSimulator<E>,
    ) -> Result<(), anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let json = season.save_game()?;
        self.storage.save_game(save_name, &json).map_err(Into::into)
    }

    /// Load slot `save_name` into a fresh season whose random streams come
    /// from `seed`. Returns `Ok(None)` for an empty slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails or the save is rejected.
    pub fn load_season(
        &self,
        save_name: &str,
        seed: u64,
    ) -> Result<Option<SeasonSimulator>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let Some(json) = self.storage.load_game(save_name).map_err(Into::into)? else {
            return Ok(None);
        };
        let mut season = SeasonSimulator::new(seed);
        season.load_game(&json)?;
        Ok(Some(season))
    }

    /// # Errors
    ///
    /// Returns an error if the storage backend cannot delete the slot.
    pub fn delete_save(&self, save_name: &str) -> Result<(), S::Error> {
        self.storage.delete_save(save_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStorage {
        saves: Rc<RefCell<HashMap<String, String>>>,
    }

    impl GameStorage for MemoryStorage {
        type Error = Infallible;

        fn save_game(&self, save_name: &str, json: &str) -> Result<(), Self::Error> {
            self.saves
                .borrow_mut()
                .insert(save_name.to_string(), json.to_string());
            Ok(())
        }

        fn load_game(&self, save_name: &str) -> Result<Option<String>, Self::Error> {
            Ok(self.saves.borrow().get(save_name).cloned())
        }

        fn delete_save(&self, save_name: &str) -> Result<(), Self::Error> {
            self.saves.borrow_mut().remove(save_name);
            Ok(())
        }
    }

    #[test]
    fn engine_creates_and_roundtrips_season() {
        let engine = GameEngine::new(MemoryStorage::default());
        let mut season = engine.create_season(0xABCD).unwrap();
        assert_eq!(season.roster().len(), 24);
        season.record_game_result(21, 14, "Cowboys");
        season.advance_week();
        engine.save_season("slot-one", &season).unwrap();

        let loaded = engine
            .load_season("slot-one", 0xABCD)
            .unwrap()
            .expect("save exists");
        assert_eq!(loaded.season(), season.season());
        assert_eq!(loaded.player_team(), season.player_team());
        assert_eq!(loaded.roster(), season.roster());
        assert_eq!(loaded.league(), season.league());
        assert!(engine.load_season("missing-slot", 1).unwrap().is_none());
    }

    #[test]
    fn corrupt_slot_is_an_error() {
        let storage = MemoryStorage::default();
        storage.save_game("bad", "{\"version\": 1").unwrap();
        let engine = GameEngine::new(storage);
        assert!(engine.load_season("bad", 1).is_err());
        engine.delete_save("bad").unwrap();
        assert!(engine.load_season("bad", 1).unwrap().is_none());
    }
}
