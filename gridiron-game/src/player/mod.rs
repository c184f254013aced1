//! Match-level player actor: movement, stamina, special moves and possession hooks.
mod ai;

pub use ai::{AiOutcome, AiState, FieldView, PlayerSnapshot, Route};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::{
    DEFAULT_BASE_SPEED, JUKE_SPEED, JUKE_STAMINA_COST, SPIN_STAMINA_COST, SPRINT_MIN_STAMINA,
    SPRINT_MULTIPLIER, STAMINA_MAX, STAMINA_RECOVERY_PER_TICK, STAMINA_SPRINT_DRAIN_PER_TICK,
    STIFF_ARM_STAMINA_COST, TACKLE_RANGE,
};
use crate::geometry::Vec2;
use crate::numbers::u64_to_f64;
use crate::outcome::roll_rating;
use crate::profile::PlayerProfile;
use crate::ratings::MatchRatings;
use crate::season::DifficultyProfile;
use crate::skill::Position;

/// Identifier of a player within one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Offense,
    Defense,
}

/// Horizontal facing used for the carry offset and sprite flipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Posture {
    #[default]
    Idle,
    Running,
    Throwing,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlayerError {
    #[error("insufficient stamina: need {required:.1}, have {available:.1}")]
    InsufficientStamina { required: f64, available: f64 },
    #[error("player does not have the ball")]
    NoPossession,
    #[error("tackle target is not carrying the ball")]
    TargetNotCarrier,
    #[error("tackle target out of range ({distance:.1} >= {range:.1})")]
    OutOfRange { distance: f64, range: f64 },
}

/// Throw parameters handed to the ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowParams {
    /// Accuracy in `[0, 1]`.
    pub accuracy: f64,
    /// Power multiplier, nominally `[0, 1]`.
    pub power: f64,
    pub distance: f64,
}

/// Per-match counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchStats {
    pub carries: u32,
    pub catches: u32,
    pub drops: u32,
    pub throws: u32,
    pub tackles: u32,
    pub missed_tackles: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntity {
    id: PlayerId,
    position: Position,
    side: TeamSide,
    pub at: Vec2,
    pub velocity: Vec2,
    facing: Facing,
    posture: Posture,
    stamina: f64,
    base_speed: f64,
    current_speed: f64,
    sprinting: bool,
    has_ball: bool,
    ratings: MatchRatings,
    ai_state: AiState,
    /// Human-controlled players skip the AI step.
    pub is_ai: bool,
    stats: MatchStats,
}

impl PlayerEntity {
    /// Pickup player with the arcade rating table for `position`.
    #[must_use]
    pub fn new(id: PlayerId, position: Position, side: TeamSide, at: Vec2) -> Self {
        Self::with_ratings(id, position, side, at, MatchRatings::for_position(position))
    }

    /// Player built from a roster profile.
    #[must_use]
    pub fn from_profile(id: PlayerId, profile: &PlayerProfile, side: TeamSide, at: Vec2) -> Self {
        Self::with_ratings(
            id,
            profile.position,
            side,
            at,
            MatchRatings::from_stats(&profile.stats),
        )
    }

    #[must_use]
    pub fn with_ratings(
        id: PlayerId,
        position: Position,
        side: TeamSide,
        at: Vec2,
        ratings: MatchRatings,
    ) -> Self {
        let base_speed = if ratings.speed > 0.0 {
            ratings.base_speed()
        } else {
            DEFAULT_BASE_SPEED
        };
        Self {
            id,
            position,
            side,
            at,
            velocity: Vec2::ZERO,
            facing: Facing::default(),
            posture: Posture::Idle,
            stamina: STAMINA_MAX,
            base_speed,
            current_speed: base_speed,
            sprinting: false,
            has_ball: false,
            ratings,
            ai_state: AiState::Idle,
            is_ai: true,
            stats: MatchStats::default(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn side(&self) -> TeamSide {
        self.side
    }

    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    #[must_use]
    pub const fn posture(&self) -> Posture {
        self.posture
    }

    #[must_use]
    pub const fn stamina(&self) -> f64 {
        self.stamina
    }

    #[must_use]
    pub const fn base_speed(&self) -> f64 {
        self.base_speed
    }

    #[must_use]
    pub const fn current_speed(&self) -> f64 {
        self.current_speed
    }

    #[must_use]
    pub const fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    #[must_use]
    pub const fn has_ball(&self) -> bool {
        self.has_ball
    }

    #[must_use]
    pub const fn ratings(&self) -> &MatchRatings {
        &self.ratings
    }

    #[must_use]
    pub const fn ai_state(&self) -> &AiState {
        &self.ai_state
    }

    #[must_use]
    pub const fn stats(&self) -> &MatchStats {
        &self.stats
    }

    pub(crate) const fn stats_mut(&mut self) -> &mut MatchStats {
        &mut self.stats
    }

    /// Replace the AI assignment. The player never changes it on its own.
    pub fn assign(&mut self, state: AiState) {
        self.ai_state = state;
    }

    /// Scale a CPU player's speed by the difficulty profile.
    pub fn apply_difficulty(&mut self, difficulty: &DifficultyProfile) {
        self.current_speed = if self.is_ai {
            self.base_speed * difficulty.cpu_speed
        } else {
            self.base_speed
        };
    }

    /// Move along `direction`. A zero direction stops the player.
    pub fn run(&mut self, direction: Vec2) {
        if self.stamina <= 0.0 {
            self.sprinting = false;
        }
        let Some(unit) = direction.normalized() else {
            self.stop();
            return;
        };

        let mut speed = self.current_speed;
        if self.sprinting && self.stamina > 0.0 {
            speed *= SPRINT_MULTIPLIER;
            self.stamina = (self.stamina - STAMINA_SPRINT_DRAIN_PER_TICK).max(0.0);
            if self.stamina <= 0.0 {
                self.sprinting = false;
            }
        }

        self.velocity = unit * speed;
        self.posture = Posture::Running;
        if unit.x < 0.0 {
            self.facing = Facing::Left;
        } else if unit.x > 0.0 {
            self.facing = Facing::Right;
        }
    }

    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
        self.posture = Posture::Idle;
    }

    /// Request sprinting. Only takes effect above the sprint stamina floor.
    pub fn sprint(&mut self, enable: bool) {
        self.sprinting = enable && self.stamina > SPRINT_MIN_STAMINA;
    }

    /// Per-tick stamina recovery while not sprinting.
    pub fn recover(&mut self) {
        if !self.sprinting && self.stamina < STAMINA_MAX {
            self.stamina = (self.stamina + STAMINA_RECOVERY_PER_TICK).min(STAMINA_MAX);
        }
    }

    /// Advance position by the current velocity over `delta_ms`.
    pub fn integrate(&mut self, delta_ms: u64) {
        let seconds = u64_to_f64(delta_ms) / 1000.0;
        self.at += self.velocity * seconds;
    }

    fn spend_stamina(&mut self, cost: f64) -> Result<(), PlayerError> {
        if self.stamina < cost {
            return Err(PlayerError::InsufficientStamina {
                required: cost,
                available: self.stamina,
            });
        }
        self.stamina -= cost;
        Ok(())
    }

    /// Lateral burst along `direction`.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::InsufficientStamina`] below the juke cost.
    pub fn juke(&mut self, direction: Vec2) -> Result<(), PlayerError> {
        self.spend_stamina(JUKE_STAMINA_COST)?;
        let unit = direction
            .normalized()
            .unwrap_or_else(|| Vec2::new(0.0, -self.facing.sign()));
        self.velocity = unit * JUKE_SPEED;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`PlayerError::InsufficientStamina`] below the spin cost.
    pub fn spin(&mut self) -> Result<(), PlayerError> {
        self.spend_stamina(SPIN_STAMINA_COST)
    }

    /// # Errors
    ///
    /// Returns [`PlayerError::NoPossession`] without the ball, or
    /// [`PlayerError::InsufficientStamina`] below the stiff-arm cost.
    pub fn stiff_arm(&mut self) -> Result<(), PlayerError> {
        if !self.has_ball {
            return Err(PlayerError::NoPossession);
        }
        self.spend_stamina(STIFF_ARM_STAMINA_COST)
    }

    pub(crate) const fn receive_ball(&mut self) {
        self.has_ball = true;
    }

    pub(crate) const fn release_possession(&mut self) {
        self.has_ball = false;
    }

    /// Release the ball toward `target` and report the throw parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NoPossession`] when the player is not carrying.
    pub fn throw_ball(&mut self, target: Vec2) -> Result<ThrowParams, PlayerError> {
        let params = self.throw_params(target)?;
        self.release_possession();
        self.commit_throw();
        Ok(params)
    }

    /// Throw parameters toward `target` without touching any state.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::NoPossession`] when the player is not carrying.
    pub fn throw_params(&self, target: Vec2) -> Result<ThrowParams, PlayerError> {
        if !self.has_ball {
            return Err(PlayerError::NoPossession);
        }
        Ok(ThrowParams {
            accuracy: self.ratings.throw_accuracy_or_default() / 100.0,
            power: self.ratings.throw_power_or_default() / 100.0,
            distance: self.at.distance_to(target),
        })
    }

    pub(crate) const fn commit_throw(&mut self) {
        self.posture = Posture::Throwing;
        self.stats.throws += 1;
    }

    /// Roll the catching rating; success grants possession.
    pub fn catch_ball<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if roll_rating(self.ratings.catching_or_default(), rng) {
            self.stats.catches += 1;
            self.receive_ball();
            true
        } else {
            self.stats.drops += 1;
            false
        }
    }

    /// Resolve a tackle attempt on `target`. Possession is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::TargetNotCarrier`] if the target lacks the ball,
    /// or [`PlayerError::OutOfRange`] if it is not within tackle range.
    pub fn tackle<R: Rng + ?Sized>(
        &mut self,
        target: &Self,
        rng: &mut R,
    ) -> Result<bool, PlayerError> {
        self.tackle_at(target.at, target.has_ball, rng)
    }

    fn tackle_at<R: Rng + ?Sized>(
        &mut self,
        target_at: Vec2,
        target_has_ball: bool,
        rng: &mut R,
    ) -> Result<bool, PlayerError> {
        if !target_has_ball {
            return Err(PlayerError::TargetNotCarrier);
        }
        let distance = self.at.distance_to(target_at);
        if distance >= TACKLE_RANGE {
            return Err(PlayerError::OutOfRange {
                distance,
                range: TACKLE_RANGE,
            });
        }
        let made = roll_rating(self.ratings.tackling_or_default(), rng);
        if made {
            self.stats.tackles += 1;
        } else {
            self.stats.missed_tackles += 1;
        }
        Ok(made)
    }

    /// One frame: stamina recovery, then the AI step for CPU players.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        view: &FieldView<'_>,
        rng: &mut R,
    ) -> Option<AiOutcome> {
        self.recover();
        if self.is_ai {
            self.update_ai(view, rng)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::fixed_roll;

    fn qb() -> PlayerEntity {
        PlayerEntity::new(PlayerId(1), Position::Quarterback, TeamSide::Offense, Vec2::ZERO)
    }

    fn receiver_with_catching(catching: f64) -> PlayerEntity {
        let ratings = MatchRatings {
            catching: Some(catching),
            ..MatchRatings::default()
        };
        PlayerEntity::with_ratings(
            PlayerId(2),
            Position::WideReceiver,
            TeamSide::Offense,
            Vec2::ZERO,
            ratings,
        )
    }

    #[test]
    fn base_speed_comes_from_ratings() {
        assert!((qb().base_speed() - 130.0).abs() < 1e-9);
    }

    #[test]
    fn run_normalizes_and_faces_direction() {
        let mut p = qb();
        p.run(Vec2::new(-3.0, 4.0));
        assert!((p.velocity.length() - 130.0).abs() < 1e-9);
        assert_eq!(p.facing(), Facing::Left);
        assert_eq!(p.posture(), Posture::Running);
        p.run(Vec2::ZERO);
        assert!(p.velocity.is_zero());
        assert_eq!(p.posture(), Posture::Idle);
    }

    #[test]
    fn sprinting_drains_until_cancelled() {
        let mut p = qb();
        p.sprint(true);
        assert!(p.is_sprinting());
        p.run(Vec2::new(1.0, 0.0));
        assert!((p.velocity.x - 195.0).abs() < 1e-9);
        assert!((p.stamina() - 99.7).abs() < 1e-9);

        p.stamina = 0.2;
        p.run(Vec2::new(1.0, 0.0));
        assert!(p.stamina().abs() < f64::EPSILON);
        assert!(!p.is_sprinting());
        p.sprint(true);
        assert!(!p.is_sprinting());
    }

    #[test]
    fn recovery_clamps_to_max() {
        let mut p = qb();
        p.stamina = 99.8;
        p.recover();
        assert!((p.stamina() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn moves_only_spend_stamina_on_success() {
        let mut p = qb();
        p.stamina = 14.0;
        assert!(matches!(
            p.spin(),
            Err(PlayerError::InsufficientStamina { .. })
        ));
        assert!((p.stamina() - 14.0).abs() < f64::EPSILON);
        assert_eq!(p.stiff_arm(), Err(PlayerError::NoPossession));
        p.juke(Vec2::new(0.0, 2.0)).unwrap();
        assert!((p.stamina() - 4.0).abs() < f64::EPSILON);
        assert!((p.velocity.y - 200.0).abs() < 1e-9);
        assert!(p.juke(Vec2::new(0.0, 1.0)).is_err());
        assert!(p.stamina() >= 0.0);
    }

    #[test]
    fn stiff_arm_needs_the_ball() {
        let mut p = qb();
        p.receive_ball();
        p.stiff_arm().unwrap();
        assert!((p.stamina() - 88.0).abs() < f64::EPSILON);
    }

    #[test]
    fn throw_reports_params_and_clears_possession() {
        let mut p = qb();
        assert_eq!(p.throw_ball(Vec2::new(30.0, 40.0)), Err(PlayerError::NoPossession));
        p.receive_ball();
        let params = p.throw_ball(Vec2::new(30.0, 40.0)).unwrap();
        assert!((params.accuracy - 0.82).abs() < 1e-9);
        assert!((params.power - 0.85).abs() < 1e-9);
        assert!((params.distance - 50.0).abs() < 1e-9);
        assert!(!p.has_ball());
    }

    #[test]
    fn catch_with_rating_80() {
        let mut receiver = receiver_with_catching(80.0);
        assert!(receiver.catch_ball(&mut fixed_roll(0.5)));
        assert!(receiver.has_ball());

        let mut receiver = receiver_with_catching(80.0);
        assert!(!receiver.catch_ball(&mut fixed_roll(0.9)));
        assert!(!receiver.has_ball());
        assert_eq!(receiver.stats().drops, 1);
    }

    #[test]
    fn unrated_players_roll_against_the_default() {
        let mut passer = qb();
        assert!(passer.catch_ball(&mut fixed_roll(0.49)));
        let mut passer = qb();
        assert!(!passer.catch_ball(&mut fixed_roll(0.51)));

        let mut carrier = PlayerEntity::new(
            PlayerId(2),
            Position::RunningBack,
            TeamSide::Defense,
            Vec2::new(5.0, 0.0),
        );
        carrier.receive_ball();
        let mut tackler = qb();
        assert_eq!(tackler.tackle(&carrier, &mut fixed_roll(0.49)), Ok(true));
        assert_eq!(tackler.tackle(&carrier, &mut fixed_roll(0.51)), Ok(false));
        assert_eq!(tackler.stats().tackles, 1);
        assert_eq!(tackler.stats().missed_tackles, 1);
    }

    #[test]
    fn tackle_requires_carrier_in_range() {
        let mut lb = PlayerEntity::new(
            PlayerId(9),
            Position::Linebacker,
            TeamSide::Defense,
            Vec2::new(10.0, 0.0),
        );
        let mut carrier = qb();
        assert_eq!(
            lb.tackle(&carrier, &mut fixed_roll(0.0)),
            Err(PlayerError::TargetNotCarrier)
        );
        carrier.receive_ball();
        assert_eq!(lb.tackle(&carrier, &mut fixed_roll(0.5)), Ok(true));
        assert_eq!(lb.tackle(&carrier, &mut fixed_roll(0.95)), Ok(false));
        lb.at = Vec2::new(30.0, 0.0);
        assert!(matches!(
            lb.tackle(&carrier, &mut fixed_roll(0.0)),
            Err(PlayerError::OutOfRange { .. })
        ));
        assert!(carrier.has_ball());
    }

    #[test]
    fn cpu_speed_scales_with_difficulty() {
        let mut p = qb();
        p.apply_difficulty(&DifficultyProfile::hard());
        assert!((p.current_speed() - 156.0).abs() < 1e-9);
        p.is_ai = false;
        p.apply_difficulty(&DifficultyProfile::hard());
        assert!((p.current_speed() - 130.0).abs() < 1e-9);
    }
}
