//! Ball possession and flight state machine.
//!
//! The ball is shared by every player in a match. Operations that change
//! possession take the match's players so the carrier's `has_ball` flag and
//! the ball's own state always move together.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

use crate::constants::{
    APEX_DISTANCE_DIVISOR, CARRY_OFFSET, CATCH_RADIUS, FUMBLE_JITTER, KICK_GRAVITY,
    KICK_VELOCITY_SCALE, LOOSE_BALL_DAMPING, LOOSE_BALL_REST_SPEED, SPIRAL_INCREMENT,
    THROW_SPEED_SCALE,
};
use crate::geometry::Vec2;
use crate::numbers::u64_to_f64;
use crate::outcome::CatchResolution;
use crate::player::{PlayerEntity, PlayerId};
use crate::rng::unit_roll;

/// Interpolated pass trajectory. Endpoints are captured when the ball is thrown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassPath {
    pub thrower: PlayerId,
    pub target: PlayerId,
    pub start: Vec2,
    pub end: Vec2,
    pub start_ms: u64,
    pub duration_ms: f64,
    pub apex_height: f64,
}

/// Ballistic kick launched from `launch`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KickArc {
    pub kicker: PlayerId,
    pub launch: Vec2,
    pub field_goal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "flight", rename_all = "snake_case")]
pub enum Flight {
    Pass(PassPath),
    Kick(KickArc),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BallState {
    #[default]
    Idle,
    Attached {
        carrier: PlayerId,
    },
    InFlight(Flight),
    Loose,
}

/// Data-free view of [`BallState`] for errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallPhase {
    Idle,
    Attached,
    InFlight,
    Loose,
}

impl BallState {
    #[must_use]
    pub const fn phase(&self) -> BallPhase {
        match self {
            Self::Idle => BallPhase::Idle,
            Self::Attached { .. } => BallPhase::Attached,
            Self::InFlight(_) => BallPhase::InFlight,
            Self::Loose => BallPhase::Loose,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BallError {
    #[error("cannot {operation} while the ball is {from:?}")]
    InvalidTransition {
        from: BallPhase,
        operation: &'static str,
    },
    #[error("ball is already carried by {carrier}")]
    AlreadyAttached { carrier: PlayerId },
    #[error("{player} is not carrying the ball")]
    NotCarrier { player: PlayerId },
    #[error("no player {id} on the field")]
    UnknownPlayer { id: PlayerId },
    #[error("flight needs a positive finite power and a finite angle (got power {power})")]
    InvalidPower { power: f64 },
}

/// How a flight ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FlightResult {
    Caught {
        thrower: PlayerId,
        receiver: PlayerId,
    },
    Incomplete {
        target: PlayerId,
        at: Vec2,
        dropped: bool,
    },
    KickLanded {
        at: Vec2,
        field_goal: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallEntity {
    state: BallState,
    pub at: Vec2,
    pub velocity: Vec2,
    progress: f64,
    rotation: f64,
    last_carrier: Option<PlayerId>,
    catch_resolution: CatchResolution,
}

impl Default for BallEntity {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

fn find(players: &[PlayerEntity], id: PlayerId) -> Result<&PlayerEntity, BallError> {
    players
        .iter()
        .find(|p| p.id() == id)
        .ok_or(BallError::UnknownPlayer { id })
}

fn find_mut(players: &mut [PlayerEntity], id: PlayerId) -> Result<&mut PlayerEntity, BallError> {
    players
        .iter_mut()
        .find(|p| p.id() == id)
        .ok_or(BallError::UnknownPlayer { id })
}

fn release_all(players: &mut [PlayerEntity]) {
    for player in players.iter_mut().filter(|p| p.has_ball()) {
        player.release_possession();
    }
}

impl BallEntity {
    #[must_use]
    pub fn new(at: Vec2) -> Self {
        Self {
            state: BallState::Idle,
            at,
            velocity: Vec2::ZERO,
            progress: 0.0,
            rotation: 0.0,
            last_carrier: None,
            catch_resolution: CatchResolution::default(),
        }
    }

    #[must_use]
    pub fn with_catch_resolution(mut self, resolution: CatchResolution) -> Self {
        self.catch_resolution = resolution;
        self
    }

    #[must_use]
    pub const fn state(&self) -> &BallState {
        &self.state
    }

    #[must_use]
    pub const fn phase(&self) -> BallPhase {
        self.state.phase()
    }

    #[must_use]
    pub const fn carrier(&self) -> Option<PlayerId> {
        match self.state {
            BallState::Attached { carrier } => Some(carrier),
            _ => None,
        }
    }

    #[must_use]
    pub const fn last_carrier(&self) -> Option<PlayerId> {
        self.last_carrier
    }

    #[must_use]
    pub const fn pass_path(&self) -> Option<&PassPath> {
        match &self.state {
            BallState::InFlight(Flight::Pass(path)) => Some(path),
            _ => None,
        }
    }

    /// Flight progress in `[0, 1]`.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Cosmetic spiral angle in radians.
    #[must_use]
    pub const fn rotation(&self) -> f64 {
        self.rotation
    }

    #[must_use]
    pub const fn gravity_enabled(&self) -> bool {
        matches!(self.state, BallState::InFlight(Flight::Kick(_)))
    }

    #[must_use]
    pub const fn catch_resolution(&self) -> CatchResolution {
        self.catch_resolution
    }

    pub const fn set_catch_resolution(&mut self, resolution: CatchResolution) {
        self.catch_resolution = resolution;
    }

    fn clear_transients(&mut self) {
        self.velocity = Vec2::ZERO;
        self.progress = 0.0;
        self.rotation = 0.0;
    }

    /// Hand the ball to `id` from any state. The previous holder loses possession.
    ///
    /// # Errors
    ///
    /// Returns [`BallError::UnknownPlayer`] if `id` is not on the field.
    pub fn attach_to_carrier(
        &mut self,
        players: &mut [PlayerEntity],
        id: PlayerId,
    ) -> Result<(), BallError> {
        find(players, id)?;
        release_all(players);
        let carrier = find_mut(players, id)?;
        carrier.receive_ball();
        carrier.stats_mut().carries += 1;
        self.at = carrier.at + Vec2::new(carrier.facing().sign() * CARRY_OFFSET, 0.0);
        self.state = BallState::Attached { carrier: id };
        self.last_carrier = Some(id);
        self.clear_transients();
        Ok(())
    }

    fn ensure_launchable(&self, player: PlayerId, operation: &'static str) -> Result<(), BallError> {
        match self.state {
            BallState::Idle => Ok(()),
            BallState::Attached { carrier } if carrier == player => Ok(()),
            BallState::Attached { .. } => Err(BallError::NotCarrier { player }),
            BallState::InFlight(_) | BallState::Loose => Err(BallError::InvalidTransition {
                from: self.phase(),
                operation,
            }),
        }
    }

    /// Launch a pass along a straight path from the thrower to where the target stands now.
    ///
    /// # Errors
    ///
    /// Fails if the ball is in flight or loose, held by someone other than
    /// `thrower`, either player is unknown, or `power` is not positive.
    pub fn throw_to(
        &mut self,
        players: &mut [PlayerEntity],
        thrower: PlayerId,
        target: PlayerId,
        power: f64,
        arc: f64,
        now_ms: u64,
    ) -> Result<PassPath, BallError> {
        self.ensure_launchable(thrower, "throw")?;
        if power <= 0.0 || !power.is_finite() {
            return Err(BallError::InvalidPower { power });
        }
        let start = find(players, thrower)?.at;
        let end = find(players, target)?.at;
        find_mut(players, thrower)?.release_possession();

        let distance = start.distance_to(end);
        let path = PassPath {
            thrower,
            target,
            start,
            end,
            start_ms: now_ms,
            duration_ms: distance / (THROW_SPEED_SCALE * power) * 1000.0,
            apex_height: distance / APEX_DISTANCE_DIVISOR * arc,
        };
        debug!(
            "pass {thrower} -> {target}: {distance:.1} units over {:.0} ms",
            path.duration_ms
        );
        self.at = start;
        self.clear_transients();
        self.state = BallState::InFlight(Flight::Pass(path));
        Ok(path)
    }

    /// Launch a ballistic kick at `angle` radians above the horizontal.
    ///
    /// # Errors
    ///
    /// Fails if the ball is in flight or loose, held by someone other than
    /// `kicker`, or the kicker is unknown. A power that is not positive and
    /// finite, or a non-finite angle, is `InvalidPower`.
    pub fn kick(
        &mut self,
        players: &mut [PlayerEntity],
        kicker: PlayerId,
        angle: f64,
        power: f64,
        field_goal: bool,
    ) -> Result<(), BallError> {
        self.ensure_launchable(kicker, "kick")?;
        if power <= 0.0 || !power.is_finite() || !angle.is_finite() {
            return Err(BallError::InvalidPower { power });
        }
        let kicker_entity = find_mut(players, kicker)?;
        kicker_entity.release_possession();
        let launch = kicker_entity.at;

        self.clear_transients();
        self.at = launch;
        self.velocity = Vec2::new(
            angle.cos() * power * KICK_VELOCITY_SCALE,
            -angle.sin() * power * KICK_VELOCITY_SCALE,
        );
        self.state = BallState::InFlight(Flight::Kick(KickArc {
            kicker,
            launch,
            field_goal,
        }));
        debug!("kick by {kicker} (field goal: {field_goal})");
        Ok(())
    }

    /// Knock the ball out of the carrier's hands.
    ///
    /// # Errors
    ///
    /// Returns [`BallError::InvalidTransition`] unless the ball is carried.
    pub fn fumble<R: Rng + ?Sized>(
        &mut self,
        players: &mut [PlayerEntity],
        force: Vec2,
        rng: &mut R,
    ) -> Result<PlayerId, BallError> {
        let BallState::Attached { carrier } = self.state else {
            return Err(BallError::InvalidTransition {
                from: self.phase(),
                operation: "fumble",
            });
        };
        release_all(players);
        let jitter_x = (unit_roll(rng) - 0.5) * 2.0 * FUMBLE_JITTER;
        let jitter_y = (unit_roll(rng) - 0.5) * 2.0 * FUMBLE_JITTER;
        self.clear_transients();
        self.velocity = force + Vec2::new(jitter_x, jitter_y);
        self.state = BallState::Loose;
        debug!("fumble by {carrier}");
        Ok(carrier)
    }

    /// Recover a loose or uncarried ball.
    ///
    /// # Errors
    ///
    /// Returns [`BallError::AlreadyAttached`] if someone is carrying the ball.
    pub fn pick_up(&mut self, players: &mut [PlayerEntity], id: PlayerId) -> Result<(), BallError> {
        if let BallState::Attached { carrier } = self.state {
            return Err(BallError::AlreadyAttached { carrier });
        }
        self.attach_to_carrier(players, id)
    }

    /// Hard reset to `Idle` at `at`.
    pub fn reset(&mut self, players: &mut [PlayerEntity], at: Vec2) {
        release_all(players);
        self.state = BallState::Idle;
        self.at = at;
        self.clear_transients();
    }

    fn make_loose(&mut self) {
        self.state = BallState::Loose;
        self.velocity = Vec2::ZERO;
    }

    /// Resolve the current flight. Never leaves the ball in flight.
    ///
    /// # Errors
    ///
    /// Returns [`BallError::InvalidTransition`] if the ball is not in flight.
    pub fn complete_flight<R: Rng + ?Sized>(
        &mut self,
        players: &mut [PlayerEntity],
        rng: &mut R,
    ) -> Result<FlightResult, BallError> {
        let BallState::InFlight(flight) = self.state else {
            return Err(BallError::InvalidTransition {
                from: self.phase(),
                operation: "complete flight",
            });
        };
        self.rotation = 0.0;
        let path = match flight {
            Flight::Kick(arc) => {
                self.make_loose();
                return Ok(FlightResult::KickLanded {
                    at: self.at,
                    field_goal: arc.field_goal,
                });
            }
            Flight::Pass(path) => path,
        };

        let in_reach = players
            .iter()
            .find(|p| p.id() == path.target)
            .is_some_and(|target| self.at.distance_to(target.at) < CATCH_RADIUS);
        if !in_reach {
            self.make_loose();
            return Ok(FlightResult::Incomplete {
                target: path.target,
                at: self.at,
                dropped: false,
            });
        }

        let caught = match self.catch_resolution {
            CatchResolution::Proximity => {
                if let Ok(receiver) = find_mut(players, path.target) {
                    receiver.stats_mut().catches += 1;
                }
                true
            }
            CatchResolution::SkillRoll => find_mut(players, path.target)?.catch_ball(rng),
        };
        if caught {
            self.attach_to_carrier(players, path.target)?;
            Ok(FlightResult::Caught {
                thrower: path.thrower,
                receiver: path.target,
            })
        } else {
            release_all(players);
            self.make_loose();
            Ok(FlightResult::Incomplete {
                target: path.target,
                at: self.at,
                dropped: true,
            })
        }
    }

    /// Per-tick update: flight interpolation, kick ballistics, loose-ball
    /// decay, or following the carrier.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        players: &mut [PlayerEntity],
        now_ms: u64,
        delta_ms: u64,
        rng: &mut R,
    ) -> Option<FlightResult> {
        let seconds = u64_to_f64(delta_ms) / 1000.0;
        match self.state {
            BallState::InFlight(Flight::Pass(path)) => {
                self.update_pass(&path, now_ms);
                if self.progress >= 1.0 {
                    return self.complete_flight(players, rng).ok();
                }
                None
            }
            BallState::InFlight(Flight::Kick(arc)) => {
                self.velocity.y += KICK_GRAVITY * seconds;
                self.at += self.velocity * seconds;
                self.rotation += SPIRAL_INCREMENT;
                if self.velocity.y > 0.0 && self.at.y >= arc.launch.y {
                    self.at.y = arc.launch.y;
                    return self.complete_flight(players, rng).ok();
                }
                None
            }
            BallState::Attached { carrier } => {
                if let Some(holder) = players.iter().find(|p| p.id() == carrier) {
                    self.at = holder.at + Vec2::new(holder.facing().sign() * CARRY_OFFSET, 0.0);
                }
                None
            }
            BallState::Loose => {
                self.velocity = self.velocity * LOOSE_BALL_DAMPING;
                if self.velocity.x.abs() < LOOSE_BALL_REST_SPEED
                    && self.velocity.y.abs() < LOOSE_BALL_REST_SPEED
                {
                    self.velocity = Vec2::ZERO;
                }
                self.at += self.velocity * seconds;
                None
            }
            BallState::Idle => None,
        }
    }

    fn update_pass(&mut self, path: &PassPath, now_ms: u64) {
        let elapsed = u64_to_f64(now_ms.saturating_sub(path.start_ms));
        self.progress = if path.duration_ms > 0.0 {
            (elapsed / path.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let ground = path.start.lerp(path.end, self.progress);
        let lift = path.apex_height * (self.progress * PI).sin();
        self.at = Vec2::new(ground.x, ground.y - lift);
        self.rotation += SPIRAL_INCREMENT;
    }
}
