//! Match driver: owns the players, the ball, the clock and the sinks, and runs
//! the per-frame update loop.
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ball::{BallEntity, BallError, FlightResult};
use crate::clock::MatchClock;
use crate::events::{EventLog, EventSink, GameEvent, SoundCue, SoundLog, SoundSink};
use crate::geometry::Vec2;
use crate::outcome::CatchResolution;
use crate::player::{
    AiOutcome, FieldView, PlayerEntity, PlayerError, PlayerId, PlayerSnapshot, TeamSide,
    ThrowParams,
};
use crate::profile::PlayerProfile;
use crate::rng::RngBundle;
use crate::scoreboard::{ClockEvent, ScoreSide, Scoreboard};
use crate::season::DifficultyProfile;
use crate::skill::Position;

/// Runtime knobs for one match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default)]
    pub catch_resolution: CatchResolution,
    /// Arc multiplier applied to every pass.
    #[serde(default = "FieldConfig::default_pass_arc")]
    pub pass_arc: f64,
    #[serde(default)]
    pub difficulty: DifficultyProfile,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            catch_resolution: CatchResolution::default(),
            pass_arc: Self::default_pass_arc(),
            difficulty: DifficultyProfile::default(),
        }
    }
}

impl FieldConfig {
    const fn default_pass_arc() -> f64 {
        1.0
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error(transparent)]
    Ball(#[from] BallError),
    #[error(transparent)]
    Player(#[from] PlayerError),
    #[error("no player {id} on the field")]
    UnknownPlayer { id: PlayerId },
}

pub struct Field<E = EventLog, S = SoundLog> {
    players: Vec<PlayerEntity>,
    ball: BallEntity,
    clock: MatchClock,
    scoreboard: Scoreboard,
    rng: RngBundle,
    config: FieldConfig,
    events: E,
    sounds: S,
    next_id: u32,
    play_dead: bool,
}

impl Field<EventLog, SoundLog> {
    #[must_use]
    pub fn new(seed: u64, config: FieldConfig) -> Self {
        Self::with_sinks(seed, config, EventLog::new(), SoundLog::default())
    }
}

impl<E: EventSink, S: SoundSink> Field<E, S> {
    #[must_use]
    pub fn with_sinks(seed: u64, config: FieldConfig, events: E, sounds: S) -> Self {
        Self {
            players: Vec::new(),
            ball: BallEntity::default().with_catch_resolution(config.catch_resolution),
            clock: MatchClock::new(),
            scoreboard: Scoreboard::new(),
            rng: RngBundle::from_user_seed(seed),
            config,
            events,
            sounds,
            next_id: 1,
            play_dead: false,
        }
    }

    fn add(&mut self, mut player: PlayerEntity) -> PlayerId {
        player.apply_difficulty(&self.config.difficulty);
        let id = player.id();
        self.players.push(player);
        id
    }

    fn allocate_id(&mut self) -> PlayerId {
        let id = PlayerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Put a pickup player with arcade ratings on the field.
    pub fn spawn(&mut self, position: Position, side: TeamSide, at: Vec2) -> PlayerId {
        let id = self.allocate_id();
        self.add(PlayerEntity::new(id, position, side, at))
    }

    /// Put a roster player on the field.
    pub fn spawn_profile(&mut self, profile: &PlayerProfile, side: TeamSide, at: Vec2) -> PlayerId {
        let id = self.allocate_id();
        self.add(PlayerEntity::from_profile(id, profile, side, at))
    }

    /// Hand control of `id` to the host. Human players skip the AI step and
    /// keep their unscaled speed.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::UnknownPlayer`] if `id` is not on the field.
    pub fn set_human(&mut self, id: PlayerId, human: bool) -> Result<(), FieldError> {
        let difficulty = self.config.difficulty;
        let player = self.player_mut(id)?;
        player.is_ai = !human;
        player.apply_difficulty(&difficulty);
        Ok(())
    }

    #[must_use]
    pub fn players(&self) -> &[PlayerEntity] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerEntity> {
        self.players.iter().find(|p| p.id() == id)
    }

    /// Mutable access for host input and position writes.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::UnknownPlayer`] if `id` is not on the field.
    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut PlayerEntity, FieldError> {
        self.players
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(FieldError::UnknownPlayer { id })
    }

    #[must_use]
    pub const fn ball(&self) -> &BallEntity {
        &self.ball
    }

    #[must_use]
    pub const fn clock(&self) -> &MatchClock {
        &self.clock
    }

    #[must_use]
    pub const fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    #[must_use]
    pub const fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[must_use]
    pub const fn rng(&self) -> &RngBundle {
        &self.rng
    }

    #[must_use]
    pub const fn events(&self) -> &E {
        &self.events
    }

    pub const fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    #[must_use]
    pub const fn sounds(&self) -> &S {
        &self.sounds
    }

    pub const fn sounds_mut(&mut self) -> &mut S {
        &mut self.sounds
    }

    /// True between a tackle and the next [`Field::reset_ball`].
    #[must_use]
    pub const fn is_play_dead(&self) -> bool {
        self.play_dead
    }

    pub const fn pause(&mut self) {
        self.clock.pause();
    }

    pub const fn resume(&mut self) {
        self.clock.resume();
    }

    /// At most one player holds the ball, and it is the ball's carrier.
    #[must_use]
    pub fn possession_consistent(&self) -> bool {
        let mut holders = self.players.iter().filter(|p| p.has_ball()).map(PlayerEntity::id);
        let first = holders.next();
        holders.next().is_none() && first == self.ball.carrier()
    }

    /// # Errors
    ///
    /// Returns [`FieldError::Ball`] if `id` is not on the field.
    pub fn give_ball(&mut self, id: PlayerId) -> Result<(), FieldError> {
        self.ball.attach_to_carrier(&mut self.players, id)?;
        Ok(())
    }

    /// Throw from the carrier to `target` using the thrower's ratings.
    ///
    /// # Errors
    ///
    /// Fails if `thrower` is not carrying the ball or either player is unknown.
    pub fn pass(&mut self, thrower: PlayerId, target: PlayerId) -> Result<ThrowParams, FieldError> {
        if self.ball.carrier() != Some(thrower) {
            return Err(BallError::NotCarrier { player: thrower }.into());
        }
        let target_at = self
            .player(target)
            .map(|p| p.at)
            .ok_or(FieldError::UnknownPlayer { id: target })?;
        let params = self
            .player(thrower)
            .ok_or(FieldError::UnknownPlayer { id: thrower })?
            .throw_params(target_at)?;
        let path = self.ball.throw_to(
            &mut self.players,
            thrower,
            target,
            params.power,
            self.config.pass_arc,
            self.clock.now_ms(),
        )?;
        self.player_mut(thrower)?.commit_throw();
        self.events.emit(GameEvent::PassThrown {
            thrower,
            target,
            distance: params.distance,
            flight_ms: path.duration_ms,
        });
        self.sounds.play(SoundCue::Pass);
        Ok(params)
    }

    /// # Errors
    ///
    /// Fails if `kicker` cannot launch the ball in its current state.
    pub fn kick(
        &mut self,
        kicker: PlayerId,
        angle: f64,
        power: f64,
        field_goal: bool,
    ) -> Result<(), FieldError> {
        self.ball
            .kick(&mut self.players, kicker, angle, power, field_goal)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`FieldError::Ball`] unless someone is carrying the ball.
    pub fn fumble(&mut self, force: Vec2) -> Result<PlayerId, FieldError> {
        let carrier = self
            .ball
            .fumble(&mut self.players, force, &mut *self.rng.fumble())?;
        self.events.emit(GameEvent::Fumble {
            carrier,
            at: self.ball.at,
        });
        self.sounds.play(SoundCue::Fumble);
        Ok(carrier)
    }

    /// # Errors
    ///
    /// Returns [`FieldError::Ball`] if the ball is already carried.
    pub fn pick_up(&mut self, id: PlayerId) -> Result<(), FieldError> {
        let previous_side = self
            .ball
            .last_carrier()
            .and_then(|last| self.player(last))
            .map(PlayerEntity::side);
        self.ball.pick_up(&mut self.players, id)?;
        self.events.emit(GameEvent::BallRecovered { by: id });
        let side = self.player(id).map(PlayerEntity::side);
        if previous_side.is_some() && side != previous_side {
            self.sounds.play(SoundCue::Interception);
        }
        Ok(())
    }

    /// Spot the ball at `at` and start a new play.
    pub fn reset_ball(&mut self, at: Vec2) {
        self.ball.reset(&mut self.players, at);
        self.play_dead = false;
    }

    /// Add points and announce the new score.
    pub fn award_points(&mut self, side: ScoreSide, points: u32) {
        if self.scoreboard.is_final() {
            return;
        }
        self.scoreboard.award(side, points);
        self.events.emit(GameEvent::Score {
            side,
            points,
            player_total: self.scoreboard.player(),
            cpu_total: self.scoreboard.cpu(),
        });
        match points {
            6.. => self.sounds.play(SoundCue::Touchdown),
            3 => self.sounds.play(SoundCue::FieldGoal),
            _ => {}
        }
        self.sounds.play(match side {
            ScoreSide::Player => SoundCue::CrowdCheer,
            ScoreSide::Cpu => SoundCue::CrowdBoo,
        });
    }

    /// Advance one host frame.
    pub fn tick(&mut self, delta_ms: u64) {
        let applied = self.clock.advance(delta_ms);
        if self.clock.is_paused() {
            return;
        }
        self.run_scoreboard(applied);

        let snapshots: Vec<PlayerSnapshot> = self.players.iter().map(PlayerSnapshot::from).collect();
        let view = FieldView::new(&snapshots).with_dead_play(self.play_dead);
        let mut tackles = Vec::new();
        {
            let mut rng = self.rng.outcome();
            for player in &mut self.players {
                if let Some(AiOutcome::Tackled { carrier }) = player.update(&view, &mut *rng) {
                    tackles.push((player.id(), carrier));
                }
            }
        }
        for (tackler, carrier) in tackles {
            self.apply_tackle(tackler, carrier);
        }

        for player in &mut self.players {
            player.integrate(applied);
        }

        let result = self.ball.update(
            &mut self.players,
            self.clock.now_ms(),
            applied,
            &mut *self.rng.outcome(),
        );
        if let Some(result) = result {
            self.announce_flight(result);
        }
    }

    fn run_scoreboard(&mut self, applied: u64) {
        for event in self.scoreboard.run_clock(applied) {
            match event {
                ClockEvent::QuarterEnded(quarter) => {
                    self.events.emit(GameEvent::QuarterEnded { quarter });
                    self.sounds.play(SoundCue::Whistle);
                }
                ClockEvent::Final => self.events.emit(GameEvent::GameFinal {
                    player: self.scoreboard.player(),
                    cpu: self.scoreboard.cpu(),
                }),
            }
        }
    }

    fn apply_tackle(&mut self, tackler: PlayerId, carrier: PlayerId) {
        if self.play_dead || self.ball.carrier() != Some(carrier) {
            return;
        }
        self.play_dead = true;
        let mut sack = false;
        if let Some(down) = self.players.iter_mut().find(|p| p.id() == carrier) {
            down.stop();
            sack = down.position() == Position::Quarterback;
        }
        debug!("{tackler} brought down {carrier}");
        self.events.emit(GameEvent::Tackle {
            tackler,
            carrier,
            at: self.ball.at,
        });
        self.sounds.play(SoundCue::Tackle);
        if sack {
            self.sounds.play(SoundCue::Sack);
        }
    }

    fn announce_flight(&mut self, result: FlightResult) {
        match result {
            FlightResult::Caught { thrower, receiver } => {
                self.events.emit(GameEvent::PassCompleted {
                    thrower: Some(thrower),
                    receiver,
                });
                self.sounds.play(SoundCue::Catch);
            }
            FlightResult::Incomplete {
                target,
                at,
                dropped,
            } => self.events.emit(GameEvent::PassIncomplete {
                target: Some(target),
                at,
                dropped,
            }),
            FlightResult::KickLanded { at, field_goal } => {
                self.events.emit(GameEvent::KickLanded { at, field_goal });
            }
        }
    }
}
