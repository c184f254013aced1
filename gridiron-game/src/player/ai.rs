//! Role-driven AI steps for CPU players.
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{PlayerEntity, PlayerId, TeamSide};
use crate::constants::WAYPOINT_REACHED_RADIUS;
use crate::geometry::Vec2;

/// Ordered waypoints a runner follows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Route {
    waypoints: SmallVec<[Vec2; 6]>,
    next: usize,
}

impl Route {
    #[must_use]
    pub fn new(waypoints: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            waypoints: waypoints.into_iter().collect(),
            next: 0,
        }
    }

    /// Waypoint to head for from `from`, skipping any already reached.
    pub fn next_point(&mut self, from: Vec2) -> Option<Vec2> {
        while let Some(&point) = self.waypoints.get(self.next) {
            if from.distance_to(point) > WAYPOINT_REACHED_RADIUS {
                return Some(point);
            }
            self.next += 1;
        }
        None
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next >= self.waypoints.len()
    }

    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }
}

/// Externally assigned behaviour. Players never switch state themselves.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AiState {
    #[default]
    Idle,
    Running { route: Route },
    Blocking { target: PlayerId },
    Covering { target: PlayerId },
    Tackling,
}

/// Read-only copy of one player taken before the AI pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub side: TeamSide,
    pub at: Vec2,
    pub has_ball: bool,
}

impl From<&PlayerEntity> for PlayerSnapshot {
    fn from(player: &PlayerEntity) -> Self {
        Self {
            id: player.id,
            side: player.side,
            at: player.at,
            has_ball: player.has_ball,
        }
    }
}

/// What an AI player can see of the field during its step.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    players: &'a [PlayerSnapshot],
    play_dead: bool,
}

impl<'a> FieldView<'a> {
    #[must_use]
    pub const fn new(players: &'a [PlayerSnapshot]) -> Self {
        Self {
            players,
            play_dead: false,
        }
    }

    /// Mark the play as whistled dead; tacklers stop rolling until the reset.
    #[must_use]
    pub const fn with_dead_play(mut self, dead: bool) -> Self {
        self.play_dead = dead;
        self
    }

    #[must_use]
    pub const fn is_play_dead(&self) -> bool {
        self.play_dead
    }

    #[must_use]
    pub fn find(&self, id: PlayerId) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn carrier(&self) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.has_ball)
    }
}

/// Result of an AI step the match driver must act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiOutcome {
    Tackled { carrier: PlayerId },
}

impl PlayerEntity {
    pub(super) fn update_ai<R: Rng + ?Sized>(
        &mut self,
        view: &FieldView<'_>,
        rng: &mut R,
    ) -> Option<AiOutcome> {
        let mut state = std::mem::take(&mut self.ai_state);
        let outcome = match &mut state {
            AiState::Idle => {
                self.stop();
                None
            }
            AiState::Running { route } => {
                match route.next_point(self.at) {
                    Some(point) => self.run(point - self.at),
                    None => self.stop(),
                }
                None
            }
            AiState::Blocking { target } | AiState::Covering { target } => {
                if let Some(snapshot) = view.find(*target) {
                    self.run(snapshot.at - self.at);
                }
                None
            }
            AiState::Tackling => self.pursue_carrier(view, rng),
        };
        self.ai_state = state;
        outcome
    }

    fn pursue_carrier<R: Rng + ?Sized>(
        &mut self,
        view: &FieldView<'_>,
        rng: &mut R,
    ) -> Option<AiOutcome> {
        let carrier = view.carrier().filter(|c| c.id != self.id)?;
        if view.is_play_dead() {
            self.stop();
            return None;
        }
        self.run(carrier.at - self.at);
        match self.tackle_at(carrier.at, carrier.has_ball, rng) {
            Ok(true) => {
                debug!("{} tackled carrier {}", self.id, carrier.id);
                Some(AiOutcome::Tackled {
                    carrier: carrier.id,
                })
            }
            Ok(false) | Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::fixed_roll;
    use crate::skill::Position;

    fn snapshot(id: u32, at: Vec2, has_ball: bool) -> PlayerSnapshot {
        PlayerSnapshot {
            id: PlayerId(id),
            side: TeamSide::Offense,
            at,
            has_ball,
        }
    }

    #[test]
    fn route_skips_reached_waypoints() {
        let mut route = Route::new([Vec2::new(5.0, 0.0), Vec2::new(100.0, 0.0)]);
        assert_eq!(route.next_point(Vec2::ZERO), Some(Vec2::new(100.0, 0.0)));
        assert_eq!(route.next_point(Vec2::new(95.0, 0.0)), None);
        assert!(route.is_complete());
    }

    #[test]
    fn runner_heads_for_waypoint_then_stops() {
        let mut wr = PlayerEntity::new(
            PlayerId(1),
            Position::WideReceiver,
            TeamSide::Offense,
            Vec2::ZERO,
        );
        wr.assign(AiState::Running {
            route: Route::new([Vec2::new(0.0, 50.0)]),
        });
        let players = [snapshot(1, Vec2::ZERO, false)];
        let view = FieldView::new(&players);
        wr.update_ai(&view, &mut fixed_roll(0.5));
        assert!(wr.velocity.y > 0.0);
        wr.at = Vec2::new(0.0, 45.0);
        wr.update_ai(&view, &mut fixed_roll(0.5));
        assert!(wr.velocity.is_zero());
        assert!(matches!(wr.ai_state(), AiState::Running { route } if route.is_complete()));
    }

    #[test]
    fn blocker_moves_toward_target() {
        let mut ol = PlayerEntity::new(
            PlayerId(2),
            Position::OffensiveLine,
            TeamSide::Offense,
            Vec2::ZERO,
        );
        ol.assign(AiState::Blocking {
            target: PlayerId(7),
        });
        let players = [snapshot(7, Vec2::new(-20.0, 0.0), false)];
        ol.update_ai(&FieldView::new(&players), &mut fixed_roll(0.5));
        assert!(ol.velocity.x < 0.0);
    }

    #[test]
    fn tackler_reports_success_only_in_range() {
        let mut lb = PlayerEntity::new(
            PlayerId(3),
            Position::Linebacker,
            TeamSide::Defense,
            Vec2::ZERO,
        );
        lb.assign(AiState::Tackling);
        let far = [snapshot(1, Vec2::new(100.0, 0.0), true)];
        assert_eq!(lb.update_ai(&FieldView::new(&far), &mut fixed_roll(0.0)), None);
        assert!(lb.velocity.x > 0.0);

        let near = [snapshot(1, Vec2::new(10.0, 0.0), true)];
        assert_eq!(
            lb.update_ai(&FieldView::new(&near), &mut fixed_roll(0.0)),
            Some(AiOutcome::Tackled {
                carrier: PlayerId(1)
            })
        );
    }

    #[test]
    fn tackler_holds_up_once_the_play_is_dead() {
        let mut lb = PlayerEntity::new(
            PlayerId(3),
            Position::Linebacker,
            TeamSide::Defense,
            Vec2::ZERO,
        );
        lb.assign(AiState::Tackling);
        let near = [snapshot(1, Vec2::new(10.0, 0.0), true)];
        let view = FieldView::new(&near).with_dead_play(true);
        assert_eq!(lb.update_ai(&view, &mut fixed_roll(0.0)), None);
        assert!(lb.velocity.is_zero());
        assert_eq!(lb.stats().tackles, 0);
        assert_eq!(lb.stats().missed_tackles, 0);
    }

    #[test]
    fn idle_player_stops() {
        let mut p = PlayerEntity::new(PlayerId(4), Position::TightEnd, TeamSide::Offense, Vec2::ZERO);
        p.run(Vec2::new(1.0, 0.0));
        p.update_ai(&FieldView::new(&[]), &mut fixed_roll(0.5));
        assert!(p.velocity.is_zero());
    }
}
