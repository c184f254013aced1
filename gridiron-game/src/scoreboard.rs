//! Match score and game clock.
use serde::{Deserialize, Serialize};

use crate::constants::{QUARTER_LENGTH_MS, QUARTERS_PER_GAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSide {
    Player,
    Cpu,
}

/// Clock transitions produced by [`Scoreboard::run_clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    QuarterEnded(u8),
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    player: u32,
    cpu: u32,
    quarter: u8,
    remaining_ms: u64,
    finished: bool,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoreboard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            player: 0,
            cpu: 0,
            quarter: 1,
            remaining_ms: QUARTER_LENGTH_MS,
            finished: false,
        }
    }

    #[must_use]
    pub const fn player(&self) -> u32 {
        self.player
    }

    #[must_use]
    pub const fn cpu(&self) -> u32 {
        self.cpu
    }

    #[must_use]
    pub const fn quarter(&self) -> u8 {
        self.quarter
    }

    #[must_use]
    pub const fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.finished
    }

    /// Add points and return the new total for `side`. Ignored once final.
    pub const fn award(&mut self, side: ScoreSide, points: u32) -> u32 {
        if self.finished {
            return self.total(side);
        }
        match side {
            ScoreSide::Player => self.player = self.player.saturating_add(points),
            ScoreSide::Cpu => self.cpu = self.cpu.saturating_add(points),
        }
        self.total(side)
    }

    #[must_use]
    pub const fn total(&self, side: ScoreSide) -> u32 {
        match side {
            ScoreSide::Player => self.player,
            ScoreSide::Cpu => self.cpu,
        }
    }

    /// Count the game clock down by `delta_ms`, rolling over quarters.
    pub fn run_clock(&mut self, mut delta_ms: u64) -> Vec<ClockEvent> {
        let mut events = Vec::new();
        while delta_ms > 0 && !self.finished {
            if delta_ms < self.remaining_ms {
                self.remaining_ms -= delta_ms;
                break;
            }
            delta_ms -= self.remaining_ms;
            self.remaining_ms = 0;
            events.push(ClockEvent::QuarterEnded(self.quarter));
            if self.quarter >= QUARTERS_PER_GAME {
                self.finished = true;
                events.push(ClockEvent::Final);
            } else {
                self.quarter += 1;
                self.remaining_ms = QUARTER_LENGTH_MS;
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarters_roll_over_and_finish() {
        let mut board = Scoreboard::new();
        assert!(board.run_clock(899_000).is_empty());
        assert_eq!(
            board.run_clock(2_000),
            vec![ClockEvent::QuarterEnded(1)]
        );
        assert_eq!(board.quarter(), 2);
        assert_eq!(board.remaining_ms(), 899_000);
        let events = board.run_clock(QUARTER_LENGTH_MS * 3);
        assert_eq!(
            events,
            vec![
                ClockEvent::QuarterEnded(2),
                ClockEvent::QuarterEnded(3),
                ClockEvent::QuarterEnded(4),
                ClockEvent::Final
            ]
        );
        assert!(board.is_final());
        assert!(board.run_clock(10).is_empty());
    }

    #[test]
    fn points_freeze_after_final() {
        let mut board = Scoreboard::new();
        assert_eq!(board.award(ScoreSide::Player, 7), 7);
        board.run_clock(QUARTER_LENGTH_MS * 4);
        assert_eq!(board.award(ScoreSide::Cpu, 3), 0);
        assert_eq!(board.player(), 7);
    }
}
