//! Notifications emitted by the core for UI and audio collaborators.
//!
//! The core never waits on a listener: events are pushed into an
//! [`EventSink`] and sound cues into a [`SoundSink`], both owned by the host.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::player::PlayerId;
use crate::scoreboard::ScoreSide;
use crate::season::Achievement;

/// Mechanical event emitted by the match driver or the season simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    PassThrown {
        thrower: PlayerId,
        target: PlayerId,
        distance: f64,
        flight_ms: f64,
    },
    PassCompleted {
        thrower: Option<PlayerId>,
        receiver: PlayerId,
    },
    PassIncomplete {
        target: Option<PlayerId>,
        at: Vec2,
        dropped: bool,
    },
    Tackle {
        tackler: PlayerId,
        carrier: PlayerId,
        at: Vec2,
    },
    Fumble {
        carrier: PlayerId,
        at: Vec2,
    },
    BallRecovered {
        by: PlayerId,
    },
    KickLanded {
        at: Vec2,
        field_goal: bool,
    },
    Score {
        side: ScoreSide,
        points: u32,
        player_total: u32,
        cpu_total: u32,
    },
    QuarterEnded {
        quarter: u8,
    },
    GameFinal {
        player: u32,
        cpu: u32,
    },
    GameRecorded {
        opponent: String,
        player_score: u32,
        opponent_score: u32,
        won: bool,
    },
    AchievementUnlocked {
        achievement: Achievement,
    },
}

/// Named sound effect requested from the host audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoundCue {
    Whistle,
    Tackle,
    Pass,
    Catch,
    Touchdown,
    FieldGoal,
    CrowdCheer,
    CrowdBoo,
    Fumble,
    Interception,
    Sack,
}

impl SoundCue {
    /// Asset key the host uses to look the sample up.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Whistle => "whistle",
            Self::Tackle => "tackle",
            Self::Pass => "pass",
            Self::Catch => "catch",
            Self::Touchdown => "touchdown",
            Self::FieldGoal => "field-goal",
            Self::CrowdCheer => "crowd-cheer",
            Self::CrowdBoo => "crowd-boo",
            Self::Fumble => "fumble",
            Self::Interception => "interception",
            Self::Sack => "sack",
        }
    }
}

/// Receiver for game notifications.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

/// Fire-and-forget audio hook.
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);
}

/// In-memory event queue drained by the host once per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// Records requested cues; hosts without audio can keep this and ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundLog {
    cues: Vec<SoundCue>,
}

impl SoundLog {
    #[must_use]
    pub fn cues(&self) -> &[SoundCue] {
        &self.cues
    }

    pub fn drain(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }
}

impl SoundSink for SoundLog {
    fn play(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: GameEvent) {}
}

impl SoundSink for Discard {
    fn play(&mut self, _cue: SoundCue) {}
}
