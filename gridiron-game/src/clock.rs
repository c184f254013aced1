//! Pausable match clock driven by host frame deltas.
use serde::{Deserialize, Serialize};

/// Monotonic clock that only advances when the host ticks it while running.
///
/// Flight timing reads `now_ms`, so a paused match freezes every ball in the air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchClock {
    elapsed_ms: u64,
    paused: bool,
}

impl MatchClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed_ms: 0,
            paused: false,
        }
    }

    /// Accumulate a host frame delta. Returns the delta actually applied.
    pub const fn advance(&mut self, delta_ms: u64) -> u64 {
        if self.paused {
            return 0;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        delta_ms
    }

    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub const fn pause(&mut self) {
        self.paused = true;
    }

    pub const fn resume(&mut self) {
        self.paused = false;
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_clock_ignores_deltas() {
        let mut clock = MatchClock::new();
        assert_eq!(clock.advance(16), 16);
        clock.pause();
        assert_eq!(clock.advance(60_000), 0);
        assert_eq!(clock.now_ms(), 16);
        clock.resume();
        clock.advance(4);
        assert_eq!(clock.now_ms(), 20);
    }
}
