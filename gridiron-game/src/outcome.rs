//! Probability rules for catches, tackles, and throws.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::rng::unit_roll;

/// Roll against `rating / 100`, using `default` when the rating is absent.
///
/// Succeeds when the unit roll is strictly below the success chance.
pub fn roll_success<R: Rng + ?Sized>(rating: Option<f64>, default: f64, rng: &mut R) -> bool {
    roll_rating(rating.unwrap_or(default), rng)
}

/// Roll against a rating that has already had its default applied.
pub fn roll_rating<R: Rng + ?Sized>(rating: f64, rng: &mut R) -> bool {
    unit_roll(rng) < success_chance(Some(rating), rating)
}

/// Success probability in `[0, 1]` for a rating on the 0-100 scale.
#[must_use]
pub fn success_chance(rating: Option<f64>, default: f64) -> f64 {
    (rating.unwrap_or(default) / 100.0).clamp(0.0, 1.0)
}

/// Who decides whether a pass arriving within reach is caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatchResolution {
    /// Arrival within reach is a catch.
    #[default]
    Proximity,
    /// Arrival within reach also rolls the receiver's catching rating.
    SkillRoll,
}
