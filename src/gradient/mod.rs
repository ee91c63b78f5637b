//! Health-ratio color gradient.
//!
//! Maps `hp / hp_max` to the fill color of the health bar. Five fixed stops
//! run from vivid green at full health down to red at the lowest non-zero
//! ratios; between two stops each channel is interpolated independently.
//!
//! A ratio of zero (or below) produces [`HealthFill::Empty`]: the bar shows
//! only its border, which is how the card signals death. Red is therefore
//! never drawn *at* zero, only approached from above.
//!
//! ```
//! use combat_cards::gradient::{color_for, HealthFill, YELLOW};
//!
//! assert_eq!(color_for(0.5), HealthFill::Solid(YELLOW));
//! assert_eq!(color_for(0.0), HealthFill::Empty);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::Color;

pub const VIVID_GREEN: Color = Color::rgb(0x18, 0xA8, 0x6B);
pub const LAWN_GREEN: Color = Color::rgb(0x7C, 0xFC, 0x00);
pub const YELLOW: Color = Color::rgb(0xE5, 0xC1, 0x00);
pub const ORANGE: Color = Color::rgb(0xF0, 0x78, 0x18);
pub const RED: Color = Color::rgb(0xAF, 0x37, 0x4B);

/// Gradient stops, highest ratio first.
pub const STOPS: [(f32, Color); 5] = [
    (1.00, VIVID_GREEN),
    (0.75, LAWN_GREEN),
    (0.50, YELLOW),
    (0.25, ORANGE),
    (0.00, RED),
];

/// How the health bar is filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthFill {
    /// Border only.
    Empty,
    /// Filled with a solid color.
    Solid(Color),
}

impl HealthFill {
    /// The fill color, if any.
    #[must_use]
    pub fn color(self) -> Option<Color> {
        match self {
            HealthFill::Empty => None,
            HealthFill::Solid(color) => Some(color),
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        matches!(self, HealthFill::Empty)
    }
}

/// Fill for a health ratio.
///
/// `ratio <= 0` (and NaN) yields `Empty`; `ratio >= 1` yields the top stop
/// exactly. Anything in between blends the two surrounding stops with
/// `factor = (ratio - lower) / (upper - lower)`, from the lower stop's color
/// toward the upper stop's.
#[must_use]
pub fn color_for(ratio: f32) -> HealthFill {
    if ratio.is_nan() || ratio <= 0.0 {
        return HealthFill::Empty;
    }
    if ratio >= STOPS[0].0 {
        return HealthFill::Solid(STOPS[0].1);
    }

    for pair in STOPS.windows(2) {
        let (upper, upper_color) = pair[0];
        let (lower, lower_color) = pair[1];
        if ratio >= lower {
            let factor = (ratio - lower) / (upper - lower);
            return HealthFill::Solid(lower_color.lerp(upper_color, factor));
        }
    }

    // Unreachable for ratio > 0 since the last stop is 0.0.
    HealthFill::Solid(STOPS[STOPS.len() - 1].1)
}

/// `hp / hp_max` as a ratio clamped to `[0, 1]`.
///
/// A non-positive `hp_max` is treated as an empty bar.
#[must_use]
pub fn health_ratio(hp: i32, hp_max: i32) -> f32 {
    if hp_max <= 0 {
        return 0.0;
    }
    (hp as f32 / hp_max as f32).clamp(0.0, 1.0)
}

/// Fill for a combatant's current health.
#[must_use]
pub fn fill_for(hp: i32, hp_max: i32) -> HealthFill {
    color_for(health_ratio(hp, hp_max))
}
