//! Engine configuration.
//!
//! The engine is configured at startup with an `EngineConfig`:
//! - `CardLayout`: card extent and where each element sits on it
//! - `CardTheme`: fonts, title colors and the death label
//! - `AnimationConfig`: step count and step delay of the death transition
//!
//! Every position in `CardLayout` is a fraction of the card's width or
//! height, so resizing the card keeps the composition intact. Configs can be
//! loaded from JSON; missing fields take their defaults.
//!
//! ```
//! use combat_cards::core::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "animation": { "steps_per_phase": 4 } }"#).unwrap();
//! assert_eq!(config.animation.steps_per_phase, 4);
//! assert_eq!(config.animation.step_delay_ms, 50);
//! assert_eq!(config.layout.width, 320.0);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::error::ConfigError;
use super::geometry::{Point, Rect};

/// Scale applied to the 400 × 560 reference card.
pub const CARD_SCALE: f32 = 0.8;

/// Where each card element sits, as fractions of the card extent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardLayout {
    /// Card width in drawing units.
    pub width: f32,
    /// Card height in drawing units.
    pub height: f32,

    /// Background texture extent relative to the card (slightly inset).
    pub background_scale: Point,

    /// Vertical center of the title.
    pub title_y: f32,
    /// Widest the title may be, relative to card width.
    pub title_max_width: f32,
    /// Starting font size of the shrink-to-fit search, relative to width.
    pub title_base_size: f32,
    /// Font size floor of the search, relative to width.
    pub title_min_size: f32,
    /// Offset of the title's black outline copies, in units.
    pub outline_offset: f32,

    /// Top-left of the `#id` badge.
    pub id_badge: Point,
    /// Badge font size, relative to width.
    pub id_badge_size: f32,

    /// Stat icon edge length, relative to width.
    pub stat_icon_size: f32,
    pub movement_icon: Point,
    pub movement_value: Point,
    pub attack_icon: Point,
    pub attack_value: Point,
    /// Stat value font size, relative to width.
    pub stat_value_size: f32,

    /// Portrait box center.
    pub portrait_center: Point,
    /// Portrait box extent.
    pub portrait_size: Point,

    /// Health bar top-left.
    pub health_bar_origin: Point,
    /// Health bar extent.
    pub health_bar_size: Point,
    /// Heart/skull icon center, in units right of the bar's left edge.
    pub health_icon_offset: f32,
    /// Heart/skull icon edge length, in units.
    pub health_icon_size: f32,
    /// Health label font size, in units.
    pub health_label_size: f32,

    /// Death-marker brush edge length, relative to width.
    pub brush_size: f32,
    /// Start of the first brush stroke (off the bottom-left corner).
    pub first_stroke_start: Point,
    /// Start of the second brush stroke (off the top-left corner).
    pub second_stroke_start: Point,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            width: 400.0 * CARD_SCALE,
            height: 560.0 * CARD_SCALE,
            background_scale: Point::new(395.0 / 400.0, 550.0 / 560.0),
            title_y: 0.08,
            title_max_width: 0.85,
            title_base_size: 0.06,
            title_min_size: 0.04,
            outline_offset: 1.0,
            id_badge: Point::new(0.445, 0.107),
            id_badge_size: 0.035,
            stat_icon_size: 0.085,
            movement_icon: Point::new(0.30, 0.198),
            movement_value: Point::new(0.425, 0.187),
            attack_icon: Point::new(0.54, 0.198),
            attack_value: Point::new(0.652, 0.187),
            stat_value_size: 0.05,
            portrait_center: Point::new(0.5, 0.57),
            portrait_size: Point::new(0.742, 0.555),
            health_bar_origin: Point::new(0.15, 0.87),
            health_bar_size: Point::new(0.7, 0.05),
            health_icon_offset: 60.0,
            health_icon_size: 18.0 * CARD_SCALE,
            health_label_size: 12.0,
            brush_size: 0.9,
            first_stroke_start: Point::new(-0.25, 1.25),
            second_stroke_start: Point::new(-0.25, -0.25),
        }
    }
}

impl CardLayout {
    /// Convert a fractional point to card units.
    #[must_use]
    pub fn at(&self, fraction: Point) -> Point {
        Point::new(fraction.x * self.width, fraction.y * self.height)
    }

    /// The whole card.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Card center, where both brush strokes come to rest.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    #[must_use]
    pub fn background_rect(&self) -> Rect {
        Rect::centered(
            self.center(),
            self.width * self.background_scale.x,
            self.height * self.background_scale.y,
        )
    }

    #[must_use]
    pub fn portrait_rect(&self) -> Rect {
        Rect::centered(
            self.at(self.portrait_center),
            self.width * self.portrait_size.x,
            self.height * self.portrait_size.y,
        )
    }

    #[must_use]
    pub fn health_bar_rect(&self) -> Rect {
        let origin = self.at(self.health_bar_origin);
        Rect::new(
            origin.x,
            origin.y,
            self.width * self.health_bar_size.x,
            self.height * self.health_bar_size.y,
        )
    }

    #[must_use]
    pub fn stat_icon_extent(&self) -> f32 {
        self.width * self.stat_icon_size
    }

    #[must_use]
    pub fn brush_extent(&self) -> f32 {
        self.width * self.brush_size
    }

    /// Largest font size tried for the title.
    #[must_use]
    pub fn title_base_font(&self) -> u16 {
        font_units(self.width * self.title_base_size)
    }

    /// Smallest font size the title may shrink to.
    #[must_use]
    pub fn title_min_font(&self) -> u16 {
        font_units(self.width * self.title_min_size)
    }

    /// Widest the title may be, in units.
    #[must_use]
    pub fn title_max_width_units(&self) -> f32 {
        self.width * self.title_max_width
    }
}

/// Truncate a fractional font size to whole points, at least 1.
fn font_units(size: f32) -> u16 {
    if size.is_finite() && size >= 1.0 {
        size.min(f32::from(u16::MAX)) as u16
    } else {
        1
    }
}

/// Fonts and colors of a card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardTheme {
    /// Font family of the title.
    pub title_family: String,
    /// Font family of every other text run.
    pub body_family: String,
    pub elite_title_color: Color,
    pub normal_title_color: Color,
    pub outline_color: Color,
    pub text_color: Color,
    pub health_bar_border: Color,
    /// Label shown in place of `hp / hp_max` once hp reaches zero.
    pub death_label: String,
}

impl Default for CardTheme {
    fn default() -> Self {
        Self {
            title_family: "Dragon Hunter".to_string(),
            body_family: "Maitree SemiBold".to_string(),
            elite_title_color: Color::GOLD,
            normal_title_color: Color::WHITE,
            outline_color: Color::BLACK,
            text_color: Color::BLACK,
            health_bar_border: Color::BLACK,
            death_label: "Dead".to_string(),
        }
    }
}

impl CardTheme {
    #[must_use]
    pub fn title_color(&self, elite: bool) -> Color {
        if elite {
            self.elite_title_color
        } else {
            self.normal_title_color
        }
    }
}

/// Timing of the death transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Discrete steps in each animated phase.
    pub steps_per_phase: u32,
    /// Delay between consecutive steps, in milliseconds.
    pub step_delay_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            steps_per_phase: 10,
            step_delay_ms: 50,
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub layout: CardLayout,
    pub theme: CardTheme,
    pub animation: AnimationConfig,
    /// Delete every combat record from the store on shutdown.
    pub clear_on_shutdown: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout: CardLayout::default(),
            theme: CardTheme::default(),
            animation: AnimationConfig::default(),
            clear_on_shutdown: true,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if !(layout.width > 0.0 && layout.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "card size must be positive, got {} x {}",
                layout.width, layout.height
            )));
        }
        if layout.title_min_font() > layout.title_base_font() {
            return Err(ConfigError::Invalid(
                "title_min_size exceeds title_base_size".to_string(),
            ));
        }
        if self.animation.steps_per_phase == 0 {
            return Err(ConfigError::Invalid("steps_per_phase must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Set the card extent (builder pattern).
    #[must_use]
    pub fn with_card_size(mut self, width: f32, height: f32) -> Self {
        self.layout.width = width;
        self.layout.height = height;
        self
    }

    /// Set the animation timing (builder pattern).
    #[must_use]
    pub fn with_animation(mut self, steps_per_phase: u32, step_delay_ms: u64) -> Self {
        self.animation = AnimationConfig { steps_per_phase, step_delay_ms };
        self
    }

    /// Set the death label (builder pattern).
    #[must_use]
    pub fn with_death_label(mut self, label: impl Into<String>) -> Self {
        self.theme.death_label = label.into();
        self
    }

    /// Keep combat records in the store after shutdown (builder pattern).
    #[must_use]
    pub fn keep_records_on_shutdown(mut self) -> Self {
        self.clear_on_shutdown = false;
        self
    }
}
