//! Card compositor.
//!
//! Turns a combatant and its `VisualState` into a `CardFrame`. Composition
//! is a pure function of its inputs: the same entity, visual state, layout
//! and assets always give the same frame, so the shell can recompose on
//! every change without tracking what is stale.
//!
//! ## Layers, back to front
//!
//! 1. Background: elite or normal texture
//! 2. Title: uppercase name with a one-unit black outline, plus `#id`
//! 3. Stats: movement and attack icons with their values
//! 4. Portrait
//! 5. Health bar: border, gradient fill, heart or skull, label
//! 6. Death-marker strokes, only while or after they slide in
//!
//! Background and portrait are blended toward grayscale by
//! `VisualState::gray`; the other layers never fade.

use log::warn;
use smallvec::SmallVec;

use crate::core::{CardLayout, CardTheme, Point, Rect, Size};
use crate::gradient::{fill_for, HealthFill};
use crate::roster::CombatEntity;
use crate::animation::VisualState;

use super::command::{Anchor, CardFrame, DrawCommand, Font, Layer, LayerKind};
use super::resources::{assets, Bitmap, ResourceProvider, TextMetrics};

/// Offsets of the four outline copies drawn behind the title.
const OUTLINE_OFFSETS: [(f32, f32); 4] = [(0.0, -1.0), (0.0, 1.0), (-1.0, 0.0), (1.0, 0.0)];

/// Composes cards from entity state.
pub struct CardCompositor<'a> {
    layout: &'a CardLayout,
    theme: &'a CardTheme,
    resources: &'a dyn ResourceProvider,
    metrics: &'a dyn TextMetrics,
}

impl<'a> CardCompositor<'a> {
    pub fn new(
        layout: &'a CardLayout,
        theme: &'a CardTheme,
        resources: &'a dyn ResourceProvider,
        metrics: &'a dyn TextMetrics,
    ) -> Self {
        Self {
            layout,
            theme,
            resources,
            metrics,
        }
    }

    /// Compose every layer of a card.
    #[must_use]
    pub fn compose(&self, entity: &CombatEntity, visual: VisualState) -> CardFrame {
        let mut layers = vec![
            self.background(entity, visual.gray),
            self.title(entity),
            self.stats(entity),
            self.portrait(entity, visual.gray),
            self.health_bar(entity),
        ];
        layers.extend(self.death_markers(visual));
        CardFrame {
            entity: entity.id(),
            layers,
        }
    }

    /// Compose only the health bar (the cheap redraw path).
    #[must_use]
    pub fn compose_health_bar(&self, entity: &CombatEntity) -> CardFrame {
        CardFrame {
            entity: entity.id(),
            layers: vec![self.health_bar(entity)],
        }
    }

    /// Resolve an asset, substituting a placeholder on failure.
    fn resolve(&self, name: &str, size: Size) -> Bitmap {
        if name.is_empty() {
            return Bitmap::placeholder(size);
        }
        match self.resources.resolve(name, size) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                warn!("{}; drawing placeholder", e);
                Bitmap::placeholder(size)
            }
        }
    }

    /// Blend a bitmap toward its grayscale variant.
    fn faded(&self, bitmap: Bitmap, gray: f32) -> Bitmap {
        if gray.is_nan() || gray <= 0.0 {
            bitmap
        } else if gray >= 1.0 {
            self.resources.grayscale(&bitmap)
        } else {
            bitmap.blend(&self.resources.grayscale(&bitmap), gray)
        }
    }

    /// Background texture, chosen by the elite flag alone.
    #[must_use]
    pub fn background(&self, entity: &CombatEntity, gray: f32) -> Layer {
        let name = if entity.elite() {
            assets::BACKGROUND_ELITE
        } else {
            assets::BACKGROUND_NORMAL
        };
        let rect = self.layout.background_rect();
        let bitmap = self.faded(self.resolve(name, rect.pixel_size()), gray);

        let mut layer = Layer::new(LayerKind::Background);
        layer.push(DrawCommand::Image { bitmap, rect });
        layer
    }

    /// Largest title font, from the base size down to the floor, whose
    /// rendering of `text` fits the allowed width.
    #[must_use]
    pub fn title_font(&self, text: &str) -> Font {
        let max_width = self.layout.title_max_width_units();
        let floor = self.layout.title_min_font();
        let mut font = Font::new(self.theme.title_family.clone(), self.layout.title_base_font());
        while font.size > floor && self.metrics.text_width(text, &font) > max_width {
            font.size -= 1;
        }
        font
    }

    /// Outlined uppercase name and the `#id` badge.
    #[must_use]
    pub fn title(&self, entity: &CombatEntity) -> Layer {
        let text = entity.name().to_uppercase();
        let font = self.title_font(&text);
        let anchor_point = Point::new(self.layout.width * 0.5, self.layout.height * self.layout.title_y);
        let offset = self.layout.outline_offset;

        let mut layer = Layer::new(LayerKind::Title);
        for (dx, dy) in OUTLINE_OFFSETS {
            layer.push(DrawCommand::Text {
                text: text.clone(),
                position: anchor_point.offset(dx * offset, dy * offset),
                anchor: Anchor::Center,
                font: font.clone(),
                color: self.theme.outline_color,
            });
        }
        layer.push(DrawCommand::Text {
            text,
            position: anchor_point,
            anchor: Anchor::Center,
            font,
            color: self.theme.title_color(entity.elite()),
        });
        layer.push(DrawCommand::Text {
            text: format!("#{}", entity.id().raw()),
            position: self.layout.at(self.layout.id_badge),
            anchor: Anchor::NorthWest,
            font: self.body_font(self.layout.id_badge_size),
            color: self.theme.text_color,
        });
        layer
    }

    fn body_font(&self, relative_size: f32) -> Font {
        let size = (self.layout.width * relative_size).max(1.0) as u16;
        Font::new(self.theme.body_family.clone(), size)
    }

    /// Movement and attack icons with their values.
    #[must_use]
    pub fn stats(&self, entity: &CombatEntity) -> Layer {
        let extent = self.layout.stat_icon_extent();
        let font = self.body_font(self.layout.stat_value_size);
        let rows = [
            (assets::ICON_MOVEMENT, self.layout.movement_icon, self.layout.movement_value, entity.movement()),
            (assets::ICON_ATTACK, self.layout.attack_icon, self.layout.attack_value, entity.attack()),
        ];

        let mut layer = Layer::new(LayerKind::Stats);
        for (icon, icon_at, value_at, value) in rows {
            let origin = self.layout.at(icon_at);
            let rect = Rect::new(origin.x, origin.y, extent, extent);
            layer.push(DrawCommand::Image {
                bitmap: self.resolve(icon, rect.pixel_size()),
                rect,
            });
            layer.push(DrawCommand::Text {
                text: value.to_string(),
                position: self.layout.at(value_at),
                anchor: Anchor::NorthWest,
                font: font.clone(),
                color: self.theme.text_color,
            });
        }
        layer
    }

    /// The combatant's portrait, centered in its box.
    #[must_use]
    pub fn portrait(&self, entity: &CombatEntity, gray: f32) -> Layer {
        let rect = self.layout.portrait_rect();
        let bitmap = self.faded(self.resolve(entity.portrait(), rect.pixel_size()), gray);

        let mut layer = Layer::new(LayerKind::Portrait);
        layer.push(DrawCommand::Image { bitmap, rect });
        layer
    }

    /// Bordered bar, gradient fill, heart or skull, and label.
    #[must_use]
    pub fn health_bar(&self, entity: &CombatEntity) -> Layer {
        let bar = self.layout.health_bar_rect();
        let mut layer = Layer::new(LayerKind::HealthBar);

        if let HealthFill::Solid(color) = fill_for(entity.hp(), entity.hp_max()) {
            layer.push(DrawCommand::FillRect {
                rect: bar.with_width(bar.width * entity.health_ratio()),
                color,
            });
        }
        layer.push(DrawCommand::StrokeRect {
            rect: bar,
            color: self.theme.health_bar_border,
            width: 1.0,
        });

        let (icon, label) = if entity.is_dead() {
            (assets::ICON_SKULL, self.theme.death_label.clone())
        } else {
            (assets::ICON_HEART, format!("{} / {}", entity.hp(), entity.hp_max()))
        };
        let icon_size = self.layout.health_icon_size;
        let icon_rect = Rect::centered(
            Point::new(bar.x + self.layout.health_icon_offset, bar.center().y),
            icon_size,
            icon_size,
        );
        layer.push(DrawCommand::Image {
            bitmap: self.resolve(icon, icon_rect.pixel_size()),
            rect: icon_rect,
        });
        layer.push(DrawCommand::Text {
            text: label,
            position: bar.center(),
            anchor: Anchor::Center,
            font: Font::new(self.theme.body_family.clone(), self.layout.health_label_size.max(1.0) as u16),
            color: self.theme.text_color,
        });
        layer
    }

    /// Where a brush stroke is centered at `progress` along its path.
    #[must_use]
    pub fn stroke_position(&self, kind: LayerKind, progress: f32) -> Point {
        let start = match kind {
            LayerKind::SecondStroke => self.layout.second_stroke_start,
            _ => self.layout.first_stroke_start,
        };
        self.layout.at(start).lerp(self.layout.center(), progress)
    }

    /// Brush-stroke layers for the strokes the visual state shows.
    #[must_use]
    pub fn death_markers(&self, visual: VisualState) -> SmallVec<[Layer; 2]> {
        let strokes = [
            (LayerKind::FirstStroke, assets::FIRST_STROKE, visual.first_stroke),
            (LayerKind::SecondStroke, assets::SECOND_STROKE, visual.second_stroke),
        ];
        let extent = self.layout.brush_extent();

        let mut layers = SmallVec::new();
        for (kind, name, progress) in strokes {
            let Some(progress) = progress else { continue };
            let rect = Rect::centered(self.stroke_position(kind, progress), extent, extent);
            let mut layer = Layer::new(kind);
            layer.push(DrawCommand::Image {
                bitmap: self.resolve(name, rect.pixel_size()),
                rect,
            });
            layers.push(layer);
        }
        layers
    }
}
