//! Draw commands and layers.
//!
//! The compositor's output is toolkit-agnostic: an ordered list of layers,
//! each an ordered list of primitive commands. A shell rasterizes them onto
//! whatever surface it has (immediate-mode canvas, retained scene, image).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Color, EntityId, Point, Rect};

use super::resources::Bitmap;

/// Font family and size in points.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: u16,
}

impl Font {
    pub fn new(family: impl Into<String>, size: u16) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

/// Which point of a text run `position` refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    /// Middle of the run.
    Center,
    /// Top-left corner of the run.
    NorthWest,
}

/// A primitive drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Draw a bitmap stretched over `rect`.
    Image { bitmap: Bitmap, rect: Rect },
    /// Draw a text run.
    Text {
        text: String,
        position: Point,
        anchor: Anchor,
        font: Font,
        color: Color,
    },
    /// Fill a rectangle.
    FillRect { rect: Rect, color: Color },
    /// Outline a rectangle.
    StrokeRect { rect: Rect, color: Color, width: f32 },
}

impl DrawCommand {
    /// The text of a text command.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Card layers, back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayerKind {
    Background,
    Title,
    Stats,
    Portrait,
    HealthBar,
    /// First death-marker brush stroke.
    FirstStroke,
    /// Second death-marker brush stroke.
    SecondStroke,
}

/// Commands of one layer. Most layers hold at most a handful.
pub type Commands = SmallVec<[DrawCommand; 4]>;

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub kind: LayerKind,
    pub commands: Commands,
}

impl Layer {
    #[must_use]
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            commands: SmallVec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Every text run in the layer.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(DrawCommand::text)
    }

    /// Every image in the layer.
    pub fn images(&self) -> impl Iterator<Item = (&Bitmap, &Rect)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image { bitmap, rect } => Some((bitmap, rect)),
            _ => None,
        })
    }
}

/// A fully composed card.
#[derive(Clone, Debug, PartialEq)]
pub struct CardFrame {
    pub entity: EntityId,
    /// Layers in drawing order.
    pub layers: Vec<Layer>,
}

impl CardFrame {
    /// First layer of the given kind.
    #[must_use]
    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|l| l.kind == kind)
    }

    /// Kinds of the layers, in drawing order.
    #[must_use]
    pub fn kinds(&self) -> Vec<LayerKind> {
        self.layers.iter().map(|l| l.kind).collect()
    }

    /// All commands, flattened in drawing order.
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.layers.iter().flat_map(|l| l.commands.iter())
    }
}
