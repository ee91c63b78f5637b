//! Bitmaps, asset resolution and text measurement.
//!
//! Loading and decoding files, or rasterizing vector icons, is the shell's
//! business. The compositor only asks a `ResourceProvider` for a bitmap by
//! logical name and size, and a `TextMetrics` for the width of a text run.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::core::{Color, ResourceError, Size};

use super::command::Font;

/// Logical asset names the compositor asks for.
pub mod assets {
    pub const BACKGROUND_ELITE: &str = "textures/papyrus_elite";
    pub const BACKGROUND_NORMAL: &str = "textures/papyrus_normal";
    pub const ICON_MOVEMENT: &str = "icons/boots";
    pub const ICON_ATTACK: &str = "icons/attack";
    pub const ICON_HEART: &str = "icons/hp";
    pub const ICON_SKULL: &str = "icons/skull";
    pub const FIRST_STROKE: &str = "brushes/slash_rising";
    pub const SECOND_STROKE: &str = "brushes/slash_falling";
}

/// Fill of the stand-in bitmap for assets that failed to resolve.
pub const PLACEHOLDER_COLOR: Color = Color::rgb(0xFF, 0x00, 0xFF);

/// Decoded RGBA image. Clones share pixel storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    size: Size,
    pixels: Arc<[Color]>,
}

impl Bitmap {
    /// Wrap row-major pixels. `None` if the count does not match `size`.
    #[must_use]
    pub fn from_pixels(size: Size, pixels: Vec<Color>) -> Option<Self> {
        (pixels.len() == size.area()).then(|| Self {
            size,
            pixels: pixels.into(),
        })
    }

    /// Single-color image.
    #[must_use]
    pub fn solid(size: Size, color: Color) -> Self {
        Self {
            size,
            pixels: vec![color; size.area()].into(),
        }
    }

    /// Stand-in for an asset that could not be resolved.
    #[must_use]
    pub fn placeholder(size: Size) -> Self {
        Self::solid(size, PLACEHOLDER_COLOR)
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.size.width as usize + x as usize)
            .copied()
    }

    /// Nearest-neighbor resample to `size`.
    #[must_use]
    pub fn resized(&self, size: Size) -> Bitmap {
        if size == self.size {
            return self.clone();
        }
        if self.size.is_empty() || size.is_empty() {
            return Bitmap::solid(size, Color::TRANSPARENT);
        }
        let (sw, sh) = (self.size.width as u64, self.size.height as u64);
        let (dw, dh) = (size.width as u64, size.height as u64);
        let mut pixels = Vec::with_capacity(size.area());
        for y in 0..dh {
            let sy = (y * sh / dh) as usize;
            for x in 0..dw {
                let sx = (x * sw / dw) as usize;
                pixels.push(self.pixels[sy * sw as usize + sx]);
            }
        }
        Bitmap {
            size,
            pixels: pixels.into(),
        }
    }

    /// Desaturated copy; alpha is preserved.
    #[must_use]
    pub fn to_grayscale(&self) -> Bitmap {
        Bitmap {
            size: self.size,
            pixels: self.pixels.iter().map(|c| c.grayscale()).collect(),
        }
    }

    /// Per-pixel blend from `self` (t = 0) toward `other` (t = 1).
    ///
    /// `other` is resampled to this bitmap's size first if needed.
    #[must_use]
    pub fn blend(&self, other: &Bitmap, t: f32) -> Bitmap {
        let other = other.resized(self.size);
        Bitmap {
            size: self.size,
            pixels: self
                .pixels
                .iter()
                .zip(other.pixels.iter())
                .map(|(a, b)| a.lerp(*b, t))
                .collect(),
        }
    }
}

/// Source of decoded assets.
pub trait ResourceProvider {
    /// Resolve a logical asset name to a bitmap of (roughly) `size`.
    fn resolve(&self, name: &str, size: Size) -> Result<Bitmap, ResourceError>;

    /// Grayscale variant of a bitmap this provider returned.
    ///
    /// Providers that keep pre-desaturated assets can override this.
    fn grayscale(&self, bitmap: &Bitmap) -> Bitmap {
        bitmap.to_grayscale()
    }
}

/// Provider over bitmaps registered in memory, resampled on request.
#[derive(Clone, Debug, Default)]
pub struct MemoryResources {
    bitmaps: FxHashMap<String, Bitmap>,
}

impl MemoryResources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, bitmap: Bitmap) {
        self.bitmaps.insert(name.into(), bitmap);
    }

    /// Register a bitmap (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, bitmap: Bitmap) -> Self {
        self.insert(name, bitmap);
        self
    }

    /// Register a solid-color stand-in for every built-in asset name.
    #[must_use]
    pub fn with_builtin_solids(mut self) -> Self {
        let solids = [
            (assets::BACKGROUND_ELITE, Color::rgb(0xE0, 0xC8, 0x7A)),
            (assets::BACKGROUND_NORMAL, Color::rgb(0xF0, 0xE6, 0xCB)),
            (assets::ICON_MOVEMENT, Color::rgb(0x5A, 0x3E, 0x1B)),
            (assets::ICON_ATTACK, Color::rgb(0x8B, 0x00, 0x00)),
            (assets::ICON_HEART, Color::rgb(0xC8, 0x44, 0x2F)),
            (assets::ICON_SKULL, Color::rgb(0xE8, 0xE8, 0xE8)),
            (assets::FIRST_STROKE, Color::rgba(0x8B, 0x00, 0x00, 0xC0)),
            (assets::SECOND_STROKE, Color::rgba(0x8B, 0x00, 0x00, 0xC0)),
        ];
        for (name, color) in solids {
            self.insert(name, Bitmap::solid(Size::new(4, 4), color));
        }
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bitmaps.contains_key(name)
    }
}

impl ResourceProvider for MemoryResources {
    fn resolve(&self, name: &str, size: Size) -> Result<Bitmap, ResourceError> {
        self.bitmaps
            .get(name)
            .map(|b| b.resized(size))
            .ok_or_else(|| ResourceError::Unavailable { name: name.to_string() })
    }
}

/// Width of a text run in card units.
pub trait TextMetrics {
    fn text_width(&self, text: &str, font: &Font) -> f32;
}

/// Estimates width as a fixed fraction of the font size per character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AverageAdvance {
    /// Advance of one character relative to the font size.
    pub em_ratio: f32,
}

impl Default for AverageAdvance {
    fn default() -> Self {
        Self { em_ratio: 0.6 }
    }
}

impl TextMetrics for AverageAdvance {
    fn text_width(&self, text: &str, font: &Font) -> f32 {
        text.chars().count() as f32 * f32::from(font.size) * self.em_ratio
    }
}
