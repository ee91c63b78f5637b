//! RGBA colors.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const GOLD: Color = Color::rgb(0xFF, 0xD7, 0x00);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Opaque color from channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    ///
    /// ```
    /// use combat_cards::core::Color;
    ///
    /// assert_eq!(Color::from_hex("#18A86B"), Some(Color::rgb(0x18, 0xA8, 0x6B)));
    /// assert_eq!(Color::from_hex("18A86B"), None);
    /// ```
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Format as `#RRGGBB` (alpha omitted when opaque).
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 0xFF {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Channel-wise linear blend from `self` (t = 0) to `other` (t = 1).
    ///
    /// `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| -> u8 {
            let v = f32::from(a) + (f32::from(b) - f32::from(a)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Perceived brightness (ITU-R BT.601 weights), 0..=255.
    #[must_use]
    pub fn luma(self) -> u8 {
        let l = 0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b);
        l.round().clamp(0.0, 255.0) as u8
    }

    /// Fully desaturated version of this color, alpha preserved.
    #[must_use]
    pub fn grayscale(self) -> Color {
        let l = self.luma();
        Color::rgba(l, l, l, self.a)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = Color::rgb(0xF0, 0x78, 0x18);
        assert_eq!(c.to_hex(), "#F07818");
        assert_eq!(Color::from_hex(&c.to_hex()), Some(c));

        let translucent = Color::rgba(1, 2, 3, 4);
        assert_eq!(translucent.to_hex(), "#01020304");
        assert_eq!(Color::from_hex("#01020304"), Some(translucent));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
        assert_eq!(Color::from_hex(""), None);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Color::rgb(0, 100, 200);
        let b = Color::rgb(200, 100, 0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Color::rgb(100, 100, 100));
        assert_eq!(a.lerp(b, 7.0), b);
        assert_eq!(a.lerp(b, f32::NAN), a);
    }

    #[test]
    fn test_grayscale_preserves_alpha() {
        let c = Color::rgba(255, 0, 0, 80);
        let g = c.grayscale();
        assert_eq!(g.r, g.g);
        assert_eq!(g.g, g.b);
        assert_eq!(g.r, 76);
        assert_eq!(g.a, 80);
    }

    #[test]
    fn test_white_stays_white() {
        assert_eq!(Color::WHITE.grayscale(), Color::WHITE);
    }
}
