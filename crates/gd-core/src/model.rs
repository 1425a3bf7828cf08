//! Core data model for GD layouts.
//!
//! A layout is a flat set of glyph `Instance`s placed inside a bounded
//! `Zone`. Positions are zone-space: relative to the untransformed zone,
//! independent of the current viewport zoom. Styling is limited to a solid
//! RGB color and a numeric font weight.

use crate::css;
use crate::id::{InstanceId, PairId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Font size assigned to freshly placed glyphs, in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 22.0;

// ─── Colors ──────────────────────────────────────────────────────────────

/// Opaque RGB color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string: `#RGB` or `#RRGGBB` (the `#` is optional).
    /// An alpha channel is not representable and is rejected.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Lower-case `#rrggbb`, the form color inputs report.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Resolved CSS form, e.g. `rgb(255, 0, 0)`.
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        css::parse_color(&s).map_err(serde::de::Error::custom)
    }
}

// ─── Font weight ─────────────────────────────────────────────────────────

/// Numeric font weight (CSS `font-weight`, 1..=1000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(u16);

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);

    /// Clamp into the valid CSS range.
    pub fn new(value: u16) -> Self {
        FontWeight(value.clamp(1, 1000))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Serialized as a numeric string (`"400"`), the resolved computed-style form.
impl Serialize for FontWeight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) if n.is_finite() => Ok(FontWeight::new(n.round().clamp(1.0, 1000.0) as u16)),
            Raw::Number(n) => Err(serde::de::Error::custom(format!("invalid font weight {n}"))),
            Raw::Text(s) => css::parse_font_weight(&s).map_err(serde::de::Error::custom),
        }
    }
}

// ─── Zone ────────────────────────────────────────────────────────────────

/// The bounded area glyphs live in, plus where it currently sits in the
/// viewport and how far it is zoomed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub width: f32,
    pub height: f32,
    /// Viewport x of the zone's top-left corner.
    pub left: f32,
    /// Viewport y of the zone's top-left corner.
    pub top: f32,
    /// Viewport pixels per zone unit. Always > 0.
    pub zoom: f32,
}

impl Default for Zone {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            left: 0.0,
            top: 0.0,
            zoom: 1.0,
        }
    }
}

impl Zone {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Vertical centerline used for symmetry reflection.
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Convert viewport coordinates to (unclamped) zone-space.
    pub fn to_zone(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.left) / self.zoom, (y - self.top) / self.zoom)
    }

    /// Clamp a zone-space point into `[0, width] × [0, height]`.
    pub fn clamp(&self, cx: f32, cy: f32) -> (f32, f32) {
        (clamp_axis(cx, self.width), clamp_axis(cy, self.height))
    }

    /// Mirror `cx` through the vertical centerline.
    pub fn reflect_x(&self, cx: f32) -> f32 {
        let center = self.center_x();
        center - (cx - center)
    }
}

fn clamp_axis(v: f32, max: f32) -> f32 {
    // NaN collapses to the origin rather than poisoning the layout.
    if v.is_nan() { 0.0 } else { v.max(0.0).min(max.max(0.0)) }
}

// ─── Instance ────────────────────────────────────────────────────────────

/// One placed, individually transformable glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub id: InstanceId,
    pub glyph: char,
    pub cx: f32,
    pub cy: f32,
    /// Degrees in `[0, 360)`.
    pub rotation: f32,
    /// Horizontal scale magnitude (never negative).
    pub scale_x: f32,
    /// Vertical scale magnitude (never negative).
    pub scale_y: f32,
    pub mirror_x: bool,
    pub mirror_y: bool,
    pub color: Color,
    pub font_weight: FontWeight,
    pub font_size: f32,
    pub z_index: i32,
    pub pair: Option<PairId>,
}

impl Instance {
    /// A glyph at `(cx, cy)` with default transform and styling.
    pub fn new(id: InstanceId, glyph: char, cx: f32, cy: f32, z_index: i32) -> Self {
        Self {
            id,
            glyph,
            cx,
            cy,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            mirror_x: false,
            mirror_y: false,
            color: Color::BLACK,
            font_weight: FontWeight::NORMAL,
            font_size: DEFAULT_FONT_SIZE,
            z_index,
            pair: None,
        }
    }

    pub fn is_paired(&self) -> bool {
        self.pair.is_some()
    }
}

/// Wrap an angle into `[0, 360)`.
pub fn wrap_degrees(deg: f32) -> f32 {
    if !deg.is_finite() {
        return 0.0;
    }
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs,
    // and keeps the sign of -0.0.
    if r >= 360.0 { 0.0 } else { r + 0.0 }
}
