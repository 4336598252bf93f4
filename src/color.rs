//! CSS colour strings → RGBA.

use crate::error::{Result, StitchError};

/// RGBA colour (0.0 – 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

const NAMED: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("lime", [0, 255, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("silver", [192, 192, 192]),
    ("darkgray", [169, 169, 169]),
    ("darkgrey", [169, 169, 169]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
];

impl Rgba {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    fn from_bytes(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a,
        }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(...)`, `rgba(...)`
    /// or a basic CSS colour name.
    pub fn parse(value: &str) -> Result<Self> {
        let s = value.trim().to_ascii_lowercase();
        let parsed = if let Some(hex) = s.strip_prefix('#') {
            Self::from_hex(hex)
        } else if let Some(args) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
            Self::from_function(args, true)
        } else if let Some(args) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
            Self::from_function(args, false)
        } else if s == "transparent" {
            Some(Self { a: 0.0, ..Self::BLACK })
        } else {
            NAMED
                .iter()
                .find(|(name, _)| *name == s)
                .map(|(_, [r, g, b])| Self::from_bytes(*r, *g, *b, 1.0))
        };
        parsed.ok_or_else(|| StitchError::InvalidColor(value.to_string()))
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1].repeat(2), 16).ok();
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Self::from_bytes(digit(0)?, digit(1)?, digit(2)?, 1.0)),
            4 => Some(Self::from_bytes(
                digit(0)?,
                digit(1)?,
                digit(2)?,
                f32::from(digit(3)?) / 255.0,
            )),
            6 => Some(Self::from_bytes(pair(0)?, pair(2)?, pair(4)?, 1.0)),
            8 => Some(Self::from_bytes(
                pair(0)?,
                pair(2)?,
                pair(4)?,
                f32::from(pair(6)?) / 255.0,
            )),
            _ => None,
        }
    }

    fn from_function(args: &str, with_alpha: bool) -> Option<Self> {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let expected = if with_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }
        let channel = |p: &str| -> Option<u8> {
            match p.strip_suffix('%') {
                Some(pct) => {
                    let v: f32 = pct.trim().parse().ok()?;
                    Some((v.clamp(0.0, 100.0) * 2.55).round() as u8)
                }
                None => {
                    let v: f32 = p.parse().ok()?;
                    Some(v.clamp(0.0, 255.0).round() as u8)
                }
            }
        };
        let alpha = if with_alpha {
            parts[3].parse::<f32>().ok()?.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Some(Self::from_bytes(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }

    /// `#rrggbb` form, used for SVG `stroke`.
    pub fn to_hex(&self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}
