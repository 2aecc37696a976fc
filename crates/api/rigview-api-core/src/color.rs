//! RGB color newtype shared by backgrounds, tints, and overlay guides.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RigError;

/// Packed 0xRRGGBB color.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const BLACK: Color = Color(0x000000);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Parse a `#rrggbb` (or bare `rrggbb`) hex string.
    pub fn from_hex(value: &str) -> Result<Self, RigError> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if digits.len() != 6 {
            return Err(RigError::InvalidColor {
                value: value.to_string(),
            });
        }
        u32::from_str_radix(digits, 16)
            .map(Color)
            .map_err(|_| RigError::InvalidColor {
                value: value.to_string(),
            })
    }

    pub const fn red(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub const fn blue(self) -> u8 {
        (self.0 & 0xff) as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}
