#![forbid(unsafe_code)]

//! Opaque RGB tints used by the preview.

use std::fmt;

use serde::{Serialize, Serializer};

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Tint {
    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// Packed `0xRRGGBB` value.
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Tint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Palette. Names follow the storefront's colour scale.

pub const WHITE: Tint = Tint::from_hex(0xffffff);
pub const GRAY_100: Tint = Tint::from_hex(0xf3f4f6);
pub const RED_600: Tint = Tint::from_hex(0xdc2626);
pub const RED_700: Tint = Tint::from_hex(0xb91c1c);
pub const RED_800: Tint = Tint::from_hex(0x991b1b);
pub const AMBER_700: Tint = Tint::from_hex(0xb45309);
pub const AMBER_800: Tint = Tint::from_hex(0x92400e);
pub const AMBER_900: Tint = Tint::from_hex(0x78350f);
pub const YELLOW_200: Tint = Tint::from_hex(0xfef08a);
pub const YELLOW_400: Tint = Tint::from_hex(0xfacc15);
pub const YELLOW_600: Tint = Tint::from_hex(0xca8a04);
pub const GREEN_600: Tint = Tint::from_hex(0x16a34a);
pub const GREEN_700: Tint = Tint::from_hex(0x15803d);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip_and_display() {
        assert_eq!(RED_700.to_hex(), 0xb91c1c);
        assert_eq!(RED_700.to_string(), "#b91c1c");
        assert_eq!(Tint::from_hex(0x000a0b).to_string(), "#000a0b");
    }
}
