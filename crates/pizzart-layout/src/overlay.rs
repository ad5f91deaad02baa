#![forbid(unsafe_code)]

//! Special-sauce overlays.
//!
//! Sauce-category toppings are not scattered as icons. Each known sauce maps
//! to a fixed pattern: either a translucent wash over the disc or a set of
//! drizzle strokes. Unknown sauce ids have no overlay.
//!
//! Stroke geometry is in percent of the disc: `top` is the stroke's vertical
//! position, `left` and `right` are the insets from each edge.

use serde::Serialize;

use crate::tint::{self, Tint};

/// z-layer of a wash overlay; below drizzles and icons.
pub const WASH_Z: i32 = 5;
/// z-layer of drizzle strokes.
pub const DRIZZLE_Z: i32 = 10;

/// Overlay kinds, one per known special sauce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SauceOverlay {
    /// Golden wash for truffle oil.
    TruffleWash,
    /// Four white parallel lines for ranch.
    RanchLines,
    /// Three red lines for hot sauce.
    HotSauceLines,
    /// Three slanted green lines for pesto.
    PestoLines,
}

/// One drizzle line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    /// Clockwise rotation in degrees.
    pub rotation: f32,
    pub tint: Tint,
    pub opacity: f32,
}

/// Drawable description of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayPattern {
    /// Flat wash inset `inset_px` from the disc edge.
    Wash { inset_px: u16, tint: Tint, opacity: f32 },
    /// Drizzle lines.
    Strokes { strokes: &'static [Stroke] },
}

const fn pct(num: u8, den: u8) -> f32 {
    num as f32 * 100.0 / den as f32
}

const fn line(top: f32, left: f32, right: f32, rotation: f32, tint: Tint, opacity: f32) -> Stroke {
    Stroke {
        top,
        left,
        right,
        rotation,
        tint,
        opacity,
    }
}

const RANCH: [Stroke; 4] = [
    line(pct(1, 4), pct(1, 4), pct(1, 4), 0.0, tint::WHITE, 0.8),
    line(pct(2, 5), pct(1, 5), pct(1, 5), 0.0, tint::WHITE, 0.8),
    line(pct(3, 5), pct(1, 4), pct(1, 4), 0.0, tint::WHITE, 0.8),
    line(pct(3, 4), pct(1, 3), pct(1, 3), 0.0, tint::WHITE, 0.8),
];

const HOT_SAUCE: [Stroke; 3] = [
    line(pct(1, 3), pct(1, 4), pct(1, 4), 0.0, tint::RED_600, 0.9),
    line(pct(1, 2), pct(1, 5), pct(1, 5), 0.0, tint::RED_600, 0.9),
    line(pct(2, 3), pct(1, 3), pct(1, 3), 0.0, tint::RED_600, 0.9),
];

const PESTO: [Stroke; 3] = [
    line(pct(1, 4), pct(1, 5), pct(1, 3), 12.0, tint::GREEN_600, 0.8),
    line(pct(1, 2), pct(1, 3), pct(1, 5), -12.0, tint::GREEN_600, 0.8),
    line(pct(3, 4), pct(1, 4), pct(1, 4), 6.0, tint::GREEN_600, 0.8),
];

impl SauceOverlay {
    /// Overlay for a special-sauce topping id, if it has one.
    pub fn for_topping_id(id: &str) -> Option<Self> {
        match id {
            "truffle-oil" => Some(Self::TruffleWash),
            "ranch" => Some(Self::RanchLines),
            "hot-sauce" => Some(Self::HotSauceLines),
            "pesto-drizzle" => Some(Self::PestoLines),
            _ => None,
        }
    }

    pub const fn z_index(self) -> i32 {
        match self {
            Self::TruffleWash => WASH_Z,
            Self::RanchLines | Self::HotSauceLines | Self::PestoLines => DRIZZLE_Z,
        }
    }

    pub fn pattern(self) -> OverlayPattern {
        match self {
            Self::TruffleWash => OverlayPattern::Wash {
                inset_px: 8,
                tint: tint::YELLOW_400,
                opacity: 0.3,
            },
            Self::RanchLines => OverlayPattern::Strokes { strokes: &RANCH },
            Self::HotSauceLines => OverlayPattern::Strokes {
                strokes: &HOT_SAUCE,
            },
            Self::PestoLines => OverlayPattern::Strokes { strokes: &PESTO },
        }
    }

    /// Number of drizzle lines; zero for a wash.
    pub fn stroke_count(self) -> usize {
        match self.pattern() {
            OverlayPattern::Wash { .. } => 0,
            OverlayPattern::Strokes { strokes } => strokes.len(),
        }
    }
}
