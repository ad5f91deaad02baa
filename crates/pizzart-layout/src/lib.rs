#![forbid(unsafe_code)]

//! Topping placement and preview planning.
//!
//! - [`generate_layout`] - scatter `count` icons over one or two rings
//! - [`jitter`] - per-axis perturbation and session seeding
//! - [`icon`] - repetition counts and glyphs per topping
//! - [`overlay`] - special-sauce overlay patterns
//! - [`preview`] - complete render plan for a configuration
//!
//! # Ring Layout
//!
//! Positions are percentages of the disc's bounding square, centred on
//! `(50, 50)`. Up to [`MAX_SINGLE_RING`] icons share one ring of radius
//! [`SINGLE_RADIUS`]. Larger counts split into an inner ring holding
//! `⌈count / 2⌉` icons at [`INNER_RADIUS`] and an outer ring holding the
//! rest at [`OUTER_RADIUS`]; inner placements come first.
//!
//! Slot `i` of a ring of `k` sits at angle `2π·i/k`. Each slot is jittered
//! and then clamped into [`VISIBLE`].
//!
//! # Invariants
//!
//! 1. `generate_layout(_, n, _)` returns exactly `n` placements.
//! 2. Every placement lies in `[15, 85]²`.
//! 3. The same generator state yields the same layout.
//!
//! # Failure Modes
//!
//! - Zero count: empty layout, no randomness consumed.

pub mod icon;
pub mod jitter;
pub mod overlay;
pub mod preview;
pub mod tint;

use std::f32::consts::TAU;

use pizzart_core::ToppingCategory;
use pizzart_core::geometry::{Bounds, Point};
use rand::Rng;
use serde::Serialize;

pub use icon::{GlyphScale, IconSpec, icon_spec};
pub use jitter::{Jitter, config_seed, session_rng};
pub use overlay::{OverlayPattern, SauceOverlay, Stroke};
pub use preview::{CrustRim, IconLayer, OverlayLayer, PreviewPlan, plan_preview};
pub use tint::Tint;

/// Largest count drawn on a single ring.
pub const MAX_SINGLE_RING: usize = 6;
/// Radius of the single ring.
pub const SINGLE_RADIUS: f32 = 25.0;
/// Radius of the inner ring when two rings are used.
pub const INNER_RADIUS: f32 = 15.0;
/// Radius of the outer ring when two rings are used.
pub const OUTER_RADIUS: f32 = 30.0;
/// Region every placement is clamped into.
pub const VISIBLE: Bounds = Bounds::new(15.0, 85.0);

// ---------------------------------------------------------------------------
// Rings
// ---------------------------------------------------------------------------

/// Which ring a placement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RingKind {
    Single,
    Inner,
    Outer,
}

impl RingKind {
    pub const fn radius(self) -> f32 {
        match self {
            Self::Single => SINGLE_RADIUS,
            Self::Inner => INNER_RADIUS,
            Self::Outer => OUTER_RADIUS,
        }
    }
}

/// How many slots a ring holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingSpec {
    pub kind: RingKind,
    pub slots: usize,
}

/// Split `count` icons over rings, innermost first. Empty rings are omitted.
pub fn ring_plan(count: usize) -> Vec<RingSpec> {
    match count {
        0 => Vec::new(),
        n if n <= MAX_SINGLE_RING => vec![RingSpec {
            kind: RingKind::Single,
            slots: n,
        }],
        n => {
            let inner = n.div_ceil(2);
            vec![
                RingSpec {
                    kind: RingKind::Inner,
                    slots: inner,
                },
                RingSpec {
                    kind: RingKind::Outer,
                    slots: n - inner,
                },
            ]
        }
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// One icon position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub position: Point,
    pub ring: RingKind,
    /// Slot index within the ring.
    pub slot: usize,
}

/// Positions for one topping's icons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToppingLayout {
    pub category: ToppingCategory,
    placements: Vec<Placement>,
}

impl ToppingLayout {
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Placement> {
        self.placements.iter()
    }

    /// Positions only, in placement order.
    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.placements.iter().map(|p| p.position)
    }

    /// Number of placements on `ring`.
    pub fn count_on(&self, ring: RingKind) -> usize {
        self.placements.iter().filter(|p| p.ring == ring).count()
    }
}

impl<'a> IntoIterator for &'a ToppingLayout {
    type Item = &'a Placement;
    type IntoIter = std::slice::Iter<'a, Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.iter()
    }
}

/// Lay out `count` icons for a topping of `category` with default jitter.
pub fn generate_layout<R: Rng + ?Sized>(
    category: ToppingCategory,
    count: usize,
    rng: &mut R,
) -> ToppingLayout {
    generate_layout_with(category, count, Jitter::default(), rng)
}

/// Like [`generate_layout`] with explicit jitter.
pub fn generate_layout_with<R: Rng + ?Sized>(
    category: ToppingCategory,
    count: usize,
    jitter: Jitter,
    rng: &mut R,
) -> ToppingLayout {
    let mut placements = Vec::with_capacity(count);
    for ring in ring_plan(count) {
        place_ring(ring, jitter, rng, &mut placements);
    }
    pizzart_core::trace!(
        category = %category,
        count,
        "topping layout generated"
    );
    ToppingLayout {
        category,
        placements,
    }
}

fn place_ring<R: Rng + ?Sized>(
    ring: RingSpec,
    jitter: Jitter,
    rng: &mut R,
    out: &mut Vec<Placement>,
) {
    let radius = ring.kind.radius();
    for slot in 0..ring.slots {
        let angle = TAU * slot as f32 / ring.slots as f32;
        let ideal = Point::from_polar(Point::CENTER, radius, angle);
        let position = jitter.apply(ideal, rng).clamp(VISIBLE);
        out.push(Placement {
            position,
            ring: ring.kind,
            slot,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
