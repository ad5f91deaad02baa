#![forbid(unsafe_code)]

//! Positional jitter and session seeding.
//!
//! Ring positions are perturbed so the toppings look hand-placed. The
//! perturbation is drawn from a caller-supplied generator; nothing here
//! reaches for ambient randomness.
//!
//! # Invariants
//!
//! 1. Each axis offset lies in `[-amplitude / 2, amplitude / 2)`.
//! 2. The x offset is drawn before the y offset, one pair per call.
//! 3. [`config_seed`] is a pure function of the configuration.

use pizzart_core::PizzaConfig;
use pizzart_core::geometry::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Full width of the jitter window on each axis, in percent.
pub const DEFAULT_AMPLITUDE: f32 = 8.0;

/// Uniform per-axis jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    amplitude: f32,
}

impl Default for Jitter {
    fn default() -> Self {
        Self::new(DEFAULT_AMPLITUDE)
    }
}

impl Jitter {
    /// Jitter with the given full window width. Negative or NaN widths
    /// are treated as zero.
    pub fn new(amplitude: f32) -> Self {
        let amplitude = if amplitude.is_nan() { 0.0 } else { amplitude.max(0.0) };
        Self { amplitude }
    }

    /// No jitter at all.
    pub const fn none() -> Self {
        Self { amplitude: 0.0 }
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Draw one `(dx, dy)` pair.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (f32, f32) {
        let dx = (rng.random::<f32>() - 0.5) * self.amplitude;
        let dy = (rng.random::<f32>() - 0.5) * self.amplitude;
        (dx, dy)
    }

    /// Offset `point` by one sample.
    pub fn apply<R: Rng + ?Sized>(&self, point: Point, rng: &mut R) -> Point {
        let (dx, dy) = self.sample(rng);
        point.offset(dx, dy)
    }
}

/// Generator for a builder session.
pub fn session_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Derive a stable seed from a configuration, so the same pizza always
/// renders the same way (for example in the community gallery).
pub fn config_seed(config: &PizzaConfig) -> u64 {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut mix = |bytes: &[u8]| {
        for &b in bytes {
            state ^= u64::from(b);
            // xorshift64
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
        }
        // field separator
        state = state.rotate_left(5) ^ 0xff;
    };

    mix(config.size.as_str().as_bytes());
    mix(config.crust.as_bytes());
    mix(config.sauce.as_bytes());
    for topping in &config.toppings {
        mix(topping.id.as_bytes());
    }
    state
}
