#![forbid(unsafe_code)]

//! Preview plan: everything needed to draw a configured pizza.
//!
//! The plan is a flat list of layers with z-indices. From the bottom up:
//! the sauce-tinted disc inside its crust rim, the base cheese layer, sauce
//! overlays, topping icons (one z per topping, in selection order), and a
//! shine highlight on top.

use pizzart_core::{PizzaConfig, PizzaSize, ToppingCategory};
use rand::Rng;
use serde::Serialize;

use crate::icon::{GlyphScale, icon_spec};
use crate::overlay::SauceOverlay;
use crate::tint::{self, Tint};
use crate::{ToppingLayout, generate_layout};

/// z-index of the base cheese layer.
pub const BASE_CHEESE_Z: i32 = 1;
/// z-index of the first topping's icons; later toppings stack above.
pub const TOPPING_BASE_Z: i32 = 15;
/// z-index of the shine highlight.
pub const SHINE_Z: i32 = 20;

/// Disc diameter in pixels.
pub const fn disc_diameter(size: PizzaSize) -> u16 {
    match size {
        PizzaSize::Small => 192,
        PizzaSize::Medium => 256,
        PizzaSize::Large => 320,
    }
}

/// Crust border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrustRim {
    pub width_px: u16,
    pub tint: Tint,
}

/// Rim for a crust id; unknown crusts draw as thin.
pub fn crust_rim(crust: &str) -> CrustRim {
    match crust {
        "thick" => CrustRim {
            width_px: 8,
            tint: tint::AMBER_800,
        },
        "stuffed" => CrustRim {
            width_px: 10,
            tint: tint::YELLOW_600,
        },
        _ => CrustRim {
            width_px: 6,
            tint: tint::AMBER_700,
        },
    }
}

/// Disc colour for a base sauce id; unknown sauces draw as tomato.
pub fn sauce_tint(sauce: &str) -> Tint {
    match sauce {
        "white" => tint::GRAY_100,
        "bbq" => tint::AMBER_900,
        "pesto" => tint::GREEN_700,
        "spicy" => tint::RED_800,
        _ => tint::RED_700,
    }
}

/// A special-sauce overlay in the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayLayer {
    pub topping_id: String,
    pub overlay: SauceOverlay,
    pub z: i32,
}

/// All icons for one topping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconLayer {
    pub topping_id: String,
    pub glyph: String,
    pub scale: GlyphScale,
    pub z: i32,
    pub layout: ToppingLayout,
}

/// Complete drawing instructions for a configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewPlan {
    pub diameter_px: u16,
    pub rim: CrustRim,
    pub sauce: Tint,
    pub base_cheese: Tint,
    pub overlays: Vec<OverlayLayer>,
    pub icons: Vec<IconLayer>,
}

impl PreviewPlan {
    /// Total number of icons drawn.
    pub fn icon_count(&self) -> usize {
        self.icons.iter().map(|l| l.layout.len()).sum()
    }

    /// Highest z-index used by any layer.
    pub fn top_z(&self) -> i32 {
        SHINE_Z
    }
}

/// Plan the preview for `config`, drawing icon positions from `rng`.
///
/// Icons are laid out in selection order, so a given generator state always
/// produces the same plan for the same configuration.
pub fn plan_preview<R: Rng + ?Sized>(config: &PizzaConfig, rng: &mut R) -> PreviewPlan {
    let overlays = config
        .toppings
        .in_category(ToppingCategory::Sauce)
        .filter_map(|t| {
            SauceOverlay::for_topping_id(&t.id).map(|overlay| OverlayLayer {
                topping_id: t.id.clone(),
                overlay,
                z: overlay.z_index(),
            })
        })
        .collect();

    let icons = config
        .toppings
        .iter()
        .filter(|t| t.category != ToppingCategory::Sauce)
        .enumerate()
        .filter_map(|(index, t)| {
            let spec = icon_spec(t)?;
            let z = TOPPING_BASE_Z.saturating_add(i32::try_from(index).unwrap_or(i32::MAX));
            Some(IconLayer {
                topping_id: t.id.clone(),
                glyph: spec.glyph,
                scale: spec.scale,
                z,
                layout: generate_layout(t.category, spec.repetitions, &mut *rng),
            })
        })
        .collect();

    PreviewPlan {
        diameter_px: disc_diameter(config.size),
        rim: crust_rim(&config.crust),
        sauce: sauce_tint(&config.sauce),
        base_cheese: tint::YELLOW_200,
        overlays,
        icons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jitter::session_rng;
    use pizzart_core::Catalog;

    fn config_with(ids: &[&str]) -> PizzaConfig {
        let catalog = Catalog::builtin();
        ids.iter().fold(PizzaConfig::default_for(&catalog), |c, id| {
            c.with_topping(catalog.topping(id).unwrap())
        })
    }

    #[test]
    fn size_crust_and_sauce_styling() {
        let config = config_with(&[])
            .with_size(PizzaSize::Large)
            .with_crust("stuffed")
            .with_sauce("pesto");
        let plan = plan_preview(&config, &mut session_rng(1));
        assert_eq!(plan.diameter_px, 320);
        assert_eq!(plan.rim.width_px, 10);
        assert_eq!(plan.rim.tint, tint::YELLOW_600);
        assert_eq!(plan.sauce, tint::GREEN_700);
        assert_eq!(plan.icon_count(), 0);
    }

    #[test]
    fn unknown_ids_fall_back() {
        assert_eq!(crust_rim("cauliflower"), crust_rim("thin"));
        assert_eq!(sauce_tint("ketchup"), sauce_tint("tomato"));
    }

    #[test]
    fn sauces_become_overlays_not_icons() {
        let config = config_with(&["ranch", "pepperoni", "truffle-oil", "mushrooms"]);
        let plan = plan_preview(&config, &mut session_rng(9));

        let overlays: Vec<_> = plan.overlays.iter().map(|o| o.overlay).collect();
        assert_eq!(overlays, [SauceOverlay::RanchLines, SauceOverlay::TruffleWash]);
        assert_eq!(plan.icons.len(), 2);
        assert_eq!(plan.icon_count(), 8 + 7);
    }

    #[test]
    fn icon_z_follows_selection_order_among_drawn_toppings() {
        let config = config_with(&["hot-sauce", "cheddar", "ham"]);
        let plan = plan_preview(&config, &mut session_rng(3));
        assert_eq!(plan.icons[0].topping_id, "cheddar");
        assert_eq!(plan.icons[0].z, 15);
        assert_eq!(plan.icons[0].glyph, "🟡");
        assert_eq!(plan.icons[1].z, 16);
        assert!(plan.icons.iter().all(|l| l.z < plan.top_z()));
        assert!(plan.overlays.iter().all(|o| o.z > BASE_CHEESE_Z));
    }

    #[test]
    fn plan_is_reproducible_from_seed() {
        let config = config_with(&["bacon", "olives", "parmesan"]);
        let a = plan_preview(&config, &mut session_rng(77));
        let b = plan_preview(&config, &mut session_rng(77));
        assert_eq!(a, b);
    }
}
