#![forbid(unsafe_code)]

//! How a non-sauce topping is drawn: how many icons, which glyph, how big.

use pizzart_core::{Topping, ToppingCategory};
use serde::Serialize;

/// Relative glyph size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphScale {
    Small,
    Large,
    ExtraLarge,
}

/// Icon treatment for one topping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconSpec {
    pub glyph: String,
    pub repetitions: usize,
    pub scale: GlyphScale,
}

/// Number of icons scattered for a topping, or `None` for special sauces,
/// which are drawn as overlays instead.
pub fn repetitions(topping: &Topping) -> Option<usize> {
    match topping.category {
        ToppingCategory::Meat if topping.id == "pepperoni" => Some(8),
        ToppingCategory::Meat => Some(6),
        ToppingCategory::Vegetable => Some(7),
        ToppingCategory::Cheese => Some(10),
        ToppingCategory::Sauce => None,
    }
}

/// Glyph size for a category, or `None` for special sauces.
pub fn glyph_scale(category: ToppingCategory) -> Option<GlyphScale> {
    match category {
        ToppingCategory::Meat => Some(GlyphScale::ExtraLarge),
        ToppingCategory::Vegetable => Some(GlyphScale::Large),
        ToppingCategory::Cheese => Some(GlyphScale::Small),
        ToppingCategory::Sauce => None,
    }
}

/// Glyph drawn on the pizza. Cheeses use shaped blobs rather than the
/// wedge shown in the picker.
pub fn display_glyph(topping: &Topping) -> &str {
    match (topping.category, topping.id.as_str()) {
        (ToppingCategory::Cheese, "mozzarella" | "goat-cheese") => "⚪",
        (ToppingCategory::Cheese, "cheddar") => "🟡",
        (ToppingCategory::Cheese, "parmesan") => "🟨",
        _ => &topping.glyph,
    }
}

/// Full icon treatment, or `None` for special sauces.
pub fn icon_spec(topping: &Topping) -> Option<IconSpec> {
    Some(IconSpec {
        glyph: display_glyph(topping).to_owned(),
        repetitions: repetitions(topping)?,
        scale: glyph_scale(topping.category)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizzart_core::Catalog;

    fn topping(id: &str) -> Topping {
        Catalog::builtin().topping(id).cloned().unwrap()
    }

    #[test]
    fn repetition_table() {
        assert_eq!(repetitions(&topping("pepperoni")), Some(8));
        assert_eq!(repetitions(&topping("bacon")), Some(6));
        assert_eq!(repetitions(&topping("spinach")), Some(7));
        assert_eq!(repetitions(&topping("cheddar")), Some(10));
        assert_eq!(repetitions(&topping("ranch")), None);
    }

    #[test]
    fn cheese_glyphs_are_substituted() {
        assert_eq!(display_glyph(&topping("mozzarella")), "⚪");
        assert_eq!(display_glyph(&topping("goat-cheese")), "⚪");
        assert_eq!(display_glyph(&topping("cheddar")), "🟡");
        assert_eq!(display_glyph(&topping("parmesan")), "🟨");
        assert_eq!(display_glyph(&topping("olives")), "🫒");
    }

    #[test]
    fn sauces_have_no_icon() {
        for t in Catalog::builtin().toppings_in(ToppingCategory::Sauce) {
            assert!(icon_spec(t).is_none(), "{} should be an overlay", t.id);
        }
    }

    #[test]
    fn every_other_topping_has_an_icon() {
        let catalog = Catalog::builtin();
        let drawn = catalog
            .toppings()
            .iter()
            .filter(|t| t.category != ToppingCategory::Sauce);
        for t in drawn {
            let spec = icon_spec(t).unwrap();
            assert!(spec.repetitions >= 6);
        }
    }
}
