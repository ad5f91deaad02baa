#![forbid(unsafe_code)]

//! Catalog tables: sizes, crusts, base sauces, and toppings.
//!
//! The built-in tables are the storefront's fixed menu. A [`Catalog`] can be
//! narrowed against live inventory with [`Catalog::filtered_by`]; sizes are
//! never filtered because they are not stocked items.
//!
//! # Invariants
//!
//! 1. Topping, crust, and sauce ids are unique within a catalog.
//! 2. Every [`PizzaSize`] has exactly one [`SizeOption`] in the built-in table.
//! 3. Filtering only removes entries, never adds or reprices them.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::inventory::InventoryIndex;
use crate::money::Money;

/// Crust selected when a configuration is created.
pub const DEFAULT_CRUST_ID: &str = "thin";

/// Base sauce selected when a configuration is created.
pub const DEFAULT_SAUCE_ID: &str = "tomato";

// ---------------------------------------------------------------------------
// Toppings
// ---------------------------------------------------------------------------

/// Topping category. Closed set; every topping belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToppingCategory {
    Meat,
    Vegetable,
    Cheese,
    /// Special sauces drizzled on top, distinct from the base sauce.
    Sauce,
}

impl ToppingCategory {
    /// All categories in menu order.
    pub const ALL: [ToppingCategory; 4] = [
        ToppingCategory::Meat,
        ToppingCategory::Vegetable,
        ToppingCategory::Cheese,
        ToppingCategory::Sauce,
    ];

    /// Stable lowercase identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meat => "meat",
            Self::Vegetable => "vegetable",
            Self::Cheese => "cheese",
            Self::Sauce => "sauce",
        }
    }
}

impl fmt::Display for ToppingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable topping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topping {
    /// Stable identifier, unique within a catalog.
    pub id: String,
    /// Display name.
    pub name: String,
    pub category: ToppingCategory,
    /// Unit price.
    pub price: Money,
    /// Display glyph (an emoji in the storefront).
    #[serde(rename = "image")]
    pub glyph: String,
}

impl Topping {
    /// Create a topping.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: ToppingCategory,
        price: u64,
        glyph: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            price: Money::new(price),
            glyph: glyph.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sizes, crusts, sauces
// ---------------------------------------------------------------------------

/// Pizza size. Closed set; each has a fixed base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PizzaSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl PizzaSize {
    /// All sizes, smallest first.
    pub const ALL: [PizzaSize; 3] = [PizzaSize::Small, PizzaSize::Medium, PizzaSize::Large];

    /// Stable lowercase identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Parse an identifier produced by [`as_str`](Self::as_str).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.as_str() == id)
    }
}

impl fmt::Display for PizzaSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A size entry with its base price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOption {
    #[serde(rename = "id")]
    pub size: PizzaSize,
    pub name: String,
    pub base_price: Money,
}

/// A crust entry with its price delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrustOption {
    pub id: String,
    pub name: String,
    pub price: Money,
}

/// A base sauce entry with its price delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SauceOption {
    pub id: String,
    pub name: String,
    pub price: Money,
}

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| {
    use ToppingCategory::{Cheese, Meat, Sauce, Vegetable};

    let sizes = vec![
        size(PizzaSize::Small, "Small (8\")", 45_000),
        size(PizzaSize::Medium, "Medium (12\")", 65_000),
        size(PizzaSize::Large, "Large (16\")", 85_000),
    ];

    let crusts = vec![
        crust("thin", "Thin Crust", 0),
        crust("thick", "Thick Crust", 8_000),
        crust("stuffed", "Cheese Stuffed", 15_000),
    ];

    let sauces = vec![
        sauce("tomato", "Classic Tomato", 0),
        sauce("white", "Garlic White Sauce", 5_000),
        sauce("bbq", "BBQ Sauce", 8_000),
        sauce("pesto", "Basil Pesto", 12_000),
        sauce("spicy", "Spicy Arrabbiata", 10_000),
    ];

    let toppings = vec![
        Topping::new("pepperoni", "Pepperoni", Meat, 15_000, "🍕"),
        Topping::new("sausage", "Italian Sausage", Meat, 18_000, "🌭"),
        Topping::new("bacon", "Crispy Bacon", Meat, 20_000, "🥓"),
        Topping::new("chicken", "Grilled Chicken", Meat, 22_000, "🍗"),
        Topping::new("ham", "Smoked Ham", Meat, 17_000, "🍖"),
        Topping::new("mushrooms", "Fresh Mushrooms", Vegetable, 12_000, "🍄"),
        Topping::new("bell-peppers", "Bell Peppers", Vegetable, 10_000, "🫑"),
        Topping::new("onions", "Red Onions", Vegetable, 8_000, "🧅"),
        Topping::new("tomatoes", "Cherry Tomatoes", Vegetable, 12_000, "🍅"),
        Topping::new("olives", "Black Olives", Vegetable, 15_000, "🫒"),
        Topping::new("spinach", "Fresh Spinach", Vegetable, 10_000, "🥬"),
        Topping::new("jalapenos", "Jalapeños", Vegetable, 13_000, "🌶️"),
        Topping::new("mozzarella", "Extra Mozzarella", Cheese, 18_000, "🧀"),
        Topping::new("parmesan", "Parmesan", Cheese, 20_000, "🧀"),
        Topping::new("cheddar", "Sharp Cheddar", Cheese, 16_000, "🧀"),
        Topping::new("goat-cheese", "Goat Cheese", Cheese, 25_000, "🧀"),
        Topping::new("truffle-oil", "Truffle Oil", Sauce, 30_000, "🫒"),
        Topping::new("ranch", "Ranch Drizzle", Sauce, 8_000, "🥗"),
        Topping::new("hot-sauce", "Sriracha Swirl", Sauce, 10_000, "🌶️"),
        Topping::new("pesto-drizzle", "Pesto Drizzle", Sauce, 15_000, "🌿"),
    ];

    Catalog::new(sizes, crusts, sauces, toppings)
});

fn size(size: PizzaSize, name: &str, base_price: u64) -> SizeOption {
    SizeOption {
        size,
        name: name.to_owned(),
        base_price: Money::new(base_price),
    }
}

fn crust(id: &str, name: &str, price: u64) -> CrustOption {
    CrustOption {
        id: id.to_owned(),
        name: name.to_owned(),
        price: Money::new(price),
    }
}

fn sauce(id: &str, name: &str, price: u64) -> SauceOption {
    SauceOption {
        id: id.to_owned(),
        name: name.to_owned(),
        price: Money::new(price),
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The set of selectable sizes, crusts, sauces, and toppings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    sizes: Vec<SizeOption>,
    crusts: Vec<CrustOption>,
    sauces: Vec<SauceOption>,
    toppings: Vec<Topping>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Assemble a catalog from explicit tables.
    pub fn new(
        sizes: Vec<SizeOption>,
        crusts: Vec<CrustOption>,
        sauces: Vec<SauceOption>,
        toppings: Vec<Topping>,
    ) -> Self {
        Self {
            sizes,
            crusts,
            sauces,
            toppings,
        }
    }

    /// The storefront's built-in menu.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn sizes(&self) -> &[SizeOption] {
        &self.sizes
    }

    pub fn crusts(&self) -> &[CrustOption] {
        &self.crusts
    }

    pub fn sauces(&self) -> &[SauceOption] {
        &self.sauces
    }

    pub fn toppings(&self) -> &[Topping] {
        &self.toppings
    }

    /// Look up a size entry.
    pub fn size(&self, size: PizzaSize) -> Option<&SizeOption> {
        self.sizes.iter().find(|s| s.size == size)
    }

    /// Look up a crust by id.
    pub fn crust(&self, id: &str) -> Option<&CrustOption> {
        self.crusts.iter().find(|c| c.id == id)
    }

    /// Look up a base sauce by id.
    pub fn sauce(&self, id: &str) -> Option<&SauceOption> {
        self.sauces.iter().find(|s| s.id == id)
    }

    /// Look up a topping by id.
    pub fn topping(&self, id: &str) -> Option<&Topping> {
        self.toppings.iter().find(|t| t.id == id)
    }

    /// Toppings of one category, in menu order.
    pub fn toppings_in(&self, category: ToppingCategory) -> impl Iterator<Item = &Topping> {
        self.toppings.iter().filter(move |t| t.category == category)
    }

    /// Crust a new configuration starts with.
    ///
    /// Prefers [`DEFAULT_CRUST_ID`], otherwise the first listed crust.
    pub fn default_crust(&self) -> Option<&CrustOption> {
        self.crust(DEFAULT_CRUST_ID).or_else(|| self.crusts.first())
    }

    /// Base sauce a new configuration starts with.
    ///
    /// Prefers [`DEFAULT_SAUCE_ID`], otherwise the first listed sauce.
    pub fn default_sauce(&self) -> Option<&SauceOption> {
        self.sauce(DEFAULT_SAUCE_ID).or_else(|| self.sauces.first())
    }

    /// Narrow this catalog to entries present in live inventory.
    ///
    /// An entry survives when its display name or its id matches an
    /// available inventory record after normalization. Sizes are kept as-is.
    #[must_use]
    pub fn filtered_by(&self, index: &InventoryIndex) -> Catalog {
        let crusts: Vec<_> = self
            .crusts
            .iter()
            .filter(|c| index.matches(&c.name) || index.matches(&c.id))
            .cloned()
            .collect();
        let sauces: Vec<_> = self
            .sauces
            .iter()
            .filter(|s| index.matches(&s.name) || index.matches(&s.id))
            .cloned()
            .collect();
        let toppings: Vec<_> = self
            .toppings
            .iter()
            .filter(|t| index.matches(&t.name) || index.matches(&t.id))
            .cloned()
            .collect();

        crate::debug!(
            crusts = crusts.len(),
            sauces = sauces.len(),
            toppings = toppings.len(),
            "catalog filtered by inventory"
        );

        Catalog {
            sizes: self.sizes.clone(),
            crusts,
            sauces,
            toppings,
        }
    }
}
