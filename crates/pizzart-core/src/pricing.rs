#![forbid(unsafe_code)]

//! Pricing: configuration → total.
//!
//! `total = base(size) + delta(crust) + delta(sauce) + Σ price(topping)`.
//!
//! Pricing never fails. A size, crust, or sauce that the catalog does not
//! know contributes zero; absent data adds nothing to the bill.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::money::Money;
use crate::pizza::PizzaConfig;

/// Itemised price of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub size: Money,
    pub crust: Money,
    pub sauce: Money,
    pub toppings: Money,
}

impl PriceBreakdown {
    /// Itemise `config` against `catalog`.
    pub fn of(catalog: &Catalog, config: &PizzaConfig) -> Self {
        let size = catalog
            .size(config.size)
            .map_or(Money::ZERO, |s| s.base_price);
        let crust = catalog.crust(&config.crust).map_or(Money::ZERO, |c| c.price);
        let sauce = catalog.sauce(&config.sauce).map_or(Money::ZERO, |s| s.price);
        let toppings = config.toppings.iter().map(|t| t.price).sum();

        if catalog.crust(&config.crust).is_none() {
            crate::trace!(crust = %config.crust, "unknown crust priced at zero");
        }
        if catalog.sauce(&config.sauce).is_none() {
            crate::trace!(sauce = %config.sauce, "unknown sauce priced at zero");
        }

        Self {
            size,
            crust,
            sauce,
            toppings,
        }
    }

    /// Sum of all components.
    pub fn total(&self) -> Money {
        self.size + self.crust + self.sauce + self.toppings
    }
}

/// Total price of `config`.
pub fn compute_price(catalog: &Catalog, config: &PizzaConfig) -> Money {
    PriceBreakdown::of(catalog, config).total()
}
