#![forbid(unsafe_code)]

//! Pizza configuration: the user's in-progress selection.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, DEFAULT_CRUST_ID, DEFAULT_SAUCE_ID, PizzaSize, Topping, ToppingCategory};

/// An ordered set of toppings, unique by id.
///
/// Selecting a topping that is already present removes it. Insertion order
/// is kept because it decides stacking order in the preview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToppingSelection {
    toppings: Vec<Topping>,
}

impl ToppingSelection {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new selection with `topping` toggled.
    #[must_use]
    pub fn toggle(&self, topping: &Topping) -> Self {
        let mut next = self.clone();
        next.toggle_in_place(topping);
        next
    }

    /// Toggle `topping` in place. Returns `true` if it is now selected.
    pub fn toggle_in_place(&mut self, topping: &Topping) -> bool {
        if let Some(pos) = self.toppings.iter().position(|t| t.id == topping.id) {
            self.toppings.remove(pos);
            false
        } else {
            self.toppings.push(topping.clone());
            true
        }
    }

    /// Whether a topping with `id` is selected.
    pub fn contains(&self, id: &str) -> bool {
        self.toppings.iter().any(|t| t.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Topping> {
        self.toppings.iter()
    }

    pub fn as_slice(&self) -> &[Topping] {
        &self.toppings
    }

    pub fn len(&self) -> usize {
        self.toppings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toppings.is_empty()
    }

    /// Selected toppings of one category, in selection order.
    pub fn in_category(&self, category: ToppingCategory) -> impl Iterator<Item = &Topping> {
        self.toppings.iter().filter(move |t| t.category == category)
    }

    /// Drop the selection.
    pub fn clear(&mut self) {
        self.toppings.clear();
    }
}

impl<'a> IntoIterator for &'a ToppingSelection {
    type Item = &'a Topping;
    type IntoIter = std::slice::Iter<'a, Topping>;

    fn into_iter(self) -> Self::IntoIter {
        self.toppings.iter()
    }
}

impl FromIterator<Topping> for ToppingSelection {
    /// Later duplicates toggle earlier ones off, as repeated clicks would.
    fn from_iter<I: IntoIterator<Item = Topping>>(iter: I) -> Self {
        let mut selection = Self::new();
        for topping in iter {
            selection.toggle_in_place(&topping);
        }
        selection
    }
}

/// A pizza being configured.
///
/// Crust and sauce are catalog ids and may dangle (for example after the
/// catalog is narrowed by inventory); pricing treats a dangling id as free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaConfig {
    pub size: PizzaSize,
    pub crust: String,
    pub sauce: String,
    pub toppings: ToppingSelection,
}

impl Default for PizzaConfig {
    fn default() -> Self {
        Self {
            size: PizzaSize::default(),
            crust: DEFAULT_CRUST_ID.to_owned(),
            sauce: DEFAULT_SAUCE_ID.to_owned(),
            toppings: ToppingSelection::new(),
        }
    }
}

impl PizzaConfig {
    /// Start a configuration whose crust and sauce are valid in `catalog`.
    ///
    /// If the catalog has no crusts (or no sauces) the built-in default id
    /// is kept; it simply prices at zero.
    pub fn default_for(catalog: &Catalog) -> Self {
        let mut config = Self::default();
        if let Some(crust) = catalog.default_crust() {
            config.crust = crust.id.clone();
        }
        if let Some(sauce) = catalog.default_sauce() {
            config.sauce = sauce.id.clone();
        }
        config
    }

    #[must_use]
    pub fn with_size(mut self, size: PizzaSize) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_crust(mut self, crust: impl Into<String>) -> Self {
        self.crust = crust.into();
        self
    }

    #[must_use]
    pub fn with_sauce(mut self, sauce: impl Into<String>) -> Self {
        self.sauce = sauce.into();
        self
    }

    #[must_use]
    pub fn with_topping(mut self, topping: &Topping) -> Self {
        self.toppings.toggle_in_place(topping);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn topping(id: &str) -> Topping {
        Catalog::builtin().topping(id).cloned().unwrap()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let pepperoni = topping("pepperoni");
        let once = ToppingSelection::new().toggle(&pepperoni);
        assert!(once.contains("pepperoni"));
        let twice = once.toggle(&pepperoni);
        assert!(twice.is_empty());
    }

    #[test]
    fn toggle_does_not_mutate_original() {
        let original = ToppingSelection::new();
        let _ = original.toggle(&topping("ham"));
        assert!(original.is_empty());
    }

    #[test]
    fn toggle_preserves_order_of_others() {
        let mut sel = ToppingSelection::new();
        for id in ["bacon", "olives", "cheddar"] {
            sel.toggle_in_place(&topping(id));
        }
        sel.toggle_in_place(&topping("olives"));
        let ids: Vec<_> = sel.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["bacon", "cheddar"]);
    }

    #[test]
    fn from_iter_treats_duplicates_as_toggles() {
        let sel: ToppingSelection = ["ham", "ham", "onions"].into_iter().map(topping).collect();
        let ids: Vec<_> = sel.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["onions"]);
    }

    #[test]
    fn in_category_filters() {
        let sel: ToppingSelection = ["ranch", "ham", "parmesan"].into_iter().map(topping).collect();
        assert_eq!(sel.in_category(ToppingCategory::Sauce).count(), 1);
        assert_eq!(sel.in_category(ToppingCategory::Vegetable).count(), 0);
    }

    #[test]
    fn default_config_is_medium_thin_tomato() {
        let config = PizzaConfig::default_for(&Catalog::builtin());
        assert_eq!(config.size, PizzaSize::Medium);
        assert_eq!(config.crust, "thin");
        assert_eq!(config.sauce, "tomato");
        assert!(config.toppings.is_empty());
    }

    #[test]
    fn default_for_empty_catalog_keeps_builtin_ids() {
        let empty = Catalog::new(vec![], vec![], vec![], vec![]);
        let config = PizzaConfig::default_for(&empty);
        assert_eq!(config.crust, DEFAULT_CRUST_ID);
        assert_eq!(config.sauce, DEFAULT_SAUCE_ID);
    }
}
