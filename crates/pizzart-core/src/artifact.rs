#![forbid(unsafe_code)]

//! Finalized pizzas.
//!
//! A [`PizzaArtifact`] is the immutable, named result of a builder session.
//! It snapshots the configuration and its price at the moment of
//! finalization, so later catalog changes never reprice it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Catalog, PizzaSize};
use crate::error::ValidationError;
use crate::money::Money;
use crate::pizza::{PizzaConfig, ToppingSelection};
use crate::pricing::compute_price;

/// Unique artifact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    /// A fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A finalized, named pizza.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaArtifact {
    pub id: ArtifactId,
    pub name: String,
    pub size: PizzaSize,
    pub crust: String,
    pub sauce: String,
    pub toppings: ToppingSelection,
    pub price: Money,
    pub likes: u32,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_template: bool,
}

impl PizzaArtifact {
    /// Recover the configuration this artifact was finalized from.
    pub fn config(&self) -> PizzaConfig {
        PizzaConfig {
            size: self.size,
            crust: self.crust.clone(),
            sauce: self.sauce.clone(),
            toppings: self.toppings.clone(),
        }
    }

    /// Attribute the artifact to a user.
    #[must_use]
    pub fn with_creator(mut self, user_id: impl Into<String>) -> Self {
        self.created_by = Some(user_id.into());
        self
    }

    /// Mark the artifact as a reusable template.
    #[must_use]
    pub fn as_template(mut self) -> Self {
        self.is_template = true;
        self
    }

    /// Override the creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }
}

/// Finalize `config` under `name`.
///
/// The name is rejected if it is empty or whitespace-only; otherwise it is
/// stored exactly as given. The price is computed against `catalog` now.
pub fn finalize(
    catalog: &Catalog,
    config: &PizzaConfig,
    name: &str,
) -> Result<PizzaArtifact, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::required("name"));
    }

    let artifact = PizzaArtifact {
        id: ArtifactId::generate(),
        name: name.to_owned(),
        size: config.size,
        crust: config.crust.clone(),
        sauce: config.sauce.clone(),
        toppings: config.toppings.clone(),
        price: compute_price(catalog, config),
        likes: 0,
        created_by: None,
        created_at: Utc::now(),
        is_template: false,
    };

    crate::debug!(id = %artifact.id, price = artifact.price.amount(), "pizza finalized");
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        let catalog = Catalog::builtin();
        let config = PizzaConfig::default_for(&catalog);
        for name in ["", " ", "\t\n"] {
            let err = finalize(&catalog, &config, name).unwrap_err();
            assert!(err.is_required());
            assert_eq!(err.field, "name");
        }
    }

    #[test]
    fn finalized_artifact_snapshots_config() {
        let catalog = Catalog::builtin();
        let pepperoni = catalog.topping("pepperoni").cloned().unwrap();
        let config = PizzaConfig::default_for(&catalog)
            .with_crust("thick")
            .with_topping(&pepperoni);

        let artifact = finalize(&catalog, &config, "Friday Feast").unwrap();
        assert_eq!(artifact.name, "Friday Feast");
        assert_eq!(artifact.likes, 0);
        assert_eq!(artifact.price, Money::new(88_000));
        assert_eq!(artifact.config(), config);
        assert!(artifact.created_by.is_none());
        assert!(!artifact.is_template);
    }

    #[test]
    fn ids_are_unique() {
        let catalog = Catalog::builtin();
        let config = PizzaConfig::default_for(&catalog);
        let a = finalize(&catalog, &config, "A").unwrap();
        let b = finalize(&catalog, &config, "A").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn name_is_kept_verbatim() {
        let catalog = Catalog::builtin();
        let config = PizzaConfig::default_for(&catalog);
        let artifact = finalize(&catalog, &config, "  Spaced  ").unwrap();
        assert_eq!(artifact.name, "  Spaced  ");
    }

    #[test]
    fn serializes_with_expected_keys() {
        let catalog = Catalog::builtin();
        let config = PizzaConfig::default_for(&catalog);
        let artifact = finalize(&catalog, &config, "Plain")
            .unwrap()
            .with_creator("user-1")
            .as_template();
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["name"], "Plain");
        assert_eq!(json["size"], "medium");
        assert_eq!(json["price"], 65_000);
        assert_eq!(json["created_by"], "user-1");
        assert_eq!(json["is_template"], true);
    }
}
