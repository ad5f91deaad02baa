#![forbid(unsafe_code)]

//! Core: catalog tables, pizza configuration, pricing, and finalization.
//!
//! Everything in this crate is pure and synchronous. Collaborator calls
//! (inventory, orders) and state management live in `pizzart-runtime`;
//! topping placement and preview planning live in `pizzart-layout`.

pub mod artifact;
pub mod catalog;
pub mod error;
pub mod geometry;
pub mod inventory;
pub mod logging;
pub mod money;
pub mod pizza;
pub mod pricing;

pub use artifact::{ArtifactId, PizzaArtifact, finalize};
pub use catalog::{Catalog, CrustOption, PizzaSize, SauceOption, SizeOption, Topping, ToppingCategory};
pub use error::{ERROR_CODE_REQUIRED, ValidationError};
pub use inventory::{InventoryCategory, InventoryIndex, InventoryRecord, StockStatus, normalize_name};
pub use money::Money;
pub use pizza::{PizzaConfig, ToppingSelection};
pub use pricing::{PriceBreakdown, compute_price};

#[cfg(feature = "tracing")]
pub use logging::{debug, trace};
