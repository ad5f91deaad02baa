#![forbid(unsafe_code)]

//! Live inventory records and name matching against the catalog.
//!
//! Inventory is owned by an external collaborator; this module only models
//! its records and decides which catalog entries they cover.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Low-stock threshold used when a record does not carry one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// Inventory category. A superset of topping categories that adds `base`
/// for crust and dough stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryCategory {
    Meat,
    Vegetable,
    Cheese,
    Sauce,
    Base,
}

impl InventoryCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meat => "meat",
            Self::Vegetable => "vegetable",
            Self::Cheese => "cheese",
            Self::Sauce => "sauce",
            Self::Base => "base",
        }
    }
}

impl fmt::Display for InventoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stocked ingredient as reported by the inventory collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub category: InventoryCategory,
    pub stock_quantity: u32,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub is_available: bool,
    #[serde(default = "default_threshold")]
    pub low_stock_threshold: u32,
}

fn default_unit() -> String {
    "kg".to_owned()
}

fn default_threshold() -> u32 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

/// Stock classification shown on the admin inventory board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Switched off by an administrator.
    Unavailable,
    /// Available but below its low-stock threshold.
    LowStock,
    InStock,
}

impl InventoryRecord {
    /// An available record with default unit and threshold.
    pub fn new(name: impl Into<String>, category: InventoryCategory, stock_quantity: u32) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            category,
            stock_quantity,
            unit: default_unit(),
            is_available: true,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }

    /// Set the record id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set availability.
    #[must_use]
    pub fn with_availability(mut self, is_available: bool) -> Self {
        self.is_available = is_available;
        self
    }

    /// Set the low-stock threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    /// Availability wins over quantity: an unavailable record is never
    /// reported as low stock.
    pub fn stock_status(&self) -> StockStatus {
        if !self.is_available {
            StockStatus::Unavailable
        } else if self.stock_quantity < self.low_stock_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Whether the record is below its threshold, regardless of availability.
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity < self.low_stock_threshold
    }
}

/// Normalize a name for matching: trim, lowercase, collapse whitespace runs.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Set of normalized names of available inventory records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryIndex {
    names: HashSet<String>,
}

impl InventoryIndex {
    /// Index the available records. Unavailable ones are skipped.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a InventoryRecord>) -> Self {
        let names = records
            .into_iter()
            .filter(|r| r.is_available)
            .map(|r| normalize_name(&r.name))
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    /// Whether `name` matches an indexed record.
    pub fn matches(&self, name: &str) -> bool {
        self.names.contains(&normalize_name(name))
    }

    /// Number of distinct indexed names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
