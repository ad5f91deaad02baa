#![forbid(unsafe_code)]

//! Live inventory collaborator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use pizzart_core::InventoryRecord;

use crate::error::{CollaboratorError, CollaboratorResult};

/// Source of current stock records.
pub trait InventorySource: Send + Sync {
    fn fetch_inventory(&self) -> CollaboratorResult<Vec<InventoryRecord>>;
}

/// In-process inventory with a switchable outage.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    records: RwLock<Vec<InventoryRecord>>,
    offline: AtomicBool,
}

impl MemoryInventory {
    pub fn new(records: Vec<InventoryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate the inventory backend being unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn replace(&self, records: Vec<InventoryRecord>) {
        *self.records.write().unwrap_or_else(PoisonError::into_inner) = records;
    }

    /// Set stock for the record named `name`. Returns `false` if absent.
    pub fn restock(&self, name: &str, quantity: u32) -> bool {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        match records.iter_mut().find(|r| r.name == name) {
            Some(record) => {
                record.stock_quantity = quantity;
                true
            }
            None => false,
        }
    }
}

impl InventorySource for MemoryInventory {
    fn fetch_inventory(&self) -> CollaboratorResult<Vec<InventoryRecord>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Unavailable("inventory backend offline".into()));
        }
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
