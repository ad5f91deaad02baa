#![forbid(unsafe_code)]

//! Scripted storefront run: one customer builds a pizza, checks out, and
//! follows the order until the kitchen marks it completed.
//!
//! The [`Program`] runs on the calling thread while a driver thread plays
//! the customer and the kitchen. Stock and orders live in the in-memory
//! collaborators so the run needs no backend.

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pizzart::runtime::{
    AppState, MemoryInventory, MemoryOrderBook, Order, OrderId, Program, ProgramConfig,
    Services, Storefront, StorefrontConfig, StorefrontMsg, User,
};
use pizzart::{Catalog, InventoryCategory, InventoryRecord, ToppingCategory};
use serde::Serialize;

use crate::cli::Opts;

/// Stock every demo ingredient starts with.
pub const DEMO_STOCK: u32 = 50;

/// Timing knobs for the driver thread.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    /// Pause between kitchen status changes.
    pub step: Duration,
    /// Give up waiting for the order after this long.
    pub order_timeout: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            step: Duration::from_millis(150),
            order_timeout: Duration::from_secs(5),
        }
    }
}

/// Outcome of a scripted run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoReport {
    pub pizza: Option<String>,
    pub size: String,
    pub crust: String,
    pub sauce: String,
    pub toppings: Vec<String>,
    pub price: u64,
    pub price_display: String,
    pub preview_icons: usize,
    pub preview_overlays: usize,
    pub order: Option<String>,
    pub order_total: Option<u64>,
    pub final_status: Option<&'static str>,
    pub points: u64,
    pub notices: Vec<String>,
}

impl fmt::Display for DemoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.pizza.as_deref().unwrap_or("(not submitted)");
        writeln!(f, "Pizza:    {name}")?;
        writeln!(f, "Build:    {} / {} / {}", self.size, self.crust, self.sauce)?;
        if !self.toppings.is_empty() {
            writeln!(f, "Toppings: {}", self.toppings.join(", "))?;
        }
        writeln!(f, "Price:    {}", self.price_display)?;
        writeln!(
            f,
            "Preview:  {} icons, {} overlays",
            self.preview_icons, self.preview_overlays
        )?;
        match (&self.order, self.final_status) {
            (Some(order), Some(status)) => writeln!(f, "Order:    {order} ({status})")?,
            (Some(order), None) => writeln!(f, "Order:    {order}")?,
            _ => writeln!(f, "Order:    none")?,
        }
        writeln!(f, "Points:   {}", self.points)?;
        for notice in &self.notices {
            writeln!(f, "Notice:   {notice}")?;
        }
        Ok(())
    }
}

/// Inventory mirroring every catalog entry with [`DEMO_STOCK`] units.
pub fn demo_inventory(catalog: &Catalog) -> Vec<InventoryRecord> {
    let crusts = catalog
        .crusts()
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str(), InventoryCategory::Base));
    let sauces = catalog
        .sauces()
        .iter()
        .map(|s| (s.id.as_str(), s.name.as_str(), InventoryCategory::Sauce));
    let toppings = catalog.toppings().iter().map(|t| {
        let category = match t.category {
            ToppingCategory::Meat => InventoryCategory::Meat,
            ToppingCategory::Vegetable => InventoryCategory::Vegetable,
            ToppingCategory::Cheese => InventoryCategory::Cheese,
            ToppingCategory::Sauce => InventoryCategory::Sauce,
        };
        (t.id.as_str(), t.name.as_str(), category)
    });
    crusts
        .chain(sauces)
        .chain(toppings)
        .map(|(id, name, category)| InventoryRecord::new(name, category, DEMO_STOCK).with_id(id))
        .collect()
}

fn script(opts: &Opts) -> Vec<StorefrontMsg> {
    let mut msgs = vec![
        StorefrontMsg::Login(User::new("demo", "demo@pizzart.test", "demo")),
        StorefrontMsg::SetSize(opts.size),
        StorefrontMsg::SetCrust(opts.crust.clone()),
        StorefrontMsg::SetSauce(opts.sauce.clone()),
    ];
    msgs.extend(opts.toppings.iter().cloned().map(StorefrontMsg::ToggleTopping));
    msgs.push(StorefrontMsg::SetName(opts.name.clone()));
    msgs.push(StorefrontMsg::SubmitPizza);
    msgs.push(StorefrontMsg::Checkout);
    msgs
}

fn wait_for_order(book: &MemoryOrderBook, timeout: Duration) -> Option<OrderId> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(order) = book.orders().first() {
            return Some(order.id);
        }
        if Instant::now() > deadline {
            return None;
        }
        thread::sleep(Duration::from_millis(10));
    }
}

/// Run the scripted storefront session to completion.
pub fn run(opts: &Opts, config: StorefrontConfig, pacing: Pacing) -> DemoReport {
    let catalog = Catalog::builtin();
    let inventory = Arc::new(MemoryInventory::new(demo_inventory(&catalog)));
    inventory.set_offline(opts.offline_inventory);
    let book = Arc::new(MemoryOrderBook::new());
    book.set_rejecting(opts.reject_orders);

    let services = Services::with_order_book(inventory, Arc::clone(&book));
    let storefront = Storefront::with_catalog(config, services, AppState::default(), catalog);
    let program = Program::with_config(
        storefront,
        ProgramConfig {
            poll_interval: Duration::from_millis(10),
        },
    );
    let handle = program.handle();
    let msgs = script(opts);
    let kitchen = Arc::clone(&book);

    let spawned = thread::Builder::new()
        .name("pizzart-demo-driver".into())
        .spawn(move || {
            for msg in msgs {
                handle.send(msg);
            }
            let placed = wait_for_order(&kitchen, pacing.order_timeout);
            if let Some(id) = placed {
                while let Ok(Some(status)) = kitchen.advance(id) {
                    tracing::info!(order = %id, %status, "kitchen advanced order");
                    thread::sleep(pacing.step);
                }
            } else {
                tracing::warn!("no order was placed");
            }
            handle.send(StorefrontMsg::Quit);
            placed
        });

    let driver = match spawned {
        Ok(driver) => driver,
        Err(err) => {
            tracing::error!(error = %err, "driver thread failed to start");
            return report(program.model(), None);
        }
    };

    let storefront = program.run();
    let placed = driver.join().ok().flatten();
    report(&storefront, placed.and_then(|id| book.order(id)))
}

fn report(storefront: &Storefront, order: Option<Order>) -> DemoReport {
    let session = storefront.session();
    let config = session.config();
    let preview = session.preview();
    let price = session.price();
    DemoReport {
        pizza: session.artifact().map(|a| a.name.clone()),
        size: config.size.to_string(),
        crust: config.crust.clone(),
        sauce: config.sauce.clone(),
        toppings: config.toppings.iter().map(|t| t.id.clone()).collect(),
        price: price.amount(),
        price_display: price.to_string(),
        preview_icons: preview.icon_count(),
        preview_overlays: preview.overlays.len(),
        order: order.as_ref().map(|o| o.id.to_string()),
        order_total: order.as_ref().map(|o| o.total_price.amount()),
        final_status: order.as_ref().map(|o| o.status.as_str()),
        points: storefront.state().user().map_or(0, |u| u.points),
        notices: storefront.notices().iter().map(|n| n.text.clone()).collect(),
    }
}
