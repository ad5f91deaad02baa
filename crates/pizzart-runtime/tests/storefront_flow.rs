//! Storefront end-to-end flows.
//!
//! ```sh
//! cargo test -p pizzart-runtime --test storefront_flow
//! ```
//!
//! # Invariants
//!
//! 1. **Stale results**: inventory for an abandoned session never touches
//!    the current one.
//! 2. **Degradation**: collaborator failures leave the static catalog or the
//!    cart intact and post a notice.
//! 3. **Rewards**: create, like, and checkout points land exactly once.
//! 4. **Tracking**: a placed order is subscribed until it completes, even
//!    when it completes before the subscription attaches.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use pizzart_core::{Catalog, InventoryCategory, InventoryRecord, Money, PizzaSize};
use pizzart_runtime::app::{NOTICE_INVENTORY_UNAVAILABLE, NOTICE_ORDER_FAILED};
use pizzart_runtime::logging;
use pizzart_runtime::simulator::ProgramSimulator;
use pizzart_runtime::{
    AppState, Cmd, CollaboratorResult, ContestId, MemoryInventory, MemoryOrderBook, Model,
    NoticeLevel, OrderDraft, OrderId, OrderService, OrderStatus, OrderStatusSubscription,
    Program, ProgramConfig, ProgramHandle, Services, SortMode, Storefront, StorefrontConfig,
    StorefrontMsg, Subscription, User,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Fixtures
// ============================================================================

struct Fixture {
    inventory: Arc<MemoryInventory>,
    book: Arc<MemoryOrderBook>,
}

impl Fixture {
    fn new() -> Self {
        logging::init_for_tests();
        Self {
            inventory: Arc::new(MemoryInventory::new(vec![
                InventoryRecord::new("Thin Crust", InventoryCategory::Base, 30),
                InventoryRecord::new("Thick Crust", InventoryCategory::Base, 30),
                InventoryRecord::new("Classic Tomato", InventoryCategory::Sauce, 30),
                InventoryRecord::new("Pepperoni", InventoryCategory::Meat, 30),
                InventoryRecord::new("Fresh Mushrooms", InventoryCategory::Vegetable, 30),
                InventoryRecord::new("Ranch Drizzle", InventoryCategory::Sauce, 0)
                    .with_availability(false),
            ])),
            book: Arc::new(MemoryOrderBook::new()),
        }
    }

    fn services(&self) -> Services {
        Services::with_order_book(self.inventory.clone(), self.book.clone())
    }

    fn storefront(&self, config: StorefrontConfig) -> Storefront {
        Storefront::new(config, self.services(), AppState::seeded(Utc::now()))
    }

    fn sim(&self) -> ProgramSimulator<Storefront> {
        let mut sim = ProgramSimulator::new(self.storefront(config()));
        sim.init();
        sim
    }
}

fn config() -> StorefrontConfig {
    StorefrontConfig::default().with_layout_seed(2024)
}

fn chef() -> User {
    User::new("chef-1", "chef@pizzart.id", "Chef Rina")
}

fn build_reference_pizza(sim: &mut ProgramSimulator<Storefront>, name: &str) {
    sim.send_all([
        StorefrontMsg::SetSize(PizzaSize::Medium),
        StorefrontMsg::SetCrust("thick".into()),
        StorefrontMsg::SetSauce("tomato".into()),
        StorefrontMsg::ToggleTopping("pepperoni".into()),
        StorefrontMsg::ToggleTopping("mushrooms".into()),
        StorefrontMsg::SetName(name.into()),
        StorefrontMsg::SubmitPizza,
    ]);
}

// ============================================================================
// 1. Builder
// ============================================================================

#[test]
fn inventory_narrows_menu_and_excludes_unavailable() {
    let fx = Fixture::new();
    let sim = fx.sim();
    let catalog = sim.model().catalog();

    let toppings: Vec<_> = catalog.toppings().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(toppings, vec!["pepperoni", "mushrooms"]);
    let crusts: Vec<_> = catalog.crusts().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(crusts, vec!["thin", "thick"]);
    assert_eq!(catalog.sizes().len(), 3);
}

#[test]
fn reference_pizza_reaches_the_cart() {
    let fx = Fixture::new();
    let mut sim = fx.sim();
    sim.send(StorefrontMsg::Login(chef()));
    build_reference_pizza(&mut sim, "Weeknight Classic");

    let model = sim.model();
    assert!(model.session().is_submitted());
    let line = &model.state().cart()[0];
    assert_eq!(line.pizza.price, Money::new(100_000));
    assert_eq!(line.pizza.price.to_string(), "Rp 100,000");
    assert_eq!(line.quantity, 1);
    assert_eq!(model.state().user().map(|u| u.points), Some(25));
}

#[test]
fn edits_after_submit_are_rejected() {
    let fx = Fixture::new();
    let mut sim = fx.sim();
    build_reference_pizza(&mut sim, "Locked In");
    sim.send(StorefrontMsg::DismissNotices);

    let before = sim.model().session().config().clone();
    sim.send(StorefrontMsg::ToggleTopping("pepperoni".into()));
    sim.send(StorefrontMsg::SubmitPizza);

    assert_eq!(sim.model().session().config(), &before);
    assert_eq!(sim.model().notices().len(), 2);
    assert!(sim.model().notices().iter().all(|n| n.level == NoticeLevel::Error));
    assert_eq!(sim.model().state().cart().len(), 1);
}

#[test]
fn stale_inventory_is_discarded() {
    let fx = Fixture::new();
    let mut sim = ProgramSimulator::new(fx.storefront(config())).holding_tasks();
    sim.init();
    let first = sim.model().session().id();

    // the user starts over while the first fetch is still out
    fx.inventory.replace(vec![InventoryRecord::new(
        "Crispy Bacon",
        InventoryCategory::Meat,
        5,
    )]);
    sim.send(StorefrontMsg::NewSession);
    let second = sim.model().session().id();
    assert_ne!(first, second);
    assert_eq!(sim.pending_tasks(), 2);

    // second fetch lands first, then the stale one
    sim.run_latest_task();
    let toppings: Vec<_> = sim.model().catalog().toppings().iter().map(|t| t.id.clone()).collect();
    assert_eq!(toppings, vec!["bacon".to_owned()]);

    fx.inventory.replace(Vec::new());
    sim.run_pending_tasks();
    assert_eq!(sim.model().session().id(), second);
    assert_eq!(sim.model().catalog().toppings().len(), 1);
}

#[test]
fn inventory_outage_keeps_static_catalog() {
    let fx = Fixture::new();
    fx.inventory.set_offline(true);
    let sim = fx.sim();
    assert_eq!(sim.model().catalog(), &Catalog::builtin());
    assert_eq!(sim.model().notices()[0].text, NOTICE_INVENTORY_UNAVAILABLE);
    assert_eq!(sim.model().notices()[0].level, NoticeLevel::Warning);
}

#[test]
fn preview_tracks_the_session() {
    let fx = Fixture::new();
    let mut sim = fx.sim();
    sim.send(StorefrontMsg::ToggleTopping("pepperoni".into()));
    let plan = sim.model().session().preview();
    assert_eq!(plan.icon_count(), 8);
    assert_eq!(plan, sim.model().session().preview());
}

// ============================================================================
// 2. Community & contests
// ============================================================================

#[test]
fn share_like_and_enter_contest() {
    let fx = Fixture::new();
    let mut sim = fx.sim();
    sim.send(StorefrontMsg::Login(chef()));
    build_reference_pizza(&mut sim, "Sunset Slice");
    sim.send(StorefrontMsg::ShareSubmitted);
    sim.send(StorefrontMsg::ShareSubmitted);

    let shared = sim.model().state().community()[0].clone();
    assert_eq!(shared.name, "Sunset Slice");
    assert_eq!(shared.created_by.as_deref(), Some("chef-1"));
    assert_eq!(sim.model().state().community().len(), 4);

    sim.send(StorefrontMsg::LikePizza(shared.id));
    assert_eq!(sim.model().state().user().map(|u| u.points), Some(25 + 5));

    let popular: Vec<_> = sim
        .model()
        .community_feed("", SortMode::Popular)
        .iter()
        .map(|p| p.likes)
        .collect();
    assert_eq!(popular, vec![312, 247, 156, 1]);

    sim.send(StorefrontMsg::EnterContest(ContestId(1)));
    sim.send(StorefrontMsg::EnterContest(ContestId(1)));
    let contest = sim.model().state().contest(ContestId(1)).cloned();
    assert_eq!(contest.map(|c| c.submission_count()), Some(1));
    assert_eq!(sim.model().notices().last().map(|n| n.level), Some(NoticeLevel::Warning));
}

// ============================================================================
// 3. Checkout & tracking
// ============================================================================

#[test]
fn checkout_places_order_and_tracks_it() {
    let fx = Fixture::new();
    let mut sim = fx.sim();
    sim.send(StorefrontMsg::Login(chef()));
    build_reference_pizza(&mut sim, "Order Me");

    let summary = sim.model().cart_summary();
    assert_eq!(summary.subtotal, Money::new(100_000));
    assert_eq!(summary.tax, Money::new(10_000));
    assert_eq!(summary.total, Money::new(110_000));
    assert_eq!(summary.reward_points, 100);

    sim.send(StorefrontMsg::Checkout);
    assert!(sim.model().state().cart().is_empty());
    assert_eq!(sim.model().state().user().map(|u| u.points), Some(125));

    let orders = fx.book.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].total_price, Money::new(110_000));
    assert_eq!(orders[0].user_email, "chef@pizzart.id");
    assert_eq!(orders[0].items[0].pizza_name, "Order Me");

    let id = orders[0].id;
    assert_eq!(
        sim.subscription_ids(),
        vec![OrderStatusSubscription::<StorefrontMsg>::id_for(id)]
    );

    sim.send(StorefrontMsg::OrderStatusChanged(id, OrderStatus::Shipped));
    assert_eq!(sim.model().tracked_orders().get(&id), Some(&OrderStatus::Shipped));
    sim.send(StorefrontMsg::OrderStatusChanged(id, OrderStatus::Completed));
    assert!(sim.model().tracked_orders().is_empty());
    assert!(sim.subscription_ids().is_empty());
}

#[test]
fn failed_order_keeps_cart() {
    let fx = Fixture::new();
    fx.book.set_rejecting(true);
    let mut sim = fx.sim();
    sim.send(StorefrontMsg::Login(chef()));
    build_reference_pizza(&mut sim, "Try Again");
    sim.send(StorefrontMsg::Checkout);

    assert_eq!(sim.model().state().cart().len(), 1);
    assert!(!sim.model().checkout_in_flight());
    assert_eq!(sim.model().state().user().map(|u| u.points), Some(25));
    assert_eq!(
        sim.model().notices().last().map(|n| n.text.as_str()),
        Some(NOTICE_ORDER_FAILED)
    );
}

#[test]
fn checkout_requires_sign_in() {
    let fx = Fixture::new();
    let mut sim = fx.sim();
    build_reference_pizza(&mut sim, "Anonymous");
    sim.send(StorefrontMsg::Checkout);
    assert!(fx.book.orders().is_empty());
    assert_eq!(sim.model().state().cart().len(), 1);
}

// ============================================================================
// 4. Threaded program
// ============================================================================

/// Storefront that quits once a status update leaves no order tracked.
struct UntilDelivered(Storefront);

impl Model for UntilDelivered {
    type Message = StorefrontMsg;

    fn init(&mut self) -> Cmd<StorefrontMsg> {
        self.0.init()
    }

    fn update(&mut self, msg: StorefrontMsg) -> Cmd<StorefrontMsg> {
        let is_status = matches!(msg, StorefrontMsg::OrderStatusChanged(..));
        let cmd = self.0.update(msg);
        if is_status && self.0.tracked_orders().is_empty() {
            Cmd::batch(vec![cmd, Cmd::quit()])
        } else {
            cmd
        }
    }

    fn subscriptions(&self) -> Vec<Box<dyn Subscription<StorefrontMsg>>> {
        self.0.subscriptions()
    }
}

/// Kitchen that finishes every order before `place_order` returns.
struct InstantKitchen(Arc<MemoryOrderBook>);

impl OrderService for InstantKitchen {
    fn place_order(&self, draft: OrderDraft) -> CollaboratorResult<OrderId> {
        let id = self.0.place_order(draft)?;
        self.0.set_status(id, OrderStatus::Completed)?;
        Ok(id)
    }
}

fn threaded(model: UntilDelivered) -> Program<UntilDelivered> {
    Program::with_config(
        model,
        ProgramConfig {
            poll_interval: Duration::from_millis(5),
        },
    )
}

/// Quit after `limit` so a regression fails instead of hanging.
fn watchdog(handle: ProgramHandle<StorefrontMsg>, limit: Duration) {
    std::thread::spawn(move || {
        std::thread::sleep(limit);
        handle.send(StorefrontMsg::Quit);
    });
}

fn checkout_script() -> [StorefrontMsg; 5] {
    [
        StorefrontMsg::Login(chef()),
        StorefrontMsg::ToggleTopping("pepperoni".into()),
        StorefrontMsg::SetName("Threaded".into()),
        StorefrontMsg::SubmitPizza,
        StorefrontMsg::Checkout,
    ]
}

#[test]
fn threaded_program_follows_status_feed() {
    let fx = Fixture::new();
    let program = threaded(UntilDelivered(fx.storefront(config())));
    let handle = program.handle();
    watchdog(program.handle(), Duration::from_secs(10));
    let book = fx.book.clone();

    let driver = std::thread::spawn(move || {
        for msg in checkout_script() {
            handle.send(msg);
        }
        let deadline = Instant::now() + Duration::from_secs(5);
        let id = loop {
            if let Some(order) = book.orders().first() {
                break Some(order.id);
            }
            if Instant::now() > deadline {
                break None;
            }
            std::thread::yield_now();
        };
        if let Some(id) = id {
            while let Ok(Some(_)) = book.advance(id) {}
        }
        id
    });

    let storefront = program.run().0;
    let id = driver.join().unwrap().expect("order was placed");
    assert!(storefront.state().cart().is_empty());
    assert!(storefront.tracked_orders().is_empty());
    assert_eq!(fx.book.order(id).map(|o| o.status), Some(OrderStatus::Completed));
}

#[test]
fn order_finished_before_tracking_starts_is_not_lost() {
    let fx = Fixture::new();
    let services = Services::new(
        fx.inventory.clone(),
        Arc::new(InstantKitchen(fx.book.clone())),
        fx.book.clone(),
    );
    let storefront = Storefront::new(config(), services, AppState::default());
    let program = threaded(UntilDelivered(storefront));
    let handle = program.handle();
    watchdog(program.handle(), Duration::from_secs(10));
    for msg in checkout_script() {
        handle.send(msg);
    }

    let storefront = program.run().0;
    let order = fx.book.orders().first().cloned().expect("order was placed");
    assert_eq!(order.status, OrderStatus::Completed);
    assert!(storefront.tracked_orders().is_empty(), "completed order still tracked");
    assert!(storefront.state().cart().is_empty());
}
