#![forbid(unsafe_code)]

//! Orders: drafts built from the cart, the placement and status-feed
//! collaborators, tracking timeline, and the admin dashboard figures.
//!
//! # Collaborators
//!
//! - [`OrderService`] accepts a draft and returns the new order's id.
//! - [`OrderStatusFeed`] pushes status changes for one order.
//!
//! [`MemoryOrderBook`] implements both in-process. Hosts that talk to a real
//! backend implement the traits themselves.
//!
//! # Failure Modes
//!
//! - Placement failure is reported as a [`CollaboratorError`]; the caller
//!   keeps the cart and shows a notice.
//! - A feed whose sender side is dropped ends its subscription quietly.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, mpsc};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use pizzart_core::{InventoryRecord, Money, PizzaSize};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{CollaboratorError, CollaboratorResult};
use crate::store::{CartLine, User};
use crate::subscription::{StopSignal, SubId, Subscription};

/// How often a status subscription re-checks its stop signal.
const FEED_POLL: Duration = Duration::from_millis(25);

// ---------------------------------------------------------------------------
// Identity & status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Completed,
}

impl OrderStatus {
    /// Fulfilment order.
    pub const ALL: [OrderStatus; 4] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Completed,
    ];

    /// The following stage, or `None` once completed.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Processing),
            Self::Processing => Some(Self::Shipped),
            Self::Shipped => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
        }
    }

    /// Timeline caption shown to the customer.
    pub const fn step_label(self) -> &'static str {
        match self {
            Self::Pending => "Pesanan Diterima",
            Self::Processing => "Sedang Dibuat",
            Self::Shipped => "Dalam Pengiriman",
            Self::Completed => "Selesai",
        }
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Tracking timeline with this status as the current step.
    pub fn timeline(self) -> [TimelineStep; 4] {
        Self::ALL.map(|status| TimelineStep {
            status,
            label: status.step_label(),
            is_active: status <= self,
            is_current: status == self,
        })
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineStep {
    pub status: OrderStatus,
    pub label: &'static str,
    /// Reached (at or before the current status).
    pub is_active: bool,
    pub is_current: bool,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub pizza_name: String,
    pub size: PizzaSize,
    pub crust: String,
    pub sauce: String,
    /// `[{id, name, price}, ...]`
    pub toppings: serde_json::Value,
    pub quantity: u32,
    /// Unit price.
    pub price: Money,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        let pizza = &line.pizza;
        let toppings = pizza
            .toppings
            .iter()
            .map(|t| json!({ "id": t.id, "name": t.name, "price": t.price.amount() }))
            .collect();
        Self {
            pizza_name: pizza.name.clone(),
            size: pizza.size,
            crust: pizza.crust.clone(),
            sauce: pizza.sauce.clone(),
            toppings: serde_json::Value::Array(toppings),
            quantity: line.quantity,
            price: pizza.price,
        }
    }
}

/// An order ready to be placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub total_price: Money,
    pub items: Vec<OrderItem>,
}

impl OrderDraft {
    /// Draft for `cart`, charged `total_price`. `None` for an empty cart.
    pub fn from_cart(user: &User, cart: &[CartLine], total_price: Money) -> Option<Self> {
        if cart.is_empty() {
            return None;
        }
        Some(Self {
            user_id: user.id.clone(),
            user_name: user.username.clone(),
            user_email: user.email.clone(),
            total_price,
            items: cart.iter().map(OrderItem::from).collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub total_price: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn from_draft(draft: OrderDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: OrderId::generate(),
            user_id: draft.user_id,
            user_name: draft.user_name,
            user_email: draft.user_email,
            total_price: draft.total_price,
            status: OrderStatus::Pending,
            created_at,
            items: draft.items,
        }
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Accepts orders.
pub trait OrderService: Send + Sync {
    fn place_order(&self, draft: OrderDraft) -> CollaboratorResult<OrderId>;
}

/// Pushes status changes for an order.
pub trait OrderStatusFeed: Send + Sync {
    /// Receiver that yields the order's current status first, then every
    /// later change for `id`. Closed when the feed stops tracking the order.
    fn watch(&self, id: OrderId) -> CollaboratorResult<mpsc::Receiver<OrderStatus>>;
}

/// In-process order store implementing both collaborators.
#[derive(Default)]
pub struct MemoryOrderBook {
    orders: RwLock<Vec<Order>>,
    watchers: Mutex<Vec<(OrderId, mpsc::Sender<OrderStatus>)>>,
    reject_orders: AtomicBool,
}

impl MemoryOrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent placements fail with `Unavailable` (or succeed again).
    pub fn set_rejecting(&self, rejecting: bool) {
        self.reject_orders.store(rejecting, Ordering::SeqCst);
    }

    /// Snapshot of all orders, newest first.
    pub fn orders(&self) -> Vec<Order> {
        let mut orders = self
            .orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders
    }

    pub fn order(&self, id: OrderId) -> Option<Order> {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|o| o.id == id)
            .cloned()
    }

    /// Change an order's status and notify its watchers.
    pub fn set_status(&self, id: OrderId, status: OrderStatus) -> CollaboratorResult<()> {
        {
            let mut orders = self.orders.write().unwrap_or_else(PoisonError::into_inner);
            let order = orders
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or_else(|| CollaboratorError::NotFound(format!("order {id}")))?;
            order.status = status;
        }
        tracing::info!(order = %id, %status, "order status changed");

        let mut watchers = self.watchers.lock().unwrap_or_else(PoisonError::into_inner);
        watchers.retain(|(watched, tx)| *watched != id || tx.send(status).is_ok());
        Ok(())
    }

    /// Move an order to its next stage. Returns the new status, or `None`
    /// if it was already completed.
    pub fn advance(&self, id: OrderId) -> CollaboratorResult<Option<OrderStatus>> {
        let current = self
            .order(id)
            .ok_or_else(|| CollaboratorError::NotFound(format!("order {id}")))?
            .status;
        match current.next() {
            Some(next) => self.set_status(id, next).map(|()| Some(next)),
            None => Ok(None),
        }
    }

    /// Stop feeding every watcher of `id`.
    pub fn close_feed(&self, id: OrderId) {
        self.watchers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(watched, _)| *watched != id);
    }
}

impl OrderService for MemoryOrderBook {
    fn place_order(&self, draft: OrderDraft) -> CollaboratorResult<OrderId> {
        if self.reject_orders.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Unavailable("order service offline".into()));
        }
        if draft.items.is_empty() {
            return Err(CollaboratorError::Rejected("order has no items".into()));
        }
        let order = Order::from_draft(draft, Utc::now());
        let id = order.id;
        self.orders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(order);
        tracing::info!(order = %id, "order placed");
        Ok(id)
    }
}

impl OrderStatusFeed for MemoryOrderBook {
    fn watch(&self, id: OrderId) -> CollaboratorResult<mpsc::Receiver<OrderStatus>> {
        // Read the status under the watcher lock so a concurrent
        // `set_status` is either seen here or delivered afterwards.
        let mut watchers = self.watchers.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self
            .order(id)
            .ok_or_else(|| CollaboratorError::NotFound(format!("order {id}")))?
            .status;
        let (tx, rx) = mpsc::channel();
        // The receiver is still alive, so this cannot fail.
        let _ = tx.send(current);
        watchers.push((id, tx));
        Ok(rx)
    }
}

// ---------------------------------------------------------------------------
// Status subscription
// ---------------------------------------------------------------------------

/// Forwards status changes for one order into the update loop.
pub struct OrderStatusSubscription<M> {
    order: OrderId,
    feed: Arc<dyn OrderStatusFeed>,
    make_msg: Arc<dyn Fn(OrderId, OrderStatus) -> M + Send + Sync>,
}

impl<M> OrderStatusSubscription<M> {
    pub fn new(
        order: OrderId,
        feed: Arc<dyn OrderStatusFeed>,
        make_msg: impl Fn(OrderId, OrderStatus) -> M + Send + Sync + 'static,
    ) -> Self {
        Self {
            order,
            feed,
            make_msg: Arc::new(make_msg),
        }
    }

    /// Subscription id for tracking `order`.
    pub fn id_for(order: OrderId) -> SubId {
        // "ORDR"
        order.as_uuid().as_u64_pair().0 ^ 0x4f52_4452
    }
}

impl<M: Send + 'static> Subscription<M> for OrderStatusSubscription<M> {
    fn id(&self) -> SubId {
        Self::id_for(self.order)
    }

    fn run(&self, sender: mpsc::Sender<M>, stop: StopSignal) {
        let updates = match self.feed.watch(self.order) {
            Ok(rx) => rx,
            Err(err) => {
                tracing::warn!(order = %self.order, error = %err, "cannot watch order");
                return;
            }
        };
        crate::debug_trace!("order feed started: {}", self.order);
        while !stop.is_stopped() {
            match updates.recv_timeout(FEED_POLL) {
                Ok(status) => {
                    if sender.send((self.make_msg)(self.order, status)).is_err() {
                        break;
                    }
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
        crate::debug_trace!("order feed stopped: {}", self.order);
    }
}

// ---------------------------------------------------------------------------
// Admin views
// ---------------------------------------------------------------------------

/// A pizza's share of ordered quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularPizza {
    pub name: String,
    pub quantity: u64,
}

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DashboardStats {
    pub total_orders: usize,
    pub total_revenue: Money,
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub today: usize,
    pub low_stock_items: usize,
    /// At most five, by quantity descending then name.
    pub top_pizzas: Vec<PopularPizza>,
}

impl DashboardStats {
    pub fn compute(orders: &[Order], inventory: &[InventoryRecord], today: NaiveDate) -> Self {
        let count = |status| orders.iter().filter(|o| o.status == status).count();

        let mut per_pizza: HashMap<&str, u64> = HashMap::new();
        for item in orders.iter().flat_map(|o| &o.items) {
            *per_pizza.entry(item.pizza_name.as_str()).or_default() += u64::from(item.quantity);
        }
        let mut top_pizzas: Vec<_> = per_pizza
            .into_iter()
            .map(|(name, quantity)| PopularPizza {
                name: name.to_owned(),
                quantity,
            })
            .collect();
        top_pizzas.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
        top_pizzas.truncate(5);

        Self {
            total_orders: orders.len(),
            total_revenue: orders.iter().map(|o| o.total_price).sum(),
            pending: count(OrderStatus::Pending),
            processing: count(OrderStatus::Processing),
            completed: count(OrderStatus::Completed),
            today: orders
                .iter()
                .filter(|o| o.created_at.date_naive() == today)
                .count(),
            low_stock_items: inventory
                .iter()
                .filter(|r| r.stock_quantity < r.low_stock_threshold)
                .count(),
            top_pizzas,
        }
    }
}

/// Admin order list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// `None` shows every status.
    pub status: Option<OrderStatus>,
    /// Case-insensitive substring over customer name, email, and order id.
    pub search: String,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if self.status.is_some_and(|s| s != order.status) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || order.user_name.to_lowercase().contains(&needle)
            || order.user_email.to_lowercase().contains(&needle)
            || order.id.to_string().contains(&needle)
    }

    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|o| self.matches(o)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AppAction, AppState};
    use chrono::TimeZone;
    use pizzart_core::{Catalog, InventoryCategory, PizzaConfig, finalize};

    fn user() -> User {
        User::new("u1", "Chef@Pizzart.id", "Chef Budi")
    }

    fn cart() -> Vec<CartLine> {
        let catalog = Catalog::builtin();
        let config = PizzaConfig::default_for(&catalog)
            .with_topping(catalog.topping("pepperoni").unwrap());
        let pizza = finalize(&catalog, &config, "Classic").unwrap();
        let mut state = AppState::default();
        state.apply(AppAction::AddToCart { pizza, quantity: 2 });
        state.cart().to_vec()
    }

    fn order(name: &str, qty: u32, status: OrderStatus, at: DateTime<Utc>) -> Order {
        let mut draft = OrderDraft::from_cart(&user(), &cart(), Money::new(100)).unwrap();
        draft.items[0].pizza_name = name.to_owned();
        draft.items[0].quantity = qty;
        let mut o = Order::from_draft(draft, at);
        o.status = status;
        o
    }

    #[test]
    fn timeline_flags() {
        let steps = OrderStatus::Processing.timeline();
        let active: Vec<_> = steps.iter().map(|s| s.is_active).collect();
        let current: Vec<_> = steps.iter().map(|s| s.is_current).collect();
        assert_eq!(active, [true, true, false, false]);
        assert_eq!(current, [false, true, false, false]);
        assert_eq!(steps[2].label, "Dalam Pengiriman");
        assert_eq!(OrderStatus::Completed.next(), None);
    }

    #[test]
    fn draft_from_cart() {
        assert!(OrderDraft::from_cart(&user(), &[], Money::new(1)).is_none());
        let draft = OrderDraft::from_cart(&user(), &cart(), Money::new(176_000)).unwrap();
        assert_eq!(draft.items.len(), 1);
        let item = &draft.items[0];
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, Money::new(80_000));
        assert_eq!(item.toppings[0]["id"], "pepperoni");
        assert_eq!(item.toppings[0]["price"], 15_000);
    }

    #[test]
    fn memory_book_places_and_notifies() {
        let book = MemoryOrderBook::new();
        let draft = OrderDraft::from_cart(&user(), &cart(), Money::new(176_000)).unwrap();
        let id = book.place_order(draft.clone()).unwrap();
        let rx = book.watch(id).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(1)), Ok(OrderStatus::Pending));

        assert_eq!(book.advance(id), Ok(Some(OrderStatus::Processing)));
        assert_eq!(rx.recv_timeout(Duration::from_secs(1)), Ok(OrderStatus::Processing));
        book.set_status(id, OrderStatus::Completed).unwrap();
        assert_eq!(book.advance(id), Ok(None));

        book.set_rejecting(true);
        assert!(matches!(book.place_order(draft), Err(CollaboratorError::Unavailable(_))));
        assert!(matches!(
            book.watch(OrderId::generate()),
            Err(CollaboratorError::NotFound(_))
        ));
    }

    #[test]
    fn watch_starts_from_current_status() {
        let book = MemoryOrderBook::new();
        let id = book
            .place_order(OrderDraft::from_cart(&user(), &cart(), Money::new(1)).unwrap())
            .unwrap();
        book.set_status(id, OrderStatus::Completed).unwrap();

        let rx = book.watch(id).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(1)), Ok(OrderStatus::Completed));
        assert_eq!(rx.try_recv(), Err(mpsc::TryRecvError::Empty));
    }

    #[test]
    fn order_ids_key_ordered_maps() {
        let (a, b) = (OrderId::generate(), OrderId::generate());
        let tracked: std::collections::BTreeMap<_, _> =
            [(a, OrderStatus::Pending), (b, OrderStatus::Shipped)].into_iter().collect();
        assert_eq!(tracked.len(), 2);
        assert_eq!(tracked.get(&b), Some(&OrderStatus::Shipped));
        assert!(tracked.keys().zip(tracked.keys().skip(1)).all(|(x, y)| x < y));
    }

    #[test]
    fn status_subscription_forwards_until_stopped() {
        let book = Arc::new(MemoryOrderBook::new());
        let id = book
            .place_order(OrderDraft::from_cart(&user(), &cart(), Money::new(1)).unwrap())
            .unwrap();
        let sub = OrderStatusSubscription::new(id, book.clone(), |id, status| (id, status));
        assert_eq!(sub.id(), OrderStatusSubscription::<()>::id_for(id));

        let (tx, rx) = mpsc::channel();
        let (signal, trigger) = StopSignal::new();
        let handle = std::thread::spawn(move || sub.run(tx, signal));

        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)),
            Ok((id, OrderStatus::Pending))
        );
        book.set_status(id, OrderStatus::Shipped).unwrap();
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)),
            Ok((id, OrderStatus::Shipped))
        );
        trigger.stop();
        handle.join().unwrap();
    }

    #[test]
    fn dashboard_stats() {
        let today = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2025, 3, 9, 23, 0, 0).unwrap();
        let orders = vec![
            order("Margherita", 3, OrderStatus::Pending, today),
            order("Hawaiian", 1, OrderStatus::Processing, today),
            order("Margherita", 2, OrderStatus::Completed, yesterday),
            order("Diavola", 4, OrderStatus::Shipped, yesterday),
        ];
        let inventory = vec![
            InventoryRecord::new("Cheese", InventoryCategory::Cheese, 2).with_threshold(5),
            InventoryRecord::new("Flour", InventoryCategory::Base, 50).with_threshold(5),
        ];
        let stats = DashboardStats::compute(&orders, &inventory, today.date_naive());
        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.total_revenue, Money::new(400));
        assert_eq!((stats.pending, stats.processing, stats.completed), (1, 1, 1));
        assert_eq!(stats.today, 2);
        assert_eq!(stats.low_stock_items, 1);
        let top: Vec<_> = stats.top_pizzas.iter().map(|p| (p.name.as_str(), p.quantity)).collect();
        assert_eq!(top, [("Margherita", 5), ("Diavola", 4), ("Hawaiian", 1)]);
    }

    #[test]
    fn order_filter() {
        let now = Utc::now();
        let orders = vec![
            order("A", 1, OrderStatus::Pending, now),
            order("B", 1, OrderStatus::Completed, now),
        ];
        let by_status = OrderFilter {
            status: Some(OrderStatus::Completed),
            search: String::new(),
        };
        assert_eq!(by_status.apply(&orders).len(), 1);

        let by_email = OrderFilter {
            status: None,
            search: "chef@PIZZART".into(),
        };
        assert_eq!(by_email.apply(&orders).len(), 2);

        let id_prefix = orders[1].id.to_string()[..8].to_uppercase();
        let by_id = OrderFilter {
            status: None,
            search: id_prefix,
        };
        assert_eq!(by_id.apply(&orders).len(), 1);
    }
}
