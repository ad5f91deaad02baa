#![forbid(unsafe_code)]

//! The storefront model: builder session, app state, and collaborator flows
//! wired into the update loop.
//!
//! # Flows
//!
//! - **Session start** issues an inventory fetch tagged with the session id.
//!   The result narrows the catalog only if that session is still current;
//!   on failure the static catalog stays and a warning notice is shown.
//! - **Submit** finalizes the pizza, puts it in the cart, and awards the
//!   create reward.
//! - **Checkout** places the order off-thread. Success clears the cart,
//!   awards checkout points, and starts tracking the order; failure keeps
//!   the cart and shows a generic notice.
//! - **Tracking** subscribes to status pushes for each placed order until it
//!   completes.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use pizzart_core::{
    ArtifactId, Catalog, InventoryIndex, InventoryRecord, PizzaArtifact, PizzaSize,
};
use tracing::{debug, info, info_span, warn};

use crate::community::{self, SortMode};
use crate::config::StorefrontConfig;
use crate::contest::ContestId;
use crate::error::CollaboratorResult;
use crate::inventory_source::InventorySource;
use crate::orders::{
    OrderDraft, OrderId, OrderService, OrderStatus, OrderStatusFeed, OrderStatusSubscription,
};
use crate::program::{Cmd, Model};
use crate::session::{BuilderSession, SessionError, SessionId};
use crate::store::{AppAction, AppState, CartLineId, CartSummary, User};
use crate::subscription::Subscription;

// ---------------------------------------------------------------------------
// Services & notices
// ---------------------------------------------------------------------------

/// External collaborators the storefront talks to.
#[derive(Clone)]
pub struct Services {
    pub inventory: Arc<dyn InventorySource>,
    pub orders: Arc<dyn OrderService>,
    pub status_feed: Arc<dyn OrderStatusFeed>,
}

impl Services {
    pub fn new(
        inventory: Arc<dyn InventorySource>,
        orders: Arc<dyn OrderService>,
        status_feed: Arc<dyn OrderStatusFeed>,
    ) -> Self {
        Self {
            inventory,
            orders,
            status_feed,
        }
    }

    /// One object serving both order placement and status pushes.
    pub fn with_order_book<B>(inventory: Arc<dyn InventorySource>, book: Arc<B>) -> Self
    where
        B: OrderService + OrderStatusFeed + 'static,
    {
        Self {
            inventory,
            orders: book.clone(),
            status_feed: book,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

pub const NOTICE_ORDER_FAILED: &str = "We couldn't place your order. Your cart has been kept; please try again.";
pub const NOTICE_INVENTORY_UNAVAILABLE: &str = "Live stock is unavailable; showing the full menu.";

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum StorefrontMsg {
    Login(User),
    Logout,

    /// Abandon the current builder session and start a fresh one.
    NewSession,
    InventoryLoaded {
        session: SessionId,
        result: CollaboratorResult<Vec<InventoryRecord>>,
    },
    SetSize(PizzaSize),
    SetCrust(String),
    SetSauce(String),
    ToggleTopping(String),
    SetName(String),
    SubmitPizza,
    /// Publish the submitted pizza to the community gallery.
    ShareSubmitted,
    /// Enter the submitted pizza into a contest.
    EnterContest(ContestId),

    LikePizza(ArtifactId),
    UnlockAchievement(u32),

    RemoveFromCart(CartLineId),
    UpdateCartQuantity(CartLineId, u32),
    ClearCart,
    Checkout,
    OrderPlaced {
        result: CollaboratorResult<OrderId>,
        reward_points: u64,
    },
    OrderStatusChanged(OrderId, OrderStatus),
    StopTracking(OrderId),

    DismissNotices,
    Quit,
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

pub struct Storefront {
    config: StorefrontConfig,
    services: Services,
    base_catalog: Catalog,
    catalog: Catalog,
    state: AppState,
    session: BuilderSession,
    checkout_in_flight: bool,
    tracked: BTreeMap<OrderId, OrderStatus>,
    notices: Vec<Notice>,
}

impl Storefront {
    pub fn new(config: StorefrontConfig, services: Services, state: AppState) -> Self {
        Self::with_catalog(config, services, state, Catalog::builtin())
    }

    pub fn with_catalog(
        config: StorefrontConfig,
        services: Services,
        state: AppState,
        catalog: Catalog,
    ) -> Self {
        let session = BuilderSession::new(catalog.clone(), session_seed(&config));
        Self {
            config,
            services,
            base_catalog: catalog.clone(),
            catalog,
            state,
            session,
            checkout_in_flight: false,
            tracked: BTreeMap::new(),
            notices: Vec::new(),
        }
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn session(&self) -> &BuilderSession {
        &self.session
    }

    /// Catalog the current session is built against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn checkout_in_flight(&self) -> bool {
        self.checkout_in_flight
    }

    /// Orders being tracked and their last known status.
    pub fn tracked_orders(&self) -> &BTreeMap<OrderId, OrderStatus> {
        &self.tracked
    }

    pub fn cart_summary(&self) -> CartSummary {
        self.state
            .cart_summary(self.config.tax_percent, self.config.rupiah_per_point)
    }

    pub fn community_feed(&self, query: &str, mode: SortMode) -> Vec<&PizzaArtifact> {
        community::feed(self.state.community(), query, mode)
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    fn start_session(&mut self) -> Cmd<StorefrontMsg> {
        self.catalog = self.base_catalog.clone();
        self.session = BuilderSession::new(self.catalog.clone(), session_seed(&self.config));
        if !self.config.use_inventory {
            return Cmd::none();
        }
        let session = self.session.id();
        let inventory = Arc::clone(&self.services.inventory);
        Cmd::task_named("fetch_inventory", move || StorefrontMsg::InventoryLoaded {
            session,
            result: inventory.fetch_inventory(),
        })
    }

    fn on_inventory(
        &mut self,
        session: SessionId,
        result: CollaboratorResult<Vec<InventoryRecord>>,
    ) -> Cmd<StorefrontMsg> {
        if session != self.session.id() {
            crate::debug_trace!("discarding inventory for stale session {session}");
            debug!(%session, current = %self.session.id(), "stale inventory result discarded");
            return Cmd::none();
        }
        match result {
            Ok(records) => {
                let index = InventoryIndex::from_records(&records);
                let narrowed = self.base_catalog.filtered_by(&index);
                if let Err(err) = self.session.apply_catalog(narrowed.clone()) {
                    debug!(error = %err, "inventory arrived after submit; catalog kept");
                    return Cmd::none();
                }
                self.catalog = narrowed;
                info!(records = records.len(), "catalog narrowed to live inventory");
                Cmd::none()
            }
            Err(err) => {
                warn!(error = %err, kind = err.kind(), "inventory fetch failed; using static catalog");
                self.notices.push(Notice::warning(NOTICE_INVENTORY_UNAVAILABLE));
                Cmd::none()
            }
        }
    }

    fn on_session_result<T>(&mut self, result: Result<T, SessionError>) -> Cmd<StorefrontMsg> {
        if let Err(err) = result {
            debug!(error = %err, "builder edit rejected");
            self.notices.push(Notice::error(err.to_string()));
        }
        Cmd::none()
    }

    fn on_submit(&mut self) -> Cmd<StorefrontMsg> {
        let artifact = match self.session.submit() {
            Ok(artifact) => artifact.clone(),
            Err(err) => return self.on_session_result::<()>(Err(err)),
        };
        let artifact = match self.state.user() {
            Some(user) => artifact.with_creator(user.id.clone()),
            None => artifact,
        };
        let name = artifact.name.clone();
        self.state.apply(AppAction::AddToCart {
            pizza: artifact,
            quantity: 1,
        });
        self.state.apply(AppAction::AddPoints(self.config.create_reward));
        self.notices.push(Notice::info(format!("{name} added to your cart")));
        Cmd::log(format!("pizza created: {name}"))
    }

    fn submitted_artifact(&self) -> Option<PizzaArtifact> {
        let artifact = self.session.artifact()?.clone();
        Some(match self.state.user() {
            Some(user) => artifact.with_creator(user.id.clone()),
            None => artifact,
        })
    }

    fn on_share(&mut self) -> Cmd<StorefrontMsg> {
        let Some(artifact) = self.submitted_artifact() else {
            return Cmd::none();
        };
        if self.state.community_pizza(artifact.id).is_some() {
            return Cmd::none();
        }
        self.state.apply(AppAction::AddCommunityPizza(artifact));
        Cmd::none()
    }

    fn on_enter_contest(&mut self, contest: ContestId) -> Cmd<StorefrontMsg> {
        let Some(pizza) = self.submitted_artifact() else {
            return Cmd::none();
        };
        let entered = self.state.apply(AppAction::SubmitToContest {
            contest,
            pizza,
            at: Utc::now(),
        });
        if !entered {
            self.notices
                .push(Notice::warning("This pizza can't be entered into that contest."));
        }
        Cmd::none()
    }

    fn on_like(&mut self, id: ArtifactId) -> Cmd<StorefrontMsg> {
        if self.state.apply(AppAction::LikePizza(id)) {
            self.state.apply(AppAction::AddPoints(self.config.like_reward));
        }
        Cmd::none()
    }

    fn on_checkout(&mut self) -> Cmd<StorefrontMsg> {
        if self.checkout_in_flight {
            return Cmd::none();
        }
        let Some(user) = self.state.user() else {
            self.notices.push(Notice::warning("Please sign in to check out."));
            return Cmd::none();
        };
        let summary = self.cart_summary();
        let Some(draft) = OrderDraft::from_cart(user, self.state.cart(), summary.total) else {
            return Cmd::none();
        };
        self.checkout_in_flight = true;
        let orders = Arc::clone(&self.services.orders);
        let reward_points = summary.reward_points;
        Cmd::task_named("place_order", move || StorefrontMsg::OrderPlaced {
            result: orders.place_order(draft),
            reward_points,
        })
    }

    fn on_order_placed(
        &mut self,
        result: CollaboratorResult<OrderId>,
        reward_points: u64,
    ) -> Cmd<StorefrontMsg> {
        self.checkout_in_flight = false;
        match result {
            Ok(id) => {
                self.state.apply(AppAction::ClearCart);
                self.state.apply(AppAction::AddPoints(reward_points));
                self.tracked.insert(id, OrderStatus::Pending);
                self.notices.push(Notice::info(format!(
                    "Order placed! +{reward_points} points"
                )));
                Cmd::log(format!("order placed: {id}"))
            }
            Err(err) => {
                warn!(error = %err, kind = err.kind(), "order placement failed");
                self.notices.push(Notice::error(NOTICE_ORDER_FAILED));
                Cmd::none()
            }
        }
    }

    fn on_status(&mut self, id: OrderId, status: OrderStatus) -> Cmd<StorefrontMsg> {
        let Some(current) = self.tracked.get_mut(&id) else {
            return Cmd::none();
        };
        *current = status;
        info!(order = %id, %status, "order status update");
        if status.is_final() {
            self.tracked.remove(&id);
            return Cmd::log(format!("order {id} completed"));
        }
        Cmd::none()
    }
}

fn session_seed(config: &StorefrontConfig) -> u64 {
    config.layout_seed.unwrap_or_else(rand::random)
}

impl Model for Storefront {
    type Message = StorefrontMsg;

    fn init(&mut self) -> Cmd<StorefrontMsg> {
        info!(inventory = self.config.use_inventory, "storefront starting");
        self.start_session()
    }

    fn update(&mut self, msg: StorefrontMsg) -> Cmd<StorefrontMsg> {
        let _span = info_span!("pizzart.storefront.update").entered();
        match msg {
            StorefrontMsg::Login(user) => {
                self.state.apply(AppAction::Login(user));
                Cmd::none()
            }
            StorefrontMsg::Logout => {
                self.state.apply(AppAction::Logout);
                self.tracked.clear();
                Cmd::none()
            }
            StorefrontMsg::NewSession => self.start_session(),
            StorefrontMsg::InventoryLoaded { session, result } => self.on_inventory(session, result),
            StorefrontMsg::SetSize(size) => {
                let result = self.session.set_size(size);
                self.on_session_result(result)
            }
            StorefrontMsg::SetCrust(id) => {
                let result = self.session.set_crust(&id);
                self.on_session_result(result)
            }
            StorefrontMsg::SetSauce(id) => {
                let result = self.session.set_sauce(&id);
                self.on_session_result(result)
            }
            StorefrontMsg::ToggleTopping(id) => {
                let result = self.session.toggle_topping(&id);
                self.on_session_result(result)
            }
            StorefrontMsg::SetName(name) => {
                let result = self.session.set_name(name);
                self.on_session_result(result)
            }
            StorefrontMsg::SubmitPizza => self.on_submit(),
            StorefrontMsg::ShareSubmitted => self.on_share(),
            StorefrontMsg::EnterContest(contest) => self.on_enter_contest(contest),
            StorefrontMsg::LikePizza(id) => self.on_like(id),
            StorefrontMsg::UnlockAchievement(id) => {
                self.state.apply(AppAction::UnlockAchievement(id));
                Cmd::none()
            }
            StorefrontMsg::RemoveFromCart(line) => {
                self.state.apply(AppAction::RemoveFromCart(line));
                Cmd::none()
            }
            StorefrontMsg::UpdateCartQuantity(line, quantity) => {
                self.state.apply(AppAction::UpdateCartQuantity { line, quantity });
                Cmd::none()
            }
            StorefrontMsg::ClearCart => {
                self.state.apply(AppAction::ClearCart);
                Cmd::none()
            }
            StorefrontMsg::Checkout => self.on_checkout(),
            StorefrontMsg::OrderPlaced {
                result,
                reward_points,
            } => self.on_order_placed(result, reward_points),
            StorefrontMsg::OrderStatusChanged(id, status) => self.on_status(id, status),
            StorefrontMsg::StopTracking(id) => {
                self.tracked.remove(&id);
                Cmd::none()
            }
            StorefrontMsg::DismissNotices => {
                self.notices.clear();
                Cmd::none()
            }
            StorefrontMsg::Quit => Cmd::quit(),
        }
    }

    fn subscriptions(&self) -> Vec<Box<dyn Subscription<StorefrontMsg>>> {
        self.tracked
            .keys()
            .map(|&id| {
                Box::new(OrderStatusSubscription::new(
                    id,
                    Arc::clone(&self.services.status_feed),
                    StorefrontMsg::OrderStatusChanged,
                )) as Box<dyn Subscription<StorefrontMsg>>
            })
            .collect()
    }
}
