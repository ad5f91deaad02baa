#![forbid(unsafe_code)]

//! Storefront runtime for Pizzart.
//!
//! # Role in Pizzart
//! `pizzart-runtime` owns every piece of mutable state: the builder session,
//! the cart and gallery ([`store::AppState`]), and tracked orders. It runs
//! them through an Elm-style loop where [`program::Model::update`] is the
//! single writer and collaborator calls run as background tasks.
//!
//! # Primary responsibilities
//! - **Program**: the update loop, commands, and background tasks.
//! - **ProgramSimulator**: deterministic, single-threaded driver for tests.
//! - **Subscriptions**: long-lived sources such as order status feeds.
//! - **Session / Store**: builder state machine and the app reducer.
//! - **Collaborators**: inventory and order traits with in-memory stand-ins.
//!
//! # How it fits in the system
//! Pricing, catalog and layout come from `pizzart-core` and
//! `pizzart-layout`; this crate sequences them. Hosts construct a
//! [`app::Storefront`] with their [`app::Services`] and hand it to a
//! [`program::Program`].

pub mod app;
pub mod community;
pub mod config;
pub mod contest;
pub mod debug_trace;
pub mod error;
pub mod inventory_source;
pub mod logging;
pub mod orders;
pub mod program;
pub mod session;
pub mod simulator;
pub mod store;
pub mod subscription;

pub use app::{Notice, NoticeLevel, Services, Storefront, StorefrontMsg};
pub use community::{CommunityTotals, SortMode};
pub use config::StorefrontConfig;
pub use contest::{Contest, ContestError, ContestId};
pub use error::{CollaboratorError, CollaboratorResult};
pub use inventory_source::{InventorySource, MemoryInventory};
pub use logging::{LogConfig, LogFormat};
pub use orders::{
    DashboardStats, MemoryOrderBook, Order, OrderDraft, OrderFilter, OrderId, OrderItem,
    OrderService, OrderStatus, OrderStatusFeed, OrderStatusSubscription, TimelineStep,
};
pub use program::{Cmd, Model, Program, ProgramConfig, ProgramHandle, TaskSpec};
pub use session::{BuilderSession, SessionError, SessionId, SessionState};
pub use simulator::{CmdRecord, ProgramSimulator};
pub use store::{
    Achievement, AppAction, AppState, CartLine, CartLineId, CartSummary, User, reduce,
};
pub use subscription::{StopSignal, SubId, Subscription};
