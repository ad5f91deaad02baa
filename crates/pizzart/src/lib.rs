#![forbid(unsafe_code)]

//! Pizzart public facade crate.
//!
//! Re-exports the catalog, pricing and layout types from the internal crates
//! together with the storefront runtime, and offers a prelude for hosts that
//! embed the builder.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use pizzart_core::{
    ArtifactId, Catalog, CrustOption, InventoryCategory, InventoryIndex, InventoryRecord, Money,
    PizzaArtifact, PizzaConfig, PizzaSize, PriceBreakdown, SauceOption, SizeOption, StockStatus,
    Topping, ToppingCategory, ToppingSelection, ValidationError, compute_price, finalize,
};

// --- Layout re-exports -----------------------------------------------------

pub use pizzart_layout::{
    IconSpec, OverlayPattern, PreviewPlan, SauceOverlay, Tint, config_seed, plan_preview,
    session_rng,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use pizzart_runtime::{
    AppAction, AppState, BuilderSession, Cmd, CollaboratorError, Model, Notice, Order,
    OrderStatus, Program, ProgramConfig, ProgramSimulator, Services, SessionError, Storefront,
    StorefrontConfig, StorefrontMsg,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Pizzart hosts.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// User input failed validation.
    Validation(ValidationError),
    /// A builder session refused the operation.
    #[cfg(feature = "runtime")]
    Session(SessionError),
    /// An inventory or order collaborator failed.
    #[cfg(feature = "runtime")]
    Collaborator(CollaboratorError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Session(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Collaborator(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Session(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Collaborator(err) => Some(err),
        }
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

#[cfg(feature = "runtime")]
impl From<SessionError> for Error {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(inner) => Self::Validation(inner),
            other => Self::Session(other),
        }
    }
}

#[cfg(feature = "runtime")]
impl From<CollaboratorError> for Error {
    fn from(err: CollaboratorError) -> Self {
        Self::Collaborator(err)
    }
}

/// Standard result type for Pizzart APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Catalog, Error, Money, PizzaArtifact, PizzaConfig, PriceBreakdown, Result,
        ValidationError, compute_price, finalize, plan_preview,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{
        AppAction, AppState, BuilderSession, Cmd, Model, Program, Storefront, StorefrontConfig,
        StorefrontMsg,
    };

    pub use crate::{core, layout};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use pizzart_core as core;
pub use pizzart_layout as layout;
#[cfg(feature = "runtime")]
pub use pizzart_runtime as runtime;
