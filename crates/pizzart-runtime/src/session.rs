#![forbid(unsafe_code)]

//! Builder session: one in-progress pizza from first click to submission.
//!
//! ```text
//!   Editing ──submit(name ≠ blank)──▶ Submitted(artifact)
//!      │ ▲
//!      └─┘ set_size / set_crust / set_sauce / toggle_topping / set_name
//!          submit(blank name) → ValidationError, still Editing
//! ```
//!
//! # Invariants
//!
//! 1. A session transitions to `Submitted` at most once; after that every
//!    mutation returns [`SessionError::AlreadySubmitted`] and leaves the
//!    session untouched.
//! 2. A failed call never changes the configuration or the name.
//! 3. Crust, sauce and topping ids accepted by the setters exist in the
//!    session's catalog at the time of the call.

use std::fmt;

use pizzart_core::{
    Catalog, PizzaArtifact, PizzaConfig, PizzaSize, PriceBreakdown, ValidationError, finalize,
};
use pizzart_layout::{PreviewPlan, config_seed, plan_preview, session_rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error code for an id that is not in the session's catalog.
pub const ERROR_CODE_UNKNOWN_OPTION: &str = "unknown_option";

/// Identity of a builder session. Collaborator results are tagged with it so
/// late arrivals for an abandoned session can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("this pizza has already been submitted")]
    AlreadySubmitted,
}

/// Lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Editing,
    Submitted(PizzaArtifact),
}

/// A pizza being configured against one catalog.
#[derive(Debug, Clone)]
pub struct BuilderSession {
    id: SessionId,
    catalog: Catalog,
    config: PizzaConfig,
    name: String,
    state: SessionState,
    seed: u64,
}

impl BuilderSession {
    /// Start editing with defaults taken from `catalog`.
    pub fn new(catalog: Catalog, seed: u64) -> Self {
        let config = PizzaConfig::default_for(&catalog);
        let session = Self {
            id: SessionId::generate(),
            catalog,
            config,
            name: String::new(),
            state: SessionState::Editing,
            seed,
        };
        tracing::debug!(session = %session.id, "builder session started");
        session
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &PizzaConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.state, SessionState::Submitted(_))
    }

    /// The finalized pizza, once submitted.
    pub fn artifact(&self) -> Option<&PizzaArtifact> {
        match &self.state {
            SessionState::Submitted(artifact) => Some(artifact),
            SessionState::Editing => None,
        }
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    pub fn set_size(&mut self, size: PizzaSize) -> Result<(), SessionError> {
        self.ensure_editing()?;
        self.config.size = size;
        Ok(())
    }

    pub fn set_crust(&mut self, id: &str) -> Result<(), SessionError> {
        self.ensure_editing()?;
        if self.catalog.crust(id).is_none() {
            return Err(unknown("crust", id).into());
        }
        self.config.crust = id.to_owned();
        Ok(())
    }

    pub fn set_sauce(&mut self, id: &str) -> Result<(), SessionError> {
        self.ensure_editing()?;
        if self.catalog.sauce(id).is_none() {
            return Err(unknown("sauce", id).into());
        }
        self.config.sauce = id.to_owned();
        Ok(())
    }

    /// Add or remove a topping. Returns `true` if it is now selected.
    pub fn toggle_topping(&mut self, id: &str) -> Result<bool, SessionError> {
        self.ensure_editing()?;
        let topping = self
            .catalog
            .topping(id)
            .ok_or_else(|| unknown("toppings", id))?;
        Ok(self.config.toppings.toggle_in_place(topping))
    }

    /// Store the name as typed; it is only checked on submit.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_editing()?;
        self.name = name.into();
        Ok(())
    }

    /// Swap in a new catalog (for example once live inventory arrives).
    ///
    /// A crust or sauce missing from the new catalog is reset to its
    /// default there; toppings it no longer lists are dropped.
    pub fn apply_catalog(&mut self, catalog: Catalog) -> Result<(), SessionError> {
        self.ensure_editing()?;
        let defaults = PizzaConfig::default_for(&catalog);
        if catalog.crust(&self.config.crust).is_none() {
            self.config.crust = defaults.crust;
        }
        if catalog.sauce(&self.config.sauce).is_none() {
            self.config.sauce = defaults.sauce;
        }
        let before = self.config.toppings.len();
        self.config.toppings = self
            .config
            .toppings
            .iter()
            .filter(|t| catalog.topping(&t.id).is_some())
            .cloned()
            .collect();
        tracing::debug!(
            session = %self.id,
            dropped_toppings = before - self.config.toppings.len(),
            "catalog applied to session"
        );
        self.catalog = catalog;
        Ok(())
    }

    /// Finalize under the current name.
    ///
    /// A blank name leaves the session editing and returns the validation
    /// error.
    pub fn submit(&mut self) -> Result<&PizzaArtifact, SessionError> {
        self.ensure_editing()?;
        let artifact = finalize(&self.catalog, &self.config, &self.name)?;
        tracing::info!(session = %self.id, artifact = %artifact.id, "pizza submitted");
        self.state = SessionState::Submitted(artifact);
        match &self.state {
            SessionState::Submitted(artifact) => Ok(artifact),
            SessionState::Editing => Err(SessionError::AlreadySubmitted),
        }
    }

    // -----------------------------------------------------------------------
    // Derived
    // -----------------------------------------------------------------------

    pub fn breakdown(&self) -> PriceBreakdown {
        PriceBreakdown::of(&self.catalog, &self.config)
    }

    pub fn price(&self) -> pizzart_core::Money {
        self.breakdown().total()
    }

    /// Render plan for the current configuration. Stable for a given
    /// session and configuration.
    pub fn preview(&self) -> PreviewPlan {
        let mut rng = session_rng(self.seed ^ config_seed(&self.config));
        plan_preview(&self.config, &mut rng)
    }

    fn ensure_editing(&self) -> Result<(), SessionError> {
        if self.is_submitted() {
            tracing::debug!(session = %self.id, "edit rejected after submit");
            return Err(SessionError::AlreadySubmitted);
        }
        Ok(())
    }
}

fn unknown(field: &'static str, id: &str) -> ValidationError {
    ValidationError::new(
        ERROR_CODE_UNKNOWN_OPTION,
        field,
        format!("`{id}` is not on the menu"),
    )
}
