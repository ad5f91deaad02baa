#![forbid(unsafe_code)]

//! Application state and its reducer.
//!
//! [`AppState`] holds everything the storefront shares across pages: the
//! signed-in user, the cart, the community gallery, contests, and the
//! achievement board. Fields are private; the only way to change them is
//! [`AppState::apply`] (or the by-value [`reduce`]) with an [`AppAction`].
//!
//! # Invariants
//!
//! 1. Every cart line has quantity ≥ 1 and a distinct pizza id.
//! 2. Points only change while a user is signed in.
//! 3. An achievement unlocks at most once per sign-in and awards its points
//!    exactly when it unlocks.
//! 4. Logging out clears the user, the cart, and the achievement board.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use pizzart_core::{ArtifactId, Money, PizzaArtifact, PizzaSize, ToppingSelection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contest::{Contest, ContestId};

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub points: u64,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            username: username.into(),
            points: 0,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartLineId(Uuid);

impl CartLineId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CartLineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub pizza: PizzaArtifact,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.pizza.price * self.quantity
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub points: u64,
    pub unlocked: bool,
}

/// The achievement board every user starts with, all locked.
pub fn builtin_achievements() -> Vec<Achievement> {
    [
        (1, "First Pizza", "Create your first pizza", "🍕", 50),
        (2, "Social Butterfly", "Collect 100 likes", "❤️", 100),
        (3, "Pizza Master", "Create 20 pizzas", "👨‍🍳", 200),
        (4, "Contest Winner", "Win a contest", "🏆", 500),
        (5, "Flavor Explorer", "Try every topping", "🌟", 300),
        (6, "Community Star", "Collect 1000 likes", "⭐", 1000),
    ]
    .into_iter()
    .map(|(id, name, description, icon, points)| Achievement {
        id,
        name: name.to_owned(),
        description: description.to_owned(),
        icon: icon.to_owned(),
        points,
        unlocked: false,
    })
    .collect()
}

/// Cart totals as shown at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CartSummary {
    pub items: u64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
    /// Points awarded when this cart is paid for.
    pub reward_points: u64,
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Every state change the storefront can make.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Login(User),
    Logout,
    /// Merge into the line for the same pizza, or append a new line.
    /// Quantity 0 is ignored.
    AddToCart { pizza: PizzaArtifact, quantity: u32 },
    RemoveFromCart(CartLineId),
    /// Quantity 0 removes the line.
    UpdateCartQuantity { line: CartLineId, quantity: u32 },
    ClearCart,
    /// Newest first.
    AddCommunityPizza(PizzaArtifact),
    LikePizza(ArtifactId),
    AddPoints(u64),
    UnlockAchievement(u32),
    SubmitToContest {
        contest: ContestId,
        pizza: PizzaArtifact,
        at: DateTime<Utc>,
    },
}

impl AppAction {
    /// Stable name for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Logout => "logout",
            Self::AddToCart { .. } => "add_to_cart",
            Self::RemoveFromCart(_) => "remove_from_cart",
            Self::UpdateCartQuantity { .. } => "update_cart_quantity",
            Self::ClearCart => "clear_cart",
            Self::AddCommunityPizza(_) => "add_community_pizza",
            Self::LikePizza(_) => "like_pizza",
            Self::AddPoints(_) => "add_points",
            Self::UnlockAchievement(_) => "unlock_achievement",
            Self::SubmitToContest { .. } => "submit_to_contest",
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    user: Option<User>,
    cart: Vec<CartLine>,
    community: Vec<PizzaArtifact>,
    contests: Vec<Contest>,
    achievements: Vec<Achievement>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            user: None,
            cart: Vec::new(),
            community: Vec::new(),
            contests: Vec::new(),
            achievements: builtin_achievements(),
        }
    }
}

/// Apply `action` to `state` and return the result.
#[must_use]
pub fn reduce(mut state: AppState, action: AppAction) -> AppState {
    state.apply(action);
    state
}

impl AppState {
    /// State with the launch gallery and contest, relative to `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let community = [
            ("Dragon Fire Special", PizzaSize::Large, "thick", "spicy", 89_000, "user1", 247, 3),
            ("Garden Paradise", PizzaSize::Medium, "thin", "pesto", 65_000, "user2", 156, 2),
            ("Meat Lovers Deluxe", PizzaSize::Large, "stuffed", "bbq", 95_000, "user3", 312, 1),
        ]
        .into_iter()
        .map(|(name, size, crust, sauce, price, creator, likes, age_days)| PizzaArtifact {
            id: ArtifactId::generate(),
            name: name.to_owned(),
            size,
            crust: crust.to_owned(),
            sauce: sauce.to_owned(),
            toppings: ToppingSelection::new(),
            price: Money::new(price),
            likes,
            created_by: Some(creator.to_owned()),
            created_at: now - Duration::days(age_days),
            is_template: false,
        })
        .collect();

        Self {
            community,
            contests: vec![Contest::summer_vibes(now, 28)],
            ..Self::default()
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }

    pub fn community(&self) -> &[PizzaArtifact] {
        &self.community
    }

    pub fn community_pizza(&self, id: ArtifactId) -> Option<&PizzaArtifact> {
        self.community.iter().find(|p| p.id == id)
    }

    pub fn contests(&self) -> &[Contest] {
        &self.contests
    }

    pub fn contest(&self, id: ContestId) -> Option<&Contest> {
        self.contests.iter().find(|c| c.id == id)
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    /// Share of achievements unlocked, in percent.
    pub fn completion_rate(&self) -> f64 {
        if self.achievements.is_empty() {
            return 0.0;
        }
        let unlocked = self.achievements.iter().filter(|a| a.unlocked).count();
        unlocked as f64 / self.achievements.len() as f64 * 100.0
    }

    pub fn cart_item_count(&self) -> u64 {
        self.cart.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn cart_subtotal(&self) -> Money {
        self.cart.iter().map(CartLine::line_total).sum()
    }

    /// Checkout totals with `tax_percent` tax and one point per
    /// `rupiah_per_point` of subtotal.
    pub fn cart_summary(&self, tax_percent: u64, rupiah_per_point: u64) -> CartSummary {
        let subtotal = self.cart_subtotal();
        let tax = Money::new(subtotal.amount().saturating_mul(tax_percent) / 100);
        CartSummary {
            items: self.cart_item_count(),
            subtotal,
            tax,
            total: subtotal + tax,
            reward_points: subtotal.whole_units(rupiah_per_point),
        }
    }

    /// Apply one action. Returns `false` when the action changed nothing.
    pub fn apply(&mut self, action: AppAction) -> bool {
        let kind = action.kind();
        let changed = match action {
            AppAction::Login(user) => {
                tracing::info!(user = %user.id, "user signed in");
                self.user = Some(user);
                true
            }
            AppAction::Logout => {
                let was_signed_in = self.user.take().is_some();
                let had_cart = !self.cart.is_empty();
                let had_unlocked = self.achievements.iter().any(|a| a.unlocked);
                self.cart.clear();
                self.achievements = builtin_achievements();
                was_signed_in || had_cart || had_unlocked
            }
            AppAction::AddToCart { pizza, quantity } => self.add_to_cart(pizza, quantity),
            AppAction::RemoveFromCart(line) => {
                let before = self.cart.len();
                self.cart.retain(|l| l.id != line);
                self.cart.len() != before
            }
            AppAction::UpdateCartQuantity { line, quantity } => {
                if quantity == 0 {
                    return self.apply(AppAction::RemoveFromCart(line));
                }
                match self.cart.iter_mut().find(|l| l.id == line) {
                    Some(l) => {
                        l.quantity = quantity;
                        true
                    }
                    None => false,
                }
            }
            AppAction::ClearCart => {
                let had_lines = !self.cart.is_empty();
                self.cart.clear();
                had_lines
            }
            AppAction::AddCommunityPizza(pizza) => {
                self.community.insert(0, pizza);
                true
            }
            AppAction::LikePizza(id) => match self.community.iter_mut().find(|p| p.id == id) {
                Some(p) => {
                    p.likes = p.likes.saturating_add(1);
                    true
                }
                None => false,
            },
            AppAction::AddPoints(points) => self.add_points(points),
            AppAction::UnlockAchievement(id) => self.unlock(id),
            AppAction::SubmitToContest { contest, pizza, at } => {
                match self.contests.iter_mut().find(|c| c.id == contest) {
                    Some(c) => match c.submit(pizza, at) {
                        Ok(()) => true,
                        Err(err) => {
                            tracing::debug!(contest = c.id.0, error = %err, "contest entry ignored");
                            false
                        }
                    },
                    None => false,
                }
            }
        };
        tracing::trace!(action = kind, changed, "action applied");
        changed
    }

    fn add_to_cart(&mut self, pizza: PizzaArtifact, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        if let Some(line) = self.cart.iter_mut().find(|l| l.pizza.id == pizza.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.cart.push(CartLine {
                id: CartLineId::generate(),
                pizza,
                quantity,
            });
        }
        true
    }

    fn add_points(&mut self, points: u64) -> bool {
        match self.user.as_mut() {
            Some(user) if points > 0 => {
                user.points = user.points.saturating_add(points);
                true
            }
            _ => false,
        }
    }

    fn unlock(&mut self, id: u32) -> bool {
        if self.user.is_none() {
            return false;
        }
        let Some(achievement) = self.achievements.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        if achievement.unlocked {
            return false;
        }
        achievement.unlocked = true;
        let points = achievement.points;
        tracing::info!(achievement = id, points, "achievement unlocked");
        self.add_points(points);
        true
    }
}
