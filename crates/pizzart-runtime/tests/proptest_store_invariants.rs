//! Property-based invariant tests for the app reducer.
//!
//! 1. Cart lines always have quantity ≥ 1 and distinct pizzas.
//! 2. Points never move while signed out and never decrease while signed in.
//! 3. The checkout summary is internally consistent.
//! 4. Logout always leaves an empty cart and a locked board.
//! 5. Achievement points are awarded at most once per achievement.

use std::collections::HashSet;

use pizzart_core::{Catalog, Money, PizzaArtifact, PizzaConfig, finalize};
use pizzart_runtime::{AppAction, AppState, User};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Actions with cart lines and pizzas given as indices, resolved against
/// the state at apply time.
#[derive(Debug, Clone)]
enum Step {
    Login,
    Logout,
    Add { pizza: usize, quantity: u32 },
    Remove { line: usize },
    Update { line: usize, quantity: u32 },
    Clear,
    Points(u64),
    Unlock(u32),
    Like { pizza: usize },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        1 => Just(Step::Login),
        1 => Just(Step::Logout),
        4 => (0usize..4, 0u32..4).prop_map(|(pizza, quantity)| Step::Add { pizza, quantity }),
        2 => (0usize..6).prop_map(|line| Step::Remove { line }),
        2 => (0usize..6, 0u32..5).prop_map(|(line, quantity)| Step::Update { line, quantity }),
        1 => Just(Step::Clear),
        2 => (0u64..500).prop_map(Step::Points),
        2 => (0u32..8).prop_map(Step::Unlock),
        1 => (0usize..4).prop_map(|pizza| Step::Like { pizza }),
    ]
}

fn pizzas() -> Vec<PizzaArtifact> {
    let catalog = Catalog::builtin();
    let base = PizzaConfig::default_for(&catalog);
    ["pepperoni", "ham", "olives", "cheddar"]
        .iter()
        .map(|id| {
            let config = base.clone().with_topping(catalog.topping(id).unwrap());
            finalize(&catalog, &config, id).unwrap()
        })
        .collect()
}

fn resolve(step: &Step, state: &AppState, pool: &[PizzaArtifact]) -> Option<AppAction> {
    let line_id = |i: usize| {
        let cart = state.cart();
        (!cart.is_empty()).then(|| cart[i % cart.len()].id)
    };
    Some(match step {
        Step::Login => AppAction::Login(User::new("u", "u@example.com", "u")),
        Step::Logout => AppAction::Logout,
        Step::Add { pizza, quantity } => AppAction::AddToCart {
            pizza: pool[*pizza].clone(),
            quantity: *quantity,
        },
        Step::Remove { line } => AppAction::RemoveFromCart(line_id(*line)?),
        Step::Update { line, quantity } => AppAction::UpdateCartQuantity {
            line: line_id(*line)?,
            quantity: *quantity,
        },
        Step::Clear => AppAction::ClearCart,
        Step::Points(n) => AppAction::AddPoints(*n),
        Step::Unlock(id) => AppAction::UnlockAchievement(*id),
        Step::Like { pizza } => AppAction::LikePizza(pool[*pizza].id),
    })
}

fn points(state: &AppState) -> Option<u64> {
    state.user().map(|u| u.points)
}

// ═════════════════════════════════════════════════════════════════════════
// Properties
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cart_lines_stay_well_formed(steps in prop::collection::vec(step_strategy(), 0..60)) {
        let pool = pizzas();
        let mut state = AppState::default();
        for step in &steps {
            if let Some(action) = resolve(step, &state, &pool) {
                state.apply(action);
            }
            let mut seen = HashSet::new();
            for line in state.cart() {
                prop_assert!(line.quantity >= 1);
                prop_assert!(seen.insert(line.pizza.id), "duplicate pizza line");
            }
        }
    }

    #[test]
    fn points_follow_sign_in(steps in prop::collection::vec(step_strategy(), 0..60)) {
        let pool = pizzas();
        let mut state = AppState::default();
        for step in &steps {
            let before = points(&state);
            let Some(action) = resolve(step, &state, &pool) else { continue };
            let is_auth_change = matches!(action, AppAction::Login(_) | AppAction::Logout);
            state.apply(action);
            if is_auth_change {
                continue;
            }
            match (before, points(&state)) {
                (None, after) => prop_assert_eq!(after, None),
                (Some(b), Some(a)) => prop_assert!(a >= b),
                (Some(_), None) => prop_assert!(false, "user vanished without logout"),
            }
        }
    }

    #[test]
    fn summary_is_consistent(
        steps in prop::collection::vec(step_strategy(), 0..40),
        tax in 0u64..=100,
        per_point in 1u64..5000,
    ) {
        let pool = pizzas();
        let mut state = AppState::default();
        for step in &steps {
            if let Some(action) = resolve(step, &state, &pool) {
                state.apply(action);
            }
        }
        let summary = state.cart_summary(tax, per_point);
        let by_line: Money = state.cart().iter().map(|l| l.line_total()).sum();
        prop_assert_eq!(summary.subtotal, by_line);
        prop_assert_eq!(summary.total, summary.subtotal + summary.tax);
        prop_assert!(summary.tax <= summary.subtotal);
        prop_assert_eq!(summary.reward_points, summary.subtotal.amount() / per_point);
        prop_assert_eq!(summary.items, state.cart_item_count());
    }

    #[test]
    fn logout_resets(steps in prop::collection::vec(step_strategy(), 0..40)) {
        let pool = pizzas();
        let mut state = AppState::default();
        for step in &steps {
            if let Some(action) = resolve(step, &state, &pool) {
                state.apply(action);
            }
        }
        state.apply(AppAction::Logout);
        prop_assert!(state.cart().is_empty());
        prop_assert!(state.user().is_none());
        prop_assert!(state.achievements().iter().all(|a| !a.unlocked));
    }

    #[test]
    fn achievements_pay_once(ids in prop::collection::vec(0u32..8, 0..30)) {
        let mut state = AppState::default();
        state.apply(AppAction::Login(User::new("u", "e", "n")));
        for id in &ids {
            state.apply(AppAction::UnlockAchievement(*id));
        }
        let expected: u64 = state
            .achievements()
            .iter()
            .filter(|a| a.unlocked)
            .map(|a| a.points)
            .sum();
        prop_assert_eq!(points(&state), Some(expected));
        let distinct: HashSet<_> = ids.iter().filter(|&&id| (1..=6).contains(&id)).collect();
        prop_assert_eq!(state.achievements().iter().filter(|a| a.unlocked).count(), distinct.len());
    }
}
