#![forbid(unsafe_code)]

//! Community gallery: ordering, search, and totals over shared pizzas.
//!
//! All functions borrow; the gallery itself lives in
//! [`AppState`](crate::store::AppState).

use std::str::FromStr;

use pizzart_core::PizzaArtifact;
use serde::{Deserialize, Serialize};

/// Gallery ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Newest first.
    Latest,
    /// Most liked first.
    #[default]
    Popular,
    /// Currently ranked the same as `Popular`.
    Trending,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(Self::Latest),
            "popular" => Ok(Self::Popular),
            "trending" => Ok(Self::Trending),
            other => Err(format!("unknown sort mode `{other}`")),
        }
    }
}

/// `pizzas` ordered by `mode`. Ties keep gallery order.
pub fn sorted(pizzas: &[PizzaArtifact], mode: SortMode) -> Vec<&PizzaArtifact> {
    let mut out: Vec<_> = pizzas.iter().collect();
    match mode {
        SortMode::Latest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        // TODO: rank trending by recent likes once likes carry timestamps
        SortMode::Popular | SortMode::Trending => out.sort_by(|a, b| b.likes.cmp(&a.likes)),
    }
    out
}

/// Case-insensitive substring match on the pizza name. An empty query
/// matches everything.
pub fn matches_query(pizza: &PizzaArtifact, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || pizza.name.to_lowercase().contains(&query.to_lowercase())
}

/// Sorted then filtered, as the gallery shows it.
pub fn feed<'a>(pizzas: &'a [PizzaArtifact], query: &str, mode: SortMode) -> Vec<&'a PizzaArtifact> {
    sorted(pizzas, mode)
        .into_iter()
        .filter(|p| matches_query(p, query))
        .collect()
}

/// Headline numbers for the gallery header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CommunityTotals {
    pub pizzas: usize,
    pub likes: u64,
    pub templates: usize,
}

impl CommunityTotals {
    pub fn of(pizzas: &[PizzaArtifact]) -> Self {
        Self {
            pizzas: pizzas.len(),
            likes: pizzas.iter().map(|p| u64::from(p.likes)).sum(),
            templates: pizzas.iter().filter(|p| p.is_template).count(),
        }
    }
}
