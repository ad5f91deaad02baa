#![forbid(unsafe_code)]

//! Storefront settings read from `PIZZART_*` environment variables.
//!
//! | Variable                  | Default                           |
//! |---------------------------|-----------------------------------|
//! | `PIZZART_USE_INVENTORY`   | `true`                            |
//! | `PIZZART_LAYOUT_SEED`     | unset (fresh seed per session)    |
//! | `PIZZART_LIKE_REWARD`     | `5`                               |
//! | `PIZZART_CREATE_REWARD`   | `25`                              |
//! | `PIZZART_RUPIAH_PER_POINT`| `1000`                            |
//! | `PIZZART_TAX_PERCENT`     | `10`                              |
//! | `PIZZART_LOG`             | [`DEFAULT_FILTER`]                |
//! | `PIZZART_LOG_FORMAT`      | `text`                            |
//!
//! Unparseable values are logged at `warn` and replaced by the default.

use std::env;
use std::str::FromStr;

use crate::logging::{DEFAULT_FILTER, LogConfig, LogFormat};

pub const ENV_USE_INVENTORY: &str = "PIZZART_USE_INVENTORY";
pub const ENV_LAYOUT_SEED: &str = "PIZZART_LAYOUT_SEED";
pub const ENV_LIKE_REWARD: &str = "PIZZART_LIKE_REWARD";
pub const ENV_CREATE_REWARD: &str = "PIZZART_CREATE_REWARD";
pub const ENV_RUPIAH_PER_POINT: &str = "PIZZART_RUPIAH_PER_POINT";
pub const ENV_TAX_PERCENT: &str = "PIZZART_TAX_PERCENT";
pub const ENV_LOG: &str = "PIZZART_LOG";
pub const ENV_LOG_FORMAT: &str = "PIZZART_LOG_FORMAT";

/// Runtime settings for the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Narrow the catalog to live inventory when it can be fetched.
    pub use_inventory: bool,
    /// Fixed seed for topping layouts. `None` draws one per session.
    pub layout_seed: Option<u64>,
    /// Points for liking a community pizza.
    pub like_reward: u64,
    /// Points for finishing a pizza in the builder.
    pub create_reward: u64,
    /// Rupiah spent per point awarded at checkout.
    pub rupiah_per_point: u64,
    /// Tax shown on the cart summary, in percent.
    pub tax_percent: u64,
    pub log: LogConfig,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            use_inventory: true,
            layout_seed: None,
            like_reward: 5,
            create_reward: 25,
            rupiah_per_point: 1000,
            tax_percent: 10,
            log: LogConfig::default(),
        }
    }
}

impl StorefrontConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its
    /// value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let config = Self {
            use_inventory: parse_or(&lookup, ENV_USE_INVENTORY, defaults.use_inventory, parse_bool),
            layout_seed: lookup(ENV_LAYOUT_SEED).and_then(|raw| match raw.trim().parse() {
                Ok(seed) => Some(seed),
                Err(_) => {
                    warn_invalid(ENV_LAYOUT_SEED, &raw);
                    None
                }
            }),
            like_reward: parse_or(&lookup, ENV_LIKE_REWARD, defaults.like_reward, from_str),
            create_reward: parse_or(&lookup, ENV_CREATE_REWARD, defaults.create_reward, from_str),
            rupiah_per_point: parse_or(
                &lookup,
                ENV_RUPIAH_PER_POINT,
                defaults.rupiah_per_point,
                |raw| from_str(raw).filter(|&v: &u64| v > 0),
            ),
            tax_percent: parse_or(&lookup, ENV_TAX_PERCENT, defaults.tax_percent, |raw| {
                from_str(raw).filter(|&v: &u64| v <= 100)
            }),
            log: LogConfig {
                filter: lookup(ENV_LOG)
                    .filter(|f| !f.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_FILTER.to_owned()),
                format: parse_or(&lookup, ENV_LOG_FORMAT, LogFormat::Text, |raw| raw.parse().ok()),
            },
        };
        tracing::debug!(?config, "storefront config loaded");
        config
    }

    #[must_use]
    pub fn with_inventory(mut self, enabled: bool) -> Self {
        self.use_inventory = enabled;
        self
    }

    #[must_use]
    pub fn with_layout_seed(mut self, seed: u64) -> Self {
        self.layout_seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_like_reward(mut self, points: u64) -> Self {
        self.like_reward = points;
        self
    }

    #[must_use]
    pub fn with_create_reward(mut self, points: u64) -> Self {
        self.create_reward = points;
        self
    }

    /// A zero rate is ignored.
    #[must_use]
    pub fn with_rupiah_per_point(mut self, rupiah: u64) -> Self {
        if rupiah > 0 {
            self.rupiah_per_point = rupiah;
        }
        self
    }

    #[must_use]
    pub fn with_tax_percent(mut self, percent: u64) -> Self {
        self.tax_percent = percent.min(100);
        self
    }

    #[must_use]
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => parse(raw.trim()).unwrap_or_else(|| {
            warn_invalid(key, &raw);
            default
        }),
    }
}

fn from_str<T: FromStr>(raw: &str) -> Option<T> {
    raw.parse().ok()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn warn_invalid(key: &str, raw: &str) {
    tracing::warn!(key, value = raw, "ignoring invalid setting, using default");
}
