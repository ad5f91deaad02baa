#![forbid(unsafe_code)]

//! Command-line argument parsing for the storefront demo.
//!
//! Parses args manually to keep the binary lean. `PIZZART_DEMO_*`
//! environment variables provide defaults that explicit flags override.

use std::env;
use std::fmt;
use std::process;

use pizzart::PizzaSize;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Pizzart Demo: build one pizza, check it out, and follow the order

USAGE:
    pizzart-demo [OPTIONS]

OPTIONS:
    --size=SIZE          small, medium (default) or large
    --crust=ID           Crust id (default: thin)
    --sauce=ID           Base sauce id (default: tomato)
    --topping=ID         Add a topping; repeat for more
    --name=NAME          Pizza name (default: House Special)
    --seed=N             Fixed layout seed for a reproducible preview
    --offline-inventory  Simulate the stock backend being unreachable
    --reject-orders      Simulate order placement failing
    --json               Print the report as JSON
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    PIZZART_DEMO_NAME         Override the default --name
    PIZZART_DEMO_TOPPINGS     Comma-separated default toppings
    PIZZART_LAYOUT_SEED       Layout seed when --seed is absent
    PIZZART_LOG               Log filter (e.g. debug,pizzart_runtime=trace)
    PIZZART_LOG_FORMAT        text or json";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub size: PizzaSize,
    pub crust: String,
    pub sauce: String,
    /// Topping ids in the order they were given.
    pub toppings: Vec<String>,
    pub name: String,
    pub seed: Option<u64>,
    pub offline_inventory: bool,
    pub reject_orders: bool,
    pub json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            size: PizzaSize::Medium,
            crust: "thin".into(),
            sauce: "tomato".into(),
            toppings: Vec::new(),
            name: "House Special".into(),
            seed: None,
            offline_inventory: false,
            reject_orders: false,
            json: false,
        }
    }
}

/// Why argument parsing stopped before producing [`Opts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliExit {
    Help,
    Version,
    Invalid(String),
}

impl fmt::Display for CliExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Help => f.write_str(HELP_TEXT),
            Self::Version => write!(f, "pizzart-demo {VERSION}"),
            Self::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version` or invalid input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(&args, |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(CliExit::Invalid(msg)) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
            Err(exit) => {
                println!("{exit}");
                process::exit(0);
            }
        }
    }

    /// Parse `args` with environment values supplied by `lookup`.
    pub fn parse_from(
        args: &[String],
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CliExit> {
        let mut opts = Self::default();

        if let Some(val) = lookup("PIZZART_DEMO_NAME") {
            opts.name = val;
        }
        if let Some(val) = lookup("PIZZART_DEMO_TOPPINGS") {
            opts.toppings = split_list(&val);
        }

        let mut cli_toppings = Vec::new();
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Err(CliExit::Help),
                "--version" | "-V" => return Err(CliExit::Version),
                "--offline-inventory" => opts.offline_inventory = true,
                "--reject-orders" => opts.reject_orders = true,
                "--json" => opts.json = true,
                other => {
                    if let Some(val) = other.strip_prefix("--size=") {
                        opts.size = PizzaSize::from_id(val)
                            .ok_or_else(|| CliExit::Invalid(format!("Invalid --size value: {val}")))?;
                    } else if let Some(val) = other.strip_prefix("--crust=") {
                        opts.crust = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--sauce=") {
                        opts.sauce = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--topping=") {
                        cli_toppings.push(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--name=") {
                        opts.name = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        let seed = val
                            .parse()
                            .map_err(|_| CliExit::Invalid(format!("Invalid --seed value: {val}")))?;
                        opts.seed = Some(seed);
                    } else {
                        return Err(CliExit::Invalid(format!("Unknown argument: {other}")));
                    }
                }
            }
        }

        if !cli_toppings.is_empty() {
            opts.toppings = cli_toppings;
        }
        Ok(opts)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn default_opts() {
        let opts = Opts::parse_from(&[], no_env).unwrap();
        assert_eq!(opts, Opts::default());
        assert_eq!(opts.size, PizzaSize::Medium);
        assert!(opts.toppings.is_empty());
    }

    #[test]
    fn flags_and_repeated_toppings() {
        let opts = Opts::parse_from(
            &args(&[
                "--size=large",
                "--crust=stuffed",
                "--topping=pepperoni",
                "--topping=ranch",
                "--seed=42",
                "--json",
            ]),
            no_env,
        )
        .unwrap();
        assert_eq!(opts.size, PizzaSize::Large);
        assert_eq!(opts.crust, "stuffed");
        assert_eq!(opts.toppings, vec!["pepperoni", "ranch"]);
        assert_eq!(opts.seed, Some(42));
        assert!(opts.json);
    }

    #[test]
    fn env_defaults_yield_to_flags() {
        let env = |key: &str| match key {
            "PIZZART_DEMO_NAME" => Some("From Env".to_string()),
            "PIZZART_DEMO_TOPPINGS" => Some("ham, olives,,".to_string()),
            _ => None,
        };
        let opts = Opts::parse_from(&[], env).unwrap();
        assert_eq!(opts.name, "From Env");
        assert_eq!(opts.toppings, vec!["ham", "olives"]);

        let opts = Opts::parse_from(&args(&["--topping=bacon", "--name=Flag"]), env).unwrap();
        assert_eq!(opts.name, "Flag");
        assert_eq!(opts.toppings, vec!["bacon"]);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert_eq!(
            Opts::parse_from(&args(&["--size=huge"]), no_env),
            Err(CliExit::Invalid("Invalid --size value: huge".into()))
        );
        assert!(matches!(
            Opts::parse_from(&args(&["--seed=abc"]), no_env),
            Err(CliExit::Invalid(_))
        ));
        assert!(matches!(
            Opts::parse_from(&args(&["--bogus"]), no_env),
            Err(CliExit::Invalid(msg)) if msg.contains("--bogus")
        ));
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(Opts::parse_from(&args(&["-h"]), no_env), Err(CliExit::Help));
        assert_eq!(Opts::parse_from(&args(&["--version"]), no_env), Err(CliExit::Version));
        assert!(CliExit::Help.to_string().contains("PIZZART_LAYOUT_SEED"));
    }
}
