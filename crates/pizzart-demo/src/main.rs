#![forbid(unsafe_code)]

//! Pizzart demo binary entry point.

use pizzart::runtime::{StorefrontConfig, logging};
use pizzart_demo::cli;
use pizzart_demo::scenario::{self, Pacing};

fn main() {
    let opts = cli::Opts::parse();

    let mut config = StorefrontConfig::from_env();
    if let Some(seed) = opts.seed {
        config = config.with_layout_seed(seed);
    }
    if let Err(e) = logging::init(&config.log) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }
    tracing::info!(
        use_inventory = config.use_inventory,
        layout_seed = ?config.layout_seed,
        log = %config.log,
        "starting storefront demo"
    );

    let report = scenario::run(&opts, config, Pacing::default());
    if opts.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to encode report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{report}");
    }
}
