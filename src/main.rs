//! Status Map CLI
//!
//! Usage:
//!   status-map [OPTIONS] <TICK>...
//!
//! Each TICK is a JSON file holding one entity or an array of entities.
//! Ticks are applied in order, as successive refreshes of the same map, and
//! the final map is written to stdout as HTML.
//!
//! Options:
//!   -c, --config <FILE>      Render configuration (TOML format)
//!   -s, --stylesheet <FILE>  State colour palette (TOML format)
//!   --compact                Disable pretty-printing
//!   -h, --help               Print help

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use status_map::entity::load_tick;
use status_map::{HtmlConfig, RenderConfig, Stylesheet};

#[derive(Parser)]
#[command(name = "status-map")]
#[command(about = "Render live status maps of monitored infrastructure")]
struct Cli {
    /// Entity batches, applied in order as refresh ticks
    #[arg(required = true)]
    ticks: Vec<PathBuf>,

    /// Render configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State colour palette (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Write the map without indentation
    #[arg(long)]
    compact: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let html = match &cli.config {
        Some(path) => match HtmlConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => HtmlConfig::default(),
    };

    let stylesheet = match &cli.stylesheet {
        Some(path) => match Stylesheet::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading stylesheet '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Stylesheet::default(),
    };

    let html = if cli.compact {
        html.with_pretty_print(false)
    } else {
        html
    };
    let mut map = RenderConfig::new()
        .with_html(html)
        .with_stylesheet(stylesheet)
        .into_map();

    for path in &cli.ticks {
        let configs = match load_tick(path) {
            Ok(configs) => configs,
            Err(e) => {
                eprintln!("Error reading tick '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        };

        let report = map.apply_tick(configs);
        info!(
            tick = %path.display(),
            rendered = report.rendered.len(),
            unchanged = report.unchanged,
            removed = report.removed.len(),
            warnings = report.warnings.len(),
            "applied refresh tick"
        );
    }

    print!("{}", map.to_html());
}
