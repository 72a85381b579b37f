//! bondfan: bond-wire fan-out footprint generator
//!
//! Lays out the fan-out for the configured die and writes one SVG per
//! manufacturing layer into the output directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use bondfan::config;
use bondfan::layout::{BondLayout, Design};
use bondfan::logging::{init_tracing, log_level};
use bondfan::render::write_layers;

/// Bond-wire fan-out footprint generator.
///
/// Without arguments, generates the Caravel reference design into the
/// current directory.
#[derive(Parser, Debug)]
#[command(name = "bondfan")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Directory receiving the SVG layers
    #[arg(short, long, value_name = "OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,

    /// Print a JSON summary of the layout to stdout
    #[arg(long)]
    print_summary: bool,
}

/// Entry point for the bondfan generator.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if config_path.is_none() {
                if let Some(default_path) = config::default_config_path() {
                    eprintln!("\nConfiguration read from: {}", default_path.display());
                }
            }
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    init_tracing(log_level(args.verbose, args.quiet, &cfg.logging.level));

    info!(
        version = env!("CARGO_PKG_VERSION"),
        out_dir = %args.out_dir.display(),
        "Starting bondfan"
    );

    let design = match Design::from_config(cfg) {
        Ok(design) => design,
        Err(e) => {
            error!(error = %e, "Invalid design");
            return ExitCode::FAILURE;
        }
    };

    let layout = match BondLayout::build(&design) {
        Ok(layout) => layout,
        Err(e) => {
            error!(error = %e, "Layout failed");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&args.out_dir) {
        error!(error = %e, path = %args.out_dir.display(), "Cannot create output directory");
        return ExitCode::FAILURE;
    }

    let written = match write_layers(&layout, &args.out_dir) {
        Ok(written) => written,
        Err(e) => {
            error!(error = %e, "Writing layers failed");
            return ExitCode::FAILURE;
        }
    };
    info!(files = written.len(), "Layers written");

    if args.print_summary {
        match serde_json::to_string_pretty(&layout.summary()) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!(error = %e, "Cannot serialise summary");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
