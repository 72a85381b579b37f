//! bondfan-extract-pads: die pad table from a GDSII chip layout
//!
//! Prints the `die` configuration section (width, height and pad centres)
//! for the pad frame found below the top cell.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use bondfan::extract::{extract_pads_from_file, ExtractOptions, LayerSpec, MAX_PRECISION};
use bondfan::logging::{init_tracing, log_level};

/// Extracts die pad coordinates from a GDSII layout.
///
/// The output is a JSON object usable as the `die` section of a bondfan
/// configuration file.
#[derive(Parser, Debug)]
#[command(name = "bondfan-extract-pads")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GDSII stream file
    #[arg(value_name = "GDS_FILE")]
    gds_file: PathBuf,

    /// Name of the top cell
    #[arg(long, default_value = "caravel_openframe")]
    top_cell: String,

    /// Regular expression selecting the pad frame cell below the top cell
    #[arg(long, default_value = "chip_io_openframe")]
    region: String,

    /// Layer/datatype of the die boundary polygon
    #[arg(long, value_name = "L/D", default_value = "235/4")]
    boundary: LayerSpec,

    /// Layer/datatype of the pad openings
    #[arg(long, value_name = "L/D", default_value = "76/20")]
    pads: LayerSpec,

    /// Decimal places kept in millimetre coordinates (0 to 15)
    #[arg(
        long,
        value_name = "N",
        default_value_t = 9,
        value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_PRECISION))
    )]
    precision: u32,

    /// Write the JSON to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn options(&self) -> ExtractOptions {
        ExtractOptions {
            top_cell: self.top_cell.clone(),
            region: self.region.clone(),
            boundary: self.boundary,
            pads: self.pads,
            precision: self.precision,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(log_level(args.verbose, args.quiet, "warn"));

    let table = match extract_pads_from_file(&args.gds_file, &args.options()) {
        Ok(table) => table,
        Err(e) => {
            error!(error = %e, path = %args.gds_file.display(), "Pad extraction failed");
            return ExitCode::FAILURE;
        }
    };

    let json = match serde_json::to_string_pretty(&table) {
        Ok(json) => json,
        Err(e) => {
            error!(error = %e, "Cannot serialise pad table");
            return ExitCode::FAILURE;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, format!("{json}\n")) {
                error!(error = %e, path = %path.display(), "Cannot write pad table");
                return ExitCode::FAILURE;
            }
            info!(path = %path.display(), pads = table.pads.len(), "Wrote pad table");
        }
        None => println!("{json}"),
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_reference_chip() {
        let args = Args::try_parse_from(["bondfan-extract-pads", "caravel.gds"]).unwrap();
        assert_eq!(args.options(), ExtractOptions::default());
    }

    #[test]
    fn layer_options_parse() {
        let args = Args::try_parse_from([
            "bondfan-extract-pads",
            "chip.gds",
            "--pads",
            "81/3",
            "--precision",
            "6",
        ])
        .unwrap();
        assert_eq!(args.pads, LayerSpec::new(81, 3));
        assert_eq!(args.options().precision, 6);
    }

    #[test]
    fn precision_is_bounded() {
        let parse = |n: &str| {
            Args::try_parse_from(["bondfan-extract-pads", "chip.gds", "--precision", n])
        };
        assert_eq!(parse("15").unwrap().precision, 15);
        assert!(parse("16").is_err());
    }
}
