use anyhow::Result;
use clap::{error::ErrorKind, Parser};
use log::{error, info, warn, LevelFilter};

use std::{path::PathBuf, process::ExitCode, time::Instant};

use sales_total::{aggregate, label_for, load, PriceEntry, Report, ReportRow, SaleRecord};

#[derive(Parser)]
#[command(version)]
/// Totals a JSON sales record against a JSON price catalogue, and appends the
/// result to a running report.
struct Args {
    /// Price catalogue file name, relative to the data directory
    catalogue: PathBuf,
    /// Sales record file name, relative to the data directory
    sales: PathBuf,
    #[arg(short, long, default_value = "tests")]
    /// Directory containing the input files
    data_dir: PathBuf,
    #[arg(short, long, default_value = "results")]
    /// Directory where SalesResults.txt is kept
    results_dir: PathBuf,
    #[arg(short, long)]
    /// Show debug output
    verbose: bool,
}

/// Where a run reads its inputs and writes its report.
struct Config {
    data_dir: PathBuf,
    results_dir: PathBuf,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            data_dir: args.data_dir.clone(),
            results_dir: args.results_dir.clone(),
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
    match run(&args, &Config::from(&args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let start = Instant::now();
    info!("reading prices from {}", args.catalogue.display());
    let prices: Vec<PriceEntry> = load(config.data_dir.join(&args.catalogue))?;
    info!("reading sales from {}", args.sales.display());
    let sales: Vec<SaleRecord> = load(config.data_dir.join(&args.sales))?;
    let tally = aggregate(&sales, &prices);
    for product in &tally.unmatched {
        warn!("product {product:?} is not in the price catalogue");
    }
    let elapsed = start.elapsed();
    info!("sales total: {:.2}", tally.total);
    info!("elapsed time: {:.4} seconds", elapsed.as_secs_f64());
    let row = ReportRow {
        label: label_for(&args.sales),
        total: tally.total,
        elapsed,
    };
    match Report::new(&config.results_dir).append(&row) {
        Ok(path) => info!("results saved to {}", path.display()),
        Err(e) => error!("writing results: {e:#}"),
    }
    Ok(())
}
