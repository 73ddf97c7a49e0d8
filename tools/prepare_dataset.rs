//! Dataset Preparation Tool
//!
//! Turns a raw sales CSV into NumPy training arrays for the Python-side
//! model fitting step.
//!
//! # Output
//!
//! - `features.npy` - Shape `[N_rows, window + 1]` supervised matrix
//! - `targets.npy` - Shape `[N_rows]` - one target per row
//! - `metadata.json` - column names, window/lag provenance, timestamp
//!
//! # Usage
//!
//! ```bash
//! cargo run --release --bin prepare_dataset -- <sales.csv> <output_dir> [window] [lag]
//! ```
//!
//! Window and lag default to the pipeline configuration (129 and 1). Missing
//! sales values are filled with zero, with the fill count reported.

use demand_forecast::config::WindowConfig;
use demand_forecast::export::DatasetExporter;
use demand_forecast::loader::read_sales;
use demand_forecast::supervised::to_supervised;
use demand_forecast::validation::scan_missing;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_dir = &args[2];

    let defaults = WindowConfig::default();
    let window = match parse_arg(&args, 3, defaults.window) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("Error: {msg}");
            std::process::exit(1);
        }
    };
    let lag = match parse_arg(&args, 4, defaults.lag) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("Error: {msg}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(input_path, output_dir, window, lag) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(
    input_path: &str,
    output_dir: &str,
    window: usize,
    lag: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading {input_path}...");
    let mut records = read_sales(input_path)?;
    println!(
        "  {} aggregated row(s), {} through {}",
        records.len(),
        records.first().map(|r| r.date.to_string()).unwrap_or_default(),
        records.last().map(|r| r.date.to_string()).unwrap_or_default(),
    );

    let missing_scan = scan_missing(&records);
    for warning in missing_scan.warnings() {
        println!("  {warning}");
    }
    for record in &mut records {
        if record.sales.is_nan() {
            record.sales = 0.0;
        }
    }

    println!("Windowing (window={window}, lag={lag})...");
    let (frame, targets) = to_supervised(&records, window, lag, true)?;
    println!(
        "  {} supervised row(s) x {} feature(s)",
        frame.n_rows(),
        frame.n_features()
    );

    let window_config = WindowConfig {
        window,
        lag,
        drop_incomplete: true,
    };
    let result = DatasetExporter::new(output_dir).export(&frame, &targets, &window_config)?;

    println!("Wrote:");
    println!("  {}", result.features_path.display());
    println!("  {}", result.targets_path.display());
    println!("  {}", result.metadata_path.display());

    Ok(())
}

fn parse_arg(args: &[String], idx: usize, default: usize) -> Result<usize, String> {
    match args.get(idx) {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| format!("argument {idx} must be a non-negative integer, got '{raw}'")),
        None => Ok(default),
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <sales.csv> <output_dir> [window] [lag]");
    eprintln!();
    eprintln!("Prepares NumPy training arrays from a raw sales CSV.");
    eprintln!("  window  lookback steps per row (default 129)");
    eprintln!("  lag     target offset in steps (default 1)");
}
