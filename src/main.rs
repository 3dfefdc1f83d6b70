//! Voltlab - DC circuit analyzer
//!
//! Reads a circuit file, runs one steady-state analysis and prints the
//! readings of every component.
//!
//! # Usage
//!
//! ```bash
//! voltlab divider.cir
//! voltlab bridge.cir --format json --no-reductions -vv
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use voltlab_core::{
    circuit::Circuit, dsl, error::Result, report::Report, solver::Feedback, Analyzer,
    AnalyzerConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// DC circuit analyzer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the circuit file
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Gate input threshold in volts
    #[arg(long, value_name = "V")]
    logic_threshold: Option<f64>,

    /// Gate output high level in volts
    #[arg(long, value_name = "V")]
    logic_high: Option<f64>,

    /// Always use nodal analysis
    #[arg(long)]
    no_reductions: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Parse the circuit file
    let ast = dsl::parse_file(&args.circuit_file)?;

    // Build the circuit
    let mut circuit = Circuit::from_ast(ast)?;

    let mut config = AnalyzerConfig::new().with_reductions(!args.no_reductions);
    if let Some(v) = args.logic_threshold {
        config = config.with_logic_threshold(v);
    }
    if let Some(v) = args.logic_high {
        config = config.with_logic_high(v);
    }
    let analyzer = Analyzer::with_config(config)?;

    let mut feedback = Feedback::new();
    let analysis = match analyzer.analyze_with_feedback(&mut circuit.components, &mut feedback) {
        Ok(analysis) => analysis,
        Err(e) => {
            // Show what was decided before the solver gave up
            for entry in feedback.entries() {
                eprintln!("[{:?}] {}", entry.severity, entry.message);
            }
            return Err(e);
        }
    };
    let report = Report::new(&analysis, &circuit.components);

    match args.format {
        Format::Text => print!("{}", report),
        Format::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
