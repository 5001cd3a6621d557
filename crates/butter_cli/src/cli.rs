use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use butter_dsp::{FilterSpec, FilterType};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "butter",
    version,
    about = "Butterworth IIR filter design and filtering tool",
    long_about = "Design Butterworth lowpass, highpass, bandpass and notch filters, \
                  and apply them to multi-channel CSV data (one row per sample, \
                  one column per channel)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Design a filter and print its coefficients as JSON
    Design(DesignCommandArgs),
    /// Generate a matrix of uniform random test data
    Generate(GenerateArgs),
    /// Filter a CSV sample matrix
    Filter(FilterArgs),
}

/// Filter parameters, given as flags or as a JSON spec file
#[derive(Args, Debug, Clone)]
pub struct DesignArgs {
    /// JSON file with sampling_rate, filter_type, order and cutoffs
    #[arg(long, conflicts_with_all = ["sampling_rate", "filter_type", "order", "cutoffs"])]
    pub spec: Option<PathBuf>,

    /// Sampling rate in Hz
    #[arg(short = 's', long, default_value_t = 1000.0)]
    pub sampling_rate: f64,

    /// lowpass, highpass, bandpass or notch
    #[arg(short = 't', long = "type", default_value = "lowpass")]
    pub filter_type: FilterType,

    /// Filter order
    #[arg(short = 'o', long, default_value_t = 2)]
    pub order: usize,

    /// Cutoff frequency in Hz; give two (low high) for bandpass and notch
    #[arg(short = 'c', long = "cutoff", num_args = 1..=2)]
    pub cutoffs: Vec<f64>,
}

impl DesignArgs {
    pub fn to_spec(&self) -> Result<FilterSpec> {
        match &self.spec {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open spec file {}", path.display()))?;
                let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("Failed to parse spec file {}", path.display()))?;

                // Keep the typed error so an unknown type exits like the --type flag
                if let Some(name) = value.get("filter_type").and_then(|v| v.as_str()) {
                    name.parse::<FilterType>()
                        .with_context(|| format!("Invalid spec file {}", path.display()))?;
                }

                serde_json::from_value(value)
                    .with_context(|| format!("Failed to parse spec file {}", path.display()))
            }
            None => Ok(FilterSpec::new(
                self.sampling_rate,
                self.filter_type,
                self.order,
                &self.cutoffs,
            )),
        }
    }
}

#[derive(Args)]
pub struct DesignCommandArgs {
    #[command(flatten)]
    pub design: DesignArgs,

    /// Also report the gain in dB at each cutoff
    #[arg(long)]
    pub response: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Number of samples (rows)
    #[arg(long, default_value_t = 10_000)]
    pub rows: usize,

    /// Number of channels (columns)
    #[arg(long, default_value_t = 10)]
    pub columns: usize,

    /// Width of the uniform noise range
    #[arg(long, default_value_t = 100.0)]
    pub amplitude: f64,

    /// Lower bound of the uniform noise range
    #[arg(long, default_value_t = 100.0)]
    pub offset: f64,

    /// RNG seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output CSV path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct FilterArgs {
    #[command(flatten)]
    pub design: DesignArgs,

    /// Input CSV path (headerless, numeric)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output CSV path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Forward-backward filtering (zero phase)
    #[arg(long)]
    pub zero_phase: bool,

    /// Seed delay lines with the first sample instead of zero
    #[arg(long)]
    pub offset_correction: bool,
}
