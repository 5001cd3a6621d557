use std::io::{self, Write};

use anyhow::{Context, Result};
use butter_dsp::{FilterCoefficients, FilterSpec};
use serde::Serialize;
use tracing::info;

use crate::cli::DesignCommandArgs;

#[derive(Serialize)]
struct CutoffGain {
    frequency: f64,
    gain_db: f64,
}

#[derive(Serialize)]
struct DesignReport<'a> {
    #[serde(flatten)]
    coefficients: &'a FilterCoefficients,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<Vec<CutoffGain>>,
}

pub fn execute(args: DesignCommandArgs) -> Result<()> {
    let spec = args.design.to_spec()?;
    let coefficients = spec.design().context("Filter design failed")?;

    info!(
        filter_type = %spec.filter_type,
        order = spec.order,
        taps = coefficients.len(),
        "filter designed"
    );

    let report = DesignReport {
        coefficients: &coefficients,
        response: args.response.then(|| cutoff_gains(&spec, &coefficients)),
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    Ok(())
}

fn cutoff_gains(spec: &FilterSpec, coefficients: &FilterCoefficients) -> Vec<CutoffGain> {
    spec.cutoffs
        .iter()
        .map(|&frequency| CutoffGain {
            frequency,
            gain_db: coefficients.gain_db_at(frequency, spec.sampling_rate),
        })
        .collect()
}
