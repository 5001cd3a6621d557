use anyhow::{Context, Result};
use butter_dsp::{filter_with, filtfilt_with, FilterOptions};
use tracing::{debug, info};

use crate::cli::FilterArgs;
use crate::matrix::{read_matrix_file, write_matrix_to};

pub fn execute(args: FilterArgs) -> Result<()> {
    let spec = args.design.to_spec()?;
    let coefficients = spec.design().context("Filter design failed")?;
    debug!(a = ?coefficients.a(), b = ?coefficients.b(), "coefficients");

    let data = read_matrix_file(&args.input)?;
    let options = FilterOptions {
        offset_correction: args.offset_correction,
    };

    let filtered = if args.zero_phase {
        filtfilt_with(&data, &coefficients, &options)
    } else {
        filter_with(&data, &coefficients, &options)
    }
    .context("Filtering failed")?;

    info!(
        rows = filtered.len(),
        columns = filtered.first().map_or(0, Vec::len),
        zero_phase = args.zero_phase,
        "filtered {}",
        args.input.display()
    );

    write_matrix_to(args.output.as_deref(), &filtered)
}
