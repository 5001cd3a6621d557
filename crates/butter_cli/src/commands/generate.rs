use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::cli::GenerateArgs;
use crate::matrix::write_matrix_to;

pub fn execute(args: GenerateArgs) -> Result<()> {
    if !(args.amplitude.is_finite() && args.offset.is_finite()) {
        bail!("Amplitude and offset must be finite numbers");
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let data = uniform_matrix(&mut rng, args.rows, args.columns, args.amplitude, args.offset);

    info!(rows = args.rows, columns = args.columns, "generated test data");
    write_matrix_to(args.output.as_deref(), &data)
}

/// `offset + amplitude·U[0, 1)` in every cell
pub fn uniform_matrix<R: Rng>(
    rng: &mut R,
    rows: usize,
    columns: usize,
    amplitude: f64,
    offset: f64,
) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|_| {
            (0..columns)
                .map(|_| rng.random::<f64>() * amplitude + offset)
                .collect()
        })
        .collect()
}
