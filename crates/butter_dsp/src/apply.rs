//! Filter Application
//!
//! Runs a direct-form-I recurrence over every channel (column) of a
//! `[samples][channels]` matrix.
//!
//! ```text
//! y[n] = b[0]·x[n] + Σ_{i=1}^{N-1} (b[i]·x[n-i] - a[i]·y[n-i])
//! ```
//!
//! Channels never share state, so they are filtered in parallel. The
//! result is identical to filtering them one after another.

use rayon::prelude::*;
use tracing::debug;

use crate::coefficients::FilterCoefficients;
use crate::config::FilterOptions;
use crate::error::{FilterError, FilterResult};

/// Filter every channel once, front to back
pub fn filter(data: &[Vec<f64>], coeffs: &FilterCoefficients) -> FilterResult<Vec<Vec<f64>>> {
    filter_with(data, coeffs, &FilterOptions::default())
}

/// Zero-phase filtering: a forward pass followed by a backward pass over its output
///
/// Doubles the effective order and cancels the phase shift. Needs the whole
/// signal in memory, so it is for offline use only.
pub fn filtfilt(data: &[Vec<f64>], coeffs: &FilterCoefficients) -> FilterResult<Vec<Vec<f64>>> {
    filtfilt_with(data, coeffs, &FilterOptions::default())
}

pub fn filter_with(
    data: &[Vec<f64>],
    coeffs: &FilterCoefficients,
    options: &FilterOptions,
) -> FilterResult<Vec<Vec<f64>>> {
    run(data, coeffs, options, false)
}

pub fn filtfilt_with(
    data: &[Vec<f64>],
    coeffs: &FilterCoefficients,
    options: &FilterOptions,
) -> FilterResult<Vec<Vec<f64>>> {
    run(data, coeffs, options, true)
}

fn run(
    data: &[Vec<f64>],
    coeffs: &FilterCoefficients,
    options: &FilterOptions,
    zero_phase: bool,
) -> FilterResult<Vec<Vec<f64>>> {
    coeffs.validate()?;

    let Some(first_row) = data.first() else {
        return Ok(Vec::new());
    };
    let columns = first_row.len();
    if let Some((row, r)) = data.iter().enumerate().find(|(_, r)| r.len() != columns) {
        return Err(FilterError::RaggedRow {
            row,
            expected: columns,
            got: r.len(),
        });
    }

    debug!(
        rows = data.len(),
        columns,
        taps = coeffs.len(),
        zero_phase,
        offset_correction = options.offset_correction,
        "filtering sample matrix"
    );

    let mut channels = split_channels(data, columns);
    channels.par_iter_mut().for_each(|channel| {
        forward_pass(channel, coeffs, options);
        if zero_phase {
            backward_pass(channel, coeffs, options);
        }
    });

    Ok(join_channels(&channels, data.len()))
}

fn forward_pass(channel: &mut [f64], coeffs: &FilterCoefficients, options: &FilterOptions) {
    let Some(&first) = channel.first() else {
        return;
    };
    let mut state = ChannelState::new(coeffs, seed(first, options));
    for sample in channel.iter_mut() {
        *sample = state.step(*sample);
    }
}

fn backward_pass(channel: &mut [f64], coeffs: &FilterCoefficients, options: &FilterOptions) {
    let Some(&first) = channel.last() else {
        return;
    };
    let mut state = ChannelState::new(coeffs, seed(first, options));
    for sample in channel.iter_mut().rev() {
        *sample = state.step(*sample);
    }
}

#[inline]
fn seed(first: f64, options: &FilterOptions) -> f64 {
    if options.offset_correction {
        first
    } else {
        0.0
    }
}

/// Column-major copy of a row-major matrix
fn split_channels(data: &[Vec<f64>], columns: usize) -> Vec<Vec<f64>> {
    (0..columns)
        .map(|c| data.iter().map(|row| row[c]).collect())
        .collect()
}

fn join_channels(channels: &[Vec<f64>], rows: usize) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|r| channels.iter().map(|channel| channel[r]).collect())
        .collect()
}

/// Input and output delay lines of one channel
///
/// Both windows hold the most recent `N` samples, oldest first.
#[derive(Debug, Clone)]
pub(crate) struct ChannelState<'a> {
    a: &'a [f64],
    b: &'a [f64],
    x: Vec<f64>,
    y: Vec<f64>,
}

impl<'a> ChannelState<'a> {
    /// `coeffs` must already be validated
    pub(crate) fn new(coeffs: &'a FilterCoefficients, seed: f64) -> Self {
        let n = coeffs.len();
        Self {
            a: coeffs.a(),
            b: coeffs.b(),
            x: vec![seed; n],
            y: vec![seed; n],
        }
    }

    /// Push one input sample and return the filtered output
    #[inline]
    pub(crate) fn step(&mut self, sample: f64) -> f64 {
        let last = self.x.len() - 1;

        self.x.copy_within(1.., 0);
        self.y.copy_within(1.., 0);
        self.x[last] = sample;

        let mut out = self.b[0] * self.x[last];
        for i in 1..=last {
            out = out + self.b[i] * self.x[last - i] - self.a[i] * self.y[last - i];
        }
        self.y[last] = out;
        out
    }
}
