//! Transfer Function Coefficients
//!
//! `H(z) = (b[0] + b[1]·z^-1 + ... + b[n]·z^-n) / (a[0] + a[1]·z^-1 + ... + a[n]·z^-n)`
//!
//! Both sequences are stored highest-degree-first, so `a[0]` is the leading
//! denominator coefficient (1.0 for designed filters) and `b[0]` multiplies
//! the newest input sample.

use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};

/// Denominator `a` and numerator `b` of a rational transfer function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCoefficients {
    a: Vec<f64>,
    b: Vec<f64>,
}

impl FilterCoefficients {
    /// Wrap raw coefficient sequences
    ///
    /// Lengths are not checked here; the applier rejects mismatched sets.
    pub fn new(a: Vec<f64>, b: Vec<f64>) -> Self {
        Self { a, b }
    }

    /// Denominator coefficients
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Numerator coefficients
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Number of taps in each delay line
    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Degree of the transfer function
    pub fn order(&self) -> usize {
        self.a.len().saturating_sub(1)
    }

    /// Check that `a` and `b` describe a usable recurrence
    pub fn validate(&self) -> FilterResult<()> {
        if self.a.len() != self.b.len() {
            return Err(FilterError::CoefficientLengthMismatch {
                a: self.a.len(),
                b: self.b.len(),
            });
        }
        if self.a.is_empty() {
            return Err(FilterError::EmptyCoefficients);
        }
        Ok(())
    }

    /// Complex frequency response at `frequency` Hz
    pub fn response_at(&self, frequency: f64, sampling_rate: f64) -> Complex64 {
        let omega = 2.0 * PI * frequency / sampling_rate;
        // z^-1 on the unit circle
        let z_inv = Complex64::new(0.0, -omega).exp();
        eval_reversed(&self.b, z_inv) / eval_reversed(&self.a, z_inv)
    }

    /// Linear magnitude response at `frequency` Hz
    pub fn magnitude_at(&self, frequency: f64, sampling_rate: f64) -> f64 {
        self.response_at(frequency, sampling_rate).norm()
    }

    /// Magnitude response in dB at `frequency` Hz
    pub fn gain_db_at(&self, frequency: f64, sampling_rate: f64) -> f64 {
        20.0 * self.magnitude_at(frequency, sampling_rate).log10()
    }
}

/// Horner evaluation of `c[0] + c[1]·w + ... + c[n]·w^n`
fn eval_reversed(coeffs: &[f64], w: Complex64) -> Complex64 {
    coeffs
        .iter()
        .rev()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * w + c)
}
