//! Butterworth Filter Designer
//!
//! Pole/zero synthesis after Fisher's `mkfilter`:
//!
//! 1. Place the analog prototype poles on the left half of the unit circle.
//! 2. Pre-warp the cutoffs (`tan(π·f/fs)/π`) to undo the bilinear
//!    transform's frequency compression.
//! 3. Move the poles to the requested response (lowpass scale, highpass
//!    inversion, bandpass/notch split into pole pairs).
//! 4. Map poles to the z-plane with `z = (2+s)/(2-s)` and place the zeros.
//! 5. Expand roots into polynomial coefficients and normalise the gain.
//!
//! Every step is evaluated in a fixed operation order so identical inputs
//! give bit-identical coefficients.

use std::f64::consts::{PI, SQRT_2};

use num_complex::Complex64;
use tracing::{debug, error};

use crate::coefficients::FilterCoefficients;
use crate::config::{FilterSpec, FilterType};
use crate::error::{FilterError, FilterResult};

/// Largest imaginary residue tolerated in an expanded polynomial
pub const REAL_TOLERANCE: f64 = 1e-10;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const TWO: Complex64 = Complex64::new(2.0, 0.0);
const HALF: Complex64 = Complex64::new(0.5, 0.0);
const MINUS_ONE: Complex64 = Complex64::new(-1.0, 0.0);

/// A designed Butterworth filter
///
/// The coefficients are computed once at construction and never change.
#[derive(Debug, Clone, PartialEq)]
pub struct Butterworth {
    spec: FilterSpec,
    coefficients: FilterCoefficients,
}

impl Butterworth {
    /// Design a filter
    ///
    /// # Arguments
    /// * `sampling_rate` - Sampling rate of the signal in Hz
    /// * `filter_type` - Response shape
    /// * `order` - Prototype order, 1 to [`MAX_ORDER`](crate::MAX_ORDER)
    /// * `cutoffs` - One cutoff for lowpass/highpass, `[low, high]` for bandpass/notch
    pub fn new(
        sampling_rate: f64,
        filter_type: FilterType,
        order: usize,
        cutoffs: &[f64],
    ) -> FilterResult<Self> {
        Self::from_spec(FilterSpec::new(sampling_rate, filter_type, order, cutoffs))
    }

    pub fn from_spec(spec: FilterSpec) -> FilterResult<Self> {
        let coefficients = design(&spec)?;
        Ok(Self { spec, coefficients })
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.coefficients
    }

    pub fn into_coefficients(self) -> FilterCoefficients {
        self.coefficients
    }

    /// Forward-filter a `[samples][channels]` matrix
    pub fn filter(&self, data: &[Vec<f64>]) -> FilterResult<Vec<Vec<f64>>> {
        crate::apply::filter(data, &self.coefficients)
    }

    /// Zero-phase filter a `[samples][channels]` matrix
    pub fn filtfilt(&self, data: &[Vec<f64>]) -> FilterResult<Vec<Vec<f64>>> {
        crate::apply::filtfilt(data, &self.coefficients)
    }
}

/// Design a Butterworth filter and return its coefficients
pub fn design_butterworth(
    sampling_rate: f64,
    filter_type: FilterType,
    order: usize,
    cutoffs: &[f64],
) -> FilterResult<FilterCoefficients> {
    design(&FilterSpec::new(sampling_rate, filter_type, order, cutoffs))
}

pub(crate) fn design(spec: &FilterSpec) -> FilterResult<FilterCoefficients> {
    spec.validate()?;

    let filter_type = spec.filter_type;
    let fs = spec.sampling_rate;

    let raw_alpha1 = spec.low_cutoff() / fs;
    let raw_alpha2 = if filter_type.is_band() {
        spec.high_cutoff() / fs
    } else {
        raw_alpha1
    };

    let w1 = Complex64::new(2.0 * PI * prewarp(raw_alpha1), 0.0);
    let w2 = Complex64::new(2.0 * PI * prewarp(raw_alpha2), 0.0);

    let s_poles = transform_poles(prototype_poles(spec.order), filter_type, w1, w2);

    let z_poles: Vec<Complex64> = s_poles.iter().map(|&p| bilinear(p)).collect();
    let z_zeros = place_zeros(spec, z_poles.len());

    let top = expand(&z_zeros).map_err(|e| log_failure(spec, e))?;
    let bot = expand(&z_poles).map_err(|e| log_failure(spec, e))?;

    let gain = match filter_type {
        FilterType::Notch => evaluate(&top, &bot, ONE),
        _ => evaluate(
            &top,
            &bot,
            Complex64::new(0.0, PI * (raw_alpha1 + raw_alpha2)).exp(),
        ),
    };
    let gain = magnitude(gain);

    let n = z_poles.len();
    let lead = bot[n].re;
    let mut b: Vec<f64> = top
        .iter()
        .map(|c| match filter_type {
            // -3dB at the cutoff
            FilterType::Lowpass | FilterType::Highpass => c.re / lead / gain / SQRT_2,
            FilterType::Bandpass | FilterType::Notch => c.re / lead / gain,
        })
        .collect();
    let mut a: Vec<f64> = bot.iter().map(|c| c.re / lead).collect();

    // Highest-degree term first
    a.reverse();
    b.reverse();

    debug!(
        %filter_type,
        order = spec.order,
        sampling_rate = fs,
        cutoffs = ?spec.cutoffs,
        poles = n,
        "designed butterworth filter"
    );

    Ok(FilterCoefficients::new(a, b))
}

fn log_failure(spec: &FilterSpec, err: FilterError) -> FilterError {
    error!(
        filter_type = %spec.filter_type,
        order = spec.order,
        sampling_rate = spec.sampling_rate,
        cutoffs = ?spec.cutoffs,
        "{}",
        err
    );
    err
}

/// `tan(π·α)/π`
#[inline]
fn prewarp(raw_alpha: f64) -> f64 {
    (PI * raw_alpha).tan() / PI
}

/// Left half-plane poles of the normalised analog prototype
fn prototype_poles(order: usize) -> Vec<Complex64> {
    let n = order as f64;
    (0..2 * order)
        .map(|i| {
            let angle = if order % 2 == 1 {
                (i as f64 * PI) / n
            } else {
                ((i as f64 + 0.5) * PI) / n
            };
            Complex64::new(0.0, angle).exp()
        })
        .filter(|z| z.re < 0.0)
        .collect()
}

/// Scale, invert or split the prototype poles for the requested response
fn transform_poles(
    poles: Vec<Complex64>,
    filter_type: FilterType,
    w1: Complex64,
    w2: Complex64,
) -> Vec<Complex64> {
    match filter_type {
        FilterType::Lowpass => poles.into_iter().map(|p| p * w1).collect(),
        FilterType::Highpass => poles.into_iter().map(|p| w1 / p).collect(),
        FilterType::Bandpass | FilterType::Notch => {
            let w0 = principal_sqrt(w1 * w2);
            let bw = w2 - w1;
            let n = poles.len();

            // Pair i lands at i and n + i
            let mut out = vec![ZERO; 2 * n];
            for (i, &p) in poles.iter().enumerate() {
                let hba = if filter_type == FilterType::Bandpass {
                    HALF * (p * bw)
                } else {
                    HALF * (bw / p)
                };
                let temp = w0 / hba;
                let temp = principal_sqrt(ONE - temp * temp);
                out[i] = hba * (ONE + temp);
                out[n + i] = hba * (ONE - temp);
            }
            out
        }
    }
}

/// `z = (2+s)/(2-s)`
#[inline]
fn bilinear(s: Complex64) -> Complex64 {
    (TWO + s) / (TWO - s)
}

fn place_zeros(spec: &FilterSpec, count: usize) -> Vec<Complex64> {
    match spec.filter_type {
        FilterType::Lowpass => vec![MINUS_ONE; count],
        FilterType::Highpass => vec![ONE; count],
        FilterType::Bandpass => (0..count)
            .map(|i| if i % 2 == 0 { ONE } else { MINUS_ONE })
            .collect(),
        FilterType::Notch => {
            let center = (spec.high_cutoff() + spec.low_cutoff()) / 2.0;
            let theta = 2.0 * PI * center / spec.sampling_rate;
            let (sin, cos) = theta.sin_cos();
            (0..count)
                .map(|i| {
                    if i % 2 == 0 {
                        Complex64::new(cos, sin)
                    } else {
                        Complex64::new(cos, -sin)
                    }
                })
                .collect()
        }
    }
}

/// Expand `∏(z - root)` into coefficients, index `i` holding the `z^i` term
///
/// Fails when the result is not real within [`REAL_TOLERANCE`], which means
/// the roots were not closed under conjugation.
fn expand(roots: &[Complex64]) -> FilterResult<Vec<Complex64>> {
    let n = roots.len();
    let mut coeffs = vec![ZERO; n + 1];
    coeffs[0] = ONE;

    for &root in roots {
        multiply_in(root, &mut coeffs);
    }

    if let Some((index, c)) = coeffs
        .iter()
        .enumerate()
        .find(|(_, c)| c.im.abs() > REAL_TOLERANCE)
    {
        return Err(FilterError::NonRealCoefficient {
            index,
            imaginary: c.im,
        });
    }

    Ok(coeffs)
}

/// Multiply the polynomial in place by `(z - w)`
fn multiply_in(w: Complex64, coeffs: &mut [Complex64]) {
    let nw = negate(w);
    for i in (1..coeffs.len()).rev() {
        coeffs[i] = nw * coeffs[i] + coeffs[i - 1];
    }
    coeffs[0] = nw * coeffs[0];
}

/// `top(z) / bot(z)`
fn evaluate(top: &[Complex64], bot: &[Complex64], z: Complex64) -> Complex64 {
    eval_poly(top, z) / eval_poly(bot, z)
}

fn eval_poly(coeffs: &[Complex64], z: Complex64) -> Complex64 {
    coeffs
        .iter()
        .rev()
        .fold(ZERO, |sum, &c| sum * z + c)
}

/// `|z|` as `sqrt(re² + im²)`
#[inline]
fn magnitude(z: Complex64) -> f64 {
    z.norm_sqr().sqrt()
}

/// `0 - z`, so a zero component stays +0.0
#[inline]
fn negate(z: Complex64) -> Complex64 {
    ZERO - z
}

/// Principal square root
///
/// Radicands that round below zero clamp to 0 rather than producing NaN.
/// The imaginary part takes the sign of `z.im`.
fn principal_sqrt(z: Complex64) -> Complex64 {
    let r = magnitude(z);
    let re = clamped_sqrt(0.5 * (r + z.re));
    let im = clamped_sqrt(0.5 * (r - z.re));
    if z.im < 0.0 {
        Complex64::new(re, -im)
    } else {
        Complex64::new(re, im)
    }
}

#[inline]
fn clamped_sqrt(x: f64) -> f64 {
    if x >= 0.0 {
        x.sqrt()
    } else {
        0.0
    }
}
