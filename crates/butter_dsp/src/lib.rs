//! Butter DSP - Butterworth IIR Filters
//!
//! This crate designs digital Butterworth filters and applies them to
//! multi-channel sample data:
//! - Lowpass, highpass, bandpass and notch designs of any order
//! - Pole/zero synthesis with bilinear transform and pre-warping
//! - Direct-form-I filtering, forward or forward-backward (zero phase)
//! - Channels filtered in parallel with identical results to a serial run
//!
//! # Example
//!
//! ```
//! use butter_dsp::{design_butterworth, filtfilt, FilterType};
//!
//! let coeffs = design_butterworth(1000.0, FilterType::Lowpass, 2, &[100.0]).unwrap();
//! let data = vec![vec![1.0, 0.0]; 64];
//! let smoothed = filtfilt(&data, &coeffs).unwrap();
//! assert_eq!(smoothed.len(), 64);
//! ```

mod apply;
mod butterworth;
mod coefficients;
mod config;
mod error;

pub use apply::{filter, filter_with, filtfilt, filtfilt_with};
pub use butterworth::{design_butterworth, Butterworth, REAL_TOLERANCE};
pub use coefficients::FilterCoefficients;
pub use config::{FilterOptions, FilterSpec, FilterType, MAX_ORDER};
pub use error::{ErrorKind, FilterError, FilterResult};
pub use num_complex::Complex64;
