//! Filter Error Types

use thiserror::Error;

use crate::config::FilterType;

/// Coarse classification of a [`FilterError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-domain caller input
    InvalidArgument,
    /// Internal consistency check failed during design
    CalculationFailed,
}

/// Errors that can occur while designing or applying a filter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Unknown filter type: {0:?} (expected lowpass, highpass, bandpass or notch)")]
    UnknownFilterType(String),

    #[error("Filter order must be between 1 and {max}, got {0}", max = crate::config::MAX_ORDER)]
    InvalidOrder(usize),

    #[error("Sampling rate must be a positive finite number, got {0}")]
    InvalidSamplingRate(f64),

    #[error("{filter_type} filter needs {expected} cutoff frequencies, got {got}")]
    CutoffCount {
        filter_type: FilterType,
        expected: usize,
        got: usize,
    },

    #[error("Cutoff frequency must be a positive finite number, got {0}")]
    InvalidCutoff(f64),

    #[error("Lower cutoff {low}Hz must be below upper cutoff {high}Hz")]
    InvertedBand { low: f64, high: f64 },

    #[error("Cutoff {cutoff}Hz exceeds the Nyquist frequency {nyquist}Hz")]
    AboveNyquist { cutoff: f64, nyquist: f64 },

    #[error("Coefficient length mismatch: a has {a}, b has {b}")]
    CoefficientLengthMismatch { a: usize, b: usize },

    #[error("Filter coefficients are empty")]
    EmptyCoefficients,

    #[error("Ragged sample matrix: row {row} has {got} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Filter calculation failed: coefficient of z^{index} not real (imaginary part {imaginary:e})")]
    NonRealCoefficient { index: usize, imaginary: f64 },
}

impl FilterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FilterError::NonRealCoefficient { .. } => ErrorKind::CalculationFailed,
            _ => ErrorKind::InvalidArgument,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }
}

/// Result type alias for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
