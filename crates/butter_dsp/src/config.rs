//! Filter Design and Application Configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coefficients::FilterCoefficients;
use crate::error::{FilterError, FilterResult};

/// Highest prototype order a design request may ask for
pub const MAX_ORDER: usize = 1024;

/// Butterworth response shape
///
/// Deserializes through [`FromStr`], so spec files accept the same names and
/// aliases as the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum FilterType {
    Lowpass,
    Highpass,
    Bandpass,
    Notch,
}

impl FilterType {
    pub const ALL: [FilterType; 4] = [
        FilterType::Lowpass,
        FilterType::Highpass,
        FilterType::Bandpass,
        FilterType::Notch,
    ];

    /// Number of cutoff frequencies this type is specified by
    pub fn cutoff_count(self) -> usize {
        match self {
            FilterType::Lowpass | FilterType::Highpass => 1,
            FilterType::Bandpass | FilterType::Notch => 2,
        }
    }

    /// Band types double the pole count of the analog prototype
    pub fn is_band(self) -> bool {
        self.cutoff_count() == 2
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterType::Lowpass => "lowpass",
            FilterType::Highpass => "highpass",
            FilterType::Bandpass => "bandpass",
            FilterType::Notch => "notch",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lowpass" | "lp" => Ok(FilterType::Lowpass),
            "highpass" | "hp" => Ok(FilterType::Highpass),
            "bandpass" | "bp" => Ok(FilterType::Bandpass),
            "notch" | "bandstop" => Ok(FilterType::Notch),
            _ => Err(FilterError::UnknownFilterType(s.to_string())),
        }
    }
}

impl TryFrom<String> for FilterType {
    type Error = FilterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A Butterworth design request
///
/// Loadable from JSON:
/// `{"sampling_rate": 1000, "filter_type": "lowpass", "order": 2, "cutoffs": [100]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Sampling rate in Hz
    pub sampling_rate: f64,

    pub filter_type: FilterType,

    /// Order of the analog prototype (band types end up with twice as many poles)
    pub order: usize,

    /// One cutoff in Hz for lowpass/highpass, `[low, high]` for bandpass/notch
    pub cutoffs: Vec<f64>,
}

impl FilterSpec {
    pub fn new(sampling_rate: f64, filter_type: FilterType, order: usize, cutoffs: &[f64]) -> Self {
        Self {
            sampling_rate,
            filter_type,
            order,
            cutoffs: cutoffs.to_vec(),
        }
    }

    pub fn nyquist(&self) -> f64 {
        self.sampling_rate / 2.0
    }

    /// Lower (or only) cutoff; callers must have checked the cutoff count
    pub(crate) fn low_cutoff(&self) -> f64 {
        self.cutoffs[0]
    }

    /// Upper cutoff for band types, the only cutoff otherwise
    pub(crate) fn high_cutoff(&self) -> f64 {
        self.cutoffs[self.cutoffs.len() - 1]
    }

    /// Validate the request before any computation
    pub fn validate(&self) -> FilterResult<()> {
        if self.order == 0 || self.order > MAX_ORDER {
            return Err(FilterError::InvalidOrder(self.order));
        }
        if !(self.sampling_rate.is_finite() && self.sampling_rate > 0.0) {
            return Err(FilterError::InvalidSamplingRate(self.sampling_rate));
        }

        let expected = self.filter_type.cutoff_count();
        if self.cutoffs.len() != expected {
            return Err(FilterError::CutoffCount {
                filter_type: self.filter_type,
                expected,
                got: self.cutoffs.len(),
            });
        }

        if let Some(&bad) = self
            .cutoffs
            .iter()
            .find(|c| !(c.is_finite() && **c > 0.0))
        {
            return Err(FilterError::InvalidCutoff(bad));
        }

        if self.filter_type.is_band() && self.low_cutoff() >= self.high_cutoff() {
            return Err(FilterError::InvertedBand {
                low: self.low_cutoff(),
                high: self.high_cutoff(),
            });
        }

        let nyquist = self.nyquist();
        if let Some(&cutoff) = self.cutoffs.iter().find(|c| **c > nyquist) {
            return Err(FilterError::AboveNyquist { cutoff, nyquist });
        }

        Ok(())
    }

    /// Design the filter described by this request
    pub fn design(&self) -> FilterResult<FilterCoefficients> {
        crate::butterworth::design(self)
    }
}

/// Knobs for the filter applier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Seed each channel's delay lines with the first sample the pass visits
    /// instead of zero. Suppresses the start-up transient of signals that sit
    /// on a large DC offset.
    #[serde(default)]
    pub offset_correction: bool,
}

impl FilterOptions {
    pub fn with_offset_correction() -> Self {
        Self {
            offset_correction: true,
        }
    }
}
