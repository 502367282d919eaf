//! Wavelength axis validation and index search

use crate::error::ProcessError;

/// Evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![start];
    }
    let last = (n - 1) as f64;
    let mut values: Vec<f64> = (0..n)
        .map(|i| start + (end - start) * i as f64 / last)
        .collect();
    // When the span exceeds the endpoint magnitudes by enough, the last
    // computed value can round one ulp past `end`; pin it so the axis
    // never leaves the [start, end] range it was asked for.
    values[n - 1] = end;
    values
}

/// Wavelength axis of a spectrometer [nm].
///
/// Validated strictly increasing at construction and immutable afterwards;
/// it defines the domain of every spectrum acquired on that instrument.
#[derive(Debug, Clone)]
pub struct WavelengthAxis {
    values: Vec<f64>,
}

impl WavelengthAxis {
    /// Wrap a raw wavelength sequence, validating monotonicity.
    pub fn new(values: Vec<f64>) -> Result<Self, ProcessError> {
        if values.len() < 2 {
            return Err(ProcessError::InvalidConfig(format!(
                "wavelength axis needs at least 2 samples, got {}",
                values.len()
            )));
        }
        for i in 1..values.len() {
            if values[i] <= values[i - 1] {
                return Err(ProcessError::AxisNotIncreasing(i));
            }
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shortest wavelength [nm].
    pub fn min(&self) -> f64 {
        self.values[0]
    }

    /// Longest wavelength [nm].
    pub fn max(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Index range covering `[lo, hi]` nm.
    ///
    /// Each bound resolves to the first index whose wavelength is at or
    /// above it (nearest-ceiling). Used to crop raw spectrometer dumps to
    /// the band the pipeline was configured for.
    pub fn find_index(&self, lo: f64, hi: f64) -> Result<(usize, usize), ProcessError> {
        let start = self.values.iter().position(|&wl| wl >= lo);
        let end = self.values.iter().position(|&wl| wl >= hi);
        match (start, end) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(ProcessError::RangeNotCovered { lo, hi }),
        }
    }
}
