//! Error types shared across the processing pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("axis must be strictly increasing (violated at index {0})")]
    AxisNotIncreasing(usize),

    #[error("spectrum length {got} does not match expected length {expected}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("interpolation target {value} outside source range [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("reference spectrum peak is zero; background scaling is undefined")]
    SingularReference,

    #[error("spectrum is constant; min-max normalization is undefined")]
    DegenerateSpectrum,

    #[error("no {0} spectrum has been set")]
    NotCalibrated(&'static str),

    #[error("wavelength range [{lo}, {hi}] nm is not covered by the axis")]
    RangeNotCovered { lo: f64, hi: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
