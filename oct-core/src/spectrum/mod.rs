//! Spectrum containers and spectroscopy math

pub mod absorbance;
pub mod axes;

pub use absorbance::{calculate_absorbance, calculate_absorbance_2d, calculate_reflectance};
pub use axes::{linspace, WavelengthAxis};
