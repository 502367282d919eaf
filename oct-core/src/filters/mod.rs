//! 1-D post-processing filters for measured spectra

pub mod smoothing;

pub use smoothing::{low_pass, median, moving_average};
