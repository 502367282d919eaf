//! Volume post-processing

pub mod slicer;

pub use slicer::{analyze_cscan, SliceMode, SliceOutcome};
