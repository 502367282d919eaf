//! SD-OCT Signal Processing Core
//!
//! Depth-profile reconstruction for spectral-domain optical coherence
//! tomography: resampling, background removal, apodization, and two
//! inverse-transform engines, plus absorbance spectroscopy math.

pub mod engine;
pub mod error;
pub mod filters;
pub mod interp;
pub mod scan;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use engine::{FourierDomainEngine, SineSumEngine, SpectrumToDepthProfile};
pub use error::ProcessError;
pub use spectrum::WavelengthAxis;
