//! Interpolation primitives for spectral resampling

pub mod spline;

pub use spline::CubicSpline;
