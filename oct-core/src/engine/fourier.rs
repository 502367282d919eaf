//! Fourier-domain reconstruction
//!
//! Resamples to uniform optical frequency (with min-max normalization),
//! subtracts the calibrated reference, apodizes with a Kaiser window, and
//! inverse-transforms. Only the first half of the transform is kept: the
//! other half is the mirror image inherent to a real-input transform.

use std::sync::{Arc, OnceLock};

use ndarray::{Array1, ArrayView1};
use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

use super::window::kaiser_window;
use super::{SpectrumToDepthProfile, C};
use crate::error::ProcessError;
use crate::interp::CubicSpline;
use crate::spectrum::{linspace, WavelengthAxis};

/// Fourier-domain engine configuration
#[derive(Debug, Clone)]
pub struct FourierEngineConfig {
    /// Refractive index of the sample.
    pub refractive_index: f64,

    /// Maximum depth of the reconstructed profile [mm].
    pub depth_max: f64,

    /// Number of frequency samples after resampling; also the A-scan length.
    pub resolution: usize,

    /// Kaiser window shape factor.
    pub window_alpha: f64,
}

impl Default for FourierEngineConfig {
    fn default() -> Self {
        Self {
            refractive_index: 1.0,
            depth_max: 0.3,
            resolution: 2000,
            window_alpha: 1.5,
        }
    }
}

/// Inverse-DFT depth reconstruction engine.
///
/// All axes and the FFT plan are computed once at construction and never
/// mutated. The resampled reference spectrum is the only mutable state;
/// it is single-assignment and shared read-only during scan assembly.
pub struct FourierDomainEngine {
    wavelength: WavelengthAxis,
    /// Optical frequency of each wavelength sample [THz], increasing
    /// (reverse wavelength order).
    freq_source: Vec<f64>,
    /// Fixed resampling target [THz], uniformly spaced.
    freq_fixed: Vec<f64>,
    /// Depth axis [mm].
    depth: Vec<f64>,
    window: Vec<f64>,
    r2c: Arc<dyn RealToComplex<f64>>,
    /// Transform length: the windowed spectrum zero-extended to twice the
    /// sample count.
    nf: usize,
    reference: OnceLock<Array1<f64>>,
}

impl FourierDomainEngine {
    /// Create the engine from a wavelength axis and configuration.
    pub fn new(
        wavelength: WavelengthAxis,
        config: FourierEngineConfig,
    ) -> Result<Self, ProcessError> {
        if config.resolution < 2 {
            return Err(ProcessError::InvalidConfig(format!(
                "resolution must be at least 2, got {}",
                config.resolution
            )));
        }
        if config.refractive_index <= 0.0 {
            return Err(ProcessError::InvalidConfig(format!(
                "refractive index must be positive, got {}",
                config.refractive_index
            )));
        }
        if config.depth_max <= 0.0 {
            return Err(ProcessError::InvalidConfig(format!(
                "depth_max must be positive, got {} mm",
                config.depth_max
            )));
        }
        if wavelength.len() < 4 {
            return Err(ProcessError::InvalidConfig(format!(
                "cubic resampling needs at least 4 wavelength samples, got {}",
                wavelength.len()
            )));
        }

        // Strictly decreasing wavelength-to-frequency map, reversed so
        // the spline sees an increasing axis.
        let n = config.refractive_index;
        let freq_source: Vec<f64> = wavelength
            .values()
            .iter()
            .rev()
            .map(|&wl| C / (wl * 1e-9 * n) * 1e-12)
            .collect();
        let freq_fixed = linspace(
            freq_source[0],
            freq_source[freq_source.len() - 1],
            config.resolution,
        );

        let depth = linspace(0.0, config.depth_max, config.resolution);
        let window = kaiser_window(config.resolution, config.window_alpha);

        let nf = config.resolution * 2;
        let r2c = RealFftPlanner::<f64>::new().plan_fft_forward(nf);

        Ok(Self {
            wavelength,
            freq_source,
            freq_fixed,
            depth,
            window,
            r2c,
            nf,
            reference: OnceLock::new(),
        })
    }

    /// Resample a wavelength-indexed spectrum onto the fixed frequency
    /// axis and min-max normalize it to [0, 1].
    ///
    /// The normalization is what lets `remove_background` use a plain
    /// subtraction; the sine-sum engine resamples without it.
    pub fn resample(&self, spectrum: ArrayView1<f64>) -> Result<Array1<f64>, ProcessError> {
        if spectrum.len() != self.wavelength.len() {
            return Err(ProcessError::LengthMismatch {
                expected: self.wavelength.len(),
                got: spectrum.len(),
            });
        }
        let ys: Vec<f64> = spectrum.iter().rev().copied().collect();
        let spline = CubicSpline::new(self.freq_source.clone(), ys)?;
        let mut resampled = Array1::from(spline.evaluate_axis(&self.freq_fixed)?);
        min_max_normalize(&mut resampled)?;
        Ok(resampled)
    }

    /// Subtract the calibrated reference from a resampled spectrum.
    pub fn remove_background(
        &self,
        resampled: ArrayView1<f64>,
    ) -> Result<Array1<f64>, ProcessError> {
        let reference = self
            .reference
            .get()
            .ok_or(ProcessError::NotCalibrated("reference"))?;
        if resampled.len() != reference.len() {
            return Err(ProcessError::LengthMismatch {
                expected: reference.len(),
                got: resampled.len(),
            });
        }
        Ok(resampled.to_owned() - reference)
    }

    /// Multiply a background-removed spectrum by the Kaiser window.
    pub fn apply_window(&self, spectrum: ArrayView1<f64>) -> Result<Array1<f64>, ProcessError> {
        if spectrum.len() != self.window.len() {
            return Err(ProcessError::LengthMismatch {
                expected: self.window.len(),
                got: spectrum.len(),
            });
        }
        Ok(Array1::from_iter(
            spectrum.iter().zip(&self.window).map(|(&s, &w)| s * w),
        ))
    }

    /// Inverse-transform a windowed spectrum into a depth profile.
    ///
    /// For a real-valued input the IDFT magnitude equals the forward
    /// transform magnitude scaled by 1/N, so the real-to-complex forward
    /// plan computes it directly; the scale cancels in the final
    /// max-normalization.
    pub fn apply_inverse_transform(
        &self,
        spectrum: ArrayView1<f64>,
    ) -> Result<Array1<f64>, ProcessError> {
        if spectrum.len() != self.freq_fixed.len() {
            return Err(ProcessError::LengthMismatch {
                expected: self.freq_fixed.len(),
                got: spectrum.len(),
            });
        }

        let mut input = vec![0.0; self.nf];
        for (dst, &src) in input.iter_mut().zip(spectrum.iter()) {
            *dst = src;
        }
        let mut output = vec![Complex::new(0.0, 0.0); self.nf / 2 + 1];
        self.r2c
            .process(&mut input, &mut output)
            .expect("FFT processing failed");

        let mut profile = Array1::from_iter(
            output[..self.freq_fixed.len()].iter().map(|c| c.norm()),
        );
        let peak = profile.fold(0.0f64, |acc, &v| acc.max(v));
        if peak > 0.0 {
            profile.mapv_inplace(|v| v / peak);
        }
        Ok(profile)
    }

    /// Resample `reference` and cache it as the calibration baseline,
    /// replacing any previous one.
    pub fn set_reference(
        &mut self,
        reference: ArrayView1<f64>,
    ) -> Result<&Array1<f64>, ProcessError> {
        let resampled = self.resample(reference)?;
        self.reference = OnceLock::new();
        Ok(self.reference.get_or_init(move || resampled))
    }

    /// Drop the cached reference, reverting the engine to the
    /// uncalibrated state.
    pub fn clear_reference(&mut self) {
        self.reference = OnceLock::new();
    }

    /// Cached resampled reference, if calibrated.
    pub fn reference(&self) -> Option<&Array1<f64>> {
        self.reference.get()
    }

    pub fn is_calibrated(&self) -> bool {
        self.reference.get().is_some()
    }

    /// Lazy single-assignment calibration: the first caller's reference
    /// wins; a concurrent lazy set that loses the race is dropped.
    fn cached_reference(
        &self,
        reference: ArrayView1<f64>,
    ) -> Result<&Array1<f64>, ProcessError> {
        if let Some(cached) = self.reference.get() {
            return Ok(cached);
        }
        let resampled = self.resample(reference)?;
        Ok(self.reference.get_or_init(move || resampled))
    }
}

impl SpectrumToDepthProfile for FourierDomainEngine {
    fn depth_axis(&self) -> &[f64] {
        &self.depth
    }

    fn frequency_axis(&self) -> &[f64] {
        &self.freq_fixed
    }

    fn generate_ascan(
        &self,
        interference: ArrayView1<f64>,
        reference: ArrayView1<f64>,
    ) -> Result<Array1<f64>, ProcessError> {
        self.cached_reference(reference)?;
        let resampled = self.resample(interference)?;
        let removed = self.remove_background(resampled.view())?;
        let windowed = self.apply_window(removed.view())?;
        self.apply_inverse_transform(windowed.view())
    }
}

/// Min-max normalization to [0, 1] in place.
fn min_max_normalize(spectrum: &mut Array1<f64>) -> Result<(), ProcessError> {
    let min = spectrum.fold(f64::INFINITY, |acc, &v| acc.min(v));
    let max = spectrum.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
    let span = max - min;
    // Resampling a flat spectrum leaves ulp-level ripple; an exact
    // max > min check would stretch that noise to the full unit interval.
    if !(span > 4.0 * f64::EPSILON * max.abs().max(min.abs())) {
        return Err(ProcessError::DegenerateSpectrum);
    }
    spectrum.mapv_inplace(|v| (v - min) / span);
    Ok(())
}
