//! Direct sine-summation reconstruction
//!
//! Evaluates the inverse transform as an explicit weighted sum of sine
//! basis functions over the depth-derived time axis. Costlier per
//! spectrum than an FFT, but the frequency-axis density (`signal_length`)
//! and the depth resolution are free to take any value, with no
//! power-of-two coupling. The basis matrix is precomputed once so each
//! transform stays linear in `samples x depth_points`.

use std::sync::OnceLock;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use super::{SpectrumToDepthProfile, C};
use crate::error::ProcessError;
use crate::interp::CubicSpline;
use crate::spectrum::{self, linspace, WavelengthAxis};

/// Sine-sum engine configuration
#[derive(Debug, Clone)]
pub struct SineSumConfig {
    /// Refractive index of the sample. Enters the depth-to-time map, not
    /// the frequency axis.
    pub refractive_index: f64,

    /// Maximum depth of the reconstructed profile [mm].
    pub depth_max: f64,

    /// Number of depth samples; also the A-scan length.
    pub resolution: usize,

    /// Frequency-axis density: the fixed axis has
    /// `wavelength_samples * signal_length` points. The reconstruction is
    /// periodic; raising this lengthens the period at linear cost.
    pub signal_length: f64,
}

impl Default for SineSumConfig {
    fn default() -> Self {
        Self {
            refractive_index: 1.0,
            depth_max: 0.2,
            resolution: 200,
            signal_length: 3.0,
        }
    }
}

/// Direct sine-summation depth reconstruction engine.
pub struct SineSumEngine {
    wavelength: WavelengthAxis,
    /// Optical frequency of each wavelength sample [THz], increasing.
    freq_source: Vec<f64>,
    /// Fixed resampling target [THz], uniformly spaced.
    freq_fixed: Vec<f64>,
    /// Depth axis [mm].
    depth: Vec<f64>,
    /// Sine basis, one row per fixed-frequency sample, evaluated over the
    /// depth-derived time axis.
    basis: Array2<f64>,
    reference: OnceLock<Array1<f64>>,
    incidence: OnceLock<Array1<f64>>,
}

impl SineSumEngine {
    /// Create the engine from a wavelength axis and configuration.
    pub fn new(wavelength: WavelengthAxis, config: SineSumConfig) -> Result<Self, ProcessError> {
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
        if config.signal_length <= 0.0 {
            return Err(ProcessError::InvalidConfig(format!(
                "signal_length must be positive, got {}",
                config.signal_length
            )));
        }
        if wavelength.len() < 4 {
            return Err(ProcessError::InvalidConfig(format!(
                "cubic resampling needs at least 4 wavelength samples, got {}",
                wavelength.len()
            )));
        }

        let freq_source: Vec<f64> = wavelength
            .values()
            .iter()
            .rev()
            .map(|&wl| C / (wl * 1e-9) * 1e-12)
            .collect();
        let samples = (wavelength.len() as f64 * config.signal_length) as usize;
        let freq_fixed = linspace(
            freq_source[0],
            freq_source[freq_source.len() - 1],
            samples,
        );

        let depth = linspace(0.0, config.depth_max, config.resolution);

        // Round-trip time of flight to each depth sample [s].
        let time: Vec<f64> = depth
            .iter()
            .map(|&d| 2.0 * config.refractive_index * d * 1e-3 / C)
            .collect();
        let mut basis = Array2::zeros((freq_fixed.len(), depth.len()));
        for (i, &f) in freq_fixed.iter().enumerate() {
            for (j, &t) in time.iter().enumerate() {
                basis[[i, j]] = (2.0 * std::f64::consts::PI * t * f * 1e12).sin();
            }
        }

        Ok(Self {
            wavelength,
            freq_source,
            freq_fixed,
            depth,
            basis,
            reference: OnceLock::new(),
            incidence: OnceLock::new(),
        })
    }

    /// Resample a wavelength-indexed spectrum onto the fixed frequency
    /// axis. Unlike the Fourier-domain engine, no normalization is
    /// applied here; `remove_background` energy-matches instead.
    pub fn resample(&self, spectrum: ArrayView1<f64>) -> Result<Array1<f64>, ProcessError> {
        if spectrum.len() != self.wavelength.len() {
            return Err(ProcessError::LengthMismatch {
                expected: self.wavelength.len(),
                got: spectrum.len(),
            });
        }
        let ys: Vec<f64> = spectrum.iter().rev().copied().collect();
        let spline = CubicSpline::new(self.freq_source.clone(), ys)?;
        Ok(Array1::from(spline.evaluate_axis(&self.freq_fixed)?))
    }

    /// Subtract the calibrated reference, scaled so its peak matches the
    /// spectrum's peak.
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

        let ref_peak = reference.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        if ref_peak == 0.0 {
            return Err(ProcessError::SingularReference);
        }
        let scale = resampled.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v)) / ref_peak;
        Ok(Array1::from_iter(
            resampled
                .iter()
                .zip(reference.iter())
                .map(|(&s, &r)| s - r * scale),
        ))
    }

    /// Inverse-transform a background-removed spectrum into a depth
    /// profile: weighted sum of the precomputed sine basis, normalized by
    /// the peak magnitude, absolute value.
    ///
    /// An all-zero spectrum yields an all-zero profile (the documented
    /// degenerate case) instead of dividing by zero.
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

        let result = spectrum.dot(&self.basis);
        let peak = result.fold(0.0f64, |acc, &v| acc.max(v.abs()));
        if peak == 0.0 {
            return Ok(result);
        }
        Ok(result.mapv(|v| (v / peak).abs()))
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

    pub fn is_calibrated(&self) -> bool {
        self.reference.get().is_some()
    }

    /// Cache the incidence spectrum for later absorbance calculations,
    /// replacing any previous one. Kept independent of the OCT reference.
    pub fn set_incidence(&mut self, incidence: ArrayView1<f64>) {
        self.incidence = OnceLock::new();
        let _ = self.incidence.set(incidence.to_owned());
    }

    pub fn clear_incidence(&mut self) {
        self.incidence = OnceLock::new();
    }

    /// Absorbance against the cached incidence spectrum; sets it from
    /// `incidence` on first use (single assignment).
    pub fn calculate_absorbance(
        &self,
        reflection: ArrayView1<f64>,
        incidence: ArrayView1<f64>,
    ) -> Result<Array1<f64>, ProcessError> {
        let cached = match self.incidence.get() {
            Some(cached) => cached,
            None => self.incidence.get_or_init(|| incidence.to_owned()),
        };
        spectrum::calculate_absorbance(reflection, cached.view())
    }

    /// Absorbance distribution map over an ordered collection of
    /// reflection spectra sharing the cached incidence spectrum.
    pub fn calculate_absorbance_2d(
        &self,
        reflection: ArrayView2<f64>,
    ) -> Result<Array2<f64>, ProcessError> {
        let incidence = self
            .incidence
            .get()
            .ok_or(ProcessError::NotCalibrated("incidence"))?;
        spectrum::calculate_absorbance_2d(reflection, incidence.view())
    }
}

impl SpectrumToDepthProfile for SineSumEngine {
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
        if self.reference.get().is_none() {
            let resampled = self.resample(reference)?;
            // First writer wins; a concurrent lazy set that loses the
            // race is dropped.
            let _ = self.reference.set(resampled);
        }
        let resampled = self.resample(interference)?;
        let removed = self.remove_background(resampled.view())?;
        self.apply_inverse_transform(removed.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_axis(len: usize) -> WavelengthAxis {
        let values: Vec<f64> = (0..len)
            .map(|i| 775.0 + 115.0 * i as f64 / (len - 1) as f64)
            .collect();
        WavelengthAxis::new(values).unwrap()
    }

    fn source_spectrum(len: usize) -> Array1<f64> {
        (0..len)
            .map(|i| {
                let x = (i as f64 - len as f64 / 2.0) / (len as f64 / 5.0);
                (-x * x).exp() + 0.05
            })
            .collect()
    }

    fn interference_spectrum(len: usize) -> Array1<f64> {
        source_spectrum(len)
            .iter()
            .enumerate()
            .map(|(i, &r)| r * (1.0 + 0.4 * (0.6 * i as f64).cos()))
            .collect()
    }

    #[test]
    fn test_axes_dimensions() {
        let engine = SineSumEngine::new(
            test_axis(100),
            SineSumConfig {
                refractive_index: 1.5,
                depth_max: 0.2,
                resolution: 250,
                signal_length: 3.0,
            },
        )
        .unwrap();

        assert_eq!(engine.depth_axis().len(), 250);
        assert!((engine.depth_axis()[249] - 0.2).abs() < 1e-12);
        assert_eq!(engine.frequency_axis().len(), 300);
        for i in 1..300 {
            assert!(engine.frequency_axis()[i] > engine.frequency_axis()[i - 1]);
        }
    }

    #[test]
    fn test_resample_identity_on_frequency_uniform_axis() {
        // Wavelengths chosen so the source samples are already uniform in
        // frequency; with signal_length 1 the fixed axis coincides with
        // the source knots and resampling only reorders to increasing
        // frequency.
        let n = 64;
        let freqs: Vec<f64> = (0..n).map(|i| 330.0 + 0.5 * i as f64).collect();
        let wavelengths: Vec<f64> = freqs
            .iter()
            .rev()
            .map(|&f| C / (f * 1e12) * 1e9)
            .collect();
        let engine = SineSumEngine::new(
            WavelengthAxis::new(wavelengths).unwrap(),
            SineSumConfig {
                signal_length: 1.0,
                ..Default::default()
            },
        )
        .unwrap();

        let spectrum = source_spectrum(n);
        let resampled = engine.resample(spectrum.view()).unwrap();
        assert_eq!(resampled.len(), n);
        for i in 0..n {
            assert!(
                (resampled[i] - spectrum[n - 1 - i]).abs() < 1e-6,
                "sample {} changed under identity resampling",
                i
            );
        }
    }

    #[test]
    fn test_background_removal_energy_matching() {
        let mut engine = SineSumEngine::new(test_axis(64), SineSumConfig::default()).unwrap();
        let reference = source_spectrum(64);
        engine.set_reference(reference.view()).unwrap();

        // A scaled copy of the reference is removed completely: the
        // peak-ratio rescaling absorbs the amplitude difference.
        let scaled = engine
            .resample(reference.view())
            .unwrap()
            .mapv(|v| v * 2.5);
        let removed = engine.remove_background(scaled.view()).unwrap();
        for &v in removed.iter() {
            assert!(v.abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_reference_peak_is_singular() {
        let mut engine = SineSumEngine::new(test_axis(64), SineSumConfig::default()).unwrap();
        let zeros = Array1::zeros(64);
        engine.set_reference(zeros.view()).unwrap();

        let spectrum = engine.resample(source_spectrum(64).view()).unwrap();
        assert!(matches!(
            engine.remove_background(spectrum.view()),
            Err(ProcessError::SingularReference)
        ));
    }

    #[test]
    fn test_ascan_bounds_and_peak() {
        let engine = SineSumEngine::new(
            test_axis(100),
            SineSumConfig {
                refractive_index: 1.4,
                depth_max: 0.2,
                resolution: 200,
                signal_length: 3.0,
            },
        )
        .unwrap();

        let ascan = engine
            .generate_ascan(
                interference_spectrum(100).view(),
                source_spectrum(100).view(),
            )
            .unwrap();

        assert_eq!(ascan.len(), 200);
        assert!(ascan.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!(ascan.iter().any(|&v| v == 1.0), "peak must normalize to 1");
    }

    #[test]
    fn test_zero_signal_degenerate_profile() {
        let engine = SineSumEngine::new(test_axis(64), SineSumConfig::default()).unwrap();
        let zeros = Array1::zeros(engine.frequency_axis().len());
        let profile = engine.apply_inverse_transform(zeros.view()).unwrap();
        assert!(profile.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_incidence_cache_lazy_and_persistent() {
        let engine = SineSumEngine::new(test_axis(64), SineSumConfig::default()).unwrap();
        let reflection = source_spectrum(64);
        let incidence = source_spectrum(64).mapv(|v| v * 2.0);

        let first = engine
            .calculate_absorbance(reflection.view(), incidence.view())
            .unwrap();

        // A different incidence later must be ignored until cleared.
        let other = source_spectrum(64).mapv(|v| v * 9.0);
        let second = engine
            .calculate_absorbance(reflection.view(), other.view())
            .unwrap();
        for (a, b) in first.iter().zip(second.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_absorbance_2d_requires_incidence() {
        let engine = SineSumEngine::new(test_axis(64), SineSumConfig::default()).unwrap();
        let reflection = ndarray::Array2::from_elem((2, 64), 1.0);
        assert!(matches!(
            engine.calculate_absorbance_2d(reflection.view()),
            Err(ProcessError::NotCalibrated("incidence"))
        ));
    }
}
