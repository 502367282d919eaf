//! Python bindings for the depth-reconstruction engines

use numpy::{IntoPyArray, PyArray1, PyArray2, PyArray3, PyReadonlyArray1, PyReadonlyArray2, PyReadonlyArray3};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::engine::{
    FourierDomainEngine, FourierEngineConfig, SineSumConfig, SineSumEngine,
    SpectrumToDepthProfile,
};
use crate::error::ProcessError;
use crate::spectrum::{self, WavelengthAxis};

fn to_py_err(e: ProcessError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Fourier-domain engine exposed to Python
#[pyclass(name = "FourierDomainEngine")]
pub struct PyFourierDomainEngine {
    engine: FourierDomainEngine,
}

#[pymethods]
impl PyFourierDomainEngine {
    /// Create a new Fourier-domain engine
    ///
    /// Args:
    ///     wavelength: Wavelength axis [nm], strictly increasing
    ///     refractive_index: Refractive index of the sample
    ///     depth_max: Maximum depth of the profile [mm]
    ///     resolution: Frequency samples after resampling / A-scan length
    ///     window_alpha: Kaiser window shape factor
    #[new]
    #[pyo3(signature = (wavelength, refractive_index=1.0, depth_max=0.3, resolution=2000, window_alpha=1.5))]
    fn new(
        wavelength: PyReadonlyArray1<f64>,
        refractive_index: f64,
        depth_max: f64,
        resolution: usize,
        window_alpha: f64,
    ) -> PyResult<Self> {
        let axis = WavelengthAxis::new(wavelength.as_array().to_vec()).map_err(to_py_err)?;
        let config = FourierEngineConfig {
            refractive_index,
            depth_max,
            resolution,
            window_alpha,
        };
        Ok(Self {
            engine: FourierDomainEngine::new(axis, config).map_err(to_py_err)?,
        })
    }

    /// Depth axis [mm]
    fn depth_axis<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.engine.depth_axis())
    }

    /// Fixed frequency axis [THz]
    fn frequency_axis<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.engine.frequency_axis())
    }

    /// Resample and cache the reference spectrum
    fn set_reference(&mut self, reference: PyReadonlyArray1<f64>) -> PyResult<()> {
        self.engine
            .set_reference(reference.as_array())
            .map_err(to_py_err)?;
        Ok(())
    }

    /// Drop the cached reference
    fn clear_reference(&mut self) {
        self.engine.clear_reference();
    }

    fn is_calibrated(&self) -> bool {
        self.engine.is_calibrated()
    }

    /// Run the full pipeline on a single interference spectrum
    fn generate_ascan<'py>(
        &self,
        py: Python<'py>,
        interference: PyReadonlyArray1<f64>,
        reference: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let ascan = self
            .engine
            .generate_ascan(interference.as_array(), reference.as_array())
            .map_err(to_py_err)?;
        Ok(ascan.into_pyarray(py))
    }

    /// Stack A-scans for an ordered collection of interference spectra
    fn generate_bscan<'py>(
        &self,
        py: Python<'py>,
        interference: PyReadonlyArray2<f64>,
        reference: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray2<f64>> {
        let bscan = self
            .engine
            .generate_bscan(interference.as_array(), reference.as_array())
            .map_err(to_py_err)?;
        Ok(bscan.into_pyarray(py))
    }

    /// Build a volume from a 2-D grid of interference spectra
    fn generate_cscan<'py>(
        &self,
        py: Python<'py>,
        interference: PyReadonlyArray3<f64>,
        reference: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray3<f64>> {
        let cscan = self
            .engine
            .generate_cscan(interference.as_array(), reference.as_array())
            .map_err(to_py_err)?;
        Ok(cscan.into_pyarray(py))
    }
}

/// Sine-summation engine exposed to Python
#[pyclass(name = "SineSumEngine")]
pub struct PySineSumEngine {
    engine: SineSumEngine,
}

#[pymethods]
impl PySineSumEngine {
    /// Create a new sine-summation engine
    ///
    /// Args:
    ///     wavelength: Wavelength axis [nm], strictly increasing
    ///     refractive_index: Refractive index of the sample
    ///     depth_max: Maximum depth of the profile [mm]
    ///     resolution: Depth samples / A-scan length
    ///     signal_length: Frequency-axis density factor
    #[new]
    #[pyo3(signature = (wavelength, refractive_index=1.0, depth_max=0.2, resolution=200, signal_length=3.0))]
    fn new(
        wavelength: PyReadonlyArray1<f64>,
        refractive_index: f64,
        depth_max: f64,
        resolution: usize,
        signal_length: f64,
    ) -> PyResult<Self> {
        let axis = WavelengthAxis::new(wavelength.as_array().to_vec()).map_err(to_py_err)?;
        let config = SineSumConfig {
            refractive_index,
            depth_max,
            resolution,
            signal_length,
        };
        Ok(Self {
            engine: SineSumEngine::new(axis, config).map_err(to_py_err)?,
        })
    }

    /// Depth axis [mm]
    fn depth_axis<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.engine.depth_axis())
    }

    /// Fixed frequency axis [THz]
    fn frequency_axis<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.engine.frequency_axis())
    }

    /// Resample and cache the reference spectrum
    fn set_reference(&mut self, reference: PyReadonlyArray1<f64>) -> PyResult<()> {
        self.engine
            .set_reference(reference.as_array())
            .map_err(to_py_err)?;
        Ok(())
    }

    /// Drop the cached reference
    fn clear_reference(&mut self) {
        self.engine.clear_reference();
    }

    fn is_calibrated(&self) -> bool {
        self.engine.is_calibrated()
    }

    /// Cache the incidence spectrum for absorbance calculations
    fn set_incidence(&mut self, incidence: PyReadonlyArray1<f64>) {
        self.engine.set_incidence(incidence.as_array());
    }

    /// Drop the cached incidence spectrum
    fn clear_incidence(&mut self) {
        self.engine.clear_incidence();
    }

    /// Run the full pipeline on a single interference spectrum
    fn generate_ascan<'py>(
        &self,
        py: Python<'py>,
        interference: PyReadonlyArray1<f64>,
        reference: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let ascan = self
            .engine
            .generate_ascan(interference.as_array(), reference.as_array())
            .map_err(to_py_err)?;
        Ok(ascan.into_pyarray(py))
    }

    /// Stack A-scans for an ordered collection of interference spectra
    fn generate_bscan<'py>(
        &self,
        py: Python<'py>,
        interference: PyReadonlyArray2<f64>,
        reference: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray2<f64>> {
        let bscan = self
            .engine
            .generate_bscan(interference.as_array(), reference.as_array())
            .map_err(to_py_err)?;
        Ok(bscan.into_pyarray(py))
    }

    /// Build a volume from a 2-D grid of interference spectra
    fn generate_cscan<'py>(
        &self,
        py: Python<'py>,
        interference: PyReadonlyArray3<f64>,
        reference: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray3<f64>> {
        let cscan = self
            .engine
            .generate_cscan(interference.as_array(), reference.as_array())
            .map_err(to_py_err)?;
        Ok(cscan.into_pyarray(py))
    }

    /// Absorbance against the cached incidence spectrum
    fn calculate_absorbance<'py>(
        &self,
        py: Python<'py>,
        reflection: PyReadonlyArray1<f64>,
        incidence: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        let absorbance = self
            .engine
            .calculate_absorbance(reflection.as_array(), incidence.as_array())
            .map_err(to_py_err)?;
        Ok(absorbance.into_pyarray(py))
    }

    /// Absorbance distribution map against the cached incidence spectrum
    fn calculate_absorbance_2d<'py>(
        &self,
        py: Python<'py>,
        reflection: PyReadonlyArray2<f64>,
    ) -> PyResult<&'py PyArray2<f64>> {
        let map = self
            .engine
            .calculate_absorbance_2d(reflection.as_array())
            .map_err(to_py_err)?;
        Ok(map.into_pyarray(py))
    }
}

/// Absorbance spectrum: -log10(reflection / incidence)
#[pyfunction]
pub fn calculate_absorbance<'py>(
    py: Python<'py>,
    reflection: PyReadonlyArray1<f64>,
    incidence: PyReadonlyArray1<f64>,
) -> PyResult<&'py PyArray1<f64>> {
    let absorbance = spectrum::calculate_absorbance(reflection.as_array(), incidence.as_array())
        .map_err(to_py_err)?;
    Ok(absorbance.into_pyarray(py))
}

/// Reflectance spectrum: reflection / incidence
#[pyfunction]
pub fn calculate_reflectance<'py>(
    py: Python<'py>,
    reflection: PyReadonlyArray1<f64>,
    incidence: PyReadonlyArray1<f64>,
) -> PyResult<&'py PyArray1<f64>> {
    let reflectance = spectrum::calculate_reflectance(reflection.as_array(), incidence.as_array())
        .map_err(to_py_err)?;
    Ok(reflectance.into_pyarray(py))
}
