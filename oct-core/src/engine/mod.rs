//! Depth-reconstruction engines
//!
//! Two strategies map a wavelength-indexed interference spectrum to a
//! depth-indexed intensity profile: a Fourier-domain engine (inverse DFT
//! of the apodized spectrum) and a direct sine-summation engine for
//! arbitrary, non-power-of-two frequency/depth relationships.

pub mod fourier;
pub mod sinesum;
pub mod window;

pub use fourier::{FourierDomainEngine, FourierEngineConfig};
pub use sinesum::{SineSumConfig, SineSumEngine};

use ndarray::parallel::prelude::*;
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, ArrayView3, Axis};

use crate::error::ProcessError;

/// Speed of light in vacuum [m/s].
pub(crate) const C: f64 = 2.99792458e8;

/// Common interface of the two depth-reconstruction strategies.
///
/// B- and C-scan assembly are embarrassingly parallel maps of
/// `generate_ascan` over the outer spatial axes; rows land in disjoint
/// output slots, so completion order does not matter. The cached
/// reference is the only shared state and is single-assignment.
pub trait SpectrumToDepthProfile: Sync {
    /// Depth axis [mm]; its length is the A-scan length.
    fn depth_axis(&self) -> &[f64];

    /// Fixed resampling target axis [THz].
    fn frequency_axis(&self) -> &[f64];

    /// Full single-spectrum pipeline.
    ///
    /// Sets the cached reference from `reference` on first use (single
    /// assignment); subsequent calls reuse the cached spectrum until it
    /// is explicitly cleared.
    fn generate_ascan(
        &self,
        interference: ArrayView1<f64>,
        reference: ArrayView1<f64>,
    ) -> Result<Array1<f64>, ProcessError>;

    /// Stack A-scans over an ordered collection of interference spectra
    /// (one per row) sharing a single reference.
    fn generate_bscan(
        &self,
        interference: ArrayView2<'_, f64>,
        reference: ArrayView1<f64>,
    ) -> Result<Array2<f64>, ProcessError> {
        let rows: Vec<Array1<f64>> = interference
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|row| self.generate_ascan(row, reference))
            .collect::<Result<_, _>>()?;

        let mut bscan = Array2::zeros((rows.len(), self.depth_axis().len()));
        for (i, row) in rows.iter().enumerate() {
            bscan.row_mut(i).assign(row);
        }
        Ok(bscan)
    }

    /// Build a volume from a 2-D grid of interference spectra.
    fn generate_cscan(
        &self,
        interference: ArrayView3<'_, f64>,
        reference: ArrayView1<f64>,
    ) -> Result<Array3<f64>, ProcessError> {
        let (nx, ny, _) = interference.dim();
        let mut cscan = Array3::zeros((nx, ny, self.depth_axis().len()));
        for (i, plane) in interference.axis_iter(Axis(0)).enumerate() {
            let bscan = self.generate_bscan(plane, reference)?;
            cscan.index_axis_mut(Axis(0), i).assign(&bscan);
        }
        Ok(cscan)
    }
}
