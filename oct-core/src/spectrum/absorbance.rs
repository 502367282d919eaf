//! Absorbance and reflectance spectroscopy
//!
//! Elementwise log-ratio / ratio between a measured spectrum and the
//! incidence baseline. A zero incidence (or zero reflection) sample turns
//! the ratio infinite; every infinite result is replaced by NaN
//! ("undefined") so downstream statistics never mistake it for a finite
//! extreme.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::ProcessError;

fn undefined_if_infinite(v: f64) -> f64 {
    if v.is_infinite() {
        f64::NAN
    } else {
        v
    }
}

/// Absorbance spectrum: `-log10(reflection / incidence)` per element.
///
/// # Arguments
/// * `reflection` - Spectrum of light returned by the sample
/// * `incidence` - Baseline "full transmission" spectrum
pub fn calculate_absorbance(
    reflection: ArrayView1<f64>,
    incidence: ArrayView1<f64>,
) -> Result<Array1<f64>, ProcessError> {
    if reflection.len() != incidence.len() {
        return Err(ProcessError::LengthMismatch {
            expected: incidence.len(),
            got: reflection.len(),
        });
    }
    Ok(Array1::from_iter(
        reflection
            .iter()
            .zip(incidence.iter())
            .map(|(&r, &i)| undefined_if_infinite(-(r / i).log10())),
    ))
}

/// Reflectance spectrum: plain `reflection / incidence` per element, with
/// the same infinity-to-undefined substitution as absorbance.
pub fn calculate_reflectance(
    reflection: ArrayView1<f64>,
    incidence: ArrayView1<f64>,
) -> Result<Array1<f64>, ProcessError> {
    if reflection.len() != incidence.len() {
        return Err(ProcessError::LengthMismatch {
            expected: incidence.len(),
            got: reflection.len(),
        });
    }
    Ok(Array1::from_iter(
        reflection
            .iter()
            .zip(incidence.iter())
            .map(|(&r, &i)| undefined_if_infinite(r / i)),
    ))
}

/// Absorbance distribution map: one row of absorbance per row of
/// `reflection`, all sharing one incidence spectrum.
pub fn calculate_absorbance_2d(
    reflection: ArrayView2<f64>,
    incidence: ArrayView1<f64>,
) -> Result<Array2<f64>, ProcessError> {
    let mut map = Array2::zeros((reflection.nrows(), incidence.len()));
    for (i, row) in reflection.axis_iter(Axis(0)).enumerate() {
        let absorbance = calculate_absorbance(row, incidence)?;
        map.row_mut(i).assign(&absorbance);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_absorbance_zero_incidence_is_undefined() {
        let reflection = arr1(&[1.0, 1.0, 1.0]);
        let incidence = arr1(&[1.0, 0.0, 1.0]);
        let absorbance = calculate_absorbance(reflection.view(), incidence.view()).unwrap();

        assert_eq!(absorbance[0], 0.0);
        assert!(absorbance[1].is_nan(), "infinity must become undefined");
        assert_eq!(absorbance[2], 0.0);
    }

    #[test]
    fn test_absorbance_decade_ratio() {
        // A factor-10 attenuation is one absorbance unit.
        let reflection = arr1(&[0.1, 0.01, 1.0, 10.0]);
        let incidence = arr1(&[1.0, 1.0, 1.0, 1.0]);
        let absorbance = calculate_absorbance(reflection.view(), incidence.view()).unwrap();

        assert!((absorbance[0] - 1.0).abs() < 1e-12);
        assert!((absorbance[1] - 2.0).abs() < 1e-12);
        assert!(absorbance[2].abs() < 1e-12);
        assert!((absorbance[3] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reflectance_infinity_handling() {
        let reflection = arr1(&[0.5, 2.0, 1.0]);
        let incidence = arr1(&[1.0, 0.0, 4.0]);
        let reflectance = calculate_reflectance(reflection.view(), incidence.view()).unwrap();

        assert!((reflectance[0] - 0.5).abs() < 1e-12);
        assert!(reflectance[1].is_nan());
        assert!((reflectance[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_absorbance_length_mismatch() {
        let reflection = arr1(&[1.0, 1.0]);
        let incidence = arr1(&[1.0, 1.0, 1.0]);
        assert!(matches!(
            calculate_absorbance(reflection.view(), incidence.view()),
            Err(ProcessError::LengthMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn test_absorbance_2d_rows_match_1d() {
        let reflection = arr2(&[[0.1, 1.0, 0.5], [1.0, 0.01, 0.25]]);
        let incidence = arr1(&[1.0, 1.0, 1.0]);
        let map = calculate_absorbance_2d(reflection.view(), incidence.view()).unwrap();

        assert_eq!(map.dim(), (2, 3));
        for (i, row) in reflection.axis_iter(Axis(0)).enumerate() {
            let expected = calculate_absorbance(row, incidence.view()).unwrap();
            for (a, b) in map.row(i).iter().zip(expected.iter()) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }
}
