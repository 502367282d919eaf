//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod engine_bindings;

/// Python module definition
#[pymodule]
fn oct_workbench(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<engine_bindings::PyFourierDomainEngine>()?;
    m.add_class::<engine_bindings::PySineSumEngine>()?;

    m.add_function(wrap_pyfunction!(engine_bindings::calculate_absorbance, m)?)?;
    m.add_function(wrap_pyfunction!(engine_bindings::calculate_reflectance, m)?)?;

    Ok(())
}
