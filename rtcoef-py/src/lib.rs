use std::collections::HashMap;

use num_complex::Complex64;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rtcoef::{
    fresnel::{AcousticInterface, Convention, ShInterface},
    medium::{Fluid, ShearMedium, Solid},
    scattering::FluidSolidInterface,
    sweep::{self, AngleSweep, Regime},
};

/// Angles in degrees and one list per coefficient, with `None` at degenerate samples.
type PySweep = (Vec<f64>, HashMap<String, Vec<Option<Complex64>>>);

fn to_py_err(err: rtcoef::Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_convention(flipped: bool) -> Convention {
    if flipped {
        Convention::Flipped
    } else {
        Convention::Displacement
    }
}

fn run_sweep<R: Regime>(regime: &R, start_deg: f64, end_deg: f64, num: usize) -> PyResult<PySweep> {
    let sweep = AngleSweep::from_degrees(start_deg, end_deg, num).map_err(to_py_err)?;
    let result = sweep::run(regime, &sweep).map_err(to_py_err)?;
    let angles = result.angles.iter().map(|a| a.to_degrees()).collect();
    let series = result
        .series
        .into_iter()
        .map(|s| (s.name.to_string(), s.values))
        .collect();
    Ok((angles, series))
}

/// Sweep R and T for a fluid over a fluid.
#[pyfunction]
#[pyo3(signature = (v1, rho1, v2, rho2, start_deg = 0.0, end_deg = 89.9, num = 900, flipped = false))]
#[allow(clippy::too_many_arguments)]
fn acoustic(
    v1: f64,
    rho1: f64,
    v2: f64,
    rho2: f64,
    start_deg: f64,
    end_deg: f64,
    num: usize,
    flipped: bool,
) -> PyResult<PySweep> {
    let interface = AcousticInterface::new(
        Fluid::new(v1, rho1),
        Fluid::new(v2, rho2),
        parse_convention(flipped),
    )
    .map_err(to_py_err)?;
    run_sweep(&interface, start_deg, end_deg, num)
}

/// Sweep R and T for SH waves between two elastic media.
#[pyfunction]
#[pyo3(signature = (beta1, rho1, beta2, rho2, start_deg = 0.0, end_deg = 89.9, num = 900, flipped = false))]
#[allow(clippy::too_many_arguments)]
fn sh(
    beta1: f64,
    rho1: f64,
    beta2: f64,
    rho2: f64,
    start_deg: f64,
    end_deg: f64,
    num: usize,
    flipped: bool,
) -> PyResult<PySweep> {
    let interface = ShInterface::new(
        ShearMedium::new(beta1, rho1),
        ShearMedium::new(beta2, rho2),
        parse_convention(flipped),
    )
    .map_err(to_py_err)?;
    run_sweep(&interface, start_deg, end_deg, num)
}

/// Sweep R_P, T_P and T_S for a fluid over an elastic solid.
#[pyfunction]
#[pyo3(signature = (alpha1, rho1, alpha2, beta2, rho2, start_deg = 0.0, end_deg = 89.9, num = 900))]
#[allow(clippy::too_many_arguments)]
fn fluid_solid(
    alpha1: f64,
    rho1: f64,
    alpha2: f64,
    beta2: f64,
    rho2: f64,
    start_deg: f64,
    end_deg: f64,
    num: usize,
) -> PyResult<PySweep> {
    let interface = FluidSolidInterface::new(
        Fluid::new(alpha1, rho1),
        Solid::new(alpha2, beta2, rho2),
    )
    .map_err(to_py_err)?;
    run_sweep(&interface, start_deg, end_deg, num)
}

/// Critical angle in degrees for an incident speed `v1` and a transmitted speed `v2`.
#[pyfunction]
fn critical_angle(v1: f64, v2: f64) -> Option<f64> {
    rtcoef::snell::critical_angle(v1, v2).map(f64::to_degrees)
}

/// A Python module implemented in Rust.
#[pymodule]
fn _rtcoef_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(acoustic, m)?)?;
    m.add_function(wrap_pyfunction!(sh, m)?)?;
    m.add_function(wrap_pyfunction!(fluid_solid, m)?)?;
    m.add_function(wrap_pyfunction!(critical_angle, m)?)?;
    Ok(())
}
