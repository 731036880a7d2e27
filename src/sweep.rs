//! Angle sweeps over any interface regime.
//!
//! A sweep evaluates one regime at evenly spaced incidence angles and gathers
//! one ordered series per coefficient. The regimes differ only in how they
//! evaluate a single angle, so they plug into the same driver through the
//! [`Regime`] trait.

use std::f64::consts::FRAC_PI_2;
use std::time::Instant;

use indicatif::ProgressBar;
use log::{debug, info, warn};
use nalgebra::Complex;
use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::powers::EnergyFlux;
use crate::result::{Series, SweepResult};


/// Informational critical angle for one transmitted mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalAngle {
    pub mode: &'static str,
    pub radians: f64,
}

impl CriticalAngle {
    pub fn new(mode: &'static str, radians: f64) -> Self {
        Self { mode, radians }
    }

    pub fn degrees(&self) -> f64 {
        self.radians.to_degrees()
    }
}

/// A coefficient evaluator for one kind of interface.
///
/// Implementors are pure functions of the angle and their media, so a sweep
/// may evaluate them concurrently.
pub trait Regime: Sync {
    fn name(&self) -> &'static str;

    /// Names of the coefficients returned by [`Regime::evaluate`], in order.
    fn coefficient_names(&self) -> &'static [&'static str];

    fn critical_angles(&self) -> Vec<CriticalAngle>;

    /// Coefficients at one incidence angle, in the order of `coefficient_names`.
    fn evaluate(&self, angle: Complex<f64>) -> Result<Vec<Complex<f64>>>;

    /// Power flux partition for coefficients returned by `evaluate` at `angle`.
    fn energy(&self, angle: Complex<f64>, coefficients: &[Complex<f64>]) -> EnergyFlux;

    /// Checks the media before any angle is evaluated.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Evenly spaced incidence angles in radians, both endpoints included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleSweep {
    pub start: f64,
    pub end: f64,
    pub num_samples: usize,
}

impl AngleSweep {
    pub fn new(start: f64, end: f64, num_samples: usize) -> Result<Self> {
        let sweep = Self {
            start,
            end,
            num_samples,
        };
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn from_degrees(start_deg: f64, end_deg: f64, num_samples: usize) -> Result<Self> {
        Self::new(start_deg.to_radians(), end_deg.to_radians(), num_samples)
    }

    /// Rejects grids reaching grazing incidence or otherwise unusable.
    pub fn validate(&self) -> Result<()> {
        if !self.start.is_finite() {
            return Err(Error::InvalidParameter {
                name: "start",
                value: self.start,
            });
        }
        if !self.end.is_finite() {
            return Err(Error::InvalidParameter {
                name: "end",
                value: self.end,
            });
        }
        if self.end >= FRAC_PI_2 {
            return Err(Error::DomainBoundaryMisuse { end: self.end });
        }
        if self.start < 0.0 || self.start > self.end {
            return Err(Error::InvalidParameter {
                name: "start",
                value: self.start,
            });
        }
        if self.num_samples == 0 {
            return Err(Error::InvalidParameter {
                name: "num_samples",
                value: 0.0,
            });
        }
        Ok(())
    }

    pub fn angles(&self) -> Array1<f64> {
        if self.num_samples == 1 {
            Array1::from(vec![self.start])
        } else {
            Array1::linspace(self.start, self.end, self.num_samples)
        }
    }

    /// Angles promoted to the complex domain with zero imaginary part.
    pub fn complex_angles(&self) -> Vec<Complex<f64>> {
        self.angles().iter().map(|a| Complex::new(*a, 0.0)).collect()
    }
}

/// Sweeps `regime` over `sweep`.
///
/// Parameters are validated before any angle is evaluated. A sample whose
/// evaluation is numerically degenerate becomes a hole in every series.
pub fn run<R: Regime>(regime: &R, sweep: &AngleSweep) -> Result<SweepResult> {
    run_with_progress(regime, sweep, &ProgressBar::hidden())
}

/// Same as [`run`], ticking `progress` once per evaluated angle.
pub fn run_with_progress<R: Regime>(
    regime: &R,
    sweep: &AngleSweep,
    progress: &ProgressBar,
) -> Result<SweepResult> {
    regime.validate()?;
    sweep.validate()?;

    let start = Instant::now();
    let critical_angles = regime.critical_angles();
    for crit in &critical_angles {
        info!(
            "{} critical angle ({}): {:.4} deg",
            regime.name(),
            crit.mode,
            crit.degrees()
        );
    }

    let angles = sweep.angles().to_vec();
    progress.set_length(angles.len() as u64);

    // each angle is independent; collect keeps the grid order
    let samples: Vec<Result<Vec<Complex<f64>>>> = angles
        .par_iter()
        .map(|angle| {
            let value = regime.evaluate(Complex::new(*angle, 0.0));
            progress.inc(1);
            value
        })
        .collect();
    progress.finish_and_clear();

    let names = regime.coefficient_names();
    let mut series: Vec<Series> = names.iter().map(|name| Series::new(*name)).collect();
    let mut energy = Vec::with_capacity(angles.len());

    for (angle, sample) in angles.iter().zip(samples) {
        match sample {
            Ok(values) => {
                energy.push(Some(regime.energy(Complex::new(*angle, 0.0), &values)));
                for (s, v) in series.iter_mut().zip(values) {
                    s.values.push(Some(v));
                }
            }
            Err(err) if err.is_sample_local() => {
                debug!("hole at {:.6} rad: {}", angle, err);
                energy.push(None);
                for s in series.iter_mut() {
                    s.values.push(None);
                }
            }
            Err(err) => return Err(err),
        }
    }

    let result = SweepResult {
        regime: regime.name(),
        angles,
        series,
        critical_angles,
        energy,
    };

    let holes = result.holes().len();
    if holes > 0 {
        warn!(
            "{} of {} samples are numerically degenerate",
            holes,
            result.angles.len()
        );
    }
    debug!(
        "swept {} angles in {:.2?}",
        result.angles.len(),
        start.elapsed()
    );

    Ok(result)
}
