use nalgebra::Complex;
use serde::Serialize;

use crate::powers::EnergyFlux;
use crate::sweep::CriticalAngle;


/// One named coefficient across a sweep. `None` marks a degenerate sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: &'static str,
    pub values: Vec<Option<Complex<f64>>>,
}

impl Series {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            values: Vec::new(),
        }
    }

    fn map(&self, f: impl Fn(&Complex<f64>) -> f64) -> Vec<Option<f64>> {
        self.values.iter().map(|v| v.as_ref().map(&f)).collect()
    }

    pub fn real(&self) -> Vec<Option<f64>> {
        self.map(|v| v.re)
    }

    pub fn imag(&self) -> Vec<Option<f64>> {
        self.map(|v| v.im)
    }

    pub fn moduli(&self) -> Vec<Option<f64>> {
        self.map(|v| v.norm())
    }
}

/// Everything a sweep produces, in grid order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResult {
    pub regime: &'static str,
    /// Incidence angles in radians.
    pub angles: Vec<f64>,
    pub series: Vec<Series>,
    pub critical_angles: Vec<CriticalAngle>,
    pub energy: Vec<Option<EnergyFlux>>,
}

impl SweepResult {
    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    /// `(angle, coefficient)` pairs for one series, the shape a plotter consumes.
    pub fn points(&self, name: &str) -> Option<Vec<(f64, Option<Complex<f64>>)>> {
        self.series(name).map(|s| {
            self.angles
                .iter()
                .copied()
                .zip(s.values.iter().copied())
                .collect()
        })
    }

    /// Indices of degenerate samples.
    pub fn holes(&self) -> Vec<usize> {
        self.energy
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Largest absolute flux residual over the defined samples.
    pub fn max_energy_residual(&self) -> Option<f64> {
        self.energy
            .iter()
            .flatten()
            .map(|e| e.missing().abs())
            .reduce(f64::max)
    }

    /// Flux partition averaged over the defined samples.
    pub fn mean_energy(&self) -> Option<EnergyFlux> {
        let mut defined = self.energy.iter().flatten().cloned();
        let mut acc = defined.next()?;
        let mut count = 1.0;
        for e in defined {
            acc += e;
            count += 1.0;
        }
        acc /= count;
        Some(acc)
    }

    pub fn print(&self) {
        println!("Regime: {}", self.regime);
        for crit in &self.critical_angles {
            println!("  Critical angle ({}): {:.4} deg", crit.mode, crit.degrees());
        }
        println!(
            "  Samples: {} ({} degenerate)",
            self.angles.len(),
            self.holes().len()
        );
        if let Some(mean) = self.mean_energy() {
            print!("{}", mean);
        }
    }
}
