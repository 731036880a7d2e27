//! Energy partition at the interface.
//!
//! The coefficients are amplitude ratios, so `|R|^2 + |T|^2` is not conserved
//! on its own. What is conserved for lossless media is the power flux normal
//! to the interface, where each transmitted wave carries an extra
//! impedance and obliquity factor. Evanescent legs have a purely imaginary
//! cosine and therefore carry no flux.
//!
//! This gives a derived check on any computed set of coefficients:
//! - Incident flux is normalised to one
//! - Reflected flux is `|R|^2` (same medium, same angle)
//! - Each transmitted leg scales by `rho2 v2 Re(cos) / (rho1 v1 cos_i)`
//! - The residual should vanish to rounding error

use std::{fmt, ops::*};

use serde::Serialize;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_partition() {
        let flux = EnergyFlux::new(0.25, vec![0.5, 0.25]);
        assert_eq!(flux.transmitted_total(), 0.75);
        assert_eq!(flux.missing(), 0.0);
    }

    #[test]
    fn accumulate_and_average() {
        let mut acc = EnergyFlux::new(0.5, vec![0.5]);
        acc += EnergyFlux::new(1.0, vec![0.0]);
        assert_eq!(acc.incident, 2.0);
        acc /= 2.0;
        assert_eq!(acc.incident, 1.0);
        assert_eq!(acc.reflected, 0.75);
        assert_eq!(acc.transmitted, vec![0.25]);
    }
}

/// Normal power flux carried by each wave, normalised by the incident flux.
///
/// **Context**: Coefficients beyond the critical angle are complex and the
/// transmitted amplitude can exceed one, so no bound on the coefficients
/// themselves indicates a correct solution. Flux conservation does.
///
/// **How it Works**: Stores the reflected flux and one entry per transmitted
/// leg. The `missing()` method gives the unaccounted flux, which should be
/// zero for lossless media at every real incidence angle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyFlux {
    pub incident: f64,
    pub reflected: f64,
    pub transmitted: Vec<f64>,
}

impl EnergyFlux {
    /// Creates a flux partition for unit incident flux.
    pub fn new(reflected: f64, transmitted: Vec<f64>) -> Self {
        Self {
            incident: 1.0,
            reflected,
            transmitted,
        }
    }

    pub fn transmitted_total(&self) -> f64 {
        self.transmitted.iter().sum()
    }

    /// Flux missing from the budget.
    pub fn missing(&self) -> f64 {
        self.incident - (self.reflected + self.transmitted_total())
    }
}

impl AddAssign for EnergyFlux {
    fn add_assign(&mut self, other: Self) {
        self.incident += other.incident;
        self.reflected += other.reflected;
        if self.transmitted.len() < other.transmitted.len() {
            self.transmitted.resize(other.transmitted.len(), 0.0);
        }
        for (a, b) in self.transmitted.iter_mut().zip(other.transmitted) {
            *a += b;
        }
    }
}

impl DivAssign<f64> for EnergyFlux {
    fn div_assign(&mut self, rhs: f64) {
        self.incident /= rhs;
        self.reflected /= rhs;
        for t in self.transmitted.iter_mut() {
            *t /= rhs;
        }
    }
}

impl fmt::Display for EnergyFlux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Energy flux:")?;
        writeln!(f, "  Incident:         {:.6}", self.incident)?;
        writeln!(f, "  Reflected:        {:.6}", self.reflected)?;
        for (i, t) in self.transmitted.iter().enumerate() {
            writeln!(f, "  Transmitted [{i}]:  {:.6}", t)?;
        }
        writeln!(f, "  Missing:          {:.6e}", self.missing())
    }
}
