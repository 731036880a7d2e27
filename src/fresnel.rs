//! Closed-form coefficients for two-wave interfaces.
//!
//! An incident wave meets a planar interface and produces one reflected and
//! one transmitted wave of the same type. This covers:
//! - fluid over fluid (acoustic P waves)
//! - elastic over elastic for shear-horizontal (SH) waves, which do not
//!   convert to P or SV at a flat interface
//!
//! Both share one formula in terms of the wave impedance of each side, so the
//! complex square-root branch logic lives in a single place.

use clap::ValueEnum;
use nalgebra::Complex;
use serde::{Deserialize, Serialize};

use crate::config::DEGENERACY_EPSILON;
use crate::error::{Error, Result};
use crate::medium::{Fluid, ShearMedium};
use crate::powers::EnergyFlux;
use crate::snell;
use crate::sweep::{CriticalAngle, Regime};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::COEFF_TOLERANCE;
    use approx::assert_abs_diff_eq;

    fn real(angle_deg: f64) -> Complex<f64> {
        Complex::new(angle_deg.to_radians(), 0.0)
    }

    #[test]
    fn normal_incidence_water_to_faster_fluid() {
        let upper = Fluid::new(1500.0, 1000.0);
        let lower = Fluid::new(1800.0, 1000.0);
        let (r, t) = acoustic(real(0.0), &upper, &lower, Convention::Displacement).unwrap();
        assert_abs_diff_eq!(r.re, 300_000.0 / 3_300_000.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t.re, 3_000_000.0 / 3_300_000.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.im, 0.0);
        assert_abs_diff_eq!(t.im, 0.0);
    }

    #[test]
    fn normal_incidence_matches_impedance_formula() {
        let upper = Fluid::new(1480.0, 1020.0);
        let lower = Fluid::new(1700.0, 1900.0);
        let (i1, i2) = (upper.impedance(), lower.impedance());
        let (r, t) = acoustic(real(0.0), &upper, &lower, Convention::Displacement).unwrap();
        assert_abs_diff_eq!(r.re, (i2 - i1) / (i2 + i1), epsilon = 1e-12);
        assert_abs_diff_eq!(t.re, 2.0 * i1 / (i1 + i2), epsilon = 1e-12);
    }

    #[test]
    fn flipped_convention_negates_reflection_only() {
        let upper = Fluid::new(1500.0, 1000.0);
        let lower = Fluid::new(1800.0, 1200.0);
        for deg in [0.0, 20.0, 50.0, 70.0, 85.0] {
            let (r, t) = acoustic(real(deg), &upper, &lower, Convention::Displacement).unwrap();
            let (rf, tf) = acoustic(real(deg), &upper, &lower, Convention::Flipped).unwrap();
            assert_abs_diff_eq!((r + rf).norm(), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!((t - tf).norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn real_below_critical() {
        let upper = Fluid::new(1500.0, 1000.0);
        let lower = Fluid::new(1800.0, 1000.0);
        let crit = snell::critical_angle(1500.0, 1800.0).unwrap().to_degrees();
        let mut deg = 0.0;
        while deg < crit - 0.1 {
            let (r, t) = acoustic(real(deg), &upper, &lower, Convention::Displacement).unwrap();
            assert!(r.im.abs() < COEFF_TOLERANCE, "Im R = {} at {deg}", r.im);
            assert!(t.im.abs() < COEFF_TOLERANCE, "Im T = {} at {deg}", t.im);
            deg += 0.5;
        }
    }

    #[test]
    fn total_reflection_beyond_critical() {
        let upper = ShearMedium::new(1500.0, 1000.0);
        let lower = ShearMedium::new(1550.0, 1000.0);
        let crit = snell::critical_angle(1500.0, 1550.0).unwrap().to_degrees();
        let mut deg = crit + 0.01;
        while deg < 89.9 {
            let (r, _) =
                shear_horizontal(real(deg), &upper, &lower, Convention::Displacement).unwrap();
            assert_abs_diff_eq!(r.norm_sqr(), 1.0, epsilon = 1e-10);
            deg += 0.25;
        }
    }

    #[test]
    fn energy_identity_propagating() {
        let upper = Fluid::new(1500.0, 1000.0);
        let lower = Fluid::new(1650.0, 1800.0);
        let interface = AcousticInterface::new(upper, lower, Convention::Displacement).unwrap();
        for deg in [0.0, 10.0, 30.0, 55.0, 65.0] {
            let angle = real(deg);
            let coeffs = interface.evaluate(angle).unwrap();
            let ci = angle.cos().re;
            let ct = snell::transmitted_cos(angle, 1500.0, 1650.0).re;
            let (i1, i2) = (upper.impedance(), lower.impedance());
            let sum = coeffs[0].norm_sqr() + i2 * ct / (i1 * ci) * coeffs[1].norm_sqr();
            assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(interface.energy(angle, &coeffs).missing(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn naive_power_sum_is_not_conserved() {
        let upper = Fluid::new(1500.0, 1000.0);
        let lower = Fluid::new(3000.0, 2000.0);
        let (r, t) = acoustic(real(0.0), &upper, &lower, Convention::Displacement).unwrap();
        assert!((r.norm_sqr() + t.norm_sqr() - 1.0).abs() > 0.1);
    }

    #[test]
    fn sh_matches_acoustic_with_shear_impedance() {
        let upper = ShearMedium::new(1500.0, 1000.0);
        let lower = ShearMedium::new(1550.0, 1000.0);
        let (r_sh, t_sh) =
            shear_horizontal(real(40.0), &upper, &lower, Convention::Displacement).unwrap();
        let (r_ac, t_ac) = acoustic(
            real(40.0),
            &Fluid::new(1500.0, 1000.0),
            &Fluid::new(1550.0, 1000.0),
            Convention::Displacement,
        )
        .unwrap();
        assert_eq!(r_sh, r_ac);
        assert_eq!(t_sh, t_ac);
    }

    #[test]
    fn identical_media_transmit_everything() {
        let water = Fluid::new(1500.0, 1000.0);
        for deg in [0.0, 45.0, 89.0] {
            let (r, t) = acoustic(real(deg), &water, &water, Convention::Displacement).unwrap();
            assert_abs_diff_eq!(r.norm(), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!((t - 1.0).norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn grazing_incidence_is_degenerate_for_matched_media() {
        let water = Fluid::new(1500.0, 1000.0);
        let angle = Complex::new(std::f64::consts::FRAC_PI_2, 0.0);
        let result = acoustic(angle, &water, &water, Convention::Displacement);
        assert!(matches!(result, Err(Error::NumericDegeneracy { .. })));
    }

    #[test]
    fn interface_rejects_bad_media() {
        let result = AcousticInterface::new(
            Fluid::new(-1500.0, 1000.0),
            Fluid::new(1800.0, 1000.0),
            Convention::Displacement,
        );
        assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    }

    #[test]
    fn critical_angle_reported_only_for_faster_lower_medium() {
        let slow = ShearMedium::new(1500.0, 1000.0);
        let fast = ShearMedium::new(1550.0, 1000.0);
        let up = ShInterface::new(slow, fast, Convention::Displacement).unwrap();
        let down = ShInterface::new(fast, slow, Convention::Displacement).unwrap();
        assert_eq!(up.critical_angles().len(), 1);
        assert!(down.critical_angles().is_empty());
    }
}

/// Sign convention for the reflection coefficient.
///
/// `Displacement` relates particle-velocity (or displacement) amplitudes
/// measured along each wave's direction of travel. It gives
/// `R = (i2 - i1) / (i1 + i2)` at normal incidence and agrees with the
/// fluid-solid system in its fluid limit. `Flipped` negates R and leaves T
/// unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Convention {
    #[default]
    Displacement,
    Flipped,
}

/// Reflection and transmission coefficients for a two-wave interface.
///
/// **Context**: Both the acoustic and the SH problems reduce to one incident,
/// one reflected and one transmitted wave whose amplitudes depend only on the
/// impedance of each side and on the incidence and refraction angles.
///
/// **How it Works**: Obtains the transmitted cosine from Snell's law with the
/// principal complex square root, so incidence beyond the critical angle gives
/// an imaginary cosine and a unimodular R rather than NaN. Returns
/// `NumericDegeneracy` when the shared denominator vanishes.
///
/// # Example
/// ```rust
/// use nalgebra::Complex;
/// use rtcoef::fresnel::{two_medium, Convention};
///
/// let (r, t) = two_medium(Complex::new(0.0, 0.0), 1500.0, 1.5e6, 1800.0, 1.8e6, Convention::Displacement).unwrap();
/// assert!((r.re - 0.3 / 3.3).abs() < 1e-12);
/// assert!((t.re - 3.0 / 3.3).abs() < 1e-12);
/// ```
pub fn two_medium(
    angle: Complex<f64>,
    v1: f64,
    i1: f64,
    v2: f64,
    i2: f64,
    convention: Convention,
) -> Result<(Complex<f64>, Complex<f64>)> {
    let ci = angle.cos();
    let ct = snell::transmitted_cos(angle, v1, v2);

    let denominator = ct * i1 + ci * i2;
    if denominator.norm() <= DEGENERACY_EPSILON * (i1.abs() + i2.abs()) {
        return Err(Error::degenerate(
            angle.re,
            "reflection/transmission denominator vanishes",
        ));
    }

    let numerator = match convention {
        Convention::Displacement => ci * i2 - ct * i1,
        Convention::Flipped => ct * i1 - ci * i2,
    };
    let r = numerator / denominator;
    let t = ci * (2.0 * i1) / denominator;
    Ok((r, t))
}

/// Acoustic R and T for a fluid over a fluid.
pub fn acoustic(
    angle: Complex<f64>,
    upper: &Fluid,
    lower: &Fluid,
    convention: Convention,
) -> Result<(Complex<f64>, Complex<f64>)> {
    two_medium(
        angle,
        upper.speed,
        upper.impedance(),
        lower.speed,
        lower.impedance(),
        convention,
    )
}

/// SH R and T for two elastic media in welded contact.
pub fn shear_horizontal(
    angle: Complex<f64>,
    upper: &ShearMedium,
    lower: &ShearMedium,
    convention: Convention,
) -> Result<(Complex<f64>, Complex<f64>)> {
    two_medium(
        angle,
        upper.s_speed,
        upper.impedance(),
        lower.s_speed,
        lower.impedance(),
        convention,
    )
}

/// Normal power flux of the reflected and transmitted waves per unit incident flux.
fn two_medium_energy(
    angle: Complex<f64>,
    v1: f64,
    i1: f64,
    v2: f64,
    i2: f64,
    coefficients: &[Complex<f64>],
) -> EnergyFlux {
    let ci = angle.cos().re;
    let ct = snell::transmitted_cos(angle, v1, v2).re;
    EnergyFlux::new(
        coefficients[0].norm_sqr(),
        vec![i2 * ct / (i1 * ci) * coefficients[1].norm_sqr()],
    )
}

/// A validated fluid-fluid interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcousticInterface {
    pub upper: Fluid,
    pub lower: Fluid,
    pub convention: Convention,
}

impl AcousticInterface {
    pub fn new(upper: Fluid, lower: Fluid, convention: Convention) -> Result<Self> {
        upper.validate()?;
        lower.validate()?;
        Ok(Self {
            upper,
            lower,
            convention,
        })
    }
}

impl Regime for AcousticInterface {
    fn name(&self) -> &'static str {
        "acoustic"
    }

    fn coefficient_names(&self) -> &'static [&'static str] {
        &["R", "T"]
    }

    fn critical_angles(&self) -> Vec<CriticalAngle> {
        snell::critical_angle(self.upper.speed, self.lower.speed)
            .map(|radians| CriticalAngle::new("P", radians))
            .into_iter()
            .collect()
    }

    fn evaluate(&self, angle: Complex<f64>) -> Result<Vec<Complex<f64>>> {
        let (r, t) = acoustic(angle, &self.upper, &self.lower, self.convention)?;
        Ok(vec![r, t])
    }

    fn validate(&self) -> Result<()> {
        self.upper.validate()?;
        self.lower.validate()
    }

    fn energy(&self, angle: Complex<f64>, coefficients: &[Complex<f64>]) -> EnergyFlux {
        two_medium_energy(
            angle,
            self.upper.speed,
            self.upper.impedance(),
            self.lower.speed,
            self.lower.impedance(),
            coefficients,
        )
    }
}

/// A validated elastic-elastic interface for SH waves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShInterface {
    pub upper: ShearMedium,
    pub lower: ShearMedium,
    pub convention: Convention,
}

impl ShInterface {
    pub fn new(upper: ShearMedium, lower: ShearMedium, convention: Convention) -> Result<Self> {
        upper.validate()?;
        lower.validate()?;
        Ok(Self {
            upper,
            lower,
            convention,
        })
    }
}

impl Regime for ShInterface {
    fn name(&self) -> &'static str {
        "sh"
    }

    fn coefficient_names(&self) -> &'static [&'static str] {
        &["R", "T"]
    }

    fn critical_angles(&self) -> Vec<CriticalAngle> {
        snell::critical_angle(self.upper.s_speed, self.lower.s_speed)
            .map(|radians| CriticalAngle::new("SH", radians))
            .into_iter()
            .collect()
    }

    fn evaluate(&self, angle: Complex<f64>) -> Result<Vec<Complex<f64>>> {
        let (r, t) = shear_horizontal(angle, &self.upper, &self.lower, self.convention)?;
        Ok(vec![r, t])
    }

    fn validate(&self) -> Result<()> {
        self.upper.validate()?;
        self.lower.validate()
    }

    fn energy(&self, angle: Complex<f64>, coefficients: &[Complex<f64>]) -> EnergyFlux {
        two_medium_energy(
            angle,
            self.upper.s_speed,
            self.upper.impedance(),
            self.lower.s_speed,
            self.lower.impedance(),
            coefficients,
        )
    }
}
