//! P-wave incidence from a fluid onto an elastic solid.
//!
//! The incident P wave produces a reflected P wave in the fluid and both a
//! transmitted P and a mode-converted S wave in the solid. The three unknown
//! displacement amplitudes follow from three boundary conditions at the
//! interface:
//! - continuity of normal displacement
//! - continuity of normal stress
//! - vanishing shear stress, since the fluid cannot support any
//!
//! The conditions form a 3x3 complex linear system per angle, solved by LU
//! decomposition with partial pivoting. The vertical axis points into the
//! solid and the S polarization is `(cos phi2, -sin phi2)`.

use nalgebra::{Complex, Matrix3, Vector3};

use crate::config::DEGENERACY_EPSILON;
use crate::error::{Error, Result};
use crate::medium::{Fluid, Solid};
use crate::powers::EnergyFlux;
use crate::snell;
use crate::sweep::{CriticalAngle, Regime};


/// Reflected P and transmitted P and S displacement amplitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidSolidCoefficients {
    pub r_p: Complex<f64>,
    pub t_p: Complex<f64>,
    pub t_s: Complex<f64>,
}

/// The boundary-condition system for a single incidence angle.
///
/// **Context**: Mode conversion at the interface couples the reflected and
/// both transmitted waves, so no closed form per coefficient is as readable
/// as solving the boundary conditions directly.
///
/// **How it Works**: Builds `A` and `b` from Snell's law and the Lame moduli
/// of both media. Each transmitted cosine is the principal complex root of
/// `1 - sin^2`, so the P and S legs turn evanescent independently past their
/// own critical angles. The system is solved by LU and rejected as degenerate
/// when its determinant is negligible relative to its row scales.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatteringSystem {
    pub angle: Complex<f64>,
    pub a: Matrix3<Complex<f64>>,
    pub b: Vector3<Complex<f64>>,
}

impl ScatteringSystem {
    pub fn new(angle: Complex<f64>, fluid: &Fluid, solid: &Solid) -> Self {
        let (alpha1, alpha2, beta2) = (fluid.speed, solid.p_speed, solid.s_speed);
        let lambda1 = fluid.lambda();
        let mu2 = solid.mu();
        let lambda2 = solid.lambda();

        let cos_psi1 = angle.cos();
        let sin_psi2 = snell::transmitted_sin(angle, alpha1, alpha2);
        let sin_phi2 = snell::transmitted_sin(angle, alpha1, beta2);
        let cos_psi2 = snell::cos_from_sin(sin_psi2);
        let cos_phi2 = snell::cos_from_sin(sin_phi2);

        let zero = Complex::new(0.0, 0.0);
        let a = Matrix3::new(
            // normal displacement
            cos_psi1,
            cos_psi2,
            -sin_phi2,
            // normal stress
            Complex::new(-lambda1 / alpha1, 0.0),
            (cos_psi2 * cos_psi2 * (2.0 * mu2) + lambda2) / alpha2,
            -(sin_phi2 * cos_phi2) * (2.0 * mu2 / beta2),
            // shear stress
            zero,
            sin_psi2 * cos_psi2 * (2.0 * mu2 / alpha2),
            (cos_phi2 * cos_phi2 - sin_phi2 * sin_phi2) * (mu2 / beta2),
        );
        let b = Vector3::new(cos_psi1, Complex::new(lambda1 / alpha1, 0.0), zero);

        Self { angle, a, b }
    }

    /// Product of the row norms of `A`, the largest magnitude its determinant can take.
    fn scale(&self) -> f64 {
        self.a.row_iter().map(|row| row.norm()).product()
    }

    pub fn solve(&self) -> Result<FluidSolidCoefficients> {
        let lu = self.a.lu();
        let det = lu.determinant();
        let scale = self.scale();
        if !(det.norm() > DEGENERACY_EPSILON * scale) {
            return Err(Error::degenerate(
                self.angle.re,
                format!("scattering matrix is singular (|det| = {:.3e})", det.norm()),
            ));
        }
        let x = lu.solve(&self.b).ok_or_else(|| {
            Error::degenerate(self.angle.re, "LU solve failed on a zero pivot")
        })?;
        Ok(FluidSolidCoefficients {
            r_p: x[0],
            t_p: x[1],
            t_s: x[2],
        })
    }
}

/// Solves the fluid-solid boundary conditions at one incidence angle.
pub fn fluid_solid(
    angle: Complex<f64>,
    fluid: &Fluid,
    solid: &Solid,
) -> Result<FluidSolidCoefficients> {
    ScatteringSystem::new(angle, fluid, solid).solve()
}

/// A validated fluid-over-solid interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidSolidInterface {
    pub fluid: Fluid,
    pub solid: Solid,
}

impl FluidSolidInterface {
    pub fn new(fluid: Fluid, solid: Solid) -> Result<Self> {
        fluid.validate()?;
        solid.validate()?;
        Ok(Self { fluid, solid })
    }
}

impl Regime for FluidSolidInterface {
    fn name(&self) -> &'static str {
        "fluid_solid"
    }

    fn coefficient_names(&self) -> &'static [&'static str] {
        &["R_P", "T_P", "T_S"]
    }

    fn critical_angles(&self) -> Vec<CriticalAngle> {
        let alpha1 = self.fluid.speed;
        [
            ("P", snell::critical_angle(alpha1, self.solid.p_speed)),
            ("S", snell::critical_angle(alpha1, self.solid.s_speed)),
        ]
        .into_iter()
        .filter_map(|(mode, crit)| crit.map(|radians| CriticalAngle::new(mode, radians)))
        .collect()
    }

    fn evaluate(&self, angle: Complex<f64>) -> Result<Vec<Complex<f64>>> {
        let coeffs = fluid_solid(angle, &self.fluid, &self.solid)?;
        Ok(vec![coeffs.r_p, coeffs.t_p, coeffs.t_s])
    }

    fn validate(&self) -> Result<()> {
        self.fluid.validate()?;
        self.solid.validate()
    }

    fn energy(&self, angle: Complex<f64>, coefficients: &[Complex<f64>]) -> EnergyFlux {
        let alpha1 = self.fluid.speed;
        let incident = self.fluid.impedance() * angle.cos().re;
        let cos_psi2 = snell::transmitted_cos(angle, alpha1, self.solid.p_speed).re;
        let cos_phi2 = snell::transmitted_cos(angle, alpha1, self.solid.s_speed).re;
        let rho2 = self.solid.density;
        EnergyFlux::new(
            coefficients[0].norm_sqr(),
            vec![
                rho2 * self.solid.p_speed * cos_psi2 / incident * coefficients[1].norm_sqr(),
                rho2 * self.solid.s_speed * cos_phi2 / incident * coefficients[2].norm_sqr(),
            ],
        )
    }
}
