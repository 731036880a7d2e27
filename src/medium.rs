//! Physical properties of the media on either side of the interface.
//!
//! Speeds are in m/s and densities in kg/m^3, though any consistent unit
//! system works since only ratios and impedances enter the coefficients.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};


/// Rejects non-finite and non-positive values.
pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}

/// An inviscid fluid, carrying only compressional waves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fluid {
    pub speed: f64,
    pub density: f64,
}

impl Fluid {
    pub fn new(speed: f64, density: f64) -> Self {
        Self { speed, density }
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("speed", self.speed)?;
        check_positive("density", self.density)
    }

    /// Acoustic impedance `rho * v`.
    pub fn impedance(&self) -> f64 {
        self.density * self.speed
    }

    /// First Lame parameter, which is the bulk modulus for a fluid.
    pub fn lambda(&self) -> f64 {
        self.density * self.speed * self.speed
    }
}

/// The shear-wave properties of an elastic medium, all the SH case needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShearMedium {
    pub s_speed: f64,
    pub density: f64,
}

impl ShearMedium {
    pub fn new(s_speed: f64, density: f64) -> Self {
        Self { s_speed, density }
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("s_speed", self.s_speed)?;
        check_positive("density", self.density)
    }

    /// Shear impedance `rho * beta`.
    pub fn impedance(&self) -> f64 {
        self.density * self.s_speed
    }
}

/// An isotropic elastic solid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Solid {
    pub p_speed: f64,
    pub s_speed: f64,
    pub density: f64,
}

impl Solid {
    pub fn new(p_speed: f64, s_speed: f64, density: f64) -> Self {
        Self {
            p_speed,
            s_speed,
            density,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("p_speed", self.p_speed)?;
        check_positive("s_speed", self.s_speed)?;
        check_positive("density", self.density)
    }

    /// Shear modulus `rho * beta^2`.
    pub fn mu(&self) -> f64 {
        self.density * self.s_speed * self.s_speed
    }

    /// First Lame parameter `rho * alpha^2 - 2 mu`.
    pub fn lambda(&self) -> f64 {
        self.density * self.p_speed * self.p_speed - 2.0 * self.mu()
    }

    pub fn shear(&self) -> ShearMedium {
        ShearMedium::new(self.s_speed, self.density)
    }
}
