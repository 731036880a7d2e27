//! Plane-wave reflection and transmission coefficients at a flat interface.
//!
//! Three regimes are supported:
//! - acoustic: fluid over fluid ([`fresnel::AcousticInterface`])
//! - SH: shear-horizontal waves between two elastic solids ([`fresnel::ShInterface`])
//! - fluid over elastic solid with P-to-S conversion ([`scattering::FluidSolidInterface`])
//!
//! Each is swept over incidence angle by [`sweep::run`]. Post-critical
//! incidence is handled through complex cosines, so the coefficients are
//! complex in general.

pub mod config;
pub mod error;
pub mod fresnel;
pub mod medium;
pub mod output;
pub mod powers;
pub mod problem;
pub mod result;
pub mod scattering;
pub mod settings;
pub mod snell;
pub mod sweep;

pub use error::{Error, Result};
