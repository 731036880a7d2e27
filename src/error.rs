use thiserror::Error;

/// Errors raised while validating inputs or evaluating coefficients.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A denominator or system determinant vanished at this angle.
    ///
    /// Sweeps record this as a hole in every series instead of aborting.
    #[error("numeric degeneracy at {angle:.6} rad: {context}")]
    NumericDegeneracy { angle: f64, context: String },

    /// A physical or sweep parameter is non-positive, non-finite or otherwise unusable.
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// The sweep reaches grazing incidence, where the closed forms are undefined.
    #[error("sweep end angle {end:.6} rad must be strictly less than pi/2")]
    DomainBoundaryMisuse { end: f64 },
}

impl Error {
    pub(crate) fn degenerate(angle: f64, context: impl Into<String>) -> Self {
        Self::NumericDegeneracy {
            angle,
            context: context.into(),
        }
    }

    /// True for errors that only affect a single sample of a sweep.
    pub fn is_sample_local(&self) -> bool {
        matches!(self, Self::NumericDegeneracy { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
