/// Relative size below which a coefficient denominator or system determinant
/// is treated as zero.
pub const DEGENERACY_EPSILON: f64 = 1e-12;
/// Tolerance used when checking that coefficients are purely real or unimodular.
pub const COEFF_TOLERANCE: f64 = 1e-9;
/// Sweeps with more samples than this show a progress bar in the binary.
pub const PROGRESS_THRESHOLD: usize = 10_000;
/// Prefix for environment variable overrides of the settings file.
pub const ENV_PREFIX: &str = "RTCOEF";
