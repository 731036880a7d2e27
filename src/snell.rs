//! Snell's law in the complex domain.
//!
//! Transmitted cosines are computed from `1 - sin^2` with an explicitly chosen
//! square-root branch, so post-critical incidence yields a decaying
//! (evanescent) transmitted wave instead of NaN.
//!
//! The time convention is `exp(i(k.x - wt))`, so a transmitted leg decays away
//! from the interface when the imaginary part of its vertical wavenumber is
//! non-negative.

use nalgebra::Complex;

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn normal_incidence() {
        let cos_t = transmitted_cos(Complex::new(0.0, 0.0), 1500.0, 1800.0);
        assert_eq!(cos_t, Complex::new(1.0, 0.0));
    }

    #[test]
    fn angle30_incidence() {
        // light-like index ratio 1/1.31, checked against the real-valued law
        let theta_i = 30.0 * PI / 180.0;
        let cos_t = transmitted_cos(Complex::new(theta_i, 0.0), 1.31, 1.0);
        let theta_t = (theta_i.sin() / 1.31).asin();
        assert_abs_diff_eq!(cos_t.re, theta_t.cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(cos_t.im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn beyond_critical_is_decaying() {
        let angle = Complex::new(80.0_f64.to_radians(), 0.0);
        let cos_t = transmitted_cos(angle, 1500.0, 1800.0);
        assert_abs_diff_eq!(cos_t.re, 0.0, epsilon = 1e-12);
        assert!(cos_t.im > 0.0);
    }

    #[test]
    fn branch_ignores_signed_zero() {
        let plus = principal_sqrt(Complex::new(-4.0, 0.0));
        let minus = principal_sqrt(Complex::new(-4.0, -0.0));
        assert_eq!(plus, Complex::new(0.0, 2.0));
        assert_eq!(minus, Complex::new(0.0, 2.0));
    }

    #[test]
    fn principal_branch_has_non_negative_real_part() {
        for z in [
            Complex::new(3.0, 4.0),
            Complex::new(-3.0, 4.0),
            Complex::new(-3.0, -4.0),
            Complex::new(3.0, -4.0),
        ] {
            let root = principal_sqrt(z);
            assert!(root.re >= 0.0);
            assert_abs_diff_eq!((root * root - z).norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn critical_angles() {
        let crit = critical_angle(1500.0, 1550.0).unwrap();
        assert_abs_diff_eq!(crit.to_degrees(), 75.407, epsilon = 0.001);
        assert!(critical_angle(1800.0, 1500.0).is_none());
        assert!(critical_angle(1500.0, 1500.0).is_none());
    }
}

/// Principal complex square root with the branch fixed independently of the
/// sign of zero: the real part is non-negative and, when it vanishes, the
/// imaginary part is non-negative.
pub fn principal_sqrt(z: Complex<f64>) -> Complex<f64> {
    let root = z.sqrt();
    if root.re < 0.0 || (root.re == 0.0 && root.im < 0.0) {
        -root
    } else {
        root
    }
}

/// Sine of the transmitted angle for a wave of speed `v_trans` excited by an
/// incident wave of speed `v_inc`.
pub fn transmitted_sin(angle: Complex<f64>, v_inc: f64, v_trans: f64) -> Complex<f64> {
    angle.sin() * (v_trans / v_inc)
}

/// Cosine matching a (possibly super-unity) sine.
pub fn cos_from_sin(sin: Complex<f64>) -> Complex<f64> {
    principal_sqrt(Complex::new(1.0, 0.0) - sin * sin)
}

/// Cosine of the transmitted angle. Purely imaginary beyond the critical angle.
pub fn transmitted_cos(angle: Complex<f64>, v_inc: f64, v_trans: f64) -> Complex<f64> {
    cos_from_sin(transmitted_sin(angle, v_inc, v_trans))
}

/// Incidence angle in radians beyond which the transmitted leg is evanescent.
/// Only exists when the transmitted wave is faster than the incident one.
pub fn critical_angle(v_inc: f64, v_trans: f64) -> Option<f64> {
    if v_trans > v_inc {
        Some((v_inc / v_trans).asin())
    } else {
        None
    }
}
