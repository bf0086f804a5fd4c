//! # complex.rs
//!
//! Numeric operations on `num_complex::Complex<f64>` with the engine's
//! semantics.
//!
//! `num_complex` already provides the transcendental functions, but the engine
//! needs a few things on top of it:
//!
//! - real inputs stay real (`im` exactly `0.0`) whenever the result is real,
//! - division by zero is an error instead of `NaN`/`inf`,
//! - `ln(0)` and `sqrt(0)` are `0`,
//! - multi-valued functions return their principal branch, with the branch cut
//!   of `ln` on the negative real axis and `arg` in `(-pi, pi]`.

use crate::error::{EvalError, Result};

use num_complex::Complex;
use num_traits::Zero;
use std::f64::consts::{LN_10, PI};

/// Judge the exponent is an integer compatible with i32 or not.
fn is_exp_compatible_with_i32(exp: &Complex<f64>) -> bool {
    (exp.im == 0.0) && (exp.re.fract() == 0.0)
        && (i32::MIN as f64 <= exp.re) && (exp.re <= i32::MAX as f64)
}

/// Engine-level operations on complex values.
///
/// Method names differ from the inherent `Complex` methods on purpose, since
/// inherent methods would always win method resolution.
pub trait ComplexOps: Sized {
    /// Returns true if the imaginary part is zero.
    fn is_real(&self) -> bool;

    /// Returns true if both parts are finite.
    fn is_finite_value(&self) -> bool;

    /// Divides `self` by `rhs`, failing with [`EvalError::DivisionByZero`] when
    /// `rhs` is zero.
    fn checked_div(&self, rhs: &Self) -> Result<Self>;

    /// Principal power `self ^ rhs = exp(rhs * ln(self))`.
    ///
    /// Integer exponents use repeated multiplication so that `i ^ 2` is
    /// exactly `-1`. A zero base is handled explicitly: `0 ^ 0 = 1`,
    /// `0 ^ b = 0` for `re(b) > 0`, and a division by zero otherwise.
    fn principal_pow(&self, rhs: &Self) -> Result<Self>;

    fn exponential(&self) -> Self;

    /// Natural logarithm on the principal branch; `ln(0)` is `0`.
    fn principal_ln(&self) -> Self;

    /// Base-10 logarithm on the principal branch; `log(0)` is `0`.
    fn principal_log10(&self) -> Self;

    /// Principal square root; `sqrt(0)` is `0`.
    fn principal_sqrt(&self) -> Self;

    fn sine(&self) -> Self;
    fn cosine(&self) -> Self;
    fn tangent(&self) -> Result<Self>;

    fn arcsine(&self) -> Self;
    fn arccosine(&self) -> Self;
    fn arctangent(&self) -> Self;

    /// Modulus `|z|`.
    fn modulus(&self) -> f64;

    /// Principal argument in `(-pi, pi]`.
    fn argument(&self) -> f64;

    fn conjugate(&self) -> Self;
}

impl ComplexOps for Complex<f64> {
    fn is_real(&self) -> bool {
        self.im == 0.0
    }

    fn is_finite_value(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    fn checked_div(&self, rhs: &Self) -> Result<Self> {
        if rhs.is_zero() {
            return Err(EvalError::DivisionByZero);
        }
        if self.is_real() && rhs.is_real() {
            return Ok(Complex::new(self.re / rhs.re, 0.0));
        }
        Ok(self / rhs)
    }

    fn principal_pow(&self, rhs: &Self) -> Result<Self> {
        if self.is_zero() {
            return if rhs.is_zero() {
                Ok(Complex::new(1.0, 0.0))
            } else if rhs.re > 0.0 {
                Ok(Complex::new(0.0, 0.0))
            } else {
                Err(EvalError::DivisionByZero)
            };
        }

        if self.is_real() && rhs.is_real() && (self.re > 0.0 || rhs.re.fract() == 0.0) {
            return Ok(Complex::new(self.re.powf(rhs.re), 0.0));
        }

        if is_exp_compatible_with_i32(rhs) {
            return Ok(self.powi(rhs.re as i32));
        }

        Ok((rhs * self.principal_ln()).exponential())
    }

    fn exponential(&self) -> Self {
        if self.is_real() {
            Complex::new(self.re.exp(), 0.0)
        } else {
            self.exp()
        }
    }

    fn principal_ln(&self) -> Self {
        if self.is_zero() {
            return Complex::new(0.0, 0.0);
        }
        if self.is_real() {
            return if self.re > 0.0 {
                Complex::new(self.re.ln(), 0.0)
            } else {
                Complex::new((-self.re).ln(), PI)
            };
        }
        self.ln()
    }

    fn principal_log10(&self) -> Self {
        if self.is_zero() {
            return Complex::new(0.0, 0.0);
        }
        if self.is_real() {
            return if self.re > 0.0 {
                Complex::new(self.re.log10(), 0.0)
            } else {
                Complex::new((-self.re).log10(), PI / LN_10)
            };
        }
        self.ln() / LN_10
    }

    fn principal_sqrt(&self) -> Self {
        if self.is_zero() {
            return Complex::new(0.0, 0.0);
        }
        if self.is_real() {
            return if self.re > 0.0 {
                Complex::new(self.re.sqrt(), 0.0)
            } else {
                Complex::new(0.0, (-self.re).sqrt())
            };
        }
        self.sqrt()
    }

    fn sine(&self) -> Self {
        if self.is_real() {
            Complex::new(self.re.sin(), 0.0)
        } else {
            self.sin()
        }
    }

    fn cosine(&self) -> Self {
        if self.is_real() {
            Complex::new(self.re.cos(), 0.0)
        } else {
            self.cos()
        }
    }

    fn tangent(&self) -> Result<Self> {
        if self.is_real() {
            return Ok(Complex::new(self.re.tan(), 0.0));
        }
        self.sine().checked_div(&self.cosine())
    }

    fn arcsine(&self) -> Self {
        if self.is_real() && self.re.abs() <= 1.0 {
            Complex::new(self.re.asin(), 0.0)
        } else {
            self.asin()
        }
    }

    fn arccosine(&self) -> Self {
        if self.is_real() && self.re.abs() <= 1.0 {
            Complex::new(self.re.acos(), 0.0)
        } else {
            self.acos()
        }
    }

    fn arctangent(&self) -> Self {
        if self.is_real() {
            Complex::new(self.re.atan(), 0.0)
        } else {
            self.atan()
        }
    }

    fn modulus(&self) -> f64 {
        self.norm()
    }

    fn argument(&self) -> f64 {
        // atan2 would give -pi for a negative zero imaginary part
        if self.is_real() && self.re < 0.0 {
            PI
        } else {
            self.arg()
        }
    }

    fn conjugate(&self) -> Self {
        if self.is_real() {
            Complex::new(self.re, 0.0)
        } else {
            self.conj()
        }
    }
}

#[cfg(test)]
mod complex_ops_tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_checked_div() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, -1.0);
        let q = a.checked_div(&b).unwrap();
        let back = q * b;
        assert_abs_diff_eq!(back.re, a.re, epsilon = 1.0e-12);
        assert_abs_diff_eq!(back.im, a.im, epsilon = 1.0e-12);

        assert_eq!(a.checked_div(&Complex::new(0.0, 0.0)), Err(EvalError::DivisionByZero));
        assert_eq!(
            Complex::new(6.0, 0.0).checked_div(&Complex::new(4.0, 0.0)),
            Ok(Complex::new(1.5, 0.0))
        );
    }

    #[test]
    fn test_sqrt_principal_branch() {
        assert_eq!(Complex::new(-4.0, 0.0).principal_sqrt(), Complex::new(0.0, 2.0));
        assert_eq!(Complex::new(9.0, 0.0).principal_sqrt(), Complex::new(3.0, 0.0));
        assert_eq!(Complex::new(0.0, 0.0).principal_sqrt(), Complex::new(0.0, 0.0));

        let z = Complex::new(3.0, 4.0).principal_sqrt();
        assert_abs_diff_eq!(z.re, 2.0, epsilon = 1.0e-12);
        assert_abs_diff_eq!(z.im, 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn test_ln_principal_branch() {
        assert_eq!(Complex::new(0.0, 0.0).principal_ln(), Complex::new(0.0, 0.0));
        assert_eq!(Complex::new(1.0, 0.0).principal_ln(), Complex::new(0.0, 0.0));

        let z = Complex::new(-1.0, 0.0).principal_ln();
        assert_abs_diff_eq!(z.re, 0.0, epsilon = 1.0e-12);
        assert_abs_diff_eq!(z.im, PI, epsilon = 1.0e-12);

        // negative zero must not flip to the other side of the cut
        let z = Complex::new(-1.0, -0.0).principal_ln();
        assert_abs_diff_eq!(z.im, PI, epsilon = 1.0e-12);
    }

    #[test]
    fn test_log10() {
        let z = Complex::new(1000.0, 0.0).principal_log10();
        assert_abs_diff_eq!(z.re, 3.0, epsilon = 1.0e-12);
        assert_eq!(z.im, 0.0);
        let z = Complex::new(-10.0, 0.0).principal_log10();
        assert_abs_diff_eq!(z.re, 1.0, epsilon = 1.0e-12);
        assert_abs_diff_eq!(z.im, PI / LN_10, epsilon = 1.0e-12);
    }

    #[test]
    fn test_pow() {
        let i = Complex::new(0.0, 1.0);
        assert_eq!(i.principal_pow(&Complex::new(2.0, 0.0)), Ok(Complex::new(-1.0, 0.0)));
        assert_eq!(
            Complex::new(-2.0, 0.0).principal_pow(&Complex::new(3.0, 0.0)),
            Ok(Complex::new(-8.0, 0.0))
        );
        let z = Complex::new(2.0, 0.0).principal_pow(&Complex::new(0.5, 0.0)).unwrap();
        assert_abs_diff_eq!(z.re, 2.0f64.sqrt(), epsilon = 1.0e-15);
        assert_eq!(z.im, 0.0);

        // (-1)^0.5 = i on the principal branch
        let z = Complex::new(-1.0, 0.0).principal_pow(&Complex::new(0.5, 0.0)).unwrap();
        assert_abs_diff_eq!(z.re, 0.0, epsilon = 1.0e-12);
        assert_abs_diff_eq!(z.im, 1.0, epsilon = 1.0e-12);

        // i^i = exp(-pi/2)
        let z = i.principal_pow(&i).unwrap();
        assert_abs_diff_eq!(z.re, (-PI / 2.0).exp(), epsilon = 1.0e-12);
        assert_abs_diff_eq!(z.im, 0.0, epsilon = 1.0e-12);
    }

    #[test]
    fn test_pow_zero_base() {
        let zero = Complex::new(0.0, 0.0);
        assert_eq!(zero.principal_pow(&Complex::new(0.0, 0.0)), Ok(Complex::new(1.0, 0.0)));
        assert_eq!(zero.principal_pow(&Complex::new(2.0, 0.0)), Ok(Complex::new(0.0, 0.0)));
        assert_eq!(zero.principal_pow(&Complex::new(-1.0, 0.0)), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_trigonometric_real_stays_real() {
        let x = Complex::new(0.7, 0.0);
        assert_eq!(x.sine().im, 0.0);
        assert_eq!(x.cosine().im, 0.0);
        assert_eq!(x.tangent().unwrap().im, 0.0);
        assert_eq!(x.arcsine().im, 0.0);
        assert_eq!(x.arccosine().im, 0.0);
        assert_eq!(x.arctangent().im, 0.0);
    }

    #[test]
    fn test_trigonometric_complex() {
        let z = Complex::new(1.0, 2.0);
        let s = z.sine();
        let c = z.cosine();
        // sin^2 + cos^2 = 1
        let one = s * s + c * c;
        assert_abs_diff_eq!(one.re, 1.0, epsilon = 1.0e-12);
        assert_abs_diff_eq!(one.im, 0.0, epsilon = 1.0e-12);

        let t = z.tangent().unwrap();
        let expected = s / c;
        assert_abs_diff_eq!(t.re, expected.re, epsilon = 1.0e-12);
        assert_abs_diff_eq!(t.im, expected.im, epsilon = 1.0e-12);

        // asin(2) leaves the real line
        let w = Complex::new(2.0, 0.0).arcsine();
        assert_abs_diff_eq!(w.sine().re, 2.0, epsilon = 1.0e-12);
    }

    #[test]
    fn test_modulus_argument_conjugate() {
        let z = Complex::new(3.0, 4.0);
        assert_eq!(z.modulus(), 5.0);
        assert_eq!(Complex::new(-2.0, -0.0).argument(), PI);
        assert_abs_diff_eq!(Complex::new(0.0, -1.0).argument(), -PI / 2.0, epsilon = 1.0e-15);
        assert_eq!(z.conjugate(), Complex::new(3.0, -4.0));
        assert!(Complex::new(3.0, 0.0).conjugate().im.is_sign_positive());
    }

    #[test]
    fn test_field_laws() {
        let z1 = Complex::new(1.5, -2.0);
        let z2 = Complex::new(-0.25, 3.0);
        let z3 = Complex::new(4.0, 0.5);

        assert_eq!(z1 + z2, z2 + z1);
        assert_eq!(z1 * z2, z2 * z1);

        let lhs = z1 * (z2 + z3);
        let rhs = z1 * z2 + z1 * z3;
        assert_abs_diff_eq!(lhs.re, rhs.re, epsilon = 1.0e-12);
        assert_abs_diff_eq!(lhs.im, rhs.im, epsilon = 1.0e-12);
    }
}
