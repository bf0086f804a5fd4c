//! # solver.rs
//!
//! Equation solving for the calculator's equation mode.
//!
//! - [`split_equation`] separates the two sides of `left = right`.
//! - [`linear_root`] isolates the unknown of an equation that is affine in it,
//!   using two samples of `f(x) = left(x) - right(x)`.
//! - [`quadratic_roots`] solves `a x^2 + b x + c = 0` with the quadratic formula.
//!
//! # Notes
//! The two-point technique is exact for affine equations only. Linearity is not
//! verified: for `x^2 = 4` the solver returns the root of the secant through
//! `x = 0` and `x = 1`. Callers restrict input to linear equations.

use crate::astnode::AstNode;
use crate::complex::ComplexOps;
use crate::error::{EvalError, Result};
use crate::variable::Environment;

use num_complex::Complex;

/// Splits `equation` at its single `=`.
///
/// # Errors
/// [`EvalError::MalformedEquation`] if there is no `=`, more than one, or a
/// side is blank.
///
/// # Examples
///
/// ```
/// use complexcalc::solver::split_equation;
///
/// assert_eq!(split_equation("2*x + 3 = 7"), Ok(("2*x + 3 ", " 7")));
/// assert!(split_equation("2*x + 3").is_err());
/// ```
pub fn split_equation(equation: &str) -> Result<(&str, &str)> {
    let (left, right) = equation.split_once('=')
        .ok_or_else(|| EvalError::MalformedEquation(format!("missing = in \"{}\"", equation)))?;

    if right.contains('=') {
        return Err(EvalError::MalformedEquation(format!("more than one = in \"{}\"", equation)));
    }
    if left.trim().is_empty() {
        return Err(EvalError::MalformedEquation("missing left-hand side".into()));
    }
    if right.trim().is_empty() {
        return Err(EvalError::MalformedEquation("missing right-hand side".into()));
    }
    Ok((left, right))
}

/// Finds the root of `left = right` in `variable`, assuming both sides are
/// affine in it.
///
/// `f = left - right` is sampled at `0` and `1`; the root is
/// `-f(0) / (f(1) - f(0))`.
///
/// # Errors
/// - [`EvalError::DegenerateEquation`] if the slope's modulus is at most
///   `zero_threshold` (no solution, or every value is one).
/// - Any evaluation error of either side.
pub fn linear_root(
    left: &AstNode,
    right: &AstNode,
    variable: &str,
    zero_threshold: f64,
) -> Result<Complex<f64>> {
    let f = |x: f64| -> Result<Complex<f64>> {
        let env = Environment::from(&[(variable, x)]);
        Ok(left.evaluate(&env)? - right.evaluate(&env)?)
    };

    let intercept = f(0.0)?;
    let slope = f(1.0)? - intercept;

    if slope.modulus() <= zero_threshold {
        return Err(EvalError::DegenerateEquation);
    }
    (-intercept).checked_div(&slope)
}

/// Roots of a quadratic equation with real coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuadraticRoots {
    /// Zero discriminant.
    Double(Complex<f64>),

    /// Two distinct roots, real or a complex-conjugate pair.
    Distinct(Complex<f64>, Complex<f64>),
}

/// Solves `a x^2 + b x + c = 0`.
///
/// For a negative discriminant the roots are the conjugate pair
/// `(-b ± i sqrt(-d)) / 2a`.
///
/// # Errors
/// [`EvalError::DegenerateEquation`] when `a == 0`; [`EvalError::DomainError`]
/// for non-finite coefficients.
///
/// # Examples
///
/// ```
/// use complexcalc::solver::{quadratic_roots, QuadraticRoots};
/// use num_complex::Complex;
///
/// assert_eq!(
///     quadratic_roots(1.0, -3.0, 2.0),
///     Ok(QuadraticRoots::Distinct(Complex::new(2.0, 0.0), Complex::new(1.0, 0.0)))
/// );
/// ```
pub fn quadratic_roots(a: f64, b: f64, c: f64) -> Result<QuadraticRoots> {
    if !(a.is_finite() && b.is_finite() && c.is_finite()) {
        return Err(EvalError::DomainError("coefficients must be finite".into()));
    }
    if a == 0.0 {
        return Err(EvalError::DegenerateEquation);
    }

    let discriminant = b * b - 4.0 * a * c;
    let denominator = 2.0 * a;

    if discriminant == 0.0 {
        return Ok(QuadraticRoots::Double(Complex::new(-b / denominator, 0.0)));
    }

    let root = Complex::new(discriminant, 0.0).principal_sqrt();
    let first = (Complex::new(-b, 0.0) + root) / denominator;
    let second = (Complex::new(-b, 0.0) - root) / denominator;
    Ok(QuadraticRoots::Distinct(first, second))
}

#[cfg(test)]
mod solver_tests {
    use super::*;
    use crate::functions::FunctionKind;
    use crate::parser::parse;
    use approx::assert_abs_diff_eq;

    fn solve(equation: &str) -> Result<Complex<f64>> {
        let (left, right) = split_equation(equation)?;
        let left = parse(left, FunctionKind::ALL)?;
        let right = parse(right, FunctionKind::ALL)?;
        linear_root(&left, &right, "x", 1.0e-14)
    }

    #[test]
    fn test_split_equation() {
        assert_eq!(split_equation("x=1"), Ok(("x", "1")));
        assert!(matches!(split_equation("x + 1"), Err(EvalError::MalformedEquation(_))));
        assert!(matches!(split_equation("x = 1 = 2"), Err(EvalError::MalformedEquation(_))));
        assert!(matches!(split_equation(" = 2"), Err(EvalError::MalformedEquation(_))));
        assert!(matches!(split_equation("x = "), Err(EvalError::MalformedEquation(_))));
    }

    #[test]
    fn test_linear_root() {
        assert_eq!(solve("2*x + 3 = 7"), Ok(Complex::new(2.0, 0.0)));
        assert_eq!(solve("x / 4 = 1"), Ok(Complex::new(4.0, 0.0)));

        let root = solve("3 * (x - 1) = x + 5").unwrap();
        assert_abs_diff_eq!(root.re, 4.0, epsilon = 1.0e-12);
        assert_abs_diff_eq!(root.im, 0.0, epsilon = 1.0e-12);
    }

    #[test]
    fn test_complex_coefficients() {
        // i*x = 1 -> x = -i
        let root = solve("i * x = 1").unwrap();
        assert_abs_diff_eq!(root.re, 0.0, epsilon = 1.0e-12);
        assert_abs_diff_eq!(root.im, -1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn test_degenerate() {
        assert_eq!(solve("x = x + 1"), Err(EvalError::DegenerateEquation));
        assert_eq!(solve("2 * x = x + x"), Err(EvalError::DegenerateEquation));
        assert_eq!(solve("3 = 3"), Err(EvalError::DegenerateEquation));
    }

    #[test]
    fn test_evaluation_errors_propagate() {
        assert_eq!(solve("x / 0 = 1"), Err(EvalError::DivisionByZero));
        assert_eq!(solve("x + y = 1"), Err(EvalError::UnknownIdentifier("y".into())));
    }

    #[test]
    fn test_quadratic_roots() {
        assert_eq!(
            quadratic_roots(1.0, -2.0, 1.0),
            Ok(QuadraticRoots::Double(Complex::new(1.0, 0.0)))
        );
        assert_eq!(
            quadratic_roots(1.0, 0.0, 1.0),
            Ok(QuadraticRoots::Distinct(Complex::new(0.0, 1.0), Complex::new(0.0, -1.0)))
        );
        assert_eq!(quadratic_roots(0.0, 1.0, 1.0), Err(EvalError::DegenerateEquation));
        assert!(matches!(quadratic_roots(f64::NAN, 1.0, 1.0), Err(EvalError::DomainError(_))));
    }
}
