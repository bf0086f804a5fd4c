//! # evaluator.rs
//!
//! Recursive evaluation of an [`AstNode`] against an [`Environment`].

use crate::astnode::AstNode;
use crate::complex::ComplexOps;
use crate::error::{EvalError, Result};
use crate::variable::Environment;

use num_complex::Complex;

impl AstNode {
    /// Reduces the tree to a single complex value.
    ///
    /// Identifiers resolve through [`Environment::resolve`], so the constants
    /// `pi`, `e` and `i` are always available. Real operands stay on the real
    /// line wherever the mathematics allows it.
    ///
    /// # Errors
    /// - [`EvalError::UnknownIdentifier`] for an unbound free variable.
    /// - [`EvalError::DivisionByZero`] for `z / 0`, `tan` at a pole, or `0 ^ b` with `re(b) < 0`.
    /// - [`EvalError::DomainError`] as soon as any sub-expression, literal
    ///   included, is `NaN` or infinite, even if later steps would bring the
    ///   value back to a finite one (`1 / 10^400`).
    ///
    /// # Examples
    ///
    /// ```
    /// use complexcalc::functions::FunctionKind;
    /// use complexcalc::parser::parse;
    /// use complexcalc::variable::Environment;
    /// use num_complex::Complex;
    ///
    /// let ast = parse("x ^ 2 + i", FunctionKind::ALL).unwrap();
    /// let env = Environment::from(&[("x", 3.0)]);
    /// assert_eq!(ast.evaluate(&env), Ok(Complex::new(9.0, 1.0)));
    /// ```
    pub fn evaluate(&self, env: &Environment) -> Result<Complex<f64>> {
        let value = match self {
            Self::Number(z) => *z,
            Self::Identifier(name) => env.resolve(name)?,
            Self::UnaryOperator { kind, expr } => kind.apply(expr.evaluate(env)?),
            Self::BinaryOperator { kind, left, right } => {
                let l = left.evaluate(env)?;
                let r = right.evaluate(env)?;
                kind.apply(l, r)?
            },
            Self::FunctionCall { kind, arg } => kind.apply(arg.evaluate(env)?)?,
        };

        if value.is_finite_value() {
            Ok(value)
        } else {
            Err(EvalError::DomainError(format!("{} is not finite in {}", value, self)))
        }
    }
}

#[cfg(test)]
mod evaluator_tests {
    use super::*;
    use crate::functions::FunctionKind;
    use crate::parser::parse;
    use approx::assert_abs_diff_eq;

    fn eval_str(input: &str) -> Result<Complex<f64>> {
        parse(input, FunctionKind::ALL)?.evaluate(&Environment::default())
    }

    fn eval_with(input: &str, env: &Environment) -> Result<Complex<f64>> {
        parse(input, FunctionKind::ALL)?.evaluate(env)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_str("2 + 3 * 4"), Ok(Complex::new(14.0, 0.0)));
        assert_eq!(eval_str("(2 + 3) * 4"), Ok(Complex::new(20.0, 0.0)));
        assert_eq!(eval_str("2 ^ 3 ^ 2"), Ok(Complex::new(512.0, 0.0)));
        assert_eq!(eval_str("-2 ^ 2"), Ok(Complex::new(-4.0, 0.0)));
        assert_eq!(eval_str("7 / 2"), Ok(Complex::new(3.5, 0.0)));
    }

    #[test]
    fn test_complex_arithmetic() {
        assert_eq!(eval_str("(1 + 2i) * (3 - i)"), Ok(Complex::new(5.0, 5.0)));
        assert_eq!(eval_str("i * i"), Ok(Complex::new(-1.0, 0.0)));
        assert_eq!(eval_str("conj(3 + 4i)"), Ok(Complex::new(3.0, -4.0)));
        assert_eq!(eval_str("abs(3 + 4i)"), Ok(Complex::new(5.0, 0.0)));
    }

    #[test]
    fn test_real_inputs_stay_real() {
        for input in ["sin(1) * cos(2)", "sqrt(2) + ln(3)", "log(5) / exp(1)", "2 ^ 0.5", "atan(3)"] {
            let value = eval_str(input).unwrap();
            assert_eq!(value.im, 0.0, "{}", input);
        }
    }

    #[test]
    fn test_principal_branches() {
        let z = eval_str("sqrt(-4)").unwrap();
        assert_abs_diff_eq!(z.re, 0.0, epsilon = 1.0e-15);
        assert_abs_diff_eq!(z.im, 2.0, epsilon = 1.0e-15);

        let z = eval_str("ln(-1)").unwrap();
        assert_abs_diff_eq!(z.re, 0.0, epsilon = 1.0e-15);
        assert_abs_diff_eq!(z.im, std::f64::consts::PI, epsilon = 1.0e-15);

        assert_eq!(eval_str("ln(0)"), Ok(Complex::new(0.0, 0.0)));
        assert_eq!(eval_str("sqrt(0)"), Ok(Complex::new(0.0, 0.0)));
    }

    #[test]
    fn test_constants() {
        let z = eval_str("e ^ (i * pi)").unwrap();
        assert_abs_diff_eq!(z.re, -1.0, epsilon = 1.0e-12);
        assert_abs_diff_eq!(z.im, 0.0, epsilon = 1.0e-12);
    }

    #[test]
    fn test_environment() {
        let env = Environment::from(&[("x", Complex::new(2.0, 0.0)), ("a", Complex::new(0.0, 1.0))]);
        assert_eq!(eval_with("x * a + 1", &env), Ok(Complex::new(1.0, 2.0)));
        assert_eq!(
            eval_with("y + 1", &env),
            Err(EvalError::UnknownIdentifier("y".into()))
        );
    }

    #[test]
    fn test_failures() {
        assert_eq!(eval_str("1 / 0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval_str("0 ^ -1"), Err(EvalError::DivisionByZero));
        assert!(matches!(eval_str("10 ^ 400"), Err(EvalError::DomainError(_))));
        assert!(matches!(eval_str("exp(1000)"), Err(EvalError::DomainError(_))));
    }

    #[test]
    fn test_intermediate_overflow_fails() {
        for input in ["1 / 10^400", "exp(-exp(1000))", "atan(10^400)", "1e400 - 1e400", "0 * 1e400", "1e400"] {
            assert!(matches!(eval_str(input), Err(EvalError::DomainError(_))), "{}", input);
        }
        let env = Environment::from(&[("x", f64::INFINITY)]);
        assert!(matches!(eval_with("1 / x", &env), Err(EvalError::DomainError(_))));
    }
}
