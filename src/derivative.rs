//! # derivative.rs
//!
//! Symbolic differentiation of an [`AstNode`] with respect to one variable.
//!
//! The result is a new, unsimplified tree; call [`AstNode::simplify`] on it
//! before rendering.

use crate::astnode::AstNode;
use crate::error::{EvalError, Result};
use crate::functions::FunctionKind;
use crate::operators::BinaryOperatorKind;

use std::f64::consts::LN_10;

/// AstNode impl `differentiate` and its helpers
impl AstNode {
    /// Computes the derivative of the expression with respect to `var`.
    ///
    /// Every identifier other than `var` (including the constants `pi`, `e`
    /// and `i`) is treated as a constant.
    ///
    /// # Errors
    /// [`EvalError::UnsupportedOperation`] when the expression applies a
    /// function without a complex derivative (`re`, `im`, `arg`, `conj`) to a
    /// sub-expression that depends on `var`.
    ///
    /// # Examples
    ///
    /// ```
    /// use complexcalc::functions::FunctionKind;
    /// use complexcalc::parser::parse;
    ///
    /// let ast = parse("x^3 + sin(x)", FunctionKind::ALL).unwrap();
    /// let derivative = ast.differentiate("x").unwrap().simplify();
    /// assert_eq!(derivative.to_string(), "3 * x^2 + cos(x)");
    /// ```
    pub fn differentiate(&self, var: &str) -> Result<Self> {
        if !self.depends_on(var) {
            return Ok(Self::zero());
        }
        match self {
            Self::Number(_) => Ok(Self::zero()),
            Self::Identifier(name) => {
                if name == var {
                    Ok(Self::one())
                } else {
                    Ok(Self::zero())
                }
            },
            Self::UnaryOperator { kind, expr } => Ok(Self::UnaryOperator {
                kind: *kind,
                expr: Box::new(expr.differentiate(var)?),
            }),
            Self::BinaryOperator { kind, left, right } => Self::diff_binary(*kind, left, right, var),
            Self::FunctionCall { kind, arg } => Self::diff_function(*kind, arg, var),
        }
    }

    /// Differentiate a binary operator expression.
    ///
    /// ```text
    /// (u ± v)' = u' ± v'
    /// (u * v)' = u' * v + u * v'
    /// (u / v)' = (u' * v - u * v') / v^2
    /// ```
    ///
    /// A side that does not depend on `var` gets no zero term:
    /// `(c * v)' = c * v'`, `(u / c)' = u' / c`, `(c / v)' = -(c * v') / v^2`.
    fn diff_binary(kind: BinaryOperatorKind, left: &Self, right: &Self, var: &str) -> Result<Self> {
        if kind == BinaryOperatorKind::Pow {
            return Self::diff_pow(left, right, var);
        }
        let dl = left.differentiate(var)?;
        let dr = right.differentiate(var)?;
        let constant = (!left.depends_on(var), !right.depends_on(var));
        Ok(match (kind, constant) {
            (BinaryOperatorKind::Add, _) => dl + dr,
            (BinaryOperatorKind::Sub, _) => dl - dr,
            (BinaryOperatorKind::Mul, (true, _)) => left.clone() * dr,
            (BinaryOperatorKind::Mul, (_, true)) => dl * right.clone(),
            (BinaryOperatorKind::Mul, _) => dl * right.clone() + left.clone() * dr,
            (BinaryOperatorKind::Div, (_, true)) => dl / right.clone(),
            (BinaryOperatorKind::Div, (true, _)) => -(left.clone() * dr) / right.clone().powf(2.0),
            (BinaryOperatorKind::Div, _) => (dl * right.clone() - left.clone() * dr) / right.clone().powf(2.0),
            (BinaryOperatorKind::Pow, _) => Self::diff_pow(left, right, var)?,
        })
    }

    /// Differentiate `u ^ v`.
    ///
    /// ```text
    /// v constant:  (u^n)' = n * u^(n - 1) * u'
    /// u constant:  (a^v)' = a^v * ln(a) * v'
    /// otherwise:   (u^v)' = u^v * (v' * ln(u) + v * u' / u)
    /// ```
    fn diff_pow(base: &Self, exp: &Self, var: &str) -> Result<Self> {
        let u = base.clone();
        let v = exp.clone();

        if !exp.depends_on(var) {
            let du = base.differentiate(var)?;
            let lowered = match v.as_number() {
                Some(n) => Self::Number(n - 1.0),
                None => v.clone() - Self::one(),
            };
            return Ok(v * u.pow(lowered) * du);
        }

        let dv = exp.differentiate(var)?;
        if !base.depends_on(var) {
            return Ok(u.clone().pow(v) * u.call(FunctionKind::Ln) * dv);
        }

        let du = base.differentiate(var)?;
        let ln_u = u.clone().call(FunctionKind::Ln);
        Ok(u.clone().pow(v.clone()) * (dv * ln_u + v * du / u))
    }

    /// Differentiate a function call with the chain rule.
    ///
    /// - `sin(u)` → `cos(u) * u'`
    /// - `cos(u)` → `-sin(u) * u'`
    /// - `tan(u)` → `u' / cos(u)^2`
    /// - `asin(u)` → `u' / sqrt(1 - u^2)`
    /// - `acos(u)` → `-u' / sqrt(1 - u^2)`
    /// - `atan(u)` → `u' / (1 + u^2)`
    /// - `exp(u)` → `exp(u) * u'`
    /// - `ln(u)` → `u' / u`
    /// - `log(u)` → `u' / (u * ln(10))`
    /// - `sqrt(u)` → `u' / (2 * sqrt(u))`
    /// - `abs(u)` → `u / abs(u) * u'` (undefined at `u = 0`)
    fn diff_function(kind: FunctionKind, arg: &Self, var: &str) -> Result<Self> {
        let u = arg.clone();
        let du = arg.differentiate(var)?;

        let derivative = match kind {
            FunctionKind::Sin  => u.call(FunctionKind::Cos) * du,
            FunctionKind::Cos  => -u.call(FunctionKind::Sin) * du,
            FunctionKind::Tan  => du / u.call(FunctionKind::Cos).powf(2.0),
            FunctionKind::Asin => du / Self::sqrt_one_minus_square(&u),
            FunctionKind::Acos => -du / Self::sqrt_one_minus_square(&u),
            FunctionKind::Atan => du / (Self::one() + u.powf(2.0)),
            FunctionKind::Exp  => u.call(FunctionKind::Exp) * du,
            FunctionKind::Ln   => du / u,
            FunctionKind::Log  => du / (u * Self::real(LN_10)),
            FunctionKind::Sqrt => du / (Self::real(2.0) * u.call(FunctionKind::Sqrt)),
            // undefined at u = 0, where abs(u) is zero
            FunctionKind::Abs  => u.clone() / u.call(FunctionKind::Abs) * du,
            FunctionKind::Re | FunctionKind::Im | FunctionKind::Arg | FunctionKind::Conj => {
                return Err(EvalError::UnsupportedOperation(format!(
                    "{}(z) has no complex derivative",
                    kind
                )));
            },
        };
        Ok(derivative)
    }

    /// `sqrt(1 - u^2)`
    fn sqrt_one_minus_square(u: &Self) -> Self {
        (Self::one() - u.clone().powf(2.0)).call(FunctionKind::Sqrt)
    }
}

#[cfg(test)]
mod derivative_tests {
    use super::*;
    use crate::parser::parse;
    use crate::variable::Environment;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex;

    fn derive(input: &str) -> Result<AstNode> {
        Ok(parse(input, FunctionKind::ALL)?.differentiate("x")?.simplify())
    }

    fn eval_at(node: &AstNode, x: f64) -> Complex<f64> {
        node.evaluate(&Environment::from(&[("x", x)])).unwrap()
    }

    /// Checks the symbolic derivative against a central difference at `x`.
    fn assert_matches_central_difference(input: &str, x: f64) {
        let f = parse(input, FunctionKind::ALL).unwrap();
        let df = derive(input).unwrap();
        let h = 1.0e-5;
        let numeric = (eval_at(&f, x + h) - eval_at(&f, x - h)) / (2.0 * h);
        let symbolic = eval_at(&df, x);
        assert_abs_diff_eq!(symbolic.re, numeric.re, epsilon = 1.0e-4);
        assert_abs_diff_eq!(symbolic.im, numeric.im, epsilon = 1.0e-4);
    }

    #[test]
    fn test_basic_rules() {
        assert_eq!(derive("5").unwrap(), AstNode::zero());
        assert_eq!(derive("x").unwrap(), AstNode::one());
        assert_eq!(derive("y").unwrap(), AstNode::zero());
        assert_eq!(derive("pi * x").unwrap(), AstNode::identifier("pi"));
        assert_eq!(derive("x^3").unwrap().to_string(), "3 * x^2");
        assert_eq!(derive("2 * x + 1").unwrap().to_string(), "2");
        assert_eq!(derive("-x").unwrap().to_string(), "-1");
    }

    #[test]
    fn test_constant_sides_render() {
        assert_eq!(derive("pi * x^2").unwrap().to_string(), "2 * pi * x");
        assert_eq!(derive("x / 4").unwrap().to_string(), "0.25");
        assert_eq!(derive("1 / x").unwrap().to_string(), "-1 / x^2");
        assert_eq!(derive("x^2 / (1 / 0)").unwrap().to_string(), "2 * x / (1 / 0)");
    }

    #[test]
    fn test_function_rules_render() {
        assert_eq!(derive("sin(x)").unwrap().to_string(), "cos(x)");
        assert_eq!(derive("cos(x)").unwrap().to_string(), "-sin(x)");
        assert_eq!(derive("exp(x)").unwrap().to_string(), "exp(x)");
        assert_eq!(derive("ln(x)").unwrap().to_string(), "1 / x");
    }

    #[test]
    fn test_power_of_cube_matches_numeric() {
        assert_matches_central_difference("x^3", 2.0);
    }

    #[test]
    fn test_rules_match_numeric() {
        let cases = [
            ("x * sin(x)", 0.7),
            ("(x + 1) / (x - 2)", 0.5),
            ("tan(x)", 0.3),
            ("asin(x)", 0.4),
            ("acos(x)", -0.2),
            ("atan(x^2)", 1.3),
            ("log(x)", 3.0),
            ("sqrt(1 + x^2)", 2.0),
            ("exp(2 * x) - ln(x)", 0.9),
            ("2 ^ x", 1.5),
            ("x ^ x", 1.2),
            ("abs(x - 3)", 1.0),
            ("x^0.5", 2.0),
            ("cos(x)^2 + sin(x)^2", 0.8),
        ];
        for (input, x) in cases {
            assert_matches_central_difference(input, x);
        }
    }

    #[test]
    fn test_other_variable() {
        let ast = parse("a * x^2 + a^2", FunctionKind::ALL).unwrap();
        let da = ast.differentiate("a").unwrap().simplify();
        let value = da.evaluate(&Environment::from(&[("a", 3.0), ("x", 2.0)])).unwrap();
        assert_abs_diff_eq!(value.re, 10.0, epsilon = 1.0e-12);
    }

    #[test]
    fn test_unsupported_functions() {
        for input in ["re(x)", "im(x)", "arg(x)", "conj(x)", "2 * conj(x + 1)"] {
            assert!(matches!(derive(input), Err(EvalError::UnsupportedOperation(_))), "{}", input);
        }
        // constant with respect to x
        assert_eq!(derive("re(y)").unwrap(), AstNode::zero());
    }
}
