//! # operators.rs
//!
//! Unary and binary operators of the expression grammar.
//!
//! Precedence, lowest first: `+ -`, `* /`, unary `-`/`+`, `^`.
//! `^` is right-associative, everything else is left-associative.

use crate::complex::ComplexOps;
use crate::error::Result;

use num_complex::Complex;

/// Precedence shared by every unary operator.
///
/// It sits above `*`/`/` and below `^`, so `-2 * 3` is `(-2) * 3` while
/// `-2 ^ 2` is `-(2 ^ 2)`.
pub const UNARY_PRECEDENCE: u8 = 2;

#[doc(hidden)]
/// Internal macro to define all unary operators.
///
/// It centralizes the enum variants, string representation, and apply logic for unary operators.
macro_rules! unary_operator_kind {
    ($($name:ident => { symbol: $symbol:expr, apply: $apply:expr }),* $(,)?) => {
        /// Represents a unary operator in a mathematical expression.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum UnaryOperatorKind {
            $($name),*
        }

        impl UnaryOperatorKind {
            /// Converts a string representation to a `UnaryOperatorKind`.
            pub fn from(s: &str) -> Option<Self> {
                match s {
                    $( $symbol => Some(Self::$name), )*
                    _ => None,
                }
            }

            /// Applies the unary operator to a complex number.
            pub fn apply(&self, x: Complex<f64>) -> Complex<f64> {
                match self {
                    $( Self::$name => $apply(x), )*
                }
            }

            /// Returns a list of all supported unary operator symbols.
            pub fn names() -> Vec<&'static str> {
                vec![$($symbol),*]
            }
        }

        impl std::fmt::Display for UnaryOperatorKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = match self {
                    $( Self::$name => $symbol, )*
                };
                write!(f, "{}", s)
            }
        }
    };
}

unary_operator_kind! {
    Positive => { symbol: "+", apply: |x: Complex<f64>| x },
    Negative => { symbol: "-", apply: |x: Complex<f64>| -x },
}

/// Information about a binary operator in a mathematical expression.
///
/// Contains the operator's precedence and associativity, which are used
/// when parsing expressions to determine the order of operations.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperatorInfo {
    /// Operator precedence (higher value means higher precedence).
    pub precedence: u8,

    /// Whether the operator is left-associative.
    pub is_left_assoc: bool,
}

#[doc(hidden)]
/// Internal macro to define all binary operators.
///
/// It centralizes the enum variants, string representation, precedence, associativity, and apply logic.
macro_rules! binary_operators {
    ($($name:ident => {
        symbol: $symbol:expr,
        precedence: $prec:expr,
        left_assoc: $assoc:expr,
        apply: $apply:expr
    }),* $(,)?) => {
        /// Represents a binary operator in a mathematical expression.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum BinaryOperatorKind {
            $($name),*
        }

        impl BinaryOperatorKind {
            /// Returns operator precedence and associativity.
            pub fn info(&self) -> BinaryOperatorInfo {
                match self {
                    $(Self::$name => BinaryOperatorInfo { precedence: $prec, is_left_assoc: $assoc },)*
                }
            }

            /// Converts a string to the corresponding operator.
            pub fn from(s: &str) -> Option<Self> {
                match s {
                    $($symbol => Some(Self::$name),)*
                    _ => None,
                }
            }

            /// Applies the operator to two complex numbers.
            ///
            /// Fails on division by zero, including `0 ^ b` with `re(b) < 0`.
            pub fn apply(&self, l: Complex<f64>, r: Complex<f64>) -> Result<Complex<f64>> {
                match self {
                    $(Self::$name => $apply(l, r),)*
                }
            }

            /// Returns a list of all supported binary operator symbols.
            pub fn names() -> Vec<&'static str> {
                vec![$($symbol),*]
            }
        }

        impl std::fmt::Display for BinaryOperatorKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = match self {
                    $(Self::$name => $symbol,)*
                };
                write!(f, "{}", s)
            }
        }
    };
}

binary_operators! {
    Add => { symbol: "+", precedence: 0, left_assoc: true,  apply: |l: Complex<f64>, r: Complex<f64>| Ok(l + r) },
    Sub => { symbol: "-", precedence: 0, left_assoc: true,  apply: |l: Complex<f64>, r: Complex<f64>| Ok(l - r) },
    Mul => { symbol: "*", precedence: 1, left_assoc: true,  apply: |l: Complex<f64>, r: Complex<f64>| Ok(mul(l, r)) },
    Div => { symbol: "/", precedence: 1, left_assoc: true,  apply: |l: Complex<f64>, r: Complex<f64>| l.checked_div(&r) },
    Pow => { symbol: "^", precedence: 3, left_assoc: false, apply: |l: Complex<f64>, r: Complex<f64>| l.principal_pow(&r) },
}

/// Multiplication that keeps real operands on the real line.
///
/// The generic formula would turn `inf * 0i` into `NaN` imaginary parts.
fn mul(l: Complex<f64>, r: Complex<f64>) -> Complex<f64> {
    if l.is_real() && r.is_real() {
        Complex::new(l.re * r.re, 0.0)
    } else {
        l * r
    }
}

#[cfg(test)]
mod unary_operator_kind_tests {
    use super::*;

    #[test]
    fn test_unary_operator_kind_from() {
        assert_eq!(UnaryOperatorKind::from("+"), Some(UnaryOperatorKind::Positive));
        assert_eq!(UnaryOperatorKind::from("-"), Some(UnaryOperatorKind::Negative));
        assert_eq!(UnaryOperatorKind::from("*"), None);
        assert_eq!(UnaryOperatorKind::from(""), None);
    }

    #[test]
    fn test_apply() {
        let x = Complex::new(2.0, -1.0);
        assert_eq!(UnaryOperatorKind::Positive.apply(x), x);
        assert_eq!(UnaryOperatorKind::Negative.apply(x), -x);
    }
}
