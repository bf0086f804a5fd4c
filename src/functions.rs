//! # functions.rs
//!
//! Built-in single-argument functions.
//!
//! The set is closed: every name the parser accepts maps to one
//! [`FunctionKind`] variant, and every variant is matched exhaustively when it
//! is evaluated or differentiated. Adding a function means adding one line to
//! the `functions!` invocation below plus its derivative rule.

use crate::complex::ComplexOps;
use crate::error::Result;

use num_complex::Complex;
use serde::{Deserialize, Serialize};

#[doc(hidden)]
/// Internal macro for defining built-in mathematical functions.
///
/// It generates the [`FunctionKind`] enum and its implementations
/// (`from`, `name`, `names`, `apply`, and `Display`) from a single table, so
/// parsing, evaluation and rendering cannot drift apart.
macro_rules! functions {
    ($( $variant: ident => {
        name: $name:expr,
        apply: |$a:ident| $body:expr
    }, )*) => {
        /// A built-in function applied to one complex argument.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum FunctionKind {
            $( $variant, )*
        }

        impl FunctionKind {
            /// Every built-in function, in declaration order.
            pub const ALL: &'static [FunctionKind] = &[ $( FunctionKind::$variant, )* ];

            /// Converts a function name into a `FunctionKind`.
            ///
            /// Returns `None` if the string does not match any built-in function.
            pub fn from(s: &str) -> Option<Self> {
                match s {
                    $( $name => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// Returns the canonical name of the function.
            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )*
                }
            }

            /// Returns a list of all supported function names.
            pub fn names() -> Vec<&'static str> {
                vec![$($name),*]
            }

            /// Applies the function to its argument.
            pub fn apply(&self, arg: Complex<f64>) -> Result<Complex<f64>> {
                match self {
                    $( Self::$variant => {
                        let $a = arg;
                        $body
                    }, )*
                }
            }
        }

        impl std::fmt::Display for FunctionKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.name())
            }
        }
    };
}

functions! {
    Sin     => { name: "sin",   apply: |z| Ok(z.sine()) },
    Cos     => { name: "cos",   apply: |z| Ok(z.cosine()) },
    Tan     => { name: "tan",   apply: |z| z.tangent() },
    Asin    => { name: "asin",  apply: |z| Ok(z.arcsine()) },
    Acos    => { name: "acos",  apply: |z| Ok(z.arccosine()) },
    Atan    => { name: "atan",  apply: |z| Ok(z.arctangent()) },
    Log     => { name: "log",   apply: |z| Ok(z.principal_log10()) },
    Ln      => { name: "ln",    apply: |z| Ok(z.principal_ln()) },
    Sqrt    => { name: "sqrt",  apply: |z| Ok(z.principal_sqrt()) },
    Abs     => { name: "abs",   apply: |z| Ok(Complex::new(z.modulus(), 0.0)) },
    Arg     => { name: "arg",   apply: |z| Ok(Complex::new(z.argument(), 0.0)) },
    Re      => { name: "re",    apply: |z| Ok(Complex::new(z.re, 0.0)) },
    Im      => { name: "im",    apply: |z| Ok(Complex::new(z.im, 0.0)) },
    Exp     => { name: "exp",   apply: |z| Ok(z.exponential()) },
    Conj    => { name: "conj",  apply: |z| Ok(z.conjugate()) },
}
