//! # complexcalc
//!
//! `complexcalc` is the expression engine behind a scientific calculator with
//! **complex number** support. It parses calculator input, evaluates it,
//! formats the result for display, and offers the calculator's advanced
//! operations: linear and quadratic equation solving, symbolic derivatives,
//! and sampling of an expression for plotting.
//!
//! ## Overview
//! - Parse expressions with real and imaginary literals (`2.5`, `3i`), the
//!   constants `pi`, `e` and `i`, and a closed set of functions.
//! - Evaluate on the principal branch, so `sqrt(-4)` is `2i` instead of an error.
//! - Format results with a fixed number of significant digits (`0.1 + 0.2` is `0.3`).
//! - Solve `left = right` for an unknown that appears linearly.
//! - Differentiate symbolically and render the simplified derivative.
//! - Sample `left = right` over a real parameter for a plot.
//!
//! Input text is normalized (calculator glyphs such as `×`, `÷`, `π`),
//! split into lexemes, and converted to an [`AstNode`](astnode::AstNode) with
//! the Shunting-Yard algorithm. Every operation works on that tree.
//!
//! ## Example
//! ```rust
//! use complexcalc::{evaluate, solve_linear, differentiate, generate_graph_points};
//!
//! assert_eq!(evaluate("2 + 3 * 4"), Ok("14".to_string()));
//! assert_eq!(evaluate("sqrt(-4)"), Ok("2i".to_string()));
//! assert_eq!(evaluate("e ^ (i × π)"), Ok("-1".to_string()));
//! assert_eq!(solve_linear("2*x + 3 = 7"), Ok("x = 2".to_string()));
//! assert_eq!(differentiate("x^2 * sin(x)", "x"), Ok("2 * x * sin(x) + x^2 * cos(x)".to_string()));
//! assert_eq!(generate_graph_points("a^2 = 0", 10).len(), 11);
//! ```
//!
//! ## Example: Configured Engine
//! ```rust
//! use complexcalc::{Engine, EvalError, FunctionKind};
//!
//! let engine = Engine::builder()
//!     .with_precision(4)
//!     .with_functions(&[FunctionKind::Sqrt, FunctionKind::Abs])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(engine.evaluate("sqrt(2)"), Ok("1.414".to_string()));
//! assert!(matches!(engine.evaluate("sin(1)"), Err(EvalError::SyntaxError(_))));
//! ```
//!
//! ## Example: Retrieving All Names
//! ```rust
//! use complexcalc::variable::constant;
//! use complexcalc::operators::{UnaryOperatorKind, BinaryOperatorKind};
//! use complexcalc::FunctionKind;
//!
//! println!("Constants: {:?}", constant::names());
//! println!("Unary Operators: {:?}", UnaryOperatorKind::names());
//! println!("Binary Operators: {:?}", BinaryOperatorKind::names());
//! println!("Functions: {:?}", FunctionKind::names());
//! ```
//!
//! ## License
//! Licensed under either **MIT** or **Apache-2.0** at your option.

pub mod astnode;
pub mod complex;
mod derivative;
pub mod engine;
pub mod error;
mod evaluator;
pub mod format;
pub mod functions;
pub mod graph;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod solver;
pub mod variable;

pub use engine::{Calculation, Engine, EngineBuilder, EngineConfig, Mode};
pub use error::{EvalError, Result};
pub use functions::FunctionKind;
pub use graph::GraphPoint;
pub use variable::Environment;

use num_complex::Complex;
use std::sync::OnceLock;

/// Engine with the default configuration, shared by the free functions.
fn default_engine() -> &'static Engine {
    static ENGINE: OnceLock<Engine> = OnceLock::new();
    ENGINE.get_or_init(Engine::default)
}

/// Evaluates an expression and formats the result.
///
/// # Parameters
/// - `expression`: calculator input such as `"2 + 3 * 4"` or `"sqrt(-4)"`.
///
/// # Returns
/// The formatted value (`"14"`, `"2i"`, `"3 - 4i"`), or the [`EvalError`]
/// that stopped the evaluation. A blank expression evaluates to `"0"`.
///
/// # Example
/// ```rust
/// use complexcalc::{evaluate, EvalError};
///
/// assert_eq!(evaluate("3.5"), Ok("3.5".to_string()));
/// assert_eq!(evaluate("1 / 0"), Err(EvalError::DivisionByZero));
/// ```
pub fn evaluate(expression: &str) -> Result<String> {
    default_engine().evaluate(expression)
}

/// Evaluates an expression with caller bindings and returns the raw value.
///
/// # Example
/// ```rust
/// use complexcalc::{evaluate_with, Environment};
/// use num_complex::Complex;
///
/// let env = Environment::from(&[("x", 2.0)]);
/// assert_eq!(evaluate_with("x^3", &env), Ok(Complex::new(8.0, 0.0)));
/// ```
pub fn evaluate_with(expression: &str, env: &Environment) -> Result<Complex<f64>> {
    default_engine().evaluate_with(expression, env)
}

/// Returns true if `expression` evaluates without error.
pub fn is_valid(expression: &str) -> bool {
    default_engine().is_valid(expression)
}

/// Solves `left = right` for `x`, assuming the equation is linear in `x`.
///
/// # Returns
/// `"x = <root>"`, [`EvalError::MalformedEquation`] when the text is not a
/// single equation, or [`EvalError::DegenerateEquation`] when `x` cancels out.
///
/// # Example
/// ```rust
/// use complexcalc::{solve_linear, EvalError};
///
/// assert_eq!(solve_linear("2*x + 3 = 7"), Ok("x = 2".to_string()));
/// assert_eq!(solve_linear("x = x + 1"), Err(EvalError::DegenerateEquation));
/// ```
pub fn solve_linear(equation: &str) -> Result<String> {
    default_engine().solve_linear(equation)
}

/// Solves `a x^2 + b x + c = 0` for real coefficients.
///
/// # Example
/// ```rust
/// use complexcalc::solve_quadratic;
///
/// assert_eq!(solve_quadratic(1.0, -2.0, 1.0), Ok("x = 1".to_string()));
/// assert_eq!(solve_quadratic(1.0, 0.0, 1.0), Ok("x₁ = i, x₂ = -i".to_string()));
/// ```
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Result<String> {
    default_engine().solve_quadratic(a, b, c)
}

/// Differentiates `expression` with respect to `variable`.
///
/// # Returns
/// The simplified derivative as text, e.g. `"3 * x^2"` for `x^3`.
pub fn differentiate(expression: &str, variable: &str) -> Result<String> {
    default_engine().differentiate(expression, variable)
}

/// Samples the left side of `left = right` for `a` from `-5` to `5`.
///
/// Never fails as a whole: samples that do not evaluate are left out, and an
/// unusable equation gives an empty vector.
pub fn generate_graph_points(equation: &str, resolution: usize) -> Vec<GraphPoint> {
    default_engine().generate_graph_points(equation, resolution)
}

/// Runs one calculator request in `mode`.
///
/// # Example
/// ```rust
/// use complexcalc::{calculate, Mode};
///
/// let calculation = calculate(Mode::Equation, "x / 2 = 3").unwrap();
/// assert_eq!(calculation.to_string(), "x / 2 = 3 = x = 6");
/// ```
pub fn calculate(mode: Mode, input: &str) -> Result<Calculation> {
    default_engine().calculate(mode, input)
}
