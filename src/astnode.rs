//! # astnode.rs
//!
//! The abstract syntax tree produced by the parser and consumed by the
//! evaluator, the differentiator, and the solver.
//!
//! It provides:
//! - The [`AstNode`] variants (numbers, identifiers, operators, function calls)
//! - Helper constructors used by the differentiator
//! - `Display` rendering with minimal parentheses; the rendered text parses
//!   back to a tree with the same value
//! - [`AstNode::simplify`], a light constant-folding pass
//!
//! # Notes
//! - Trees are immutable once built. Every transformation returns a new tree.
//! - Constants (`pi`, `e`, `i`) stay as identifiers and are resolved at evaluation.

use crate::complex::ComplexOps;
use crate::functions::FunctionKind;
use crate::operators::{BinaryOperatorKind, UnaryOperatorKind, UNARY_PRECEDENCE};

use num_complex::Complex;
use num_traits::{One, Zero};

/// Precedence of nodes that never need parentheses.
const ATOM_PRECEDENCE: u8 = u8::MAX;

/// Abstract Syntax Tree (AST) node representing a mathematical expression.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Numeric literal.
    Number(Complex<f64>),

    /// Variable or constant reference, resolved during evaluation.
    Identifier(String),

    /// Unary operator applied to an expression.
    UnaryOperator {
        kind: UnaryOperatorKind,
        expr: Box<AstNode>,
    },

    /// Binary operator applied to left and right expressions.
    BinaryOperator {
        kind: BinaryOperatorKind,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },

    /// Call of a built-in single-argument function.
    FunctionCall {
        kind: FunctionKind,
        arg: Box<AstNode>,
    },
}

/// AstNode helper impl to create new AstNode
impl AstNode {
    /// Create a number 0 AST node.
    pub fn zero() -> Self {
        Self::Number(Complex::zero())
    }

    /// Create a number 1 AST node.
    pub fn one() -> Self {
        Self::Number(Complex::one())
    }

    /// Create a real number AST node.
    pub fn real(value: f64) -> Self {
        Self::Number(Complex::new(value, 0.0))
    }

    /// Create an identifier AST node.
    pub fn identifier(name: &str) -> Self {
        Self::Identifier(name.to_string())
    }

    /// Create a function call AST node `kind(self)`.
    pub fn call(self, kind: FunctionKind) -> Self {
        Self::FunctionCall { kind, arg: Box::new(self) }
    }

    fn binary(kind: BinaryOperatorKind, left: Self, right: Self) -> Self {
        Self::BinaryOperator {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Internal helper to create a negative AST node `-self`.
    pub fn negative(self) -> Self {
        Self::UnaryOperator {
            kind: UnaryOperatorKind::Negative,
            expr: Box::new(self),
        }
    }

    /// Internal helper to create `self ^ exp`.
    pub fn pow(self, exp: Self) -> Self {
        Self::binary(BinaryOperatorKind::Pow, self, exp)
    }

    /// Internal helper to create `self ^ n` for a real constant `n`.
    pub fn powf(self, n: f64) -> Self {
        self.pow(Self::real(n))
    }

    /// Returns the value if the node is a number literal.
    pub fn as_number(&self) -> Option<Complex<f64>> {
        match self {
            Self::Number(z) => Some(*z),
            _ => None,
        }
    }

    fn is_number(&self, value: f64) -> bool {
        matches!(self, Self::Number(z) if *z == Complex::new(value, 0.0))
    }

    /// Returns true if the tree contains an operation that fails for some
    /// finite operands: `/`, `^` or `tan`.
    pub fn has_partial_operation(&self) -> bool {
        match self {
            Self::Number(_) | Self::Identifier(_) => false,
            Self::UnaryOperator { expr, .. } => expr.has_partial_operation(),
            Self::BinaryOperator { kind: BinaryOperatorKind::Div | BinaryOperatorKind::Pow, .. } => true,
            Self::BinaryOperator { left, right, .. } => {
                left.has_partial_operation() || right.has_partial_operation()
            },
            Self::FunctionCall { kind: FunctionKind::Tan, .. } => true,
            Self::FunctionCall { arg, .. } => arg.has_partial_operation(),
        }
    }

    /// Returns true if the identifier `name` occurs anywhere in the tree.
    pub fn depends_on(&self, name: &str) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Identifier(id) => id == name,
            Self::UnaryOperator { expr, .. } => expr.depends_on(name),
            Self::BinaryOperator { left, right, .. } => left.depends_on(name) || right.depends_on(name),
            Self::FunctionCall { arg, .. } => arg.depends_on(name),
        }
    }
}

impl std::ops::Add<AstNode> for AstNode {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::binary(BinaryOperatorKind::Add, self, rhs)
    }
}

impl std::ops::Sub<AstNode> for AstNode {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::binary(BinaryOperatorKind::Sub, self, rhs)
    }
}

impl std::ops::Mul<AstNode> for AstNode {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self::binary(BinaryOperatorKind::Mul, self, rhs)
    }
}

impl std::ops::Div<AstNode> for AstNode {
    type Output = Self;
    fn div(self, rhs: Self) -> Self::Output {
        Self::binary(BinaryOperatorKind::Div, self, rhs)
    }
}

impl std::ops::Neg for AstNode {
    type Output = Self;
    fn neg(self) -> Self::Output {
        self.negative()
    }
}

/// Writes a real number so that the lexer reads back the same `f64`.
fn write_real(f: &mut std::fmt::Formatter<'_>, x: f64) -> std::fmt::Result {
    let magnitude = x.abs();
    if magnitude == 0.0 || (1.0e-7..1.0e21).contains(&magnitude) {
        write!(f, "{}", x)
    } else {
        write!(f, "{:e}", x)
    }
}

/// AstNode impl `Display` and its helpers
impl AstNode {
    /// Binding strength of the node's outermost operator when rendered.
    fn precedence(&self) -> u8 {
        match self {
            Self::Number(z) => {
                if z.re != 0.0 && z.im != 0.0 {
                    BinaryOperatorKind::Add.info().precedence
                } else if z.re < 0.0 || z.im < 0.0 {
                    UNARY_PRECEDENCE
                } else {
                    ATOM_PRECEDENCE
                }
            },
            Self::Identifier(_) | Self::FunctionCall { .. } => ATOM_PRECEDENCE,
            Self::UnaryOperator { .. } => UNARY_PRECEDENCE,
            Self::BinaryOperator { kind, .. } => kind.info().precedence,
        }
    }

    /// Renders `child`, wrapped in parentheses when it binds looser than `min`.
    fn fmt_child(child: &Self, min: u8, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if child.precedence() < min {
            write!(f, "({})", child)
        } else {
            write!(f, "{}", child)
        }
    }

    fn fmt_number(z: &Complex<f64>, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if z.im == 0.0 {
            return write_real(f, z.re);
        }
        if z.re != 0.0 {
            write_real(f, z.re)?;
            write!(f, " {} ", if z.im < 0.0 { "-" } else { "+" })?;
            write_real(f, z.im.abs())?;
        } else {
            write_real(f, z.im)?;
        }
        write!(f, "i")
    }
}

impl std::fmt::Display for AstNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(z) => Self::fmt_number(z, f),
            Self::Identifier(name) => write!(f, "{}", name),
            Self::UnaryOperator { kind, expr } => {
                write!(f, "{}", kind)?;
                Self::fmt_child(expr, UNARY_PRECEDENCE, f)
            },
            Self::BinaryOperator { kind, left, right } => {
                let info = kind.info();
                let (left_min, right_min) = if info.is_left_assoc {
                    (info.precedence, info.precedence + 1)
                } else {
                    (info.precedence + 1, info.precedence)
                };
                Self::fmt_child(left, left_min, f)?;
                match kind {
                    BinaryOperatorKind::Pow => write!(f, "{}", kind)?,
                    _ => write!(f, " {} ", kind)?,
                }
                Self::fmt_child(right, right_min, f)
            },
            Self::FunctionCall { kind, arg } => write!(f, "{}({})", kind, arg),
        }
    }
}

/// AstNode impl `simplify` and its helper impls
impl AstNode {
    /// Simplifies the AST by folding constant sub-expressions and removing
    /// identity operations (`x + 0`, `x * 1`, `x ^ 1`, ...).
    ///
    /// Folding only happens when the folded value is finite and well defined,
    /// so a sub-expression such as `1 / 0` is kept and still fails at evaluation.
    /// Rewrites that drop an operand (`u - u`, `0 * u`, `u ^ 0`, `1 ^ u`) are
    /// skipped when `u` contains a [partial operation](Self::has_partial_operation).
    /// They still assume every identifier in `u` is bound and its value is finite.
    pub fn simplify(self) -> Self {
        match self {
            Self::UnaryOperator { kind, expr } => Self::fold_unary(kind, expr.simplify()),
            Self::BinaryOperator { kind, left, right } => Self::fold_binary(kind, *left, *right),
            Self::FunctionCall { kind, arg } => {
                let arg = arg.simplify();
                if let Some(z) = arg.as_number() {
                    if let Ok(v) = kind.apply(z) {
                        if v.is_finite_value() {
                            return Self::Number(v);
                        }
                    }
                }
                arg.call(kind)
            },
            other => other,
        }
    }

    fn fold_unary(kind: UnaryOperatorKind, expr: Self) -> Self {
        match (kind, expr) {
            (UnaryOperatorKind::Positive, expr) => expr,
            (UnaryOperatorKind::Negative, Self::Number(z)) => Self::Number(kind.apply(z)),
            // --x -> x
            (UnaryOperatorKind::Negative, Self::UnaryOperator { kind: UnaryOperatorKind::Negative, expr }) => *expr,
            (kind, expr) => Self::UnaryOperator { kind, expr: Box::new(expr) },
        }
    }

    /// Internal helper to fold a binary operator with two AST nodes if possible.
    fn fold_binary(kind: BinaryOperatorKind, left: Self, right: Self) -> Self {
        let left = left.simplify();
        let right = right.simplify();

        if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
            if let Ok(v) = kind.apply(l, r) {
                if v.is_finite_value() {
                    return Self::Number(v);
                }
            }
        }

        match kind {
            BinaryOperatorKind::Add => Self::fold_add(left, right),
            BinaryOperatorKind::Sub => Self::fold_sub(left, right),
            BinaryOperatorKind::Mul => Self::fold_mul(left, right),
            BinaryOperatorKind::Div => Self::fold_div(left, right),
            BinaryOperatorKind::Pow => Self::fold_pow(left, right),
        }
    }

    /// Folds `left + right`.
    ///
    /// Nested additions are flattened so that all numeric terms are summed
    /// into one constant, placed last: `2 + x + 3` -> `x + 5`.
    fn fold_add(left: Self, right: Self) -> Self {
        let mut terms = Vec::new();
        Self::collect_add_terms(left, &mut terms);
        Self::collect_add_terms(right, &mut terms);

        let mut const_sum = Complex::zero();
        let mut rest = Vec::new();
        for term in terms {
            match term {
                Self::Number(z) => const_sum += z,
                other => rest.push(other),
            }
        }
        if !const_sum.is_zero() {
            rest.push(Self::Number(const_sum));
        }

        let mut rest = rest.into_iter();
        let Some(first) = rest.next() else {
            return Self::zero();
        };
        rest.fold(first, |acc, term| match term {
            // a + (-b) -> a - b
            Self::UnaryOperator { kind: UnaryOperatorKind::Negative, expr } => acc - *expr,
            Self::Number(z) if z.im == 0.0 && z.re < 0.0 => acc - Self::real(-z.re),
            term => acc + term,
        })
    }

    /// Recursively collects terms of a nested addition into a flat list.
    fn collect_add_terms(node: Self, terms: &mut Vec<Self>) {
        match node {
            Self::BinaryOperator { kind: BinaryOperatorKind::Add, left, right } => {
                Self::collect_add_terms(*left, terms);
                Self::collect_add_terms(*right, terms);
            },
            other => terms.push(other),
        }
    }

    fn fold_sub(left: Self, right: Self) -> Self {
        if right.is_number(0.0) {
            return left;
        }
        if left.is_number(0.0) {
            return Self::fold_unary(UnaryOperatorKind::Negative, right);
        }
        if left == right && !left.has_partial_operation() {
            return Self::zero();
        }
        match right {
            // a - (-b) -> a + b
            Self::UnaryOperator { kind: UnaryOperatorKind::Negative, expr } => Self::fold_add(left, *expr),
            right => left - right,
        }
    }

    /// Folds `left * right`.
    ///
    /// Nested products are flattened; numeric factors are multiplied into one
    /// constant that always comes first: `x * 2 * y * 3` -> `6 * x * y`.
    fn fold_mul(left: Self, right: Self) -> Self {
        let mut factors = Vec::new();
        Self::collect_mul_terms(left, &mut factors);
        Self::collect_mul_terms(right, &mut factors);

        let mut const_product = Complex::one();
        let mut negate = false;
        let mut rest = Vec::new();
        for factor in factors {
            match factor {
                Self::Number(z) => const_product = const_product * z,
                Self::UnaryOperator { kind: UnaryOperatorKind::Negative, expr } => {
                    negate = !negate;
                    rest.push(*expr);
                },
                other => rest.push(other),
            }
        }
        if negate {
            const_product = -const_product;
        }

        if const_product.is_zero() && !rest.iter().any(Self::has_partial_operation) {
            return Self::zero();
        }

        let mut rest = rest.into_iter();
        let Some(first) = rest.next() else {
            return Self::Number(const_product);
        };
        let first = if const_product == Complex::new(1.0, 0.0) {
            first
        } else if const_product == Complex::new(-1.0, 0.0) {
            first.negative()
        } else {
            Self::Number(const_product) * first
        };
        rest.fold(first, |acc, factor| acc * factor)
    }

    /// Recursively collects factors of a nested multiplication into a flat list.
    fn collect_mul_terms(node: Self, factors: &mut Vec<Self>) {
        match node {
            Self::BinaryOperator { kind: BinaryOperatorKind::Mul, left, right } => {
                Self::collect_mul_terms(*left, factors);
                Self::collect_mul_terms(*right, factors);
            },
            other => factors.push(other),
        }
    }

    fn fold_div(left: Self, right: Self) -> Self {
        if right.is_number(1.0) {
            return left;
        }
        if left.is_number(0.0) && right.as_number().is_some_and(|r| !r.is_zero()) {
            return Self::zero();
        }
        left / right
    }

    fn fold_pow(base: Self, exp: Self) -> Self {
        if exp.is_number(1.0) {
            // x^1 -> x
            return base;
        }
        if exp.is_number(0.0) && !base.has_partial_operation() {
            // x^0 -> 1
            return Self::one();
        }
        if base.is_number(1.0) && !exp.has_partial_operation() {
            // 1^x -> 1
            return Self::one();
        }
        base.pow(exp)
    }
}

#[cfg(test)]
mod astnode_display_tests {
    use super::*;

    fn x() -> AstNode {
        AstNode::identifier("x")
    }

    #[test]
    fn test_numbers() {
        assert_eq!(AstNode::real(3.5).to_string(), "3.5");
        assert_eq!(AstNode::real(2.0).to_string(), "2");
        assert_eq!(AstNode::real(-2.0).to_string(), "-2");
        assert_eq!(AstNode::Number(Complex::new(0.0, 2.0)).to_string(), "2i");
        assert_eq!(AstNode::Number(Complex::new(1.0, -2.0)).to_string(), "1 - 2i");
        assert_eq!(AstNode::real(1.0e30).to_string(), "1e30");
        assert_eq!(AstNode::real(2.5e-9).to_string(), "2.5e-9");
    }

    #[test]
    fn test_minimal_parentheses() {
        // (x + 1) * 2
        let node = (x() + AstNode::one()) * AstNode::real(2.0);
        assert_eq!(node.to_string(), "(x + 1) * 2");

        // x - (1 - x)
        let node = x() - (AstNode::one() - x());
        assert_eq!(node.to_string(), "x - (1 - x)");

        // (x - 1) - x
        let node = (x() - AstNode::one()) - x();
        assert_eq!(node.to_string(), "x - 1 - x");

        // x ^ (2 ^ 3) is right-associative
        let node = x().pow(AstNode::real(2.0).pow(AstNode::real(3.0)));
        assert_eq!(node.to_string(), "x^2^3");

        // (x ^ 2) ^ 3
        let node = x().pow(AstNode::real(2.0)).pow(AstNode::real(3.0));
        assert_eq!(node.to_string(), "(x^2)^3");
    }

    #[test]
    fn test_unary_and_negative_numbers() {
        assert_eq!((-x()).to_string(), "-x");
        assert_eq!((-(x() + AstNode::one())).to_string(), "-(x + 1)");
        assert_eq!((-x().pow(AstNode::real(2.0))).to_string(), "-x^2");
        assert_eq!(x().pow(-x()).to_string(), "x^(-x)");
        assert_eq!(AstNode::real(-2.0).pow(AstNode::real(2.0)).to_string(), "(-2)^2");
        assert_eq!((x() * AstNode::real(-2.0)).to_string(), "x * -2");
        assert_eq!(
            (AstNode::Number(Complex::new(1.0, 1.0)) * x()).to_string(),
            "(1 + 1i) * x"
        );
    }

    #[test]
    fn test_function_call() {
        let node = (x() * AstNode::real(2.0)).call(FunctionKind::Sin);
        assert_eq!(node.to_string(), "sin(x * 2)");
    }

    #[test]
    fn test_depends_on() {
        let node = (x() + AstNode::identifier("a")).call(FunctionKind::Cos);
        assert!(node.depends_on("x"));
        assert!(node.depends_on("a"));
        assert!(!node.depends_on("y"));
        assert!(!AstNode::real(1.0).depends_on("x"));
    }
}

#[cfg(test)]
mod astnode_simplify_tests {
    use super::*;

    fn x() -> AstNode {
        AstNode::identifier("x")
    }

    #[test]
    fn test_constant_folding() {
        let node = AstNode::real(2.0) + AstNode::real(3.0) * AstNode::real(4.0);
        assert_eq!(node.simplify(), AstNode::real(14.0));

        let node = AstNode::real(0.0).call(FunctionKind::Cos);
        assert_eq!(node.simplify(), AstNode::real(1.0));
    }

    #[test]
    fn test_keeps_failing_folds() {
        let node = AstNode::one() / AstNode::zero();
        assert_eq!(node.clone().simplify(), node);
    }

    #[test]
    fn test_identities() {
        assert_eq!((x() + AstNode::zero()).simplify(), x());
        assert_eq!((AstNode::zero() + x()).simplify(), x());
        assert_eq!((x() - AstNode::zero()).simplify(), x());
        assert_eq!((AstNode::zero() - x()).simplify(), -x());
        assert_eq!((x() * AstNode::one()).simplify(), x());
        assert_eq!((x() * AstNode::zero()).simplify(), AstNode::zero());
        assert_eq!((x() / AstNode::one()).simplify(), x());
        assert_eq!(x().pow(AstNode::one()).simplify(), x());
        assert_eq!(x().pow(AstNode::zero()).simplify(), AstNode::one());
        assert_eq!((-(-x())).simplify(), x());
        assert_eq!((x() - x()).simplify(), AstNode::zero());
    }

    #[test]
    fn test_keeps_operands_that_may_fail() {
        let undefined = AstNode::one() / x();
        let node = undefined.clone() - undefined.clone();
        assert_eq!(node.clone().simplify(), node);

        let node = AstNode::zero() * undefined.clone();
        assert_eq!(node.simplify().to_string(), "0 * (1 / x)");

        let node = undefined.clone().pow(AstNode::zero());
        assert_eq!(node.clone().simplify(), node);

        let node = AstNode::one().pow(x().call(FunctionKind::Tan));
        assert_eq!(node.clone().simplify(), node);
    }

    #[test]
    fn test_partial_operation() {
        assert!((AstNode::one() / x()).has_partial_operation());
        assert!(x().pow(AstNode::real(2.0)).has_partial_operation());
        assert!((-x().call(FunctionKind::Tan)).has_partial_operation());
        assert!(!(x() * x() + x().call(FunctionKind::Sin)).has_partial_operation());
    }

    #[test]
    fn test_constant_factor_first() {
        let node = x() * AstNode::real(2.0) * AstNode::identifier("y") * AstNode::real(3.0);
        assert_eq!(node.simplify().to_string(), "6 * x * y");
    }

    #[test]
    fn test_constant_term_last() {
        let node = AstNode::real(2.0) + x() + AstNode::real(3.0);
        assert_eq!(node.simplify().to_string(), "x + 5");

        let node = x() + AstNode::real(-3.0);
        assert_eq!(node.simplify().to_string(), "x - 3");
    }

    #[test]
    fn test_negative_factors() {
        let node = -x() * AstNode::real(3.0);
        assert_eq!(node.simplify().to_string(), "-3 * x");

        let node = AstNode::real(-1.0) * x().call(FunctionKind::Sin);
        assert_eq!(node.simplify().to_string(), "-sin(x)");
    }
}
