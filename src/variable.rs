//! # variable.rs
//!
//! This module provides the [`Environment`] used to bind free identifiers during
//! evaluation, and the fixed constants (`pi`, `e`, `i`) every expression can use.
//!
//! An environment is scoped to a single evaluation call. The only bindings that
//! live longer are the constants, and they shadow any binding with the same
//! name.

use crate::error::{EvalError, Result};

use num_complex::Complex;
use phf::Map;
use phf_macros::phf_map;
use std::collections::HashMap;

/// Map of the built-in constants by their identifier.
static CONSTANTS: Map<&'static str, Complex<f64>> = phf_map! {
    "pi" => Complex::new(std::f64::consts::PI, 0.0),
    "e" => Complex::new(std::f64::consts::E, 0.0),
    "i" => Complex::new(0.0, 1.0),
};

pub mod constant {
    use super::CONSTANTS;
    use num_complex::Complex;

    /// Returns the value of a built-in constant, if `name` is one.
    pub fn get(name: &str) -> Option<Complex<f64>> {
        CONSTANTS.get(name).copied()
    }

    /// Returns true if `name` is a built-in constant.
    pub fn contains(name: &str) -> bool {
        CONSTANTS.contains_key(name)
    }

    /// Returns a list of supported constant names.
    pub fn names() -> Vec<&'static str> {
        CONSTANTS.keys().cloned().collect()
    }
}

/// Bindings from identifier names to complex values.
///
/// # Examples
///
/// ```
/// use complexcalc::variable::Environment;
/// use num_complex::Complex;
///
/// let mut env = Environment::default();
/// env.insert(&[("x", Complex::new(1.0, 0.0)), ("y", Complex::new(2.0, 3.0))]);
///
/// assert!(env.contains("x"));
/// assert_eq!(env.resolve("y"), Ok(Complex::new(2.0, 3.0)));
/// // constants are always visible
/// assert_eq!(env.resolve("i"), Ok(Complex::new(0.0, 1.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    table: HashMap<String, Complex<f64>>,
}

impl Environment {
    /// Creates a new empty `Environment`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs an `Environment` from a slice of key-value pairs.
    ///
    /// Values can be any type convertible into `Complex<f64>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use complexcalc::variable::Environment;
    ///
    /// let env = Environment::from(&[("a", 1.0), ("b", 2.0)]);
    /// assert!(env.contains("a"));
    /// ```
    pub fn from<V>(items: &[(&str, V)]) -> Self
    where
        V: Clone,
        Complex<f64>: From<V>,
    {
        let mut env = Self::new();
        env.insert(items);
        env
    }

    /// Inserts multiple bindings, replacing earlier values of the same name.
    pub fn insert<V>(&mut self, items: &[(&str, V)])
    where
        V: Clone,
        Complex<f64>: From<V>,
    {
        for (key, val) in items {
            self.table.insert(key.to_string(), Complex::from(val.clone()));
        }
    }

    /// Binds a single name.
    pub fn bind(&mut self, key: &str, value: Complex<f64>) {
        self.table.insert(key.to_string(), value);
    }

    /// Returns true if `key` is bound in this environment.
    ///
    /// Constants are not reported here; see [`constant::contains`].
    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Retrieves the bound value of `key`, ignoring constants.
    pub fn get(&self, key: &str) -> Option<&Complex<f64>> {
        self.table.get(key)
    }

    /// Looks up an identifier the way the evaluator does.
    ///
    /// Constants win over bindings.
    ///
    /// # Errors
    /// [`EvalError::UnknownIdentifier`] if `name` is neither a constant nor bound.
    pub fn resolve(&self, name: &str) -> Result<Complex<f64>> {
        constant::get(name)
            .or_else(|| self.table.get(name).copied())
            .ok_or_else(|| EvalError::UnknownIdentifier(name.to_string()))
    }

    /// Removes every binding.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
