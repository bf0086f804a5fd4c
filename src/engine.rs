//! # engine.rs
//!
//! The calculator engine: configuration, the optional parse cache, and the
//! public operations (evaluate, solve, differentiate, sample).
//!
//! All settings live in an [`EngineConfig`] owned by one [`Engine`]; there is
//! no process-wide state. An `Engine` is `Send + Sync` and can be shared
//! between threads; the parse cache is the only state that outlives a call.

use crate::astnode::AstNode;
use crate::error::{EvalError, Result};
use crate::format::{NumberFormat, DEFAULT_PRECISION, DEFAULT_ZERO_THRESHOLD};
use crate::functions::FunctionKind;
use crate::graph::{self, GraphPoint, SweepRange};
use crate::parser;
use crate::solver::{self, QuadraticRoots};
use crate::variable::{constant, Environment};

use log::{debug, warn};
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Largest precision an `f64` can carry meaningfully.
const MAX_PRECISION: usize = 17;

/// Default number of cached parse trees.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Settings of an [`Engine`].
///
/// Missing fields take their default value when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Significant digits of formatted results.
    pub precision: usize,

    /// Components with a smaller magnitude are displayed as zero.
    pub zero_threshold: f64,

    /// Unknown isolated by the linear solver.
    pub solve_variable: String,

    /// Parameter swept by the graph sampler.
    pub sweep_variable: String,

    pub sweep_start: f64,
    pub sweep_end: f64,

    /// Functions the parser accepts.
    pub functions: Vec<FunctionKind>,

    /// Maximum number of cached parse trees; `0` disables the cache.
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let sweep = SweepRange::default();
        Self {
            precision: DEFAULT_PRECISION,
            zero_threshold: DEFAULT_ZERO_THRESHOLD,
            solve_variable: "x".to_string(),
            sweep_variable: "a".to_string(),
            sweep_start: sweep.start,
            sweep_end: sweep.end,
            functions: FunctionKind::ALL.to_vec(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Checks that the settings describe a usable engine.
    ///
    /// # Errors
    /// [`EvalError::DomainError`] naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_PRECISION).contains(&self.precision) {
            return Err(EvalError::DomainError(format!(
                "precision must be between 1 and {}, got {}",
                MAX_PRECISION, self.precision
            )));
        }
        if !(self.zero_threshold.is_finite() && self.zero_threshold >= 0.0) {
            return Err(EvalError::DomainError(format!(
                "zero threshold must be a finite non-negative number, got {}",
                self.zero_threshold
            )));
        }
        if !(self.sweep_start.is_finite() && self.sweep_end.is_finite() && self.sweep_start < self.sweep_end) {
            return Err(EvalError::DomainError(format!(
                "sweep range {}..{} is empty or not finite",
                self.sweep_start, self.sweep_end
            )));
        }
        for (what, name) in [("solve", &self.solve_variable), ("sweep", &self.sweep_variable)] {
            if !is_identifier(name) {
                return Err(EvalError::DomainError(format!("invalid {} variable \"{}\"", what, name)));
            }
        }
        Ok(())
    }

    pub fn sweep_range(&self) -> SweepRange {
        SweepRange { start: self.sweep_start, end: self.sweep_end }
    }
}

/// Returns true if `name` can be bound as a variable: an identifier that is
/// neither a function name nor a constant.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && FunctionKind::from(name).is_none()
        && !constant::contains(name)
}

/// Builder for [`Engine`].
///
/// # Examples
///
/// ```
/// use complexcalc::engine::EngineBuilder;
///
/// let engine = EngineBuilder::new()
///     .with_precision(6)
///     .with_solve_variable("t")
///     .build()
///     .unwrap();
///
/// assert_eq!(engine.evaluate("1 / 3"), Ok("0.333333".to_string()));
/// assert_eq!(engine.solve_linear("2*t = 1"), Ok("t = 0.5".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    /// Creates a builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the number of significant digits of formatted results.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.config.precision = precision;
        self
    }

    pub fn with_zero_threshold(mut self, zero_threshold: f64) -> Self {
        self.config.zero_threshold = zero_threshold;
        self
    }

    /// Sets the unknown of [`Engine::solve_linear`].
    pub fn with_solve_variable(mut self, name: &str) -> Self {
        self.config.solve_variable = name.to_string();
        self
    }

    /// Sets the parameter bound by [`Engine::generate_graph_points`].
    pub fn with_sweep_variable(mut self, name: &str) -> Self {
        self.config.sweep_variable = name.to_string();
        self
    }

    pub fn with_sweep_range(mut self, start: f64, end: f64) -> Self {
        self.config.sweep_start = start;
        self.config.sweep_end = end;
        self
    }

    /// Restricts the functions the parser accepts.
    pub fn with_functions(mut self, functions: &[FunctionKind]) -> Self {
        self.config.functions = functions.to_vec();
        self
    }

    /// Sets the parse cache size; `0` disables caching.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Validates the configuration and creates the engine.
    ///
    /// # Errors
    /// [`EvalError::DomainError`] if the configuration is invalid.
    pub fn build(self) -> Result<Engine> {
        self.config.validate()?;
        Ok(Engine::from_config(self.config))
    }
}

/// Read-through cache of parse trees keyed by the exact expression text.
///
/// Entries are never evicted; once `capacity` trees are stored, new ones are
/// parsed but not kept. A poisoned lock behaves like a miss.
#[derive(Debug, Default)]
pub struct ParseCache {
    capacity: usize,
    entries: RwLock<HashMap<String, Arc<AstNode>>>,
}

impl ParseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<AstNode>> {
        self.entries.read().ok()?.get(key).cloned()
    }

    pub fn insert(&self, key: &str, node: Arc<AstNode>) {
        if self.capacity == 0 {
            return;
        }
        if let Ok(mut entries) = self.entries.write() {
            if entries.len() < self.capacity {
                entries.insert(key.to_string(), node);
            }
        }
    }

    /// Returns the cached tree for `key`, or parses and caches it.
    ///
    /// Parse failures are returned as-is and never cached.
    pub fn get_or_parse<F>(&self, key: &str, parse: F) -> Result<Arc<AstNode>>
    where
        F: FnOnce(&str) -> Result<AstNode>,
    {
        if let Some(node) = self.get(key) {
            return Ok(node);
        }
        let node = Arc::new(parse(key)?);
        self.insert(key, Arc::clone(&node));
        Ok(node)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

/// Calculator mode selected by the user interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Standard,
    /// Inputs containing `=` are solved for the unknown.
    Equation,
    Complex,
}

impl Mode {
    /// The mode the "Mode" key switches to: standard, equation, complex, and around.
    pub fn next(self) -> Self {
        match self {
            Self::Standard => Self::Equation,
            Self::Equation => Self::Complex,
            Self::Complex => Self::Standard,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Standard => "standard",
            Self::Equation => "equation",
            Self::Complex => "complex",
        };
        write!(f, "{}", s)
    }
}

/// A finished calculation, as handed to an external history store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    pub input: String,
    pub result: String,
}

impl std::fmt::Display for Calculation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.input, self.result)
    }
}

/// Expression engine.
///
/// # Examples
///
/// ```
/// use complexcalc::Engine;
///
/// let engine = Engine::default();
/// assert_eq!(engine.evaluate("2 + 3 * 4"), Ok("14".to_string()));
/// assert_eq!(engine.evaluate("sqrt(-4)"), Ok("2i".to_string()));
/// assert_eq!(engine.solve_linear("2*x + 3 = 7"), Ok("x = 2".to_string()));
/// assert_eq!(engine.differentiate("x^3", "x"), Ok("3 * x^2".to_string()));
/// assert_eq!(engine.generate_graph_points("a = a", 10).len(), 11);
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    format: NumberFormat,
    cache: ParseCache,
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(EngineConfig::default())
    }
}

impl Engine {
    fn from_config(config: EngineConfig) -> Self {
        Self {
            format: NumberFormat::new(config.precision, config.zero_threshold),
            cache: ParseCache::new(config.cache_capacity),
            config,
        }
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &ParseCache {
        &self.cache
    }

    /// Parses `expression`, going through the parse cache.
    pub fn parse(&self, expression: &str) -> Result<Arc<AstNode>> {
        self.cache.get_or_parse(expression, |text| parser::parse(text, &self.config.functions))
    }

    /// Formats a value with the configured precision and zero threshold.
    pub fn format(&self, value: Complex<f64>) -> String {
        self.format.format(value)
    }

    /// Evaluates `expression` and formats the result.
    ///
    /// A blank expression evaluates to `"0"`.
    pub fn evaluate(&self, expression: &str) -> Result<String> {
        debug!("evaluate: {}", expression);
        if expression.trim().is_empty() {
            return Ok("0".to_string());
        }
        let value = self.evaluate_with(expression, &Environment::new())?;
        Ok(self.format(value))
    }

    /// Evaluates `expression` with caller bindings and returns the raw value.
    pub fn evaluate_with(&self, expression: &str, env: &Environment) -> Result<Complex<f64>> {
        self.parse(expression)?.evaluate(env)
    }

    /// Returns true if [`Engine::evaluate`] succeeds on `expression`.
    pub fn is_valid(&self, expression: &str) -> bool {
        self.evaluate(expression).is_ok()
    }

    /// Solves an equation that is linear in the configured unknown.
    ///
    /// Returns `"x = <root>"`. See [`solver::linear_root`] for the method and
    /// its limits.
    pub fn solve_linear(&self, equation: &str) -> Result<String> {
        debug!("solve_linear: {}", equation);
        let (left, right) = solver::split_equation(equation)?;
        let left = self.parse(left)?;
        let right = self.parse(right)?;
        let variable = &self.config.solve_variable;
        let root = solver::linear_root(&left, &right, variable, self.config.zero_threshold)?;
        Ok(format!("{} = {}", variable, self.format(root)))
    }

    /// Solves `a x^2 + b x + c = 0`.
    ///
    /// A double root prints as `"x = r"`, two roots as `"x₁ = r1, x₂ = r2"`.
    pub fn solve_quadratic(&self, a: f64, b: f64, c: f64) -> Result<String> {
        debug!("solve_quadratic: a={} b={} c={}", a, b, c);
        let variable = &self.config.solve_variable;
        match solver::quadratic_roots(a, b, c)? {
            QuadraticRoots::Double(root) => Ok(format!("{} = {}", variable, self.format(root))),
            QuadraticRoots::Distinct(first, second) => Ok(format!(
                "{v}₁ = {}, {v}₂ = {}",
                self.format(first),
                self.format(second),
                v = variable
            )),
        }
    }

    /// Differentiates `expression` with respect to `variable` and renders the
    /// simplified derivative.
    pub fn differentiate(&self, expression: &str, variable: &str) -> Result<String> {
        debug!("differentiate: d/d{} {}", variable, expression);
        if !is_identifier(variable) {
            return Err(EvalError::DomainError(format!("invalid variable \"{}\"", variable)));
        }
        let ast = self.parse(expression)?;
        Ok(ast.differentiate(variable)?.simplify().to_string())
    }

    /// Samples the left side of `left = right` over the sweep range.
    ///
    /// The right side only has to be present. An equation without `=`, an
    /// unparsable left side, or a zero resolution gives an empty vector.
    pub fn generate_graph_points(&self, equation: &str, resolution: usize) -> Vec<GraphPoint> {
        debug!("generate_graph_points: {} (resolution {})", equation, resolution);
        let Some((left, _)) = equation.split_once('=') else {
            warn!("graph equation \"{}\" has no =", equation);
            return Vec::new();
        };
        let left = match self.parse(left) {
            Ok(left) => left,
            Err(err) => {
                warn!("graph equation \"{}\" is unusable: {}", equation, err);
                return Vec::new();
            },
        };
        graph::sample(&left, &self.config.sweep_variable, self.config.sweep_range(), resolution)
    }

    /// Runs one calculator request in `mode`.
    ///
    /// In [`Mode::Equation`] an input containing `=` is solved; everything
    /// else is evaluated.
    pub fn calculate(&self, mode: Mode, input: &str) -> Result<Calculation> {
        debug!("calculate ({}): {}", mode, input);
        let result = match mode {
            Mode::Equation if input.contains('=') => self.solve_linear(input)?,
            Mode::Standard | Mode::Equation | Mode::Complex => self.evaluate(input)?,
        };
        Ok(Calculation {
            input: input.to_string(),
            result,
        })
    }
}

#[cfg(test)]
mod engine_config_tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.precision, 14);
        assert_eq!(config.zero_threshold, 1.0e-14);
        assert_eq!(config.solve_variable, "x");
        assert_eq!(config.sweep_variable, "a");
        assert_eq!((config.sweep_start, config.sweep_end), (-5.0, 5.0));
        assert_eq!(config.functions.len(), FunctionKind::ALL.len());
        assert_eq!(config.cache_capacity, 256);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate() {
        let invalid = [
            EngineConfig { precision: 0, ..Default::default() },
            EngineConfig { precision: 18, ..Default::default() },
            EngineConfig { zero_threshold: -1.0, ..Default::default() },
            EngineConfig { sweep_start: 5.0, sweep_end: 5.0, ..Default::default() },
            EngineConfig { sweep_end: f64::INFINITY, ..Default::default() },
            EngineConfig { solve_variable: "".into(), ..Default::default() },
            EngineConfig { sweep_variable: "2a".into(), ..Default::default() },
            EngineConfig { solve_variable: "sin".into(), ..Default::default() },
            EngineConfig { sweep_variable: "pi".into(), ..Default::default() },
        ];
        for config in invalid {
            assert!(matches!(config.validate(), Err(EvalError::DomainError(_))), "{:?}", config);
        }
    }

    #[test]
    fn test_serde() {
        let config: EngineConfig = serde_json::from_str(r#"{"precision": 6, "functions": ["sin", "cos"]}"#).unwrap();
        assert_eq!(config.precision, 6);
        assert_eq!(config.functions, vec![FunctionKind::Sin, FunctionKind::Cos]);
        assert_eq!(config.solve_variable, "x");

        let json = serde_json::to_string(&EngineConfig::default()).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EngineConfig::default());
    }
}
