//! # graph.rs
//!
//! Sampling of a complex-valued expression over a real sweep parameter.
//!
//! The sampler binds the sweep variable in the evaluation [`Environment`]
//! for each sample; the expression text is never rewritten. A sample whose
//! evaluation fails is left out, so the returned sequence may be sparse.

use crate::astnode::AstNode;
use crate::variable::Environment;

use log::{trace, warn};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

/// Largest number of intervals a sweep is divided into.
pub const MAX_RESOLUTION: usize = 100_000;

/// One evaluated sample, ready for a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    /// Value of the sweep variable.
    pub parameter: f64,
    pub re: f64,
    pub im: f64,
}

/// Closed interval swept by the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub start: f64,
    pub end: f64,
}

impl Default for SweepRange {
    fn default() -> Self {
        Self { start: -5.0, end: 5.0 }
    }
}

impl SweepRange {
    /// Returns the `resolution + 1` evenly spaced parameters from `start` to
    /// `end`, both included. The last value never exceeds `end`.
    ///
    /// `resolution` is capped at [`MAX_RESOLUTION`].
    pub fn parameters(&self, resolution: usize) -> impl Iterator<Item = f64> + '_ {
        let resolution = resolution.min(MAX_RESOLUTION);
        let steps = if resolution == 0 { 0 } else { resolution + 1 };
        let step = (self.end - self.start) / resolution.max(1) as f64;
        (0..steps).map(move |k| (self.start + k as f64 * step).min(self.end))
    }
}

/// Evaluates `expr` at each parameter of `range`, binding it to `variable`.
///
/// Returns at most `resolution + 1` points in ascending parameter order, and
/// none when `resolution` is zero. A resolution above [`MAX_RESOLUTION`] is
/// lowered to it.
///
/// # Examples
///
/// ```
/// use complexcalc::astnode::AstNode;
/// use complexcalc::graph::{sample, SweepRange};
///
/// let points = sample(&AstNode::identifier("a"), "a", SweepRange::default(), 10);
/// assert_eq!(points.len(), 11);
/// assert_eq!(points[0].parameter, -5.0);
/// assert_eq!(points[10].parameter, 5.0);
/// ```
pub fn sample(expr: &AstNode, variable: &str, range: SweepRange, resolution: usize) -> Vec<GraphPoint> {
    if resolution > MAX_RESOLUTION {
        warn!("resolution {} lowered to {}", resolution, MAX_RESOLUTION);
    }
    let mut env = Environment::new();
    range.parameters(resolution)
        .filter_map(|parameter| {
            env.bind(variable, Complex::new(parameter, 0.0));
            match expr.evaluate(&env) {
                Ok(value) => Some(GraphPoint { parameter, re: value.re, im: value.im }),
                Err(err) => {
                    trace!("skipping sample {}={}: {}", variable, parameter, err);
                    None
                },
            }
        })
        .collect()
}
