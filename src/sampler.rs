//! Indicator sampling: Box-Muller normal draws around a baseline.

use crate::indicators::IndicatorVector;
use crate::model::RecessionModel;
use rand::Rng;
use std::f64::consts::PI;

/// Source of uniform draws in `[0, 1)`.
///
/// Every `rand::Rng` qualifies, so callers normally pass a seeded
/// `ChaCha8Rng` or `thread_rng()`. Tests may implement it directly to
/// replay fixed draws.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

impl<R: Rng> UniformSource for R {
    fn next_uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Uniform draw in `(0, 1)`: zero is redrawn so `ln` stays finite.
fn next_open_uniform<S: UniformSource + ?Sized>(source: &mut S) -> f64 {
    loop {
        let u = source.next_uniform();
        if u > 0.0 {
            return u;
        }
    }
}

/// One sample from `Normal(mean, std_dev)`.
///
/// Consumes two uniforms (plus any zero redraws), `u` before `v`.
pub fn sample_normal<S: UniformSource + ?Sized>(source: &mut S, mean: f64, std_dev: f64) -> f64 {
    let u = next_open_uniform(source);
    let v = next_open_uniform(source);
    let z = (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos();
    z * std_dev + mean
}

/// Perturb every field of `baseline` by its model volatility.
///
/// Fields are drawn in canonical order. Values are not clamped.
pub fn sample_indicators<S: UniformSource + ?Sized>(
    source: &mut S,
    baseline: &IndicatorVector,
    model: &RecessionModel,
) -> IndicatorVector {
    let mut sample = *baseline;
    for term in model.terms() {
        let value = sample_normal(source, baseline.get(term.indicator), term.volatility);
        sample.set(term.indicator, value);
    }
    sample
}
