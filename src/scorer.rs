//! Logistic scoring of a perturbed indicator vector.

use crate::indicators::IndicatorVector;
use crate::model::RecessionModel;

/// Linear score `z = intercept + Σ value × coefficient`.
pub fn linear_score(indicators: &IndicatorVector, model: &RecessionModel) -> f64 {
    model
        .terms()
        .iter()
        .fold(model.intercept, |z, term| {
            z + term.coefficient * indicators.get(term.indicator)
        })
}

/// Standard logistic `1 / (1 + e^-z)`.
///
/// Branches on the sign of `z` so `exp` only ever sees a non-positive argument.
pub fn logistic(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Recession probability for one trial.
pub fn recession_probability(indicators: &IndicatorVector, model: &RecessionModel) -> f64 {
    logistic(linear_score(indicators, model))
}
