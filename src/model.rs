//! Fixed logistic model: coefficient and volatility tables.
//!
//! The numbers are illustrative, not fitted to historical data. They are kept
//! as constants and handed to the sampler and scorer through [`RecessionModel`].

use crate::indicators::{Indicator, INDICATOR_COUNT};

pub const INTERCEPT: f64 = -2.5;

/// Coefficient per indicator, in [`Indicator::ALL`] order.
pub const COEFFICIENTS: [f64; INDICATOR_COUNT] = [
    -1.7,  // yield curve: inversion raises odds
    2.6,   // unemployment
    0.3,   // inflation
    -0.8,  // gdp per capita growth
    -0.1,  // composite leading indicator
    -0.15, // ISM new orders
    -0.05, // ISM supplier deliveries
    -1.2,  // leading index change
];

/// Per-trial standard deviation per indicator, in [`Indicator::ALL`] order.
pub const VOLATILITIES: [f64; INDICATOR_COUNT] = [0.5, 0.2, 0.75, 0.5, 0.8, 2.0, 2.5, 0.4];

/// One row of the model table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTerm {
    pub indicator: Indicator,
    pub volatility: f64,
    pub coefficient: f64,
}

/// Immutable model configuration shared by the sampler and scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct RecessionModel {
    pub intercept: f64,
    terms: [ModelTerm; INDICATOR_COUNT],
}

impl Default for RecessionModel {
    fn default() -> Self {
        Self::standard()
    }
}

impl RecessionModel {
    /// The built-in illustrative model.
    pub fn standard() -> Self {
        Self::from_tables(INTERCEPT, COEFFICIENTS, VOLATILITIES)
    }

    pub fn from_tables(
        intercept: f64,
        coefficients: [f64; INDICATOR_COUNT],
        volatilities: [f64; INDICATOR_COUNT],
    ) -> Self {
        let terms = Indicator::ALL.map(|indicator| ModelTerm {
            indicator,
            volatility: volatilities[indicator.index()],
            coefficient: coefficients[indicator.index()],
        });
        Self { intercept, terms }
    }

    /// Terms in canonical field order.
    pub fn terms(&self) -> &[ModelTerm; INDICATOR_COUNT] {
        &self.terms
    }

    pub fn term(&self, indicator: Indicator) -> &ModelTerm {
        &self.terms[indicator.index()]
    }

    /// Copy of this model with one volatility replaced.
    pub fn with_volatility(mut self, indicator: Indicator, volatility: f64) -> Self {
        self.terms[indicator.index()].volatility = volatility;
        self
    }

    /// Copy of this model with one coefficient replaced.
    pub fn with_coefficient(mut self, indicator: Indicator, coefficient: f64) -> Self {
        self.terms[indicator.index()].coefficient = coefficient;
        self
    }
}
