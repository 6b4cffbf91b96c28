//! Trial executor and aggregator.
//!
//! A run draws `trials` independent perturbed vectors, scores each one, flips a
//! Bernoulli coin weighted by the score, and folds the outcome into a
//! [`TrialAccumulator`]. The accumulator is private to one run (or one worker)
//! and is only read when it is reduced into a [`SimulationResult`].

use crate::error::SimulationError;
use crate::indicators::{IndicatorVector, INDICATOR_COUNT};
use crate::model::RecessionModel;
use crate::sampler::{sample_indicators, UniformSource};
use crate::scorer::{linear_score, logistic};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// How often (in trials) a run polls its cancellation flag.
pub const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Input to a single simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub baseline: IndicatorVector,
    pub trials: i64,
}

/// Output of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Fraction of trials classified as a recession, in `[0, 1]`.
    pub recession_probability: f64,
    /// Per-field mean of the perturbed samples (not the baseline).
    pub average_indicators: IndicatorVector,
}

/// Outcome of one trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialOutcome {
    pub sample: IndicatorVector,
    pub probability: f64,
    pub recession: bool,
}

/// Running sums for one run or one worker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialAccumulator {
    trials: u64,
    recessions: u64,
    sums: [f64; INDICATOR_COUNT],
}

impl TrialAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &TrialOutcome) {
        self.trials += 1;
        if outcome.recession {
            self.recessions += 1;
        }
        for (sum, value) in self.sums.iter_mut().zip(outcome.sample.to_array()) {
            *sum += value;
        }
    }

    /// Fold another worker's sums into this one.
    pub fn merge(&mut self, other: &TrialAccumulator) {
        self.trials += other.trials;
        self.recessions += other.recessions;
        for (sum, value) in self.sums.iter_mut().zip(other.sums) {
            *sum += value;
        }
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn recessions(&self) -> u64 {
        self.recessions
    }

    /// Reduce the sums into a result. Fails if no trial was recorded.
    pub fn finish(&self) -> Result<SimulationResult, SimulationError> {
        if self.trials == 0 {
            return Err(SimulationError::InvalidTrialCount(0));
        }
        let n = self.trials as f64;
        Ok(SimulationResult {
            recession_probability: self.recessions as f64 / n,
            average_indicators: IndicatorVector::from_array(self.sums.map(|sum| sum / n)),
        })
    }
}

/// Reject non-positive trial counts before any sampling happens.
pub fn validate_trial_count(trials: i64) -> Result<u64, SimulationError> {
    if trials <= 0 {
        return Err(SimulationError::InvalidTrialCount(trials));
    }
    Ok(trials as u64)
}

/// Runs trials against a fixed model.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    model: RecessionModel,
}

impl Simulator {
    pub fn new(model: RecessionModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &RecessionModel {
        &self.model
    }

    /// Sample, score, and classify one trial.
    ///
    /// Draw order: the eight Box-Muller pairs, then the Bernoulli uniform.
    pub fn run_trial<S: UniformSource + ?Sized>(
        &self,
        source: &mut S,
        baseline: &IndicatorVector,
        trial: u64,
    ) -> Result<TrialOutcome, SimulationError> {
        let sample = sample_indicators(source, baseline, &self.model);
        if let Some(indicator) = sample.first_non_finite() {
            return Err(SimulationError::NumericAnomaly {
                trial,
                detail: format!("sampled {} is {}", indicator, sample.get(indicator)),
            });
        }

        let z = linear_score(&sample, &self.model);
        if !z.is_finite() {
            return Err(SimulationError::NumericAnomaly {
                trial,
                detail: format!("logistic score is {}", z),
            });
        }
        let probability = logistic(z);

        let recession = source.next_uniform() < probability;
        Ok(TrialOutcome {
            sample,
            probability,
            recession,
        })
    }

    /// Run `trials` trials into a fresh accumulator.
    ///
    /// Polls `cancel` every [`CANCEL_CHECK_INTERVAL`] trials.
    pub fn accumulate<S: UniformSource + ?Sized>(
        &self,
        source: &mut S,
        baseline: &IndicatorVector,
        trials: u64,
        cancel: Option<&AtomicBool>,
    ) -> Result<TrialAccumulator, SimulationError> {
        let mut acc = TrialAccumulator::new();
        for trial in 0..trials {
            if trial % CANCEL_CHECK_INTERVAL == 0 {
                if let Some(flag) = cancel {
                    if flag.load(Ordering::Relaxed) {
                        return Err(SimulationError::Cancelled { completed: trial });
                    }
                }
            }
            let outcome = self.run_trial(source, baseline, trial)?;
            acc.record(&outcome);
        }
        Ok(acc)
    }

    pub fn run<S: UniformSource + ?Sized>(
        &self,
        params: &SimulationParams,
        source: &mut S,
    ) -> Result<SimulationResult, SimulationError> {
        self.run_with_cancel(params, source, None)
    }

    pub fn run_with_cancel<S: UniformSource + ?Sized>(
        &self,
        params: &SimulationParams,
        source: &mut S,
        cancel: Option<&AtomicBool>,
    ) -> Result<SimulationResult, SimulationError> {
        let trials = validate_trial_count(params.trials)?;
        tracing::debug!(trials, "starting simulation");

        let acc = self.accumulate(source, &params.baseline, trials, cancel)?;
        let result = acc.finish()?;

        tracing::debug!(
            trials,
            recessions = acc.recessions(),
            probability = result.recession_probability,
            "simulation finished"
        );
        Ok(result)
    }
}

/// Estimate the recession probability for `baseline` with the standard model.
pub fn simulate<S: UniformSource + ?Sized>(
    baseline: &IndicatorVector,
    trials: i64,
    source: &mut S,
) -> Result<SimulationResult, SimulationError> {
    let params = SimulationParams {
        baseline: *baseline,
        trials,
    };
    Simulator::default().run(&params, source)
}
