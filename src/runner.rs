//! Runs a configured simulation, serially or across worker threads.
//!
//! Each worker gets its own generator and its own [`TrialAccumulator`];
//! the accumulators are merged in worker order once every worker is done.

use crate::config::SimConfig;
use crate::engine::{validate_trial_count, Simulator, TrialAccumulator};
use crate::error::SimulationError;
use crate::indicators::IndicatorVector;
use crate::report::SimReport;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Generator for worker `index`: `seed + index`, or fresh entropy when unseeded.
fn worker_rng(seed: Option<u64>, index: usize) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Split `trials` into `workers` near-equal shares (earlier workers take the remainder).
fn split_trials(trials: u64, workers: usize) -> Vec<u64> {
    let workers = (workers.max(1) as u64).min(trials).max(1);
    let base = trials / workers;
    let extra = trials % workers;
    (0..workers)
        .map(|i| base + u64::from(i < extra))
        .collect()
}

/// Merged sums of a parallel run and the number of threads that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelRun {
    pub accumulator: TrialAccumulator,
    pub workers: usize,
}

/// Combine per-worker outcomes in worker order.
///
/// Any cancelled worker cancels the run; `completed` then counts the trials of
/// finished workers plus the partial counts of cancelled ones.
fn merge_worker_outcomes(
    outcomes: Vec<Result<TrialAccumulator, SimulationError>>,
) -> Result<TrialAccumulator, SimulationError> {
    let mut total = TrialAccumulator::new();
    let mut cancelled_at: Option<u64> = None;
    for outcome in outcomes {
        match outcome {
            Ok(acc) => total.merge(&acc),
            Err(SimulationError::Cancelled { completed }) => {
                *cancelled_at.get_or_insert(0) += completed;
            }
            Err(e) => return Err(e),
        }
    }
    if let Some(partial) = cancelled_at {
        return Err(SimulationError::Cancelled {
            completed: partial + total.trials(),
        });
    }
    Ok(total)
}

/// Run `trials` split across at most `workers` threads and merge the results.
///
/// Never starts more threads than there are trials.
pub fn simulate_parallel(
    simulator: &Simulator,
    baseline: &IndicatorVector,
    trials: i64,
    workers: usize,
    seed: Option<u64>,
    cancel: Option<&AtomicBool>,
) -> Result<ParallelRun, SimulationError> {
    let trials = validate_trial_count(trials)?;
    let shares = split_trials(trials, workers);
    tracing::debug!(trials, workers = shares.len(), ?seed, "starting parallel simulation");

    let outcomes: Vec<Result<TrialAccumulator, SimulationError>> = thread::scope(|scope| {
        let handles: Vec<_> = shares
            .iter()
            .enumerate()
            .map(|(index, &share)| {
                scope.spawn(move || {
                    let mut rng = worker_rng(seed, index);
                    simulator.accumulate(&mut rng, baseline, share, cancel)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or(Err(SimulationError::WorkerPanicked)))
            .collect()
    });

    Ok(ParallelRun {
        accumulator: merge_worker_outcomes(outcomes)?,
        workers: shares.len(),
    })
}

/// Run the simulation described by `config` and return a report.
pub fn run_simulation(
    config: &SimConfig,
    baseline: &IndicatorVector,
) -> Result<SimReport, SimulationError> {
    run_simulation_with_cancel(config, baseline, None)
}

pub fn run_simulation_with_cancel(
    config: &SimConfig,
    baseline: &IndicatorVector,
    cancel: Option<&AtomicBool>,
) -> Result<SimReport, SimulationError> {
    let simulator = Simulator::default();
    let run = simulate_parallel(
        &simulator,
        baseline,
        config.trials,
        config.workers,
        config.seed,
        cancel,
    )?;
    let acc = run.accumulator;
    let result = acc.finish()?;

    tracing::info!(
        trials = acc.trials(),
        recessions = acc.recessions(),
        probability = result.recession_probability,
        "simulation complete"
    );

    Ok(SimReport::new(
        result,
        *baseline,
        acc.trials(),
        config.seed,
        run.workers,
    ))
}

/// A simulation running on a background thread.
pub struct SimulationHandle {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<Result<SimReport, SimulationError>>,
}

impl SimulationHandle {
    /// Ask the run to stop at its next cancellation check.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the run to end.
    pub fn join(self) -> Result<SimReport, SimulationError> {
        self.handle
            .join()
            .unwrap_or(Err(SimulationError::WorkerPanicked))
    }
}

/// Start a simulation off the calling thread.
pub fn spawn_simulation(config: SimConfig, baseline: IndicatorVector) -> SimulationHandle {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let handle =
        thread::spawn(move || run_simulation_with_cancel(&config, &baseline, Some(&*flag)));
    SimulationHandle { cancel, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SimulationParams;

    #[test]
    fn test_split_trials_covers_everything() {
        assert_eq!(split_trials(10, 3), vec![4, 3, 3]);
        assert_eq!(split_trials(2, 8), vec![1, 1]);
        assert_eq!(split_trials(5, 0), vec![5]);
        assert_eq!(split_trials(20_000, 4).iter().sum::<u64>(), 20_000);
    }

    #[test]
    fn test_single_worker_matches_kernel() {
        let baseline = IndicatorVector::default();
        let report = run_simulation(&SimConfig::seeded(4_000, 42), &baseline).unwrap();

        let params = SimulationParams {
            baseline,
            trials: 4_000,
        };
        let direct = Simulator::default()
            .run(&params, &mut ChaCha8Rng::seed_from_u64(42))
            .unwrap();
        assert_eq!(report.result, direct);
        assert_eq!(report.trials, 4_000);
    }

    #[test]
    fn test_parallel_is_reproducible_per_seed() {
        let config = SimConfig {
            workers: 4,
            ..SimConfig::seeded(10_000, 7)
        };
        let baseline = IndicatorVector::default();
        let a = run_simulation(&config, &baseline).unwrap();
        let b = run_simulation(&config, &baseline).unwrap();
        assert_eq!(a.result, b.result);
        assert_eq!(a.trials, 10_000);
    }

    #[test]
    fn test_parallel_rejects_bad_trial_count() {
        let config = SimConfig {
            workers: 4,
            ..SimConfig::seeded(0, 7)
        };
        assert_eq!(
            run_simulation(&config, &IndicatorVector::default()).unwrap_err(),
            SimulationError::InvalidTrialCount(0)
        );
    }

    #[test]
    fn test_preset_cancel_reports_cancelled() {
        let flag = AtomicBool::new(true);
        let config = SimConfig {
            workers: 2,
            ..SimConfig::seeded(50_000, 1)
        };
        let err = run_simulation_with_cancel(&config, &IndicatorVector::default(), Some(&flag))
            .unwrap_err();
        assert_eq!(err, SimulationError::Cancelled { completed: 0 });
    }

    #[test]
    fn test_spawned_simulation_joins() {
        let handle = spawn_simulation(SimConfig::seeded(2_000, 3), IndicatorVector::default());
        let report = handle.join().unwrap();
        assert_eq!(report.trials, 2_000);
        assert!((0.0..=1.0).contains(&report.result.recession_probability));
    }

    #[test]
    fn test_spawned_simulation_can_be_cancelled() {
        // Far more work than can finish before the flag is seen
        let handle = spawn_simulation(
            SimConfig::seeded(1_000_000_000, 3),
            IndicatorVector::default(),
        );
        handle.cancel();
        match handle.join() {
            Err(SimulationError::Cancelled { completed }) => assert!(completed < 1_000_000_000),
            other => panic!("expected cancellation, got {other:?}"),
        }
    }

    fn finished_worker(trials: u64) -> TrialAccumulator {
        Simulator::default()
            .accumulate(
                &mut ChaCha8Rng::seed_from_u64(trials),
                &IndicatorVector::default(),
                trials,
                None,
            )
            .unwrap()
    }

    #[test]
    fn test_merge_sums_partial_counts_of_cancelled_workers() {
        let outcomes = vec![
            Ok(finished_worker(3_000)),
            Err(SimulationError::Cancelled { completed: 1_024 }),
            Ok(finished_worker(500)),
            Err(SimulationError::Cancelled { completed: 2_048 }),
        ];
        assert_eq!(
            merge_worker_outcomes(outcomes),
            Err(SimulationError::Cancelled {
                completed: 3_000 + 1_024 + 500 + 2_048
            })
        );
    }

    #[test]
    fn test_merge_keeps_worker_order_and_failures() {
        let (a, b) = (finished_worker(700), finished_worker(300));
        let mut expected = a.clone();
        expected.merge(&b);
        assert_eq!(merge_worker_outcomes(vec![Ok(a), Ok(b)]), Ok(expected));

        let outcomes = vec![
            Ok(finished_worker(10)),
            Err(SimulationError::Cancelled { completed: 0 }),
            Err(SimulationError::WorkerPanicked),
        ];
        assert_eq!(
            merge_worker_outcomes(outcomes),
            Err(SimulationError::WorkerPanicked)
        );
    }

    #[test]
    fn test_report_counts_threads_actually_started() {
        let config = SimConfig {
            workers: 8,
            ..SimConfig::seeded(2, 1)
        };
        let report = run_simulation(&config, &IndicatorVector::default()).unwrap();
        assert_eq!(report.workers, 2);
        assert_eq!(report.trials, 2);
        let text = report.to_text();
        assert!(text.contains("across 2 workers"), "{text}");
        assert!(!text.contains("8 workers"), "{text}");

        let run = simulate_parallel(
            &Simulator::default(),
            &IndicatorVector::default(),
            3,
            16,
            Some(1),
            None,
        )
        .unwrap();
        assert_eq!(run.workers, 3);
        assert_eq!(run.accumulator.trials(), 3);
    }

    #[test]
    fn test_worker_count_does_not_shift_the_estimate() {
        // Unemployment high enough that the estimate sits near the middle
        let baseline = IndicatorVector {
            unemployment_rate: 9.5,
            ..IndicatorVector::default()
        };
        let serial = run_simulation(&SimConfig::seeded(50_000, 21), &baseline).unwrap();
        let parallel = run_simulation(
            &SimConfig {
                workers: 4,
                ..SimConfig::seeded(50_000, 21)
            },
            &baseline,
        )
        .unwrap();
        assert_eq!(parallel.workers, 4);
        assert_eq!(parallel.trials, 50_000);
        let gap = (serial.result.recession_probability
            - parallel.result.recession_probability)
            .abs();
        assert!(gap < 0.02, "serial {serial:?} vs parallel {parallel:?}");
    }
}
