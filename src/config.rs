//! Simulation configuration.

/// Trial count used when none is given.
pub const DEFAULT_TRIALS: i64 = 20_000;

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Number of trials to run
    pub trials: i64,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Worker threads to split trials across (1 = run on the calling thread)
    pub workers: usize,

    /// Log verbosity (0 = warnings only, 1 = info, 2 = debug)
    pub verbosity: u8,

    /// Print the report as JSON instead of text
    pub json: bool,

    /// Ask the commentary service for a written analysis after the run
    pub with_context: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: None,
            workers: 1,
            verbosity: 1,
            json: false,
            with_context: false,
        }
    }
}

impl SimConfig {
    /// Fast, rough estimate
    pub fn quick() -> Self {
        Self {
            trials: 2_000,
            ..Default::default()
        }
    }

    /// Slow, tight estimate spread across the available cores
    pub fn precise() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            trials: 100_000,
            workers,
            ..Default::default()
        }
    }

    /// Seeded config, mostly for tests.
    pub fn seeded(trials: i64, seed: u64) -> Self {
        Self {
            trials,
            seed: Some(seed),
            verbosity: 0,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_interactive_run() {
        let config = SimConfig::default();
        assert_eq!(config.trials, 20_000);
        assert_eq!(config.workers, 1);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_presets() {
        assert!(SimConfig::quick().trials < DEFAULT_TRIALS);
        assert!(SimConfig::precise().trials > DEFAULT_TRIALS);
        assert!(SimConfig::precise().workers >= 1);
        assert_eq!(SimConfig::seeded(10, 4).seed, Some(4));
    }
}
