//! Recession probability Monte Carlo simulator.
//!
//! Each trial perturbs eight macroeconomic indicators around a baseline,
//! scores the sample with a fixed logistic model, and draws a Bernoulli
//! outcome from the score. The recession probability is the fraction of
//! recession outcomes over all trials.
//!
//! ```no_run
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use recession_sim::{simulate, IndicatorVector};
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let result = simulate(&IndicatorVector::default(), 20_000, &mut rng).unwrap();
//! println!("{:.1}%", result.recession_probability * 100.0);
//! ```

pub mod build_info;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod input;
pub mod logging;
pub mod model;
pub mod report;
pub mod runner;
pub mod sampler;
pub mod scorer;

pub use config::SimConfig;
pub use engine::{simulate, SimulationParams, SimulationResult, Simulator};
pub use error::{ContextError, InputError, SimulationError};
pub use indicators::{Indicator, IndicatorVector};
pub use model::RecessionModel;
pub use report::{RiskLevel, SimReport};
pub use runner::{run_simulation, spawn_simulation, SimulationHandle};
pub use sampler::UniformSource;
