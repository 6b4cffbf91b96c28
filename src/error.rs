//! Error types for the simulation kernel and its collaborators.

use crate::indicators::Indicator;

/// Errors returned by the simulation kernel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("trial count must be a positive integer, got {0}")]
    InvalidTrialCount(i64),

    /// A sampled value, score, or probability came out NaN or infinite.
    /// Points at a broken model table rather than bad luck, so the run is abandoned.
    #[error("non-finite value in trial {trial}: {detail}")]
    NumericAnomaly { trial: u64, detail: String },

    #[error("simulation cancelled after {completed} trials")]
    Cancelled { completed: u64 },

    #[error("simulation worker panicked")]
    WorkerPanicked,
}

/// Errors produced while turning user input into an indicator vector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("CSV must have a header row and at least one data row")]
    MissingDataRow,

    #[error("malformed CSV: {0}")]
    Malformed(String),

    #[error("no matching indicator columns found in CSV header")]
    NoMatchingColumns,

    #[error("invalid non-numeric value for '{field}': {value:?}")]
    InvalidValue { field: String, value: String },

    #[error("missing indicator fields: {}", join_keys(.0))]
    MissingFields(Vec<Indicator>),

    #[error("unknown indicator '{0}'")]
    UnknownIndicator(String),

    #[error("expected key=value, got {0:?}")]
    MalformedOverride(String),

    #[error("indicator '{field}' is not a finite number")]
    NonFinite { field: Indicator },

    #[error("could not read {path}: {message}")]
    Io { path: String, message: String },
}

/// Errors from the commentary service.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("response contained no text")]
    EmptyResponse,
}

fn join_keys(indicators: &[Indicator]) -> String {
    indicators
        .iter()
        .map(|i| i.key())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_lists_keys() {
        let err = InputError::MissingFields(vec![Indicator::PointCli, Indicator::IsmNewOrders]);
        assert_eq!(
            err.to_string(),
            "missing indicator fields: pointCLI, ismNewOrders"
        );
    }

    #[test]
    fn test_invalid_trial_count_message() {
        let err = SimulationError::InvalidTrialCount(-5);
        assert!(err.to_string().contains("-5"));
    }
}
