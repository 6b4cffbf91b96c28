//! Turning user input (CSV files, `key=value` overrides) into a validated baseline.
//!
//! Nothing here is called by the kernel. The kernel trusts that whatever it
//! receives has passed [`validate_indicators`].

use crate::error::InputError;
use crate::indicators::{Indicator, IndicatorVector, INDICATOR_COUNT};
use std::fs;
use std::path::Path;

fn parse_value(field: &str, raw: &str) -> Result<f64, InputError> {
    let invalid = || InputError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
    };
    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}

/// Parse a CSV with a header row and at least one data row.
///
/// Only the first data row is read. Unknown columns are ignored. With a
/// `fallback`, columns that are absent keep the fallback's value; without
/// one, every indicator must be present.
pub fn parse_indicator_csv(
    text: &str,
    fallback: Option<&IndicatorVector>,
) -> Result<IndicatorVector, InputError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader
        .headers()
        .map_err(|e| InputError::Malformed(e.to_string()))?
        .clone();
    let row = match reader.records().next() {
        Some(record) => record.map_err(|e| InputError::Malformed(e.to_string()))?,
        None => return Err(InputError::MissingDataRow),
    };

    let mut seen = [false; INDICATOR_COUNT];
    let mut indicators = fallback
        .copied()
        .unwrap_or(IndicatorVector::from_array([0.0; INDICATOR_COUNT]));

    for (column, name) in header.iter().enumerate() {
        let Some(indicator) = Indicator::from_key(name) else {
            continue;
        };
        let raw = row.get(column).unwrap_or("");
        indicators.set(indicator, parse_value(name, raw)?);
        seen[indicator.index()] = true;
    }

    if !seen.iter().any(|s| *s) {
        return Err(InputError::NoMatchingColumns);
    }

    if fallback.is_none() {
        let missing: Vec<Indicator> = Indicator::ALL
            .into_iter()
            .filter(|i| !seen[i.index()])
            .collect();
        if !missing.is_empty() {
            return Err(InputError::MissingFields(missing));
        }
    }

    Ok(indicators)
}

/// Read and parse a CSV file. See [`parse_indicator_csv`].
pub fn load_indicator_csv(
    path: &Path,
    fallback: Option<&IndicatorVector>,
) -> Result<IndicatorVector, InputError> {
    let text = fs::read_to_string(path).map_err(|e| InputError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_indicator_csv(&text, fallback)
}

/// Apply one `key=value` override, e.g. `unemploymentRate=6.5`.
pub fn apply_override(
    assignment: &str,
    indicators: &mut IndicatorVector,
) -> Result<Indicator, InputError> {
    let (key, raw) = assignment
        .split_once('=')
        .ok_or_else(|| InputError::MalformedOverride(assignment.to_string()))?;
    let key = key.trim();
    let indicator =
        Indicator::from_key(key).ok_or_else(|| InputError::UnknownIndicator(key.to_string()))?;
    indicators.set(indicator, parse_value(key, raw)?);
    Ok(indicator)
}

/// Final gate before the kernel: every field must be finite.
///
/// Values outside an indicator's usual input range are accepted but logged.
pub fn validate_indicators(indicators: &IndicatorVector) -> Result<(), InputError> {
    if let Some(field) = indicators.first_non_finite() {
        return Err(InputError::NonFinite { field });
    }
    for (indicator, value) in indicators.iter() {
        let range = indicator.input_range();
        if !range.contains(value) {
            tracing::warn!(
                indicator = indicator.key(),
                value,
                min = range.min,
                max = range.max,
                "indicator outside its usual range"
            );
        }
    }
    Ok(())
}
