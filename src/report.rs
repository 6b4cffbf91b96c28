//! Simulation report generation.

use crate::engine::SimulationResult;
use crate::indicators::{Indicator, IndicatorVector};
use serde::Serialize;

/// Risk band for a recession probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Elevated,
    High,
    Severe,
}

impl RiskLevel {
    /// Band for a probability in `[0, 1]`, judged on the rounded percentage.
    pub fn from_probability(probability: f64) -> Self {
        let pct = (probability * 100.0).round();
        if pct > 75.0 {
            Self::Severe
        } else if pct > 50.0 {
            Self::High
        } else if pct > 25.0 {
            Self::Elevated
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Elevated => "ELEVATED",
            Self::High => "HIGH",
            Self::Severe => "SEVERE",
        }
    }
}

/// A finished run plus the settings that produced it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimReport {
    #[serde(flatten)]
    pub result: SimulationResult,
    pub risk_level: RiskLevel,
    pub baseline: IndicatorVector,
    pub trials: u64,
    pub seed: Option<u64>,
    pub workers: usize,
    pub generated_at: String,
}

impl SimReport {
    pub fn new(
        result: SimulationResult,
        baseline: IndicatorVector,
        trials: u64,
        seed: Option<u64>,
        workers: usize,
    ) -> Self {
        Self {
            risk_level: RiskLevel::from_probability(result.recession_probability),
            result,
            baseline,
            trials,
            seed,
            workers,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Probability as a whole percentage, as shown on the gauge.
    pub fn percent(&self) -> u32 {
        (self.result.recession_probability * 100.0).round() as u32
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                 RECESSION PROBABILITY REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!("Trials: {}", self.trials));
        if self.workers > 1 {
            report.push_str(&format!(" across {} workers", self.workers));
        }
        if let Some(seed) = self.seed {
            report.push_str(&format!(", seed {}", seed));
        }
        report.push_str("\n\n");

        report.push_str("── RESULT ───────────────────────────────────────────────────────\n");
        let pct = self.percent();
        let bar: String = "█".repeat((pct / 5) as usize);
        report.push_str(&format!(
            "  Recession Risk:  {:>3}% {}\n",
            pct, bar
        ));
        report.push_str(&format!(
            "  Exact Estimate:  {:.4}\n",
            self.result.recession_probability
        ));
        report.push_str(&format!("  Risk Level:      {}\n\n", self.risk_level.label()));

        report.push_str("── AVERAGE SIMULATED INDICATORS ─────────────────────────────────\n");
        report.push_str("  Indicator                                Baseline    Simulated\n");
        for indicator in Indicator::ALL {
            report.push_str(&format!(
                "  {:<38} {:>10}   {:>10}\n",
                indicator.label(),
                indicator.format_value(self.baseline.get(indicator)),
                indicator.format_value(self.result.average_indicators.get(indicator)),
            ));
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
