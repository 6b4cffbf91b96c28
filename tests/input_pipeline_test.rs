//! Integration test: CSV / override input -> validation -> run -> report.

use recession_sim::context::{describe_or_notice, ContextService, ERROR_NOTICE};
use recession_sim::input::{apply_override, parse_indicator_csv, validate_indicators};
use recession_sim::{
    run_simulation, ContextError, Indicator, IndicatorVector, InputError, RiskLevel, SimConfig,
    SimulationError, SimulationResult,
};

const STRESSED_CSV: &str = "\
yieldCurveSpread,unemploymentRate,inflationRate,gdpPerCapitaGrowth,pointCLI,ismNewOrders,ismSupplierDeliveries,leadingIndexChange
-1.0,8.0,2.0,-3.0,96.0,40.0,55.0,-1.5
";

struct Unreachable;

impl ContextService for Unreachable {
    fn describe(&self, _result: &SimulationResult) -> Result<String, ContextError> {
        Err(ContextError::Http("connection refused".to_string()))
    }
}

#[test]
fn test_csv_to_report() {
    let baseline = parse_indicator_csv(STRESSED_CSV, None).unwrap();
    validate_indicators(&baseline).unwrap();

    let report = run_simulation(&SimConfig::seeded(20_000, 1), &baseline).unwrap();
    assert!(report.result.recession_probability > 0.75);
    assert_eq!(report.risk_level, RiskLevel::Severe);
    assert_eq!(report.baseline, baseline);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["riskLevel"], "severe");
    assert_eq!(json["seed"], 1);
}

#[test]
fn test_overrides_on_top_of_csv() {
    let mut baseline = parse_indicator_csv(STRESSED_CSV, None).unwrap();
    apply_override("unemploymentRate=3.5", &mut baseline).unwrap();
    apply_override("yieldCurveSpread = 2.0", &mut baseline).unwrap();
    assert_eq!(baseline.get(Indicator::UnemploymentRate), 3.5);
    assert_eq!(baseline.get(Indicator::YieldCurveSpread), 2.0);

    let stressed = parse_indicator_csv(STRESSED_CSV, None).unwrap();
    let config = SimConfig::seeded(10_000, 2);
    let eased = run_simulation(&config, &baseline).unwrap();
    let original = run_simulation(&config, &stressed).unwrap();
    assert!(eased.result.recession_probability < original.result.recession_probability);
}

#[test]
fn test_bad_csv_never_reaches_the_kernel() {
    let errors = [
        parse_indicator_csv("yieldCurveSpread", None).unwrap_err(),
        parse_indicator_csv("foo,bar\n1,2", Some(&IndicatorVector::default())).unwrap_err(),
        parse_indicator_csv("pointCLI\nabc", Some(&IndicatorVector::default())).unwrap_err(),
        parse_indicator_csv("pointCLI\n99", None).unwrap_err(),
    ];
    assert_eq!(errors[0], InputError::MissingDataRow);
    assert_eq!(errors[1], InputError::NoMatchingColumns);
    assert!(matches!(errors[2], InputError::InvalidValue { .. }));
    assert!(matches!(errors[3], InputError::MissingFields(ref m) if m.len() == 7));
    assert!(errors[2].to_string().contains("pointCLI"));
}

#[test]
fn test_invalid_trial_count_through_runner() {
    let err = run_simulation(&SimConfig::seeded(-5, 1), &IndicatorVector::default()).unwrap_err();
    assert_eq!(err, SimulationError::InvalidTrialCount(-5));
}

#[test]
fn test_commentary_failure_leaves_result_intact() {
    let report = run_simulation(&SimConfig::seeded(2_000, 3), &IndicatorVector::default()).unwrap();
    let before = report.result;
    assert_eq!(describe_or_notice(&Unreachable, &report.result), ERROR_NOTICE);
    assert_eq!(report.result, before);
}
