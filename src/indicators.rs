//! The eight macroeconomic indicators the model reads, and the vector that carries them.

use serde::{Deserialize, Serialize};

/// Number of indicator fields in an [`IndicatorVector`].
pub const INDICATOR_COUNT: usize = 8;

/// One named macroeconomic input.
///
/// Declaration order is the canonical field order used by the model tables,
/// the accumulators, and the random-draw layout of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    YieldCurveSpread,
    UnemploymentRate,
    InflationRate,
    GdpPerCapitaGrowth,
    PointCli,
    IsmNewOrders,
    IsmSupplierDeliveries,
    LeadingIndexChange,
}

/// Advisory domain for an indicator when it is entered interactively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl InputRange {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Indicator {
    pub const ALL: [Indicator; INDICATOR_COUNT] = [
        Indicator::YieldCurveSpread,
        Indicator::UnemploymentRate,
        Indicator::InflationRate,
        Indicator::GdpPerCapitaGrowth,
        Indicator::PointCli,
        Indicator::IsmNewOrders,
        Indicator::IsmSupplierDeliveries,
        Indicator::LeadingIndexChange,
    ];

    /// Position in [`Indicator::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Identifier used in CSV headers, JSON output and `--set` overrides.
    pub fn key(self) -> &'static str {
        match self {
            Self::YieldCurveSpread => "yieldCurveSpread",
            Self::UnemploymentRate => "unemploymentRate",
            Self::InflationRate => "inflationRate",
            Self::GdpPerCapitaGrowth => "gdpPerCapitaGrowth",
            Self::PointCli => "pointCLI",
            Self::IsmNewOrders => "ismNewOrders",
            Self::IsmSupplierDeliveries => "ismSupplierDeliveries",
            Self::LeadingIndexChange => "leadingIndexChange",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.key() == key)
    }

    /// Human-readable name for reports and prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::YieldCurveSpread => "Yield Curve Spread (10yr-2yr Treasury)",
            Self::UnemploymentRate => "Unemployment Rate",
            Self::InflationRate => "Inflation Rate (CPI)",
            Self::GdpPerCapitaGrowth => "GDP per Capita Growth",
            Self::PointCli => "Composite Leading Indicator (CLI)",
            Self::IsmNewOrders => "ISM New Orders Index",
            Self::IsmSupplierDeliveries => "ISM Supplier Deliveries Index",
            Self::LeadingIndexChange => "Leading Economic Index (MoM Change)",
        }
    }

    /// Whether values are expressed in percent (rendered with a `%` suffix).
    pub fn is_percent(self) -> bool {
        !matches!(
            self,
            Self::PointCli | Self::IsmNewOrders | Self::IsmSupplierDeliveries
        )
    }

    pub fn input_range(self) -> InputRange {
        match self {
            Self::YieldCurveSpread => InputRange::new(-2.0, 4.0, 0.01),
            Self::UnemploymentRate => InputRange::new(2.0, 12.0, 0.1),
            Self::InflationRate => InputRange::new(-1.0, 10.0, 0.1),
            Self::GdpPerCapitaGrowth => InputRange::new(-5.0, 7.0, 0.1),
            Self::PointCli => InputRange::new(95.0, 105.0, 0.1),
            Self::IsmNewOrders => InputRange::new(30.0, 70.0, 0.5),
            Self::IsmSupplierDeliveries => InputRange::new(30.0, 70.0, 0.5),
            Self::LeadingIndexChange => InputRange::new(-2.0, 2.0, 0.1),
        }
    }

    /// Format a value the way reports show it: two decimals, `%` for percent fields.
    pub fn format_value(self, value: f64) -> String {
        if self.is_percent() {
            format!("{:.2}%", value)
        } else {
            format!("{:.2}", value)
        }
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A full set of indicator values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorVector {
    pub yield_curve_spread: f64,
    pub unemployment_rate: f64,
    pub inflation_rate: f64,
    pub gdp_per_capita_growth: f64,
    #[serde(rename = "pointCLI")]
    pub point_cli: f64,
    pub ism_new_orders: f64,
    pub ism_supplier_deliveries: f64,
    pub leading_index_change: f64,
}

impl Default for IndicatorVector {
    /// A mid-cycle economy: positive curve, low unemployment, modest growth.
    fn default() -> Self {
        Self {
            yield_curve_spread: 0.5,
            unemployment_rate: 4.0,
            inflation_rate: 2.5,
            gdp_per_capita_growth: 2.0,
            point_cli: 100.2,
            ism_new_orders: 52.0,
            ism_supplier_deliveries: 51.0,
            leading_index_change: 0.2,
        }
    }
}

impl IndicatorVector {
    pub fn from_array(values: [f64; INDICATOR_COUNT]) -> Self {
        let [
            yield_curve_spread,
            unemployment_rate,
            inflation_rate,
            gdp_per_capita_growth,
            point_cli,
            ism_new_orders,
            ism_supplier_deliveries,
            leading_index_change,
        ] = values;
        Self {
            yield_curve_spread,
            unemployment_rate,
            inflation_rate,
            gdp_per_capita_growth,
            point_cli,
            ism_new_orders,
            ism_supplier_deliveries,
            leading_index_change,
        }
    }

    pub fn to_array(&self) -> [f64; INDICATOR_COUNT] {
        [
            self.yield_curve_spread,
            self.unemployment_rate,
            self.inflation_rate,
            self.gdp_per_capita_growth,
            self.point_cli,
            self.ism_new_orders,
            self.ism_supplier_deliveries,
            self.leading_index_change,
        ]
    }

    pub fn get(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::YieldCurveSpread => self.yield_curve_spread,
            Indicator::UnemploymentRate => self.unemployment_rate,
            Indicator::InflationRate => self.inflation_rate,
            Indicator::GdpPerCapitaGrowth => self.gdp_per_capita_growth,
            Indicator::PointCli => self.point_cli,
            Indicator::IsmNewOrders => self.ism_new_orders,
            Indicator::IsmSupplierDeliveries => self.ism_supplier_deliveries,
            Indicator::LeadingIndexChange => self.leading_index_change,
        }
    }

    pub fn set(&mut self, indicator: Indicator, value: f64) {
        let slot = match indicator {
            Indicator::YieldCurveSpread => &mut self.yield_curve_spread,
            Indicator::UnemploymentRate => &mut self.unemployment_rate,
            Indicator::InflationRate => &mut self.inflation_rate,
            Indicator::GdpPerCapitaGrowth => &mut self.gdp_per_capita_growth,
            Indicator::PointCli => &mut self.point_cli,
            Indicator::IsmNewOrders => &mut self.ism_new_orders,
            Indicator::IsmSupplierDeliveries => &mut self.ism_supplier_deliveries,
            Indicator::LeadingIndexChange => &mut self.leading_index_change,
        };
        *slot = value;
    }

    /// Iterate `(indicator, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, f64)> + '_ {
        Indicator::ALL.into_iter().map(move |i| (i, self.get(i)))
    }

    /// First field that is NaN or infinite, if any.
    pub fn first_non_finite(&self) -> Option<Indicator> {
        self.iter().find(|(_, v)| !v.is_finite()).map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_index_order() {
        for (pos, indicator) in Indicator::ALL.iter().enumerate() {
            assert_eq!(indicator.index(), pos);
        }
    }

    #[test]
    fn test_key_lookup_covers_every_indicator() {
        for indicator in Indicator::ALL {
            assert_eq!(Indicator::from_key(indicator.key()), Some(indicator));
        }
        assert_eq!(Indicator::from_key("pointCli"), None);
        assert_eq!(Indicator::from_key(""), None);
    }

    #[test]
    fn test_array_order_matches_get() {
        let v = IndicatorVector::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        for (pos, indicator) in Indicator::ALL.iter().enumerate() {
            assert_eq!(v.get(*indicator), (pos + 1) as f64);
        }
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_set_touches_only_one_field() {
        let mut v = IndicatorVector::default();
        v.set(Indicator::IsmNewOrders, 41.5);
        assert_eq!(v.ism_new_orders, 41.5);
        assert_eq!(v.ism_supplier_deliveries, 51.0);
        assert_eq!(v.point_cli, 100.2);
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = serde_json::to_value(IndicatorVector::default()).unwrap();
        for indicator in Indicator::ALL {
            assert!(
                json.get(indicator.key()).is_some(),
                "missing key {}",
                indicator.key()
            );
        }
    }

    #[test]
    fn test_default_baseline_is_inside_input_ranges() {
        let v = IndicatorVector::default();
        for (indicator, value) in v.iter() {
            assert!(indicator.input_range().contains(value), "{indicator} = {value}");
        }
    }

    #[test]
    fn test_first_non_finite() {
        let mut v = IndicatorVector::default();
        assert_eq!(v.first_non_finite(), None);
        v.inflation_rate = f64::NAN;
        v.leading_index_change = f64::INFINITY;
        assert_eq!(v.first_non_finite(), Some(Indicator::InflationRate));
    }

    #[test]
    fn test_format_value_units() {
        assert_eq!(Indicator::UnemploymentRate.format_value(4.0), "4.00%");
        assert_eq!(Indicator::PointCli.format_value(100.234), "100.23");
    }
}
