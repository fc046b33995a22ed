use crate::error::{Result, WnError};
use crate::interpolate::Interpolant;
use crate::property::{collect_properties, PropertyKey, PropertyRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tabulated rate: parallel `t9`, `rate` and `sef` columns sorted by `t9`.
///
/// Interpolation is done on `log10(rate)` and on `sef` separately, so every
/// `rate` entry must be positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateTable {
    t9: Vec<f64>,
    rate: Vec<f64>,
    sef: Vec<f64>,
}

impl RateTable {
    /// Build a table from unsorted columns, sorting all three by `t9`.
    /// Temperatures must be distinct.
    pub fn new(t9: Vec<f64>, rate: Vec<f64>, sef: Vec<f64>) -> Result<Self> {
        if t9.len() != rate.len() || t9.len() != sef.len() {
            return Err(WnError::MismatchedTableLengths {
                t9: t9.len(),
                rate: rate.len(),
                sef: sef.len(),
            });
        }
        if t9.is_empty() {
            return Err(WnError::EmptyRateTable);
        }

        let mut order: Vec<usize> = (0..t9.len()).collect();
        order.sort_by(|&i, &j| t9[i].total_cmp(&t9[j]));
        let table = RateTable {
            t9: order.iter().map(|&i| t9[i]).collect(),
            rate: order.iter().map(|&i| rate[i]).collect(),
            sef: order.iter().map(|&i| sef[i]).collect(),
        };
        if let Some(w) = table.t9.windows(2).find(|w| w[0] == w[1]) {
            return Err(WnError::DuplicateTableTemperature(w[0]));
        }
        Ok(table)
    }

    pub fn t9(&self) -> &[f64] {
        &self.t9
    }

    pub fn rate(&self) -> &[f64] {
        &self.rate
    }

    pub fn sef(&self) -> &[f64] {
        &self.sef
    }

    pub fn len(&self) -> usize {
        self.t9.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t9.is_empty()
    }

    /// Build the interpolants for this table. Reuse the result when
    /// evaluating at many temperatures.
    pub fn evaluator(&self) -> RateTableEvaluator<'_> {
        let log_rate: Vec<f64> = self.rate.iter().map(|r| r.log10()).collect();
        RateTableEvaluator {
            table: self,
            log_rate: Interpolant::for_table(&self.t9, &log_rate),
            sef: Interpolant::for_table(&self.t9, &self.sef),
        }
    }

    /// Rate at `t9`. Outside the table the boundary entry (times its own
    /// `sef`) is returned.
    pub fn rate_at(&self, t9: f64) -> f64 {
        self.evaluator().rate_at(t9)
    }
}

/// Interpolants of one [`RateTable`], ready for evaluation.
#[derive(Debug, Clone)]
pub struct RateTableEvaluator<'a> {
    table: &'a RateTable,
    log_rate: Interpolant,
    sef: Interpolant,
}

impl RateTableEvaluator<'_> {
    pub fn rate_at(&self, t9: f64) -> f64 {
        let t = &self.table.t9;
        let last = t.len() - 1;
        if t9 < t[0] {
            return 10f64.powf(self.table.rate[0].log10()) * self.table.sef[0];
        }
        if t9 > t[last] {
            return 10f64.powf(self.table.rate[last].log10()) * self.table.sef[last];
        }
        10f64.powf(self.log_rate.eval(t9)) * self.sef.eval(t9)
    }
}

/// One NON-SMOKER fit:
///
/// `rate(T) = exp(a1 + a2/T + a3/T^(1/3) + a4*T^(1/3) + a5*T + a6*T^(5/3) + a7*ln(T))`
///
/// valid on `[t_low_fit, t_high_fit]` and held flat outside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub a1: f64,
    pub a2: f64,
    pub a3: f64,
    pub a4: f64,
    pub a5: f64,
    pub a6: f64,
    pub a7: f64,
    #[serde(default)]
    pub a8: Option<f64>,
    #[serde(rename = "Tlowfit")]
    pub t_low_fit: f64,
    #[serde(rename = "Thighfit")]
    pub t_high_fit: f64,
    #[serde(rename = "Zt", default)]
    pub z_target: Option<f64>,
    #[serde(rename = "At", default)]
    pub a_target: Option<f64>,
    #[serde(rename = "Zf", default)]
    pub z_final: Option<f64>,
    #[serde(rename = "Af", default)]
    pub a_final: Option<f64>,
    #[serde(rename = "Q", default)]
    pub q_value: Option<f64>,
    #[serde(default)]
    pub spint: Option<f64>,
    #[serde(default)]
    pub spinf: Option<f64>,
    #[serde(rename = "TlowHf", default)]
    pub t_low_hf: Option<f64>,
    #[serde(default)]
    pub acc: Option<f64>,
}

impl Fit {
    /// A fit with the given coefficients and validity window; all optional
    /// metadata unset.
    pub fn new(a: [f64; 7], t_low_fit: f64, t_high_fit: f64) -> Self {
        Fit {
            note: None,
            a1: a[0],
            a2: a[1],
            a3: a[2],
            a4: a[3],
            a5: a[4],
            a6: a[5],
            a7: a[6],
            a8: None,
            t_low_fit,
            t_high_fit,
            z_target: None,
            a_target: None,
            z_final: None,
            a_final: None,
            q_value: None,
            spint: None,
            spinf: None,
            t_low_hf: None,
            acc: None,
        }
    }

    /// The analytic form at `t9` with no clamping. Requires `t9 > 0`.
    pub fn analytic(&self, t9: f64) -> f64 {
        let t13 = t9.cbrt();
        let x = self.a1
            + self.a2 / t9
            + self.a3 / t13
            + self.a4 * t13
            + self.a5 * t9
            + self.a6 * t9.powf(5.0 / 3.0)
            + self.a7 * t9.ln();
        x.exp()
    }

    /// The fit at `t9` clamped to this fit's own `[Tlowfit, Thighfit]`.
    pub fn rate_at(&self, t9: f64) -> f64 {
        if t9 < self.t_low_fit {
            return self.analytic(self.t_low_fit);
        }
        if t9 > self.t_high_fit {
            return self.analytic(self.t_high_fit);
        }
        self.analytic(t9)
    }
}

/// Sum of every fit's clamped contribution at `t9`.
pub fn non_smoker_rate(fits: &[Fit], t9: f64) -> f64 {
    fits.iter().map(|f| f.rate_at(t9)).sum()
}

/// The rate data of a reaction. Exactly one representation per reaction.
#[derive(Debug, Clone, PartialEq)]
pub enum RateExpression {
    /// Temperature-independent rate.
    SingleRate { rate: f64 },
    RateTable(RateTable),
    /// One or more fits whose contributions are summed.
    NonSmokerFit { fits: Vec<Fit> },
    /// Rate computed by a caller-supplied function registered under `key`.
    UserRate {
        key: String,
        properties: HashMap<PropertyKey, String>,
    },
}

impl RateExpression {
    pub fn non_smoker(fits: Vec<Fit>) -> Result<Self> {
        if fits.is_empty() {
            return Err(WnError::EmptyFitList);
        }
        Ok(RateExpression::NonSmokerFit { fits })
    }

    /// Record tag naming the representation.
    pub fn kind(&self) -> &'static str {
        match self {
            RateExpression::SingleRate { .. } => "single_rate",
            RateExpression::RateTable(_) => "rate_table",
            RateExpression::NonSmokerFit { .. } => "non_smoker_fit",
            RateExpression::UserRate { .. } => "user_rate",
        }
    }

    /// Rate at `t9` for the representations that need no user function.
    /// Returns `None` for [`RateExpression::UserRate`].
    pub fn builtin_rate_at(&self, t9: f64) -> Option<f64> {
        match self {
            RateExpression::SingleRate { rate } => Some(*rate),
            RateExpression::RateTable(table) => Some(table.rate_at(t9)),
            RateExpression::NonSmokerFit { fits } => Some(non_smoker_rate(fits, t9)),
            RateExpression::UserRate { .. } => None,
        }
    }

    /// Elementwise [`RateExpression::builtin_rate_at`]. Rate-table
    /// interpolants are built once for the whole array.
    pub fn builtin_rates_at(&self, t9: &[f64]) -> Option<Vec<f64>> {
        match self {
            RateExpression::RateTable(table) => {
                let evaluator = table.evaluator();
                Some(t9.iter().map(|&t| evaluator.rate_at(t)).collect())
            }
            RateExpression::UserRate { .. } => None,
            _ => t9.iter().map(|&t| self.builtin_rate_at(t)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Decoded records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTablePoint {
    pub t9: f64,
    pub rate: f64,
    pub sef: f64,
}

/// A rate table either as parallel columns or as a list of points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RateTableRecord {
    Columns {
        t9: Vec<f64>,
        rate: Vec<f64>,
        sef: Vec<f64>,
    },
    Points {
        point: Vec<RateTablePoint>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(t) => vec![t],
        }
    }
}

/// NON-SMOKER data: a `fit` list (or single `fit`), or one unwrapped fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NonSmokerRecord {
    Fits { fit: OneOrMany<Fit> },
    Single(Fit),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRateRecord {
    pub key: String,
    #[serde(default)]
    pub properties: Vec<PropertyRecord>,
}

/// The rate sub-records a reaction record may carry. Valid data populates
/// exactly one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_smoker_fit: Option<NonSmokerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_table: Option<RateTableRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rate: Option<UserRateRecord>,
}

impl RateRecord {
    /// Decode into a [`RateExpression`]. `reaction` names the reaction in the
    /// error when no representation is present.
    pub fn decode(self, reaction: &str) -> Result<RateExpression> {
        if let Some(non_smoker) = self.non_smoker_fit {
            let fits = match non_smoker {
                NonSmokerRecord::Fits { fit } => fit.into_vec(),
                NonSmokerRecord::Single(fit) => vec![fit],
            };
            log::debug!("{}: non_smoker_fit with {} fit(s)", reaction, fits.len());
            return RateExpression::non_smoker(fits);
        }

        if let Some(table) = self.rate_table {
            let (t9, rate, sef) = match table {
                RateTableRecord::Columns { t9, rate, sef } => (t9, rate, sef),
                RateTableRecord::Points { point } => (
                    point.iter().map(|p| p.t9).collect(),
                    point.iter().map(|p| p.rate).collect(),
                    point.iter().map(|p| p.sef).collect(),
                ),
            };
            log::debug!("{}: rate_table with {} point(s)", reaction, t9.len());
            return Ok(RateExpression::RateTable(RateTable::new(t9, rate, sef)?));
        }

        if let Some(rate) = self.single_rate {
            return Ok(RateExpression::SingleRate { rate });
        }

        if let Some(user) = self.user_rate {
            return Ok(RateExpression::UserRate {
                properties: collect_properties(&user.properties),
                key: user.key,
            });
        }

        Err(WnError::UnknownRateType {
            reaction: reaction.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(t9: &[f64], rate: &[f64]) -> RateTable {
        RateTable::new(t9.to_vec(), rate.to_vec(), vec![1.0; t9.len()]).unwrap()
    }

    fn sample_fit() -> Fit {
        Fit::new([1.0, -0.5, 0.2, 0.3, -0.1, 0.01, 0.5], 0.1, 10.0)
    }

    #[test]
    fn test_rate_table_sorts_columns_together() {
        let t = RateTable::new(vec![3.0, 1.0, 2.0], vec![30.0, 10.0, 20.0], vec![1.3, 1.1, 1.2])
            .unwrap();
        assert_eq!(t.t9(), &[1.0, 2.0, 3.0]);
        assert_eq!(t.rate(), &[10.0, 20.0, 30.0]);
        assert_eq!(t.sef(), &[1.1, 1.2, 1.3]);
    }

    #[test]
    fn test_rate_table_rejects_bad_columns() {
        assert!(matches!(
            RateTable::new(vec![1.0, 2.0], vec![1.0], vec![1.0, 1.0]),
            Err(WnError::MismatchedTableLengths { t9: 2, rate: 1, sef: 2 })
        ));
        assert!(matches!(
            RateTable::new(vec![], vec![], vec![]),
            Err(WnError::EmptyRateTable)
        ));
    }

    #[test]
    fn test_rate_table_rejects_repeated_t9() {
        assert!(matches!(
            RateTable::new(vec![1.0, 2.0, 2.0, 3.0], vec![1e3, 1e4, 2e4, 1e5], vec![1.0; 4]),
            Err(WnError::DuplicateTableTemperature(t)) if t == 2.0
        ));
        // Unsorted input repeats only after sorting.
        assert!(matches!(
            RateTable::new(vec![1.0, 3.0, 1.0], vec![1e3, 1e5, 1e3], vec![1.0; 3]),
            Err(WnError::DuplicateTableTemperature(t)) if t == 1.0
        ));
        let two = RateTable::new(vec![2.0, 2.0], vec![1e3, 1e4], vec![1.0; 2]);
        assert!(two.is_err());
    }

    #[test]
    fn test_rate_table_clamps_at_boundaries() {
        let t = table(&[1.0, 2.0, 3.0], &[1e3, 1e4, 1e5]);
        assert_eq!(t.rate_at(0.5), t.rate_at(1.0));
        assert_eq!(t.rate_at(5.0), t.rate_at(3.0));
    }

    #[test]
    fn test_rate_table_clamp_uses_boundary_sef() {
        let t = RateTable::new(vec![1.0, 2.0], vec![10.0, 100.0], vec![2.0, 3.0]).unwrap();
        assert!((t.rate_at(0.1) - 20.0).abs() < 1e-9);
        assert!((t.rate_at(9.0) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_table_two_points_is_linear_in_log_rate() {
        let t = table(&[1.0, 2.0], &[10.0, 100.0]);
        let expected = 10f64.powf(1.5);
        assert!((t.rate_at(1.5) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rate_table_three_points_is_cubic() {
        let t = table(&[1.0, 2.0, 4.0], &[1e3, 1e4, 1e5]);
        let linear = 10f64.powf(3.5);
        let value = t.rate_at(1.5);
        assert!((value - linear).abs() > 1e-6 * linear);
        // Parabola through (1,3), (2,4), (4,5) in log10 space.
        let log_expected = 3.5 + (-1.0 / 6.0) * 0.5 * -0.5;
        assert!((value.log10() - log_expected).abs() < 1e-12);
    }

    #[test]
    fn test_rate_table_single_point_is_constant() {
        let t = RateTable::new(vec![2.0], vec![5.0], vec![2.0]).unwrap();
        assert!((t.rate_at(1.0) - 10.0).abs() < 1e-12);
        assert!((t.rate_at(2.0) - 10.0).abs() < 1e-12);
        assert!((t.rate_at(3.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_rate_table_hits_knots() {
        let t = table(&[0.1, 0.5, 1.0, 3.0, 10.0], &[1e-5, 1e-2, 1.0, 1e3, 1e6]);
        for (t9, rate) in t.t9().iter().zip(t.rate().iter()) {
            assert!((t.rate_at(*t9) / rate - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_fit_analytic_form() {
        let f = Fit::new([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0], 0.1, 10.0);
        // exp(1 + ln T) = e * T
        assert!((f.analytic(2.0) - std::f64::consts::E * 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_clamps_to_own_window() {
        let f = sample_fit();
        assert_eq!(f.rate_at(0.01), f.rate_at(0.1));
        assert_eq!(f.rate_at(50.0), f.rate_at(10.0));
        assert_ne!(f.rate_at(1.0), f.rate_at(0.1));
    }

    #[test]
    fn test_non_smoker_fits_sum() {
        let one = RateExpression::non_smoker(vec![sample_fit()]).unwrap();
        let two = RateExpression::non_smoker(vec![sample_fit(), sample_fit()]).unwrap();
        let r1 = one.builtin_rate_at(2.0).unwrap();
        let r2 = two.builtin_rate_at(2.0).unwrap();
        assert_eq!(r2, 2.0 * r1);
    }

    #[test]
    fn test_non_smoker_each_fit_uses_own_bounds() {
        let low = Fit::new([0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0], 0.1, 1.0);
        let high = Fit::new([0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0], 2.0, 5.0);
        let expr = RateExpression::non_smoker(vec![low, high]).unwrap();
        // exp(T) with T clamped to 1.0 and 2.0 respectively.
        let expected = 1f64.exp() + 2f64.exp();
        assert!((expr.builtin_rate_at(1.5).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_non_smoker_rejects_empty() {
        assert!(matches!(RateExpression::non_smoker(vec![]), Err(WnError::EmptyFitList)));
    }

    #[test]
    fn test_single_rate_is_constant() {
        let expr = RateExpression::SingleRate { rate: 3.5 };
        for t9 in [0.01, 1.0, 7.0, 100.0] {
            assert_eq!(expr.builtin_rate_at(t9), Some(3.5));
        }
    }

    #[test]
    fn test_builtin_rates_elementwise() {
        let expr = RateExpression::RateTable(table(&[1.0, 2.0, 3.0], &[1e3, 1e4, 1e5]));
        let rates = expr.builtin_rates_at(&[0.5, 1.0, 2.5, 5.0]).unwrap();
        assert_eq!(rates.len(), 4);
        assert_eq!(rates[0], rates[1]);
        assert_eq!(rates[3], expr.builtin_rate_at(3.0).unwrap());
        assert_eq!(rates[2], expr.builtin_rate_at(2.5).unwrap());
    }

    #[test]
    fn test_user_rate_has_no_builtin_value() {
        let expr = RateExpression::UserRate {
            key: "k".to_string(),
            properties: HashMap::new(),
        };
        assert_eq!(expr.builtin_rate_at(1.0), None);
        assert_eq!(expr.kind(), "user_rate");
    }

    #[test]
    fn test_decode_single_unwrapped_fit() {
        let record: RateRecord = serde_json::from_str(
            r#"{"non_smoker_fit": {"a1": 1.0, "a2": 0.0, "a3": 0.0, "a4": 0.0,
                "a5": 0.0, "a6": 0.0, "a7": 0.0, "Tlowfit": 0.1, "Thighfit": 10.0}}"#,
        )
        .unwrap();
        match record.decode("r").unwrap() {
            RateExpression::NonSmokerFit { fits } => {
                assert_eq!(fits.len(), 1);
                assert_eq!(fits[0].a1, 1.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_decode_fit_list_with_notes() {
        let record: RateRecord = serde_json::from_str(
            r#"{"non_smoker_fit": {"fit": [
                {"note": "resonant", "a1": 1.0, "a2": 0.0, "a3": 0.0, "a4": 0.0,
                 "a5": 0.0, "a6": 0.0, "a7": 0.0, "Tlowfit": 0.1, "Thighfit": 10.0},
                {"a1": 2.0, "a2": 0.0, "a3": 0.0, "a4": 0.0, "a5": 0.0, "a6": 0.0,
                 "a7": 0.0, "a8": 0.0, "Q": 7.6, "Tlowfit": 0.2, "Thighfit": 5.0}
            ]}}"#,
        )
        .unwrap();
        match record.decode("r").unwrap() {
            RateExpression::NonSmokerFit { fits } => {
                assert_eq!(fits.len(), 2);
                assert_eq!(fits[0].note.as_deref(), Some("resonant"));
                assert_eq!(fits[1].q_value, Some(7.6));
                assert_eq!(fits[1].t_high_fit, 5.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_decode_rate_table_points_sorted() {
        let record: RateRecord = serde_json::from_str(
            r#"{"rate_table": {"point": [
                {"t9": 2.0, "rate": 100.0, "sef": 1.0},
                {"t9": 1.0, "rate": 10.0, "sef": 1.0}
            ]}}"#,
        )
        .unwrap();
        match record.decode("r").unwrap() {
            RateExpression::RateTable(t) => assert_eq!(t.t9(), &[1.0, 2.0]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_decode_user_rate_properties() {
        let record: RateRecord = serde_json::from_str(
            r#"{"user_rate": {"key": "my_key", "properties": [
                {"name": "a", "value": "1.0"},
                {"name": "b", "tag1": "x", "value": "2.0"}
            ]}}"#,
        )
        .unwrap();
        match record.decode("r").unwrap() {
            RateExpression::UserRate { key, properties } => {
                assert_eq!(key, "my_key");
                assert_eq!(properties[&PropertyKey::from("a")], "1.0");
                assert_eq!(properties[&PropertyKey::tagged("b", "x")], "2.0");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_decode_missing_rate_is_error() {
        let err = RateRecord::default().decode("n + fe56 -> fe57 + gamma").unwrap_err();
        assert!(matches!(err, WnError::UnknownRateType { .. }));
        assert!(err.to_string().contains("n + fe56 -> fe57 + gamma"));
    }

    #[test]
    fn test_decode_precedence_prefers_non_smoker() {
        let record = RateRecord {
            non_smoker_fit: Some(NonSmokerRecord::Single(sample_fit())),
            single_rate: Some(1.0),
            ..Default::default()
        };
        assert_eq!(record.decode("r").unwrap().kind(), "non_smoker_fit");
    }
}
