use std::collections::HashMap;
use std::str::FromStr;

use serde_json::Value;

use crate::error::CheckError;
use crate::severity::Severity;

/// Direction of a numeric threshold comparison.
///
/// Both directions exist in the wild: throughput-style metrics go bad when
/// they drop below a floor, latency/error-count metrics when they rise above
/// a ceiling. The direction is always configured, never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessThan,
    GreaterThan,
}

impl Comparison {
    /// Parse a CLI spelling of the direction.
    pub fn parse(s: &str) -> Result<Comparison, CheckError> {
        match s {
            "less-than" | "lt" => Ok(Comparison::LessThan),
            "greater-than" | "gt" => Ok(Comparison::GreaterThan),
            other => Err(CheckError::Config(format!(
                "unknown comparison {other:?} (expected less-than or greater-than)"
            ))),
        }
    }

    fn breaches(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::LessThan => value < threshold,
            Comparison::GreaterThan => value > threshold,
        }
    }

    fn word(self) -> &'static str {
        match self {
            Comparison::LessThan => "below",
            Comparison::GreaterThan => "above",
        }
    }
}

impl FromStr for Comparison {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comparison::parse(s)
    }
}

/// Exact-match lookup of a status string. Any value absent from the table
/// maps to UNKNOWN: an unrecognized remote status must never read as OK.
#[derive(Debug, Clone)]
pub struct DiscretePolicy {
    table: HashMap<String, Severity>,
}

impl DiscretePolicy {
    pub fn from_table(entries: &[(&str, Severity)]) -> Self {
        let table = entries
            .iter()
            .map(|(status, severity)| (status.to_string(), *severity))
            .collect();
        Self { table }
    }

    pub fn apply(&self, raw: &Value) -> Result<(Severity, String), CheckError> {
        let status = raw
            .as_str()
            .ok_or_else(|| CheckError::Decode(format!("expected a status string, got {raw}")))?;
        match self.table.get(status) {
            Some(severity) => Ok((*severity, format!("status {status}"))),
            None => Ok((Severity::Unknown, format!("unrecognized status {status}"))),
        }
    }
}

/// Numeric comparator with a critical and an optional warning threshold.
/// Critical is checked first so a value satisfying both predicates reports
/// at the worse severity.
#[derive(Debug, Clone)]
pub struct NumericPolicy {
    comparison: Comparison,
    critical: Option<f64>,
    warning: Option<f64>,
}

impl NumericPolicy {
    pub fn new(
        comparison: Comparison,
        critical: Option<f64>,
        warning: Option<f64>,
    ) -> Result<Self, CheckError> {
        if critical.is_none() && warning.is_none() {
            return Err(CheckError::Config(
                "at least one of the critical/warning thresholds is required".to_string(),
            ));
        }
        Ok(Self {
            comparison,
            critical,
            warning,
        })
    }

    pub fn apply(&self, raw: &Value) -> Result<(Severity, String), CheckError> {
        let value = coerce_number(raw)?;
        if let Some(critical) = self.critical {
            if self.comparison.breaches(value, critical) {
                return Ok((
                    Severity::Critical,
                    format!(
                        "value {value} is {} critical threshold {critical}",
                        self.comparison.word()
                    ),
                ));
            }
        }
        if let Some(warning) = self.warning {
            if self.comparison.breaches(value, warning) {
                return Ok((
                    Severity::Warning,
                    format!(
                        "value {value} is {} warning threshold {warning}",
                        self.comparison.word()
                    ),
                ));
            }
        }
        Ok((Severity::Ok, format!("value {value}")))
    }
}

/// Declarative mapping from a raw leaf value to a severity plus the rendered
/// per-leaf detail.
#[derive(Debug, Clone)]
pub enum Policy {
    Discrete(DiscretePolicy),
    Numeric(NumericPolicy),
}

impl Policy {
    pub fn apply(&self, raw: &Value) -> Result<(Severity, String), CheckError> {
        match self {
            Policy::Discrete(policy) => policy.apply(raw),
            Policy::Numeric(policy) => policy.apply(raw),
        }
    }
}

// Non-numeric input is a decode failure, never coerced to zero.
fn coerce_number(raw: &Value) -> Result<f64, CheckError> {
    match raw {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| CheckError::Decode(format!("value {n} is not representable"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| CheckError::Decode(format!("non-numeric value {s:?}"))),
        other => Err(CheckError::Decode(format!("non-numeric value {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn consumer_table() -> DiscretePolicy {
        DiscretePolicy::from_table(&[
            ("OK", Severity::Ok),
            ("WARN", Severity::Warning),
            ("ERR", Severity::Warning),
            ("STOP", Severity::Warning),
            ("STALL", Severity::Warning),
            ("REWIND", Severity::Ok),
            ("NOTFOUND", Severity::Unknown),
        ])
    }

    #[test]
    fn test_discrete_known_statuses() {
        let policy = consumer_table();
        assert_eq!(policy.apply(&json!("OK")).unwrap().0, Severity::Ok);
        assert_eq!(policy.apply(&json!("WARN")).unwrap().0, Severity::Warning);
        assert_eq!(policy.apply(&json!("STALL")).unwrap().0, Severity::Warning);
        assert_eq!(policy.apply(&json!("REWIND")).unwrap().0, Severity::Ok);
        assert_eq!(policy.apply(&json!("NOTFOUND")).unwrap().0, Severity::Unknown);
    }

    #[test]
    fn test_discrete_unmapped_is_unknown() {
        // Fail-safe default: a status we have never seen is not OK
        let policy = consumer_table();
        let (severity, detail) = policy.apply(&json!("FOO")).unwrap();
        assert_eq!(severity, Severity::Unknown);
        assert!(detail.contains("FOO"));
    }

    #[test]
    fn test_discrete_non_string_is_decode_error() {
        let policy = consumer_table();
        assert!(matches!(
            policy.apply(&json!(42)),
            Err(CheckError::Decode(_))
        ));
    }

    #[test]
    fn test_numeric_less_than_grid() {
        // less-than, critical=10, warning=50
        let policy = NumericPolicy::new(Comparison::LessThan, Some(10.0), Some(50.0)).unwrap();
        assert_eq!(policy.apply(&json!(60)).unwrap().0, Severity::Ok);
        assert_eq!(policy.apply(&json!(30)).unwrap().0, Severity::Warning);
        assert_eq!(policy.apply(&json!(5)).unwrap().0, Severity::Critical);
        assert!(matches!(
            policy.apply(&json!("N/A")),
            Err(CheckError::Decode(_))
        ));
    }

    #[test]
    fn test_numeric_critical_checked_first() {
        // A value breaching both thresholds reports at the worse severity
        let policy = NumericPolicy::new(Comparison::LessThan, Some(10.0), Some(50.0)).unwrap();
        let (severity, detail) = policy.apply(&json!(5)).unwrap();
        assert_eq!(severity, Severity::Critical);
        assert!(detail.contains("critical threshold 10"));
    }

    #[test]
    fn test_numeric_greater_than() {
        let policy = NumericPolicy::new(Comparison::GreaterThan, Some(100.0), Some(80.0)).unwrap();
        assert_eq!(policy.apply(&json!(50)).unwrap().0, Severity::Ok);
        assert_eq!(policy.apply(&json!(90)).unwrap().0, Severity::Warning);
        assert_eq!(policy.apply(&json!(150)).unwrap().0, Severity::Critical);
    }

    #[test]
    fn test_numeric_threshold_is_not_a_breach() {
        // Strict comparison: equal to the threshold is not a breach
        let policy = NumericPolicy::new(Comparison::LessThan, Some(10.0), None).unwrap();
        assert_eq!(policy.apply(&json!(10)).unwrap().0, Severity::Ok);
    }

    #[test]
    fn test_numeric_accepts_numeric_strings() {
        let policy = NumericPolicy::new(Comparison::LessThan, Some(10.0), None).unwrap();
        assert_eq!(policy.apply(&json!("5")).unwrap().0, Severity::Critical);
        assert_eq!(policy.apply(&json!(" 42 ")).unwrap().0, Severity::Ok);
    }

    #[test]
    fn test_numeric_requires_a_threshold() {
        assert!(matches!(
            NumericPolicy::new(Comparison::LessThan, None, None),
            Err(CheckError::Config(_))
        ));
    }

    #[test]
    fn test_comparison_parsing() {
        assert_eq!(Comparison::parse("less-than").unwrap(), Comparison::LessThan);
        assert_eq!(Comparison::parse("lt").unwrap(), Comparison::LessThan);
        assert_eq!(
            Comparison::parse("greater-than").unwrap(),
            Comparison::GreaterThan
        );
        assert!(matches!(
            Comparison::parse("sideways"),
            Err(CheckError::Config(_))
        ));
    }
}
