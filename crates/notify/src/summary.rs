//! Test summary records produced by the upstream test stage.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::NotifyError;

/// Placeholder used for any display string the summary does not carry.
pub const UNKNOWN: &str = "Unknown";

/// Aggregated results of one test run.
///
/// Every field is optional in the source file. Missing, null or oddly typed
/// values fall back to zero or [`UNKNOWN`] one field at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestSummary {
    /// Target environment the tests ran against.
    #[serde(deserialize_with = "lenient_text")]
    pub sandbox: String,
    #[serde(deserialize_with = "lenient_count")]
    pub total_tests: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub passed_tests: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub failed_tests: u64,
    /// Average code coverage, in percent.
    #[serde(deserialize_with = "lenient_percent")]
    pub avg_coverage: f64,
    #[serde(deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(deserialize_with = "lenient_text")]
    pub coverage_status: String,
}

impl TestSummary {
    /// The zeroed record substituted when the summary file is unusable.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            sandbox: UNKNOWN.to_string(),
            total_tests: 0,
            passed_tests: 0,
            failed_tests: 0,
            avg_coverage: 0.0,
            status: UNKNOWN.to_string(),
            coverage_status: UNKNOWN.to_string(),
        }
    }

    /// Parse a summary from a JSON document.
    pub fn from_json(raw: &str) -> Result<Self, NotifyError> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl Default for TestSummary {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Read a summary file, degrading to [`TestSummary::unknown`] on any failure.
///
/// A broken summary must not stop the notification from going out, so read
/// and parse errors are logged and swallowed here.
pub fn load_summary(path: impl AsRef<Path>) -> TestSummary {
    let path = path.as_ref();

    match read_summary(path) {
        Ok(summary) => {
            debug!(
                path = %path.display(),
                sandbox = %summary.sandbox,
                total = summary.total_tests,
                failed = summary.failed_tests,
                "Loaded test summary"
            );
            summary
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Could not load summary file, using placeholder values"
            );
            TestSummary::unknown()
        }
    }
}

fn read_summary(path: &Path) -> Result<TestSummary, NotifyError> {
    let raw = std::fs::read_to_string(path)?;
    TestSummary::from_json(&raw)
}

/// Read a JSON number or numeric string (`"81.5%"` included) as a float.
fn as_number(value: Option<Value>) -> Option<f64> {
    let number: Option<f64> = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}

/// Counts accept any non-negative number; fractional values are truncated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let count = as_number(Option::deserialize(deserializer)?)
        .filter(|f| *f >= 0.0)
        .map_or(0, |f| f as u64);
    Ok(count)
}

fn lenient_percent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(as_number(Option::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => UNKNOWN.to_string(),
        Some(other) => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_fields_use_defaults() {
        let summary = TestSummary::from_json(r#"{"sandbox": "UAT", "total_tests": 5}"#).unwrap();
        assert_eq!(summary.sandbox, "UAT");
        assert_eq!(summary.total_tests, 5);
        assert_eq!(summary.passed_tests, 0);
        assert_eq!(summary.failed_tests, 0);
        assert!(summary.avg_coverage.abs() < f64::EPSILON);
        assert_eq!(summary.status, UNKNOWN);
        assert_eq!(summary.coverage_status, UNKNOWN);
    }

    #[test]
    fn test_fractional_coverage() {
        let summary = TestSummary::from_json(r#"{"avg_coverage": 81.25}"#).unwrap();
        assert!((summary.avg_coverage - 81.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_float_counts_keep_the_record() {
        let summary = TestSummary::from_json(
            r#"{"sandbox":"UAT","total_tests":50.0,"passed_tests":47.0,"failed_tests":3,"avg_coverage":62}"#,
        )
        .unwrap();
        assert_eq!(summary.sandbox, "UAT");
        assert_eq!(summary.total_tests, 50);
        assert_eq!(summary.passed_tests, 47);
        assert_eq!(summary.failed_tests, 3);
        assert!((summary.avg_coverage - 62.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_null_fields_default_individually() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"sandbox":"UAT","total_tests":50,"passed_tests":null,"failed_tests":3,"avg_coverage":null,"status":null}"#,
        )
        .unwrap();

        let summary = load_summary(file.path());
        assert_eq!(summary.sandbox, "UAT");
        assert_eq!(summary.total_tests, 50);
        assert_eq!(summary.passed_tests, 0);
        assert_eq!(summary.failed_tests, 3);
        assert!(summary.avg_coverage.abs() < f64::EPSILON);
        assert_eq!(summary.status, UNKNOWN);
    }

    #[test]
    fn test_odd_shapes_fall_back_per_field() {
        let summary = TestSummary::from_json(
            r#"{"sandbox":"QA","total_tests":"12","failed_tests":-1,"avg_coverage":"81.5%"}"#,
        )
        .unwrap();
        assert_eq!(summary.sandbox, "QA");
        assert_eq!(summary.total_tests, 12);
        assert_eq!(summary.failed_tests, 0);
        assert!((summary.avg_coverage - 81.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_file_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let summary = load_summary(dir.path().join("nope.json"));
        assert_eq!(summary, TestSummary::unknown());
    }

    #[test]
    fn test_corrupt_file_degrades() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let summary = load_summary(file.path());
        assert_eq!(summary.sandbox, "Unknown");
        assert_eq!(summary.total_tests, 0);
        assert_eq!(summary.status, "Unknown");
    }

    #[test]
    fn test_valid_file_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sandbox":"QA","total_tests":10,"passed_tests":10,"failed_tests":0,"avg_coverage":90,"status":"✅ Passed","coverage_status":"✅ Good"}}"#
        )
        .unwrap();

        let summary = load_summary(file.path());
        assert_eq!(summary.sandbox, "QA");
        assert_eq!(summary.passed_tests, 10);
        assert_eq!(summary.status, "✅ Passed");
    }
}
