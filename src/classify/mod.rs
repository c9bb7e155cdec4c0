// Classify module - maps dbt output lines to failure categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of failure reported by dbt output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCategory {
    Compilation,
    Database,
    Runtime,
    TestFailure,
}

impl FailureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::Compilation => "COMPILATION",
            FailureCategory::Database => "DATABASE",
            FailureCategory::Runtime => "RUNTIME",
            FailureCategory::TestFailure => "TEST_FAILURE",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered match table, first hit wins. Matching is case-sensitive.
const RULES: &[(&str, FailureCategory)] = &[
    ("Compilation Error", FailureCategory::Compilation),
    ("Database Error", FailureCategory::Database),
    ("Runtime Error", FailureCategory::Runtime),
    ("FAIL", FailureCategory::TestFailure),
];

/// Classify a single line of dbt output
pub fn classify(line: &str) -> Option<FailureCategory> {
    RULES
        .iter()
        .find(|(needle, _)| line.contains(needle))
        .map(|(_, category)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_rule() {
        assert_eq!(
            classify("Compilation Error in model orders"),
            Some(FailureCategory::Compilation)
        );
        assert_eq!(
            classify("Database Error in model customers"),
            Some(FailureCategory::Database)
        );
        assert_eq!(
            classify("Runtime Error: could not find profile"),
            Some(FailureCategory::Runtime)
        );
        assert_eq!(
            classify("1 of 3 FAIL 2 not_null_orders_id"),
            Some(FailureCategory::TestFailure)
        );
        assert_eq!(classify("1 of 3 OK created view model"), None);
    }

    #[test]
    fn test_classify_order_wins() {
        // Both rules match, the earlier one in the table is reported
        let line = "FAIL: Database Error while Compilation Error was raised";
        assert_eq!(classify(line), Some(FailureCategory::Compilation));
    }

    #[test]
    fn test_classify_case_sensitive_substring() {
        assert_eq!(classify("compilation error"), None);
        assert_eq!(classify("fail"), None);
        // Substring match, not whole word
        assert_eq!(classify("FAILOVER complete"), Some(FailureCategory::TestFailure));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(FailureCategory::TestFailure.to_string(), "TEST_FAILURE");
        assert_eq!(
            serde_json::to_string(&FailureCategory::Compilation).unwrap(),
            "\"COMPILATION\""
        );
    }
}
