//! Inspection summaries exchanged with other tools.
//!
//! The JSON exchange format carries counts and paths only. Issues are never
//! serialised, so a deserialised [`InspectionResult`] always has an empty
//! issue list.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Issue, Severity};

/// The outcome of one inspection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Exchange", into = "Exchange")]
pub struct InspectionResult {
    /// The inspected project directory.
    pub project_path: PathBuf,
    /// The project name.
    pub project_name: String,
    /// Number of critical issues.
    pub critical_count: usize,
    /// Number of warnings.
    pub warning_count: usize,
    /// Number of informational issues.
    pub info_count: usize,
    /// The issues themselves. Not part of the exchange format.
    pub issues: Vec<Issue>,
    /// Where the markdown report was written, if anywhere.
    pub report_path: Option<PathBuf>,
    /// When the inspection ran.
    pub timestamp: DateTime<Utc>,
}

impl InspectionResult {
    /// Summarises a list of issues, counting them by severity.
    #[must_use]
    pub fn new(
        project_path: PathBuf,
        project_name: String,
        issues: Vec<Issue>,
        report_path: Option<PathBuf>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let count = |severity| {
            issues
                .iter()
                .filter(|issue| issue.severity() == severity)
                .count()
        };

        Self {
            project_path,
            project_name,
            critical_count: count(Severity::Critical),
            warning_count: count(Severity::Warning),
            info_count: count(Severity::Info),
            issues,
            report_path,
            timestamp,
        }
    }

    /// Total number of issues across all severities.
    #[must_use]
    pub const fn total_issues(&self) -> usize {
        self.critical_count + self.warning_count + self.info_count
    }

    /// Whether any critical issue was found.
    #[must_use]
    pub const fn has_critical_issues(&self) -> bool {
        self.critical_count > 0
    }

    /// Whether any warning or informational issue was found.
    #[must_use]
    pub const fn has_warnings(&self) -> bool {
        self.warning_count > 0 || self.info_count > 0
    }

    /// Serialises to the JSON exchange format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialises from the JSON exchange format.
    ///
    /// The returned result has no issues.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid exchange document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Exchange {
    project_path: PathBuf,
    project_name: String,
    critical_count: usize,
    warning_count: usize,
    info_count: usize,
    report_path: Option<PathBuf>,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_deserializing)]
    summary: Summary,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    total_issues: usize,
    severity_breakdown: Breakdown,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Breakdown {
    critical: usize,
    warning: usize,
    info: usize,
}

impl From<Exchange> for InspectionResult {
    fn from(exchange: Exchange) -> Self {
        let Exchange {
            project_path,
            project_name,
            critical_count,
            warning_count,
            info_count,
            report_path,
            timestamp,
            summary: _,
        } = exchange;

        Self {
            project_path,
            project_name,
            critical_count,
            warning_count,
            info_count,
            issues: Vec::new(),
            report_path,
            timestamp,
        }
    }
}

impl From<InspectionResult> for Exchange {
    fn from(result: InspectionResult) -> Self {
        let summary = Summary {
            total_issues: result.total_issues(),
            severity_breakdown: Breakdown {
                critical: result.critical_count,
                warning: result.warning_count,
                info: result.info_count,
            },
        };

        Self {
            project_path: result.project_path,
            project_name: result.project_name,
            critical_count: result.critical_count,
            warning_count: result.warning_count,
            info_count: result.info_count,
            report_path: result.report_path,
            timestamp: result.timestamp,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{DocumentKind, Location};

    fn issue(severity: Severity, n: usize) -> Issue {
        Issue::new(
            severity.issue_id(n),
            severity,
            "title".to_string(),
            String::new(),
            Location::new(DocumentKind::Requirement, 0),
        )
        .unwrap()
    }

    fn result() -> InspectionResult {
        InspectionResult::new(
            PathBuf::from("/specs/demo"),
            "demo".to_string(),
            vec![
                issue(Severity::Critical, 1),
                issue(Severity::Warning, 1),
                issue(Severity::Warning, 2),
            ],
            Some(PathBuf::from("/specs/demo/inspection-report.md")),
            Utc.with_ymd_and_hms(2025, 7, 14, 7, 15, 0).unwrap(),
        )
    }

    #[test]
    fn counts_by_severity() {
        let result = result();
        assert_eq!(result.critical_count, 1);
        assert_eq!(result.warning_count, 2);
        assert_eq!(result.info_count, 0);
        assert_eq!(result.total_issues(), 3);
        assert!(result.has_critical_issues());
        assert!(result.has_warnings());
    }

    #[test]
    fn info_alone_counts_as_warnings() {
        let result = InspectionResult::new(
            PathBuf::new(),
            String::new(),
            vec![issue(Severity::Info, 1)],
            None,
            Utc::now(),
        );
        assert!(!result.has_critical_issues());
        assert!(result.has_warnings());
    }

    #[test]
    fn json_carries_summary() {
        let json: serde_json::Value =
            serde_json::from_str(&result().to_json().unwrap()).unwrap();

        assert_eq!(json["project_name"], "demo");
        assert_eq!(json["timestamp"], "2025-07-14T07:15:00Z");
        assert_eq!(json["summary"]["total_issues"], 3);
        assert_eq!(json["summary"]["severity_breakdown"]["Warning"], 2);
        assert!(json.get("issues").is_none());
    }

    #[test]
    fn issues_do_not_survive_exchange() {
        let original = result();
        let restored = InspectionResult::from_json(&original.to_json().unwrap()).unwrap();

        assert!(restored.issues.is_empty());
        assert_eq!(restored.critical_count, original.critical_count);
        assert_eq!(restored.warning_count, original.warning_count);
        assert_eq!(restored.report_path, original.report_path);
        assert_eq!(restored.timestamp, original.timestamp);
    }
}
