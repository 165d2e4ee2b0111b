//! Rendering issues for people.
//!
//! Rendering is pure presentation: issues are grouped by severity, most
//! severe first, and formatted either for a terminal or as a markdown
//! document. The only decision made here is the exit status.

use std::{fmt, process::ExitCode};

use chrono::{DateTime, Local};
use owo_colors::{AnsiColors, OwoColorize};

use crate::domain::{DocumentKind, Issue, Severity};

/// How a severity is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    /// A symbol shown before headings.
    pub icon: &'static str,
    /// The heading used for the console group.
    pub console_heading: &'static str,
    /// The heading used for the markdown section.
    pub markdown_heading: &'static str,
    /// The terminal colour.
    pub color: AnsiColors,
}

/// Presentation attributes, indexed in [`Severity::ALL`] order.
const APPEARANCE: [Appearance; 3] = [
    Appearance {
        icon: "⛔",
        console_heading: "CRITICAL ISSUES",
        markdown_heading: "Critical Issues (implementation blockers)",
        color: AnsiColors::BrightRed,
    },
    Appearance {
        icon: "⚠️",
        console_heading: "WARNINGS",
        markdown_heading: "Warnings (needs review)",
        color: AnsiColors::BrightYellow,
    },
    Appearance {
        icon: "ℹ️",
        console_heading: "INFO",
        markdown_heading: "Info (suggested improvements)",
        color: AnsiColors::BrightBlue,
    },
];

/// Looks up how a severity is presented.
#[must_use]
pub const fn appearance(severity: Severity) -> Appearance {
    match severity {
        Severity::Critical => APPEARANCE[0],
        Severity::Warning => APPEARANCE[1],
        Severity::Info => APPEARANCE[2],
    }
}

/// Whether the run passed: any critical issue means failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No critical issues.
    Pass,
    /// At least one critical issue.
    Fail,
}

impl Verdict {
    /// Decides the verdict for a list of issues.
    #[must_use]
    pub fn of(issues: &[Issue]) -> Self {
        if issues.iter().any(|issue| issue.severity() == Severity::Critical) {
            Self::Fail
        } else {
            Self::Pass
        }
    }
}

impl From<Verdict> for ExitCode {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Pass => Self::SUCCESS,
            Verdict::Fail => Self::FAILURE,
        }
    }
}

/// A report over one inspection's issues.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    project_name: &'a str,
    issues: &'a [Issue],
}

impl<'a> Report<'a> {
    /// Creates a report.
    #[must_use]
    pub const fn new(project_name: &'a str, issues: &'a [Issue]) -> Self {
        Self {
            project_name,
            issues,
        }
    }

    /// The exit status implied by the issues.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        Verdict::of(self.issues)
    }

    /// Number of issues of the given severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.with_severity(severity).count()
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &'a Issue> {
        self.issues
            .iter()
            .filter(move |issue| issue.severity() == severity)
    }

    /// Renders the report for a terminal.
    ///
    /// When `color` is false the output contains no escape sequences.
    #[must_use]
    pub fn console(&self, color: bool) -> String {
        Console {
            report: *self,
            color,
        }
        .to_string()
    }

    /// Renders the report as a markdown document.
    #[must_use]
    pub fn markdown(&self, generated: DateTime<Local>) -> String {
        Markdown {
            report: *self,
            generated,
        }
        .to_string()
    }
}

/// Terminal rendering of a [`Report`].
struct Console<'a> {
    report: Report<'a>,
    color: bool,
}

impl Console<'_> {
    fn paint(&self, text: &str, severity: Severity) -> String {
        if self.color {
            text.color(appearance(severity).color).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

impl fmt::Display for Console<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = &self.report;

        if self.color {
            writeln!(f, "\n{}", "Inspection summary".bold())?;
        } else {
            writeln!(f, "\nInspection summary")?;
        }
        writeln!(f, "  Total: {} issues", report.issues.len())?;
        for severity in Severity::ALL {
            let line = format!(
                "{} {}: {}",
                appearance(severity).icon,
                severity,
                report.count(severity)
            );
            writeln!(f, "  {}", self.paint(&line, severity))?;
        }

        for severity in Severity::ALL {
            if report.count(severity) == 0 {
                continue;
            }
            let look = appearance(severity);
            let heading = format!("{} {}", look.icon, look.console_heading);
            writeln!(f, "\n{}", self.paint(&heading, severity))?;

            for issue in report.with_severity(severity) {
                let title = format!("[{}] {}", issue.id(), issue.title());
                writeln!(f, "\n{}", self.paint(&title, severity))?;
                writeln!(f, "  📄 {}", issue.location())?;
                writeln!(f, "  {}", issue.description())?;
                if let Some(suggestion) = issue.suggestion() {
                    writeln!(f, "  💡 {suggestion}")?;
                }
            }
        }

        Ok(())
    }
}

/// Markdown rendering of a [`Report`].
struct Markdown<'a> {
    report: Report<'a>,
    generated: DateTime<Local>,
}

impl fmt::Display for Markdown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = &self.report;
        let files = DocumentKind::ALL
            .map(DocumentKind::file_name)
            .join(", ");

        writeln!(f, "# spec-inspect report - {}\n", report.project_name)?;
        writeln!(f, "## Summary\n")?;
        writeln!(
            f,
            "- Inspected at: {}",
            self.generated.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(f, "- Inspected files: {files}")?;
        writeln!(
            f,
            "- Issues found: **Critical: {}, Warning: {}, Info: {}**\n",
            report.count(Severity::Critical),
            report.count(Severity::Warning),
            report.count(Severity::Info)
        )?;

        for severity in Severity::ALL {
            if report.count(severity) == 0 {
                continue;
            }
            let look = appearance(severity);
            writeln!(f, "## {} {}\n", look.icon, look.markdown_heading)?;

            for issue in report.with_severity(severity) {
                writeln!(f, "### [{}] {}\n", issue.id(), issue.title())?;
                writeln!(f, "- **File**: `{}`", issue.location())?;
                writeln!(f, "- **Detail**: {}", issue.description())?;
                if let Some(suggestion) = issue.suggestion() {
                    writeln!(f, "- **Suggestion**: {suggestion}")?;
                }
                if !issue.related().is_empty() {
                    let related = issue
                        .related()
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    writeln!(f, "- **Related**: {related}")?;
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}
