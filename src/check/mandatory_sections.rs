use tracing::instrument;

use crate::{
    check::Rule,
    domain::{Config, DocumentKind, Issue, Location, ParsedDocument, Severity, SpecSet},
};

/// Checks that each document contains its mandatory sections.
///
/// A required title is satisfied when it occurs, ignoring case, within at
/// least one section title of the document. Each missing title is reported as
/// a warning at the top of the document. Warnings are numbered by a single
/// counter running across requirement, design and tasks, in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MandatorySections {
    required: [Vec<String>; 3],
}

impl MandatorySections {
    /// Takes the required titles for each document kind from the
    /// configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            required: DocumentKind::ALL.map(|kind| config.mandatory_sections(kind)),
        }
    }

    /// The required titles for a document kind.
    #[must_use]
    pub fn required(&self, kind: DocumentKind) -> &[String] {
        let slot = match kind {
            DocumentKind::Requirement => 0,
            DocumentKind::Design => 1,
            DocumentKind::Tasks => 2,
        };
        &self.required[slot]
    }

    /// The required titles that no section of `document` satisfies.
    #[must_use]
    pub fn missing<'a>(&'a self, document: &ParsedDocument) -> Vec<&'a str> {
        let existing: Vec<String> = document.section_titles().map(str::to_lowercase).collect();

        self.required(document.kind())
            .iter()
            .filter(|required| {
                let required = required.to_lowercase();
                !existing.iter().any(|title| title.contains(&required))
            })
            .map(String::as_str)
            .collect()
    }
}

impl Default for MandatorySections {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Rule for MandatorySections {
    fn name(&self) -> &'static str {
        "mandatory-sections"
    }

    #[instrument(level = "debug", skip_all)]
    fn check(&self, specs: &SpecSet) -> anyhow::Result<Vec<Issue>> {
        let mut issues = Vec::new();

        for document in specs.documents() {
            let file = document.kind().file_name();
            for title in self.missing(document) {
                let issue = Issue::new(
                    Severity::Warning.issue_id(issues.len() + 1),
                    Severity::Warning,
                    format!("Missing mandatory section: {title}"),
                    format!("Document {file} should contain a '{title}' section"),
                    Location::new(document.kind(), 0),
                )?
                .with_suggestion(format!("Add a '{title}' section to {file}"));
                issues.push(issue);
            }
        }

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::Language, storage::markdown::parse};

    const REQUIREMENT: &str = "\
# Overview
## Functional Requirements
## Non-Functional Requirements
## Constraints
## Assumptions
";
    const DESIGN: &str = "# Architecture Overview\n# Technology Stack\n# Data Model\n";
    const TASKS: &str = "# Task List\n# Priority\n";

    fn specs(requirement: &str, design: &str, tasks: &str) -> SpecSet {
        SpecSet::new(
            "demo",
            parse(requirement, DocumentKind::Requirement),
            parse(design, DocumentKind::Design),
            parse(tasks, DocumentKind::Tasks),
        )
        .unwrap()
    }

    #[test]
    fn complete_documents_have_no_warnings() {
        let specs = specs(REQUIREMENT, DESIGN, TASKS);
        assert!(MandatorySections::default().check(&specs).unwrap().is_empty());
    }

    #[test]
    fn empty_documents_miss_everything() {
        let issues = MandatorySections::default()
            .check(&specs("", "", ""))
            .unwrap();

        assert_eq!(issues.len(), 10);
        assert!(issues.iter().all(|i| i.severity() == Severity::Warning));
        assert!(issues.iter().all(|i| i.location().line == 0));

        let ids: Vec<_> = issues.iter().map(Issue::id).collect();
        let expected: Vec<_> = (1..=10).map(|n| Severity::Warning.issue_id(n)).collect();
        assert_eq!(ids, expected);

        let files: Vec<_> = issues.iter().map(|i| i.location().file_name()).collect();
        assert_eq!(&files[..5], ["requirement.md"; 5]);
        assert_eq!(&files[5..8], ["design.md"; 3]);
        assert_eq!(&files[8..], ["tasks.md"; 2]);
    }

    #[test]
    fn missing_one_section_gives_one_warning() {
        let requirement = REQUIREMENT.replace("# Overview\n", "# Summary\n");
        let issues = MandatorySections::default()
            .check(&specs(&requirement, DESIGN, TASKS))
            .unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title(), "Missing mandatory section: Overview");
        assert_eq!(
            issues[0].suggestion(),
            Some("Add a 'Overview' section to requirement.md")
        );
    }

    #[test]
    fn match_ignores_case_and_allows_substrings() {
        let tasks = "# TASK LIST\n## Priority and Ordering\n";
        let issues = MandatorySections::default()
            .check(&specs(REQUIREMENT, DESIGN, tasks))
            .unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn multi_line_heading_satisfies_title() {
        let tasks = "Task\nList\n=========\n\n# Priority\n";
        let issues = MandatorySections::default()
            .check(&specs(REQUIREMENT, DESIGN, tasks))
            .unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn nested_headings_count() {
        let design = "# Design\n## 1. Architecture Overview\n### Technology Stack\n#### Data Model\n";
        let issues = MandatorySections::default()
            .check(&specs(REQUIREMENT, design, TASKS))
            .unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn japanese_titles() {
        let rule = MandatorySections::new(&Config::with_language(Language::Ja));
        let requirement = parse("# 1. 概要\n\n本文\n", DocumentKind::Requirement);

        let missing = rule.missing(&requirement);
        assert!(!missing.contains(&"概要"));
        assert_eq!(missing, ["機能要件", "非機能要件", "制約事項", "前提条件"]);
    }

    #[test]
    fn configured_titles_replace_defaults() {
        let mut config = Config::default();
        config.set_mandatory_sections(DocumentKind::Tasks, vec!["Milestones".to_string()]);
        let rule = MandatorySections::new(&config);

        let tasks = parse("# Task List\n# Priority\n", DocumentKind::Tasks);
        assert_eq!(rule.missing(&tasks), ["Milestones"]);
    }
}
