use std::collections::BTreeSet;

use tracing::instrument;

use crate::{
    check::Rule,
    domain::{DocumentKind, Identifier, Issue, Location, ParsedDocument, Severity, SpecSet},
};

/// Checks identifier references between the requirement document and the
/// documents that refer to it.
///
/// - An identifier used in the design or tasks document but never defined in
///   the requirement document is a critical issue. Design is checked before
///   tasks, and both share one sequence of critical numbers.
/// - An identifier defined in the requirement document but referenced by
///   neither of the others is an informational issue.
///
/// Identifiers are visited in their natural order so numbering is stable
/// between runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossReference;

impl Rule for CrossReference {
    fn name(&self) -> &'static str {
        "cross-reference"
    }

    #[instrument(level = "debug", skip_all)]
    fn check(&self, specs: &SpecSet) -> anyhow::Result<Vec<Issue>> {
        let defined = specs.requirement().identifiers();
        let mut issues = Vec::new();

        let mut critical = 0;
        for document in [specs.design(), specs.tasks()] {
            for identifier in document.identifiers().difference(defined) {
                critical += 1;
                issues.push(undefined(critical, identifier, document)?);
            }
        }

        let referenced: BTreeSet<&Identifier> = specs
            .design()
            .identifiers()
            .union(specs.tasks().identifiers())
            .collect();

        let mut info = 0;
        for identifier in defined.iter().filter(|id| !referenced.contains(id)) {
            info += 1;
            issues.push(unreferenced(info, identifier, specs.requirement())?);
        }

        Ok(issues)
    }
}

fn locate(identifier: &Identifier, document: &ParsedDocument) -> Location {
    let line = document
        .line_of(&identifier.to_string())
        .unwrap_or_default();
    Location::new(document.kind(), line)
}

fn undefined(
    n: usize,
    identifier: &Identifier,
    document: &ParsedDocument,
) -> anyhow::Result<Issue> {
    let file = document.kind().file_name();
    let requirement = DocumentKind::Requirement.file_name();

    let issue = Issue::new(
        Severity::Critical.issue_id(n),
        Severity::Critical,
        format!("Requirement ID {identifier} does not exist"),
        format!("{identifier} is referenced in {file} but not defined in {requirement}"),
        locate(identifier, document),
    )?
    .with_suggestion(format!(
        "Add {identifier} to {requirement} or fix the reference in {file}"
    ))
    .with_related([identifier.clone()]);

    Ok(issue)
}

fn unreferenced(
    n: usize,
    identifier: &Identifier,
    requirement: &ParsedDocument,
) -> anyhow::Result<Issue> {
    let issue = Issue::new(
        Severity::Info.issue_id(n),
        Severity::Info,
        format!("Requirement ID {identifier} is not referenced"),
        format!(
            "{identifier} is defined but not referenced in {} or {}",
            DocumentKind::Design.file_name(),
            DocumentKind::Tasks.file_name()
        ),
        locate(identifier, requirement),
    )?
    .with_suggestion("Is this requirement still needed? Consider removing it if obsolete.")
    .with_related([identifier.clone()]);

    Ok(issue)
}
