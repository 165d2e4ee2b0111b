use std::fmt;

use non_empty_string::NonEmptyString;

use crate::domain::{DocumentKind, Identifier};

/// How serious a detected problem is.
///
/// Ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Blocks implementation.
    Critical,
    /// Needs human review.
    Warning,
    /// Optional improvement.
    Info,
}

impl Severity {
    /// Every severity, most severe first.
    pub const ALL: [Self; 3] = [Self::Critical, Self::Warning, Self::Info];

    /// The upper-case label used in issue identifiers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }

    /// Formats the `n`th issue identifier for this severity, e.g.
    /// `CRITICAL-001`.
    #[must_use]
    pub fn issue_id(self, n: usize) -> String {
        format!("{}-{n:03}", self.label())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Critical => "Critical",
            Self::Warning => "Warning",
            Self::Info => "Info",
        };
        f.write_str(name)
    }
}

/// Where an issue was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The document the issue refers to.
    pub document: DocumentKind,
    /// Zero-based line number.
    pub line: usize,
}

impl Location {
    /// Creates a location.
    #[must_use]
    pub const fn new(document: DocumentKind, line: usize) -> Self {
        Self { document, line }
    }

    /// The name of the file the issue refers to.
    #[must_use]
    pub const fn file_name(&self) -> &'static str {
        self.document.file_name()
    }
}

impl fmt::Display for Location {
    /// Formats as `file:line` with a one-based line number.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file_name(), self.line + 1)
    }
}

/// A single detected specification problem.
///
/// Issues are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    id: NonEmptyString,
    severity: Severity,
    title: NonEmptyString,
    description: String,
    location: Location,
    suggestion: Option<String>,
    related: Vec<Identifier>,
}

impl Issue {
    /// Creates an issue with no suggestion and no related identifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` or `title` is empty.
    pub fn new(
        id: String,
        severity: Severity,
        title: String,
        description: String,
        location: Location,
    ) -> Result<Self, Error> {
        let id = NonEmptyString::new(id).map_err(|_| Error::EmptyId)?;
        let title = NonEmptyString::new(title).map_err(|_| Error::EmptyTitle)?;

        Ok(Self {
            id,
            severity,
            title,
            description,
            location,
            suggestion: None,
            related: Vec::new(),
        })
    }

    /// Attaches a fix suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attaches the identifiers this issue is about.
    #[must_use]
    pub fn with_related(mut self, related: impl IntoIterator<Item = Identifier>) -> Self {
        self.related = related.into_iter().collect();
        self
    }

    /// The severity-prefixed sequence label, e.g. `WARNING-003`.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// How serious the issue is.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// A one-line summary.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// A longer explanation.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Where the issue was found.
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// How the issue might be fixed, if known.
    #[must_use]
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Identifiers the issue refers to. Empty when there are none.
    #[must_use]
    pub fn related(&self) -> &[Identifier] {
        &self.related
    }
}

/// Errors that can occur when constructing an [`Issue`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The issue identifier was empty.
    #[error("issue identifier cannot be empty")]
    EmptyId,
    /// The issue title was empty.
    #[error("issue title cannot be empty")]
    EmptyTitle,
}
