use std::{
    collections::{BTreeSet, HashMap},
    fmt,
};

use crate::domain::Identifier;

/// The role a document plays in a specification set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    /// `requirement.md`: defines identifiers.
    Requirement,
    /// `design.md`: references identifiers.
    Design,
    /// `tasks.md`: references identifiers.
    Tasks,
}

impl DocumentKind {
    /// Every kind, in inspection order.
    pub const ALL: [Self; 3] = [Self::Requirement, Self::Design, Self::Tasks];

    /// The file name this kind of document is loaded from.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Requirement => "requirement.md",
            Self::Design => "design.md",
            Self::Tasks => "tasks.md",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Requirement => "requirement",
            Self::Design => "design",
            Self::Tasks => "tasks",
        };
        f.write_str(name)
    }
}

/// A heading-delimited region of a document.
///
/// Children always have a strictly greater level than their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) level: u8,
    pub(crate) children: Vec<Section>,
}

impl Section {
    /// The heading text.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The body text collected between this heading and the next one.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The heading depth, from 1 to 6.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Nested sections, in document order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", "#".repeat(usize::from(self.level)), self.title)
    }
}

/// A single document after structural parsing.
///
/// Sections are held as a tree. Title lookup goes through a flat index in
/// which a later section with the same (case-sensitive) title replaces an
/// earlier one; the tree still holds both.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    kind: DocumentKind,
    raw_text: String,
    sections: Vec<Section>,
    index: HashMap<String, Vec<usize>>,
    identifiers: BTreeSet<Identifier>,
}

impl ParsedDocument {
    pub(crate) const fn new(
        kind: DocumentKind,
        raw_text: String,
        sections: Vec<Section>,
        index: HashMap<String, Vec<usize>>,
        identifiers: BTreeSet<Identifier>,
    ) -> Self {
        Self {
            kind,
            raw_text,
            sections,
            index,
            identifiers,
        }
    }

    /// The kind this document was parsed as.
    #[must_use]
    pub const fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// The unmodified document text.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// The top-level sections of the tree.
    #[must_use]
    pub fn root_sections(&self) -> &[Section] {
        &self.sections
    }

    /// Every distinct identifier token found in the text.
    #[must_use]
    pub const fn identifiers(&self) -> &BTreeSet<Identifier> {
        &self.identifiers
    }

    /// Looks up a section by exact title, at any depth.
    #[must_use]
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.index.get(title).and_then(|path| self.resolve(path))
    }

    /// Iterates the flat title index.
    ///
    /// Iteration order is unspecified.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.index.iter().filter_map(move |(title, path)| {
            self.resolve(path).map(|section| (title.as_str(), section))
        })
    }

    /// Iterates the distinct section titles.
    pub fn section_titles(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// The number of distinct section titles.
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.index.len()
    }

    /// Finds the zero-based line of the first occurrence of `needle`.
    #[must_use]
    pub fn line_of(&self, needle: &str) -> Option<usize> {
        self.raw_text.lines().position(|line| line.contains(needle))
    }

    fn resolve(&self, path: &[usize]) -> Option<&Section> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.sections.get(*first)?, |section, &i| {
                section.children.get(i)
            })
    }
}

/// Exactly one parsed document of each kind, plus the project name.
#[derive(Debug, Clone)]
pub struct SpecSet {
    project_name: String,
    requirement: ParsedDocument,
    design: ParsedDocument,
    tasks: ParsedDocument,
}

impl SpecSet {
    /// Assembles a specification set.
    ///
    /// # Errors
    ///
    /// Returns [`KindMismatch`] if any document was parsed as a different kind
    /// from the slot it is placed in.
    pub fn new(
        project_name: impl Into<String>,
        requirement: ParsedDocument,
        design: ParsedDocument,
        tasks: ParsedDocument,
    ) -> Result<Self, KindMismatch> {
        for (expected, document) in [
            (DocumentKind::Requirement, &requirement),
            (DocumentKind::Design, &design),
            (DocumentKind::Tasks, &tasks),
        ] {
            if document.kind() != expected {
                return Err(KindMismatch {
                    expected,
                    found: document.kind(),
                });
            }
        }

        Ok(Self {
            project_name: project_name.into(),
            requirement,
            design,
            tasks,
        })
    }

    /// Assembles a set from documents parsed with the matching kinds.
    pub(crate) fn from_documents(
        project_name: String,
        requirement: ParsedDocument,
        design: ParsedDocument,
        tasks: ParsedDocument,
    ) -> Self {
        debug_assert_eq!(requirement.kind(), DocumentKind::Requirement);
        debug_assert_eq!(design.kind(), DocumentKind::Design);
        debug_assert_eq!(tasks.kind(), DocumentKind::Tasks);
        Self {
            project_name,
            requirement,
            design,
            tasks,
        }
    }

    /// The project name, taken from the directory name.
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// The requirement document.
    #[must_use]
    pub const fn requirement(&self) -> &ParsedDocument {
        &self.requirement
    }

    /// The design document.
    #[must_use]
    pub const fn design(&self) -> &ParsedDocument {
        &self.design
    }

    /// The tasks document.
    #[must_use]
    pub const fn tasks(&self) -> &ParsedDocument {
        &self.tasks
    }

    /// Returns the document of the given kind.
    #[must_use]
    pub const fn document(&self, kind: DocumentKind) -> &ParsedDocument {
        match kind {
            DocumentKind::Requirement => &self.requirement,
            DocumentKind::Design => &self.design,
            DocumentKind::Tasks => &self.tasks,
        }
    }

    /// Iterates the three documents in inspection order.
    pub fn documents(&self) -> impl Iterator<Item = &ParsedDocument> {
        DocumentKind::ALL.into_iter().map(|kind| self.document(kind))
    }
}

/// A document was placed in the slot for a different kind.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("expected a {expected} document, found a {found} document")]
pub struct KindMismatch {
    /// The kind the slot requires.
    pub expected: DocumentKind,
    /// The kind of the document supplied.
    pub found: DocumentKind,
}
