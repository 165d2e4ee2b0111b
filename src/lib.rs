//! Consistency checks for specification documents
//!
//! A project is a directory holding `requirement.md`, `design.md` and
//! `tasks.md`. Each document is parsed into a section tree and a set of
//! identifier tokens such as `[REQ-001]`; a set of rules then cross-checks the
//! documents and reports issues by severity.

pub mod domain;
pub use domain::{
    Config, DocumentKind, Identifier, InspectionResult, Issue, ParsedDocument, Section, Severity,
    SpecSet,
};

/// Rules and the engine that runs them.
pub mod check;
pub use check::{Engine, Rule};

/// Rendering of issues as console text or markdown.
pub mod report;
pub use report::{Report, Verdict};

/// Reading and parsing documents from disk.
pub mod storage;
pub use storage::{LoadError, SpecFiles};
