//! Domain models for specification inspection.
//!
//! This module contains the core domain types: identifier tokens, parsed
//! documents and their section trees, detected issues, and configuration.

/// Configuration of mandatory section titles.
pub mod config;
pub use config::{Config, Error as ConfigError, Language};

mod document;
pub use document::{DocumentKind, KindMismatch, ParsedDocument, Section, SpecSet};

/// Bracketed identifier tokens and their extraction.
pub mod identifier;
pub use identifier::{Error as IdentifierError, Identifier, IdentifierKind};

mod inspection;
pub use inspection::InspectionResult;

/// Detected problems and their severities.
pub mod issue;
pub use issue::{Error as IssueError, Issue, Location, Severity};
