use std::{collections::BTreeSet, fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

/// Matches a bracketed identifier token anywhere in a document.
///
/// Digits are restricted to ASCII; `\d` would also accept other Unicode
/// decimal digits.
static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(REQ|NFR|CON|ASM|T)-([0-9]{3,})\]").expect("identifier pattern is valid")
});

/// The category prefix of an [`Identifier`].
///
/// The declaration order is the sort order of identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdentifierKind {
    /// Functional requirement (`REQ`).
    Requirement,
    /// Non-functional requirement (`NFR`).
    NonFunctional,
    /// Constraint (`CON`).
    Constraint,
    /// Assumption (`ASM`).
    Assumption,
    /// Implementation task (`T`).
    Task,
}

impl IdentifierKind {
    /// Every kind, in sort order.
    pub const ALL: [Self; 5] = [
        Self::Requirement,
        Self::NonFunctional,
        Self::Constraint,
        Self::Assumption,
        Self::Task,
    ];

    /// The literal prefix used in documents.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Requirement => "REQ",
            Self::NonFunctional => "NFR",
            Self::Constraint => "CON",
            Self::Assumption => "ASM",
            Self::Task => "T",
        }
    }
}

impl FromStr for IdentifierKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.prefix() == s)
            .ok_or_else(|| Error::Kind(s.to_string()))
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A bracketed, kind-prefixed reference token such as `[REQ-001]`.
///
/// The digit sequence is kept verbatim, so `[REQ-001]` and `[REQ-0001]` are
/// distinct identifiers.
///
/// ```
/// use spec_inspect::domain::{Identifier, IdentifierKind};
///
/// let id: Identifier = "[NFR-042]".parse().unwrap();
/// assert_eq!(id.kind(), IdentifierKind::NonFunctional);
/// assert_eq!(id.digits(), "042");
/// assert_eq!(id.to_string(), "[NFR-042]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier {
    kind: IdentifierKind,
    digits: String,
}

impl Identifier {
    /// Returns the kind prefix.
    #[must_use]
    pub const fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// Returns the digit sequence, leading zeros included.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Collects every distinct identifier token appearing in `text`.
    ///
    /// Matching is purely textual and case-sensitive on the prefix. Malformed
    /// text never fails; it simply yields fewer matches.
    #[must_use]
    pub fn extract(text: &str) -> BTreeSet<Self> {
        PATTERN
            .captures_iter(text)
            .filter_map(|captures| {
                let kind = captures.get(1)?.as_str().parse().ok()?;
                let digits = captures.get(2)?.as_str().to_string();
                Some(Self { kind, digits })
            })
            .collect()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.kind, self.digits)
    }
}

impl FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| Error::Syntax(s.to_string()))?;

        let (kind, digits) = inner
            .split_once('-')
            .ok_or_else(|| Error::Syntax(s.to_string()))?;

        let kind = kind.parse()?;

        if digits.len() < 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Digits(s.to_string()));
        }

        Ok(Self {
            kind,
            digits: digits.to_string(),
        })
    }
}

impl TryFrom<&str> for Identifier {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

/// Errors that can occur when parsing an [`Identifier`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The token is not of the form `[KIND-DIGITS]`.
    #[error("Invalid identifier format: {0}")]
    Syntax(String),

    /// The prefix is not one of the known kinds.
    #[error("Unknown identifier kind '{0}': expected one of REQ, NFR, CON, ASM, T")]
    Kind(String),

    /// The numeric part is shorter than three digits or not numeric.
    #[error("Invalid digits in identifier '{0}': expected at least three ASCII digits")]
    Digits(String),
}
