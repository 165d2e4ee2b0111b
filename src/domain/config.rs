use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::DocumentKind;

/// The name of the configuration file looked for inside a project directory.
pub const FILE_NAME: &str = "spec-inspect.toml";

/// Configuration for an inspection run.
///
/// Mandatory section titles are data rather than code: the built-in sets are
/// chosen by [`Language`], and any of them can be replaced per document kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Which built-in set of section titles to use.
    pub language: Language,

    /// Explicit replacements for the built-in titles.
    overrides: Overrides,
}

/// The language of the built-in mandatory section titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English titles.
    #[default]
    En,
    /// Japanese titles.
    Ja,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
struct Overrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requirement: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    design: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tasks: Option<Vec<String>>,
}

const EN_REQUIREMENT: &[&str] = &[
    "Overview",
    "Functional Requirements",
    "Non-Functional Requirements",
    "Constraints",
    "Assumptions",
];
const EN_DESIGN: &[&str] = &["Architecture Overview", "Technology Stack", "Data Model"];
const EN_TASKS: &[&str] = &["Task List", "Priority"];

const JA_REQUIREMENT: &[&str] = &["概要", "機能要件", "非機能要件", "制約事項", "前提条件"];
const JA_DESIGN: &[&str] = &["アーキテクチャ概要", "技術スタック", "データモデル"];
const JA_TASKS: &[&str] = &["タスク一覧", "優先順位"];

impl Config {
    /// Creates a configuration using the built-in titles for `language`.
    #[must_use]
    pub fn with_language(language: Language) -> Self {
        Self {
            language,
            overrides: Overrides::default(),
        }
    }

    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(Error::Read)?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads `spec-inspect.toml` from the project directory if it exists,
    /// falling back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(project: &Path) -> Result<Self, Error> {
        let path = project.join(FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Replaces the mandatory section titles for one document kind.
    pub fn set_mandatory_sections(&mut self, kind: DocumentKind, titles: Vec<String>) {
        let slot = match kind {
            DocumentKind::Requirement => &mut self.overrides.requirement,
            DocumentKind::Design => &mut self.overrides.design,
            DocumentKind::Tasks => &mut self.overrides.tasks,
        };
        *slot = Some(titles);
    }

    /// The mandatory section titles for a document kind.
    #[must_use]
    pub fn mandatory_sections(&self, kind: DocumentKind) -> Vec<String> {
        let explicit = match kind {
            DocumentKind::Requirement => &self.overrides.requirement,
            DocumentKind::Design => &self.overrides.design,
            DocumentKind::Tasks => &self.overrides.tasks,
        };

        if let Some(titles) = explicit {
            return titles.clone();
        }

        let builtin = match (self.language, kind) {
            (Language::En, DocumentKind::Requirement) => EN_REQUIREMENT,
            (Language::En, DocumentKind::Design) => EN_DESIGN,
            (Language::En, DocumentKind::Tasks) => EN_TASKS,
            (Language::Ja, DocumentKind::Requirement) => JA_REQUIREMENT,
            (Language::Ja, DocumentKind::Design) => JA_DESIGN,
            (Language::Ja, DocumentKind::Tasks) => JA_TASKS,
        };
        builtin.iter().map(ToString::to_string).collect()
    }
}

/// Errors that can occur when loading a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("failed to read config file")]
    Read(#[source] std::io::Error),
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        language: Language,

        #[serde(default)]
        mandatory_sections: Overrides,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                language,
                mandatory_sections,
            } => Self {
                language,
                overrides: mandatory_sections,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            language: config.language,
            mandatory_sections: config.overrides,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_are_english() {
        let config = Config::default();
        assert_eq!(
            config.mandatory_sections(DocumentKind::Tasks),
            ["Task List", "Priority"]
        );
        assert_eq!(config.mandatory_sections(DocumentKind::Requirement).len(), 5);
        assert_eq!(config.mandatory_sections(DocumentKind::Design).len(), 3);
    }

    #[test]
    fn japanese_titles() {
        let config = Config::with_language(Language::Ja);
        assert_eq!(
            config.mandatory_sections(DocumentKind::Requirement)[0],
            "概要"
        );
    }

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            "_version = \"1\"\nlanguage = \"ja\"\n\n[mandatory_sections]\ntasks = [\"Backlog\"]\n"
                .as_bytes(),
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.language, Language::Ja);
        assert_eq!(config.mandatory_sections(DocumentKind::Tasks), ["Backlog"]);
        assert_eq!(
            config.mandatory_sections(DocumentKind::Design),
            ["アーキテクチャ概要", "技術スタック", "データモデル"]
        );
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let error = Config::load(&tmp.path().join("missing.toml")).unwrap_err();
        assert!(matches!(error, Error::Read(_)));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nlanguage = \"klingon\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(matches!(error, Error::Parse(_)));
    }

    #[test]
    fn load_or_default_without_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_or_default(tmp.path()).unwrap(), Config::default());
    }

    #[test]
    fn empty_file_returns_default() {
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, Config::default());
    }

    #[test]
    fn toml_round_trip_keeps_overrides() {
        let mut config = Config::default();
        config.set_mandatory_sections(DocumentKind::Design, vec!["Interfaces".to_string()]);

        let restored: Config = toml::from_str(&toml::to_string(&config).unwrap()).unwrap();
        assert_eq!(restored, config);
    }
}
