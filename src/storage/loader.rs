//! Loading the three specification documents from a project directory.

use std::{
    fs, io,
    path::{Path, PathBuf},
    string::FromUtf8Error,
};

use tracing::instrument;

use crate::{
    domain::{DocumentKind, SpecSet},
    storage::markdown,
};

/// The raw contents of a project's three specification documents.
///
/// Files are read fully and closed before any parsing happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFiles {
    /// The canonical project directory.
    pub project_path: PathBuf,
    /// The last segment of the project directory.
    pub project_name: String,
    /// Contents of `requirement.md`.
    pub requirement: String,
    /// Contents of `design.md`.
    pub design: String,
    /// Contents of `tasks.md`.
    pub tasks: String,
}

impl SpecFiles {
    /// Reads `requirement.md`, `design.md` and `tasks.md` from `path`.
    ///
    /// # Errors
    ///
    /// This method can fail if:
    ///
    /// - the path does not exist or is not a directory
    /// - any of the three files is missing (all missing names are reported)
    /// - a file cannot be read or is not valid UTF-8
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let project_path = path.canonicalize().map_err(|source| LoadError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;

        if !project_path.is_dir() {
            return Err(LoadError::NotADirectory(path.to_path_buf()));
        }

        let missing: Vec<&'static str> = DocumentKind::ALL
            .iter()
            .map(|kind| kind.file_name())
            .filter(|name| !project_path.join(name).is_file())
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingFiles {
                path: path.to_path_buf(),
                files: missing,
            });
        }

        let project_name = project_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            requirement: read(&project_path, DocumentKind::Requirement)?,
            design: read(&project_path, DocumentKind::Design)?,
            tasks: read(&project_path, DocumentKind::Tasks)?,
            project_name,
            project_path,
        })
    }

    /// Parses all three documents into a [`SpecSet`].
    #[must_use]
    #[instrument(level = "debug", skip(self), fields(project = %self.project_name))]
    pub fn parse(&self) -> SpecSet {
        SpecSet::from_documents(
            self.project_name.clone(),
            markdown::parse(&self.requirement, DocumentKind::Requirement),
            markdown::parse(&self.design, DocumentKind::Design),
            markdown::parse(&self.tasks, DocumentKind::Tasks),
        )
    }
}

fn read(dir: &Path, kind: DocumentKind) -> Result<String, LoadError> {
    let file = kind.file_name();
    let bytes = fs::read(dir.join(file)).map_err(|source| LoadError::Io { file, source })?;
    String::from_utf8(bytes).map_err(|source| LoadError::Encoding { file, source })
}

/// Errors that can occur when loading a project's documents.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The project path could not be resolved.
    #[error("invalid project path: {}", path.display())]
    NotFound {
        /// The path as given.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The project path exists but is not a directory.
    #[error("project path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// One or more of the required files are absent.
    #[error("missing required files in {}: {}", path.display(), files.join(", "))]
    MissingFiles {
        /// The project path as given.
        path: PathBuf,
        /// The names of every missing file.
        files: Vec<&'static str>,
    },

    /// A file could not be read.
    #[error("error reading {file}")]
    Io {
        /// The file name.
        file: &'static str,
        /// The underlying error.
        source: io::Error,
    },

    /// A file is not valid UTF-8.
    #[error("file encoding error in {file}")]
    Encoding {
        /// The file name.
        file: &'static str,
        /// The underlying error.
        source: FromUtf8Error,
    },
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn complete() -> TempDir {
        project(&[
            ("requirement.md", "# Overview\n[REQ-001]\n"),
            ("design.md", "# Data Model\n[REQ-001]\n"),
            ("tasks.md", "# Task List\n"),
        ])
    }

    #[test]
    fn loads_all_three_files() {
        let dir = complete();
        let files = SpecFiles::load(dir.path()).unwrap();

        assert_eq!(files.requirement, "# Overview\n[REQ-001]\n");
        assert_eq!(files.tasks, "# Task List\n");
        assert_eq!(
            files.project_name,
            dir.path().file_name().unwrap().to_string_lossy()
        );
    }

    #[test]
    fn parse_produces_matching_kinds() {
        let dir = complete();
        let specs = SpecFiles::load(dir.path()).unwrap().parse();

        assert_eq!(specs.requirement().kind(), DocumentKind::Requirement);
        assert_eq!(specs.design().kind(), DocumentKind::Design);
        assert_eq!(specs.tasks().kind(), DocumentKind::Tasks);
        assert!(specs.design().section("Data Model").is_some());
    }

    #[test]
    fn reports_every_missing_file() {
        let dir = project(&[("design.md", "")]);
        let error = SpecFiles::load(dir.path()).unwrap_err();

        match error {
            LoadError::MissingFiles { files, .. } => {
                assert_eq!(files, ["requirement.md", "tasks.md"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nonexistent_path_is_rejected() {
        let dir = TempDir::new().unwrap();
        let error = SpecFiles::load(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(error, LoadError::NotFound { .. }));
    }

    #[test]
    fn file_path_is_rejected() {
        let dir = complete();
        let error = SpecFiles::load(&dir.path().join("tasks.md")).unwrap_err();
        assert!(matches!(error, LoadError::NotADirectory(_)));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let dir = project(&[("requirement.md", ""), ("tasks.md", "")]);
        fs::write(dir.path().join("design.md"), b"\xff\xfe\xfd").unwrap();
        let error = SpecFiles::load(dir.path()).unwrap_err();
        assert!(matches!(
            error,
            LoadError::Encoding {
                file: "design.md",
                ..
            }
        ));
    }
}
