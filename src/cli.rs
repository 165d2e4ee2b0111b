use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

pub mod terminal;

use anyhow::Context;
use chrono::{Local, Utc};
use clap::ArgAction;
use spec_inspect::{
    Config, Engine, InspectionResult, Report, Severity, SpecFiles, Verdict, domain::config,
};
use terminal::Colorize;
use tracing::info;

/// Inspect a specification project for consistency problems.
///
/// The project directory must contain requirement.md, design.md and tasks.md.
/// The exit code is 1 if any critical issue is found.
#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The project directory to inspect
    project: PathBuf,

    /// Write the markdown report to this file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// What to print to standard output
    #[arg(short, long, value_name = "FORMAT", default_value = "console")]
    format: Format,

    /// Configuration file [default: <PROJECT>/spec-inspect.toml, if present]
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a JSON summary of the inspection for other tools
    #[arg(long, value_name = "PATH")]
    result: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum Format {
    /// Colored summary and issue list
    #[default]
    Console,
    /// Markdown report
    Markdown,
    /// Both of the above
    Both,
}

impl Format {
    const fn console(self) -> bool {
        matches!(self, Self::Console | Self::Both)
    }

    const fn markdown(self) -> bool {
        matches!(self, Self::Markdown | Self::Both)
    }
}

impl Cli {
    /// Run the inspection and decide the exit code.
    ///
    /// Problems found in the documents are not errors; they are reported and
    /// reflected in the exit code. Errors are reserved for failures that stop
    /// the inspection from running at all.
    pub fn run(self) -> anyhow::Result<ExitCode> {
        Self::setup_logging(self.verbose);

        info!("loading specifications from {}", self.project.display());
        let files = SpecFiles::load(&self.project)?;
        info!("loaded project {}", files.project_name);

        let config = self.load_config(&files.project_path)?;

        let specs = files.parse();
        let issues = Engine::with_default_rules(&config).run(&specs);
        info!("checks complete: {} issues found", issues.len());

        let report = Report::new(specs.project_name(), &issues);

        if self.format.console() {
            print!("{}", report.console(terminal::supports_color()));
        }

        let markdown = report.markdown(Local::now());
        if let Some(path) = &self.output {
            fs::write(path, &markdown)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!(
                "\n{}",
                format!("Markdown report saved to: {}", path.display()).dim()
            );
        } else if self.format.markdown() {
            let rule = terminal::separator();
            println!("\n{rule}\n{markdown}\n{rule}");
        }

        let verdict = report.verdict();
        match verdict {
            Verdict::Fail => println!(
                "\n{}",
                format!(
                    "{} critical issue(s) found. Fix before implementation.",
                    report.count(Severity::Critical)
                )
                .warning()
            ),
            Verdict::Pass => println!("\n{}", "No critical issues found.".success()),
        }

        if let Some(path) = &self.result {
            let result = InspectionResult::new(
                files.project_path.clone(),
                files.project_name.clone(),
                issues,
                self.output.clone(),
                Utc::now(),
            );
            fs::write(path, result.to_json()?)
                .with_context(|| format!("failed to write result to {}", path.display()))?;
        }

        Ok(verdict.into())
    }

    fn load_config(&self, project: &Path) -> anyhow::Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => Config::load_or_default(project).with_context(|| {
                format!("failed to load {}", project.join(config::FILE_NAME).display())
            })?,
        };
        Ok(config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from(["spec-inspect", dir.path().to_str().unwrap()]).unwrap();

        assert_eq!(cli.format, Format::Console);
        assert!(cli.output.is_none());
        assert!(cli.config.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn all_options() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "spec-inspect",
            "-vv",
            dir.path().to_str().unwrap(),
            "-o",
            "report.md",
            "-f",
            "both",
            "--result",
            "result.json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, Format::Both);
        assert_eq!(cli.output, Some(PathBuf::from("report.md")));
        assert_eq!(cli.result, Some(PathBuf::from("result.json")));
        assert!(cli.format.console() && cli.format.markdown());
    }

    #[test]
    fn missing_project_is_left_to_the_loader() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let cli = Cli::try_parse_from(["spec-inspect", missing.to_str().unwrap()]).unwrap();
        assert_eq!(cli.project, missing);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            Cli::try_parse_from(["spec-inspect", dir.path().to_str().unwrap(), "-f", "html"]);
        assert!(result.is_err());
    }
}
