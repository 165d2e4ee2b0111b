use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, instrument};

use crate::domain::{Issue, SpecSet};

/// The error returned by a rule that could not complete.
pub type RuleError = anyhow::Error;

/// A consistency check run over a whole specification set.
///
/// Rules are independent of one another: each sees the same [`SpecSet`] and
/// returns the issues it finds.
pub trait Rule {
    /// A short name used in logs.
    fn name(&self) -> &'static str;

    /// Runs the check.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule itself cannot complete. This is distinct
    /// from finding problems in the documents, which are returned as issues.
    fn check(&self, specs: &SpecSet) -> Result<Vec<Issue>, RuleError>;
}

/// Runs an ordered list of rules and concatenates their issues.
///
/// A rule that returns an error or panics is logged and contributes nothing;
/// the remaining rules still run.
#[derive(Default)]
pub struct Engine {
    rules: Vec<Box<dyn Rule>>,
}

impl Engine {
    /// Creates an engine with the given rules.
    #[must_use]
    pub const fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Appends a rule, to be run after those already present.
    pub fn add_rule(&mut self, rule: impl Rule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// The names of the registered rules, in execution order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> {
        self.rules.iter().map(|rule| rule.name())
    }

    /// Runs every rule in order.
    ///
    /// Issues appear in rule order, then in the order each rule emitted them.
    #[instrument(level = "debug", skip_all, fields(project = specs.project_name()))]
    pub fn run(&self, specs: &SpecSet) -> Vec<Issue> {
        let mut issues = Vec::new();

        for rule in &self.rules {
            let name = rule.name();
            match panic::catch_unwind(AssertUnwindSafe(|| rule.check(specs))) {
                Ok(Ok(found)) => {
                    debug!(rule = name, issues = found.len(), "rule complete");
                    issues.extend(found);
                }
                Ok(Err(e)) => error!(rule = name, "rule failed: {e:#}"),
                Err(payload) => {
                    let message = payload
                        .downcast_ref::<&str>()
                        .map(ToString::to_string)
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    error!(rule = name, "rule panicked: {message}");
                }
            }
        }

        issues
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("rules", &self.rule_names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DocumentKind, Location, Severity},
        storage::markdown::parse,
    };

    fn specs() -> SpecSet {
        SpecSet::new(
            "demo",
            parse("", DocumentKind::Requirement),
            parse("", DocumentKind::Design),
            parse("", DocumentKind::Tasks),
        )
        .unwrap()
    }

    /// Emits `count` info issues labelled with `tag`.
    struct Emit {
        tag: &'static str,
        count: usize,
    }

    impl Rule for Emit {
        fn name(&self) -> &'static str {
            self.tag
        }

        fn check(&self, _specs: &SpecSet) -> anyhow::Result<Vec<Issue>> {
            (1..=self.count)
                .map(|n| {
                    Issue::new(
                        Severity::Info.issue_id(n),
                        Severity::Info,
                        self.tag.to_string(),
                        String::new(),
                        Location::new(DocumentKind::Requirement, 0),
                    )
                    .map_err(anyhow::Error::from)
                })
                .collect()
        }
    }

    struct Failing;

    impl Rule for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn check(&self, _specs: &SpecSet) -> anyhow::Result<Vec<Issue>> {
            anyhow::bail!("always fails")
        }
    }

    struct Panicking;

    impl Rule for Panicking {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn check(&self, _specs: &SpecSet) -> anyhow::Result<Vec<Issue>> {
            panic!("rule bug")
        }
    }

    fn titles(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(Issue::title).collect()
    }

    #[test]
    fn concatenates_in_rule_order() {
        let engine = Engine::new(vec![
            Box::new(Emit { tag: "a", count: 2 }),
            Box::new(Emit { tag: "b", count: 1 }),
        ]);

        let issues = engine.run(&specs());
        assert_eq!(titles(&issues), ["a", "a", "b"]);
        assert_eq!(issues[1].id(), "INFO-002");
    }

    #[test]
    fn failing_rule_is_isolated() {
        let engine = Engine::new(vec![
            Box::new(Failing),
            Box::new(Emit { tag: "b", count: 3 }),
        ]);

        let issues = engine.run(&specs());
        assert_eq!(titles(&issues), ["b", "b", "b"]);
    }

    #[test]
    fn panicking_rule_is_isolated() {
        let engine = Engine::new(vec![
            Box::new(Emit { tag: "a", count: 1 }),
            Box::new(Panicking),
            Box::new(Emit { tag: "c", count: 1 }),
        ]);

        let issues = engine.run(&specs());
        assert_eq!(titles(&issues), ["a", "c"]);
    }

    #[test]
    fn rules_can_be_added_before_running() {
        let mut engine = Engine::default();
        assert!(engine.run(&specs()).is_empty());

        engine.add_rule(Emit { tag: "late", count: 1 });
        assert_eq!(engine.rule_names().collect::<Vec<_>>(), ["late"]);
        assert_eq!(titles(&engine.run(&specs())), ["late"]);
    }

    #[test]
    fn empty_title_surfaces_as_rule_failure() {
        let engine = Engine::new(vec![
            Box::new(Emit { tag: "", count: 1 }),
            Box::new(Emit { tag: "ok", count: 1 }),
        ]);

        assert_eq!(titles(&engine.run(&specs())), ["ok"]);
    }
}
