//! Consistency checks over a parsed specification set.
//!
//! The [`Engine`] runs an ordered list of [`Rule`]s. The built-in rules are
//! [`CrossReference`] and [`MandatorySections`].

mod cross_reference;
mod engine;
mod mandatory_sections;

pub use cross_reference::CrossReference;
pub use engine::{Engine, Rule, RuleError};
pub use mandatory_sections::MandatorySections;

use crate::domain::Config;

impl Engine {
    /// Creates an engine with the built-in rules: identifier cross-references
    /// first, then mandatory sections.
    #[must_use]
    pub fn with_default_rules(config: &Config) -> Self {
        let mut engine = Self::default();
        engine.add_rule(CrossReference);
        engine.add_rule(MandatorySections::new(config));
        engine
    }
}
