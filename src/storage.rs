mod loader;
/// Markdown structure parsing for specification documents.
pub mod markdown;

pub use loader::{LoadError, SpecFiles};
