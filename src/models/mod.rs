//! Domain models for the rule engine.
//!
//! # Core Concepts
//!
//! - [`RuleScope`]: the four classification axes (project, group, tech, language).
//! - [`Manifest`]: the classification graph; projects reference groups, techs
//!   and languages, techs depend on other techs.
//! - [`RuleDocument`]: one markdown rule file with its untyped [`Frontmatter`].
//! - [`ResolvedScopeSet`]: the ordered closure of [`ScopeRef`]s that applies
//!   to one request. Ephemeral.
//! - [`ValidationResult`]: findings of a validation check, reported as data.

mod manifest;
mod rule;
mod scope;
mod validation;

pub use manifest::*;
pub use rule::*;
pub use scope::*;
pub use validation::*;
