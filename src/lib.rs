//! Rulecast: manifest-driven distribution of coding-assistant rules.
//!
//! Rule documents live in a directory tree (`<scope>/<id>.md`) and are
//! classified by a YAML manifest along four axes: project, group, tech and
//! language. For a requested scope the engine computes the applicable
//! closure (global group, project references, transitive tech
//! dependencies) and merges the matching rule bodies into one document.
//!
//! The engine is exposed over MCP ([`mcp`], [`api`]) and checked by the
//! validation reports in [`cli`].

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod mcp;
pub mod models;
pub mod rules;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
