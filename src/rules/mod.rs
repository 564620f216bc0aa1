//! Scope resolution, merging and search over a loaded rule snapshot.

mod merge;
mod resolve;
mod search;

pub use merge::merge_rules;
pub use resolve::resolve_scope;
pub use search::{find_matches, search_rules, SearchHit, SearchQuery};
