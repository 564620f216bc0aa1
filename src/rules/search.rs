//! Keyword search over loaded rule bodies.

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::models::{RuleDocument, RuleScope};

/// Maximum excerpt lines reported per matching document.
const MAX_EXCERPTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub scope: Option<RuleScope>,
    pub id: Option<String>,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            scope: None,
            id: None,
        }
    }

    pub fn within(mut self, scope: RuleScope, id: impl Into<String>) -> Self {
        self.scope = Some(scope);
        self.id = Some(id.into());
        self
    }
}

/// A document whose body contains the keyword, with its matching lines.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub rule: &'a RuleDocument,
    /// `(1-based line number, trimmed line)` for every matching line.
    pub lines: Vec<(usize, &'a str)>,
}

/// Find rule documents whose body contains `query.keyword`, ignoring case.
///
/// The keyword is matched as given, surrounding whitespace included; an
/// empty keyword matches every document.
///
/// With `scope` and `id` set, only the document(s) derived from exactly that
/// pair are searched; the dependency closure is not consulted.
pub fn find_matches<'a>(
    rules: &'a [RuleDocument],
    query: &SearchQuery,
) -> Result<Vec<SearchHit<'a>>> {
    let filter = match (query.scope, query.id.as_deref()) {
        (Some(scope), Some(id)) => Some((scope, id)),
        (None, None) => None,
        _ => {
            return Err(Error::InvalidArgument(
                "Both scope and id must be provided together.".to_string(),
            ))
        }
    };

    let needle = query.keyword.to_lowercase();

    let hits = rules
        .iter()
        .filter(|rule| filter.map_or(true, |(scope, id)| rule.matches(scope, id)))
        .filter(|rule| rule.content.to_lowercase().contains(&needle))
        .map(|rule| SearchHit {
            rule,
            lines: rule
                .content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.to_lowercase().contains(&needle))
                .map(|(i, line)| (i + 1, line.trim()))
                .collect(),
        })
        .collect();

    Ok(hits)
}

/// Search and render the hits as markdown text.
pub fn search_rules(rules: &[RuleDocument], query: &SearchQuery) -> Result<String> {
    let hits = find_matches(rules, query)?;
    Ok(render_hits(query, &hits))
}

fn render_hits(query: &SearchQuery, hits: &[SearchHit<'_>]) -> String {
    let keyword = query.keyword.as_str();
    let location = match (query.scope, query.id.as_deref()) {
        (Some(scope), Some(id)) => format!(" in {}/{}", scope, id),
        _ => String::new(),
    };

    if hits.is_empty() {
        return format!("No rules found containing \"{}\"{}.", keyword, location);
    }

    let mut output = format!(
        "Found {} rule(s) containing \"{}\"{}:\n",
        hits.len(),
        keyword,
        location
    );

    for hit in hits {
        let _ = write!(output, "\n### {}", hit.rule.label());
        if hit.rule.scope.is_some() {
            let _ = write!(output, " ({})", hit.rule.relative_path);
        }
        output.push('\n');

        for (line_no, line) in hit.lines.iter().take(MAX_EXCERPTS) {
            let _ = writeln!(output, "- L{}: {}", line_no, line);
        }
        if hit.lines.len() > MAX_EXCERPTS {
            let _ = writeln!(
                output,
                "- ... {} more matching line(s)",
                hit.lines.len() - MAX_EXCERPTS
            );
        }
    }

    output
}
