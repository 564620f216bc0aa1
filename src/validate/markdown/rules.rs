//! Built-in markdownlint-compatible rules.
//!
//! Only ATX headings and fenced code blocks are recognised. Heading and
//! blank-line rules ignore lines inside fenced code.

use serde_json::{Map, Value};

/// A rule violation before it is tied to a rule name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Finding {
    /// 1-based line number.
    pub line: usize,
    pub detail: Option<String>,
    pub context: Option<String>,
}

impl Finding {
    fn new(index: usize) -> Self {
        Self {
            line: index + 1,
            detail: None,
            context: None,
        }
    }

    fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn context(mut self, context: &str) -> Self {
        self.context = Some(context.trim().to_string());
        self
    }
}

pub(super) type Options<'a> = Option<&'a Map<String, Value>>;

pub(super) struct LintRule {
    pub names: &'static [&'static str],
    pub description: &'static str,
    pub check: fn(&Document<'_>, Options<'_>) -> Vec<Finding>,
}

pub(super) const RULES: &[LintRule] = &[
    LintRule {
        names: &["MD001", "heading-increment"],
        description: "Heading levels should only increment by one level at a time",
        check: heading_increment,
    },
    LintRule {
        names: &["MD009", "no-trailing-spaces"],
        description: "Trailing spaces",
        check: no_trailing_spaces,
    },
    LintRule {
        names: &["MD010", "no-hard-tabs"],
        description: "Hard tabs",
        check: no_hard_tabs,
    },
    LintRule {
        names: &["MD012", "no-multiple-blanks"],
        description: "Multiple consecutive blank lines",
        check: no_multiple_blanks,
    },
    LintRule {
        names: &["MD013", "line-length"],
        description: "Line length",
        check: line_length,
    },
    LintRule {
        names: &["MD018", "no-missing-space-atx"],
        description: "No space after hash on atx style heading",
        check: no_missing_space_atx,
    },
    LintRule {
        names: &["MD022", "blanks-around-headings"],
        description: "Headings should be surrounded by blank lines",
        check: blanks_around_headings,
    },
    LintRule {
        names: &["MD025", "single-title", "single-h1"],
        description: "Multiple top-level headings in the same document",
        check: single_title,
    },
    LintRule {
        names: &["MD031", "blanks-around-fences"],
        description: "Fenced code blocks should be surrounded by blank lines",
        check: blanks_around_fences,
    },
    LintRule {
        names: &["MD040", "fenced-code-language"],
        description: "Fenced code blocks should have a language specified",
        check: fenced_code_language,
    },
    LintRule {
        names: &["MD041", "first-line-heading", "first-line-h1"],
        description: "First line in a file should be a top level heading",
        check: first_line_heading,
    },
    LintRule {
        names: &["MD047", "single-trailing-newline"],
        description: "Files should end with a single newline character",
        check: single_trailing_newline,
    },
];

struct Fence {
    open: usize,
    close: Option<usize>,
    has_info: bool,
}

struct Heading {
    line: usize,
    level: usize,
}

/// Line-oriented view of a markdown document.
pub(super) struct Document<'a> {
    raw: &'a str,
    lines: Vec<&'a str>,
    in_code: Vec<bool>,
    fences: Vec<Fence>,
    headings: Vec<Heading>,
}

impl<'a> Document<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let body = raw.strip_suffix('\n').unwrap_or(raw);
        let lines: Vec<&str> = if raw.is_empty() {
            Vec::new()
        } else {
            body.split('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l))
                .collect()
        };

        let mut in_code = vec![false; lines.len()];
        let mut fences: Vec<Fence> = Vec::new();
        let mut headings = Vec::new();
        let mut open: Option<(usize, char, usize)> = None;

        for (i, line) in lines.iter().enumerate() {
            match open {
                Some((start, ch, count)) => {
                    in_code[i] = true;
                    if let Some((close_ch, close_count, info)) = fence_marker(line) {
                        if close_ch == ch && close_count >= count && info.is_empty() {
                            open = None;
                            if let Some(fence) = fences.last_mut().filter(|f| f.open == start) {
                                fence.close = Some(i);
                            }
                        }
                    }
                }
                None => {
                    if let Some((ch, count, info)) = fence_marker(line) {
                        in_code[i] = true;
                        open = Some((i, ch, count));
                        fences.push(Fence {
                            open: i,
                            close: None,
                            has_info: !info.is_empty(),
                        });
                    } else if let Some(level) = atx_level(line) {
                        headings.push(Heading { line: i, level });
                    }
                }
            }
        }

        Self {
            raw,
            lines,
            in_code,
            fences,
            headings,
        }
    }

    fn is_blank(&self, index: usize) -> bool {
        self.lines
            .get(index)
            .map_or(true, |line| line.trim().is_empty())
    }
}

fn indent_of(line: &str) -> Option<&str> {
    let trimmed = line.trim_start_matches(' ');
    (line.len() - trimmed.len() <= 3).then_some(trimmed)
}

/// `(marker char, marker length, info string)` for a fence line.
fn fence_marker(line: &str) -> Option<(char, usize, &str)> {
    let rest = indent_of(line)?;
    let ch = rest.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let count = rest.chars().take_while(|c| *c == ch).count();
    if count < 3 {
        return None;
    }
    let info = rest[count..].trim();
    if ch == '`' && info.contains('`') {
        return None;
    }
    Some((ch, count, info))
}

fn atx_level(line: &str) -> Option<usize> {
    let rest = indent_of(line)?;
    let level = rest.chars().take_while(|c| *c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    match rest[level..].chars().next() {
        None => Some(level),
        Some(c) if c.is_whitespace() => Some(level),
        _ => None,
    }
}

fn option_usize(options: Options<'_>, key: &str, default: usize) -> usize {
    options
        .and_then(|o| o.get(key))
        .and_then(Value::as_u64)
        .map_or(default, |n| n as usize)
}

fn option_bool(options: Options<'_>, key: &str, default: bool) -> bool {
    options
        .and_then(|o| o.get(key))
        .and_then(Value::as_bool)
        .unwrap_or(default)
}

fn heading_increment(doc: &Document<'_>, _: Options<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut previous: Option<usize> = None;
    for heading in &doc.headings {
        if let Some(prev) = previous {
            if heading.level > prev + 1 {
                findings.push(
                    Finding::new(heading.line)
                        .detail(format!("Expected: h{}; Actual: h{}", prev + 1, heading.level))
                        .context(doc.lines[heading.line]),
                );
            }
        }
        previous = Some(heading.level);
    }
    findings
}

fn no_trailing_spaces(doc: &Document<'_>, options: Options<'_>) -> Vec<Finding> {
    let br_spaces = option_usize(options, "br_spaces", 2);
    let expected = if br_spaces >= 2 {
        format!("Expected: 0 or {}", br_spaces)
    } else {
        "Expected: 0".to_string()
    };

    doc.lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !doc.in_code[*i])
        .filter_map(|(i, line)| {
            let trailing = line.len() - line.trim_end_matches(' ').len();
            let allowed = br_spaces >= 2 && trailing == br_spaces && !line.trim().is_empty();
            (trailing > 0 && !allowed)
                .then(|| Finding::new(i).detail(format!("{}; Actual: {}", expected, trailing)))
        })
        .collect()
}

fn no_hard_tabs(doc: &Document<'_>, options: Options<'_>) -> Vec<Finding> {
    let code_blocks = option_bool(options, "code_blocks", true);
    doc.lines
        .iter()
        .enumerate()
        .filter(|(i, _)| code_blocks || !doc.in_code[*i])
        .filter_map(|(i, line)| {
            let column = line.chars().position(|c| c == '\t')?;
            Some(Finding::new(i).detail(format!("Column: {}", column + 1)))
        })
        .collect()
}

fn no_multiple_blanks(doc: &Document<'_>, options: Options<'_>) -> Vec<Finding> {
    let maximum = option_usize(options, "maximum", 1);
    let mut findings = Vec::new();
    let mut run = 0;
    for (i, line) in doc.lines.iter().enumerate() {
        if doc.in_code[i] || !line.trim().is_empty() {
            run = 0;
            continue;
        }
        run += 1;
        if run > maximum {
            findings.push(Finding::new(i).detail(format!("Expected: {}; Actual: {}", maximum, run)));
        }
    }
    findings
}

fn line_length(doc: &Document<'_>, options: Options<'_>) -> Vec<Finding> {
    let limit = option_usize(options, "line_length", 80);
    let code_blocks = option_bool(options, "code_blocks", true);
    let headings = option_bool(options, "headings", true);

    doc.lines
        .iter()
        .enumerate()
        .filter(|(i, _)| code_blocks || !doc.in_code[*i])
        .filter(|(i, _)| headings || !doc.headings.iter().any(|h| h.line == *i))
        .filter_map(|(i, line)| {
            let length = line.chars().count();
            if length <= limit {
                return None;
            }
            // A single long token past the limit (usually a URL) is tolerated.
            let overflow: String = line.chars().skip(limit).collect();
            if !overflow.contains(char::is_whitespace) {
                return None;
            }
            Some(Finding::new(i).detail(format!("Expected: {}; Actual: {}", limit, length)))
        })
        .collect()
}

fn no_missing_space_atx(doc: &Document<'_>, _: Options<'_>) -> Vec<Finding> {
    doc.lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !doc.in_code[*i])
        .filter_map(|(i, line)| {
            let rest = indent_of(line)?;
            let hashes = rest.chars().take_while(|c| *c == '#').count();
            if !(1..=6).contains(&hashes) {
                return None;
            }
            let next = rest[hashes..].chars().next()?;
            (!next.is_whitespace() && next != '!').then(|| Finding::new(i).context(line))
        })
        .collect()
}

fn blanks_around_headings(doc: &Document<'_>, _: Options<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    for heading in &doc.headings {
        let line = heading.line;
        if line > 0 && !doc.is_blank(line - 1) {
            findings.push(
                Finding::new(line)
                    .detail("Expected: 1; Actual: 0; Above")
                    .context(doc.lines[line]),
            );
        }
        if line + 1 < doc.lines.len() && !doc.is_blank(line + 1) {
            findings.push(
                Finding::new(line)
                    .detail("Expected: 1; Actual: 0; Below")
                    .context(doc.lines[line]),
            );
        }
    }
    findings
}

fn single_title(doc: &Document<'_>, options: Options<'_>) -> Vec<Finding> {
    let level = option_usize(options, "level", 1);
    doc.headings
        .iter()
        .filter(|h| h.level == level)
        .skip(1)
        .map(|h| Finding::new(h.line).context(doc.lines[h.line]))
        .collect()
}

fn blanks_around_fences(doc: &Document<'_>, _: Options<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    for fence in &doc.fences {
        if fence.open > 0 && !doc.is_blank(fence.open - 1) {
            findings.push(Finding::new(fence.open).context(doc.lines[fence.open]));
        }
        if let Some(close) = fence.close {
            if close + 1 < doc.lines.len() && !doc.is_blank(close + 1) {
                findings.push(Finding::new(close).context(doc.lines[close]));
            }
        }
    }
    findings
}

fn fenced_code_language(doc: &Document<'_>, _: Options<'_>) -> Vec<Finding> {
    doc.fences
        .iter()
        .filter(|f| !f.has_info)
        .map(|f| Finding::new(f.open).context(doc.lines[f.open]))
        .collect()
}

fn first_line_heading(doc: &Document<'_>, options: Options<'_>) -> Vec<Finding> {
    let level = option_usize(options, "level", 1);
    let Some(first) = (0..doc.lines.len()).find(|i| !doc.is_blank(*i)) else {
        return Vec::new();
    };
    let is_top_heading = doc
        .headings
        .iter()
        .any(|h| h.line == first && h.level == level);
    if is_top_heading {
        Vec::new()
    } else {
        vec![Finding::new(first).context(doc.lines[first])]
    }
}

fn single_trailing_newline(doc: &Document<'_>, _: Options<'_>) -> Vec<Finding> {
    if doc.raw.is_empty() || doc.raw.ends_with('\n') {
        return Vec::new();
    }
    vec![Finding::new(doc.lines.len().saturating_sub(1))]
}
