use tracing::debug;

use super::{ERROR, VALID, WARNING};
use crate::error::Result;
use crate::models::RuleScope;
use crate::store::RuleStore;

const KIB: usize = 1024;
const MIB: usize = 1024 * 1024;

/// Merged rule size from which a project is flagged.
pub const WARNING_THRESHOLD: usize = 50 * KIB;
/// Merged rule size from which a project risks crowding the context window.
pub const RISK_THRESHOLD: usize = 100 * KIB;

/// Rough token count, about four bytes per token, rounded up.
pub fn estimate_tokens(bytes: usize) -> usize {
    bytes.div_ceil(4)
}

pub fn format_size(bytes: usize) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.2} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    Ok,
    Warning,
    Risk,
}

impl ModuleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Risk => "RISK",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Ok => VALID,
            Self::Warning => WARNING,
            Self::Risk => ERROR,
        }
    }
}

pub fn module_status(bytes: usize) -> ModuleStatus {
    if bytes < WARNING_THRESHOLD {
        ModuleStatus::Ok
    } else if bytes < RISK_THRESHOLD {
        ModuleStatus::Warning
    } else {
        ModuleStatus::Risk
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSize {
    pub project: String,
    pub bytes: usize,
    /// Number of resolved scopes merged into the document.
    pub scopes: usize,
}

impl ProjectSize {
    pub fn tokens(&self) -> usize {
        estimate_tokens(self.bytes)
    }

    pub fn status(&self) -> ModuleStatus {
        module_status(self.bytes)
    }
}

/// Merged rule size of every manifest project, largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSizeReport {
    pub projects: Vec<ProjectSize>,
}

impl ContextSizeReport {
    pub fn build(store: &RuleStore) -> Result<Self> {
        let snapshot = store.snapshot()?;

        let mut projects: Vec<ProjectSize> = snapshot
            .manifest
            .ids(RuleScope::Project)
            .into_iter()
            .map(|project| {
                let resolved = snapshot.resolve_scope(RuleScope::Project, &project);
                let bytes = snapshot.merge_rules(&resolved).len();
                ProjectSize {
                    project,
                    bytes,
                    scopes: resolved.len(),
                }
            })
            .collect();

        projects.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.project.cmp(&b.project)));
        debug!(projects = projects.len(), "Measured merged rule sizes");

        Ok(Self { projects })
    }

    pub fn at_risk(&self) -> usize {
        self.projects
            .iter()
            .filter(|p| p.status() == ModuleStatus::Risk)
            .count()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Merged rule size per project\n\n");

        if self.projects.is_empty() {
            out.push_str("  No projects declared in the manifest.\n");
            return out;
        }

        for p in &self.projects {
            let status = p.status();
            out.push_str(&format!(
                "  {} {:<7} {}: {} (~{} tokens, {} scope(s))\n",
                status.symbol(),
                status.label(),
                p.project,
                format_size(p.bytes),
                p.tokens(),
                p.scopes
            ));
        }

        out.push_str(&format!(
            "\nThresholds: WARNING from {}, RISK from {}\n",
            format_size(WARNING_THRESHOLD),
            format_size(RISK_THRESHOLD)
        ));
        out
    }
}
