//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;

use crate::validate::UndeclaredDependencyPolicy;

/// Default port for the streamable HTTP transport.
pub const DEFAULT_PORT: u16 = 3627;

/// Default bind address. Binds all interfaces so the server is reachable
/// from outside a container.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Locations and policies shared by the server and the CLI reports.
#[derive(Clone, Debug)]
pub struct Config {
    /// Root of the rule tree (from RULES_DIR).
    pub rules_dir: PathBuf,
    /// Manifest file (from RULES_MANIFEST, default `<rules_dir>/manifest.yml`).
    pub manifest_path: PathBuf,
    /// markdownlint-style config (from MARKDOWNLINT_CONFIG).
    pub markdownlint_config: PathBuf,
    /// Bind address (from MCP_HOST).
    pub host: String,
    /// Bind port (from MCP_PORT).
    pub port: u16,
    /// How `validate` treats `dependsOn` ids with no `techs` entry
    /// (from RULES_UNDECLARED_DEPS).
    pub undeclared_dependencies: UndeclaredDependencyPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let rules_dir = std::env::var("RULES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("rules"));

        let manifest_path = std::env::var("RULES_MANIFEST")
            .map(PathBuf::from)
            .unwrap_or_else(|_| rules_dir.join("manifest.yml"));

        let markdownlint_config = std::env::var("MARKDOWNLINT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".markdownlint.json"));

        let host = std::env::var("MCP_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = std::env::var("MCP_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let undeclared_dependencies = std::env::var("RULES_UNDECLARED_DEPS")
            .ok()
            .and_then(|s| s.parse::<UndeclaredDependencyPolicy>().ok())
            .unwrap_or_default();

        Self {
            rules_dir,
            manifest_path,
            markdownlint_config,
            host,
            port,
            undeclared_dependencies,
        }
    }

    /// Create a config rooted at `rules_dir` with every other value at its default.
    pub fn with_rules_dir(rules_dir: impl Into<PathBuf>) -> Self {
        let rules_dir = rules_dir.into();
        Self {
            manifest_path: rules_dir.join("manifest.yml"),
            rules_dir,
            markdownlint_config: PathBuf::from(".markdownlint.json"),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            undeclared_dependencies: UndeclaredDependencyPolicy::default(),
        }
    }

    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
