//! Non-markdown helper files bundled next to the rules.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::files::{find_files_by_type, relative_slash_path, FileType};
use crate::error::{Error, Result};

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// An asset on disk, keyed by its slash-separated path under the rule root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub path: PathBuf,
    pub mime_type: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedAsset {
    pub content: String,
    pub mime_type: &'static str,
}

/// Every non-markdown file below `root`, by relative name.
pub fn available_assets(root: &Path) -> Result<BTreeMap<String, Asset>> {
    let files = find_files_by_type(root, FileType::NonMarkdown)?;
    Ok(files
        .into_iter()
        .map(|path| {
            let name = relative_slash_path(root, &path);
            let mime_type = mime_type_for(&path);
            (name, Asset { path, mime_type })
        })
        .collect())
}

/// Read the asset called `name`. Content is decoded as UTF-8, replacing
/// invalid sequences.
pub fn load_asset(root: &Path, name: &str) -> Result<LoadedAsset> {
    let assets = available_assets(root)?;
    let asset = assets
        .get(name)
        .ok_or_else(|| Error::UnknownAsset(name.to_string()))?;

    let bytes = std::fs::read(&asset.path).map_err(|e| Error::store_read(&asset.path, e))?;
    Ok(LoadedAsset {
        content: String::from_utf8_lossy(&bytes).into_owned(),
        mime_type: asset.mime_type,
    })
}

/// MIME type by file extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        Some("yml" | "yaml") => "text/yaml",
        Some("toml") => "application/toml",
        Some("xml") => "application/xml",
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("csv") => "text/csv",
        Some("js" | "mjs" | "cjs") => "text/javascript",
        Some("sh") => "application/x-sh",
        Some("sql") => "application/sql",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        _ => DEFAULT_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lists_and_loads_assets() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/ci.yml"), "on: push\n").unwrap();
        fs::write(dir.path().join("rule.md"), "# not an asset").unwrap();

        let assets = available_assets(dir.path()).unwrap();
        assert_eq!(assets.keys().collect::<Vec<_>>(), vec!["templates/ci.yml"]);
        assert_eq!(assets["templates/ci.yml"].mime_type, "text/yaml");

        let loaded = load_asset(dir.path(), "templates/ci.yml").unwrap();
        assert_eq!(loaded.content, "on: push\n");
    }

    #[test]
    fn unknown_asset_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_asset(dir.path(), "missing.txt").unwrap_err();
        assert!(matches!(err, Error::UnknownAsset(ref n) if n == "missing.txt"));
    }

    #[test]
    fn falls_back_to_octet_stream() {
        assert_eq!(mime_type_for(Path::new("blob.bin")), DEFAULT_MIME_TYPE);
        assert_eq!(mime_type_for(Path::new("Makefile")), DEFAULT_MIME_TYPE);
        assert_eq!(mime_type_for(Path::new("DATA.JSON")), "application/json");
    }
}
