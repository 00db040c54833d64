// Cache path utilities.
// Constructs filesystem paths for cached census tables, keyed by dataset vintage.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::census::TableRequest;

/// Get the base cache directory (~/.cache/censusview on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "censusview").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the TUI log file.
pub fn log_path(root: &Path) -> PathBuf {
    root.join("censusview.log")
}

/// Directory holding every cached table.
pub fn tables_dir(root: &Path) -> PathBuf {
    root.join("tables")
}

/// Directory holding all tables for one dataset vintage.
pub fn vintage_dir(root: &Path, dataset: &str, year: u16) -> PathBuf {
    tables_dir(root)
        .join(sanitize_name(dataset))
        .join(year.to_string())
}

/// Path to a cached table.
pub fn table_path(root: &Path, dataset: &str, year: u16, request: &TableRequest) -> PathBuf {
    vintage_dir(root, dataset, year).join(format!("{}.json", sanitize_name(&request.cache_key())))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => '_',
            _ => c,
        })
        .collect()
}
