//! Database location resolution.

use std::path::PathBuf;

const DB_ENV_VAR: &str = "STOCKBOOK_DB";
const DB_FILE_NAME: &str = "stockbook.db";

/// Resolve the database file path.
///
/// Precedence: an explicit path, then the `STOCKBOOK_DB` environment
/// variable, then `<data dir>/stockbook/stockbook.db`, then the file name
/// in the working directory.
pub fn database_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    if let Ok(path) = std::env::var(DB_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    match dirs::data_dir() {
        Some(dir) => dir.join("stockbook").join(DB_FILE_NAME),
        None => PathBuf::from(DB_FILE_NAME),
    }
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &std::path::Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
