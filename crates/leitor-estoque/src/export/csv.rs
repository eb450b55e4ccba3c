//! Tabular (CSV) export

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::domain::{DomainError, DomainResult, Folder};

/// Two-column table, one row per item, stable storage order.
pub fn render_csv(folder: &Folder) -> String {
    let mut csv = String::from("codigo,quantidade\n");
    for item in &folder.items {
        csv.push_str(&format!("{},{}\n", item.code, item.quantity));
    }
    csv
}

/// Filesystem-safe slug of a folder name: runs of anything outside
/// alphanumerics, underscore and hyphen collapse to `_`, case-folded.
/// Empty results fall back to `pasta`.
pub fn sanitize_folder_name(name: &str) -> String {
    static SLUG_RE: OnceLock<Regex> = OnceLock::new();
    let re = SLUG_RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("valid pattern"));
    let slug = re.replace_all(name, "_").to_lowercase();
    if slug.is_empty() {
        "pasta".to_string()
    } else {
        slug
    }
}

/// Write `inventario_{slug}.csv` into `dir`. `Ok(None)` when the folder
/// has no items (the caller shows a notice instead of creating a file).
pub fn write_csv(folder: &Folder, dir: &Path) -> DomainResult<Option<PathBuf>> {
    if folder.items.is_empty() {
        return Ok(None);
    }

    let path = dir.join(format!("inventario_{}.csv", sanitize_folder_name(&folder.name)));
    std::fs::write(&path, render_csv(folder))
        .map_err(|e| DomainError::Internal(format!("Failed writing {}: {}", path.display(), e)))?;
    Ok(Some(path))
}
