//! Raw survey tables laid out as `<raw_dir>/<year>/<table>.csv`.
//!
//! Nothing here keeps selection state; the caller owns the chosen year,
//! table and columns and asks for a fresh result each time.

use std::path::Path;

use super::loader::{LoadOptions, Loaded, TableCache, is_supported};

/// What the user picked in the explorer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExploreQuery {
    pub year: String,
    pub table: String,
    pub columns: Vec<String>,
}

/// Sorted names of the year directories under `raw_dir`.
pub fn list_years(raw_dir: &Path) -> Vec<String> {
    list_dir(raw_dir, |entry| entry.file_type().is_ok_and(|t| t.is_dir()))
}

/// Sorted file names of loadable tables for one year.
pub fn list_tables(raw_dir: &Path, year: &str) -> Vec<String> {
    list_dir(&raw_dir.join(year), |entry| {
        entry.file_type().is_ok_and(|t| t.is_file())
            && entry.file_name().to_str().is_some_and(is_supported)
    })
}

fn list_dir(dir: &Path, keep: impl Fn(&std::fs::DirEntry) -> bool) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if dir.exists() {
                log::warn!("Cannot list {}: {e}", dir.display());
            }
            return Vec::new();
        }
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| keep(e))
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    names.sort();
    names
}

/// Column names of a table, read from its header only.
pub fn table_columns(cache: &mut TableCache, raw_dir: &Path, year: &str, table: &str) -> Vec<String> {
    let path = raw_dir.join(year).join(table);
    cache
        .load(&path, LoadOptions::header_only())
        .table()
        .map(|t| t.columns().to_vec())
        .unwrap_or_default()
}

/// The selected columns of the selected table, first `max_rows` rows.
///
/// An empty column selection has nothing to show.
pub fn explore(
    cache: &mut TableCache,
    raw_dir: &Path,
    query: &ExploreQuery,
    max_rows: usize,
) -> Loaded {
    if query.columns.is_empty() || query.year.is_empty() || query.table.is_empty() {
        return Loaded::Absent;
    }
    let path = raw_dir.join(&query.year).join(&query.table);
    cache.load(
        &path,
        LoadOptions::all()
            .rows(max_rows)
            .columns(query.columns.clone()),
    )
}
