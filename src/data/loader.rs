use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Table, Value};

/// File extensions the loader understands.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["csv", "json", "parquet", "pq"];

// ---------------------------------------------------------------------------
// Load options and results
// ---------------------------------------------------------------------------

/// Row and column limits for a single load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LoadOptions {
    /// Materialize only the first N data rows.
    pub max_rows: Option<usize>,
    /// Materialize only these columns; a name missing from the file fails the load.
    pub columns: Option<Vec<String>>,
}

impl LoadOptions {
    pub fn all() -> Self {
        Self::default()
    }

    /// Read the header only.
    pub fn header_only() -> Self {
        Self::default().rows(0)
    }

    pub fn rows(mut self, n: usize) -> Self {
        self.max_rows = Some(n);
        self
    }

    pub fn columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }
}

/// Outcome of a load: a table, or nothing to show.
///
/// Missing and malformed files both collapse to `Absent`.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Table(Arc<Table>),
    Absent,
}

impl Loaded {
    pub fn table(&self) -> Option<&Table> {
        match self {
            Loaded::Table(t) => Some(t),
            Loaded::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Loaded::Absent)
    }

    /// Derive a new table from a loaded one; `Absent` stays `Absent`.
    pub fn map(&self, f: impl FnOnce(&Table) -> Table) -> Loaded {
        match self {
            Loaded::Table(t) => Loaded::Table(Arc::new(f(t))),
            Loaded::Absent => Loaded::Absent,
        }
    }
}

// ---------------------------------------------------------------------------
// Memoization cache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LoadKey {
    path: PathBuf,
    options: LoadOptions,
}

/// Process-lifetime memo of load results keyed by (path, max_rows, columns).
///
/// Entries are never evicted or invalidated, `Absent` included.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<LoadKey, Loaded>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` with `options`, reading the backing store at most once per key.
    pub fn load(&mut self, path: &Path, options: LoadOptions) -> Loaded {
        let key = LoadKey {
            path: path.to_path_buf(),
            options,
        };
        if let Some(hit) = self.entries.get(&key) {
            return hit.clone();
        }
        let loaded = fetch(&key.path, &key.options);
        self.entries.entry(key).or_insert(loaded).clone()
    }

    /// Number of memoized entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn fetch(path: &Path, options: &LoadOptions) -> Loaded {
    if !path.exists() {
        log::debug!("{}: not found", path.display());
        return Loaded::Absent;
    }
    match load_file(path, options) {
        Ok(table) => {
            log::info!(
                "Loaded {} rows x {} columns from {}",
                table.len(),
                table.columns().len(),
                path.display()
            );
            Loaded::Table(Arc::new(table))
        }
        Err(e) => {
            log::debug!("{}: {e:#}", path.display());
            Loaded::Absent
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by scalar fields, types inferred per cell
/// * `.json`    – `[{ "col": value, ... }, ...]`
/// * `.parquet` – flat schema of scalar columns
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file, options)
        }
        "json" => load_json(path, options),
        "parquet" | "pq" => load_parquet(path, options),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Whether the loader can read files with this name.
pub fn is_supported(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Rename repeated header names to `name.1`, `name.2`, ...; the first keeps its name.
fn dedupe_headers(headers: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    headers
        .into_iter()
        .map(|header| {
            let mut name = header.clone();
            let mut n = 1;
            while seen.contains(&name) {
                name = format!("{header}.{n}");
                n += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

/// Indices of the header entries to keep, in header order.
fn column_selection(headers: &[String], wanted: Option<&[String]>) -> Result<Vec<usize>> {
    let Some(wanted) = wanted else {
        return Ok((0..headers.len()).collect());
    };
    let missing: Vec<&String> = wanted.iter().filter(|w| !headers.contains(w)).collect();
    if !missing.is_empty() {
        bail!("columns not found: {missing:?}");
    }
    Ok((0..headers.len())
        .filter(|&i| wanted.contains(&headers[i]))
        .collect())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV text from any reader.  The first record is the header.
pub fn read_csv<R: Read>(source: R, options: &LoadOptions) -> Result<Table> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = dedupe_headers(
        reader
            .headers()
            .context("reading CSV headers")?
            .iter()
            .map(|h| h.to_string()),
    );
    if headers.is_empty() {
        bail!("CSV has no header row");
    }

    let keep = column_selection(&headers, options.columns.as_deref())?;
    let mut table = Table::new(keep.iter().map(|&i| headers[i].clone()).collect())?;

    let limit = options.max_rows.unwrap_or(usize::MAX);
    for (row_no, result) in reader.records().take(limit).enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row = keep
            .iter()
            .map(|&i| Value::infer(record.get(i).unwrap_or("")))
            .collect();
        table.push_row(row)?;
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON layout, one object per row:
///
/// ```json
/// [
///   { "folioviv": 100013601, "entidad": 1, "ing_cor": 76403.7 },
///   ...
/// ]
/// ```
///
/// Columns are the union of all record keys; absent keys become nulls.
fn load_json(path: &Path, options: &LoadOptions) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let keep = column_selection(&headers, options.columns.as_deref())?;
    let mut table = Table::new(keep.iter().map(|&i| headers[i].clone()).collect())?;

    let limit = options.max_rows.unwrap_or(usize::MAX);
    for rec in records.iter().take(limit) {
        let row = keep
            .iter()
            .map(|&i| rec.get(&headers[i]).map(json_to_value).unwrap_or(Value::Null))
            .collect();
        table.push_row(row)?;
    }

    Ok(table)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with a flat schema.
///
/// Columns of nested or temporal type are rendered as text.
fn load_parquet(path: &Path, options: &LoadOptions) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let headers = dedupe_headers(builder.schema().fields().iter().map(|f| f.name().clone()));
    let keep = column_selection(&headers, options.columns.as_deref())?;
    let mut table = Table::new(keep.iter().map(|&i| headers[i].clone()).collect())?;

    let limit = options.max_rows.unwrap_or(usize::MAX);
    if limit == 0 {
        return Ok(table);
    }

    let reader = builder.build().context("building parquet reader")?;
    'batches: for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            if table.len() >= limit {
                break 'batches;
            }
            let values = keep
                .iter()
                .map(|&i| extract_value(batch.column(i), row))
                .collect();
            table.push_row(values)?;
        }
    }

    Ok(table)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &ArrayRef, row: usize) -> Value {
    if col.is_null(row) {
        return Value::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => Value::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => Value::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => Value::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Value::Integer(col.as_primitive::<UInt8Type>().value(row) as i64),
        DataType::UInt16 => Value::Integer(col.as_primitive::<UInt16Type>().value(row) as i64),
        DataType::UInt32 => Value::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(Value::Integer)
                .unwrap_or(Value::Float(v as f64))
        }
        DataType::Float32 => Value::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Value::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        _ => array_value_to_string(col, row)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    const HOGARES: &str = "folioviv,entidad,sexo_jefe,ing_cor
100013601,1,1,76403.7
100013602,1,2,42597.0
100013603,9,1,
100013604,9,2,12000.5
100013605,14,1,98000.0
100013606,14,2,5000.25
100013607,32,1,33000.0
";

    #[test]
    fn test_missing_path_is_absent() {
        let mut cache = TableCache::new();
        let loaded = cache.load(Path::new("/definitely/not/here.csv"), LoadOptions::all());
        assert!(loaded.is_absent());
    }

    #[test]
    fn test_load_csv_infers_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "hogares.csv", HOGARES);
        let table = load_file(&path, &LoadOptions::all()).unwrap();
        assert_eq!(table.len(), 7);
        assert_eq!(table.columns()[1], "entidad");
        assert_eq!(table.value(0, "ing_cor"), Some(&Value::Float(76403.7)));
        assert_eq!(table.value(2, "ing_cor"), Some(&Value::Null));
        assert_eq!(table.value(0, "sexo_jefe"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_max_rows_is_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "hogares.csv", HOGARES);
        let mut cache = TableCache::new();
        let full = cache.load(&path, LoadOptions::all());
        let five = cache.load(&path, LoadOptions::all().rows(5));
        let full = full.table().unwrap();
        let five = five.table().unwrap();
        assert_eq!(five.len(), 5);
        assert_eq!(five, &full.head(5));

        let many = cache.load(&path, LoadOptions::all().rows(500));
        assert_eq!(many.table().unwrap().len(), 7);
    }

    #[test]
    fn test_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "hogares.csv", HOGARES);
        let table = load_file(&path, &LoadOptions::header_only()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 4);
    }

    #[test]
    fn test_column_subset_and_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "hogares.csv", HOGARES);
        let mut cache = TableCache::new();

        let subset = cache.load(
            &path,
            LoadOptions::all().columns(vec!["ing_cor".into(), "entidad".into()]),
        );
        let subset = subset.table().unwrap();
        assert_eq!(subset.columns(), ["entidad", "ing_cor"]);
        assert_eq!(subset.len(), 7);

        let missing = cache.load(&path, LoadOptions::all().columns(vec!["nope".into()]));
        assert!(missing.is_absent());
    }

    #[test]
    fn test_malformed_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let ragged = write_file(dir.path(), "ragged.csv", "a,b\n1,2\n3\n");
        let empty = write_file(dir.path(), "empty.csv", "");
        let unknown = write_file(dir.path(), "notes.txt", "a,b\n1,2\n");
        let mut bytes = b"a,b\n1,".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        let binary = dir.path().join("binary.csv");
        std::fs::write(&binary, bytes).unwrap();

        let mut cache = TableCache::new();
        for path in [ragged, empty, unknown, binary] {
            assert!(cache.load(&path, LoadOptions::all()).is_absent(), "{path:?}");
        }
    }

    #[test]
    fn test_cache_does_not_reread() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "hogares.csv", HOGARES);
        let mut cache = TableCache::new();

        let first = cache.load(&path, LoadOptions::all());
        std::fs::remove_file(&path).unwrap();
        let second = cache.load(&path, LoadOptions::all());
        assert_eq!(first, second);
        assert!(second.table().is_some());
        assert_eq!(cache.len(), 1);

        // A different key does hit the (now empty) backing store.
        assert!(cache.load(&path, LoadOptions::all().rows(1)).is_absent());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_absent_is_memoized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");
        let mut cache = TableCache::new();
        assert!(cache.load(&path, LoadOptions::all()).is_absent());
        write_file(dir.path(), "late.csv", "a\n1\n");
        assert!(cache.load(&path, LoadOptions::all()).is_absent());
    }

    #[test]
    fn test_load_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "nodos.json",
            r#"[{"variable": "luz", "grado": 3}, {"variable": "gas", "peso": 0.5}]"#,
        );
        let table = load_file(&path, &LoadOptions::all()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), ["variable", "grado", "peso"]);
        assert_eq!(table.value(1, "grado"), Some(&Value::Null));
        assert_eq!(table.value(1, "peso"), Some(&Value::Float(0.5)));
    }

    #[test]
    fn test_repeated_headers_are_renamed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "dup.csv", "a,b,a,a\n1,2,3,4\n");
        let mut cache = TableCache::new();
        let loaded = cache.load(&path, LoadOptions::all());
        let table = loaded.table().unwrap();
        assert_eq!(table.columns(), ["a", "b", "a.1", "a.2"]);
        assert_eq!(table.value(0, "a"), Some(&Value::Integer(1)));
        assert_eq!(table.value(0, "a.1"), Some(&Value::Integer(3)));

        let subset = cache.load(&path, LoadOptions::all().columns(vec!["a.2".into()]));
        assert_eq!(subset.table().unwrap().value(0, "a.2"), Some(&Value::Integer(4)));
    }

    fn write_parquet(path: &Path) {
        let schema = Arc::new(Schema::new(vec![
            Field::new("folioviv", DataType::Int64, false),
            Field::new("combustible", DataType::Utf8, true),
            Field::new("consumo_kwh", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])),
                Arc::new(StringArray::from(vec![Some("gas_lp"), None, Some("lena")])),
                Arc::new(Float64Array::from(vec![120.5, 80.0, 33.25])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_load_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viviendas.parquet");
        write_parquet(&path);
        let mut cache = TableCache::new();

        let full = cache.load(&path, LoadOptions::all());
        let full = full.table().unwrap();
        assert_eq!(full.columns(), ["folioviv", "combustible", "consumo_kwh"]);
        assert_eq!(full.len(), 3);
        assert_eq!(full.value(0, "folioviv"), Some(&Value::Integer(1)));
        assert_eq!(full.value(2, "consumo_kwh"), Some(&Value::Float(33.25)));

        let subset = cache.load(
            &path,
            LoadOptions::all()
                .rows(2)
                .columns(vec!["consumo_kwh".into(), "combustible".into()]),
        );
        let subset = subset.table().unwrap();
        assert_eq!(subset.columns(), ["combustible", "consumo_kwh"]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.value(0, "combustible"), Some(&Value::from("gas_lp")));
        assert_eq!(subset.value(1, "combustible"), Some(&Value::Null));

        let header = cache.load(&path, LoadOptions::header_only());
        let header = header.table().unwrap();
        assert!(header.is_empty());
        assert_eq!(header.columns().len(), 3);

        let missing = cache.load(&path, LoadOptions::all().columns(vec!["nope".into()]));
        assert!(missing.is_absent());
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported("concentradohogar.csv"));
        assert!(is_supported("viviendas.PARQUET"));
        assert!(!is_supported("README.md"));
        assert!(!is_supported("csv"));
    }
}
