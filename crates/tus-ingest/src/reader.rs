//! Polars-based table reading for survey input files.
//!
//! CSV columns are read as strings unless schema inference is requested:
//! survey codes such as `"07"` keep their zero padding and every part of a
//! module arrives with the same column types.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::{
    CsvReadOptions, DataFrame, NullValues, ParquetReader, PlSmallStr, SerReader,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};
use tus_transform::{ModuleInput, SourcePart};

use crate::discovery::{Discovery, InputFormat};
use crate::error::{IngestError, Result};

/// Cell values read as null.
pub const DEFAULT_NULL_TOKENS: &[&str] = &["", "NA", "null", "NULL", "None", "*", "NR"];

/// Rows sampled for schema inference when it is enabled.
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 1000;

/// Options for reading input tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Infer column types instead of reading every CSV column as a string.
    pub infer_types: bool,

    /// Rows sampled for inference. `None` scans the whole file.
    pub infer_schema_length: Option<usize>,

    /// Cell values treated as null.
    pub null_values: Vec<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            infer_types: false,
            infer_schema_length: Some(DEFAULT_INFER_SCHEMA_LENGTH),
            null_values: DEFAULT_NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl ReadOptions {
    /// Enable or disable schema inference.
    pub fn with_infer_types(mut self, infer: bool) -> Self {
        self.infer_types = infer;
        self
    }

    /// Set the number of rows sampled for inference.
    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Replace the null tokens.
    pub fn with_null_values(mut self, tokens: Vec<String>) -> Self {
        self.null_values = tokens;
        self
    }
}

/// Read one input file into a DataFrame.
pub fn read_table(path: &Path, options: &ReadOptions) -> Result<DataFrame> {
    let format = InputFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let df = match format {
        InputFormat::Csv => read_csv(path, options)?,
        InputFormat::Parquet => read_parquet(path)?,
    };
    strip_header_bom(df).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_csv(path: &Path, options: &ReadOptions) -> Result<DataFrame> {
    let infer_schema_length = if options.infer_types {
        options.infer_schema_length
    } else {
        Some(0)
    };
    let null_values: Vec<PlSmallStr> = options
        .null_values
        .iter()
        .map(|token| token.as_str().into())
        .collect();
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .map_parse_options(|parse| {
            parse.with_null_values(Some(NullValues::AllColumns(null_values.clone())))
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| IngestError::Read {
            path: path.to_path_buf(),
            source,
        })
}

fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    ParquetReader::new(file)
        .finish()
        .map_err(|source| IngestError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Remove a UTF-8 byte order mark carried into the first header.
fn strip_header_bom(mut df: DataFrame) -> polars::prelude::PolarsResult<DataFrame> {
    let first = df
        .get_column_names()
        .first()
        .map(|name| name.to_string())
        .filter(|name| name.starts_with('\u{feff}'));
    if let Some(name) = first {
        let clean = name.trim_start_matches('\u{feff}').to_string();
        df.rename(&name, clean.into())?;
    }
    Ok(df)
}

/// A file that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Tables read for each discovered module.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Module inputs in module order; modules with no readable part are absent.
    pub inputs: Vec<ModuleInput>,
    pub failures: Vec<ReadFailure>,
}

/// Read every discovered part file.
///
/// A file that fails to read is recorded and skipped; the rest of its
/// module is still returned.
pub fn read_module_inputs(discovery: &Discovery, options: &ReadOptions) -> IngestReport {
    let mut report = IngestReport::default();
    for (kind, paths) in &discovery.modules {
        let span = info_span!("ingest", module = %kind);
        let _guard = span.enter();
        let start = Instant::now();

        let mut parts = Vec::with_capacity(paths.len());
        for path in paths {
            match read_table(path, options) {
                Ok(df) => {
                    debug!(
                        file = %path.display(),
                        rows = df.height(),
                        columns = df.width(),
                        "read part"
                    );
                    let name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    parts.push(SourcePart::new(name, df));
                }
                Err(error) => {
                    warn!(file = %path.display(), %error, "skipping unreadable part");
                    report.failures.push(ReadFailure {
                        path: path.clone(),
                        message: error.to_string(),
                    });
                }
            }
        }

        if parts.is_empty() {
            continue;
        }
        info!(
            parts = parts.len(),
            rows = parts.iter().map(|part| part.data.height()).sum::<usize>(),
            duration_ms = start.elapsed().as_millis(),
            "module read"
        );
        report.inputs.push(ModuleInput::new(*kind, parts));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;
    use tus_model::ModuleKind;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
        df.column(column)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    #[test]
    fn csv_columns_are_strings_with_padding_kept() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.csv", "District,Age\n07,31\n12,NA\n");
        let df = read_table(&path, &ReadOptions::default()).unwrap();
        assert_eq!(
            strings(&df, "District"),
            vec![Some("07".to_string()), Some("12".to_string())]
        );
        assert_eq!(strings(&df, "Age"), vec![Some("31".to_string()), None]);
    }

    #[test]
    fn null_tokens_become_null() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.csv", "x\n*\nNR\nNone\nok\n");
        let df = read_table(&path, &ReadOptions::default()).unwrap();
        assert_eq!(
            strings(&df, "x"),
            vec![None, None, None, Some("ok".to_string())]
        );
    }

    #[test]
    fn inference_yields_numeric_columns() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.csv", "Age\n31\n40\n");
        let df = read_table(&path, &ReadOptions::default().with_infer_types(true)).unwrap();
        assert!(df.column("Age").unwrap().dtype().is_integer());
    }

    #[test]
    fn byte_order_mark_is_removed_from_header() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.csv", "\u{feff}Sector,State\n1,2\n");
        let df = read_table(&path, &ReadOptions::default()).unwrap();
        assert!(df.column("Sector").is_ok());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.txt", "x\n1\n");
        assert!(matches!(
            read_table(&path, &ReadOptions::default()),
            Err(IngestError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn unreadable_parts_are_reported_and_skipped() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "tus_1.csv", "a\n1\n");
        let bad = write(&dir, "tus_2.parquet", "not parquet");
        let mut modules = BTreeMap::new();
        modules.insert(ModuleKind::Activity, vec![good, bad.clone()]);
        let discovery = Discovery {
            modules,
            ..Discovery::default()
        };
        let report = read_module_inputs(&discovery, &ReadOptions::default());
        assert_eq!(report.inputs.len(), 1);
        assert_eq!(report.inputs[0].parts.len(), 1);
        assert_eq!(report.inputs[0].parts[0].name, "tus_1.csv");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, bad);
    }
}
