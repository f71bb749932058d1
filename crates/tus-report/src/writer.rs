//! File writers for the harmonized table and the run diagnostics.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use polars::prelude::{DataFrame, ParquetWriter};
use serde::Serialize;
use tracing::debug;
use tus_model::{DiagnosticSummary, Diagnostics};

use crate::error::{ReportError, Result};

pub const DIAGNOSTICS_FILE: &str = "diagnostics.json";

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ReportError::Create {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn create(path: &Path) -> Result<File> {
    ensure_parent(path)?;
    File::create(path).map_err(|source| ReportError::Create {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a text document, creating parent directories as needed.
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, contents).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the table as a Parquet file.
pub fn write_parquet(path: &Path, table: &DataFrame) -> Result<()> {
    let file = create(path)?;
    let mut table = table.clone();
    ParquetWriter::new(file)
        .finish(&mut table)
        .map_err(|source| ReportError::Parquet {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "parquet written"
    );
    Ok(())
}

#[derive(Serialize)]
struct DiagnosticsDocument<'a> {
    summary: DiagnosticSummary,
    diagnostics: &'a Diagnostics,
}

/// Write all diagnostics with their severity counts as JSON.
pub fn write_diagnostics_json(path: &Path, diagnostics: &Diagnostics) -> Result<()> {
    let file = create(path)?;
    let document = DiagnosticsDocument {
        summary: diagnostics.summary(),
        diagnostics,
    };
    serde_json::to_writer_pretty(BufWriter::new(file), &document).map_err(|source| {
        ReportError::Json {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use polars::prelude::{ParquetReader, SerReader};
    use tempfile::TempDir;
    use tus_model::{Diagnostic, DiagnosticKind, ModuleKind, Stage};

    #[test]
    fn parquet_round_trips_column_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("table.parquet");
        let table = df!("person_id" => ["11"], "gender" => ["male"]).unwrap();
        write_parquet(&path, &table).unwrap();

        let read = ParquetReader::new(File::open(&path).unwrap())
            .finish()
            .unwrap();
        assert!(read.equals_missing(&table));
    }

    #[test]
    fn diagnostics_document_has_summary_and_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join(DIAGNOSTICS_FILE);
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(
            Diagnostic::new(Stage::Identifiers, DiagnosticKind::DegradedKey, "missing Sector")
                .with_module(ModuleKind::Household),
        );
        write_diagnostics_json(&path, &diagnostics).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        insta::assert_json_snapshot!(value, @r#"
        {
          "diagnostics": [
            {
              "kind": "degraded_key",
              "message": "missing Sector",
              "module": "household",
              "severity": "warning",
              "stage": "identifiers"
            }
          ],
          "summary": {
            "errors": 0,
            "info": 0,
            "warnings": 1
          }
        }
        "#);
    }
}
