//! Output generation for a harmonization run.
//!
//! - **writer**: the harmonized Parquet table and `diagnostics.json`
//! - **audit**: geographic reference audit logs

pub mod audit;
pub mod error;
pub mod writer;

use std::path::{Path, PathBuf};

use tus_transform::PipelineOutput;

pub use audit::{
    DUPLICATE_KEYS_LOG, UNRESOLVED_KEYS_LOG, render_duplicate_keys, render_unresolved_keys,
    write_audit_logs,
};
pub use error::{ReportError, Result};
pub use writer::{DIAGNOSTICS_FILE, write_diagnostics_json, write_parquet, write_text};

/// Default file name of the harmonized table.
pub const DEFAULT_OUTPUT_FILE: &str = "individual_daily_schedule.parquet";

/// Paths written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutputs {
    pub table: PathBuf,
    pub diagnostics: PathBuf,
    pub audit_logs: Vec<PathBuf>,
}

/// Write the table to `table_path` and the audit artifacts into `logs_dir`.
pub fn write_outputs(
    output: &PipelineOutput,
    table_path: &Path,
    logs_dir: &Path,
) -> Result<WrittenOutputs> {
    write_parquet(table_path, &output.table)?;
    let diagnostics = logs_dir.join(DIAGNOSTICS_FILE);
    write_diagnostics_json(&diagnostics, &output.diagnostics)?;
    let audit_logs = write_audit_logs(
        logs_dir,
        &output.district_audit.duplicates,
        &output.district_audit.unresolved,
    )?;
    Ok(WrittenOutputs {
        table: table_path.to_path_buf(),
        diagnostics,
        audit_logs,
    })
}
