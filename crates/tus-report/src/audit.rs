//! Audit logs for the geographic reference.
//!
//! Both logs are small CSV documents meant to be read next to the reference
//! table: one lists composite keys that the reference repeats, the other
//! the keys found in the data that it does not contain.

use std::path::{Path, PathBuf};

use tracing::debug;
use tus_model::{DistrictKey, DuplicateDistrictKey};

use crate::error::{ReportError, Result};
use crate::writer::write_text;

pub const DUPLICATE_KEYS_LOG: &str = "duplicate_district_keys.log";
pub const UNRESOLVED_KEYS_LOG: &str = "district_mapping_failures.log";

/// Render repeated reference keys with the mapping that was kept.
pub fn render_duplicate_keys(duplicates: &[DuplicateDistrictKey]) -> Result<String> {
    render(
        Path::new(DUPLICATE_KEYS_LOG),
        &["Key", "State", "District"],
        duplicates.iter().map(|dup| {
            [
                dup.key.to_string(),
                dup.kept.state_name.clone(),
                dup.kept.district_name.clone(),
            ]
        }),
    )
}

/// Render composite keys that had no reference entry.
pub fn render_unresolved_keys(keys: &[DistrictKey]) -> Result<String> {
    render(
        Path::new(UNRESOLVED_KEYS_LOG),
        &["Sub-region Code", "District Code", "State Code"],
        keys.iter().map(|key| {
            [
                key.sub_region.clone(),
                key.district.clone(),
                key.state.clone(),
            ]
        }),
    )
}

fn render<I>(name: &Path, header: &[&str; 3], rows: I) -> Result<String>
where
    I: IntoIterator<Item = [String; 3]>,
{
    let csv_error = |error: &dyn std::fmt::Display| ReportError::Csv {
        path: name.to_path_buf(),
        message: error.to_string(),
    };
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header).map_err(|e| csv_error(&e))?;
    for row in rows {
        writer.write_record(&row).map_err(|e| csv_error(&e))?;
    }
    let bytes = writer.into_inner().map_err(|e| csv_error(&e))?;
    String::from_utf8(bytes).map_err(|e| csv_error(&e))
}

/// Write both audit logs into `logs_dir`.
pub fn write_audit_logs(
    logs_dir: &Path,
    duplicates: &[DuplicateDistrictKey],
    unresolved: &[DistrictKey],
) -> Result<Vec<PathBuf>> {
    let duplicates_path = logs_dir.join(DUPLICATE_KEYS_LOG);
    write_text(&duplicates_path, &render_duplicate_keys(duplicates)?)?;
    let unresolved_path = logs_dir.join(UNRESOLVED_KEYS_LOG);
    write_text(&unresolved_path, &render_unresolved_keys(unresolved)?)?;
    debug!(
        duplicates = duplicates.len(),
        unresolved = unresolved.len(),
        dir = %logs_dir.display(),
        "audit logs written"
    );
    Ok(vec![duplicates_path, unresolved_path])
}
