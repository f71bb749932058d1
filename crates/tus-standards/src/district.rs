#![deny(unsafe_code)]

//! Loader for the geographic reference table.
//!
//! The reference is a CSV with one row per district:
//! `Sub-region Code, District Code, State Code, State Name, District Name`.

use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};
use tus_model::{DistrictName, DistrictTable, GeoColumns};

use crate::error::{Result, StandardsError};

pub const SUB_REGION_CODE: &str = "Sub-region Code";
pub const DISTRICT_CODE: &str = "District Code";
pub const STATE_CODE: &str = "State Code";
pub const STATE_NAME: &str = "State Name";
pub const DISTRICT_NAME: &str = "District Name";

fn header_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_matches('\u{feff}').trim() == name)
}

fn get_string(row: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Load the district reference from a CSV file.
///
/// The sub-region part of the key is read only when `geo` names a
/// sub-region column; otherwise entries are keyed by district and state.
pub fn load_district_table(path: &Path, geo: &GeoColumns) -> Result<DistrictTable> {
    let file = std::fs::File::open(path).map_err(|e| StandardsError::io(path, e))?;
    let table = read_district_table(file, path, geo)?;
    debug!(
        path = %path.display(),
        entries = table.len(),
        duplicates = table.duplicates().len(),
        "loaded district reference"
    );
    Ok(table)
}

/// Parse a district reference from any reader. `path` is used for errors.
pub fn read_district_table<R: Read>(
    reader: R,
    path: &Path,
    geo: &GeoColumns,
) -> Result<DistrictTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| StandardsError::csv(path, &e))?
        .clone();

    let require = |name: &str| {
        header_index(&headers, name).ok_or_else(|| StandardsError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
    };
    let idx_district = require(DISTRICT_CODE)?;
    let idx_state = require(STATE_CODE)?;
    let idx_district_name = require(DISTRICT_NAME)?;
    let idx_state_name = header_index(&headers, STATE_NAME);
    let idx_sub_region = if geo.sub_region.is_some() {
        Some(require(SUB_REGION_CODE)?)
    } else {
        None
    };

    let mut table = DistrictTable::new(geo.strip_leading_zeros);
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = row.map_err(|e| StandardsError::csv(path, &e))?;
        let district = get_string(&row, Some(idx_district));
        let state = get_string(&row, Some(idx_state));
        if district.is_empty() || state.is_empty() {
            skipped += 1;
            continue;
        }
        let sub_region = get_string(&row, idx_sub_region);
        let name = DistrictName {
            state_name: get_string(&row, idx_state_name),
            district_name: get_string(&row, Some(idx_district_name)),
        };
        table.insert(&sub_region, &district, &state, name);
    }
    if skipped > 0 {
        warn!(
            path = %path.display(),
            skipped,
            "district reference rows without district or state code were skipped"
        );
    }
    Ok(table)
}
