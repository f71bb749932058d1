//! Input file discovery and module matching.
//!
//! Survey modules are distributed as one or more numbered parts
//! (`TUS106_L05_1.csv`, `TUS106_L05_2.csv`, ...). Parts are grouped by
//! their base name and the group is assigned to a module through the
//! layout's file stems. When the same stem is present as both CSV and
//! Parquet, the Parquet file is read and the CSV twin is skipped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use tus_model::{ModuleKind, SurveyLayout};

use crate::error::{IngestError, Result};

/// On-disk format of an input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Parquet,
}

impl InputFormat {
    /// Format implied by a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension().and_then(|ext| ext.to_str())?;
        if ext.eq_ignore_ascii_case("csv") {
            Some(InputFormat::Csv)
        } else if ext.eq_ignore_ascii_case("parquet") {
            Some(InputFormat::Parquet)
        } else {
            None
        }
    }
}

/// Lists all CSV and Parquet files in a directory.
///
/// Returns files sorted by filename.
pub fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && InputFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Split a file stem into its lower-cased base name and part number.
///
/// A trailing `_<digits>` marks a part: `TUS106_L05_2` is part 2 of
/// `tus106_l05`. Stems without such a suffix have no part number.
pub fn split_part(stem: &str) -> (String, Option<u32>) {
    if let Some((base, suffix)) = stem.rsplit_once('_')
        && !base.is_empty()
        && !suffix.is_empty()
        && suffix.chars().all(|ch| ch.is_ascii_digit())
        && let Ok(part) = suffix.parse::<u32>()
    {
        return (base.to_lowercase(), Some(part));
    }
    (stem.to_lowercase(), None)
}

/// Result of matching input files to survey modules.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Part files per module, in part order.
    pub modules: BTreeMap<ModuleKind, Vec<PathBuf>>,
    /// Files whose base name matches no module.
    pub unassigned: Vec<PathBuf>,
    /// CSV files skipped because a Parquet file with the same stem exists.
    pub superseded: Vec<PathBuf>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }
}

/// Group files into parts and assign each group to a module.
///
/// Parts of one module are ordered by part number, then by file name;
/// a file without a part number sorts first. A stem present in both
/// formats contributes only its Parquet file.
pub fn discover_module_files(files: &[PathBuf], layout: &SurveyLayout) -> Discovery {
    let mut keyed: BTreeMap<ModuleKind, BTreeMap<String, (Option<u32>, PathBuf)>> =
        BTreeMap::new();
    let mut unassigned = Vec::new();
    let mut superseded = Vec::new();

    for path in files {
        let stem = path
            .file_stem()
            .and_then(|v| v.to_str())
            .unwrap_or("");
        let (base, part) = split_part(stem);
        let Some(kind) = layout.module_for_stem(&base) else {
            debug!(file = %path.display(), base = %base, "file matches no module");
            unassigned.push(path.clone());
            continue;
        };
        let parts = keyed.entry(kind).or_default();
        match parts.get_mut(&stem.to_lowercase()) {
            Some(existing) => {
                let skipped = if prefers(path, &existing.1) {
                    std::mem::replace(&mut existing.1, path.clone())
                } else {
                    path.clone()
                };
                debug!(
                    file = %skipped.display(),
                    kept = %existing.1.display(),
                    "skipping twin of an input file"
                );
                superseded.push(skipped);
            }
            None => {
                parts.insert(stem.to_lowercase(), (part, path.clone()));
            }
        }
    }

    let modules = keyed
        .into_iter()
        .map(|(kind, parts)| {
            let mut parts: Vec<_> = parts.into_values().collect();
            parts.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.file_name().cmp(&b.1.file_name())));
            (kind, parts.into_iter().map(|(_, path)| path).collect())
        })
        .collect();

    Discovery {
        modules,
        unassigned,
        superseded,
    }
}

/// Whether `candidate` should replace `current` for the same stem.
fn prefers(candidate: &Path, current: &Path) -> bool {
    InputFormat::from_path(candidate) == Some(InputFormat::Parquet)
        && InputFormat::from_path(current) != Some(InputFormat::Parquet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tus_model::ModuleLayout;

    fn layout() -> SurveyLayout {
        let mut person = ModuleLayout::new(ModuleKind::Person);
        person.file_stems = vec!["tus106_l02".to_string()];
        let mut activity = ModuleLayout::new(ModuleKind::Activity);
        activity.file_stems = vec!["tus106_l05".to_string()];
        SurveyLayout {
            name: "test".to_string(),
            design_key: vec!["FSU".to_string()],
            aliases: Vec::new(),
            household_id_column: "household_id".to_string(),
            person_id_column: "person_id".to_string(),
            person_seq_column: "Sl.No.".to_string(),
            modules: vec![person, activity],
            geography: None,
            renames: Vec::new(),
            drop_columns: Vec::new(),
            column_order: Vec::new(),
        }
    }

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in &[
            "TUS106_L02.csv",
            "TUS106_L05_10.csv",
            "TUS106_L05_2.csv",
            "TUS106_L05_1.parquet",
            "notes.txt",
            "extra.csv",
        ] {
            std::fs::write(dir.path().join(name), "a\n1\n").unwrap();
        }
        dir
    }

    #[test]
    fn test_list_input_files() {
        let dir = create_test_dir();
        let files = list_input_files(dir.path()).unwrap();
        assert_eq!(files.len(), 5);
        assert!(files[0].ends_with("TUS106_L02.csv"));
    }

    #[test]
    fn test_missing_directory() {
        let dir = create_test_dir();
        let missing = dir.path().join("nope");
        assert!(matches!(
            list_input_files(&missing),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_split_part() {
        assert_eq!(split_part("TUS106_L05_2"), ("tus106_l05".to_string(), Some(2)));
        assert_eq!(split_part("TUS106_L02"), ("tus106_l02".to_string(), None));
        assert_eq!(split_part("tus106hh"), ("tus106hh".to_string(), None));
        assert_eq!(split_part("_7"), ("_7".to_string(), None));
    }

    #[test]
    fn test_discover_orders_parts_numerically() {
        let dir = create_test_dir();
        let files = list_input_files(dir.path()).unwrap();
        let discovery = discover_module_files(&files, &layout());

        let diary: Vec<String> = discovery.modules[&ModuleKind::Activity]
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            diary,
            vec!["TUS106_L05_1.parquet", "TUS106_L05_2.csv", "TUS106_L05_10.csv"]
        );
        assert_eq!(discovery.modules[&ModuleKind::Person].len(), 1);
        assert_eq!(discovery.unassigned.len(), 1);
        assert_eq!(discovery.file_count(), 4);
    }

    #[test]
    fn test_parquet_twin_replaces_csv() {
        let dir = TempDir::new().unwrap();
        for name in &["TUS106_L02.csv", "TUS106_L02.parquet", "TUS106_L05_1.csv"] {
            std::fs::write(dir.path().join(name), "a\n1\n").unwrap();
        }
        let files = list_input_files(dir.path()).unwrap();
        let discovery = discover_module_files(&files, &layout());

        assert_eq!(
            discovery.modules[&ModuleKind::Person],
            vec![dir.path().join("TUS106_L02.parquet")]
        );
        assert_eq!(discovery.superseded, vec![dir.path().join("TUS106_L02.csv")]);
        assert!(discovery.unassigned.is_empty());
        assert_eq!(discovery.file_count(), 2);
    }
}
