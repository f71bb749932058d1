use std::fs;

use polars::df;
use tempfile::TempDir;

use tus_model::{Diagnostic, DiagnosticKind, Diagnostics, DistrictKey, ModuleKind, Stage};
use tus_report::{DUPLICATE_KEYS_LOG, UNRESOLVED_KEYS_LOG, write_outputs};
use tus_transform::{DistrictAudit, ModuleSummary, PipelineOutput};

fn output() -> PipelineOutput {
    let mut diagnostics = Diagnostics::new();
    diagnostics.push(
        Diagnostic::new(
            Stage::Mapping,
            DiagnosticKind::UnresolvedDistrict,
            "1 district key(s) not in the reference",
        )
        .with_module(ModuleKind::Person),
    );
    PipelineOutput {
        table: df!("person_id" => ["11", "12"], "district" => ["Patna", "Unknown District (9)"])
            .unwrap(),
        diagnostics,
        district_audit: DistrictAudit {
            duplicates: Vec::new(),
            unresolved: vec![DistrictKey {
                sub_region: "11".to_string(),
                district: "9".to_string(),
                state: "10".to_string(),
            }],
        },
        modules: vec![ModuleSummary {
            kind: ModuleKind::Person,
            parts: 1,
            rows: 2,
            dropped: Vec::new(),
        }],
    }
}

#[test]
fn write_outputs_lays_out_table_and_logs() {
    let dir = TempDir::new().unwrap();
    let table_path = dir.path().join("individual_daily_schedule.parquet");
    let logs_dir = dir.path().join("logs");

    let written = write_outputs(&output(), &table_path, &logs_dir).unwrap();

    assert_eq!(written.table, table_path);
    assert!(table_path.exists());
    assert_eq!(
        written.audit_logs,
        vec![logs_dir.join(DUPLICATE_KEYS_LOG), logs_dir.join(UNRESOLVED_KEYS_LOG)]
    );
    assert_eq!(
        fs::read_to_string(logs_dir.join(DUPLICATE_KEYS_LOG)).unwrap(),
        "Key,State,District\n"
    );
    assert_eq!(
        fs::read_to_string(logs_dir.join(UNRESOLVED_KEYS_LOG)).unwrap(),
        "Sub-region Code,District Code,State Code\n11,9,10\n"
    );

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written.diagnostics).unwrap()).unwrap();
    assert_eq!(document["summary"]["warnings"], 1);
    assert_eq!(document["diagnostics"][0]["kind"], "unresolved_district");
}

#[test]
fn unwritable_table_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let result = write_outputs(
        &output(),
        &blocker.join("table.parquet"),
        &dir.path().join("logs"),
    );
    assert!(result.is_err());
}
