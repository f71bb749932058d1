//! End-to-end runs of the driver over a folder of 2019-round extracts.

use std::fs;
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, ParquetReader, ParquetWriter, SerReader};
use tempfile::TempDir;

use tus_cli::pipeline::{LayoutSource, RunConfig, run_harmonization};
use tus_model::{DiagnosticKind, ModuleKind, PipelineOptions};

const HEAD: &str = "Common-ID,Schedule,Survey,Year,FSU Serial No.,Sector,State,District,\
Stratum,Sub-Stratum,Sub-Round,FOD Sub-Region,Sample hhld. No.";
const DESIGN: &str = "A1,TUS,T,2019,30010,1,07,03,1,1,1,71,1";

fn write_round(dir: &Path) {
    let person = format!(
        "{HEAD},Person serial no.,Gender,Age,marital status,highest level of education,\
usual principal activity: status (code),industry of work: 2-digit of NIC 2008\n\
{DESIGN},1,1,34,2,12,31,47\n\
{DESIGN},2,2,30,2,10,92,\n"
    );
    let household = format!(
        "{HEAD},Household size,religion,Social group ,\
usual monthly consumer expenditure E: [A+B+C+(D/12)]\n\
{DESIGN},2,1,3,12000\n"
    );
    let activity = format!(
        "{HEAD},Sl.No.,srl. No of activity,time from,time to,\
whether performed multiple activity in the time slot,whether simultaneous activity,\
whether a major activity,3-digit activity code,where the activity was performed,\
unpaid/paid status of activity,enterprise type\n\
{DESIGN},1,1,04:00,04:30,2,,1,911,1,1,\n\
{DESIGN},1,2,04:30,05:00,2,,1,921,1,1,\n\
{DESIGN},2,1,04:00,05:00,2,,1,911,1,1,\n"
    );
    fs::write(dir.join("TUS106_L02_1.csv"), person).unwrap();
    fs::write(dir.join("TUS106_L03.csv"), household).unwrap();
    fs::write(dir.join("TUS106_L05.csv"), activity).unwrap();
}

fn string_values(table: &DataFrame, column: &str) -> Vec<Option<String>> {
    table
        .column(column)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect()
}

#[test]
fn run_links_modules_and_writes_outputs() {
    let dir = TempDir::new().unwrap();
    write_round(dir.path());
    let references = TempDir::new().unwrap();
    let districts = references.path().join("districts.csv");
    fs::write(
        &districts,
        "Sub-region Code,District Code,State Code,State Name,District Name\n,3,7,Delhi,New Delhi\n",
    )
    .unwrap();

    let config = RunConfig::new(dir.path()).with_districts(Some(districts));
    let result = run_harmonization(&config).unwrap();
    let table = &result.output.table;

    assert_eq!(table.height(), 3);
    assert_eq!(
        string_values(table, "person_id"),
        vec![
            Some("30010107031117111".to_string()),
            Some("30010107031117111".to_string()),
            Some("30010107031117112".to_string()),
        ]
    );
    assert_eq!(
        string_values(table, "gender"),
        vec![
            Some("male".to_string()),
            Some("male".to_string()),
            Some("female".to_string()),
        ]
    );
    assert_eq!(
        string_values(table, "district")[0].as_deref(),
        Some("New Delhi")
    );
    assert_eq!(string_values(table, "state")[0].as_deref(), Some("Delhi"));
    assert_eq!(table.get_column_names()[0].as_str(), "person_id");
    assert!(table.column("household_id").is_err());

    assert!(result.written.table.exists());
    assert_eq!(
        result.written.table,
        dir.path().join("individual_daily_schedule.parquet")
    );
    assert!(result.written.diagnostics.exists());
    assert_eq!(result.written.audit_logs.len(), 2);
    assert!(result.output.district_audit.unresolved.is_empty());
    assert!(result.unassigned.is_empty());
    assert!(result.read_failures.is_empty());

    let written = ParquetReader::new(fs::File::open(&result.written.table).unwrap())
        .finish()
        .unwrap();
    assert!(written.equals_missing(table));
}

#[test]
fn missing_reference_is_recorded_not_fatal() {
    let dir = TempDir::new().unwrap();
    write_round(dir.path());
    let out = TempDir::new().unwrap();

    let config = RunConfig::new(dir.path())
        .with_output(out.path().join("schedule.parquet"))
        .with_logs_dir(out.path().join("logs"));
    let result = run_harmonization(&config).unwrap();

    assert!(result.diagnostics().has_kind(DiagnosticKind::MappingFailed));
    assert_eq!(string_values(&result.output.table, "district")[0].as_deref(), Some("03"));
    assert!(out.path().join("logs").join("diagnostics.json").exists());
    assert!(
        out.path()
            .join("logs")
            .join("district_mapping_failures.log")
            .exists()
    );
}

#[test]
fn parallel_run_matches_sequential() {
    let dir = TempDir::new().unwrap();
    write_round(dir.path());
    let out = TempDir::new().unwrap();

    let sequential = run_harmonization(
        &RunConfig::new(dir.path())
            .with_output(out.path().join("seq.parquet"))
            .with_logs_dir(out.path().join("seq")),
    )
    .unwrap();
    let parallel = run_harmonization(
        &RunConfig::new(dir.path())
            .with_output(out.path().join("par.parquet"))
            .with_logs_dir(out.path().join("par"))
            .with_options(PipelineOptions::new().with_parallel(true).with_max_workers(2)),
    )
    .unwrap();

    assert!(sequential.output.table.equals_missing(&parallel.output.table));
    assert_eq!(sequential.output.diagnostics, parallel.output.diagnostics);
}

#[test]
fn unmatched_files_are_reported() {
    let dir = TempDir::new().unwrap();
    write_round(dir.path());
    fs::write(dir.path().join("codebook.csv"), "a,b\n1,2\n").unwrap();

    let result = run_harmonization(&RunConfig::new(dir.path())).unwrap();
    assert_eq!(result.unassigned, vec![dir.path().join("codebook.csv")]);
}

#[test]
fn folder_without_module_files_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("codebook.csv"), "a,b\n1,2\n").unwrap();

    let error = run_harmonization(&RunConfig::new(dir.path())).unwrap_err();
    assert!(format!("{error:#}").contains("discover survey modules"));
    assert!(!dir.path().join("individual_daily_schedule.parquet").exists());
}

#[test]
fn unknown_preset_fails_before_reading() {
    let dir = TempDir::new().unwrap();
    write_round(dir.path());

    let config =
        RunConfig::new(dir.path()).with_layout(LayoutSource::Preset("tus1998".to_string()));
    let error = run_harmonization(&config).unwrap_err();
    assert!(format!("{error:#}").contains("tus1998"));
}

#[test]
fn malformed_code_map_overrides_fail() {
    let dir = TempDir::new().unwrap();
    write_round(dir.path());
    let overrides = dir.path().join("overrides.json");
    fs::write(&overrides, "{not json").unwrap();

    let config = RunConfig::new(dir.path()).with_code_maps(Some(overrides));
    let error = run_harmonization(&config).unwrap_err();
    assert!(format!("{error:#}").contains("code map overrides"));
}

#[test]
fn code_map_overrides_change_labels() {
    let dir = TempDir::new().unwrap();
    write_round(dir.path());
    let references = TempDir::new().unwrap();
    let overrides = references.path().join("overrides.json");
    fs::write(
        &overrides,
        r#"[{"name": "gender", "entries": {"1": "man", "2": "woman"}}]"#,
    )
    .unwrap();

    let config = RunConfig::new(dir.path()).with_code_maps(Some(overrides));
    let result = run_harmonization(&config).unwrap();
    assert_eq!(
        string_values(&result.output.table, "gender")[2].as_deref(),
        Some("woman")
    );
}

#[test]
fn repeated_reference_rows_reach_the_audit_log() {
    let dir = TempDir::new().unwrap();
    write_round(dir.path());
    let references = TempDir::new().unwrap();
    let districts = references.path().join("districts.csv");
    fs::write(
        &districts,
        "Sub-region Code,District Code,State Code,State Name,District Name\n\
,3,7,Delhi,New Delhi\n\
,03,07,Delhi,New Delhi (revised)\n",
    )
    .unwrap();

    let config = RunConfig::new(dir.path()).with_districts(Some(districts));
    let result = run_harmonization(&config).unwrap();

    assert_eq!(
        string_values(&result.output.table, "district")[0].as_deref(),
        Some("New Delhi (revised)")
    );
    assert_eq!(result.output.district_audit.duplicates.len(), 1);
    assert!(
        result
            .diagnostics()
            .has_kind(DiagnosticKind::DuplicateReferenceKey)
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("logs").join("duplicate_district_keys.log")).unwrap(),
        "Key,State,District\n_3_7,Delhi,New Delhi (revised)\n"
    );
}

#[test]
fn parquet_twin_of_a_csv_is_read_once() {
    let dir = TempDir::new().unwrap();
    write_round(dir.path());
    let csv_path = dir.path().join("TUS106_L03.csv");
    let mut household = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(csv_path))
        .unwrap()
        .finish()
        .unwrap();
    let file = fs::File::create(dir.path().join("TUS106_L03.parquet")).unwrap();
    ParquetWriter::new(file).finish(&mut household).unwrap();

    let result = run_harmonization(&RunConfig::new(dir.path())).unwrap();

    assert_eq!(result.output.table.height(), 3);
    let household_summary = result
        .output
        .modules
        .iter()
        .find(|module| module.kind == ModuleKind::Household)
        .unwrap();
    assert_eq!(household_summary.parts, 1);
    assert_eq!(household_summary.rows, 1);
    assert!(result.unassigned.is_empty());
}
