//! Filesystem tests for reference data loading.

use std::io::Write;

use tempfile::NamedTempFile;
use tus_standards::{
    CodeMapRegistry, StandardsError, load_district_table, load_layout, tus2024,
};

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn loads_district_reference_from_disk() {
    let file = write_temp(
        "Sub-region Code,District Code,State Code,State Name,District Name\n\
         101,07,10,Bihar,Patna\n\
         101,08,10,Bihar,Nalanda\n",
    );
    let layout = tus2024();
    let geo = layout.geography.as_ref().expect("geography");
    let table = load_district_table(file.path(), geo).expect("load reference");

    assert_eq!(table.len(), 2);
    let key = table.key("101", "7", "10");
    assert_eq!(
        table.get(&key).map(|name| name.district_name.as_str()),
        Some("Patna")
    );
    assert!(table.duplicates().is_empty());
}

#[test]
fn missing_reference_file_is_an_io_error() {
    let layout = tus2024();
    let geo = layout.geography.as_ref().expect("geography");
    let error = load_district_table(std::path::Path::new("/nonexistent/districts.csv"), geo)
        .expect_err("missing file");
    assert!(matches!(error, StandardsError::Io { .. }));
}

#[test]
fn code_map_overrides_merge_into_builtins() {
    let file = write_temp(
        r#"[
            {"name": "gender", "entries": {"3": "third gender"}},
            {"name": "land_possessed", "entries": {"01": "less than 0.005 hectare"}, "null_fallback": "not reported"}
        ]"#,
    );
    let mut registry = CodeMapRegistry::builtin();
    let merged = registry.load_overrides(file.path()).expect("load overrides");
    assert_eq!(merged, 2);

    let gender = registry.get("gender").expect("gender");
    assert_eq!(gender.resolve(Some("3")), "third gender");
    assert_eq!(gender.resolve(Some("1")), "male");

    let land = registry.get("land_possessed").expect("land");
    assert_eq!(land.resolve(Some("01")), "less than 0.005 hectare");
    assert_eq!(land.resolve(None), "not reported");
}

#[test]
fn malformed_override_is_a_json_error() {
    let file = write_temp(r#"{"name": "gender"}"#);
    let mut registry = CodeMapRegistry::builtin();
    let error = registry
        .load_overrides(file.path())
        .expect_err("overrides must be an array");
    assert!(matches!(error, StandardsError::Json { .. }));
}

#[test]
fn layout_json_is_validated_on_load() {
    let file = write_temp(
        r#"{
            "name": "broken",
            "design_key": [],
            "person_seq_column": "Sl.No.",
            "modules": []
        }"#,
    );
    let error = load_layout(file.path()).expect_err("empty design key");
    assert!(matches!(error, StandardsError::Layout(_)));
    assert!(error.to_string().contains("design key is empty"));
}

#[test]
fn preset_layout_round_trips_through_json() {
    let layout = tus2024();
    let file = write_temp(&serde_json::to_string(&layout).expect("serialize layout"));
    let loaded = load_layout(file.path()).expect("load layout");
    assert_eq!(loaded, layout);
}
