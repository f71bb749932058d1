//! Tests for tus-model types.

use tus_model::{
    CodeMap, Diagnostic, DiagnosticKind, Diagnostics, DistrictName, DistrictTable, ModuleKind,
    Severity, Stage, StateSource, SurveyLayout,
};

const LAYOUT_JSON: &str = r#"{
    "name": "custom",
    "design_key": ["FSU Serial No.", "Sector", "State", "District", "Sample hhld. No."],
    "aliases": [{"canonical": "Sl.No.", "alternates": ["Person serial no."]}],
    "person_seq_column": "Sl.No.",
    "modules": [
        {"kind": "household", "file_stems": ["hh"], "enrichment": [
            {"column": "Religion", "code_map": "religion"}
        ]},
        {"kind": "person", "file_stems": ["per"], "subset": {"head_len": 4, "keep_index": 1},
         "map_geography": true},
        {"kind": "activity", "file_stems": ["act_a", "act_b"]}
    ],
    "geography": {"district": "District", "state": {"kind": "column", "column": "State"}},
    "column_order": ["person_id", "District"]
}"#;

#[test]
fn layout_loads_from_json_with_defaults() {
    let layout: SurveyLayout = serde_json::from_str(LAYOUT_JSON).expect("parse layout");
    layout.validate().expect("valid layout");

    assert_eq!(layout.household_id_column, "household_id");
    assert_eq!(layout.person_id_column, "person_id");
    assert_eq!(layout.modules.len(), 3);
    assert_eq!(layout.module_for_stem("ACT_B"), Some(ModuleKind::Activity));

    let geo = layout.geography.as_ref().expect("geography");
    assert!(geo.strip_leading_zeros);
    assert!(geo.sub_region.is_none());
    assert_eq!(geo.state, StateSource::Column("State".to_string()));

    let household = layout.module(ModuleKind::Household).expect("household module");
    assert_eq!(household.enrichment[0].code_map, "religion");
}

#[test]
fn layout_without_geography_rejects_geo_mapping() {
    let json = LAYOUT_JSON.replace(
        r#""geography": {"district": "District", "state": {"kind": "column", "column": "State"}},"#,
        "",
    );
    let layout: SurveyLayout = serde_json::from_str(&json).expect("parse layout");
    let error = layout.validate().expect_err("geography is required");
    assert!(error.to_string().contains("maps geography"));
}

#[test]
fn diagnostics_report_highest_severity_counts() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.push(
        Diagnostic::new(
            Stage::Identifiers,
            DiagnosticKind::DuplicatePersonId,
            "2 duplicate person ids",
        )
        .with_module(ModuleKind::Person),
    );
    diagnostics.push(Diagnostic::new(
        Stage::Mapping,
        DiagnosticKind::MappingFailed,
        "gender: not a column",
    ));

    assert!(diagnostics.has_kind(DiagnosticKind::DuplicatePersonId));
    assert_eq!(diagnostics.of_kind(DiagnosticKind::MappingFailed).count(), 1);
    let summary = diagnostics.summary();
    assert_eq!((summary.info, summary.warnings, summary.errors), (0, 1, 1));
    assert_eq!(
        diagnostics.iter().map(|d| d.severity).max(),
        Some(Severity::Error)
    );
}

#[test]
fn code_map_and_district_table_share_code_normalization() {
    let map = CodeMap::from_pairs("state", [("10", "Bihar")]);
    let mut table = DistrictTable::new(true);
    table.insert(
        "",
        "07.0",
        "10",
        DistrictName {
            state_name: "Bihar".to_string(),
            district_name: "Patna".to_string(),
        },
    );

    assert_eq!(map.resolve(Some("10")), "Bihar");
    let key = table.key("", "7", "10");
    assert_eq!(
        table.get(&key).map(|name| name.district_name.as_str()),
        Some("Patna")
    );
}
