//! Code-to-label translation for categorical and geographic columns.
//!
//! Every step here is column-local and tolerant: a column that cannot be
//! mapped is left as it was and the failure is recorded, so one bad column
//! never stops the run.

use std::collections::BTreeSet;

use polars::prelude::DataFrame;
use tracing::debug;
use tus_common::column_codes;
use tus_model::{
    CodeMap, Diagnostic, DiagnosticKind, Diagnostics, DistrictKey, DistrictTable, EnrichmentStep,
    GeoColumns, Severity, Stage, StateSource, UNKNOWN_DISTRICT, UNKNOWN_STATE,
};
use tus_standards::CodeMapRegistry;

use crate::data_utils::string_column;

/// Unmapped codes listed in a diagnostic before the message is truncated.
const MAX_LISTED_CODES: usize = 10;

/// Replace the codes in `column` by their labels from `map`.
///
/// Returns the input unchanged when the column is absent.
pub fn map_column(
    df: &DataFrame,
    column: &str,
    map: &CodeMap,
    diagnostics: &mut Diagnostics,
) -> DataFrame {
    let Ok(source) = df.column(column) else {
        debug!(column, code_map = %map.name, "column absent, mapping skipped");
        return df.clone();
    };

    let codes = column_codes(source);
    let mut unmapped = BTreeSet::new();
    let labels: Vec<Option<String>> = codes
        .iter()
        .map(|code| {
            if let Some(code) = code
                && map.lookup(code).is_none()
            {
                unmapped.insert(code.clone());
            }
            Some(map.resolve(code.as_deref()))
        })
        .collect();

    let mut out = df.clone();
    if let Err(error) = out.with_column(string_column(column, labels.len(), labels)) {
        diagnostics.push(
            Diagnostic::new(
                Stage::Mapping,
                DiagnosticKind::MappingFailed,
                format!("mapping with '{}' failed: {error}", map.name),
            )
            .with_column(column),
        );
        return df.clone();
    }

    if !unmapped.is_empty() {
        diagnostics.push(
            Diagnostic::new(
                Stage::Mapping,
                DiagnosticKind::UnmappedCodes,
                format!(
                    "{} code(s) not in '{}': {}",
                    unmapped.len(),
                    map.name,
                    list_codes(&unmapped)
                ),
            )
            .with_column(column),
        );
    }
    out
}

fn list_codes(codes: &BTreeSet<String>) -> String {
    let mut listed: Vec<&str> = codes.iter().take(MAX_LISTED_CODES).map(String::as_str).collect();
    if codes.len() > MAX_LISTED_CODES {
        listed.push("...");
    }
    listed.join(", ")
}

/// State code carried in the leading digits of an NSS region code.
///
/// A three-character region keeps its first two characters, a
/// two-character region its first one; anything else is returned as is.
pub fn derive_state_code(region: &str) -> String {
    let region = region.trim();
    let chars: Vec<char> = region.chars().collect();
    match chars.len() {
        3 => chars[..2].iter().collect(),
        2 => chars[..1].iter().collect(),
        _ => region.to_string(),
    }
}

/// Result of a district lookup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistrictOutcome {
    /// Rows whose composite key had a reference entry.
    pub resolved: usize,
    /// Distinct composite keys with no reference entry.
    pub unresolved: Vec<DistrictKey>,
}

/// Replace district codes by district names using the composite key.
///
/// Rows with any key part missing get [`UNKNOWN_DISTRICT`]; keys without a
/// reference entry get `"Unknown District (<code>)"`. When the layout names
/// a state name column it receives the resolved state name.
pub fn map_district(
    df: &DataFrame,
    geo: &GeoColumns,
    table: &DistrictTable,
    diagnostics: &mut Diagnostics,
) -> (DataFrame, DistrictOutcome) {
    let mut required = vec![geo.district.as_str(), geo.state.column()];
    if let Some(sub_region) = &geo.sub_region {
        required.push(sub_region.as_str());
    }
    let missing: Vec<&str> = required
        .into_iter()
        .filter(|name| df.column(name).is_err())
        .collect();
    if !missing.is_empty() {
        diagnostics.push(Diagnostic::new(
            Stage::Mapping,
            DiagnosticKind::MissingColumn,
            format!(
                "district lookup skipped, missing column(s): {}",
                missing.join(", ")
            ),
        ));
        return (df.clone(), DistrictOutcome::default());
    }

    let codes_of = |name: &str| df.column(name).map(column_codes).unwrap_or_default();
    let districts = codes_of(&geo.district);
    let states: Vec<Option<String>> = match &geo.state {
        StateSource::Column(name) => codes_of(name),
        StateSource::NssRegion(name) => codes_of(name)
            .into_iter()
            .map(|region| region.map(|region| derive_state_code(&region)))
            .collect(),
    };
    let sub_regions: Option<Vec<Option<String>>> = geo.sub_region.as_deref().map(codes_of);

    let height = df.height();
    let mut district_names = Vec::with_capacity(height);
    let mut state_names = Vec::with_capacity(height);
    let mut unresolved = BTreeSet::new();
    let mut outcome = DistrictOutcome::default();

    for row in 0..height {
        let sub_region = match &sub_regions {
            Some(values) => values[row].as_deref(),
            None => Some(""),
        };
        let (Some(sub_region), Some(district), Some(state)) =
            (sub_region, districts[row].as_deref(), states[row].as_deref())
        else {
            district_names.push(Some(UNKNOWN_DISTRICT.to_string()));
            state_names.push(Some(UNKNOWN_STATE.to_string()));
            continue;
        };
        let key = table.key(sub_region, district, state);
        match table.get(&key) {
            Some(name) => {
                outcome.resolved += 1;
                district_names.push(Some(name.district_name.clone()));
                state_names.push(Some(name.state_name.clone()));
            }
            None => {
                district_names.push(Some(format!("{UNKNOWN_DISTRICT} ({district})")));
                state_names.push(Some(UNKNOWN_STATE.to_string()));
                unresolved.insert(key);
            }
        }
    }

    let mut columns = vec![string_column(&geo.district, height, district_names)];
    if let Some(state_column) = &geo.state_name_column {
        columns.push(string_column(state_column, height, state_names));
    }
    let mut out = df.clone();
    if let Err(error) = columns
        .into_iter()
        .try_for_each(|column| out.with_column(column).map(|_| ()))
    {
        diagnostics.push(
            Diagnostic::new(
                Stage::Mapping,
                DiagnosticKind::MappingFailed,
                format!("district lookup failed: {error}"),
            )
            .with_column(geo.district.clone()),
        );
        return (df.clone(), DistrictOutcome::default());
    }

    outcome.unresolved = unresolved.into_iter().collect();
    if !outcome.unresolved.is_empty() {
        diagnostics.push(
            Diagnostic::new(
                Stage::Mapping,
                DiagnosticKind::UnresolvedDistrict,
                format!(
                    "{} composite district key(s) have no reference entry",
                    outcome.unresolved.len()
                ),
            )
            .with_column(geo.district.clone()),
        );
    }
    debug!(
        resolved = outcome.resolved,
        unresolved = outcome.unresolved.len(),
        "district lookup complete"
    );
    (out, outcome)
}

/// Run an ordered enrichment plan against `df`.
///
/// Steps naming a code map the registry does not know are reported and
/// skipped; absent columns are skipped by [`map_column`].
pub fn apply_enrichment_plan(
    df: &DataFrame,
    plan: &[EnrichmentStep],
    registry: &CodeMapRegistry,
    diagnostics: &mut Diagnostics,
) -> DataFrame {
    let mut out = df.clone();
    for step in plan {
        match registry.get(&step.code_map) {
            Some(map) => out = map_column(&out, &step.column, map, diagnostics),
            None => diagnostics.push(
                Diagnostic::new(
                    Stage::Mapping,
                    DiagnosticKind::MappingFailed,
                    format!("unknown code map '{}'", step.code_map),
                )
                .with_column(step.column.clone())
                .with_severity(Severity::Warning),
            ),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use proptest::prelude::*;
    use tus_model::DistrictName;

    fn gender() -> CodeMap {
        CodeMap::from_pairs("gender", [("1", "male"), ("2", "female")])
    }

    fn strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
        df.column(column)
            .expect("column")
            .str()
            .expect("string column")
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    fn owned(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn gender_codes_map_with_fallbacks() {
        let df = df!(
            "Gender" => [Some(1i64), Some(2), Some(3), None],
            "Age" => [Some(20i64), Some(30), Some(40), Some(50)]
        )
        .expect("frame");
        let mut diagnostics = Diagnostics::new();
        let out = map_column(&df, "Gender", &gender(), &mut diagnostics);
        assert_eq!(
            strings(&out, "Gender"),
            owned(&["male", "female", "Unknown (3)", "Unknown"])
        );
        assert_eq!(
            out.select(["Age"]).expect("age"),
            df.select(["Age"]).expect("age")
        );
        assert_eq!(diagnostics.of_kind(DiagnosticKind::UnmappedCodes).count(), 1);
    }

    #[test]
    fn float_and_padded_codes_resolve_like_integers() {
        let df = df!("Gender" => ["1.0", "02", " 1 "]).expect("frame");
        let mut diagnostics = Diagnostics::new();
        let out = map_column(&df, "Gender", &gender(), &mut diagnostics);
        assert_eq!(strings(&out, "Gender"), owned(&["male", "female", "male"]));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn map_null_fallback_is_used() {
        let map = CodeMap::from_pairs("flag", [("1", "yes"), ("2", "no")]).with_null_fallback("yes");
        let df = df!("flag" => [None, Some("2")]).expect("frame");
        let out = map_column(&df, "flag", &map, &mut Diagnostics::new());
        assert_eq!(strings(&out, "flag"), owned(&["yes", "no"]));
    }

    #[test]
    fn absent_column_is_silently_skipped() {
        let df = df!("Age" => [1]).expect("frame");
        let mut diagnostics = Diagnostics::new();
        let out = map_column(&df, "Gender", &gender(), &mut diagnostics);
        assert_eq!(out, df);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn state_code_from_region() {
        assert_eq!(derive_state_code("241"), "24");
        assert_eq!(derive_state_code("91"), "9");
        assert_eq!(derive_state_code("5"), "5");
        assert_eq!(derive_state_code("1234"), "1234");
    }

    fn reference() -> DistrictTable {
        let mut table = DistrictTable::new(true);
        table.insert(
            "1",
            "7",
            "24",
            DistrictName {
                state_name: "Gujarat".to_string(),
                district_name: "Kachchh".to_string(),
            },
        );
        table
    }

    fn geo() -> GeoColumns {
        GeoColumns {
            sub_region: Some("FOD Sub-Region".to_string()),
            district: "District".to_string(),
            state: StateSource::NssRegion("NSS-Region".to_string()),
            state_name_column: Some("state".to_string()),
            strip_leading_zeros: true,
        }
    }

    #[test]
    fn district_lookup_resolves_and_records_misses() {
        let df = df!(
            "FOD Sub-Region" => [Some("01"), Some("1"), None],
            "District" => [Some("07"), Some("99"), Some("7")],
            "NSS-Region" => [Some("241"), Some("242"), Some("241")]
        )
        .expect("frame");
        let mut diagnostics = Diagnostics::new();
        let (out, outcome) = map_district(&df, &geo(), &reference(), &mut diagnostics);

        assert_eq!(
            strings(&out, "District"),
            owned(&["Kachchh", "Unknown District (99)", "Unknown District"])
        );
        assert_eq!(
            strings(&out, "state"),
            owned(&["Gujarat", "Unknown State", "Unknown State"])
        );
        assert_eq!(strings(&out, "NSS-Region"), strings(&df, "NSS-Region"));
        assert_eq!(outcome.resolved, 1);
        assert_eq!(
            outcome.unresolved,
            vec![DistrictKey {
                sub_region: "1".to_string(),
                district: "99".to_string(),
                state: "24".to_string(),
            }]
        );
        assert!(diagnostics.has_kind(DiagnosticKind::UnresolvedDistrict));
    }

    #[test]
    fn district_lookup_without_columns_is_reported() {
        let df = df!("District" => ["7"]).expect("frame");
        let mut diagnostics = Diagnostics::new();
        let (out, outcome) = map_district(&df, &geo(), &reference(), &mut diagnostics);
        assert_eq!(out, df);
        assert_eq!(outcome, DistrictOutcome::default());
        assert!(diagnostics.has_kind(DiagnosticKind::MissingColumn));
    }

    #[test]
    fn enrichment_plan_reports_unknown_maps_as_warnings() {
        let mut registry = CodeMapRegistry::empty();
        registry.insert(gender());
        let plan = vec![
            EnrichmentStep::new("Gender", "gender"),
            EnrichmentStep::new("Religion", "no_such_map"),
        ];
        let df = df!("Gender" => ["2"], "Religion" => ["1"]).expect("frame");
        let mut diagnostics = Diagnostics::new();
        let out = apply_enrichment_plan(&df, &plan, &registry, &mut diagnostics);
        assert_eq!(strings(&out, "Gender"), owned(&["female"]));
        assert_eq!(strings(&out, "Religion"), owned(&["1"]));
        let failure = diagnostics
            .of_kind(DiagnosticKind::MappingFailed)
            .next()
            .expect("unknown map reported");
        assert_eq!(failure.severity, Severity::Warning);
    }

    proptest! {
        #[test]
        fn mapped_codes_resolve_exactly(
            entries in prop::collection::btree_map("[1-9][0-9]{0,2}", "[a-z]{1,8}", 1..12)
        ) {
            let map = CodeMap::from_pairs("test", entries.iter().map(|(c, l)| (c.as_str(), l.clone())));
            let codes: Vec<String> = entries.keys().cloned().collect();
            let df = df!("code" => codes).expect("frame");
            let out = map_column(&df, "code", &map, &mut Diagnostics::new());
            let expected: Vec<Option<String>> = entries.values().cloned().map(Some).collect();
            prop_assert_eq!(strings(&out, "code"), expected);
        }

        #[test]
        fn unmapped_codes_keep_their_raw_value(
            entries in prop::collection::btree_map("[1-9][0-9]{0,2}", "[a-z]{1,8}", 0..12),
            code in "[1-9][0-9]{3}"
        ) {
            let map = CodeMap::from_pairs("test", entries.iter().map(|(c, l)| (c.as_str(), l.clone())));
            let df = df!("code" => [code.clone()]).expect("frame");
            let out = map_column(&df, "code", &map, &mut Diagnostics::new());
            let label = strings(&out, "code").remove(0).expect("label");
            prop_assert!(label.contains(&code));
            prop_assert!(!entries.values().any(|defined| defined == &label));
        }
    }
}
