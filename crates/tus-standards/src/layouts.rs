#![deny(unsafe_code)]

//! Survey round layouts: built-in presets and JSON loading.

use std::path::Path;

use tus_model::{
    AliasGroup, ColumnRename, EnrichmentStep, GeoColumns, HeadSubset, ModuleKind, ModuleLayout,
    StateSource, SurveyLayout,
};

use crate::codes;
use crate::error::{Result, StandardsError};

/// Names accepted by [`layout_preset`].
pub const PRESET_NAMES: &[&str] = &["tus2019", "tus2024"];

/// Analytic column order shared by both rounds.
const ANALYTIC_ORDER: &[&str] = &[
    "person_id",
    "state",
    "district",
    "gender",
    "age",
    "marital_status",
    "education",
    "religion",
    "social_group",
    "household_size",
    "monthly_expenditure",
    "principal_activity",
    "industry",
    "activity_serial_no",
    "time_from",
    "time_to",
    "multiple_activity",
    "simultaneous_activity",
    "is_major_activity",
    "activity_code",
    "activity_location",
    "payment_status",
    "enterprise_type",
];

/// Leading administrative columns of each extract: only the second is kept.
const ADMIN_HEAD: HeadSubset = HeadSubset {
    head_len: 4,
    keep_index: 1,
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn alias(canonical: &str, alternates: &[&str]) -> AliasGroup {
    AliasGroup {
        canonical: canonical.to_string(),
        alternates: strings(alternates),
    }
}

fn renames(pairs: &[(&str, &str)]) -> Vec<ColumnRename> {
    pairs
        .iter()
        .map(|(from, to)| ColumnRename {
            from: (*from).to_string(),
            to: (*to).to_string(),
        })
        .collect()
}

fn plan(steps: &[(&str, &str)]) -> Vec<EnrichmentStep> {
    steps
        .iter()
        .map(|(column, code_map)| EnrichmentStep::new(*column, *code_map))
        .collect()
}

fn module(
    kind: ModuleKind,
    file_stems: &[&str],
    subset: Option<HeadSubset>,
    columns: &[&str],
    enrichment: &[(&str, &str)],
) -> ModuleLayout {
    ModuleLayout {
        kind,
        file_stems: strings(file_stems),
        subset,
        columns: strings(columns),
        map_geography: false,
        enrichment: plan(enrichment),
    }
}

/// 2019 round: module files split into numbered parts, admin head columns
/// stripped, district names resolved from state and district codes.
pub fn tus2019() -> SurveyLayout {
    let mut person = module(
        ModuleKind::Person,
        &["tus106_l02"],
        Some(ADMIN_HEAD),
        &[
            "household_id",
            "Sl.No.",
            "State",
            "District",
            "Gender",
            "Age",
            "marital status",
            "highest level of education",
            "usual principal activity: status (code)",
            "industry of work: 2-digit of NIC 2008",
        ],
        &[
            ("highest level of education", codes::EDUCATION),
            ("State", codes::STATE),
            ("Gender", codes::GENDER),
            ("marital status", codes::MARITAL_STATUS),
            ("usual principal activity: status (code)", codes::PRINCIPAL_ACTIVITY),
            ("industry of work: 2-digit of NIC 2008", codes::INDUSTRY),
        ],
    );
    person.map_geography = true;

    let household = module(
        ModuleKind::Household,
        &["tus106_l03"],
        Some(ADMIN_HEAD),
        &[
            "household_id",
            "Household size",
            "religion",
            "Social group ",
            "usual monthly consumer expenditure E: [A+B+C+(D/12)]",
        ],
        &[
            ("religion", codes::RELIGION),
            ("Social group ", codes::SOCIAL_GROUP),
        ],
    );

    let activity = module(
        ModuleKind::Activity,
        &["tus106_l05"],
        Some(ADMIN_HEAD),
        &[
            "household_id",
            "Sl.No.",
            "srl. No of activity",
            "time from",
            "time to",
            "whether performed multiple activity in the time slot",
            "whether simultaneous activity",
            "whether a major activity",
            "3-digit activity code",
            "where the activity was performed",
            "unpaid/paid status of activity",
            "enterprise type",
        ],
        &[
            ("enterprise type", codes::ENTERPRISE_TYPE),
            ("where the activity was performed", codes::ACTIVITY_LOCATION),
            (
                "whether performed multiple activity in the time slot",
                codes::YES_NO_DEFAULT_YES,
            ),
            ("whether simultaneous activity", codes::YES_NO_DEFAULT_YES),
            ("whether a major activity", codes::YES_NO),
            ("unpaid/paid status of activity", codes::PAYMENT_STATUS),
            ("3-digit activity code", codes::ACTIVITY_CODE),
        ],
    );

    SurveyLayout {
        name: "tus2019".to_string(),
        design_key: strings(&[
            "FSU Serial No.",
            "Sector",
            "State",
            "District",
            "Stratum",
            "Sub-Stratum",
            "Sub-Round",
            "FOD Sub-Region",
            "Sample hhld. No.",
        ]),
        aliases: vec![
            alias("Schedule", &[", Schedule"]),
            alias("Sl.No.", &["Person serial no.", "Serial no.of member"]),
            alias("3-digit activity code", &["3-didit activity code"]),
        ],
        household_id_column: "household_id".to_string(),
        person_id_column: "person_id".to_string(),
        person_seq_column: "Sl.No.".to_string(),
        modules: vec![household, person, activity],
        geography: Some(GeoColumns {
            sub_region: None,
            district: "District".to_string(),
            state: StateSource::Column("State".to_string()),
            state_name_column: None,
            strip_leading_zeros: true,
        }),
        renames: renames(&[
            ("State", "state"),
            ("District", "district"),
            ("Gender", "gender"),
            ("Age", "age"),
            ("marital status", "marital_status"),
            ("highest level of education", "education"),
            ("usual principal activity: status (code)", "principal_activity"),
            ("industry of work: 2-digit of NIC 2008", "industry"),
            ("Household size", "household_size"),
            ("religion", "religion"),
            ("Social group ", "social_group"),
            (
                "usual monthly consumer expenditure E: [A+B+C+(D/12)]",
                "monthly_expenditure",
            ),
            ("srl. No of activity", "activity_serial_no"),
            ("time from", "time_from"),
            ("time to", "time_to"),
            (
                "whether performed multiple activity in the time slot",
                "multiple_activity",
            ),
            ("whether simultaneous activity", "simultaneous_activity"),
            ("whether a major activity", "is_major_activity"),
            ("3-digit activity code", "activity_code"),
            ("where the activity was performed", "activity_location"),
            ("unpaid/paid status of activity", "payment_status"),
            ("enterprise type", "enterprise_type"),
        ]),
        drop_columns: strings(&["household_id"]),
        column_order: strings(ANALYTIC_ORDER),
    }
}

/// 2024 round: one household file and one person file carrying the diary
/// slots, the state code folded into the NSS region, and a reference keyed
/// by sub-region, district and state.
pub fn tus2024() -> SurveyLayout {
    let household = module(
        ModuleKind::Household,
        &["tus106hh"],
        None,
        &[],
        &[
            ("religion", codes::RELIGION),
            ("Social group ", codes::SOCIAL_GROUP),
        ],
    );

    let mut activity = module(
        ModuleKind::Activity,
        &["tus106per"],
        None,
        &[],
        &[
            ("Gender", codes::GENDER),
            ("highest level of education", codes::EDUCATION),
            ("marital status", codes::MARITAL_STATUS),
            ("usual principal activity status (code)", codes::PRINCIPAL_ACTIVITY),
            ("industry of work: 2-digit of NIC 2008", codes::INDUSTRY),
            ("3-digit activity code", codes::ACTIVITY_CODE),
            ("enterprise type", codes::ENTERPRISE_TYPE),
            ("where the activity was performed", codes::ACTIVITY_LOCATION),
            ("unpaid/paid status of activity", codes::PAYMENT_STATUS),
            ("day of week", codes::DAY_OF_WEEK),
            ("type of the day", codes::DAY_TYPE),
            ("response code", codes::RESPONSE_CODE),
            ("Relation to head", codes::RELATION_TO_HEAD),
        ],
    );
    activity.map_geography = true;

    SurveyLayout {
        name: "tus2024".to_string(),
        design_key: strings(&[
            "Schedule ID",
            "FSU Serial No.",
            "Schedule",
            "survey year",
            "Sector",
            "NSS-Region",
            "District",
            "Stratum",
            "Sub-Stratum",
            "Sub-Round",
            "FOD Sub-Region",
            "Sample hhld. No.",
        ]),
        aliases: vec![alias("Schedule", &[", Schedule"])],
        household_id_column: "household_id".to_string(),
        person_id_column: "person_id".to_string(),
        person_seq_column: "Person serial no.".to_string(),
        modules: vec![household, activity],
        geography: Some(GeoColumns {
            sub_region: Some("FOD Sub-Region".to_string()),
            district: "District".to_string(),
            state: StateSource::NssRegion("NSS-Region".to_string()),
            state_name_column: Some("state".to_string()),
            strip_leading_zeros: true,
        }),
        renames: renames(&[
            ("District", "district"),
            ("Gender", "gender"),
            ("Age", "age"),
            ("marital status", "marital_status"),
            ("highest level of education", "education"),
            ("religion", "religion"),
            ("Social group ", "social_group"),
            ("Household size", "household_size"),
            (
                "usual monthly consumer expenditure E: [A+B+C+(D+E)/12]",
                "monthly_expenditure",
            ),
            ("usual principal activity status (code)", "principal_activity"),
            ("industry of work: 2-digit of NIC 2008", "industry"),
            ("day of week", "day_of_week"),
            ("type of the day", "day_type"),
            ("srl. No of activity", "activity_serial_no"),
            ("time from (HH:MM)", "time_from"),
            ("time to (HH:MM)", "time_to"),
            (
                "whether performed multiple activity in the time slot",
                "multiple_activity",
            ),
            ("whether simultaneous activity", "simultaneous_activity"),
            ("whether a major activity", "is_major_activity"),
            ("3-digit activity code", "activity_code"),
            ("where the activity was performed", "activity_location"),
            ("unpaid/paid status of activity", "payment_status"),
            ("response code", "response_code"),
            ("Relation to head", "relation_to_head"),
            ("enterprise type", "enterprise_type"),
        ]),
        drop_columns: strings(&[
            "household_id",
            "Schedule ID",
            "FSU Serial No.",
            "Schedule",
            "survey year",
            "Sector",
            "NSS-Region",
            "Stratum",
            "Sub-Stratum",
            "Sub-Round",
            "FOD Sub-Region",
            "Sample hhld. No.",
            "age.1",
            "NSC",
            "MULT",
            "NSC_right",
            "MULT_right",
            "Serial number of the informant",
            "Gender of the informant",
            "Informant Sl.No.",
            "Time to canvass(minutes)",
            "Serial no.of member",
            "srl. No of member",
            "age",
            "Survey Code",
            "Reason for substitution of original household",
            "Type of structure of the dwelling unit",
            "Dwelling unit",
            "Type of sweeping of floor",
            "Type of washing of clothes",
            "Primary source of energey for lighting",
            "Primary source of energey for cooking",
            "expenditure on purchase of household durable during last 365 days (E)",
            "expenditure on purchase of items like clothing, footwear etc. during last 365 days (D)",
            "imputed value of usual consumption in a month from wages in kind, free collection, gifts, etc (C )",
            "imputed value of usual consumption in a month from home grown stock (B)",
            "usual consumer expenditure in a month for household purposes out of purchase (A)",
            "Land possessed as on date of survey(code)",
            "Response Code",
            "Is there any member in the household aged 5 years and above who needs special care",
            "Is there any care giver available among the household members for caring the person(s)",
        ]),
        column_order: strings(ANALYTIC_ORDER),
    }
}

/// Built-in layout by name (case-insensitive).
pub fn layout_preset(name: &str) -> Result<SurveyLayout> {
    match name.trim().to_ascii_lowercase().as_str() {
        "tus2019" => Ok(tus2019()),
        "tus2024" => Ok(tus2024()),
        _ => Err(StandardsError::UnknownPreset {
            name: name.to_string(),
        }),
    }
}

/// Load and validate a layout from a JSON file.
pub fn load_layout(path: &Path) -> Result<SurveyLayout> {
    let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;
    let layout: SurveyLayout =
        serde_json::from_slice(&bytes).map_err(|e| StandardsError::json(path, e))?;
    layout.validate()?;
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CodeMapRegistry;

    #[test]
    fn presets_are_valid() {
        for name in PRESET_NAMES {
            let layout = layout_preset(name).expect("preset");
            layout.validate().expect("valid preset");
            assert_eq!(&layout.name, name);
        }
    }

    #[test]
    fn preset_code_maps_exist_in_registry() {
        let registry = CodeMapRegistry::builtin();
        for name in PRESET_NAMES {
            let layout = layout_preset(name).expect("preset");
            for module in &layout.modules {
                for step in &module.enrichment {
                    assert!(
                        registry.get(&step.code_map).is_some(),
                        "{name}: unknown code map {}",
                        step.code_map
                    );
                }
            }
        }
    }

    #[test]
    fn unknown_preset_is_an_error() {
        assert!(matches!(
            layout_preset("tus2030"),
            Err(StandardsError::UnknownPreset { .. })
        ));
        assert!(layout_preset(" TUS2019 ").is_ok());
    }

    #[test]
    fn tus2019_groups_numbered_parts() {
        let layout = tus2019();
        assert_eq!(layout.module_for_stem("tus106_l05"), Some(ModuleKind::Activity));
        assert_eq!(layout.module_for_stem("tus106_l03"), Some(ModuleKind::Household));
    }

    #[test]
    fn renames_target_the_analytic_order() {
        for name in PRESET_NAMES {
            let layout = layout_preset(name).expect("preset");
            for rename in &layout.renames {
                let known = layout.column_order.contains(&rename.to)
                    || ["day_of_week", "day_type", "response_code", "relation_to_head"]
                        .contains(&rename.to.as_str());
                assert!(known, "{name}: rename target {} is not analytic", rename.to);
            }
        }
    }
}
