//! Type-safe enumerations for survey modules and diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A survey questionnaire module.
///
/// Each module arrives as one or more file parts and is linked to the others
/// through synthesized household and person identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// Household-level characteristics (size, religion, expenditure).
    Household,
    /// Person-level demographics (gender, age, education).
    Person,
    /// Daily activity diary, one row per activity slot.
    Activity,
}

impl ModuleKind {
    pub const ALL: [ModuleKind; 3] = [
        ModuleKind::Household,
        ModuleKind::Person,
        ModuleKind::Activity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Household => "household",
            ModuleKind::Person => "person",
            ModuleKind::Activity => "activity",
        }
    }

    /// Whether rows of this module are keyed by person rather than household.
    pub fn is_person_level(&self) -> bool {
        matches!(self, ModuleKind::Person | ModuleKind::Activity)
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "household" | "hh" => Ok(ModuleKind::Household),
            "person" | "per" => Ok(ModuleKind::Person),
            "activity" | "diary" => Ok(ModuleKind::Activity),
            _ => Err(format!("Unknown survey module: {s}")),
        }
    }
}

/// Pipeline stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Normalize,
    Identifiers,
    Mapping,
    Concat,
    Join,
    Projection,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Normalize => "normalize",
            Stage::Identifiers => "identifiers",
            Stage::Mapping => "mapping",
            Stage::Concat => "concat",
            Stage::Join => "join",
            Stage::Projection => "projection",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of a degradation recorded during a run.
///
/// None of these abort the run; each one marks data that was narrowed,
/// substituted or dropped so a reviewer can audit completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A requested key or selection column is absent.
    MissingColumn,
    /// The household key was built from a subset of the design key.
    DegradedKey,
    /// A module or part lacks identifying columns and was left out.
    ModuleExcluded,
    /// Parts of one module disagreed on columns or types and were harmonized.
    SchemaDrift,
    /// A part could not be concatenated even after harmonization.
    PartDropped,
    /// Codes not present in a code map were replaced by their fallback.
    UnmappedCodes,
    /// The geographic reference table repeats a composite key.
    DuplicateReferenceKey,
    /// Composite geographic keys with no reference entry.
    UnresolvedDistrict,
    /// Two person rows share the same person identifier.
    DuplicatePersonId,
    /// A join produced suffixed duplicates of a column.
    ColumnCollision,
    /// A mapping step failed internally and the column was left as-is.
    MappingFailed,
    /// Renaming or reordering the merged table failed; it is kept unprojected.
    ProjectionFailed,
}

impl DiagnosticKind {
    /// Severity this kind is reported at.
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::SchemaDrift
            | DiagnosticKind::UnmappedCodes
            | DiagnosticKind::ColumnCollision => Severity::Info,
            DiagnosticKind::MissingColumn
            | DiagnosticKind::DegradedKey
            | DiagnosticKind::ModuleExcluded
            | DiagnosticKind::DuplicateReferenceKey
            | DiagnosticKind::UnresolvedDistrict
            | DiagnosticKind::DuplicatePersonId => Severity::Warning,
            DiagnosticKind::PartDropped
            | DiagnosticKind::MappingFailed
            | DiagnosticKind::ProjectionFailed => Severity::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingColumn => "missing_column",
            DiagnosticKind::DegradedKey => "degraded_key",
            DiagnosticKind::ModuleExcluded => "module_excluded",
            DiagnosticKind::SchemaDrift => "schema_drift",
            DiagnosticKind::PartDropped => "part_dropped",
            DiagnosticKind::UnmappedCodes => "unmapped_codes",
            DiagnosticKind::DuplicateReferenceKey => "duplicate_reference_key",
            DiagnosticKind::UnresolvedDistrict => "unresolved_district",
            DiagnosticKind::DuplicatePersonId => "duplicate_person_id",
            DiagnosticKind::ColumnCollision => "column_collision",
            DiagnosticKind::MappingFailed => "mapping_failed",
            DiagnosticKind::ProjectionFailed => "projection_failed",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
