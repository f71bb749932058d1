pub mod code_map;
pub mod diagnostics;
pub mod district;
pub mod enums;
pub mod error;
pub mod layout;
pub mod options;

pub use code_map::{CodeMap, DEFAULT_NULL_FALLBACK};
pub use diagnostics::{Diagnostic, DiagnosticSummary, Diagnostics};
pub use district::{
    DistrictKey, DistrictName, DistrictTable, DuplicateDistrictKey, UNKNOWN_DISTRICT,
    UNKNOWN_STATE,
};
pub use enums::{DiagnosticKind, ModuleKind, Severity, Stage};
pub use error::{ModelError, Result};
pub use layout::{
    AliasGroup, ColumnRename, EnrichmentStep, GeoColumns, HeadSubset, ModuleLayout, StateSource,
    SurveyLayout,
};
pub use options::PipelineOptions;
