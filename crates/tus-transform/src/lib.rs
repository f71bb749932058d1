//! Time-use survey harmonization and linkage.
//!
//! This crate turns the raw module tables of a survey round into one
//! person-by-activity table:
//!
//! - **normalize**: column subsetting, alias resolution, selection and renames
//! - **identifiers**: household and person id synthesis
//! - **mapping**: code-map and district lookups, enrichment plans
//! - **harmonize**: part concatenation and cross-module joins
//! - **projection**: final column order
//! - **pipeline**: the staged run over all modules

pub mod data_utils;
pub mod error;
pub mod frame;
pub mod harmonize;
pub mod identifiers;
pub mod mapping;
pub mod normalize;
pub mod pipeline;
pub mod projection;

pub use error::{Result, TransformError};
pub use frame::{ModuleFrame, ModuleFrameMeta, ModuleInput, SourcePart};
pub use harmonize::{ConcatOutcome, concat_parts, harmonize_schemas, left_join};
pub use identifiers::{KeyCoverage, compute_household_id, compute_person_id, find_duplicate_ids};
pub use mapping::{
    DistrictOutcome, apply_enrichment_plan, derive_state_code, map_column, map_district,
};
pub use normalize::{
    apply_subset, drop_columns, normalize_part, rename_columns, resolve_aliases, select_available,
};
pub use pipeline::{
    DistrictAudit, HarmonizationPipeline, ModuleSummary, PipelineOutput,
};
pub use projection::{project_columns, projection_order};
