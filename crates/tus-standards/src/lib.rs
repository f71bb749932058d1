#![deny(unsafe_code)]

//! Reference data for time-use survey harmonization: codebook tables,
//! the geographic reference, and per-round layouts.

pub mod codes;
pub mod district;
pub mod error;
pub mod layouts;
pub mod registry;

pub use crate::codes::builtin_code_maps;
pub use crate::district::{load_district_table, read_district_table};
pub use crate::error::{Result, StandardsError};
pub use crate::layouts::{PRESET_NAMES, layout_preset, load_layout, tus2019, tus2024};
pub use crate::registry::{CodeMapOverride, CodeMapRegistry};
