//! Survey input ingestion: locating module part files and reading them
//! into DataFrames for the harmonization pipeline.

pub mod discovery;
pub mod error;
pub mod reader;

pub use discovery::{Discovery, InputFormat, discover_module_files, list_input_files, split_part};
pub use error::{IngestError, Result};
pub use reader::{
    DEFAULT_INFER_SCHEMA_LENGTH, DEFAULT_NULL_TOKENS, IngestReport, ReadFailure, ReadOptions,
    read_module_inputs, read_table,
};
