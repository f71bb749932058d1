//! Library components of the survey harmonizer CLI.

pub mod logging;
pub mod pipeline;
