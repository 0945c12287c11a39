//! CLI command implementations.

pub mod history;
pub mod serve;
pub mod stats;
pub mod track;
