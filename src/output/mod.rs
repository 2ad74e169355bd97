//! Terminal output formatting for the scan command

pub mod json;
pub mod table;
