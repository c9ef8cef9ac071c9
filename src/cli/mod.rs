//! CLI command implementations

pub mod check;
pub mod help;
pub mod run;
