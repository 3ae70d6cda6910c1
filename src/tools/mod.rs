//! Tools module
//!
//! MCP tool implementations for the Sarcopenia Intake Manager.

pub mod assessments;
pub mod calculators;
pub mod statistics;
pub mod status;
