//! Sarcopenia Intake Manager Library
//!
//! Derived-metric engine, local storage and remote sync for sarcopenia
//! risk assessment intake forms.

pub mod build_info;
pub mod calc;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod remote;
pub mod tools;
