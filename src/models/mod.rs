//! Data models
//!
//! Rust structs representing the intake form and its database entities.

mod assessment;
mod derived;
mod intake;
mod medication;

#[cfg(test)]
pub(crate) mod test_support;

pub use assessment::{Assessment, RemoteStatus};
pub use derived::DerivedMetrics;
pub use intake::AssessmentCreate;
pub use medication::{AssessmentMedication, MedicationEntry};
