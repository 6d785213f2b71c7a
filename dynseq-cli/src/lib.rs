//! Library entry for dynseq-cli used by integration tests and embedding.

pub mod commands;

// Re-export commonly used items
pub use crate::commands::growth::{GrowthReport, Transition};
pub use crate::commands::replay::{Operation, ReplayReport, StepOutcome};
