//! Pipeline module.
//!
//! This module provides the preparation pipeline and its progress reporting.

mod builder;
pub mod progress;

pub use builder::{StatsPipeline, StatsPipelineBuilder};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
