//! Progress reporting for the preparation pipeline.
//!
//! Preparation runs once, before anything is served, but on the full movie
//! dataset it takes long enough that the CLI and server want to say what is
//! happening.
//!
//! # Example
//!
//! ```rust,ignore
//! use movie_stats::{StatsConfig, StatsPipeline};
//!
//! let stats = StatsPipeline::builder()
//!     .config(StatsConfig::default())
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of preparation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Reading the movies and credits tables
    Loading,
    /// Joining, filtering and deriving columns
    Cleaning,
    /// Per-language, per-year means
    Aggregating,
    /// Resolving language display names
    Cataloguing,
    Complete,
    Failed,
}

impl PipelineStage {
    /// Human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Tables",
            Self::Cleaning => "Cleaning Movies",
            Self::Aggregating => "Aggregating Statistics",
            Self::Cataloguing => "Cataloguing Languages",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the overall run spent in this stage.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.40,
            Self::Cleaning => 0.40,
            Self::Aggregating => 0.15,
            Self::Cataloguing => 0.05,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Overall progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::Cleaning => 0.40,
            Self::Aggregating => 0.80,
            Self::Cataloguing => 0.95,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A single progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: PipelineStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within the current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: PipelineStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + stage.weight() * stage_progress;
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receives progress updates from the pipeline.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_progress_update_new() {
        let update = ProgressUpdate::new(PipelineStage::Cleaning, 0.5, "Joining");
        assert_eq!(update.stage, PipelineStage::Cleaning);
        assert!((update.progress - 0.6).abs() < 1e-6);
        assert!((update.stage_progress - 0.5).abs() < 1e-6);
        assert_eq!(update.message, "Joining");
    }

    #[test]
    fn test_progress_clamped() {
        let update = ProgressUpdate::new(PipelineStage::Cataloguing, 5.0, "overshoot");
        assert!(update.progress <= 1.0);
        assert_eq!(update.stage_progress, 1.0);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f32 = [
            PipelineStage::Loading,
            PipelineStage::Cleaning,
            PipelineStage::Aggregating,
            PipelineStage::Cataloguing,
        ]
        .iter()
        .map(PipelineStage::weight)
        .sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_closure_reporter_receives_updates() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let reporter = ClosureProgressReporter::new(move |update: ProgressUpdate| {
            sink.lock().unwrap().push(update.stage);
        });

        reporter.report(ProgressUpdate::new(PipelineStage::Loading, 0.0, "start"));
        reporter.report(ProgressUpdate::complete("done"));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![PipelineStage::Loading, PipelineStage::Complete]
        );
    }

    #[test]
    fn test_stage_json_values() {
        let json = serde_json::to_string(&PipelineStage::Cataloguing).unwrap();
        assert_eq!(json, "\"cataloguing\"");

        let update = ProgressUpdate::failed("boom");
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["stage"], "failed");
        assert_eq!(value["message"], "boom");
    }
}
