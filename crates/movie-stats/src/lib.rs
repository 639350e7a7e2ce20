//! Movie Statistics Library
//!
//! Budget and production trends per original language, built with Rust and
//! Polars from the TMDB movies and credits tables.
//!
//! # Overview
//!
//! - **Loading**: CSV tables read into Polars `DataFrame`s
//! - **Cleaning**: join on movie id, drop unbudgeted and language-less movies,
//!   derive release year and credit counts, normalize `cn` to `zh`
//! - **Aggregation**: per-language, per-year means of budget, credits, cast,
//!   crew, runtime and revenue
//! - **Catalog**: ISO 639-1 display names for every language kept
//! - **Charts**: dual-axis SVG line charts of budget against a second metric
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use movie_stats::{ChartRequest, SecondaryMetric, StatsConfig, StatsPipeline};
//!
//! let config = StatsConfig::builder()
//!     .movies_path("tmdb_5000_movies.csv")
//!     .credits_path("tmdb_5000_credits.csv")
//!     .build()?;
//!
//! let stats = StatsPipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//!
//! let data = stats.get_chart_data("French", SecondaryMetric::Runtime)?;
//! let svg = stats.render(&ChartRequest::default())?;
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use movie_stats::config::*;
//!
//! let config = StatsConfig::builder()
//!     .row_error_policy(RowErrorPolicy::Skip)          // Skip malformed rows
//!     .unknown_language_policy(UnknownLanguagePolicy::Skip)
//!     .rewrite_scope(RewriteScope::AllColumns)         // Rewrite `cn` everywhere
//!     .min_years_per_language(2)
//!     .max_chart_points(20)
//!     .build()?;
//! ```

pub mod aggregator;
pub mod catalog;
pub mod chart;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod query;
pub mod sampler;
pub mod stats;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use aggregator::Aggregator;
pub use catalog::{LanguageCatalog, LanguageEntry};
pub use chart::render_chart;
pub use cleaner::{CleanedTable, MovieCleaner};
pub use config::{
    ConfigValidationError, RewriteScope, RowErrorPolicy, StatsConfig, StatsConfigBuilder,
    UnknownLanguagePolicy,
};
pub use error::{MovieStatsError, Result as MovieStatsResult, ResultExt};
pub use loader::load_table;
pub use pipeline::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate, StatsPipeline,
    StatsPipelineBuilder,
};
pub use query::{ChartColor, ChartData, ChartRequest, DataSeries, SecondaryMetric};
pub use sampler::sample_years;
pub use stats::MovieStats;
pub use types::{AggregateRow, AggregationReport, CleaningReport, PreparationSummary};
