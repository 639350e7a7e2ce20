//! Preparation pipeline: load, clean, aggregate, catalogue.
//!
//! This module provides the `StatsPipeline` struct and its builder. A run
//! produces an immutable [`MovieStats`] that answers chart queries.

use crate::aggregator::Aggregator;
use crate::catalog::LanguageCatalog;
use crate::cleaner::{CleanedTable, MovieCleaner};
use crate::config::StatsConfig;
use crate::error::{MovieStatsError, Result, ResultExt};
use crate::loader::load_table;
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::stats::MovieStats;
use crate::types::PreparationSummary;
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Runs every preparation stage once and hands back a [`MovieStats`].
///
/// # Example
///
/// ```rust,ignore
/// use movie_stats::{StatsConfig, StatsPipeline};
///
/// let config = StatsConfig::builder()
///     .movies_path("tmdb_5000_movies.csv")
///     .credits_path("tmdb_5000_credits.csv")
///     .build()?;
///
/// let stats = StatsPipeline::new(config).run()?;
/// println!("{} languages", stats.catalog().len());
/// ```
pub struct StatsPipeline {
    config: StatsConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(StatsPipeline: Send, Sync);

impl StatsPipeline {
    pub fn new(config: StatsConfig) -> Self {
        Self {
            config,
            progress_reporter: None,
        }
    }

    pub fn builder() -> StatsPipelineBuilder {
        StatsPipelineBuilder::default()
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    /// Load both tables from the configured paths and prepare them.
    ///
    /// # Errors
    ///
    /// Any error is fatal for the run: invalid configuration, unreadable or
    /// malformed tables, row errors under [`RowErrorPolicy::Abort`] and
    /// unknown language codes under [`UnknownLanguagePolicy::Abort`].
    ///
    /// [`RowErrorPolicy::Abort`]: crate::config::RowErrorPolicy::Abort
    /// [`UnknownLanguagePolicy::Abort`]: crate::config::UnknownLanguagePolicy::Abort
    pub fn run(&self) -> Result<MovieStats> {
        self.finish(self.run_internal())
    }

    /// Prepare tables that are already in memory.
    pub fn prepare(&self, movies: &DataFrame, credits: &DataFrame) -> Result<MovieStats> {
        let result = self
            .validate()
            .and_then(|()| self.prepare_internal(Instant::now(), movies, credits));
        self.finish(result)
    }

    fn validate(&self) -> Result<()> {
        self.config.validate().map_err(MovieStatsError::from)
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn finish(&self, result: Result<MovieStats>) -> Result<MovieStats> {
        match result {
            Ok(stats) => {
                self.report_progress(ProgressUpdate::complete("Movie statistics ready"));
                Ok(stats)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Preparation failed: {}", e);
                Err(e)
            }
        }
    }

    fn run_internal(&self) -> Result<MovieStats> {
        self.validate()?;
        let start_time = Instant::now();

        info!("Step 1: Loading tables...");
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            0.0,
            "Loading movies table...",
        ));
        let movies = load_table(&self.config.movies_path, self.config.infer_schema_length)
            .context("Loading movies table")?;

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            0.5,
            "Loading credits table...",
        ));
        let credits = load_table(&self.config.credits_path, self.config.infer_schema_length)
            .context("Loading credits table")?;

        self.prepare_internal(start_time, &movies, &credits)
    }

    fn prepare_internal(
        &self,
        start_time: Instant,
        movies: &DataFrame,
        credits: &DataFrame,
    ) -> Result<MovieStats> {
        let mut summary = PreparationSummary {
            movies_rows: movies.height(),
            credits_rows: credits.height(),
            ..Default::default()
        };

        info!("Step 2: Cleaning movies...");
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Cleaning,
            0.0,
            "Joining and cleaning movies...",
        ));
        let CleanedTable { frame, report } =
            MovieCleaner::from_config(&self.config).clean(movies, credits)?;
        summary.cleaning = report;

        info!("Step 3: Aggregating statistics...");
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Aggregating,
            0.0,
            "Averaging per language and year...",
        ));
        let (aggregates, aggregation) =
            Aggregator::new(self.config.min_years_per_language).aggregate(&frame)?;
        summary.aggregation = aggregation;
        summary.aggregate_rows = aggregates.len();

        info!("Step 4: Cataloguing languages...");
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Cataloguing,
            0.0,
            "Resolving language names...",
        ));
        let (catalog, unresolved) = LanguageCatalog::build(
            aggregates.iter().map(|row| row.language.as_str()),
            self.config.unknown_language_policy,
        )?;
        summary.languages_catalogued = catalog.len();
        summary.languages_without_name = unresolved;

        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        debug!("Preparation summary: {:?}", summary);
        info!(
            "Prepared {} movies into {} aggregate rows for {} languages in {} ms",
            summary.cleaning.rows_after,
            summary.aggregate_rows,
            summary.languages_catalogued,
            summary.duration_ms
        );

        Ok(MovieStats::new(
            frame,
            aggregates,
            catalog,
            summary,
            self.config.max_chart_points,
        ))
    }
}

/// Builder for creating a [`StatsPipeline`].
#[derive(Default)]
pub struct StatsPipelineBuilder {
    config: Option<StatsConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl StatsPipelineBuilder {
    pub fn config(mut self, config: StatsConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Report progress through a closure.
    pub fn on_progress<F>(self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter(Arc::new(ClosureProgressReporter::new(callback)))
    }

    /// Build the pipeline, validating its configuration.
    pub fn build(self) -> Result<StatsPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(StatsPipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
