//! Configuration types for preparing movie statistics.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic setup of the preparation pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do with a row whose release date or credit lists are malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RowErrorPolicy {
    /// Fail the whole preparation with the row's error
    #[default]
    Abort,
    /// Drop the row, log a warning and count it in the report
    Skip,
}

/// What to do with a language code that has no registry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UnknownLanguagePolicy {
    /// Fail catalog construction
    #[default]
    Abort,
    /// Leave the code out of the catalog
    Skip,
}

/// Which columns the `cn` -> `zh` rewrite applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RewriteScope {
    /// Only the `original_language` column
    #[default]
    LanguageColumn,
    /// Every string cell exactly equal to the code, in every column
    AllColumns,
}

/// Configuration for the preparation pipeline.
///
/// Use [`StatsConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use movie_stats::config::{StatsConfig, RowErrorPolicy};
///
/// let config = StatsConfig::builder()
///     .movies_path("data/tmdb_5000_movies.csv")
///     .credits_path("data/tmdb_5000_credits.csv")
///     .row_error_policy(RowErrorPolicy::Skip)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Path of the movies table (CSV with header).
    /// Default: "tmdb_5000_movies.csv"
    pub movies_path: PathBuf,

    /// Path of the credits table (CSV with header).
    /// Default: "tmdb_5000_credits.csv"
    pub credits_path: PathBuf,

    /// Number of rows used to infer the CSV schema. `None` scans the whole file.
    /// Default: None
    pub infer_schema_length: Option<usize>,

    /// Handling of rows with a malformed release date or credit list.
    /// Default: Abort
    pub row_error_policy: RowErrorPolicy,

    /// Handling of language codes missing from the registry.
    /// Default: Abort
    pub unknown_language_policy: UnknownLanguagePolicy,

    /// Columns affected by the `cn` -> `zh` rewrite.
    /// Default: LanguageColumn
    pub rewrite_scope: RewriteScope,

    /// Minimum number of distinct years a language needs to be kept.
    /// Default: 2
    pub min_years_per_language: usize,

    /// Maximum number of years plotted per chart.
    /// Default: 20
    pub max_chart_points: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            movies_path: PathBuf::from("tmdb_5000_movies.csv"),
            credits_path: PathBuf::from("tmdb_5000_credits.csv"),
            infer_schema_length: None,
            row_error_policy: RowErrorPolicy::default(),
            unknown_language_policy: UnknownLanguagePolicy::default(),
            rewrite_scope: RewriteScope::default(),
            min_years_per_language: 2,
            max_chart_points: 20,
        }
    }
}

impl StatsConfig {
    /// Create a new configuration builder.
    pub fn builder() -> StatsConfigBuilder {
        StatsConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.min_years_per_language == 0 {
            return Err(ConfigValidationError::InvalidMinYears(
                self.min_years_per_language,
            ));
        }

        if self.max_chart_points < 2 {
            return Err(ConfigValidationError::InvalidMaxChartPoints(
                self.max_chart_points,
            ));
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidSchemaLength);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid minimum years per language: {0} (must be at least 1)")]
    InvalidMinYears(usize),

    #[error("Invalid maximum chart points: {0} (must be at least 2)")]
    InvalidMaxChartPoints(usize),

    #[error("Invalid schema inference length: 0 (use None to scan the whole file)")]
    InvalidSchemaLength,
}

impl From<ConfigValidationError> for crate::error::MovieStatsError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::MovieStatsError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`StatsConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct StatsConfigBuilder {
    movies_path: Option<PathBuf>,
    credits_path: Option<PathBuf>,
    infer_schema_length: Option<usize>,
    row_error_policy: Option<RowErrorPolicy>,
    unknown_language_policy: Option<UnknownLanguagePolicy>,
    rewrite_scope: Option<RewriteScope>,
    min_years_per_language: Option<usize>,
    max_chart_points: Option<usize>,
}

impl StatsConfigBuilder {
    /// Set the path of the movies table.
    pub fn movies_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.movies_path = Some(path.into());
        self
    }

    /// Set the path of the credits table.
    pub fn credits_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credits_path = Some(path.into());
        self
    }

    /// Limit CSV schema inference to the first `rows` rows.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set the handling of malformed rows.
    pub fn row_error_policy(mut self, policy: RowErrorPolicy) -> Self {
        self.row_error_policy = Some(policy);
        self
    }

    /// Set the handling of unknown language codes.
    pub fn unknown_language_policy(mut self, policy: UnknownLanguagePolicy) -> Self {
        self.unknown_language_policy = Some(policy);
        self
    }

    /// Set the scope of the `cn` -> `zh` rewrite.
    pub fn rewrite_scope(mut self, scope: RewriteScope) -> Self {
        self.rewrite_scope = Some(scope);
        self
    }

    /// Set the minimum number of distinct years a language needs.
    pub fn min_years_per_language(mut self, years: usize) -> Self {
        self.min_years_per_language = Some(years);
        self
    }

    /// Set the maximum number of years plotted per chart.
    pub fn max_chart_points(mut self, points: usize) -> Self {
        self.max_chart_points = Some(points);
        self
    }

    /// Build the configuration, validating all settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigValidationError`] if any values are out of range.
    pub fn build(self) -> Result<StatsConfig, ConfigValidationError> {
        let defaults = StatsConfig::default();
        let config = StatsConfig {
            movies_path: self.movies_path.unwrap_or(defaults.movies_path),
            credits_path: self.credits_path.unwrap_or(defaults.credits_path),
            infer_schema_length: self.infer_schema_length.or(defaults.infer_schema_length),
            row_error_policy: self.row_error_policy.unwrap_or(defaults.row_error_policy),
            unknown_language_policy: self
                .unknown_language_policy
                .unwrap_or(defaults.unknown_language_policy),
            rewrite_scope: self.rewrite_scope.unwrap_or(defaults.rewrite_scope),
            min_years_per_language: self
                .min_years_per_language
                .unwrap_or(defaults.min_years_per_language),
            max_chart_points: self.max_chart_points.unwrap_or(defaults.max_chart_points),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StatsConfig::default();
        assert_eq!(config.min_years_per_language, 2);
        assert_eq!(config.max_chart_points, 20);
        assert_eq!(config.row_error_policy, RowErrorPolicy::Abort);
        assert_eq!(config.unknown_language_policy, UnknownLanguagePolicy::Abort);
        assert_eq!(config.rewrite_scope, RewriteScope::LanguageColumn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = StatsConfig::builder()
            .movies_path("m.csv")
            .credits_path("c.csv")
            .row_error_policy(RowErrorPolicy::Skip)
            .rewrite_scope(RewriteScope::AllColumns)
            .max_chart_points(10)
            .build()
            .unwrap();

        assert_eq!(config.movies_path, PathBuf::from("m.csv"));
        assert_eq!(config.credits_path, PathBuf::from("c.csv"));
        assert_eq!(config.row_error_policy, RowErrorPolicy::Skip);
        assert_eq!(config.rewrite_scope, RewriteScope::AllColumns);
        assert_eq!(config.max_chart_points, 10);
        assert_eq!(config.min_years_per_language, 2);
    }

    #[test]
    fn test_invalid_min_years() {
        let result = StatsConfig::builder().min_years_per_language(0).build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::InvalidMinYears(0))
        ));
    }

    #[test]
    fn test_invalid_chart_points() {
        let result = StatsConfig::builder().max_chart_points(1).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_schema_length() {
        let result = StatsConfig::builder().infer_schema_length(0).build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::InvalidSchemaLength)
        ));
    }
}
