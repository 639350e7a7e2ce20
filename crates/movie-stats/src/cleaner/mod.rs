//! Joining and cleaning of the movies and credits tables.
//!
//! This module provides functionality for:
//! - Inner-joining movies with their credits
//! - Dropping columns that nothing downstream reads
//! - Removing rows without a budget or without a language
//! - Deriving release year and credit counts per row
//! - Normalizing the non-standard Chinese language code

mod derive;
mod rewrite;

pub use rewrite::{NONSTANDARD_CHINESE, STANDARD_CHINESE};

use crate::config::{RewriteScope, RowErrorPolicy, StatsConfig};
use crate::error::{MovieStatsError, Result, ResultExt};
use crate::types::{CleaningReport, columns};
use crate::utils::{column_series, require_columns, string_column};
use derive::derive_row;
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Language code the source data uses for "no language".
pub const NO_LANGUAGE: &str = "xx";

/// Cleaned movie table together with what the cleaning did.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub frame: DataFrame,
    pub report: CleaningReport,
}

/// Joins and cleans the two source tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovieCleaner {
    row_error_policy: RowErrorPolicy,
    rewrite_scope: RewriteScope,
}

impl MovieCleaner {
    pub fn new(row_error_policy: RowErrorPolicy, rewrite_scope: RewriteScope) -> Self {
        Self {
            row_error_policy,
            rewrite_scope,
        }
    }

    pub fn from_config(config: &StatsConfig) -> Self {
        Self::new(config.row_error_policy, config.rewrite_scope)
    }

    /// Join `movies` with `credits` and clean the result.
    ///
    /// Steps:
    /// 1. Inner join on `movies.id = credits.movie_id`
    /// 2. Drop unused columns
    /// 3. Keep rows with `budget > 0`
    /// 4. Drop rows with the "no language" code
    /// 5. Derive `release_year`, `crew_count`, `cast_count`, `credits_count`
    /// 6. Rewrite `cn` to `zh`
    /// 7. Sort by budget, largest first
    pub fn clean(&self, movies: &DataFrame, credits: &DataFrame) -> Result<CleanedTable> {
        let mut report = CleaningReport::default();

        info!("Joining movies with credits...");
        let df = join_tables(movies, credits)?;
        report.rows_joined = df.height();
        debug!(
            "Inner join kept {} of {} movies",
            report.rows_joined,
            movies.height()
        );

        let df = drop_unused_columns(df);

        let before = df.height();
        let df = keep_positive_budget(df)?;
        report.rows_without_budget = before - df.height();
        debug!("Removed {} rows without a budget", report.rows_without_budget);

        let before = df.height();
        let df = drop_no_language(df)?;
        report.rows_without_language = before - df.height();
        debug!(
            "Removed {} rows without a language",
            report.rows_without_language
        );

        let df = self.add_derived_columns(df, &mut report)?;

        let (df, rewritten) = rewrite::rewrite_code(
            df,
            self.rewrite_scope,
            NONSTANDARD_CHINESE,
            STANDARD_CHINESE,
        )?;
        report.rewritten_cells = rewritten;

        let df = df
            .sort(
                [columns::BUDGET],
                SortMultipleOptions::default().with_order_descending(true),
            )
            .context("Sorting cleaned movies by budget")?;

        report.rows_after = df.height();
        info!(
            "Cleaning complete: {} rows ({} skipped as malformed)",
            report.rows_after,
            report.rows_skipped()
        );

        Ok(CleanedTable { frame: df, report })
    }

    /// Add `release_year`, `crew_count`, `cast_count` and `credits_count`.
    ///
    /// Rows that fail derivation abort the run or are dropped, depending on
    /// the row error policy.
    fn add_derived_columns(
        &self,
        df: DataFrame,
        report: &mut CleaningReport,
    ) -> Result<DataFrame> {
        let mut df = df;
        let ids = string_column(&df, columns::ID)?;
        let dates = string_column(&df, columns::RELEASE_DATE)?;
        let crews = string_column(&df, columns::CREW)?;
        let casts = string_column(&df, columns::CAST)?;

        let height = df.height();
        let mut release_years: Vec<String> = Vec::with_capacity(height);
        let mut crew_counts: Vec<u32> = Vec::with_capacity(height);
        let mut cast_counts: Vec<u32> = Vec::with_capacity(height);
        let mut credits_counts: Vec<u32> = Vec::with_capacity(height);
        let mut keep: Vec<bool> = Vec::with_capacity(height);

        let rows = ids
            .into_iter()
            .zip(dates.into_iter())
            .zip(crews.into_iter())
            .zip(casts.into_iter());

        for (((id, date), crew), cast) in rows {
            let movie_id = id.unwrap_or("<unknown>");
            match derive_row(movie_id, date, crew, cast) {
                Ok(derived) => {
                    credits_counts.push(derived.credits_count());
                    crew_counts.push(derived.crew_count);
                    cast_counts.push(derived.cast_count);
                    release_years.push(derived.release_year);
                    keep.push(true);
                }
                Err(err) => {
                    if self.row_error_policy == RowErrorPolicy::Abort || !err.is_row_error() {
                        return Err(err);
                    }
                    warn!("Skipping movie {}: {}", movie_id, err);
                    match err {
                        MovieStatsError::Format { .. } => report.rows_with_bad_date += 1,
                        _ => report.rows_with_bad_credits += 1,
                    }
                    release_years.push(String::new());
                    crew_counts.push(0);
                    cast_counts.push(0);
                    credits_counts.push(0);
                    keep.push(false);
                }
            }
        }

        df.with_column(Series::new(columns::RELEASE_YEAR.into(), release_years))?;
        df.with_column(Series::new(columns::CREW_COUNT.into(), crew_counts))?;
        df.with_column(Series::new(columns::CAST_COUNT.into(), cast_counts))?;
        df.with_column(Series::new(columns::CREDITS_COUNT.into(), credits_counts))?;

        if report.rows_skipped() > 0 {
            let mask: BooleanChunked = keep.into_iter().collect();
            df = df.filter(&mask)?;
        }

        Ok(df)
    }
}

/// Inner-join the two tables on the movie identifier.
fn join_tables(movies: &DataFrame, credits: &DataFrame) -> Result<DataFrame> {
    require_columns(movies, &[columns::ID])?;
    require_columns(credits, &[columns::MOVIE_ID])?;

    movies
        .clone()
        .lazy()
        .with_column(col(columns::ID).cast(DataType::Int64))
        .join(
            credits
                .clone()
                .lazy()
                .with_column(col(columns::MOVIE_ID).cast(DataType::Int64)),
            [col(columns::ID)],
            [col(columns::MOVIE_ID)],
            JoinArgs::new(JoinType::Inner),
        )
        .collect()
        .context("Joining movies with credits")
}

/// Drop the columns listed in [`columns::DROPPED`] that are present.
fn drop_unused_columns(df: DataFrame) -> DataFrame {
    let present: Vec<PlSmallStr> = columns::DROPPED
        .iter()
        .filter(|name| df.column(name).is_ok())
        .map(|name| (*name).into())
        .collect();

    if present.is_empty() {
        return df;
    }

    debug!("Dropping unused columns: {:?}", present);
    df.drop_many(present)
}

/// Keep rows whose budget is present and greater than zero.
fn keep_positive_budget(df: DataFrame) -> Result<DataFrame> {
    let budget = column_series(&df, columns::BUDGET)?.cast(&DataType::Float64)?;
    let mask = budget.gt(0.0)?;
    Ok(df.filter(&mask)?)
}

/// Drop rows whose language is missing or the "no language" code.
fn drop_no_language(df: DataFrame) -> Result<DataFrame> {
    let languages = string_column(&df, columns::ORIGINAL_LANGUAGE)?;
    let mask: BooleanChunked = languages
        .into_iter()
        .map(|code| matches!(code, Some(code) if !code.is_empty() && code != NO_LANGUAGE))
        .collect();
    Ok(df.filter(&mask)?)
}
