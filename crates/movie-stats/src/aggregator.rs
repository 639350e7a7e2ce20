//! Per-language, per-year mean statistics.
//!
//! Groups the cleaned table by `(original_language, release_year)` and
//! computes the mean budget, credits, cast, crew, runtime and revenue of each
//! group. Languages that only appear in a handful of years cannot show a trend
//! and are pruned as a whole.

use crate::error::{MovieStatsError, Result, ResultExt};
use crate::types::{AggregateRow, AggregationReport, columns};
use crate::utils::{column_series, float_column, string_column};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Budgets and revenues are reported in millions.
pub const MILLION: f64 = 1_000_000.0;

const AVG_BUDGET: &str = "avg_budget";
const AVG_CREDITS: &str = "avg_credits";
const AVG_CAST: &str = "avg_cast";
const AVG_CREW: &str = "avg_crew";
const AVG_RUNTIME: &str = "avg_runtime";
const AVG_REVENUE: &str = "avg_revenue";
const MOVIE_COUNT: &str = "movie_count";

/// Computes [`AggregateRow`]s from a cleaned movie table.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    min_years_per_language: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Aggregator {
    pub fn new(min_years_per_language: usize) -> Self {
        Self {
            min_years_per_language,
        }
    }

    /// Group, average, prune and scale.
    ///
    /// Rows come back sorted by language, then year.
    pub fn aggregate(&self, cleaned: &DataFrame) -> Result<(Vec<AggregateRow>, AggregationReport)> {
        let grouped = group_means(cleaned)?;
        let mut rows = extract_rows(&grouped)?;

        let mut report = AggregationReport {
            groups: rows.len(),
            ..Default::default()
        };

        report.languages_pruned = self.prune_sparse_languages(&mut rows);
        report.languages_kept = rows
            .iter()
            .map(|row| row.language.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        for row in &mut rows {
            row.avg_budget /= MILLION;
            row.avg_revenue /= MILLION;
        }

        info!(
            "Aggregated {} groups into {} rows across {} languages ({} pruned)",
            report.groups,
            rows.len(),
            report.languages_kept,
            report.languages_pruned.len()
        );

        Ok((rows, report))
    }

    /// Drop every row of languages with fewer distinct years than the minimum.
    ///
    /// Returns the pruned language codes.
    fn prune_sparse_languages(&self, rows: &mut Vec<AggregateRow>) -> Vec<String> {
        let mut years_per_language: BTreeMap<String, BTreeSet<i32>> = BTreeMap::new();
        for row in rows.iter() {
            years_per_language
                .entry(row.language.clone())
                .or_default()
                .insert(row.year);
        }

        let pruned: Vec<String> = years_per_language
            .into_iter()
            .filter(|(_, years)| years.len() < self.min_years_per_language)
            .map(|(language, _)| language)
            .collect();

        if !pruned.is_empty() {
            debug!("Pruning languages with too few years: {:?}", pruned);
            rows.retain(|row| !pruned.contains(&row.language));
        }

        pruned
    }
}

fn mean_of(source: &str, alias: &str) -> Expr {
    col(source).cast(DataType::Float64).mean().alias(alias)
}

/// Mean of each statistic per (language, year) group, sorted by both keys.
fn group_means(cleaned: &DataFrame) -> Result<DataFrame> {
    for name in [
        columns::ORIGINAL_LANGUAGE,
        columns::RELEASE_YEAR,
        columns::BUDGET,
        columns::CREDITS_COUNT,
        columns::CAST_COUNT,
        columns::CREW_COUNT,
        columns::RUNTIME,
        columns::REVENUE,
    ] {
        column_series(cleaned, name)?;
    }

    cleaned
        .clone()
        .lazy()
        .group_by([col(columns::ORIGINAL_LANGUAGE), col(columns::RELEASE_YEAR)])
        .agg([
            col(columns::ORIGINAL_LANGUAGE)
                .count()
                .cast(DataType::UInt64)
                .alias(MOVIE_COUNT),
            mean_of(columns::BUDGET, AVG_BUDGET),
            mean_of(columns::CREDITS_COUNT, AVG_CREDITS),
            mean_of(columns::CAST_COUNT, AVG_CAST),
            mean_of(columns::CREW_COUNT, AVG_CREW),
            mean_of(columns::RUNTIME, AVG_RUNTIME),
            mean_of(columns::REVENUE, AVG_REVENUE),
        ])
        .sort(
            [columns::ORIGINAL_LANGUAGE, columns::RELEASE_YEAR],
            SortMultipleOptions::default(),
        )
        .collect()
        .context("Grouping movies by language and year")
}

/// Convert the grouped frame into typed rows. Missing means become `NaN`.
fn extract_rows(grouped: &DataFrame) -> Result<Vec<AggregateRow>> {
    let languages = string_column(grouped, columns::ORIGINAL_LANGUAGE)?;
    let years = string_column(grouped, columns::RELEASE_YEAR)?;
    let counts = column_series(grouped, MOVIE_COUNT)?.u64()?.clone();
    let budget = float_column(grouped, AVG_BUDGET)?;
    let credits = float_column(grouped, AVG_CREDITS)?;
    let cast = float_column(grouped, AVG_CAST)?;
    let crew = float_column(grouped, AVG_CREW)?;
    let runtime = float_column(grouped, AVG_RUNTIME)?;
    let revenue = float_column(grouped, AVG_REVENUE)?;

    let mean = |ca: &Float64Chunked, i: usize| ca.get(i).unwrap_or(f64::NAN);

    (0..grouped.height())
        .map(|i| {
            let language = languages.get(i).ok_or_else(|| {
                MovieStatsError::Parse(format!("missing language in aggregate row {}", i))
            })?;
            let year = years.get(i).unwrap_or_default();
            let year = year.parse::<i32>().map_err(|e| {
                MovieStatsError::Parse(format!("release year '{}': {}", year, e))
            })?;

            Ok(AggregateRow {
                language: language.to_string(),
                year,
                movie_count: counts.get(i).unwrap_or(0),
                avg_budget: mean(&budget, i),
                avg_credits: mean(&credits, i),
                avg_cast: mean(&cast, i),
                avg_crew: mean(&crew, i),
                avg_runtime: mean(&runtime, i),
                avg_revenue: mean(&revenue, i),
            })
        })
        .collect()
}
