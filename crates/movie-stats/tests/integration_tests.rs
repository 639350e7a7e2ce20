//! Integration tests for movie statistics preparation and querying.
//!
//! These tests run the whole pipeline over the CSV fixtures in
//! `tests/fixtures`, a small hand-checked slice shaped like the TMDB tables.

use movie_stats::{
    ChartColor, ChartRequest, MovieStats, PipelineStage, RewriteScope, RowErrorPolicy,
    SecondaryMetric, StatsConfig, StatsPipeline, load_table,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn config_for(movies: &str) -> StatsConfig {
    StatsConfig::builder()
        .movies_path(fixtures_path().join(movies))
        .credits_path(fixtures_path().join("credits.csv"))
        .build()
        .expect("fixture config is valid")
}

fn prepare() -> MovieStats {
    StatsPipeline::new(config_for("movies.csv"))
        .run()
        .expect("fixtures prepare cleanly")
}

fn u32_values(stats: &MovieStats, name: &str) -> Vec<u32> {
    stats
        .cleaned()
        .column(name)
        .unwrap()
        .as_materialized_series()
        .u32()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

fn str_values(stats: &MovieStats, name: &str) -> Vec<String> {
    stats
        .cleaned()
        .column(name)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_no_null_iter()
        .map(str::to_string)
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

// ============================================================================
// Preparation
// ============================================================================

#[test]
fn test_preparation_summary() {
    let stats = prepare();
    let summary = stats.summary();

    assert_eq!(summary.movies_rows, 14);
    assert_eq!(summary.credits_rows, 13);
    assert_eq!(summary.cleaning.rows_joined, 13);
    assert_eq!(summary.cleaning.rows_without_budget, 2);
    assert_eq!(summary.cleaning.rows_without_language, 1);
    assert_eq!(summary.cleaning.rows_skipped(), 0);
    assert_eq!(summary.cleaning.rewritten_cells, 1);
    assert_eq!(summary.cleaning.rows_after, 10);
    assert_eq!(summary.aggregate_rows, 7);
    assert_eq!(summary.aggregation.languages_pruned, vec!["ja".to_string()]);
    assert_eq!(summary.languages_catalogued, 3);
    assert!(summary.languages_without_name.is_empty());
}

#[test]
fn test_cleaned_table_invariants() {
    let stats = prepare();
    let cleaned = stats.cleaned();

    for dropped in ["homepage", "keywords", "overview", "tagline", "movie_id", "title_right"] {
        assert!(cleaned.column(dropped).is_err(), "{} should be dropped", dropped);
    }

    let budgets: Vec<i64> = cleaned
        .column("budget")
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert!(budgets.iter().all(|&b| b > 0));
    assert!(budgets.windows(2).all(|w| w[0] >= w[1]));

    let languages = str_values(&stats, "original_language");
    assert!(!languages.iter().any(|l| l == "xx" || l == "cn"));
    assert_eq!(languages.iter().filter(|l| *l == "zh").count(), 2);

    let cast = u32_values(&stats, "cast_count");
    let crew = u32_values(&stats, "crew_count");
    let credits = u32_values(&stats, "credits_count");
    for i in 0..credits.len() {
        assert_eq!(credits[i], cast[i] + crew[i]);
    }
}

#[test]
fn test_release_years_derived() {
    let stats = prepare();
    let mut years = str_values(&stats, "release_year");
    years.sort();
    years.dedup();
    assert_eq!(
        years,
        vec!["2001", "2003", "2004", "2006", "2007", "2009", "2010"]
    );
}

#[test]
fn test_aggregates_have_at_least_two_years() {
    let stats = prepare();
    for code in ["en", "fr", "zh"] {
        assert!(stats.language_rows(code).len() >= 2, "{}", code);
    }
    assert!(stats.language_rows("ja").is_empty());
    assert!(stats.language_rows("de").is_empty());
}

#[test]
fn test_progress_stages() {
    let stages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&stages);

    StatsPipeline::builder()
        .config(config_for("movies.csv"))
        .on_progress(move |update| sink.lock().unwrap().push(update.stage))
        .build()
        .unwrap()
        .run()
        .unwrap();

    let stages = stages.lock().unwrap();
    assert_eq!(stages.first(), Some(&PipelineStage::Loading));
    assert_eq!(stages.last(), Some(&PipelineStage::Complete));
}

// ============================================================================
// Catalog and Queries
// ============================================================================

#[test]
fn test_catalog_sorted_names() {
    let stats = prepare();
    assert_eq!(
        stats.catalog().sorted_names(),
        vec!["Chinese", "English", "French"]
    );
}

#[test]
fn test_english_credits_chart_data() {
    let data = prepare()
        .get_chart_data("English", SecondaryMetric::Credits)
        .unwrap();

    assert_eq!(data.language_code, "en");
    assert_eq!(data.years, vec![2007, 2009, 2010]);
    assert_eq!(data.primary.label, "Average Budget");
    assert_eq!(data.primary.values, vec![300.0, 218.5, 150.0]);
    assert_eq!(data.secondary.label, "Average # of Credits");
    assert_eq!(data.secondary.values, vec![4.0, 4.5, 3.0]);
}

#[test]
fn test_revenue_reported_in_millions() {
    let data = prepare()
        .get_chart_data("en", SecondaryMetric::Revenue)
        .unwrap();

    assert_eq!(data.secondary.label, "Average Revenue in USD (in Millions)");
    assert_close(data.secondary.values[0], 961.0);
    assert_close(data.secondary.values[1], 1793.9825435);
    assert_close(data.secondary.values[2], 600.0);
}

#[test]
fn test_rewritten_chinese_is_queryable() {
    let stats = prepare();
    let data = stats.get_chart_data("Chinese", SecondaryMetric::Cast).unwrap();
    assert_eq!(data.language_code, "zh");
    assert_eq!(data.years, vec![2004, 2006]);
    assert_eq!(data.secondary.values, vec![1.0, 2.0]);

    let runtime = stats.get_chart_data("fr", SecondaryMetric::Runtime).unwrap();
    assert_eq!(runtime.years, vec![2001, 2003]);
    assert_eq!(runtime.secondary.values, vec![122.0, 105.0]);
}

#[test]
fn test_pruned_language_is_invalid_selection() {
    let err = prepare()
        .get_chart_data("Japanese", SecondaryMetric::Crew)
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_SELECTION");
}

#[test]
fn test_render_default_request() {
    let svg = prepare().render(&ChartRequest::default()).unwrap();
    assert!(svg.starts_with("<svg") || svg.contains("<svg"));
    assert!(svg.contains("Average # of Credits"));
}

#[test]
fn test_render_with_form_values() {
    let request =
        ChartRequest::from_form(Some("French"), Some("revenue"), Some("purple"), Some("cyan"))
            .unwrap();
    assert_eq!(request.primary_color, ChartColor::Purple);

    let svg = prepare().render(&request).unwrap();
    assert!(svg.contains("Average Revenue in USD (in Millions)"));
}

// ============================================================================
// Policies
// ============================================================================

#[test]
fn test_bad_date_aborts_by_default() {
    let err = StatsPipeline::new(config_for("movies_bad_date.csv"))
        .run()
        .unwrap_err();
    assert_eq!(err.error_code(), "FORMAT_ERROR");
    assert!(err.to_string().contains("05/19/2007"));
}

#[test]
fn test_bad_date_skipped_and_counted() {
    let mut config = config_for("movies_bad_date.csv");
    config.row_error_policy = RowErrorPolicy::Skip;

    let stats = StatsPipeline::new(config).run().unwrap();
    assert_eq!(stats.summary().cleaning.rows_with_bad_date, 1);
    assert_eq!(stats.summary().cleaning.rows_after, 2);

    let data = stats.get_chart_data("en", SecondaryMetric::Crew).unwrap();
    assert_eq!(data.years, vec![2009, 2010]);
}

#[test]
fn test_rewrite_all_columns() {
    let mut config = config_for("movies.csv");
    config.rewrite_scope = RewriteScope::AllColumns;

    let stats = StatsPipeline::new(config).run().unwrap();
    for column in stats.cleaned().get_columns() {
        if let Ok(values) = column.as_materialized_series().str() {
            assert!(!values.into_iter().any(|v| v == Some("cn")));
        }
    }
}

#[test]
fn test_from_frames_matches_run() {
    let movies = load_table(fixtures_path().join("movies.csv"), None).unwrap();
    let credits = load_table(fixtures_path().join("credits.csv"), None).unwrap();

    let in_memory = MovieStats::from_frames(&movies, &credits, &StatsConfig::default()).unwrap();
    let from_files = prepare();

    assert_eq!(in_memory.aggregates(), from_files.aggregates());
    assert_eq!(in_memory.catalog(), from_files.catalog());
}

#[test]
fn test_missing_credits_file() {
    let config = StatsConfig::builder()
        .movies_path(fixtures_path().join("movies.csv"))
        .credits_path(fixtures_path().join("missing.csv"))
        .build()
        .unwrap();

    let err = StatsPipeline::new(config).run().unwrap_err();
    assert_eq!(err.error_code(), "IO_ERROR");
    assert!(err.to_string().contains("Loading credits table"));
}
