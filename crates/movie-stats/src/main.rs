//! CLI entry point for movie statistics.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use movie_stats::{
    ChartColor, ChartData, MovieStats, PreparationSummary, RewriteScope, RowErrorPolicy,
    SecondaryMetric, StatsConfig, StatsPipeline, UnknownLanguagePolicy, render_chart,
};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use tracing::info;

/// CLI-compatible secondary metric enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMetric {
    /// Average number of cast members
    Cast,
    /// Average number of cast and crew members
    Credits,
    /// Average number of crew members
    Crew,
    /// Average revenue in millions of USD
    Revenue,
    /// Average runtime in minutes
    Runtime,
}

impl From<CliMetric> for SecondaryMetric {
    fn from(cli: CliMetric) -> Self {
        match cli {
            CliMetric::Cast => SecondaryMetric::Cast,
            CliMetric::Credits => SecondaryMetric::Credits,
            CliMetric::Crew => SecondaryMetric::Crew,
            CliMetric::Revenue => SecondaryMetric::Revenue,
            CliMetric::Runtime => SecondaryMetric::Runtime,
        }
    }
}

fn parse_color(value: &str) -> std::result::Result<ChartColor, String> {
    value.parse::<ChartColor>().map_err(|e| e.to_string())
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Movie budget trends per original language",
    long_about = "Prepares the TMDB movies and credits tables, prints per-language statistics \
                  and optionally renders a budget chart.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  MOVIES_CSV     Movies table used when --movies is not given\n  \
                  CREDITS_CSV    Credits table used when --credits is not given\n\n\
                  EXAMPLES:\n  \
                  # Summary for English movies\n  \
                  movie-stats --movies tmdb_5000_movies.csv --credits tmdb_5000_credits.csv\n\n  \
                  # French runtime chart\n  \
                  movie-stats --language French --metric runtime --chart french.svg\n\n  \
                  # Machine-readable output\n  \
                  movie-stats --language ja --json | jq .chart.years"
)]
struct Args {
    /// Path to the movies CSV file
    #[arg(long)]
    movies: Option<PathBuf>,

    /// Path to the credits CSV file
    #[arg(long)]
    credits: Option<PathBuf>,

    /// Language code or display name to report on
    #[arg(long, default_value = "en")]
    language: String,

    /// Statistic plotted against average budget
    #[arg(long, value_enum, default_value = "credits")]
    metric: CliMetric,

    /// Color of the budget line
    #[arg(long, value_parser = parse_color, default_value = "blue")]
    color1: ChartColor,

    /// Color of the secondary line
    #[arg(long, value_parser = parse_color, default_value = "red")]
    color2: ChartColor,

    /// Write the chart as SVG to this file
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON document.
    #[arg(long)]
    json: bool,

    /// Skip rows with a malformed release date or credit list instead of aborting
    #[arg(long)]
    skip_bad_rows: bool,

    /// Leave out languages without a registry name instead of aborting
    #[arg(long)]
    skip_unknown_languages: bool,

    /// Rewrite `cn` to `zh` in every text column, not only the language column
    #[arg(long)]
    rewrite_all_columns: bool,

    /// Minimum number of distinct years a language needs to be kept
    #[arg(long, default_value = "2")]
    min_years: usize,

    /// Maximum number of years plotted per chart
    #[arg(long, default_value = "20")]
    max_points: usize,

    /// Rows used to infer the CSV schema (whole file when omitted)
    #[arg(long)]
    infer_schema_length: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// JSON document written by `--json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: &'a PreparationSummary,
    chart: &'a ChartData,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Resolve a table path: flag, then environment variable, then default.
fn table_path(flag: Option<PathBuf>, var: &str, default: PathBuf) -> PathBuf {
    flag.or_else(|| env::var(var).ok().map(PathBuf::from))
        .unwrap_or(default)
}

fn build_config(args: &Args) -> Result<StatsConfig> {
    let defaults = StatsConfig::default();

    let mut builder = StatsConfig::builder()
        .movies_path(table_path(
            args.movies.clone(),
            "MOVIES_CSV",
            defaults.movies_path,
        ))
        .credits_path(table_path(
            args.credits.clone(),
            "CREDITS_CSV",
            defaults.credits_path,
        ))
        .min_years_per_language(args.min_years)
        .max_chart_points(args.max_points);

    if args.skip_bad_rows {
        builder = builder.row_error_policy(RowErrorPolicy::Skip);
    }
    if args.skip_unknown_languages {
        builder = builder.unknown_language_policy(UnknownLanguagePolicy::Skip);
    }
    if args.rewrite_all_columns {
        builder = builder.rewrite_scope(RewriteScope::AllColumns);
    }
    if let Some(rows) = args.infer_schema_length {
        builder = builder.infer_schema_length(rows);
    }

    Ok(builder.build()?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file
    dotenv().ok();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;

    let mut builder = StatsPipeline::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    let stats = builder
        .build()?
        .run()
        .map_err(|e| anyhow!("Preparation failed: {}", e))?;

    let data = stats
        .get_chart_data(&args.language, args.metric.into())
        .map_err(|e| anyhow!("{}", e))?;

    if let Some(ref path) = args.chart {
        let svg = render_chart(&data, args.color1, args.color2)?;
        std::fs::write(path, svg)
            .with_context(|| format!("Failed to write chart to {}", path.display()))?;
        info!("Chart written to: {}", path.display());
    }

    if args.json {
        let output = JsonOutput {
            summary: stats.summary(),
            chart: &data,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_human_readable_summary(&stats, &data);
    Ok(())
}

/// Print a human-readable summary of the preparation and the selected series.
fn print_human_readable_summary(stats: &MovieStats, data: &ChartData) {
    let summary = stats.summary();
    let cleaning = &summary.cleaning;

    println!();
    println!("{}", "=".repeat(80));
    println!("MOVIE STATISTICS");
    println!("{}", "=".repeat(80));
    println!();

    println!("Preparation Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Input: {} movies, {} credits",
        summary.movies_rows, summary.credits_rows
    );
    println!(
        "  Joined: {} -> {} after cleaning",
        cleaning.rows_joined, cleaning.rows_after
    );
    println!(
        "  Removed: {} without budget, {} without language, {} malformed",
        cleaning.rows_without_budget,
        cleaning.rows_without_language,
        cleaning.rows_with_bad_date + cleaning.rows_with_bad_credits
    );
    println!(
        "  Aggregates: {} rows for {} languages ({} pruned)",
        summary.aggregate_rows,
        summary.aggregation.languages_kept,
        summary.aggregation.languages_pruned.len()
    );
    if !summary.languages_without_name.is_empty() {
        println!(
            "  ! No display name for: {}",
            summary.languages_without_name.join(", ")
        );
    }
    println!();

    println!(
        "{} ({}) - {} vs. {}",
        data.language_name, data.language_code, data.primary.label, data.secondary.label
    );
    println!("{}", "-".repeat(40));
    println!("{:<8} {:>16} {:>16}", "Year", "Budget (M USD)", data.metric.key());
    for ((year, budget), value) in data
        .years
        .iter()
        .zip(&data.primary.values)
        .zip(&data.secondary.values)
    {
        println!("{:<8} {:>16.2} {:>16.2}", year, budget, value);
    }
    println!();

    println!("Use --json for machine-readable output");
    println!("Use --chart <file.svg> to render the chart");
    println!("{}", "=".repeat(80));
}
