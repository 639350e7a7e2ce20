//! HTTP entry point for movie statistics.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use movie_stats::{
    RewriteScope, RowErrorPolicy, StatsConfig, StatsPipeline, UnknownLanguagePolicy,
};
use movie_stats_server::{ServerState, run_server};
use std::env;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "Web form serving per-language movie budget charts")]
struct CliArgs {
    /// Path to the movies CSV file (falls back to MOVIES_CSV)
    #[arg(long)]
    movies: Option<PathBuf>,

    /// Path to the credits CSV file (falls back to CREDITS_CSV)
    #[arg(long)]
    credits: Option<PathBuf>,

    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// The port to listen on.
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Skip rows with a malformed release date or credit list instead of aborting
    #[arg(long)]
    skip_bad_rows: bool,

    /// Leave out languages without a registry name instead of aborting
    #[arg(long)]
    skip_unknown_languages: bool,

    /// Rewrite `cn` to `zh` in every text column, not only the language column
    #[arg(long)]
    rewrite_all_columns: bool,

    /// Maximum number of years plotted per chart
    #[arg(long, default_value_t = 20)]
    max_points: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn table_path(flag: Option<PathBuf>, var: &str, default: PathBuf) -> PathBuf {
    flag.or_else(|| env::var(var).ok().map(PathBuf::from))
        .unwrap_or(default)
}

fn build_config(args: &CliArgs) -> Result<StatsConfig> {
    let defaults = StatsConfig::default();

    let mut builder = StatsConfig::builder()
        .movies_path(table_path(args.movies.clone(), "MOVIES_CSV", defaults.movies_path))
        .credits_path(table_path(
            args.credits.clone(),
            "CREDITS_CSV",
            defaults.credits_path,
        ))
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

    Ok(builder.build()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    dotenv().ok();
    init_logging(&args.log_level);

    let config = build_config(&args)?;
    info!(
        "Preparing statistics from {} and {}",
        config.movies_path.display(),
        config.credits_path.display()
    );

    let pipeline = StatsPipeline::builder()
        .config(config)
        .on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        })
        .build()?;

    let stats = tokio::task::spawn_blocking(move || pipeline.run())
        .await
        .context("Preparation task panicked")?
        .context("Failed to prepare movie statistics")?;

    run_server(ServerState::new(stats), &format!("{}:{}", args.host, args.port)).await
}
