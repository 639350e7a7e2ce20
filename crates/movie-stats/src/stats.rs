//! Prepared movie statistics.
//!
//! [`MovieStats`] is built once by the pipeline and never mutated afterwards,
//! so the server shares it behind an `Arc` with no locking.

use crate::catalog::LanguageCatalog;
use crate::chart::render_chart;
use crate::config::StatsConfig;
use crate::error::Result;
use crate::pipeline::StatsPipeline;
use crate::query::{ChartData, ChartRequest, SecondaryMetric};
use crate::sampler::sample_years;
use crate::types::{AggregateRow, PreparationSummary};
use polars::prelude::*;
use tracing::debug;

/// Cleaned table, aggregates and language catalog of one preparation run.
#[derive(Debug, Clone)]
pub struct MovieStats {
    cleaned: DataFrame,
    aggregates: Vec<AggregateRow>,
    catalog: LanguageCatalog,
    summary: PreparationSummary,
    max_chart_points: usize,
}

static_assertions::assert_impl_all!(MovieStats: Send, Sync);

impl MovieStats {
    pub(crate) fn new(
        cleaned: DataFrame,
        aggregates: Vec<AggregateRow>,
        catalog: LanguageCatalog,
        summary: PreparationSummary,
        max_chart_points: usize,
    ) -> Self {
        Self {
            cleaned,
            aggregates,
            catalog,
            summary,
            max_chart_points,
        }
    }

    /// Prepare statistics from in-memory movies and credits tables.
    pub fn from_frames(
        movies: &DataFrame,
        credits: &DataFrame,
        config: &StatsConfig,
    ) -> Result<Self> {
        StatsPipeline::new(config.clone()).prepare(movies, credits)
    }

    /// The joined and cleaned table, sorted by budget, largest first.
    pub fn cleaned(&self) -> &DataFrame {
        &self.cleaned
    }

    /// Aggregate rows sorted by language, then year.
    pub fn aggregates(&self) -> &[AggregateRow] {
        &self.aggregates
    }

    pub fn catalog(&self) -> &LanguageCatalog {
        &self.catalog
    }

    pub fn summary(&self) -> &PreparationSummary {
        &self.summary
    }

    /// Every aggregate row of one language code, in year order.
    pub fn language_rows(&self, code: &str) -> Vec<AggregateRow> {
        self.aggregates
            .iter()
            .filter(|row| row.language == code)
            .cloned()
            .collect()
    }

    /// Sampled chart series for a language given by code or display name.
    ///
    /// # Errors
    ///
    /// Returns [`MovieStatsError::InvalidSelection`] when the language is not
    /// in the catalog.
    ///
    /// [`MovieStatsError::InvalidSelection`]: crate::error::MovieStatsError::InvalidSelection
    pub fn get_chart_data(&self, language: &str, metric: SecondaryMetric) -> Result<ChartData> {
        let code = self.catalog.resolve(language)?;
        let name = self.catalog.name(code).unwrap_or(code);

        let rows = self.language_rows(code);
        let sampled = sample_years(&rows, self.max_chart_points);
        debug!(
            "Chart data for '{}': {} of {} years, metric {}",
            code,
            sampled.len(),
            rows.len(),
            metric
        );

        Ok(ChartData::from_rows(code, name, metric, &sampled))
    }

    /// Resolve a request and render its chart as SVG.
    pub fn render(&self, request: &ChartRequest) -> Result<String> {
        let data = self.get_chart_data(&request.language, request.metric)?;
        render_chart(&data, request.primary_color, request.secondary_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::MILLION;
    use crate::query::ChartColor;
    use pretty_assertions::assert_eq;

    /// Three English years and two French years; revenue chosen so the
    /// yearly means are easy to check.
    fn stats() -> MovieStats {
        let movies = df![
            "id" => [1i64, 2, 3, 4, 5, 6],
            "budget" => [1_000_000i64, 3_000_000, 4_000_000, 6_000_000, 2_000_000, 8_000_000],
            "release_date" => ["2001-01-01", "2001-05-05", "2002-02-02", "2003-03-03", "1999-09-09", "2000-01-01"],
            "original_language" => ["en", "en", "en", "en", "fr", "fr"],
            "runtime" => [90.0f64, 110.0, 100.0, 120.0, 80.0, 100.0],
            "revenue" => [2_000_000i64, 4_000_000, 10_000_000, 0, 1_000_000, 9_000_000],
            "title" => ["A", "B", "C", "D", "E", "F"],
        ]
        .unwrap();
        let credits = df![
            "movie_id" => [1i64, 2, 3, 4, 5, 6],
            "title" => ["A", "B", "C", "D", "E", "F"],
            "cast" => ["[{}]", "[{}, {}, {}]", "[]", "[{}]", "[{}]", "[]"],
            "crew" => ["[]", "[{}]", "[{}]", "[{}, {}]", "[]", "[{}]"],
        ]
        .unwrap();

        MovieStats::from_frames(&movies, &credits, &StatsConfig::default()).unwrap()
    }

    #[test]
    fn test_language_rows() {
        let stats = stats();
        let years: Vec<i32> = stats.language_rows("en").iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2001, 2002, 2003]);
        assert!(stats.language_rows("de").is_empty());
    }

    #[test]
    fn test_chart_data_by_name_and_code() {
        let stats = stats();
        let by_code = stats.get_chart_data("en", SecondaryMetric::Credits).unwrap();
        let by_name = stats.get_chart_data("English", SecondaryMetric::Credits).unwrap();
        assert_eq!(by_code, by_name);

        assert_eq!(by_code.language_name, "English");
        assert_eq!(by_code.years, vec![2001, 2002, 2003]);
        assert_eq!(by_code.primary.values, vec![2.0, 4.0, 6.0]);
        // 2001: (1 + 4) / 2 credits
        assert_eq!(by_code.secondary.values, vec![2.5, 1.0, 3.0]);
    }

    #[test]
    fn test_revenue_in_millions() {
        let data = stats()
            .get_chart_data("en", SecondaryMetric::Revenue)
            .unwrap();
        assert_eq!(data.secondary.label, "Average Revenue in USD (in Millions)");
        assert_eq!(
            data.secondary.values,
            vec![3_000_000.0 / MILLION, 10_000_000.0 / MILLION, 0.0]
        );
    }

    #[test]
    fn test_unknown_language_is_invalid_selection() {
        let err = stats()
            .get_chart_data("Klingon", SecondaryMetric::Cast)
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_render_request() {
        let request = ChartRequest {
            language: "French".to_string(),
            metric: SecondaryMetric::Runtime,
            primary_color: ChartColor::Green,
            secondary_color: ChartColor::Orange,
        };
        let svg = stats().render(&request).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Average Runtime (in Minutes)"));
    }
}
