//! Query surface used by chart requests.
//!
//! Form parameters arrive as free-form strings. They are parsed into closed
//! enumerations here so an unknown key fails with
//! [`MovieStatsError::InvalidSelection`] instead of a silent lookup miss.

use crate::error::{MovieStatsError, Result};
use crate::types::AggregateRow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language shown when a request does not pick one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Label of the primary (budget) series.
pub const BUDGET_SERIES_LABEL: &str = "Average Budget";

/// Axis label of the primary (budget) series.
pub const BUDGET_AXIS_LABEL: &str = "Average Budget in USD (in Millions)";

// =============================================================================
// Secondary Metric
// =============================================================================

/// Statistic plotted on the secondary y-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryMetric {
    Cast,
    #[default]
    Credits,
    Crew,
    Revenue,
    Runtime,
}

impl SecondaryMetric {
    pub const ALL: [SecondaryMetric; 5] = [
        SecondaryMetric::Cast,
        SecondaryMetric::Credits,
        SecondaryMetric::Crew,
        SecondaryMetric::Revenue,
        SecondaryMetric::Runtime,
    ];

    /// Form key of the metric.
    pub fn key(self) -> &'static str {
        match self {
            Self::Cast => "cast",
            Self::Credits => "credits",
            Self::Crew => "crew",
            Self::Revenue => "revenue",
            Self::Runtime => "runtime",
        }
    }

    /// Axis and legend label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cast => "Average # of Cast Members",
            Self::Credits => "Average # of Credits",
            Self::Crew => "Average # of Crew Members",
            Self::Revenue => "Average Revenue in USD (in Millions)",
            Self::Runtime => "Average Runtime (in Minutes)",
        }
    }

    /// Value of the metric in an aggregate row.
    pub fn value(self, row: &AggregateRow) -> f64 {
        match self {
            Self::Cast => row.avg_cast,
            Self::Credits => row.avg_credits,
            Self::Crew => row.avg_crew,
            Self::Revenue => row.avg_revenue,
            Self::Runtime => row.avg_runtime,
        }
    }
}

impl fmt::Display for SecondaryMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SecondaryMetric {
    type Err = MovieStatsError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|metric| metric.key() == key)
            .ok_or_else(|| MovieStatsError::invalid_selection("metric", s))
    }
}

// =============================================================================
// Chart Color
// =============================================================================

/// Line and axis-label colors offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartColor {
    Blue,
    Red,
    Green,
    Orange,
    Purple,
    Black,
    Gray,
    Brown,
    Pink,
    Cyan,
}

impl ChartColor {
    pub const ALL: [ChartColor; 10] = [
        ChartColor::Blue,
        ChartColor::Red,
        ChartColor::Green,
        ChartColor::Orange,
        ChartColor::Purple,
        ChartColor::Black,
        ChartColor::Gray,
        ChartColor::Brown,
        ChartColor::Pink,
        ChartColor::Cyan,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Black => "black",
            Self::Gray => "gray",
            Self::Brown => "brown",
            Self::Pink => "pink",
            Self::Cyan => "cyan",
        }
    }

    /// CSS named-color values.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Blue => (0, 0, 255),
            Self::Red => (255, 0, 0),
            Self::Green => (0, 128, 0),
            Self::Orange => (255, 165, 0),
            Self::Purple => (128, 0, 128),
            Self::Black => (0, 0, 0),
            Self::Gray => (128, 128, 128),
            Self::Brown => (165, 42, 42),
            Self::Pink => (255, 192, 203),
            Self::Cyan => (0, 255, 255),
        }
    }
}

impl fmt::Display for ChartColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartColor {
    type Err = MovieStatsError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        let name = if name == "grey" { "gray".to_string() } else { name };
        Self::ALL
            .into_iter()
            .find(|color| color.name() == name)
            .ok_or_else(|| MovieStatsError::invalid_selection("color", s))
    }
}

// =============================================================================
// Requests and Results
// =============================================================================

/// Everything a chart request selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRequest {
    /// Language code or display name.
    pub language: String,
    pub metric: SecondaryMetric,
    pub primary_color: ChartColor,
    pub secondary_color: ChartColor,
}

impl Default for ChartRequest {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            metric: SecondaryMetric::default(),
            primary_color: ChartColor::Blue,
            secondary_color: ChartColor::Red,
        }
    }
}

impl ChartRequest {
    /// Build a request from raw form values; absent or blank fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MovieStatsError::InvalidSelection`] for an unknown metric or
    /// color. Languages are checked later against the catalog.
    pub fn from_form(
        language: Option<&str>,
        metric: Option<&str>,
        primary_color: Option<&str>,
        secondary_color: Option<&str>,
    ) -> Result<Self> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.filter(|v| !v.trim().is_empty())
        }

        let defaults = Self::default();

        Ok(Self {
            language: present(language)
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.language),
            metric: present(metric)
                .map(str::parse)
                .transpose()?
                .unwrap_or(defaults.metric),
            primary_color: present(primary_color)
                .map(str::parse)
                .transpose()?
                .unwrap_or(defaults.primary_color),
            secondary_color: present(secondary_color)
                .map(str::parse)
                .transpose()?
                .unwrap_or(defaults.secondary_color),
        })
    }
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSeries {
    pub label: String,
    /// Missing means are `NaN`, written to JSON as `null`.
    #[serde(deserialize_with = "crate::types::nan_as_null::deserialize_vec")]
    pub values: Vec<f64>,
}

/// Sampled series of one language, ready to plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub language_code: String,
    pub language_name: String,
    pub metric: SecondaryMetric,
    pub years: Vec<i32>,
    /// Average budget in millions.
    pub primary: DataSeries,
    pub secondary: DataSeries,
}

impl ChartData {
    /// Build chart data from the (already sampled) rows of one language.
    pub fn from_rows(
        language_code: &str,
        language_name: &str,
        metric: SecondaryMetric,
        rows: &[AggregateRow],
    ) -> Self {
        Self {
            language_code: language_code.to_string(),
            language_name: language_name.to_string(),
            metric,
            years: rows.iter().map(|row| row.year).collect(),
            primary: DataSeries {
                label: BUDGET_SERIES_LABEL.to_string(),
                values: rows.iter().map(|row| row.avg_budget).collect(),
            },
            secondary: DataSeries {
                label: metric.label().to_string(),
                values: rows.iter().map(|row| metric.value(row)).collect(),
            },
        }
    }
}
