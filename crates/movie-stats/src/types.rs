use serde::{Deserialize, Serialize};

/// Column names of the source tables and the derived columns added while cleaning.
pub mod columns {
    pub const ID: &str = "id";
    pub const MOVIE_ID: &str = "movie_id";
    pub const BUDGET: &str = "budget";
    pub const RELEASE_DATE: &str = "release_date";
    pub const ORIGINAL_LANGUAGE: &str = "original_language";
    pub const CAST: &str = "cast";
    pub const CREW: &str = "crew";
    pub const RUNTIME: &str = "runtime";
    pub const REVENUE: &str = "revenue";

    pub const RELEASE_YEAR: &str = "release_year";
    pub const CREW_COUNT: &str = "crew_count";
    pub const CAST_COUNT: &str = "cast_count";
    pub const CREDITS_COUNT: &str = "credits_count";

    /// Columns dropped after the join. `title_right` is the credits title
    /// suffixed by the join.
    pub const DROPPED: [&str; 6] = [
        "homepage",
        "keywords",
        "overview",
        "tagline",
        MOVIE_ID,
        "title_right",
    ];
}

/// Mean statistics of one (language, year) group.
///
/// `avg_budget` and `avg_revenue` are in millions of USD. A mean over a group
/// with no non-null input is `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub language: String,
    pub year: i32,
    pub movie_count: u64,
    #[serde(deserialize_with = "nan_as_null::deserialize")]
    pub avg_budget: f64,
    #[serde(deserialize_with = "nan_as_null::deserialize")]
    pub avg_credits: f64,
    #[serde(deserialize_with = "nan_as_null::deserialize")]
    pub avg_cast: f64,
    #[serde(deserialize_with = "nan_as_null::deserialize")]
    pub avg_crew: f64,
    #[serde(deserialize_with = "nan_as_null::deserialize")]
    pub avg_runtime: f64,
    #[serde(deserialize_with = "nan_as_null::deserialize")]
    pub avg_revenue: f64,
}

/// Reading back means that JSON wrote as `null`.
///
/// `serde_json` serializes `NaN` as `null`; these map `null` to `NaN` again.
pub mod nan_as_null {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }

    pub fn deserialize_vec<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(values
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect())
    }
}

/// What the cleaner removed, skipped and rewrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Rows produced by the inner join.
    pub rows_joined: usize,
    /// Rows removed for a zero or missing budget.
    pub rows_without_budget: usize,
    /// Rows removed for the "no language" code or a missing language.
    pub rows_without_language: usize,
    /// Rows skipped for a malformed release date.
    pub rows_with_bad_date: usize,
    /// Rows skipped for a malformed cast or crew list.
    pub rows_with_bad_credits: usize,
    /// Cells rewritten from `cn` to `zh`.
    pub rewritten_cells: usize,
    /// Rows in the cleaned table.
    pub rows_after: usize,
}

impl CleaningReport {
    /// Total rows skipped by the row error policy.
    pub fn rows_skipped(&self) -> usize {
        self.rows_with_bad_date + self.rows_with_bad_credits
    }
}

/// What the aggregator produced and pruned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationReport {
    /// (language, year) groups before pruning.
    pub groups: usize,
    /// Languages kept after pruning.
    pub languages_kept: usize,
    /// Languages dropped for having too few distinct years.
    pub languages_pruned: Vec<String>,
}

/// Summary of the one-time preparation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreparationSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    /// Rows in the movies table as loaded.
    pub movies_rows: usize,
    /// Rows in the credits table as loaded.
    pub credits_rows: usize,
    pub cleaning: CleaningReport,
    pub aggregation: AggregationReport,
    /// Rows in the final aggregate table.
    pub aggregate_rows: usize,
    /// Languages with a display name.
    pub languages_catalogued: usize,
    /// Codes left out of the catalog because the registry has no name for them.
    pub languages_without_name: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_mean_survives_json() {
        let row = AggregateRow {
            language: "fr".to_string(),
            year: 2003,
            movie_count: 1,
            avg_budget: 12.5,
            avg_credits: 40.0,
            avg_cast: 25.0,
            avg_crew: 15.0,
            avg_runtime: f64::NAN,
            avg_revenue: 30.0,
        };

        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"avg_runtime\":null"));

        let back: AggregateRow = serde_json::from_str(&json).unwrap();
        assert!(back.avg_runtime.is_nan());
        assert_eq!(back.avg_budget, 12.5);
        assert_eq!(back.year, 2003);
    }
}
