//! Shared column access helpers.
//!
//! Source CSVs leave column types to inference, so these helpers cast to the
//! type a stage needs instead of trusting the inferred one.

use crate::error::{MovieStatsError, Result};
use polars::prelude::*;

// =============================================================================
// Column Access
// =============================================================================

/// Get a column as a Series, mapping a missing name to
/// [`MovieStatsError::ColumnNotFound`].
pub fn column_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| MovieStatsError::ColumnNotFound(name.to_string()))
}

/// Get a column as strings, casting non-string columns.
pub fn string_column(df: &DataFrame, name: &str) -> Result<StringChunked> {
    let series = column_series(df, name)?;
    let casted = series.cast(&DataType::String)?;
    Ok(casted.str()?.clone())
}

/// Get a column as 64-bit floats, casting integer columns.
pub fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let series = column_series(df, name)?;
    let casted = series.cast(&DataType::Float64)?;
    Ok(casted.f64()?.clone())
}

/// Check that every named column exists.
pub fn require_columns(df: &DataFrame, names: &[&str]) -> Result<()> {
    for name in names {
        column_series(df, name)?;
    }
    Ok(())
}

/// Names of the columns holding strings.
pub fn string_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype() == &DataType::String)
        .map(|col| col.name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_column_casts_integers() {
        let df = df![
            "id" => [1i64, 22, 333],
        ]
        .unwrap();

        let ids = string_column(&df, "id").unwrap();
        let values: Vec<Option<&str>> = ids.into_iter().collect();
        assert_eq!(values, vec![Some("1"), Some("22"), Some("333")]);
    }

    #[test]
    fn test_float_column_keeps_nulls() {
        let df = df![
            "runtime" => [Some(90i64), None, Some(120)],
        ]
        .unwrap();

        let runtime = float_column(&df, "runtime").unwrap();
        assert_eq!(runtime.get(0), Some(90.0));
        assert_eq!(runtime.get(1), None);
    }

    #[test]
    fn test_missing_column() {
        let df = df!["a" => [1i64]].unwrap();
        let err = float_column(&df, "budget").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
        assert!(require_columns(&df, &["a"]).is_ok());
        assert!(require_columns(&df, &["a", "b"]).is_err());
    }

    #[test]
    fn test_string_column_names() {
        let df = df![
            "a" => [1i64],
            "b" => ["x"],
            "c" => ["y"],
        ]
        .unwrap();
        assert_eq!(string_column_names(&df), vec!["b".to_string(), "c".to_string()]);
    }
}
