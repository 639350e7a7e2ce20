//! Rewriting of non-standard language codes.

use crate::config::RewriteScope;
use crate::error::Result;
use crate::types::columns;
use crate::utils::string_column_names;
use polars::prelude::*;
use tracing::debug;

/// Non-standard code used for Chinese in the source data.
pub const NONSTANDARD_CHINESE: &str = "cn";

/// ISO 639-1 code for Chinese.
pub const STANDARD_CHINESE: &str = "zh";

/// Replace cells exactly equal to `from` with `to`.
///
/// Returns the rewritten frame and the number of replaced cells.
pub(crate) fn rewrite_code(
    df: DataFrame,
    scope: RewriteScope,
    from: &str,
    to: &str,
) -> Result<(DataFrame, usize)> {
    let mut df = df;
    let column_names = match scope {
        RewriteScope::LanguageColumn => vec![columns::ORIGINAL_LANGUAGE.to_string()],
        RewriteScope::AllColumns => string_column_names(&df),
    };

    let mut total_replacements = 0;

    for col_name in &column_names {
        if let Ok(col) = df.column(col_name) {
            let series = col.as_materialized_series();
            if series.dtype() != &DataType::String {
                continue;
            }

            let str_series = series.str()?;
            let mut replaced = 0;
            let values: Vec<Option<&str>> = str_series
                .into_iter()
                .map(|opt_val| match opt_val {
                    Some(val) if val == from => {
                        replaced += 1;
                        Some(to)
                    }
                    other => other,
                })
                .collect();

            if replaced > 0 {
                let rewritten = Series::new(col_name.as_str().into(), values);
                df.replace(col_name, rewritten)?;
                total_replacements += replaced;
            }
        }
    }

    if total_replacements > 0 {
        debug!("Rewrote {} '{}' cells to '{}'", total_replacements, from, to);
    }

    Ok((df, total_replacements))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        df![
            "original_language" => ["cn", "en", "cn"],
            "title" => ["cn", "Hero", "cnx"],
        ]
        .unwrap()
    }

    #[test]
    fn test_language_column_scope() {
        let (df, count) =
            rewrite_code(frame(), RewriteScope::LanguageColumn, "cn", "zh").unwrap();
        assert_eq!(count, 2);

        let langs: Vec<Option<&str>> = df
            .column("original_language")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(langs, vec![Some("zh"), Some("en"), Some("zh")]);

        let title = df
            .column("title")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .get(0);
        assert_eq!(title, Some("cn"));
    }

    #[test]
    fn test_all_columns_scope_matches_whole_cells_only() {
        let (df, count) = rewrite_code(frame(), RewriteScope::AllColumns, "cn", "zh").unwrap();
        assert_eq!(count, 3);

        let titles: Vec<Option<&str>> = df
            .column("title")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(titles, vec![Some("zh"), Some("Hero"), Some("cnx")]);
    }

    #[test]
    fn test_no_matches_leaves_frame_untouched() {
        let df = df!["original_language" => ["en", "fr"]].unwrap();
        let (out, count) = rewrite_code(df.clone(), RewriteScope::AllColumns, "cn", "zh").unwrap();
        assert_eq!(count, 0);
        assert!(out.equals(&df));
    }
}
