//! Per-row derived values: release year and credit list sizes.

use crate::error::{MovieStatsError, Result};

/// Values derived from one joined row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DerivedRow {
    pub release_year: String,
    pub crew_count: u32,
    pub cast_count: u32,
}

impl DerivedRow {
    pub(crate) fn credits_count(&self) -> u32 {
        self.crew_count + self.cast_count
    }
}

/// Derive the release year and credit counts of a movie.
pub(crate) fn derive_row(
    movie_id: &str,
    release_date: Option<&str>,
    crew: Option<&str>,
    cast: Option<&str>,
) -> Result<DerivedRow> {
    Ok(DerivedRow {
        release_year: release_year(movie_id, release_date)?,
        crew_count: credit_list_len(movie_id, "crew", crew)?,
        cast_count: credit_list_len(movie_id, "cast", cast)?,
    })
}

/// The part of `release_date` before the first `-`, which must be four digits.
pub(crate) fn release_year(movie_id: &str, release_date: Option<&str>) -> Result<String> {
    let format_error = || MovieStatsError::Format {
        movie_id: movie_id.to_string(),
        value: release_date.unwrap_or_default().to_string(),
    };

    let date = release_date.ok_or_else(format_error)?;
    let (year, _) = date.trim().split_once('-').ok_or_else(format_error)?;

    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format_error());
    }

    Ok(year.to_string())
}

/// Number of entries in a serialized JSON list.
pub(crate) fn credit_list_len(movie_id: &str, field: &str, raw: Option<&str>) -> Result<u32> {
    let raw = raw.ok_or_else(|| {
        MovieStatsError::Parse(format!("missing {} list for movie {}", field, movie_id))
    })?;

    let entries: Vec<serde_json::Value> = serde_json::from_str(raw).map_err(|e| {
        MovieStatsError::from(e).with_context(format!("{} list of movie {}", field, movie_id))
    })?;

    u32::try_from(entries.len()).map_err(|_| {
        MovieStatsError::Parse(format!("{} list of movie {} is too long", field, movie_id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_year() {
        assert_eq!(release_year("1", Some("2001-06-01")).unwrap(), "2001");
        assert_eq!(release_year("1", Some("1999-12")).unwrap(), "1999");
    }

    #[test]
    fn test_release_year_rejects_malformed_dates() {
        for value in [None, Some(""), Some("2001"), Some("01-06-2001"), Some("20x1-01-01")] {
            let err = release_year("9", value).unwrap_err();
            assert_eq!(err.error_code(), "FORMAT_ERROR", "value {:?}", value);
        }
    }

    #[test]
    fn test_credit_list_len() {
        assert_eq!(credit_list_len("1", "cast", Some("[]")).unwrap(), 0);
        assert_eq!(credit_list_len("1", "crew", Some("[{}]")).unwrap(), 1);
        assert_eq!(
            credit_list_len(
                "1",
                "cast",
                Some(r#"[{"name": "A", "order": 0}, {"name": "B", "order": 1}]"#)
            )
            .unwrap(),
            2
        );
    }

    #[test]
    fn test_credit_list_len_rejects_malformed_lists() {
        let missing = credit_list_len("3", "crew", None).unwrap_err();
        assert_eq!(missing.error_code(), "PARSE_ERROR");
        assert!(missing.is_row_error());

        for raw in ["not json", "{\"a\": 1}", "[{]"] {
            let err = credit_list_len("3", "crew", Some(raw)).unwrap_err();
            assert_eq!(err.error_code(), "JSON_ERROR", "raw {:?}", raw);
            assert!(err.is_row_error());
            assert!(err.to_string().starts_with("crew list of movie 3: JSON error"));
        }
    }

    #[test]
    fn test_derive_row_credits_count() {
        let row = derive_row("1", Some("2001-06-01"), Some("[{}]"), Some("[]")).unwrap();
        assert_eq!(row.release_year, "2001");
        assert_eq!(row.crew_count, 1);
        assert_eq!(row.cast_count, 0);
        assert_eq!(row.credits_count(), 1);
    }
}
