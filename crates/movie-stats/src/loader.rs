//! CSV loading for the movies and credits tables.

use crate::error::{MovieStatsError, Result};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Load a delimited table with a header row.
///
/// `infer_schema_length` limits how many rows Polars inspects to pick column
/// types; `None` scans the whole file.
///
/// # Errors
///
/// Returns [`MovieStatsError::Io`] when the file cannot be opened and
/// [`MovieStatsError::Parse`] when its content is not valid CSV.
pub fn load_table(path: impl AsRef<Path>, infer_schema_length: Option<usize>) -> Result<DataFrame> {
    let path = path.as_ref();
    debug!("Opening table {}", path.display());

    let file = File::open(path).map_err(|e| {
        MovieStatsError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;

    let df = CsvReadOptions::default()
        .with_infer_schema_length(infer_schema_length)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .into_reader_with_file_handle(file)
        .finish()
        .map_err(|e| MovieStatsError::Parse(format!("{}: {}", path.display(), e)))?;

    info!("Loaded {}: {:?}", path.display(), df.shape());
    Ok(df)
}
