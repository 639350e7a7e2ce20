//! Custom error types for movie statistics preparation and querying.
//!
//! This module provides the error hierarchy using `thiserror`. Startup
//! errors (loading, cleaning, cataloguing) are fatal for the process, while
//! request errors such as [`MovieStatsError::InvalidSelection`] are isolated
//! to a single query.
//!
//! Errors are serializable so the server can hand them to a client as JSON.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the movie statistics crate.
#[derive(Error, Debug)]
pub enum MovieStatsError {
    /// Source file missing or unreadable.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tabular or serialized-list data could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A release date did not have the expected `YYYY-...` shape.
    #[error("Invalid release date {value:?} for movie {movie_id}")]
    Format { movie_id: String, value: String },

    /// Language code with no registry entry.
    #[error("Unknown language code '{0}'")]
    UnknownCode(String),

    /// A request referenced a language, metric or color that does not exist.
    #[error("Invalid {field}: '{value}'")]
    InvalidSelection { field: &'static str, value: String },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Chart rendering failed.
    #[error("Failed to render chart: {0}")]
    Render(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<MovieStatsError>,
    },
}

impl MovieStatsError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        MovieStatsError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Build an [`MovieStatsError::InvalidSelection`] for a request field.
    pub fn invalid_selection(field: &'static str, value: impl Into<String>) -> Self {
        MovieStatsError::InvalidSelection {
            field,
            value: value.into(),
        }
    }

    /// Get a stable error code for client handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Format { .. } => "FORMAT_ERROR",
            Self::UnknownCode(_) => "UNKNOWN_CODE",
            Self::InvalidSelection { .. } => "INVALID_SELECTION",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Render(_) => "RENDER_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by client input rather than the data.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidSelection { .. } => true,
            Self::WithContext { source, .. } => source.is_client_error(),
            _ => false,
        }
    }

    /// Check if this error is a row-level data problem that a skip policy may absorb.
    pub fn is_row_error(&self) -> bool {
        match self {
            Self::Format { .. } | Self::Parse(_) | Self::Json(_) => true,
            Self::WithContext { source, .. } => source.is_row_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for MovieStatsError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("MovieStatsError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for movie statistics operations.
pub type Result<T> = std::result::Result<T, MovieStatsError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| MovieStatsError::Polars(e).with_context(context))
    }
}
