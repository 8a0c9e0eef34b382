use thiserror::Error;

/// Convenience result type for aggregation operations.
pub type AggregationResult<T> = Result<T, AggregationError>;

/// Convenience result type for record loaders.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by [`crate::aggregate`] and the staged pipeline.
///
/// Every variant is a synchronous validation or resolution failure: the aggregation either
/// returns a complete result or fails before producing any output.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// The dataset is not a sequence of flat key-value records.
    #[error("invalid dataset: {message}")]
    InvalidDataset { message: String },

    /// The dimensions are not a sequence of distinct field names.
    #[error("invalid dimensions: {message}")]
    InvalidDimensions { message: String },

    /// A metric does not map to a function or a known built-in reducer name.
    #[error("invalid metrics: {message}")]
    InvalidMetrics { message: String },

    /// A metric reducer could not be resolved when building the reducer table.
    #[error("metric '{metric}' could not be resolved to a reducer function")]
    UnresolvedReducer { metric: String },
}

/// Error type returned by the record loaders in [`crate::ingestion`].
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON input.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not have the shape of a record collection.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },
}
