use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("existing export {path} is not compatible: {reason}")]
    SchemaMismatch { path: String, reason: String },
}
